// crates/service-catalog-broker/src/listener/mod.rs
// ============================================================================
// Module: Service Catalog Listeners
// Description: Reference listener implementations.
// Purpose: Group the log, channel, and callback listeners.
// Dependencies: service-catalog-core
// ============================================================================

//! ## Overview
//! Every listener here adapts the three `Listener` hooks onto a single
//! event-delivery function so destinations only handle [`crate::CatalogEvent`].

// ============================================================================
// SECTION: Modules
// ============================================================================

mod callback;
mod channel;
mod log;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use callback::CallbackListener;
pub use channel::ChannelListener;
pub use log::LogListener;
