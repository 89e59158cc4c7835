// crates/service-catalog-broker/src/lib.rs
// ============================================================================
// Module: Service Catalog Broker Library
// Description: Reference lifecycle listeners for the catalog controller.
// Purpose: Forward committed catalog mutations to logs, channels, and callbacks.
// Dependencies: service-catalog-core, serde_json, tokio
// ============================================================================

//! ## Overview
//! Service Catalog Broker provides ready-made [`Listener`] implementations.
//! Each listener turns a committed mutation into a [`CatalogEvent`] and hands
//! it to its destination: a JSON-lines writer, a bounded Tokio channel, or a
//! user callback. Delivery failures are reported back to the controller's
//! fan-out, which logs them and moves on.
//!
//! [`Listener`]: service_catalog_core::Listener

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod event;
pub mod listener;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use event::CatalogEvent;
pub use listener::CallbackListener;
pub use listener::ChannelListener;
pub use listener::LogListener;
