// crates/service-catalog-core/src/lib.rs
// ============================================================================
// Module: Service Catalog Core Library
// Description: Public API surface for the service catalog core.
// Purpose: Expose the entry model, storage/listener contracts, and controller.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The service catalog is a registry of service descriptions addressed by
//! hierarchical ids. This crate holds everything that is independent of the
//! transport and of durable persistence: the entry model, validation, the
//! [`Storage`] and [`Listener`] contracts, a volatile storage backend, the
//! filter evaluator, pagination, and the [`CatalogController`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::Listener;
pub use interfaces::ListenerError;
pub use interfaces::SCAN_BATCH_SIZE;
pub use interfaces::Storage;
pub use interfaces::StoreError;
pub use runtime::CatalogController;
pub use runtime::CatalogError;
pub use runtime::ControllerConfig;
pub use runtime::DEFAULT_MAX_PER_PAGE;
pub use runtime::EntryPage;
pub use runtime::ErrorKind;
pub use runtime::FilterOperator;
pub use runtime::FilterQuery;
pub use runtime::InMemoryStorage;
pub use runtime::LifecycleKind;
pub use runtime::PageRequest;
pub use runtime::SharedStorage;
pub use runtime::UpdateOutcome;
pub use runtime::parse_paging_params;
