// crates/service-catalog-core/src/runtime/mod.rs
// ============================================================================
// Module: Service Catalog Runtime
// Description: Controller, filter, pagination, fan-out, and volatile storage.
// Purpose: Execute catalog operations against pluggable storage and listeners.
// Dependencies: crate::{core, interfaces}, bigdecimal, tracing
// ============================================================================

//! ## Overview
//! Runtime modules implement the catalog's behavior. Transports (HTTP or
//! otherwise) call into [`CatalogController`] and never touch storage
//! directly, so every surface sees the same rules.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod controller;
pub mod error;
pub mod fanout;
pub mod filter;
pub mod pagination;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use controller::CatalogController;
pub use controller::ControllerConfig;
pub use controller::MAX_ID_ATTEMPTS;
pub use controller::UpdateOutcome;
pub use error::CatalogError;
pub use error::ErrorKind;
pub use fanout::LifecycleKind;
pub use fanout::ListenerSet;
pub use fanout::Notification;
pub use filter::AttributePath;
pub use filter::FilterError;
pub use filter::FilterOperator;
pub use filter::FilterQuery;
pub use filter::evaluate_operator;
pub use pagination::DEFAULT_MAX_PER_PAGE;
pub use pagination::DEFAULT_PAGE;
pub use pagination::EntryPage;
pub use pagination::PageRequest;
pub use pagination::PaginationError;
pub use pagination::parse_paging_params;
pub use store::InMemoryStorage;
pub use store::SharedStorage;
