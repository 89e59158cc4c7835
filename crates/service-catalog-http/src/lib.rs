// crates/service-catalog-http/src/lib.rs
// ============================================================================
// Module: Service Catalog HTTP Library
// Description: REST transport for the service catalog.
// Purpose: Map HTTP verbs onto controller operations and errors onto statuses.
// Dependencies: service-catalog-core, service-catalog-config, axum, tokio
// ============================================================================

//! ## Overview
//! The HTTP layer is a thin collaborator of the catalog controller. It parses
//! requests, runs the blocking controller call off the async executor, and
//! renders entries, collections, and errors as JSON. [`CatalogServer`] wires
//! storage, listeners, and the controller together from configuration.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod api;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use api::API_VERSION;
pub use api::ApiState;
pub use api::Collection;
pub use api::router;
pub use server::CatalogServer;
pub use server::ServerError;
pub use server::build_storage;
