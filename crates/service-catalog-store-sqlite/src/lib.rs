// crates/service-catalog-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Catalog Storage
// Description: Durable catalog Storage backend using SQLite.
// Purpose: Persist catalog entries across restarts.
// Dependencies: service-catalog-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`Storage`] implementation. Each entry
//! is stored as its JSON text with a SHA-256 digest that is verified on every
//! load, and rows are keyed by id under `BINARY` collation so iteration order
//! matches the volatile backend byte for byte.
//!
//! [`Storage`]: service_catalog_core::Storage

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::MAX_STORED_ENTRY_BYTES;
pub use store::SqliteStorage;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
