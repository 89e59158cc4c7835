// crates/service-catalog-config/src/lib.rs
// ============================================================================
// Module: Service Catalog Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for service-catalog.toml semantics.
// Dependencies: service-catalog-core, service-catalog-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `service-catalog-config` defines the configuration model for the service
//! catalog. Loading is strict and fail-closed: oversized files, unknown keys,
//! and out-of-range limits are rejected before any storage is opened.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
