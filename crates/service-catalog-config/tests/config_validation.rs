// crates/service-catalog-config/tests/config_validation.rs
// =============================================================================
// Module: Config Validation Tests
// Description: Validate limit ranges and cross-field storage rules.
// Purpose: Ensure invalid configuration fails closed.
// =============================================================================

//! Config validation tests for service-catalog-config.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::path::PathBuf;

use service_catalog_config::CatalogConfig;
use service_catalog_config::StorageType;

mod common;

use common::assert_invalid;
use common::minimal_config;

#[test]
fn description_must_be_non_empty() {
    let mut config = minimal_config();
    config.description = "   ".to_string();
    assert_invalid(config.validate(), "description must be non-empty");
}

#[test]
fn description_length_is_bounded() {
    let mut config = minimal_config();
    config.description = "d".repeat(257);
    assert_invalid(config.validate(), "description exceeds max length");
}

#[test]
fn bind_must_be_socket_address() {
    let mut config = minimal_config();
    config.server.bind = "localhost".to_string();
    assert_invalid(config.validate(), "server.bind");
    config.server.bind = "0.0.0.0:9000".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn max_body_bytes_range_is_enforced() {
    let mut config = minimal_config();
    config.server.max_body_bytes = 0;
    assert_invalid(config.validate(), "server.max_body_bytes");
    config.server.max_body_bytes = 16 * 1024 * 1024 + 1;
    assert_invalid(config.validate(), "server.max_body_bytes");
    config.server.max_body_bytes = 16 * 1024 * 1024;
    assert!(config.validate().is_ok());
}

#[test]
fn catalog_limits_are_enforced() {
    let mut config = minimal_config();
    config.catalog.max_per_page = 0;
    assert_invalid(config.validate(), "catalog.max_per_page");
    config.catalog.max_per_page = 10_001;
    assert_invalid(config.validate(), "catalog.max_per_page");

    let mut config = minimal_config();
    config.catalog.validation.max_depth = 129;
    assert_invalid(config.validate(), "catalog.validation.max_depth");

    let mut config = minimal_config();
    config.catalog.validation.max_id_length = 0;
    assert_invalid(config.validate(), "catalog.validation.max_id_length");

    let mut config = minimal_config();
    config.catalog.validation.max_entry_bytes = 0;
    assert_invalid(config.validate(), "catalog.validation.max_entry_bytes");
}

#[test]
fn memory_storage_rejects_path() {
    let mut config = minimal_config();
    config.storage.path = Some(PathBuf::from("catalog.sqlite"));
    assert_invalid(config.validate(), "memory storage must not set path");
}

#[test]
fn sqlite_storage_requires_path() {
    let mut config = minimal_config();
    config.storage.store_type = StorageType::Sqlite;
    assert_invalid(config.validate(), "sqlite storage requires path");
    config.storage.path = Some(PathBuf::new());
    assert_invalid(config.validate(), "storage path must be non-empty");
    config.storage.path = Some(PathBuf::from("data").join("p".repeat(256)));
    assert_invalid(config.validate(), "storage path component too long");
    config.storage.path = Some(PathBuf::from("data/catalog.sqlite"));
    assert!(config.validate().is_ok());
}

#[test]
fn validation_errors_surface_through_from_toml() {
    assert_invalid(
        CatalogConfig::from_toml("[storage]\ntype = \"sqlite\"\n"),
        "sqlite storage requires path",
    );
    assert_invalid(CatalogConfig::from_toml("[catalog]\nmax_per_page = 0\n"), "max_per_page");
}

#[test]
fn storage_type_labels_are_canonical() {
    assert_eq!(StorageType::Memory.to_string(), "memory");
    assert_eq!(StorageType::Sqlite.as_str(), "sqlite");
}
