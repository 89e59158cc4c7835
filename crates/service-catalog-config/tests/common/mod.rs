// crates/service-catalog-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for service-catalog-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use service_catalog_config::CatalogConfig;
use service_catalog_config::ConfigError;

/// Returns a config with all defaults applied.
pub fn minimal_config() -> CatalogConfig {
    CatalogConfig::default()
}

/// Asserts an error message contains `needle`.
pub fn assert_invalid<T: std::fmt::Debug>(result: Result<T, ConfigError>, needle: &str) {
    match result {
        Err(error) => {
            let message = error.to_string();
            assert!(message.contains(needle), "error {message} did not contain {needle}");
        }
        Ok(value) => panic!("expected invalid config, got {value:?}"),
    }
}
