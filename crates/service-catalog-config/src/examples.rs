// crates/service-catalog-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and the CLI.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The example below is parsed and validated by the crate tests, so it stays in
//! sync with the configuration model.

/// Returns a canonical example `service-catalog.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"description = "Service Catalog"

[server]
bind = "127.0.0.1:8082"
max_body_bytes = 1048576

[catalog]
max_per_page = 100

[catalog.validation]
max_entry_bytes = 1048576
max_depth = 32
max_id_length = 256

[storage]
type = "sqlite"
path = "data/catalog.sqlite"
busy_timeout_ms = 5000
journal_mode = "wal"
sync_mode = "full"

[listeners]
log = false
"#,
    )
}
