// crates/service-catalog-config/src/config.rs
// ============================================================================
// Module: Service Catalog Configuration
// Description: Configuration loading and validation for the service catalog.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: service-catalog-core, service-catalog-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Unknown keys, unsupported storage kinds, and out-of-range limits fail the
//! load so a misconfigured catalog never starts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use service_catalog_core::ControllerConfig;
use service_catalog_core::DEFAULT_MAX_PER_PAGE;
use service_catalog_core::ValidationLimits;
use service_catalog_store_sqlite::SqliteStoreConfig;
use service_catalog_store_sqlite::SqliteStoreMode;
use service_catalog_store_sqlite::SqliteSyncMode;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "service-catalog.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "SERVICE_CATALOG_CONFIG";
/// Maximum size of the config file in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum catalog description length in bytes.
pub(crate) const MAX_DESCRIPTION_LENGTH: usize = 256;
/// Upper bound for request and entry size limits.
pub(crate) const MAX_BYTES_LIMIT: usize = 16 * 1024 * 1024;
/// Upper bound for `max_per_page`.
pub(crate) const MAX_PER_PAGE_LIMIT: usize = 10_000;
/// Upper bound for `max_depth`.
pub(crate) const MAX_DEPTH_LIMIT: usize = 128;
/// Upper bound for `max_id_length`.
pub(crate) const MAX_ID_LENGTH_LIMIT: usize = 4096;
/// Default catalog description.
const DEFAULT_DESCRIPTION: &str = "Service Catalog";
/// Default HTTP bind address.
const DEFAULT_BIND: &str = "127.0.0.1:8082";
/// Default maximum request body size.
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
/// Default `SQLite` busy timeout.
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// SECTION: Catalog Config
// ============================================================================

/// Top-level service catalog configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Human-readable catalog description, echoed in collection responses.
    pub description: String,
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Controller configuration.
    pub catalog: CatalogSection,
    /// Storage backend configuration.
    pub storage: StorageConfig,
    /// Built-in listener toggles.
    pub listeners: ListenersConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            description: DEFAULT_DESCRIPTION.to_string(),
            server: ServerConfig::default(),
            catalog: CatalogSection::default(),
            storage: StorageConfig::default(),
            listeners: ListenersConfig::default(),
        }
    }
}

impl CatalogConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: `path`, then `SERVICE_CATALOG_CONFIG`, then
    /// `service-catalog.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", resolved.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ConfigError::Invalid("description must be non-empty".to_string()));
        }
        if description.len() > MAX_DESCRIPTION_LENGTH {
            return Err(ConfigError::Invalid("description exceeds max length".to_string()));
        }
        self.server.validate()?;
        self.catalog.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Server Config
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to bind.
    pub bind: String,
    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    /// Parses the bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `bind` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind.trim().parse().map_err(|_| {
            ConfigError::Invalid(format!("server.bind is not a socket address: {}", self.bind))
        })
    }

    /// Validates server configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.max_body_bytes == 0 || self.max_body_bytes > MAX_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "server.max_body_bytes must be between 1 and {MAX_BYTES_LIMIT}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Catalog Section
// ============================================================================

/// Controller paging and validation limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogSection {
    /// Upper bound for `per_page`; also the default page size.
    pub max_per_page: usize,
    /// Registration limits.
    pub validation: ValidationLimits,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            max_per_page: DEFAULT_MAX_PER_PAGE,
            validation: ValidationLimits::default(),
        }
    }
}

impl CatalogSection {
    /// Returns the controller configuration described by this section.
    #[must_use]
    pub const fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            max_per_page: self.max_per_page,
            validation: self.validation,
        }
    }

    /// Validates catalog limits.
    fn validate(&self) -> Result<(), ConfigError> {
        check_range("catalog.max_per_page", self.max_per_page, MAX_PER_PAGE_LIMIT)?;
        check_range(
            "catalog.validation.max_entry_bytes",
            self.validation.max_entry_bytes,
            MAX_BYTES_LIMIT,
        )?;
        check_range("catalog.validation.max_depth", self.validation.max_depth, MAX_DEPTH_LIMIT)?;
        check_range(
            "catalog.validation.max_id_length",
            self.validation.max_id_length,
            MAX_ID_LENGTH_LIMIT,
        )?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Storage Config
// ============================================================================

/// Storage backend configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Storage backend type.
    #[serde(rename = "type")]
    pub store_type: StorageType,
    /// `SQLite` database path when using the sqlite backend.
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    pub sync_mode: SqliteSyncMode,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_type: StorageType::default(),
            path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl StorageConfig {
    /// Returns the `SQLite` store configuration for the durable backend.
    ///
    /// Returns `None` for the volatile backend.
    #[must_use]
    pub fn sqlite_config(&self) -> Option<SqliteStoreConfig> {
        match self.store_type {
            StorageType::Memory => None,
            StorageType::Sqlite => self.path.as_ref().map(|path| SqliteStoreConfig {
                path: path.clone(),
                busy_timeout_ms: self.busy_timeout_ms,
                journal_mode: self.journal_mode,
                sync_mode: self.sync_mode,
            }),
        }
    }

    /// Validates storage configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.store_type {
            StorageType::Memory => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid(
                        "memory storage must not set path".to_string(),
                    ));
                }
                Ok(())
            }
            StorageType::Sqlite => {
                let path = self.path.as_ref().ok_or_else(|| {
                    ConfigError::Invalid("sqlite storage requires path".to_string())
                })?;
                validate_store_path(path)
            }
        }
    }
}

/// Storage backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    /// Volatile in-memory storage.
    #[default]
    #[serde(alias = "volatile")]
    Memory,
    /// Durable `SQLite`-backed storage.
    #[serde(alias = "durable")]
    Sqlite,
}

impl StorageType {
    /// Returns the canonical config label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Listeners Config
// ============================================================================

/// Built-in listener toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListenersConfig {
    /// Write a JSON-lines lifecycle log to stderr.
    pub log: bool,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    check_path_lengths(path, "config path")
}

/// Validates the storage path against length limits.
fn validate_store_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid("storage path must be non-empty".to_string()));
    }
    check_path_lengths(path, "storage path")
}

/// Rejects paths whose total or per-component length exceeds the limits.
fn check_path_lengths(path: &Path, field: &str) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} component too long")));
        }
    }
    Ok(())
}

/// Requires `1 <= value <= max`.
fn check_range(field: &str, value: usize, max: usize) -> Result<(), ConfigError> {
    if value == 0 || value > max {
        return Err(ConfigError::Invalid(format!("{field} must be between 1 and {max}")));
    }
    Ok(())
}
