// crates/service-catalog-http/src/server.rs
// ============================================================================
// Module: Service Catalog Server
// Description: Configuration-driven assembly and serving of the catalog.
// Purpose: Build storage, listeners, and controller, then serve HTTP.
// Dependencies: service-catalog-config, service-catalog-store-sqlite, axum, tokio
// ============================================================================

//! ## Overview
//! [`CatalogServer::from_config`] opens the configured storage backend,
//! attaches the built-in listeners, and creates the controller. Serving binds
//! the configured address and runs until the shutdown future resolves; the
//! controller is stopped after the listener has drained.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::io;
use std::sync::Arc;

use axum::Router;
use service_catalog_broker::LogListener;
use service_catalog_config::CatalogConfig;
use service_catalog_config::StorageConfig;
use service_catalog_config::StorageType;
use service_catalog_core::CatalogController;
use service_catalog_core::InMemoryStorage;
use service_catalog_core::Listener;
use service_catalog_core::SharedStorage;
use service_catalog_core::Storage;
use service_catalog_store_sqlite::SqliteStorage;

use crate::api::ApiState;
use crate::api::router;

// ============================================================================
// SECTION: Catalog Server
// ============================================================================

/// Service catalog server instance.
pub struct CatalogServer {
    /// Server configuration.
    config: CatalogConfig,
    /// Catalog controller shared with handlers.
    controller: Arc<CatalogController>,
}

impl CatalogServer {
    /// Builds a server from configuration with only the configured listeners.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when configuration is invalid or storage fails
    /// to open.
    pub fn from_config(config: CatalogConfig) -> Result<Self, ServerError> {
        Self::with_listeners(config, Vec::new())
    }

    /// Builds a server with additional listeners appended after the
    /// configured ones.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when configuration is invalid or storage fails
    /// to open.
    pub fn with_listeners(
        config: CatalogConfig,
        extra: Vec<Arc<dyn Listener>>,
    ) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let storage = build_storage(&config.storage)?;
        let mut listeners: Vec<Arc<dyn Listener>> = Vec::new();
        if config.listeners.log {
            listeners.push(Arc::new(LogListener::new(io::stderr())));
        }
        listeners.extend(extra);
        let controller = match CatalogController::new(
            storage.clone(),
            listeners,
            config.catalog.controller_config(),
        ) {
            Ok(controller) => controller,
            Err(err) => {
                if let Err(close_err) = storage.close() {
                    tracing::warn!(error = %close_err, "storage close failed");
                }
                return Err(ServerError::Init(format!("failed to start the controller: {err}")));
            }
        };
        Ok(Self {
            config,
            controller: Arc::new(controller),
        })
    }

    /// Returns the catalog controller.
    #[must_use]
    pub fn controller(&self) -> Arc<CatalogController> {
        Arc::clone(&self.controller)
    }

    /// Returns the server configuration.
    #[must_use]
    pub const fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Builds the HTTP router for this server.
    #[must_use]
    pub fn router(&self) -> Router {
        let state = ApiState::new(self.controller(), &self.config.description);
        router(state, self.config.server.max_body_bytes)
    }

    /// Serves HTTP until `shutdown` resolves, then stops the controller.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails. The controller
    /// is stopped in either case.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let served = self.serve_http(shutdown).await;
        let stopped = self
            .controller
            .stop()
            .map_err(|err| ServerError::Transport(format!("controller stop failed: {err}")));
        tracing::info!("service catalog stopped");
        served.and(stopped)
    }

    /// Binds the configured address and runs the HTTP server.
    async fn serve_http<F>(&self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr =
            self.config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|err| ServerError::Transport(format!("http bind failed: {err}")))?;
        let local = listener
            .local_addr()
            .map_err(|err| ServerError::Transport(format!("http bind failed: {err}")))?;
        tracing::info!(
            addr = %local,
            storage = %self.config.storage.store_type,
            description = %self.config.description,
            "service catalog listening"
        );
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|err| ServerError::Transport(format!("http server failed: {err}")))
    }
}

/// Builds the catalog storage from configuration.
///
/// # Errors
///
/// Returns [`ServerError`] when the durable backend cannot be opened.
pub fn build_storage(config: &StorageConfig) -> Result<SharedStorage, ServerError> {
    let storage = match config.store_type {
        StorageType::Memory => SharedStorage::from_storage(InMemoryStorage::new()),
        StorageType::Sqlite => {
            let sqlite_config = config.sqlite_config().ok_or_else(|| {
                ServerError::Config("sqlite storage requires path".to_string())
            })?;
            let store = SqliteStorage::open(sqlite_config)
                .map_err(|err| ServerError::Init(format!("failed to open sqlite storage: {err}")))?;
            SharedStorage::from_storage(store)
        }
    };
    tracing::debug!(storage = %config.store_type, "catalog storage ready");
    Ok(storage)
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Catalog server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}
