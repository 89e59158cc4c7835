// crates/service-catalog-broker/src/listener/callback.rs
// ============================================================================
// Module: Service Catalog Callback Listener
// Description: Callback-based listener for synchronous delivery.
// Purpose: Invoke a user-provided function for each catalog event.
// Dependencies: service-catalog-core, std
// ============================================================================

//! ## Overview
//! [`CallbackListener`] delivers events by invoking a user-supplied function on
//! the mutating caller's thread, after the mutation has been committed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use service_catalog_core::Entry;
use service_catalog_core::Listener;
use service_catalog_core::ListenerError;

use crate::event::CatalogEvent;

// ============================================================================
// SECTION: Callback Listener
// ============================================================================

/// Callback handler signature used by the listener.
type CallbackHandler = dyn Fn(&CatalogEvent) -> Result<(), ListenerError> + Send + Sync;

/// Callback-based catalog listener.
#[derive(Clone)]
pub struct CallbackListener {
    /// Handler invoked with each event.
    handler: Arc<CallbackHandler>,
    /// Listener name reported to the fan-out.
    name: String,
}

impl CallbackListener {
    /// Creates a named callback listener from a handler function.
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&CatalogEvent) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            name: name.into(),
        }
    }
}

impl Listener for CallbackListener {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_create(&self, entry: &Entry) -> Result<(), ListenerError> {
        (self.handler)(&CatalogEvent::created(entry))
    }

    fn on_update(&self, previous: &Entry, current: &Entry) -> Result<(), ListenerError> {
        (self.handler)(&CatalogEvent::updated(previous, current))
    }

    fn on_delete(&self, entry: &Entry) -> Result<(), ListenerError> {
        (self.handler)(&CatalogEvent::deleted(entry))
    }
}
