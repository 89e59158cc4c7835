// crates/service-catalog-broker/src/listener/channel.rs
// ============================================================================
// Module: Service Catalog Channel Listener
// Description: Channel-based listener for asynchronous consumers.
// Purpose: Send catalog events through a bounded Tokio mpsc channel.
// Dependencies: service-catalog-core, tokio
// ============================================================================

//! ## Overview
//! [`ChannelListener`] enqueues each committed mutation as a
//! [`CatalogEvent`] on a `tokio::sync::mpsc` channel. This is the hand-off
//! point for a publish/subscribe republisher running on its own task.
//! Invariants:
//! - Successful deliveries enqueue exactly one event.
//! - A full or closed channel is a delivery failure; the listener never blocks
//!   the mutating caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use service_catalog_core::Entry;
use service_catalog_core::Listener;
use service_catalog_core::ListenerError;
use tokio::sync::mpsc::Sender;
use tokio::sync::mpsc::error::TrySendError;

use crate::event::CatalogEvent;

// ============================================================================
// SECTION: Channel Listener
// ============================================================================

/// Channel-based catalog listener.
#[derive(Debug, Clone)]
pub struct ChannelListener {
    /// Sender used to publish events.
    sender: Sender<CatalogEvent>,
    /// Listener name reported to the fan-out.
    name: String,
}

impl ChannelListener {
    /// Creates a channel listener with the default name.
    #[must_use]
    pub fn new(sender: Sender<CatalogEvent>) -> Self {
        Self {
            sender,
            name: "channel".to_string(),
        }
    }

    /// Creates a channel listener with a custom name.
    #[must_use]
    pub fn with_name(sender: Sender<CatalogEvent>, name: impl Into<String>) -> Self {
        Self {
            sender,
            name: name.into(),
        }
    }

    /// Enqueues an event without waiting for capacity.
    fn send(&self, event: CatalogEvent) -> Result<(), ListenerError> {
        self.sender.try_send(event).map_err(|err| match err {
            TrySendError::Full(event) => ListenerError::DeliveryFailed(format!(
                "channel full; dropped {} event for {}",
                event.kind, event.id
            )),
            TrySendError::Closed(_) => {
                ListenerError::DeliveryFailed("channel receiver closed".to_string())
            }
        })
    }
}

impl Listener for ChannelListener {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_create(&self, entry: &Entry) -> Result<(), ListenerError> {
        self.send(CatalogEvent::created(entry))
    }

    fn on_update(&self, previous: &Entry, current: &Entry) -> Result<(), ListenerError> {
        self.send(CatalogEvent::updated(previous, current))
    }

    fn on_delete(&self, entry: &Entry) -> Result<(), ListenerError> {
        self.send(CatalogEvent::deleted(entry))
    }
}
