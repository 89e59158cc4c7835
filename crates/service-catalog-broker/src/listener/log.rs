// crates/service-catalog-broker/src/listener/log.rs
// ============================================================================
// Module: Service Catalog Log Listener
// Description: JSON-lines audit log of catalog mutations.
// Purpose: Persist one record per committed mutation.
// Dependencies: serde, serde_json, service-catalog-core, std
// ============================================================================

//! ## Overview
//! `LogListener` writes one JSON object per line for each committed mutation.
//! The record carries the event kind, id, and timestamps, plus the full entry
//! when constructed with [`LogListener::with_entries`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use serde::Serialize;
use service_catalog_core::Entry;
use service_catalog_core::EntryId;
use service_catalog_core::LifecycleKind;
use service_catalog_core::Listener;
use service_catalog_core::ListenerError;
use service_catalog_core::Timestamp;

use crate::event::CatalogEvent;

// ============================================================================
// SECTION: Log Record
// ============================================================================

/// One line of the lifecycle log.
#[derive(Serialize)]
struct LogRecord<'a> {
    /// Mutation kind.
    event: LifecycleKind,
    /// Affected entry id.
    id: &'a EntryId,
    /// Entry creation time.
    created: Timestamp,
    /// Entry last-update time.
    updated: Timestamp,
    /// Full entry body when enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    entry: Option<&'a Entry>,
    /// Pre-update entry body when enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    previous: Option<&'a Entry>,
}

// ============================================================================
// SECTION: Log Listener
// ============================================================================

/// JSON-lines lifecycle logger.
pub struct LogListener<W: Write + Send> {
    /// Output writer for log records.
    writer: Mutex<W>,
    /// Listener name reported to the fan-out.
    name: String,
    /// Whether records embed the full entry body.
    include_entries: bool,
}

impl<W: Write + Send> LogListener<W> {
    /// Creates a log listener that records ids and timestamps only.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            name: "log".to_string(),
            include_entries: false,
        }
    }

    /// Creates a log listener that embeds the full entry in each record.
    pub fn with_entries(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            name: "log".to_string(),
            include_entries: true,
        }
    }

    /// Overrides the listener name used in fan-out diagnostics.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Appends one record line to the writer.
    fn write(&self, event: &CatalogEvent) -> Result<(), ListenerError> {
        let record = LogRecord {
            event: event.kind,
            id: &event.id,
            created: event.entry.created_at,
            updated: event.entry.updated_at,
            entry: self.include_entries.then_some(&event.entry),
            previous: event.previous.as_ref().filter(|_| self.include_entries),
        };
        let mut guard = self
            .writer
            .lock()
            .map_err(|_| ListenerError::LogWriteFailed("log writer mutex poisoned".to_string()))?;
        serde_json::to_writer(&mut *guard, &record)
            .map_err(|err| ListenerError::LogWriteFailed(err.to_string()))?;
        guard.write_all(b"\n").map_err(|err| ListenerError::LogWriteFailed(err.to_string()))?;
        guard.flush().map_err(|err| ListenerError::LogWriteFailed(err.to_string()))?;
        drop(guard);
        Ok(())
    }
}

impl<W: Write + Send> Listener for LogListener<W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_create(&self, entry: &Entry) -> Result<(), ListenerError> {
        self.write(&CatalogEvent::created(entry))
    }

    fn on_update(&self, previous: &Entry, current: &Entry) -> Result<(), ListenerError> {
        self.write(&CatalogEvent::updated(previous, current))
    }

    fn on_delete(&self, entry: &Entry) -> Result<(), ListenerError> {
        self.write(&CatalogEvent::deleted(entry))
    }
}
