// crates/service-catalog-broker/src/event.rs
// ============================================================================
// Module: Service Catalog Events
// Description: Serializable record of one committed catalog mutation.
// Purpose: Give every reference listener the same event shape.
// Dependencies: serde, service-catalog-core
// ============================================================================

//! ## Overview
//! A [`CatalogEvent`] carries the mutation kind, the affected id, and the
//! entry state. Updates also carry the entry as it was before the write.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use service_catalog_core::Entry;
use service_catalog_core::EntryId;
use service_catalog_core::LifecycleKind;

// ============================================================================
// SECTION: Catalog Event
// ============================================================================

/// Committed catalog mutation as delivered to listeners.
///
/// # Invariants
/// - `entry.id == id` for every kind.
/// - `previous` is set only for [`LifecycleKind::Update`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEvent {
    /// Mutation kind.
    pub kind: LifecycleKind,
    /// Affected entry id.
    pub id: EntryId,
    /// Entry after the mutation; for deletes, the removed entry.
    pub entry: Entry,
    /// Entry before an update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<Entry>,
}

impl CatalogEvent {
    /// Builds a create event.
    #[must_use]
    pub fn created(entry: &Entry) -> Self {
        Self {
            kind: LifecycleKind::Create,
            id: entry.id.clone(),
            entry: entry.clone(),
            previous: None,
        }
    }

    /// Builds an update event.
    #[must_use]
    pub fn updated(previous: &Entry, current: &Entry) -> Self {
        Self {
            kind: LifecycleKind::Update,
            id: current.id.clone(),
            entry: current.clone(),
            previous: Some(previous.clone()),
        }
    }

    /// Builds a delete event.
    #[must_use]
    pub fn deleted(entry: &Entry) -> Self {
        Self {
            kind: LifecycleKind::Delete,
            id: entry.id.clone(),
            entry: entry.clone(),
            previous: None,
        }
    }
}
