// crates/service-catalog-core/src/core/entry.rs
// ============================================================================
// Module: Service Catalog Entry Model
// Description: Stored catalog entries and caller-supplied registrations.
// Purpose: Define the record shape shared by storage, controller, and wire.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! An [`Entry`] is a registered service description: an id, a free-form
//! attribute document, and engine-owned timestamps. A [`Registration`] is the
//! candidate a caller submits; it carries no trusted timestamps.
//!
//! On the wire an entry is a single flat JSON object:
//! `{"id": ..., <attributes>, "created": ..., "updated": ...}`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::core::identifiers::EntryId;
use crate::core::timestamp::Timestamp;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Wire key holding the entry id.
pub const ID_KEY: &str = "id";
/// Wire key holding the creation timestamp.
pub const CREATED_KEY: &str = "created";
/// Wire key holding the last-update timestamp.
pub const UPDATED_KEY: &str = "updated";
/// Keys that attribute documents may not define.
pub const RESERVED_KEYS: [&str; 3] = [ID_KEY, CREATED_KEY, UPDATED_KEY];

// ============================================================================
// SECTION: Types
// ============================================================================

/// Free-form attribute document of an entry.
pub type Attributes = Map<String, Value>;

/// A stored catalog entry.
///
/// # Invariants
/// - `created_at <= updated_at`.
/// - `attributes` never contains a key from [`RESERVED_KEYS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique entry id.
    pub id: EntryId,
    /// Caller-defined attributes.
    #[serde(flatten)]
    pub attributes: Attributes,
    /// Time of first registration.
    #[serde(rename = "created")]
    pub created_at: Timestamp,
    /// Time of the most recent successful write.
    #[serde(rename = "updated")]
    pub updated_at: Timestamp,
}

impl Entry {
    /// Returns the top-level attribute value for `key`.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

/// Caller-supplied candidate entry.
///
/// An empty `id` means "unset". Any `created`/`updated` keys the caller sends
/// are discarded by [`Registration::into_parts`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    /// Requested id, or empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Caller-defined attributes.
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Registration {
    /// Creates a registration without an id.
    #[must_use]
    pub const fn new(attributes: Attributes) -> Self {
        Self {
            id: String::new(),
            attributes,
        }
    }

    /// Creates a registration that requests a specific id.
    #[must_use]
    pub fn with_id(id: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }

    /// Splits into the requested id and attributes, dropping engine-owned
    /// timestamp keys.
    #[must_use]
    pub fn into_parts(self) -> (String, Attributes) {
        let mut attributes = self.attributes;
        attributes.remove(CREATED_KEY);
        attributes.remove(UPDATED_KEY);
        (self.id, attributes)
    }
}
