// crates/service-catalog-core/src/core/identifiers.rs
// ============================================================================
// Module: Service Catalog Identifiers
// Description: Canonical entry identifier for catalog registrations.
// Purpose: Provide a strongly typed, serializable id with a stable byte order.
// Dependencies: serde, uuid
// ============================================================================

//! ## Overview
//! Entry identifiers are opaque UTF-8 strings. Hierarchical ids use `/` as a
//! segment separator (for example `gateway1/service2`). Ordering is byte-wise
//! lexicographic, which is the order every storage backend must iterate in.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Separator between hierarchical id segments.
pub const ID_SEGMENT_SEPARATOR: char = '/';

/// Entry identifier, unique across all live catalog entries.
///
/// # Invariants
/// - Opaque UTF-8 string; shape checks live in [`crate::core::validation`].
/// - `Ord` compares the underlying bytes, matching `SQLite` `BINARY` collation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Creates a new entry identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identifier (UUID v4, hyphenated).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the identifier is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntryId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for EntryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
