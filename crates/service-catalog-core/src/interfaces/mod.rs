// crates/service-catalog-core/src/interfaces/mod.rs
// ============================================================================
// Module: Service Catalog Interfaces
// Description: Backend-agnostic contracts for storage and change listeners.
// Purpose: Define the seams between the controller and its collaborators.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! The controller talks to persistence through [`Storage`] and announces
//! committed mutations through [`Listener`]. Implementations must be
//! thread-safe; the controller calls them from concurrent request handlers.
//!
//! Security posture: listener implementations run arbitrary host code; their
//! failures never abort a committed mutation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::Entry;
use crate::core::EntryId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Batch size used when a storage scans its ordered sequence in chunks.
pub const SCAN_BATCH_SIZE: usize = 256;

// ============================================================================
// SECTION: Storage
// ============================================================================

/// Storage errors.
///
/// Missing entries are reported as `Ok(None)`, not as an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The storage has been closed.
    #[error("catalog storage is closed")]
    Closed,
    /// Filesystem failure.
    #[error("catalog storage io error: {0}")]
    Io(String),
    /// Stored data failed an integrity check.
    #[error("catalog storage corruption: {0}")]
    Corrupt(String),
    /// On-disk schema version is not supported.
    #[error("catalog storage version mismatch: {0}")]
    VersionMismatch(String),
    /// Input rejected by the backend.
    #[error("catalog storage invalid data: {0}")]
    Invalid(String),
    /// Any other backend failure.
    #[error("catalog storage error: {0}")]
    Store(String),
}

/// Ordered entry storage.
///
/// # Invariants
/// - Iteration order is byte-wise lexicographic on [`EntryId`] for every
///   implementation.
/// - `put` replaces any entry with the same id.
/// - After `close`, every other operation returns [`StoreError::Closed`].
pub trait Storage: Send + Sync {
    /// Loads an entry by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend fails.
    fn get(&self, id: &EntryId) -> Result<Option<Entry>, StoreError>;

    /// Inserts or replaces an entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend fails.
    fn put(&self, entry: &Entry) -> Result<(), StoreError>;

    /// Removes an entry, returning it when it existed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend fails.
    fn delete(&self, id: &EntryId) -> Result<Option<Entry>, StoreError>;

    /// Returns up to `limit` entries whose id sorts strictly after
    /// `start_after` (or from the beginning when `None`).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend fails.
    fn iterate(&self, start_after: Option<&EntryId>, limit: usize)
    -> Result<Vec<Entry>, StoreError>;

    /// Returns the entries at ordered positions `offset..offset + limit`.
    ///
    /// The default walks [`Storage::iterate`] in batches; backends with a
    /// native offset should override it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend fails.
    fn window(&self, offset: usize, limit: usize) -> Result<Vec<Entry>, StoreError> {
        let mut out = Vec::new();
        if limit == 0 {
            return Ok(out);
        }
        let mut cursor: Option<EntryId> = None;
        let mut skipped = 0usize;
        loop {
            let batch = self.iterate(cursor.as_ref(), SCAN_BATCH_SIZE)?;
            let exhausted = batch.len() < SCAN_BATCH_SIZE;
            cursor = batch.last().map(|entry| entry.id.clone());
            for entry in batch {
                if skipped < offset {
                    skipped += 1;
                    continue;
                }
                out.push(entry);
                if out.len() == limit {
                    return Ok(out);
                }
            }
            if exhausted || cursor.is_none() {
                return Ok(out);
            }
        }
    }

    /// Returns the number of stored entries.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend fails.
    fn count(&self) -> Result<usize, StoreError>;

    /// Releases backend resources. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend fails to shut down cleanly.
    fn close(&self) -> Result<(), StoreError>;
}

// ============================================================================
// SECTION: Listeners
// ============================================================================

/// Listener delivery errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListenerError {
    /// The notification could not be delivered.
    #[error("listener delivery failed: {0}")]
    DeliveryFailed(String),
    /// The notification could not be written to a log.
    #[error("listener log write failed: {0}")]
    LogWriteFailed(String),
}

/// Observer of committed catalog mutations.
///
/// Calls happen after the storage write is durable and outside the
/// controller's write lock. Returned errors are logged and otherwise ignored.
pub trait Listener: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &str;

    /// Called after an entry is created.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError`] when delivery fails.
    fn on_create(&self, entry: &Entry) -> Result<(), ListenerError>;

    /// Called after an existing entry is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError`] when delivery fails.
    fn on_update(&self, previous: &Entry, current: &Entry) -> Result<(), ListenerError>;

    /// Called after an entry is deleted.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError`] when delivery fails.
    fn on_delete(&self, entry: &Entry) -> Result<(), ListenerError>;
}
