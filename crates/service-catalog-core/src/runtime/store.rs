// crates/service-catalog-core/src/runtime/store.rs
// ============================================================================
// Module: Service Catalog Volatile Storage
// Description: In-memory ordered storage and a shared storage handle.
// Purpose: Provide the non-durable backend and a cloneable trait-object wrapper.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`InMemoryStorage`] keeps entries in a `BTreeMap` keyed by [`EntryId`],
//! whose ordering is byte-wise on the id, so iteration order matches the
//! durable backend. Contents are lost on process exit.
//!
//! [`SharedStorage`] lets hosts hold any backend behind one cloneable type.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use crate::core::Entry;
use crate::core::EntryId;
use crate::interfaces::Storage;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Storage
// ============================================================================

/// Entry map; `None` once the storage is closed.
type EntryMap = Option<BTreeMap<EntryId, Entry>>;

/// Volatile in-memory storage.
#[derive(Debug)]
pub struct InMemoryStorage {
    /// Entries protected by a reader-writer lock.
    entries: RwLock<EntryMap>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Creates an empty, open storage.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: RwLock::new(Some(BTreeMap::new())),
        }
    }

    /// Acquires the read lock.
    fn read(&self) -> Result<RwLockReadGuard<'_, EntryMap>, StoreError> {
        self.entries
            .read()
            .map_err(|_| StoreError::Store("in-memory storage lock poisoned".to_string()))
    }

    /// Acquires the write lock.
    fn write(&self) -> Result<RwLockWriteGuard<'_, EntryMap>, StoreError> {
        self.entries
            .write()
            .map_err(|_| StoreError::Store("in-memory storage lock poisoned".to_string()))
    }
}

impl Storage for InMemoryStorage {
    fn get(&self, id: &EntryId) -> Result<Option<Entry>, StoreError> {
        let guard = self.read()?;
        let entries = guard.as_ref().ok_or(StoreError::Closed)?;
        Ok(entries.get(id).cloned())
    }

    fn put(&self, entry: &Entry) -> Result<(), StoreError> {
        let mut guard = self.write()?;
        let entries = guard.as_mut().ok_or(StoreError::Closed)?;
        entries.insert(entry.id.clone(), entry.clone());
        Ok(())
    }

    fn delete(&self, id: &EntryId) -> Result<Option<Entry>, StoreError> {
        let mut guard = self.write()?;
        let entries = guard.as_mut().ok_or(StoreError::Closed)?;
        Ok(entries.remove(id))
    }

    fn iterate(
        &self,
        start_after: Option<&EntryId>,
        limit: usize,
    ) -> Result<Vec<Entry>, StoreError> {
        let guard = self.read()?;
        let entries = guard.as_ref().ok_or(StoreError::Closed)?;
        let items = match start_after {
            Some(start) => entries
                .range::<EntryId, _>((Bound::Excluded(start), Bound::Unbounded))
                .map(|(_, entry)| entry.clone())
                .take(limit)
                .collect(),
            None => entries.values().take(limit).cloned().collect(),
        };
        Ok(items)
    }

    fn window(&self, offset: usize, limit: usize) -> Result<Vec<Entry>, StoreError> {
        let guard = self.read()?;
        let entries = guard.as_ref().ok_or(StoreError::Closed)?;
        Ok(entries.values().skip(offset).take(limit).cloned().collect())
    }

    fn count(&self) -> Result<usize, StoreError> {
        let guard = self.read()?;
        let entries = guard.as_ref().ok_or(StoreError::Closed)?;
        Ok(entries.len())
    }

    fn close(&self) -> Result<(), StoreError> {
        let mut guard = self.write()?;
        *guard = None;
        Ok(())
    }
}

// ============================================================================
// SECTION: Shared Storage
// ============================================================================

/// Cloneable handle over any storage backend.
#[derive(Clone)]
pub struct SharedStorage {
    /// Backend behind an `Arc`.
    inner: Arc<dyn Storage>,
}

impl SharedStorage {
    /// Wraps a storage backend.
    #[must_use]
    pub fn from_storage(storage: impl Storage + 'static) -> Self {
        Self {
            inner: Arc::new(storage),
        }
    }

    /// Wraps an existing shared backend.
    #[must_use]
    pub fn new(inner: Arc<dyn Storage>) -> Self {
        Self {
            inner,
        }
    }
}

impl Storage for SharedStorage {
    fn get(&self, id: &EntryId) -> Result<Option<Entry>, StoreError> {
        self.inner.get(id)
    }

    fn put(&self, entry: &Entry) -> Result<(), StoreError> {
        self.inner.put(entry)
    }

    fn delete(&self, id: &EntryId) -> Result<Option<Entry>, StoreError> {
        self.inner.delete(id)
    }

    fn iterate(
        &self,
        start_after: Option<&EntryId>,
        limit: usize,
    ) -> Result<Vec<Entry>, StoreError> {
        self.inner.iterate(start_after, limit)
    }

    fn window(&self, offset: usize, limit: usize) -> Result<Vec<Entry>, StoreError> {
        self.inner.window(offset, limit)
    }

    fn count(&self) -> Result<usize, StoreError> {
        self.inner.count()
    }

    fn close(&self) -> Result<(), StoreError> {
        self.inner.close()
    }
}
