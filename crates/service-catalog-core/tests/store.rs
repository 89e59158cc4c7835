// crates/service-catalog-core/tests/store.rs
// ============================================================================
// Module: Volatile Storage Tests
// Description: Tests for the in-memory storage backend.
// Purpose: Validate ordering, cursors, windows, and close semantics.
// Dependencies: service-catalog-core
// ============================================================================

//! ## Overview
//! Iteration must be byte-wise ordered on ids, and every operation after
//! `close` must fail with `StoreError::Closed`.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use serde_json::json;
use service_catalog_core::Attributes;
use service_catalog_core::Entry;
use service_catalog_core::EntryId;
use service_catalog_core::InMemoryStorage;
use service_catalog_core::SCAN_BATCH_SIZE;
use service_catalog_core::SharedStorage;
use service_catalog_core::Storage;
use service_catalog_core::StoreError;
use service_catalog_core::Timestamp;

fn sample_entry(id: &str) -> Entry {
    let mut attributes = Attributes::new();
    attributes.insert("name".to_string(), json!(id));
    Entry {
        id: EntryId::new(id),
        attributes,
        created_at: Timestamp::from_unix_millis(1),
        updated_at: Timestamp::from_unix_millis(2),
    }
}

fn ids(entries: &[Entry]) -> Vec<&str> {
    entries.iter().map(|entry| entry.id.as_str()).collect()
}

/// Storage that only implements `iterate`, exercising the default `window`.
struct IterateOnly(InMemoryStorage);

impl Storage for IterateOnly {
    fn get(&self, id: &EntryId) -> Result<Option<Entry>, StoreError> {
        self.0.get(id)
    }

    fn put(&self, entry: &Entry) -> Result<(), StoreError> {
        self.0.put(entry)
    }

    fn delete(&self, id: &EntryId) -> Result<Option<Entry>, StoreError> {
        self.0.delete(id)
    }

    fn iterate(
        &self,
        start_after: Option<&EntryId>,
        limit: usize,
    ) -> Result<Vec<Entry>, StoreError> {
        self.0.iterate(start_after, limit)
    }

    fn count(&self) -> Result<usize, StoreError> {
        self.0.count()
    }

    fn close(&self) -> Result<(), StoreError> {
        self.0.close()
    }
}

#[test]
fn put_get_delete_round_trip() {
    let store = InMemoryStorage::new();
    let entry = sample_entry("svc");
    assert_eq!(store.get(&entry.id).unwrap(), None);
    store.put(&entry).unwrap();
    assert_eq!(store.get(&entry.id).unwrap(), Some(entry.clone()));
    assert_eq!(store.count().unwrap(), 1);
    assert_eq!(store.delete(&entry.id).unwrap(), Some(entry.clone()));
    assert_eq!(store.delete(&entry.id).unwrap(), None);
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn put_replaces_existing_entry() {
    let store = InMemoryStorage::new();
    let mut entry = sample_entry("svc");
    store.put(&entry).unwrap();
    entry.attributes.insert("name".to_string(), json!("renamed"));
    store.put(&entry).unwrap();
    assert_eq!(store.count().unwrap(), 1);
    assert_eq!(store.get(&entry.id).unwrap().unwrap().attribute("name"), Some(&json!("renamed")));
}

#[test]
fn iteration_is_bytewise_ordered() {
    let store = InMemoryStorage::new();
    for id in ["b", "a/z", "B", "a", "a/b", "é", "a0"] {
        store.put(&sample_entry(id)).unwrap();
    }
    let all = store.iterate(None, 100).unwrap();
    assert_eq!(ids(&all), vec!["B", "a", "a/b", "a/z", "a0", "b", "é"]);

    let after = store.iterate(Some(&EntryId::new("a/b")), 2).unwrap();
    assert_eq!(ids(&after), vec!["a/z", "a0"]);
    let after_missing = store.iterate(Some(&EntryId::new("a1")), 10).unwrap();
    assert_eq!(ids(&after_missing), vec!["b", "é"]);
    assert!(store.iterate(None, 0).unwrap().is_empty());
}

#[test]
fn native_and_default_windows_agree() {
    let native = InMemoryStorage::new();
    let fallback = IterateOnly(InMemoryStorage::new());
    let total = SCAN_BATCH_SIZE * 2 + 17;
    for index in 0 .. total {
        let entry = sample_entry(&format!("svc-{index:05}"));
        native.put(&entry).unwrap();
        fallback.put(&entry).unwrap();
    }
    for (offset, limit) in [(0, 10), (250, 20), (total - 5, 10), (total, 5), (3, 0)] {
        let expected = native.window(offset, limit).unwrap();
        let actual = fallback.window(offset, limit).unwrap();
        assert_eq!(ids(&expected), ids(&actual), "offset {offset} limit {limit}");
    }
    assert_eq!(native.window(total - 5, 10).unwrap().len(), 5);
}

#[test]
fn closed_storage_rejects_operations() {
    let store = SharedStorage::from_storage(InMemoryStorage::new());
    let entry = sample_entry("svc");
    store.put(&entry).unwrap();
    store.close().unwrap();
    store.close().unwrap();
    assert_eq!(store.get(&entry.id), Err(StoreError::Closed));
    assert_eq!(store.put(&entry), Err(StoreError::Closed));
    assert_eq!(store.delete(&entry.id), Err(StoreError::Closed));
    assert_eq!(store.iterate(None, 10), Err(StoreError::Closed));
    assert_eq!(store.window(0, 10), Err(StoreError::Closed));
    assert_eq!(store.count(), Err(StoreError::Closed));
}
