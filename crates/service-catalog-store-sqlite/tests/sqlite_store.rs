// crates/service-catalog-store-sqlite/tests/sqlite_store.rs
// ============================================================================
// Module: SQLite Storage Tests
// Description: Validate SQLite catalog Storage behavior.
// Purpose: Ensure durable persistence, ordering, and integrity checks.
// Dependencies: service-catalog-store-sqlite, service-catalog-core, rusqlite, tempfile
// ============================================================================

//! ## Overview
//! Conformance tests for the SQLite-backed catalog storage, including
//! tampered rows and schema version drift.

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

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use service_catalog_core::Attributes;
use service_catalog_core::Entry;
use service_catalog_core::EntryId;
use service_catalog_core::Storage;
use service_catalog_core::StoreError;
use service_catalog_core::Timestamp;
use service_catalog_store_sqlite::SqliteStorage;
use service_catalog_store_sqlite::SqliteStoreConfig;
use service_catalog_store_sqlite::SqliteStoreError;
use service_catalog_store_sqlite::SqliteStoreMode;
use service_catalog_store_sqlite::SqliteSyncMode;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn sample_entry(id: &str) -> Entry {
    let mut attributes = Attributes::new();
    attributes.insert("type".to_string(), json!("service"));
    attributes.insert("meta".to_string(), json!({"owner": id, "ports": [80, 443]}));
    Entry {
        id: EntryId::new(id),
        attributes,
        created_at: Timestamp::from_unix_millis(1_700_000_000_000),
        updated_at: Timestamp::from_unix_millis(1_700_000_000_500),
    }
}

fn store_for(path: &Path) -> SqliteStorage {
    SqliteStorage::open(SqliteStoreConfig::new(path)).unwrap()
}

fn ids(entries: &[Entry]) -> Vec<String> {
    entries.iter().map(|entry| entry.id.to_string()).collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn sqlite_storage_roundtrip() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("catalog.sqlite"));
    let entry = sample_entry("gw1/svc");
    assert_eq!(store.get(&entry.id).unwrap(), None);
    store.put(&entry).unwrap();
    assert_eq!(store.get(&entry.id).unwrap(), Some(entry.clone()));
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn sqlite_storage_keeps_number_forms() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("catalog.sqlite"));
    let mut entry = sample_entry("svc");
    entry.attributes.insert("weight".to_string(), json!(1.0));
    entry.attributes.insert("ratio".to_string(), json!(0.25));
    entry.attributes.insert("limits".to_string(), json!({"max": 2.0, "min": -3, "big": 1e300}));
    store.put(&entry).unwrap();

    let loaded = store.get(&entry.id).unwrap().unwrap();
    assert_eq!(loaded, entry);
    assert!(loaded.attribute("weight").unwrap().is_f64());
    assert_eq!(loaded.attributes["limits"]["min"], json!(-3));
    assert_eq!(
        serde_json::to_string(&loaded).unwrap(),
        serde_json::to_string(&entry).unwrap()
    );
}

#[test]
fn sqlite_storage_put_replaces() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("catalog.sqlite"));
    let mut entry = sample_entry("svc");
    store.put(&entry).unwrap();
    entry.attributes.insert("type".to_string(), json!("replaced"));
    entry.updated_at = Timestamp::from_unix_millis(1_700_000_001_000);
    store.put(&entry).unwrap();
    assert_eq!(store.count().unwrap(), 1);
    assert_eq!(store.get(&entry.id).unwrap(), Some(entry));
}

#[test]
fn sqlite_storage_delete_returns_removed_entry() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("catalog.sqlite"));
    let entry = sample_entry("svc");
    store.put(&entry).unwrap();
    assert_eq!(store.delete(&entry.id).unwrap(), Some(entry.clone()));
    assert_eq!(store.delete(&entry.id).unwrap(), None);
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn sqlite_storage_persists_across_instances() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("catalog.sqlite");
    let entry = sample_entry("svc");
    {
        let store = store_for(&path);
        store.put(&entry).unwrap();
        store.close().unwrap();
    }
    let reopened = store_for(&path);
    assert_eq!(reopened.get(&entry.id).unwrap(), Some(entry));
}

#[test]
fn sqlite_storage_orders_ids_bytewise() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("catalog.sqlite"));
    for id in ["b", "a/z", "B", "a", "a/b", "é", "a0"] {
        store.put(&sample_entry(id)).unwrap();
    }
    assert_eq!(ids(&store.iterate(None, 100).unwrap()), ["B", "a", "a/b", "a/z", "a0", "b", "é"]);
    assert_eq!(ids(&store.iterate(Some(&EntryId::new("a/b")), 2).unwrap()), ["a/z", "a0"]);
    assert_eq!(ids(&store.window(2, 3).unwrap()), ["a/b", "a/z", "a0"]);
    assert!(store.window(7, 3).unwrap().is_empty());
    assert!(store.iterate(None, 0).unwrap().is_empty());
}

#[test]
fn sqlite_storage_rejects_use_after_close() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("catalog.sqlite"));
    let entry = sample_entry("svc");
    store.close().unwrap();
    store.close().unwrap();
    assert_eq!(store.get(&entry.id), Err(StoreError::Closed));
    assert_eq!(store.put(&entry), Err(StoreError::Closed));
    assert_eq!(store.delete(&entry.id), Err(StoreError::Closed));
    assert_eq!(store.iterate(None, 0), Err(StoreError::Closed));
    assert_eq!(store.window(0, 5), Err(StoreError::Closed));
    assert_eq!(store.count(), Err(StoreError::Closed));
}

#[test]
fn sqlite_storage_detects_corrupt_hash() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("catalog.sqlite");
    let store = store_for(&path);
    let entry = sample_entry("svc");
    store.put(&entry).unwrap();
    {
        let connection = rusqlite::Connection::open(&path).unwrap();
        connection
            .execute(
                "UPDATE entries SET entry_hash = 'bad' WHERE id = ?1",
                rusqlite::params![entry.id.as_str()],
            )
            .unwrap();
    }
    assert!(matches!(store.get(&entry.id), Err(StoreError::Corrupt(_))));
    assert!(matches!(store.iterate(None, 10), Err(StoreError::Corrupt(_))));
}

#[test]
fn sqlite_storage_rejects_invalid_hash_algorithm() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("catalog.sqlite");
    let store = store_for(&path);
    let entry = sample_entry("svc");
    store.put(&entry).unwrap();
    {
        let connection = rusqlite::Connection::open(&path).unwrap();
        connection
            .execute(
                "UPDATE entries SET hash_algorithm = 'md5' WHERE id = ?1",
                rusqlite::params![entry.id.as_str()],
            )
            .unwrap();
    }
    assert!(matches!(store.get(&entry.id), Err(StoreError::Invalid(_))));
}

#[test]
fn sqlite_storage_rejects_version_mismatch() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("catalog.sqlite");
    drop(store_for(&path));
    let connection = rusqlite::Connection::open(&path).unwrap();
    connection.execute("UPDATE store_meta SET version = 999", rusqlite::params![]).unwrap();
    drop(connection);
    let result = SqliteStorage::open(SqliteStoreConfig::new(&path));
    assert!(matches!(result, Err(SqliteStoreError::VersionMismatch(_))));
}

#[test]
fn sqlite_storage_rejects_directory_path() {
    let temp = TempDir::new().unwrap();
    let result = SqliteStorage::open(SqliteStoreConfig::new(temp.path()));
    assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
}

#[test]
fn sqlite_storage_rejects_overlong_path_component() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("x".repeat(300));
    let result = SqliteStorage::open(SqliteStoreConfig::new(path));
    assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
}

#[test]
fn sqlite_storage_honors_delete_journal_mode() {
    let temp = TempDir::new().unwrap();
    let config = SqliteStoreConfig {
        journal_mode: SqliteStoreMode::Delete,
        sync_mode: SqliteSyncMode::Normal,
        ..SqliteStoreConfig::new(temp.path().join("catalog.sqlite"))
    };
    let store = SqliteStorage::open(config).unwrap();
    store.put(&sample_entry("svc")).unwrap();
    assert_eq!(store.config().journal_mode, SqliteStoreMode::Delete);
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn sqlite_storage_allows_concurrent_puts() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(store_for(&temp.path().join("catalog.sqlite")));
    let handles: Vec<_> = (0 .. 4)
        .map(|worker| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for item in 0 .. 10 {
                    store.put(&sample_entry(&format!("w{worker}/item{item:02}"))).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(store.count().unwrap(), 40);
    let all = store.iterate(None, 100).unwrap();
    let mut sorted = ids(&all);
    sorted.sort();
    assert_eq!(ids(&all), sorted);
}
