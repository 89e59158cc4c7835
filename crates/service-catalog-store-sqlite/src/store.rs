// crates/service-catalog-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Catalog Storage
// Description: Durable catalog Storage backed by SQLite.
// Purpose: Persist entries byte-for-byte with integrity checks.
// Dependencies: service-catalog-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`Storage`] using `SQLite`. Each put
//! writes the entry's JSON exactly as `serde_json` renders it, together with
//! a digest of those bytes; loads recompute the digest and fail closed on
//! mismatch. Number forms are kept as submitted (`1.0` stays a float), so
//! a loaded entry equals the one that was put.
//!
//! Ordering: the `id` column uses `COLLATE BINARY`, which compares UTF-8
//! bytes with `memcmp`. That is the same order as [`EntryId`]'s `Ord`.
//!
//! Security posture: database contents are untrusted.

// ============================================================================//
// SECTION: Imports
// ============================================================================//

use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;

use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use serde::Serialize;
use service_catalog_core::DEFAULT_HASH_ALGORITHM;
use service_catalog_core::Entry;
use service_catalog_core::EntryId;
use service_catalog_core::HashAlgorithm;
use service_catalog_core::Storage;
use service_catalog_core::StoreError;
use service_catalog_core::hash_bytes;
use thiserror::Error;

// ============================================================================//
// SECTION: Constants
// ============================================================================//

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum stored entry size, including id and timestamps.
pub const MAX_STORED_ENTRY_BYTES: usize = 8 * 1024 * 1024;

// ============================================================================//
// SECTION: Config
// ============================================================================//

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` catalog storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Creates a configuration with default tuning for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================//
// SECTION: Errors
// ============================================================================//

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// The store has been closed.
    #[error("sqlite store is closed")]
    Closed,
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store corruption or hash mismatch.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Entry payload exceeded the size limit.
    #[error("sqlite store payload too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual payload size in bytes.
        actual_bytes: usize,
    },
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Closed => Self::Closed,
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::TooLarge {
                max_bytes,
                actual_bytes,
            } => Self::Invalid(format!(
                "entry_json exceeds size limit: {actual_bytes} bytes (max {max_bytes})"
            )),
        }
    }
}

/// Maps an engine error into [`SqliteStoreError::Db`].
#[allow(clippy::needless_pass_by_value, reason = "Used as a map_err function pointer.")]
fn db_error(err: rusqlite::Error) -> SqliteStoreError {
    SqliteStoreError::Db(err.to_string())
}

// ============================================================================//
// SECTION: Store
// ============================================================================//

/// Raw row as read from the `entries` table.
struct StoredRow {
    /// Row key.
    id: String,
    /// Entry JSON as written by `serde_json`.
    entry_json: Vec<u8>,
    /// Hex digest of `entry_json`.
    entry_hash: String,
    /// Digest algorithm label.
    hash_algorithm: String,
}

/// `SQLite`-backed catalog storage.
pub struct SqliteStorage {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Connection guarded by a mutex; `None` once closed.
    connection: Mutex<Option<Connection>>,
}

impl SqliteStorage {
    /// Opens (or creates) an `SQLite`-backed catalog storage.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn open(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        tracing::debug!(path = %config.path.display(), "sqlite catalog storage opened");
        Ok(Self {
            config,
            connection: Mutex::new(Some(connection)),
        })
    }

    /// Returns the store configuration.
    #[must_use]
    pub const fn config(&self) -> &SqliteStoreConfig {
        &self.config
    }

    /// Locks the connection slot.
    fn lock(&self) -> Result<MutexGuard<'_, Option<Connection>>, SqliteStoreError> {
        self.connection.lock().map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))
    }

    /// Loads one entry.
    fn load_entry(&self, id: &EntryId) -> Result<Option<Entry>, SqliteStoreError> {
        let row = {
            let guard = self.lock()?;
            let connection = guard.as_ref().ok_or(SqliteStoreError::Closed)?;
            select_row(connection, id)?
        };
        row.map(decode_row).transpose()
    }

    /// Writes one entry, replacing any existing row.
    fn save_entry(&self, entry: &Entry) -> Result<(), SqliteStoreError> {
        let entry_json =
            serde_json::to_vec(entry).map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        if entry_json.len() > MAX_STORED_ENTRY_BYTES {
            return Err(SqliteStoreError::TooLarge {
                max_bytes: MAX_STORED_ENTRY_BYTES,
                actual_bytes: entry_json.len(),
            });
        }
        let digest = hash_bytes(DEFAULT_HASH_ALGORITHM, &entry_json);
        let guard = self.lock()?;
        let connection = guard.as_ref().ok_or(SqliteStoreError::Closed)?;
        connection
            .execute(
                "INSERT INTO entries (id, entry_json, entry_hash, hash_algorithm) VALUES (?1, ?2, \
                 ?3, ?4) ON CONFLICT(id) DO UPDATE SET entry_json = excluded.entry_json, \
                 entry_hash = excluded.entry_hash, hash_algorithm = excluded.hash_algorithm",
                params![entry.id.as_str(), entry_json, digest.value, digest.algorithm.label()],
            )
            .map_err(db_error)?;
        Ok(())
    }

    /// Removes one entry, returning the removed value.
    fn remove_entry(&self, id: &EntryId) -> Result<Option<Entry>, SqliteStoreError> {
        let row = {
            let mut guard = self.lock()?;
            let connection = guard.as_mut().ok_or(SqliteStoreError::Closed)?;
            let tx = connection.transaction().map_err(db_error)?;
            let row = select_row(&tx, id)?;
            if row.is_some() {
                tx.execute("DELETE FROM entries WHERE id = ?1", params![id.as_str()])
                    .map_err(db_error)?;
            }
            tx.commit().map_err(db_error)?;
            row
        };
        row.map(decode_row).transpose()
    }

    /// Runs a multi-row query and decodes the results.
    fn query_entries(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Entry>, SqliteStoreError> {
        let rows = {
            let guard = self.lock()?;
            let connection = guard.as_ref().ok_or(SqliteStoreError::Closed)?;
            let mut statement = connection.prepare(sql).map_err(db_error)?;
            let mapped = statement.query_map(params, read_row).map_err(db_error)?;
            let mut rows = Vec::new();
            for row in mapped {
                rows.push(row.map_err(db_error)?);
            }
            rows
        };
        rows.into_iter().map(decode_row).collect()
    }

    /// Counts stored entries.
    fn count_entries(&self) -> Result<usize, SqliteStoreError> {
        let guard = self.lock()?;
        let connection = guard.as_ref().ok_or(SqliteStoreError::Closed)?;
        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM entries", params![], |row| row.get(0))
            .map_err(db_error)?;
        usize::try_from(count)
            .map_err(|_| SqliteStoreError::Corrupt(format!("invalid entry count: {count}")))
    }

    /// Closes the connection.
    fn close_connection(&self) -> Result<(), SqliteStoreError> {
        let mut guard = self.lock()?;
        let Some(connection) = guard.take() else {
            return Ok(());
        };
        connection.close().map_err(|(_, err)| db_error(err))?;
        tracing::debug!(path = %self.config.path.display(), "sqlite catalog storage closed");
        Ok(())
    }
}

impl Storage for SqliteStorage {
    fn get(&self, id: &EntryId) -> Result<Option<Entry>, StoreError> {
        self.load_entry(id).map_err(StoreError::from)
    }

    fn put(&self, entry: &Entry) -> Result<(), StoreError> {
        self.save_entry(entry).map_err(StoreError::from)
    }

    fn delete(&self, id: &EntryId) -> Result<Option<Entry>, StoreError> {
        self.remove_entry(id).map_err(StoreError::from)
    }

    fn iterate(
        &self,
        start_after: Option<&EntryId>,
        limit: usize,
    ) -> Result<Vec<Entry>, StoreError> {
        if limit == 0 {
            return self.count().map(|_| Vec::new());
        }
        let limit = sql_limit(limit);
        let result = match start_after {
            Some(start) => self.query_entries(
                "SELECT id, entry_json, entry_hash, hash_algorithm FROM entries WHERE id > ?1 \
                 ORDER BY id LIMIT ?2",
                params![start.as_str(), limit],
            ),
            None => self.query_entries(
                "SELECT id, entry_json, entry_hash, hash_algorithm FROM entries ORDER BY id \
                 LIMIT ?1",
                params![limit],
            ),
        };
        result.map_err(StoreError::from)
    }

    fn window(&self, offset: usize, limit: usize) -> Result<Vec<Entry>, StoreError> {
        if limit == 0 {
            return self.count().map(|_| Vec::new());
        }
        self.query_entries(
            "SELECT id, entry_json, entry_hash, hash_algorithm FROM entries ORDER BY id LIMIT ?1 \
             OFFSET ?2",
            params![sql_limit(limit), sql_limit(offset)],
        )
        .map_err(StoreError::from)
    }

    fn count(&self) -> Result<usize, StoreError> {
        self.count_entries().map_err(StoreError::from)
    }

    fn close(&self) -> Result<(), StoreError> {
        self.close_connection().map_err(StoreError::from)
    }
}

// ============================================================================//
// SECTION: Helpers
// ============================================================================//

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags).map_err(db_error)?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(db_error)?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(db_error)?;
    connection.busy_timeout(Duration::from_millis(config.busy_timeout_ms)).map_err(db_error)?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(db_error)?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(db_error)?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(db_error)?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(db_error)?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS entries (
                    id TEXT NOT NULL PRIMARY KEY COLLATE BINARY,
                    entry_json BLOB NOT NULL,
                    entry_hash TEXT NOT NULL,
                    hash_algorithm TEXT NOT NULL
                );",
            )
            .map_err(db_error)?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(db_error)?;
    Ok(())
}

/// Selects the raw row for `id`.
fn select_row(connection: &Connection, id: &EntryId) -> Result<Option<StoredRow>, SqliteStoreError> {
    let length: Option<i64> = connection
        .query_row(
            "SELECT length(entry_json) FROM entries WHERE id = ?1",
            params![id.as_str()],
            |row| row.get(0),
        )
        .optional()
        .map_err(db_error)?;
    let Some(length) = length else {
        return Ok(None);
    };
    let length = usize::try_from(length)
        .map_err(|_| SqliteStoreError::Corrupt(format!("negative entry length for {id}")))?;
    if length > MAX_STORED_ENTRY_BYTES {
        return Err(SqliteStoreError::TooLarge {
            max_bytes: MAX_STORED_ENTRY_BYTES,
            actual_bytes: length,
        });
    }
    connection
        .query_row(
            "SELECT id, entry_json, entry_hash, hash_algorithm FROM entries WHERE id = ?1",
            params![id.as_str()],
            read_row,
        )
        .optional()
        .map_err(db_error)
}

/// Reads a [`StoredRow`] from a result row.
fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredRow> {
    Ok(StoredRow {
        id: row.get(0)?,
        entry_json: row.get(1)?,
        entry_hash: row.get(2)?,
        hash_algorithm: row.get(3)?,
    })
}

/// Verifies and decodes a stored row.
fn decode_row(row: StoredRow) -> Result<Entry, SqliteStoreError> {
    let algorithm = HashAlgorithm::from_label(&row.hash_algorithm).ok_or_else(|| {
        SqliteStoreError::Invalid(format!("unsupported hash algorithm: {}", row.hash_algorithm))
    })?;
    let expected = hash_bytes(algorithm, &row.entry_json);
    if expected.value != row.entry_hash {
        return Err(SqliteStoreError::Corrupt(format!("hash mismatch for entry {}", row.id)));
    }
    let entry: Entry = serde_json::from_slice(&row.entry_json)
        .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
    if entry.id.as_str() != row.id {
        return Err(SqliteStoreError::Invalid(
            "entry id mismatch between key and payload".to_string(),
        ));
    }
    Ok(entry)
}

/// Clamps a `usize` into an `SQLite` integer parameter.
fn sql_limit(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
