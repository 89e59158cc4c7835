// crates/service-catalog-core/src/runtime/controller.rs
// ============================================================================
// Module: Service Catalog Controller
// Description: Catalog operations over a storage backend and listeners.
// Purpose: Enforce id, timestamp, and notification rules for every mutation.
// Dependencies: crate::core, crate::interfaces, crate::runtime, tracing
// ============================================================================

//! ## Overview
//! [`CatalogController`] is the single entry point for catalog reads and
//! writes. Mutations validate first, then run check-then-write under one
//! controller-wide lock so concurrent upserts and deletes stay linearizable.
//! Each mutation queues its notification before releasing the lock and
//! delivers after releasing it, so listeners observe commits in order without
//! stalling other writers. Listener failures never change the operation's
//! result.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use crate::core::Clock;
use crate::core::Entry;
use crate::core::EntryId;
use crate::core::Registration;
use crate::core::SystemClock;
use crate::core::ValidationLimits;
use crate::core::validate_attributes;
use crate::core::validate_entry_id;
use crate::interfaces::Listener;
use crate::interfaces::SCAN_BATCH_SIZE;
use crate::interfaces::Storage;
use crate::runtime::error::CatalogError;
use crate::runtime::fanout::ListenerSet;
use crate::runtime::fanout::Notification;
use crate::runtime::filter::FilterQuery;
use crate::runtime::pagination::DEFAULT_MAX_PER_PAGE;
use crate::runtime::pagination::EntryPage;
use crate::runtime::pagination::PageRequest;
use crate::runtime::store::SharedStorage;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Attempts at drawing an unused random id before giving up.
pub const MAX_ID_ATTEMPTS: usize = 8;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Controller settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Upper bound for `per_page`.
    pub max_per_page: usize,
    /// Registration limits.
    pub validation: ValidationLimits,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_per_page: DEFAULT_MAX_PER_PAGE,
            validation: ValidationLimits::default(),
        }
    }
}

/// Result of an upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No entry existed; one was created under the addressed id.
    Created(EntryId),
    /// An existing entry was replaced.
    Updated,
}

impl UpdateOutcome {
    /// Returns true when the upsert created a new entry.
    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

// ============================================================================
// SECTION: Controller
// ============================================================================

/// Catalog controller.
///
/// # Invariants
/// - Ids are unique among live entries.
/// - `created` is fixed at first registration; `updated` never decreases.
/// - Listener calls happen only after a successful storage write, in the
///   order the writes were committed.
pub struct CatalogController {
    /// Storage backend.
    storage: SharedStorage,
    /// Change listeners.
    listeners: ListenerSet,
    /// Controller settings.
    config: ControllerConfig,
    /// Time source for entry stamps.
    clock: Arc<dyn Clock>,
    /// Serializes check-then-write sequences.
    write_lock: Mutex<()>,
    /// Set once [`CatalogController::stop`] runs.
    stopped: AtomicBool,
}

impl CatalogController {
    /// Creates a controller over `storage`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidArgument`] when the configuration is
    /// unusable.
    pub fn new(
        storage: SharedStorage,
        listeners: Vec<Arc<dyn Listener>>,
        config: ControllerConfig,
    ) -> Result<Self, CatalogError> {
        if config.max_per_page == 0 {
            return Err(CatalogError::InvalidArgument(
                "max_per_page must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            storage,
            listeners: ListenerSet::new(listeners),
            config,
            clock: Arc::new(SystemClock),
            write_lock: Mutex::new(()),
            stopped: AtomicBool::new(false),
        })
    }

    /// Replaces the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the controller settings.
    #[must_use]
    pub const fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Returns one page of all entries in id order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidArgument`] for bad paging values and
    /// [`CatalogError::Internal`] for storage failures.
    pub fn list(&self, page: usize, per_page: usize) -> Result<EntryPage, CatalogError> {
        let request = PageRequest::new(page, per_page).validate(self.config.max_per_page)?;
        self.ensure_running()?;
        let total = self.storage.count()?;
        let window = request.window(total);
        let entries = if window.is_empty() {
            Vec::new()
        } else {
            self.storage.window(window.start, window.len())?
        };
        Ok(EntryPage {
            entries,
            page,
            per_page,
            total,
        })
    }

    /// Returns one page of the entries matching a filter, in id order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidArgument`] for unknown operators, bad
    /// paths, or bad paging values, and [`CatalogError::Internal`] for
    /// storage failures.
    pub fn filter(
        &self,
        path: &str,
        operator: &str,
        value: &str,
        page: usize,
        per_page: usize,
    ) -> Result<EntryPage, CatalogError> {
        let query = FilterQuery::parse(path, operator, value)?;
        let request = PageRequest::new(page, per_page).validate(self.config.max_per_page)?;
        self.ensure_running()?;
        let mut matches = self.scan(|entry| query.matches(entry))?;
        let total = matches.len();
        let entries = matches.drain(request.window(total)).collect();
        Ok(EntryPage {
            entries,
            page,
            per_page,
            total,
        })
    }

    /// Loads an entry by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when no entry has `id`.
    pub fn get(&self, id: &EntryId) -> Result<Entry, CatalogError> {
        self.ensure_running()?;
        self.storage.get(id)?.ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Registers a new entry under a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::BadRequest`] when the registration carries an
    /// id or fails validation, and [`CatalogError::Conflict`] when no unused
    /// id could be drawn.
    pub fn add(&self, registration: Registration) -> Result<EntryId, CatalogError> {
        let (requested_id, attributes) = registration.into_parts();
        if !requested_id.is_empty() {
            return Err(CatalogError::BadRequest(
                "creating an entry with a predefined id is not allowed; use update".to_string(),
            ));
        }
        validate_attributes(&attributes, &self.config.validation)?;

        let id = {
            let _guard = self.lock_writes()?;
            self.ensure_running()?;
            let id = self.assign_id()?;
            let now = self.clock.now();
            let entry = Entry {
                id,
                attributes,
                created_at: now,
                updated_at: now,
            };
            self.storage.put(&entry)?;
            let id = entry.id.clone();
            self.listeners.enqueue(Notification::Created(entry));
            id
        };

        tracing::debug!(entry_id = %id, "catalog entry created");
        self.listeners.flush();
        Ok(id)
    }

    /// Replaces the entry at `id`, creating it when absent.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::BadRequest`] when the body id disagrees with
    /// `id`, or when the id or attributes fail validation.
    pub fn update(
        &self,
        id: &EntryId,
        registration: Registration,
    ) -> Result<UpdateOutcome, CatalogError> {
        let (requested_id, attributes) = registration.into_parts();
        if !requested_id.is_empty() && requested_id != id.as_str() {
            return Err(CatalogError::BadRequest(format!(
                "entry id in body ({requested_id}) does not match addressed id ({id})"
            )));
        }
        validate_entry_id(id.as_str(), &self.config.validation)?;
        validate_attributes(&attributes, &self.config.validation)?;

        let outcome = {
            let _guard = self.lock_writes()?;
            self.ensure_running()?;
            let now = self.clock.now();
            let previous = self.storage.get(id)?;
            let current = match &previous {
                Some(existing) => Entry {
                    id: existing.id.clone(),
                    attributes,
                    created_at: existing.created_at,
                    updated_at: now.max(existing.updated_at),
                },
                None => Entry {
                    id: id.clone(),
                    attributes,
                    created_at: now,
                    updated_at: now,
                },
            };
            self.storage.put(&current)?;
            if let Some(previous) = previous {
                self.listeners.enqueue(Notification::Updated {
                    previous,
                    current,
                });
                UpdateOutcome::Updated
            } else {
                let id = current.id.clone();
                self.listeners.enqueue(Notification::Created(current));
                UpdateOutcome::Created(id)
            }
        };

        if outcome.is_created() {
            tracing::debug!(entry_id = %id, "catalog entry created by update");
        } else {
            tracing::debug!(entry_id = %id, "catalog entry updated");
        }
        self.listeners.flush();
        Ok(outcome)
    }

    /// Removes the entry at `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when no entry has `id`.
    pub fn delete(&self, id: &EntryId) -> Result<(), CatalogError> {
        {
            let _guard = self.lock_writes()?;
            self.ensure_running()?;
            let Some(removed) = self.storage.delete(id)? else {
                return Err(CatalogError::NotFound(id.to_string()));
            };
            self.listeners.enqueue(Notification::Deleted(removed));
        }
        tracing::debug!(entry_id = %id, "catalog entry deleted");
        self.listeners.flush();
        Ok(())
    }

    /// Stops the controller and closes its storage. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Internal`] when the storage fails to close.
    pub fn stop(&self) -> Result<(), CatalogError> {
        let _guard = self.lock_writes()?;
        if self.stopped.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        tracing::info!("catalog controller stopping");
        self.storage.close()?;
        Ok(())
    }

    /// Fails once the controller has been stopped.
    fn ensure_running(&self) -> Result<(), CatalogError> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(CatalogError::Internal("catalog controller is stopped".to_string()));
        }
        Ok(())
    }

    /// Acquires the controller-wide write lock.
    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>, CatalogError> {
        self.write_lock
            .lock()
            .map_err(|_| CatalogError::Internal("catalog write lock poisoned".to_string()))
    }

    /// Draws a random id not currently in use. Caller holds the write lock.
    fn assign_id(&self) -> Result<EntryId, CatalogError> {
        for _ in 0 .. MAX_ID_ATTEMPTS {
            let id = EntryId::generate();
            if self.storage.get(&id)?.is_none() {
                return Ok(id);
            }
            tracing::warn!(entry_id = %id, "generated entry id already in use; retrying");
        }
        Err(CatalogError::Conflict(format!(
            "could not assign an unused entry id after {MAX_ID_ATTEMPTS} attempts"
        )))
    }

    /// Collects every stored entry accepted by `keep`, in id order.
    fn scan<F>(&self, keep: F) -> Result<Vec<Entry>, CatalogError>
    where
        F: Fn(&Entry) -> bool,
    {
        let mut out = Vec::new();
        let mut cursor: Option<EntryId> = None;
        loop {
            let batch = self.storage.iterate(cursor.as_ref(), SCAN_BATCH_SIZE)?;
            let exhausted = batch.len() < SCAN_BATCH_SIZE;
            cursor = batch.last().map(|entry| entry.id.clone());
            out.extend(batch.into_iter().filter(|entry| keep(entry)));
            if exhausted || cursor.is_none() {
                return Ok(out);
            }
        }
    }
}
