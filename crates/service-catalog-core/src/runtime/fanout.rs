// crates/service-catalog-core/src/runtime/fanout.rs
// ============================================================================
// Module: Service Catalog Listener Fan-Out
// Description: Ordered delivery of committed mutations to listeners.
// Purpose: Notify every listener while isolating their failures.
// Dependencies: crate::interfaces, serde, tracing
// ============================================================================

//! ## Overview
//! The controller queues a [`Notification`] while it still holds its write
//! lock, so the queue order is the commit order. Delivery happens after the
//! lock is released: whichever caller finds the queue idle becomes the
//! drainer and delivers queued notifications, including ones queued by
//! other callers, until the queue is empty. Writers therefore never wait for
//! a slow listener, and every listener sees events in commit order.
//!
//! Listeners are invoked in registration order. An error or panic from one
//! listener is logged and does not stop delivery to the rest; the mutation
//! that triggered the event has already been committed and is never undone.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::VecDeque;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use serde::Deserialize;
use serde::Serialize;

use crate::core::Entry;
use crate::core::EntryId;
use crate::interfaces::Listener;
use crate::interfaces::ListenerError;

// ============================================================================
// SECTION: Events
// ============================================================================

/// Kind of committed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleKind {
    /// Entry created.
    Create,
    /// Existing entry replaced.
    Update,
    /// Entry removed.
    Delete,
}

impl LifecycleKind {
    /// Returns the stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for LifecycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A committed mutation awaiting delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// An entry was created.
    Created(Entry),
    /// An entry was replaced.
    Updated {
        /// Entry before the write.
        previous: Entry,
        /// Entry after the write.
        current: Entry,
    },
    /// An entry was removed.
    Deleted(Entry),
}

impl Notification {
    /// Returns the mutation kind.
    #[must_use]
    pub const fn kind(&self) -> LifecycleKind {
        match self {
            Self::Created(_) => LifecycleKind::Create,
            Self::Updated {
                ..
            } => LifecycleKind::Update,
            Self::Deleted(_) => LifecycleKind::Delete,
        }
    }

    /// Returns the affected entry id.
    #[must_use]
    pub const fn id(&self) -> &EntryId {
        match self {
            Self::Created(entry)
            | Self::Deleted(entry)
            | Self::Updated {
                current: entry,
                ..
            } => &entry.id,
        }
    }
}

// ============================================================================
// SECTION: Listener Set
// ============================================================================

/// Pending notifications and the drainer flag.
#[derive(Default)]
struct Outbox {
    /// Notifications in commit order.
    pending: VecDeque<Notification>,
    /// Set while some caller is delivering.
    draining: bool,
}

/// Ordered collection of listeners with a commit-ordered delivery queue.
pub struct ListenerSet {
    /// Listeners in registration order.
    listeners: Vec<Arc<dyn Listener>>,
    /// Queue shared by every caller.
    outbox: Mutex<Outbox>,
}

impl ListenerSet {
    /// Creates a listener set.
    #[must_use]
    pub fn new(listeners: Vec<Arc<dyn Listener>>) -> Self {
        Self {
            listeners,
            outbox: Mutex::new(Outbox::default()),
        }
    }

    /// Queues a notification. Callers hold the lock that orders their
    /// commits, so queue order matches commit order.
    pub fn enqueue(&self, notification: Notification) {
        if self.listeners.is_empty() {
            return;
        }
        self.outbox().pending.push_back(notification);
    }

    /// Delivers queued notifications unless another caller is already doing
    /// so. Returns once the queue is empty or handed to the active drainer.
    pub fn flush(&self) {
        {
            let mut outbox = self.outbox();
            if outbox.draining {
                return;
            }
            outbox.draining = true;
        }
        loop {
            let next = {
                let mut outbox = self.outbox();
                let next = outbox.pending.pop_front();
                if next.is_none() {
                    outbox.draining = false;
                }
                next
            };
            let Some(notification) = next else {
                return;
            };
            self.deliver(&notification);
        }
    }

    /// Locks the outbox. Delivery never panics while holding it, so a
    /// poisoned guard still holds a consistent queue.
    fn outbox(&self) -> MutexGuard<'_, Outbox> {
        self.outbox.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Invokes every listener for one notification, containing errors and
    /// panics.
    fn deliver(&self, notification: &Notification) {
        let kind = notification.kind();
        let id = notification.id();
        for listener in &self.listeners {
            let listener = listener.as_ref();
            let outcome = catch_unwind(AssertUnwindSafe(|| call(listener, notification)));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::warn!(
                        listener = listener.name(),
                        event = kind.as_str(),
                        entry_id = %id,
                        error = %err,
                        "catalog listener failed"
                    );
                }
                Err(_) => {
                    tracing::error!(
                        listener = listener.name(),
                        event = kind.as_str(),
                        entry_id = %id,
                        "catalog listener panicked"
                    );
                }
            }
        }
    }
}

/// Routes a notification to the matching listener callback.
fn call(listener: &dyn Listener, notification: &Notification) -> Result<(), ListenerError> {
    match notification {
        Notification::Created(entry) => listener.on_create(entry),
        Notification::Updated {
            previous,
            current,
        } => listener.on_update(previous, current),
        Notification::Deleted(entry) => listener.on_delete(entry),
    }
}
