//! Per-path coalescing of file-system events.
//!
//! Editors typically emit several events per save (truncate, write, chmod,
//! rename). The debouncer folds them into one change per path so each save
//! reaches `watch_change` once.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::plugin::ChangeKind;

/// A change whose debounce deadline has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DebouncedEvent {
    /// Absolute file path.
    pub path: PathBuf,
    /// Coalesced kind of change.
    pub kind: ChangeKind,
}

struct PendingEvent {
    kind: ChangeKind,
    deadline: Instant,
}

/// Thread-safe event debouncer.
pub(crate) struct EventDebouncer {
    pending: Mutex<HashMap<PathBuf, PendingEvent>>,
    debounce_duration: Duration,
}

impl EventDebouncer {
    pub fn new(debounce_duration: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            debounce_duration,
        }
    }

    /// Record an event, restarting the path's deadline.
    ///
    /// Called from the notify callback thread.
    pub fn record(&self, path: PathBuf, kind: ChangeKind) {
        use std::collections::hash_map::Entry;

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let deadline = Instant::now() + self.debounce_duration;

        match pending.entry(path) {
            Entry::Vacant(entry) => {
                entry.insert(PendingEvent { kind, deadline });
            }
            Entry::Occupied(mut entry) => {
                if let Some(coalesced) = Self::coalesce(entry.get().kind, kind) {
                    let event = entry.get_mut();
                    event.kind = coalesced;
                    event.deadline = deadline;
                } else {
                    entry.remove();
                }
            }
        }
    }

    /// Combine two kinds for the same path.
    ///
    /// Returns `None` when the file appeared and vanished within one window.
    #[allow(clippy::match_same_arms)]
    fn coalesce(existing: ChangeKind, new: ChangeKind) -> Option<ChangeKind> {
        use ChangeKind::{Created, Modified, Removed};

        match (existing, new) {
            (Created, Created) => Some(Created),
            (Created, Modified) => Some(Created),
            (Created, Removed) => None,

            (Modified, Created) => Some(Created),
            (Modified, Modified) => Some(Modified),
            (Modified, Removed) => Some(Removed),

            // Replaced by an atomic save
            (Removed, Created) => Some(Modified),
            (Removed, Modified) => Some(Removed),
            (Removed, Removed) => Some(Removed),
        }
    }

    /// Take every event whose deadline has passed, sorted by path.
    pub fn drain_ready(&self) -> Vec<DebouncedEvent> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();

        let mut ready = Vec::new();
        pending.retain(|path, event| {
            if event.deadline <= now {
                ready.push(DebouncedEvent {
                    path: path.clone(),
                    kind: event.kind,
                });
                false
            } else {
                true
            }
        });

        ready.sort_by(|a, b| a.path.cmp(&b.path));
        ready
    }
}
