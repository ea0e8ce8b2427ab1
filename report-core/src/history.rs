//! Bounded linear undo/redo history.

use std::collections::VecDeque;

use crate::clock::current_timestamp_ms;
use crate::config::DEFAULT_HISTORY_LIMIT;

/// A snapshot taken after a mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry<T> {
    /// Full copy of the state.
    pub snapshot: T,
    /// When the snapshot was taken (ms since epoch).
    pub timestamp: u64,
}

/// Linear history with a cursor at the entry matching the current state.
///
/// Saving after an undo discards everything past the cursor; there is no
/// redo branching. Once the capacity is exceeded the oldest entry is evicted.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: VecDeque<HistoryEntry<T>>,
    cursor: Option<usize>,
    capacity: usize,
}

impl<T: Clone> Default for History<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl<T: Clone> History<T> {
    /// Create an empty history holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            cursor: None,
            capacity,
        }
    }

    /// Record a new snapshot as the current state.
    pub fn save_state(&mut self, snapshot: T) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);
        self.entries.push_back(HistoryEntry {
            snapshot,
            timestamp: current_timestamp_ms(),
        });
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Step back one entry, returning the snapshot to restore.
    pub fn undo(&mut self) -> Option<&T> {
        let cursor = self.cursor.filter(|&c| c > 0)? - 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor).map(|e| &e.snapshot)
    }

    /// Step forward one entry, returning the snapshot to restore.
    pub fn redo(&mut self) -> Option<&T> {
        let cursor = self.cursor? + 1;
        if cursor >= self.entries.len() {
            return None;
        }
        self.cursor = Some(cursor);
        self.entries.get(cursor).map(|e| &e.snapshot)
    }

    /// Entry at the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&HistoryEntry<T>> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    /// Drop every entry.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    /// Cursor position; `None` when empty.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of stored entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether [`History::undo`] would move the cursor.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    /// Whether [`History::redo`] would move the cursor.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// Iterate entries oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry<T>> {
        self.entries.iter()
    }
}
