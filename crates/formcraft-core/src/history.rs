//! Bounded linear undo/redo history.

use std::sync::Arc;

/// Default number of snapshots kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// A linear sequence of immutable snapshots with a movable pointer.
///
/// Entries after the pointer are redo states. Pushing truncates them, and
/// pushing past capacity evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: Vec<Arc<T>>,
    pointer: usize,
    capacity: usize,
}

impl<T> History<T> {
    /// Create a history holding a single initial snapshot.
    /// A capacity of zero is treated as one.
    pub fn new(initial: T, capacity: usize) -> Self {
        Self {
            entries: vec![Arc::new(initial)],
            pointer: 0,
            capacity: capacity.max(1),
        }
    }

    /// The snapshot under the pointer.
    pub fn current(&self) -> &Arc<T> {
        &self.entries[self.pointer]
    }

    /// Push a new snapshot after the pointer.
    pub fn push(&mut self, snapshot: T) {
        // Drop redo entries
        self.entries.truncate(self.pointer + 1);
        self.entries.push(Arc::new(snapshot));

        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.capacity;
            self.entries.drain(..excess);
        }
        self.pointer = self.entries.len() - 1;
    }

    /// Step back one snapshot.
    /// Returns true if the pointer moved.
    pub fn undo(&mut self) -> bool {
        if self.can_undo() {
            self.pointer -= 1;
            true
        } else {
            false
        }
    }

    /// Step forward one snapshot.
    /// Returns true if the pointer moved.
    pub fn redo(&mut self) -> bool {
        if self.can_redo() {
            self.pointer += 1;
            true
        } else {
            false
        }
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.pointer > 0
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.pointer + 1 < self.entries.len()
    }

    /// Reset to a single entry holding the current snapshot.
    pub fn clear(&mut self) {
        let current = Arc::clone(self.current());
        self.entries = vec![current];
        self.pointer = 0;
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: a history holds at least one snapshot.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the current snapshot.
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Maximum number of snapshots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
