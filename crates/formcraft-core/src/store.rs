//! The schema store: canonical form document plus its history.

use crate::history::{DEFAULT_HISTORY_CAPACITY, History};
use crate::schema::FormSchema;
use std::sync::Arc;

/// Holds the canonical [`FormSchema`].
///
/// Every mutation produces a new immutable snapshot that is pushed onto the
/// history. There is no way to change the current snapshot in place.
#[derive(Debug, Clone)]
pub struct SchemaStore {
    history: History<FormSchema>,
}

impl Default for SchemaStore {
    fn default() -> Self {
        Self::new(FormSchema::default())
    }
}

impl SchemaStore {
    /// Create a store with the default history capacity.
    pub fn new(initial: FormSchema) -> Self {
        Self::with_capacity(initial, DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a store with an explicit history capacity.
    pub fn with_capacity(initial: FormSchema, capacity: usize) -> Self {
        Self {
            history: History::new(initial, capacity),
        }
    }

    /// The current snapshot.
    pub fn state(&self) -> &FormSchema {
        self.history.current()
    }

    /// A shared handle to the current snapshot.
    pub fn snapshot(&self) -> Arc<FormSchema> {
        Arc::clone(self.history.current())
    }

    /// Replace the document with `next`.
    pub fn set(&mut self, next: FormSchema) {
        self.history.push(next);
    }

    /// Compute the next document from the previous one.
    pub fn update(&mut self, updater: impl FnOnce(&FormSchema) -> FormSchema) {
        let next = updater(self.state());
        self.set(next);
    }

    /// Apply an edit to a copy of the current document and commit it.
    pub fn modify<R>(&mut self, edit: impl FnOnce(&mut FormSchema) -> R) -> R {
        let mut next = self.state().clone();
        let result = edit(&mut next);
        self.set(next);
        result
    }

    /// Step back one snapshot. No-op at the oldest entry.
    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    /// Step forward one snapshot. No-op at the newest entry.
    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Reset history to a single entry holding the current document.
    pub fn clear_history(&mut self) {
        self.history.clear();
        log::info!("History cleared");
    }

    /// Number of snapshots in history.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}
