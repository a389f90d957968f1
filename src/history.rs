//! Undo/Redo History
//!
//! Past / present / future snapshots of a value, independent of how the
//! value changed. Any forward commit discards the redo branch.

use std::collections::VecDeque;

/// Number of past snapshots kept before the oldest is evicted.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct History<T> {
    past: VecDeque<T>,
    present: T,
    future: VecDeque<T>,
    limit: usize,
    // Bumped whenever `present` is replaced through commit/undo/redo/reset.
    revision: u64,
}

impl<T: Clone> History<T> {
    pub fn new(present: T) -> Self {
        Self::with_limit(present, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(present: T, limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            present,
            future: VecDeque::new(),
            limit,
            revision: 0,
        }
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Identifies the current present; equal revisions mean nothing was
    /// committed, undone, redone or reset in between.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn commit(&mut self, next: T) {
        let previous = std::mem::replace(&mut self.present, next);
        self.past.push_back(previous);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        self.future.clear();
        self.revision += 1;
    }

    /// Returns false (and changes nothing) when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        self.revision += 1;
        true
    }

    /// Returns false (and changes nothing) when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push_back(current);
        self.revision += 1;
        true
    }

    /// Replace the present and forget both directions. Not undoable.
    pub fn reset(&mut self, present: T) {
        self.past.clear();
        self.future.clear();
        self.present = present;
        self.revision += 1;
    }

    /// Rewrite the present in place without recording a step, for
    /// reconciliation that should not be undoable (server ids, timestamps).
    pub fn amend<F: FnOnce(&T) -> T>(&mut self, f: F) {
        self.present = f(&self.present);
    }

    /// Apply `f` to every snapshot, past and future included.
    pub fn map_all<F: Fn(&T) -> T>(&mut self, f: F) {
        for snapshot in self.past.iter_mut().chain(self.future.iter_mut()) {
            *snapshot = f(snapshot);
        }
        self.present = f(&self.present);
    }
}

impl<T: Clone + Default> Default for History<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
