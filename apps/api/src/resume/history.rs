//! Linear undo/redo history over full document snapshots.
//!
//! The store owns the current value. Every commit pushes the previous value
//! onto the undo stack and clears the redo stack; the undo stack is bounded
//! and evicts its oldest snapshot first.
//!
//! `revision` increases on every change to the value or the history, which
//! lets a caller detect whether anything happened since it last looked.

use std::collections::VecDeque;

use tracing::debug;

/// Default bound on the undo stack.
pub const DEFAULT_MAX_DEPTH: usize = 50;

#[derive(Debug, Clone)]
pub struct HistoryStore<T> {
    current: T,
    undo_stack: VecDeque<T>,
    redo_stack: Vec<T>,
    max_depth: usize,
    revision: u64,
}

impl<T: Clone> HistoryStore<T> {
    /// Creates a store with empty history. A `max_depth` of zero is raised to one.
    pub fn new(initial: T, max_depth: usize) -> Self {
        Self {
            current: initial,
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
            revision: 0,
        }
    }

    pub fn get(&self) -> &T {
        &self.current
    }

    /// Replaces the current value, recording the previous one for undo.
    pub fn set(&mut self, next: T) {
        let previous = std::mem::replace(&mut self.current, next);
        self.undo_stack.push_back(previous);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
            debug!(max_depth = self.max_depth, "History: evicted oldest snapshot");
        }
        self.redo_stack.clear();
        self.revision += 1;
    }

    /// Derives the next value from the current one and commits it.
    pub fn update(&mut self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.current);
        self.set(next);
    }

    /// Restores the most recent prior value. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, previous);
        self.redo_stack.push(current);
        self.revision += 1;
        true
    }

    /// Re-applies the most recently undone value. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, next);
        self.undo_stack.push_back(current);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
        self.revision += 1;
        true
    }

    /// Forgets all history; the current value is kept.
    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.revision += 1;
    }

    /// Replaces the current value and drops all history in one step.
    pub fn reset(&mut self, value: T) {
        self.current = value;
        self.clear_history();
    }

    /// Puts back an earlier copy of this store, value and history alike.
    /// The revision keeps moving forward.
    pub fn restore(&mut self, earlier: Self) {
        let revision = self.revision + 1;
        *self = earlier;
        self.revision = revision;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[cfg(test)]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
