use super::System;
use crate::constants::MAX_HISTORY_SIZE;

/// Manages undo/redo stacks of system snapshots with a configurable maximum depth.
///
/// Snapshots are recorded after each edit, so the top of the undo stack is
/// always the current state.
#[derive(Debug, Clone)]
pub struct UndoManager {
    undo_stack: Vec<System>,
    redo_stack: Vec<System>,
    max_levels: usize,
    last_recorded_seq: Option<u64>,
}

impl UndoManager {
    /// Create a new `UndoManager` keeping at most `max_levels` previous states
    #[must_use]
    pub fn new(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            last_recorded_seq: None,
        }
    }

    /// Record `system` if its edit sequence moved since the last recording.
    ///
    /// Returns whether a snapshot was pushed. Transient changes that do not
    /// advance `edit_seq` (focus, name lookups) are not recorded.
    pub fn record(&mut self, system: &System) -> bool {
        if self.last_recorded_seq == Some(system.edit_seq) {
            return false;
        }
        self.push_snapshot(system.clone());
        true
    }

    /// Push a new snapshot onto the undo stack
    /// This clears the redo stack and enforces the maximum depth limit
    pub fn push_snapshot(&mut self, snapshot: System) {
        self.redo_stack.clear();
        self.last_recorded_seq = Some(snapshot.edit_seq);
        self.undo_stack.push(snapshot);

        // Current state plus `max_levels` previous ones (FIFO eviction)
        if self.undo_stack.len() > self.max_levels + 1 {
            self.undo_stack.remove(0);
        }
    }

    /// Perform an undo operation, returning the previous snapshot if available
    /// The current state should be provided to push onto the redo stack
    pub fn undo(&mut self, current: System) -> Option<System> {
        if !self.can_undo() {
            return None;
        }

        // The last item is the current state; discard it
        self.undo_stack.pop()?;
        let previous = self.undo_stack.last()?.clone();

        self.redo_stack.push(current);
        if self.redo_stack.len() > self.max_levels {
            self.redo_stack.remove(0);
        }

        self.last_recorded_seq = Some(previous.edit_seq);
        Some(previous)
    }

    /// Perform a redo operation, returning the next snapshot if available
    pub fn redo(&mut self) -> Option<System> {
        let snapshot = self.redo_stack.pop()?;

        self.undo_stack.push(snapshot.clone());
        if self.undo_stack.len() > self.max_levels + 1 {
            self.undo_stack.remove(0);
        }

        self.last_recorded_seq = Some(snapshot.edit_seq);
        Some(snapshot)
    }

    /// Need at least 2 items: current state + previous state to restore
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() >= 2
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of previous states that can be restored
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len().saturating_sub(1)
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new(MAX_HISTORY_SIZE)
    }
}
