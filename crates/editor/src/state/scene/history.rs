//! Undo/redo snapshot hook
//!
//! Stubbed contract: mutations push a value snapshot; correctness of replay
//! beyond snapshot restore is out of scope.

use super::SceneStore;

impl SceneStore {
    /// Save current state to the undo stack (bounded)
    pub(crate) fn save_undo(&mut self) {
        self.undo_stack.push(self.snapshot());
        if self.undo_stack.len() > 100 {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the last change. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.undo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.redo_stack.push(current);
        self.apply_snapshot(&prev);
        true
    }

    /// Redo the last undone change. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.undo_stack.push(current);
        self.apply_snapshot(&next);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}
