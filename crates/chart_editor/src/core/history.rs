//! Undo/redo stacks with a size limit and a save point.

use crate::actions::Action;

/// An action on one of the history stacks.
pub struct HistoryEntry {
    /// Unique per push, used to recognise the save point
    pub(crate) serial: u64,
    pub(crate) action: Box<dyn Action>,
}

impl HistoryEntry {
    pub fn action(&self) -> &dyn Action {
        self.action.as_ref()
    }
}

/// Linear undo/redo history. Pushing a new action discards the redo stack.
pub struct UndoHistory {
    /// Actions that can be undone, most recent last
    undo_stack: Vec<HistoryEntry>,
    /// Actions that can be redone, most recent last
    redo_stack: Vec<HistoryEntry>,
    /// Maximum undo depth, 0 for unbounded
    max_size: usize,
    next_serial: u64,
    /// Serial on top of the undo stack at the last save
    saved_serial: Option<u64>,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoHistory {
    /// Default maximum history size.
    pub const DEFAULT_MAX_SIZE: usize = 100;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_MAX_SIZE)
    }

    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
            next_serial: 0,
            saved_serial: None,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn peek_undo(&self) -> Option<&dyn Action> {
        self.undo_stack.last().map(HistoryEntry::action)
    }

    pub fn peek_redo(&self) -> Option<&dyn Action> {
        self.redo_stack.last().map(HistoryEntry::action)
    }

    /// Whether the undo stack differs from the last save point.
    pub fn is_dirty(&self) -> bool {
        self.undo_stack.last().map(|e| e.serial) != self.saved_serial
    }

    pub fn mark_saved(&mut self) {
        self.saved_serial = self.undo_stack.last().map(|e| e.serial);
    }

    /// Push an action that has just been performed.
    pub fn push(&mut self, action: Box<dyn Action>) {
        let serial = self.next_serial;
        self.next_serial += 1;

        self.undo_stack.push(HistoryEntry { serial, action });
        self.redo_stack.clear();

        if self.max_size > 0 && self.undo_stack.len() > self.max_size {
            let excess = self.undo_stack.len() - self.max_size;
            self.undo_stack.drain(..excess);
            log::debug!("Trimmed {} actions from history", excess);
        }
    }

    pub fn pop_undo(&mut self) -> Option<HistoryEntry> {
        self.undo_stack.pop()
    }

    pub fn pop_redo(&mut self) -> Option<HistoryEntry> {
        self.redo_stack.pop()
    }

    /// Push an entry back after redo completes.
    pub fn push_to_undo(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);
    }

    /// Push an entry after undo completes.
    pub fn push_to_redo(&mut self, entry: HistoryEntry) {
        self.redo_stack.push(entry);
    }

    /// Clear all history. The empty history counts as saved.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.saved_serial = None;
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ActionKind, ActionResult};
    use crate::core::EditContext;

    struct TestAction;

    impl Action for TestAction {
        fn kind(&self) -> ActionKind {
            ActionKind::AddBookmark
        }

        fn perform(&mut self, _ctx: &mut EditContext<'_>) -> ActionResult {
            Ok(())
        }

        fn undo(&mut self, _ctx: &mut EditContext<'_>) -> ActionResult {
            Ok(())
        }
    }

    #[test]
    fn test_history_basic() {
        let mut history = UndoHistory::new();

        assert!(!history.can_undo());
        assert!(!history.can_redo());

        history.push(Box::new(TestAction));

        assert!(history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.peek_undo().unwrap().kind(), ActionKind::AddBookmark);
    }

    #[test]
    fn test_history_undo_redo() {
        let mut history = UndoHistory::new();

        history.push(Box::new(TestAction));
        history.push(Box::new(TestAction));
        assert_eq!(history.undo_count(), 2);

        if let Some(entry) = history.pop_undo() {
            history.push_to_redo(entry);
        }
        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.redo_count(), 1);

        if let Some(entry) = history.pop_redo() {
            history.push_to_undo(entry);
        }
        assert_eq!(history.undo_count(), 2);
        assert_eq!(history.redo_count(), 0);
    }

    #[test]
    fn test_push_clears_redo() {
        let mut history = UndoHistory::new();
        history.push(Box::new(TestAction));
        let entry = history.pop_undo().unwrap();
        history.push_to_redo(entry);

        history.push(Box::new(TestAction));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_limit_trims_oldest() {
        let mut history = UndoHistory::with_capacity(3);
        for _ in 0..5 {
            history.push(Box::new(TestAction));
        }
        assert_eq!(history.undo_count(), 3);

        let mut unbounded = UndoHistory::with_capacity(0);
        for _ in 0..500 {
            unbounded.push(Box::new(TestAction));
        }
        assert_eq!(unbounded.undo_count(), 500);
    }

    #[test]
    fn test_save_point() {
        let mut history = UndoHistory::new();
        assert!(!history.is_dirty());

        history.push(Box::new(TestAction));
        assert!(history.is_dirty());
        history.mark_saved();
        assert!(!history.is_dirty());

        let entry = history.pop_undo().unwrap();
        assert!(history.is_dirty());
        history.push_to_redo(entry);
        let entry = history.pop_redo().unwrap();
        history.push_to_undo(entry);
        assert!(!history.is_dirty());

        // Undo then a different edit: same depth, different action
        let entry = history.pop_undo().unwrap();
        history.push_to_redo(entry);
        history.push(Box::new(TestAction));
        assert!(history.is_dirty());
    }
}
