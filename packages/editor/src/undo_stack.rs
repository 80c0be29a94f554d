//! # Undo/Redo Stack
//!
//! Tracks edit history as snapshots of the tree and the selection.
//!
//! ## Design
//!
//! - The state before every applied command is pushed as one snapshot
//! - Undo swaps the current state with the most recent snapshot and keeps
//!   the current one for redo
//! - New edits clear the redo stack
//! - History is bounded; the oldest snapshot is dropped first

use templet_parser::{ast::Document as ASTDocument, NodePath};

/// Tree and selection at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub tree: ASTDocument,
    pub selection: NodePath,
}

impl Snapshot {
    pub fn new(tree: ASTDocument, selection: NodePath) -> Self {
        Self { tree, selection }
    }
}

/// Undo/redo stack for document editing
#[derive(Debug)]
pub struct UndoStack {
    /// Earlier states (most recent last)
    undo_stack: Vec<Snapshot>,

    /// Undone states (most recent last)
    redo_stack: Vec<Snapshot>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Record the state an edit started from
    pub fn record(&mut self, before: Snapshot) {
        self.undo_stack.push(before);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // New action invalidates future
        self.redo_stack.clear();
    }

    /// Step back. `current` is kept for redo; returns the state to restore.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Step forward again after an undo
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use templet_parser::parse;

    fn snapshot(markup: &str) -> Snapshot {
        Snapshot::new(parse(markup), NodePath::new(vec![0]))
    }

    #[test]
    fn test_undo_stack_creation() {
        let stack = UndoStack::new();
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 0);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_record_undo_redo() {
        let mut stack = UndoStack::new();
        stack.record(snapshot("<p>Hello</p>"));
        assert!(stack.can_undo());

        let restored = stack.undo(snapshot("<p>World</p>")).unwrap();
        assert_eq!(restored, snapshot("<p>Hello</p>"));
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 1);

        let redone = stack.redo(restored).unwrap();
        assert_eq!(redone, snapshot("<p>World</p>"));
        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_nothing_to_undo() {
        let mut stack = UndoStack::new();
        assert!(stack.undo(snapshot("<p>x</p>")).is_none());
        assert!(stack.redo(snapshot("<p>x</p>")).is_none());
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut stack = UndoStack::new();
        stack.record(snapshot("<p>a</p>"));
        stack.undo(snapshot("<p>b</p>"));
        assert_eq!(stack.redo_levels(), 1);

        stack.record(snapshot("<p>a</p>"));
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut stack = UndoStack::with_max_levels(2);
        for i in 0..3 {
            stack.record(snapshot(&format!("<p>Text {}</p>", i)));
        }
        assert_eq!(stack.undo_levels(), 2);

        let oldest_kept = {
            stack.undo(snapshot("<p>now</p>"));
            stack.undo(snapshot("<p>Text 2</p>"))
        };
        assert_eq!(oldest_kept, Some(snapshot("<p>Text 1</p>")));
    }
}
