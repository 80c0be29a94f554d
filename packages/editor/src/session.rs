//! # Edit Session Management
//!
//! An EditSession is one editing surface's view of a document: the tree,
//! the current selection, edit history and the change listeners the host
//! registered. Every change to the tree goes through the session, which
//! notifies listeners with the new markup.

use crate::keymap::{self, Key, KeyAction, Modifiers};
use crate::undo_stack::{Snapshot, UndoStack};
use crate::{Command, CommandError, CommandOutcome, Document, EditorError};
use templet_codec::ExportOptions;
use templet_parser::path::{closest, resolve, NodeKind};
use templet_parser::NodePath;
use tracing::{debug, info, instrument};

/// Receives the serialized markup after every change
pub type ChangeListener = Box<dyn FnMut(&str)>;

/// Single edit session
pub struct EditSession {
    /// Document being edited
    pub document: Document,

    selection: NodePath,
    history: UndoStack,
    listeners: Vec<ChangeListener>,
}

impl EditSession {
    /// Create new edit session with the cursor in the first block
    pub fn new(document: Document) -> Self {
        Self {
            document,
            selection: NodePath::new(vec![0]),
            history: UndoStack::new(),
            listeners: Vec::new(),
        }
    }

    /// Register a change listener
    pub fn on_change(&mut self, listener: impl FnMut(&str) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Replace the document with imported template text. Clears history.
    #[instrument(skip(self, raw), fields(bytes = raw.len()))]
    pub fn load(&mut self, raw: &str) {
        let tree = Document::from_template(raw).tree().clone();
        self.document.replace(tree);
        self.selection = NodePath::new(vec![0]);
        self.history.clear();
        info!(version = self.document.version, "Loaded template into session");
        self.notify();
    }

    /// Move the selection. Fails when the path does not resolve.
    pub fn select(&mut self, path: NodePath) -> Result<(), EditorError> {
        if resolve(self.document.tree(), &path).is_none() {
            return Err(CommandError::InvalidSelection(path).into());
        }
        self.selection = path;
        Ok(())
    }

    pub fn selection(&self) -> &NodePath {
        &self.selection
    }

    /// Apply a command at the current selection. Listeners hear about it
    /// only when the tree changed.
    pub fn execute(&mut self, command: Command) -> Result<CommandOutcome, EditorError> {
        let before = Snapshot::new(self.document.tree().clone(), self.selection.clone());
        let outcome = self.document.apply(&command, &mut self.selection)?;

        match &outcome {
            CommandOutcome::Applied => {
                self.history.record(before);
                self.notify();
            }
            CommandOutcome::Unchanged => debug!(command = ?command, "Command had nothing to act on"),
            CommandOutcome::Rejected(reason) => debug!(command = ?command, %reason, "Command rejected"),
        }
        Ok(outcome)
    }

    /// Restore the state before the last applied command
    pub fn undo(&mut self) -> bool {
        let current = self.current_snapshot();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.current_snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Handle a key press from the host. Returns true when the key was
    /// consumed and the host should suppress its default behaviour.
    pub fn handle_key_down(&mut self, key: &str, modifiers: Modifiers) -> bool {
        let in_list_item = closest(self.document.tree(), &self.selection, |kind| kind == NodeKind::ListItem).is_some();
        let Some(action) = keymap::resolve(&Key::from_name(key), modifiers, in_list_item) else {
            return false;
        };

        match action {
            KeyAction::Undo => {
                self.undo();
            }
            KeyAction::Redo => {
                self.redo();
            }
            KeyAction::Execute(command) => {
                if let Err(error) = self.execute(command) {
                    debug!(%error, key, "Key binding failed");
                }
            }
        }
        true
    }

    /// Internal markup of the current tree
    pub fn html(&self) -> String {
        self.document.html()
    }

    pub fn export(&self, options: &ExportOptions) -> String {
        self.document.export(options)
    }

    /// Whether the selection resolves to an ordered list item
    pub fn in_ordered_list(&self) -> bool {
        closest(self.document.tree(), &self.selection, |kind| kind == NodeKind::ListItem)
            .and_then(|item| item.parent())
            .and_then(|list| resolve(self.document.tree(), &list).map(|r| r.kind()))
            == Some(NodeKind::OrderedList)
    }

    fn current_snapshot(&self) -> Snapshot {
        Snapshot::new(self.document.tree().clone(), self.selection.clone())
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.document.replace(snapshot.tree);
        self.selection = snapshot.selection;
        self.notify();
    }

    fn notify(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let html = self.html();
        for listener in &mut self.listeners {
            listener(&html);
        }
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(Document::new())
    }
}
