//! # Document Handle
//!
//! A Document owns one template tree and its version counter.
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Import → Parse → Edit → Serialize → Export → Save
//!   ↓       ↓        ↓       ↓        ↓          ↓       ↓
//! File   %s→span   Tree  Commands  Markup    span→%s   File
//! ```
//!
//! The tree is replaced wholesale when new markup is loaded. It is never
//! shared between documents.

use crate::{Command, CommandOutcome, EditorError};
use std::path::{Path, PathBuf};
use templet_codec::ExportOptions;
use templet_parser::{ast::Document as ASTDocument, parse, serialize, NodePath};
use tracing::info;

/// Editable template document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// File the document was loaded from (if any)
    pub path: Option<PathBuf>,

    /// Current version number (increments on each change)
    pub version: u64,

    tree: ASTDocument,
}

impl Document {
    /// Fresh document: one empty paragraph
    pub fn new() -> Self {
        Self::from_tree(ASTDocument::blank())
    }

    pub fn from_tree(tree: ASTDocument) -> Self {
        Self {
            path: None,
            version: 0,
            tree,
        }
    }

    /// Create a document from raw template text (wire tokens included)
    pub fn from_template(raw: &str) -> Self {
        Self::from_markup(&templet_codec::import(raw))
    }

    /// Create a document from internal markup, as produced by [`Document::html`]
    pub fn from_markup(markup: &str) -> Self {
        Self::from_tree(parse(markup))
    }

    /// Load a template file
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, EditorError> {
        let path = path.into();
        let raw = std::fs::read_to_string(&path)?;
        let mut doc = Self::from_template(&raw);
        info!(path = %path.display(), blocks = doc.tree.children.len(), "Loaded template");
        doc.path = Some(path);
        Ok(doc)
    }

    pub fn tree(&self) -> &ASTDocument {
        &self.tree
    }

    /// Replace the whole tree
    pub fn replace(&mut self, tree: ASTDocument) {
        self.tree = tree;
        self.version += 1;
    }

    /// Apply a command at `selection`. The version only moves when the tree
    /// changed.
    pub fn apply(&mut self, command: &Command, selection: &mut NodePath) -> Result<CommandOutcome, EditorError> {
        let outcome = command.apply(&mut self.tree, selection)?;
        if outcome.is_applied() {
            self.version += 1;
        }
        Ok(outcome)
    }

    /// Internal markup of the whole tree
    pub fn html(&self) -> String {
        serialize(&self.tree)
    }

    /// Template text for download or clipboard
    pub fn export(&self, options: &ExportOptions) -> String {
        templet_codec::export(&self.html(), options)
    }

    /// Write the exported template to disk
    pub fn save(&self, path: &Path, options: &ExportOptions) -> Result<(), EditorError> {
        let output = self.export(options);
        std::fs::write(path, &output)?;
        info!(path = %path.display(), bytes = output.len(), "Saved template");
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
