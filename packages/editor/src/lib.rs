//! # Templet Editor
//!
//! Editing engine for template documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ codec: %s ⇄ placeholder markup, minify      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ parser: markup ⇄ document tree              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle + commands       │
//! │  - Load/save templates                      │
//! │  - Apply commands at a node path            │
//! │  - List levels and table structure          │
//! │  - Undo/redo and change notification        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Tree is source of truth**: markup is always derived from it
//! 2. **One command, one transaction**: a structural change and the list
//!    level it implies are applied together
//! 3. **No global editor**: every command takes its session explicitly
//!
//! ## Usage
//!
//! ```rust,ignore
//! use templet_editor::{Command, Document, EditSession};
//!
//! let mut session = EditSession::new(Document::load("letter.html")?);
//! session.on_change(|html| println!("{}", html));
//!
//! session.select(NodePath::new(vec![1, 2]))?;
//! session.execute(Command::Indent)?;
//!
//! let template = session.export(&ExportOptions::default());
//! ```

pub mod commands;
mod document;
mod errors;
pub mod keymap;
pub mod lists;
mod session;
pub mod table;
mod undo_stack;

pub use commands::{Command, CommandOutcome};
pub use document::Document;
pub use errors::{CommandError, EditorError, TableError};
pub use keymap::{Key, KeyAction, Modifiers};
pub use session::{ChangeListener, EditSession};
pub use undo_stack::{Snapshot, UndoStack};

// Re-export common types for convenience
pub use templet_codec::ExportOptions;
pub use templet_parser::ast::Document as ASTDocument;
pub use templet_parser::NodePath;
