//! Error types for the editor

use templet_parser::NodePath;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Invalid command payload: {0}")]
    InvalidCommand(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to run a command at all. Commands that run but cannot change
/// anything report it through their outcome instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("Selection {0} does not point into the document")]
    InvalidSelection(NodePath),

    #[error("Selection {0} does not point at a {1}")]
    WrongTarget(NodePath, &'static str),
}

/// Structural table edit that would break the table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("A table needs at least one row and one column, got {rows}x{cols}")]
    InvalidSize { rows: usize, cols: usize },

    #[error("A {rows}x{cols} table exceeds the size limit")]
    TooLarge { rows: usize, cols: usize },

    #[error("Cannot delete the last row of a table")]
    LastRow,

    #[error("Cannot delete the last column of a table")]
    LastColumn,

    #[error("Cannot merge {count} cells starting at cell {cell}")]
    InvalidMerge { cell: usize, count: usize },

    #[error("No cell at row {row}, index {cell}")]
    CellOutOfRange { row: usize, cell: usize },
}
