//! # Editing Commands
//!
//! Structural operations a user can trigger from the toolbar or keyboard.
//!
//! ## Command Semantics
//!
//! Every command runs against the current selection, a [`NodePath`], and
//! reports one of three outcomes:
//!
//! - `Applied`: the tree changed and the selection follows the edited
//!   content
//! - `Unchanged`: nothing eligible to act on; tree and selection untouched
//! - `Rejected`: the edit would break an invariant (e.g. deleting the last
//!   row of a table); tree and selection untouched
//!
//! Only a selection that does not resolve is an error.

use crate::errors::{CommandError, EditorError, TableError};
use crate::lists;
use crate::table;
use serde::{Deserialize, Serialize};
use templet_parser::ast::{Document as ASTDocument, HeadingLevel, Mark, Node, Table, TextAlign};
use templet_parser::path::{ancestry, closest, resolve, resolve_mut, NodeKind, NodePath, NodeRef};
use tracing::debug;

/// Structural editing commands
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Command {
    /// Sink the selected list item one level deeper
    Indent,

    /// Lift the selected list item one level up
    Outdent,

    /// Set the first number of the selected ordered list
    StartOrderedListAt { start: u32 },

    ToggleBulletList,
    ToggleOrderedList,

    SetParagraph,
    SetHeading { level: HeadingLevel },
    SetTextAlign { align: Option<TextAlign> },

    ToggleMark { mark: Mark },

    /// Type text at the selection
    InsertText { text: String },

    /// Replace the content of the selected text run
    UpdateText { content: String },

    InsertPlaceholder,
    InsertHardBreak,

    /// Add an empty paragraph after the selected block
    InsertParagraph,

    /// Remove the selected node; a placeholder goes as a whole
    DeleteNode,

    InsertTable { rows: usize, cols: usize },
    AddColumnBefore,
    AddColumnAfter,
    DeleteColumn,
    AddRowBefore,
    AddRowAfter,
    DeleteRow,

    /// Merge the selected cell with the cells after it in its row
    MergeCells { count: usize },
    SplitCell,
    ToggleHeaderRow,
    DeleteTable,
}

/// What a command did
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", content = "reason")]
pub enum CommandOutcome {
    Applied,
    Unchanged,
    Rejected(String),
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied)
    }
}

impl From<TableError> for CommandOutcome {
    fn from(error: TableError) -> Self {
        CommandOutcome::Rejected(error.to_string())
    }
}

/// The default insert path of the toolbar
impl Default for Command {
    fn default() -> Self {
        Command::InsertTable {
            rows: table::DEFAULT_ROWS,
            cols: table::DEFAULT_COLS,
        }
    }
}

impl Command {
    /// Parse a command from its JSON form, e.g. `{"type":"Indent"}`
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply the command to a tree with validation
    pub fn apply(&self, tree: &mut ASTDocument, selection: &mut NodePath) -> Result<CommandOutcome, CommandError> {
        self.validate(tree, selection)?;

        let outcome = match self {
            Command::Indent => lists::indent(tree, selection),
            Command::Outdent => lists::outdent(tree, selection),
            Command::StartOrderedListAt { start } => lists::start_ordered_list_at(tree, selection, *start),
            Command::ToggleBulletList => lists::toggle_list(tree, selection, false),
            Command::ToggleOrderedList => lists::toggle_list(tree, selection, true),

            Command::SetParagraph => Self::apply_set_block(tree, selection, None),
            Command::SetHeading { level } => Self::apply_set_block(tree, selection, Some(*level)),
            Command::SetTextAlign { align } => Self::apply_set_align(tree, selection, *align),
            Command::ToggleMark { mark } => Self::apply_toggle_mark(tree, selection, *mark),

            Command::InsertText { text } => Self::apply_insert_text(tree, selection, text)?,
            Command::UpdateText { content } => Self::apply_update_text(tree, selection, content)?,
            Command::InsertPlaceholder => Self::apply_insert_atom(tree, selection, Node::Placeholder)?,
            Command::InsertHardBreak => Self::apply_insert_atom(tree, selection, Node::HardBreak)?,
            Command::InsertParagraph => Self::apply_insert_paragraph(tree, selection),
            Command::DeleteNode => Self::apply_delete(tree, selection),

            Command::InsertTable { rows, cols } => Self::apply_insert_table(tree, selection, *rows, *cols),
            Command::DeleteTable => Self::apply_delete_table(tree, selection),
            Command::AddColumnBefore
            | Command::AddColumnAfter
            | Command::DeleteColumn
            | Command::AddRowBefore
            | Command::AddRowAfter
            | Command::DeleteRow
            | Command::MergeCells { .. }
            | Command::SplitCell
            | Command::ToggleHeaderRow => self.apply_table_edit(tree, selection),
        };

        debug!(command = ?self, outcome = ?outcome, selection = %selection, "Ran command");
        Ok(outcome)
    }

    /// Validate without applying
    pub fn validate(&self, tree: &ASTDocument, selection: &NodePath) -> Result<(), CommandError> {
        resolve(tree, selection)
            .map(|_| ())
            .ok_or_else(|| CommandError::InvalidSelection(selection.clone()))
    }

    fn apply_set_block(tree: &mut ASTDocument, selection: &NodePath, heading: Option<HeadingLevel>) -> CommandOutcome {
        let Some(node) = closest_textblock_mut(tree, selection) else {
            return CommandOutcome::Unchanged;
        };

        match (&*node, heading) {
            (Node::Paragraph { .. }, None) => return CommandOutcome::Unchanged,
            (Node::Heading { level, .. }, Some(target)) if *level == target => return CommandOutcome::Unchanged,
            _ => {}
        }

        let align = textblock_align(node);
        let children = node.inline_children_mut().map(std::mem::take).unwrap_or_default();
        *node = match heading {
            Some(level) => Node::Heading {
                level,
                align,
                children,
            },
            None => Node::Paragraph { align, children },
        };
        CommandOutcome::Applied
    }

    fn apply_set_align(tree: &mut ASTDocument, selection: &NodePath, target: Option<TextAlign>) -> CommandOutcome {
        match closest_textblock_mut(tree, selection) {
            Some(Node::Paragraph { align, .. }) | Some(Node::Heading { align, .. }) if *align != target => {
                *align = target;
                CommandOutcome::Applied
            }
            _ => CommandOutcome::Unchanged,
        }
    }

    fn apply_toggle_mark(tree: &mut ASTDocument, selection: &mut NodePath, mark: Mark) -> CommandOutcome {
        let Some(block_path) = closest(tree, selection, NodeKind::is_textblock) else {
            return CommandOutcome::Unchanged;
        };
        // A selected run limits the toggle to that run
        let only = (selection.len() > block_path.len()).then(|| selection.indices()[block_path.len()]);

        let Some(children) = node_mut(tree, &block_path).and_then(Node::inline_children_mut) else {
            return CommandOutcome::Unchanged;
        };
        let targeted = |index: usize| only.map(|only| only == index).unwrap_or(true);

        let mut runs = children
            .iter()
            .enumerate()
            .filter(|(index, _)| targeted(*index))
            .filter_map(|(_, node)| match node {
                Node::Text { marks, .. } => Some(marks.has(mark)),
                _ => None,
            })
            .peekable();
        if runs.peek().is_none() {
            return CommandOutcome::Unchanged;
        }
        let all_marked = runs.all(|has| has);

        for (index, node) in children.iter_mut().enumerate() {
            if let (true, Node::Text { marks, .. }) = (targeted(index), node) {
                *marks = marks.with(mark, !all_marked);
            }
        }
        merge_text_runs(children);

        *selection = block_path;
        CommandOutcome::Applied
    }

    fn apply_insert_text(tree: &mut ASTDocument, selection: &mut NodePath, text: &str) -> Result<CommandOutcome, CommandError> {
        if text.is_empty() {
            return Ok(CommandOutcome::Unchanged);
        }
        let run = Node::text(text);

        let (block_path, index) = match resolve(tree, selection).map(|r| r.kind()) {
            Some(NodeKind::Text) => {
                if let Some(Node::Text { content, .. }) = node_mut(tree, selection) {
                    content.push_str(text);
                }
                return Ok(CommandOutcome::Applied);
            }
            Some(kind) if kind.is_textblock() => {
                let len = resolve(tree, selection)
                    .and_then(NodeRef::as_node)
                    .and_then(Node::inline_children)
                    .map(Vec::len)
                    .unwrap_or(0);
                (selection.clone(), len)
            }
            Some(kind) if is_inline_kind(kind) => {
                let (parent, index) = split_last(selection)?;
                (parent, index + 1)
            }
            _ => return Err(CommandError::WrongTarget(selection.clone(), "text position")),
        };

        let block = node_mut(tree, &block_path).ok_or_else(|| CommandError::InvalidSelection(selection.clone()))?;
        let inserted = insert_inline(block, index, run);
        *selection = block_path.child(inserted);
        Ok(CommandOutcome::Applied)
    }

    fn apply_update_text(tree: &mut ASTDocument, selection: &mut NodePath, new_content: &str) -> Result<CommandOutcome, CommandError> {
        let Some(Node::Text { content, .. }) = node_mut(tree, selection) else {
            return Err(CommandError::WrongTarget(selection.clone(), "text run"));
        };
        if content.as_str() == new_content {
            return Ok(CommandOutcome::Unchanged);
        }
        if !new_content.is_empty() {
            *content = new_content.to_string();
            return Ok(CommandOutcome::Applied);
        }

        let (parent, index) = split_last(selection)?;
        if let Some(children) = node_mut(tree, &parent).and_then(Node::inline_children_mut) {
            children.remove(index);
            merge_text_runs(children);
        }
        *selection = parent;
        Ok(CommandOutcome::Applied)
    }

    fn apply_insert_atom(tree: &mut ASTDocument, selection: &mut NodePath, atom: Node) -> Result<CommandOutcome, CommandError> {
        let (block_path, index) = match resolve(tree, selection).and_then(NodeRef::as_node) {
            Some(node) if node.is_textblock() => {
                let len = node.inline_children().map(Vec::len).unwrap_or(0);
                (selection.clone(), len)
            }
            Some(node) if node.is_inline() => {
                let (parent, index) = split_last(selection)?;
                (parent, index + 1)
            }
            _ => return Err(CommandError::WrongTarget(selection.clone(), "text position")),
        };

        let block = node_mut(tree, &block_path).ok_or_else(|| CommandError::InvalidSelection(selection.clone()))?;
        let inserted = insert_inline(block, index, atom);
        *selection = block_path.child(inserted);
        Ok(CommandOutcome::Applied)
    }

    fn apply_insert_paragraph(tree: &mut ASTDocument, selection: &mut NodePath) -> CommandOutcome {
        let (container, index) = match block_position(tree, selection) {
            Some((container, index)) => (container, index + 1),
            None => (NodePath::root(), tree.children.len()),
        };
        let Some(blocks) = resolve_mut(tree, &container).and_then(|n| n.into_blocks()) else {
            return CommandOutcome::Unchanged;
        };
        blocks.insert(index, Node::empty_paragraph());
        *selection = container.child(index);
        CommandOutcome::Applied
    }

    fn apply_delete(tree: &mut ASTDocument, selection: &mut NodePath) -> CommandOutcome {
        let Some((parent, index)) = selection.parent().zip(selection.last()) else {
            return CommandOutcome::Unchanged;
        };
        let Some(kind) = resolve(tree, selection).map(|r| r.kind()) else {
            return CommandOutcome::Unchanged;
        };

        match kind {
            NodeKind::TableRow | NodeKind::TableCell => {
                CommandOutcome::Rejected("Rows and cells are removed with the table commands".to_string())
            }
            NodeKind::ListItem => {
                let emptied = match node_mut(tree, &parent).and_then(Node::list_items_mut) {
                    Some(items) => {
                        items.remove(index);
                        items.is_empty()
                    }
                    None => return CommandOutcome::Unchanged,
                };
                *selection = if emptied {
                    remove_block(tree, &parent).unwrap_or_default()
                } else {
                    parent.child(index.saturating_sub(1))
                };
                CommandOutcome::Applied
            }
            kind if is_inline_kind(kind) => {
                if let Some(children) = node_mut(tree, &parent).and_then(Node::inline_children_mut) {
                    children.remove(index);
                    merge_text_runs(children);
                }
                *selection = parent;
                CommandOutcome::Applied
            }
            _ => match remove_block(tree, selection) {
                Some(next) => {
                    *selection = next;
                    CommandOutcome::Applied
                }
                None => CommandOutcome::Unchanged,
            },
        }
    }

    fn apply_insert_table(tree: &mut ASTDocument, selection: &mut NodePath, rows: usize, cols: usize) -> CommandOutcome {
        let built = match table::build_table(rows, cols) {
            Ok(built) => built,
            Err(error) => return error.into(),
        };

        let (container, index, replace) = match block_position(tree, selection) {
            Some((container, index)) => {
                let empty = resolve(tree, &container.child(index))
                    .and_then(NodeRef::as_node)
                    .map(|node| *node == Node::empty_paragraph())
                    .unwrap_or(false);
                if empty {
                    (container, index, true)
                } else {
                    (container, index + 1, false)
                }
            }
            None => (NodePath::root(), tree.children.len(), false),
        };

        let Some(blocks) = resolve_mut(tree, &container).and_then(|n| n.into_blocks()) else {
            return CommandOutcome::Unchanged;
        };
        if replace {
            blocks[index] = Node::Table(built);
        } else {
            blocks.insert(index, Node::Table(built));
        }

        debug!(rows, cols, "Inserted table");
        *selection = container.child(index).child(0).child(0);
        CommandOutcome::Applied
    }

    fn apply_delete_table(tree: &mut ASTDocument, selection: &mut NodePath) -> CommandOutcome {
        let Some(table_path) = closest(tree, selection, |kind| kind == NodeKind::Table) else {
            return CommandOutcome::Rejected(NOT_IN_TABLE.to_string());
        };
        match remove_block(tree, &table_path) {
            Some(next) => {
                *selection = next;
                CommandOutcome::Applied
            }
            None => CommandOutcome::Unchanged,
        }
    }

    fn apply_table_edit(&self, tree: &mut ASTDocument, selection: &mut NodePath) -> CommandOutcome {
        let Some(cell_path) = closest(tree, selection, |kind| kind == NodeKind::TableCell) else {
            return CommandOutcome::Rejected(NOT_IN_TABLE.to_string());
        };
        let inner = selection.indices()[cell_path.len()..].to_vec();
        let (Some(row_path), Some(cell)) = (cell_path.parent(), cell_path.last()) else {
            return CommandOutcome::Unchanged;
        };
        let (Some(table_path), Some(row)) = (row_path.parent(), row_path.last()) else {
            return CommandOutcome::Unchanged;
        };
        let Some(Node::Table(grid)) = node_mut(tree, &table_path) else {
            return CommandOutcome::Unchanged;
        };

        // Row and cell the selection should land on, and whether the cell
        // still holds the content the selection pointed into
        let result = match self {
            Command::AddColumnBefore => table::add_column(grid, row, cell, false).map(|_| (row, cell + 1, true)),
            Command::AddColumnAfter => table::add_column(grid, row, cell, true).map(|_| (row, cell, true)),
            Command::DeleteColumn => table::delete_column(grid, row, cell).map(|_| (row, cell, false)),
            Command::AddRowBefore => table::add_row(grid, row, false).map(|_| (row + 1, cell, true)),
            Command::AddRowAfter => table::add_row(grid, row, true).map(|_| (row, cell, true)),
            Command::DeleteRow => table::delete_row(grid, row).map(|_| (row, cell, false)),
            Command::MergeCells { count } => table::merge_cells(grid, row, cell, *count).map(|_| (row, cell, false)),
            Command::ToggleHeaderRow => table::toggle_header_row(grid, row).map(|_| (row, cell, true)),
            Command::SplitCell => match table::split_cell(grid, row, cell) {
                Ok(true) => Ok((row, cell, true)),
                Ok(false) => return CommandOutcome::Unchanged,
                Err(error) => Err(error),
            },
            _ => return CommandOutcome::Unchanged,
        };

        match result {
            Ok((row, cell, keep_inner)) => {
                let (row, cell) = clamp_cell(grid, row, cell);
                let mut indices = table_path.child(row).child(cell).indices().to_vec();
                if keep_inner {
                    indices.extend(inner);
                }
                *selection = NodePath::new(indices);
                CommandOutcome::Applied
            }
            Err(error) => error.into(),
        }
    }
}

const NOT_IN_TABLE: &str = "Selection is not inside a table";

fn clamp_cell(grid: &Table, row: usize, cell: usize) -> (usize, usize) {
    let row = row.min(grid.row_count().saturating_sub(1));
    let cells = grid.rows.get(row).map(|r| r.cells.len()).unwrap_or(1);
    (row, cell.min(cells.saturating_sub(1)))
}

fn is_inline_kind(kind: NodeKind) -> bool {
    matches!(kind, NodeKind::Text | NodeKind::Placeholder | NodeKind::HardBreak)
}

fn node_mut<'a>(tree: &'a mut ASTDocument, path: &NodePath) -> Option<&'a mut Node> {
    resolve_mut(tree, path).and_then(|n| n.into_node())
}

fn closest_textblock_mut<'a>(tree: &'a mut ASTDocument, selection: &NodePath) -> Option<&'a mut Node> {
    let path = closest(tree, selection, NodeKind::is_textblock)?;
    node_mut(tree, &path)
}

fn textblock_align(node: &Node) -> Option<TextAlign> {
    match node {
        Node::Paragraph { align, .. } | Node::Heading { align, .. } => *align,
        _ => None,
    }
}

fn split_last(path: &NodePath) -> Result<(NodePath, usize), CommandError> {
    path.parent()
        .zip(path.last())
        .ok_or_else(|| CommandError::WrongTarget(path.clone(), "node below the root"))
}

/// Deepest block on the selection path that sits directly in a block
/// container (document, list item or cell), as `(container, index)`
fn block_position(tree: &ASTDocument, selection: &NodePath) -> Option<(NodePath, usize)> {
    let kinds = ancestry(tree, selection)?;
    (1..kinds.len())
        .rev()
        .find(|&depth| {
            matches!(
                kinds[depth - 1],
                NodeKind::Document | NodeKind::ListItem | NodeKind::TableCell
            )
        })
        .map(|depth| (selection.prefix(depth - 1), selection.indices()[depth - 1]))
}

/// Remove the block at `path` from its container, keeping the container
/// non-empty. Returns the path to select afterwards.
fn remove_block(tree: &mut ASTDocument, path: &NodePath) -> Option<NodePath> {
    let (container, index) = path.parent().zip(path.last())?;
    let blocks = resolve_mut(tree, &container)?.into_blocks()?;
    if index >= blocks.len() {
        return None;
    }
    blocks.remove(index);
    if blocks.is_empty() {
        blocks.push(Node::empty_paragraph());
    }
    Some(container.child(index.min(blocks.len() - 1)))
}

/// Insert an inline node into a text block, merging text with equally
/// marked neighbours. Returns the index the inserted content ends up at.
fn insert_inline(block: &mut Node, index: usize, node: Node) -> usize {
    let Some(children) = block.inline_children_mut() else {
        return 0;
    };
    let index = index.min(children.len());

    if let Node::Text { content, marks } = &node {
        if let Some(Node::Text {
            content: previous,
            marks: previous_marks,
        }) = index.checked_sub(1).and_then(|i| children.get_mut(i))
        {
            if previous_marks == marks {
                previous.push_str(content);
                merge_text_runs(children);
                return index - 1;
            }
        }
    }

    children.insert(index, node);
    merge_text_runs(children);
    index.min(children.len().saturating_sub(1))
}

/// Merge adjacent text runs that carry the same marks and drop empty runs
pub fn merge_text_runs(children: &mut Vec<Node>) {
    let mut merged: Vec<Node> = Vec::with_capacity(children.len());
    for node in children.drain(..) {
        match (merged.last_mut(), node) {
            (_, Node::Text { content, .. }) if content.is_empty() => {}
            (
                Some(Node::Text {
                    content: previous,
                    marks: previous_marks,
                }),
                Node::Text { content, marks },
            ) if *previous_marks == marks => previous.push_str(&content),
            (_, node) => merged.push(node),
        }
    }
    *children = merged;
}

#[cfg(test)]
mod tests {
    use super::*;
    use templet_parser::ast::Marks;
    use templet_parser::parse;

    fn run(command: Command, tree: &mut ASTDocument, selection: &mut NodePath) -> CommandOutcome {
        command.apply(tree, selection).unwrap()
    }

    #[test]
    fn test_command_serialization() {
        let command = Command::InsertTable { rows: 3, cols: 4 };
        let json = serde_json::to_string(&command).unwrap();
        assert_eq!(json, r#"{"type":"InsertTable","rows":3,"cols":4}"#);
        assert_eq!(Command::from_json(&json).unwrap(), command);

        let command = Command::from_json(r#"{"type":"SetHeading","level":2}"#).unwrap();
        assert_eq!(command, Command::SetHeading { level: HeadingLevel::H2 });
        assert!(Command::from_json(r#"{"type":"SetHeading","level":4}"#).is_err());
    }

    #[test]
    fn test_default_command_inserts_two_by_two_table() {
        assert_eq!(Command::default(), Command::InsertTable { rows: 2, cols: 2 });
    }

    #[test]
    fn test_invalid_selection_is_an_error() {
        let mut tree = parse("<p>x</p>");
        let mut selection = NodePath::new(vec![3]);
        assert_eq!(
            Command::Indent.apply(&mut tree, &mut selection),
            Err(CommandError::InvalidSelection(NodePath::new(vec![3])))
        );
    }

    #[test]
    fn test_set_heading_keeps_content_and_alignment() {
        let mut tree = parse("<p style=\"text-align: center\">Title</p>");
        let mut selection = NodePath::new(vec![0, 0]);

        let outcome = run(Command::SetHeading { level: HeadingLevel::H1 }, &mut tree, &mut selection);
        assert_eq!(outcome, CommandOutcome::Applied);
        assert_eq!(
            tree.children[0],
            Node::Heading {
                level: HeadingLevel::H1,
                align: Some(TextAlign::Center),
                children: vec![Node::text("Title")],
            }
        );

        let outcome = run(Command::SetHeading { level: HeadingLevel::H1 }, &mut tree, &mut selection);
        assert_eq!(outcome, CommandOutcome::Unchanged);
        assert_eq!(run(Command::SetParagraph, &mut tree, &mut selection), CommandOutcome::Applied);
    }

    #[test]
    fn test_set_text_align() {
        let mut tree = parse("<p>x</p>");
        let mut selection = NodePath::new(vec![0]);
        let align = Command::SetTextAlign { align: Some(TextAlign::Right) };

        assert_eq!(run(align.clone(), &mut tree, &mut selection), CommandOutcome::Applied);
        assert_eq!(run(align, &mut tree, &mut selection), CommandOutcome::Unchanged);
    }

    #[test]
    fn test_toggle_mark_on_block() {
        let mut tree = parse("<p>a <b>b</b></p>");
        let mut selection = NodePath::new(vec![0]);

        run(Command::ToggleMark { mark: Mark::Bold }, &mut tree, &mut selection);
        assert_eq!(
            tree.children[0],
            Node::paragraph(vec![Node::Text {
                content: "a b".to_string(),
                marks: Marks::bold(),
            }])
        );

        run(Command::ToggleMark { mark: Mark::Bold }, &mut tree, &mut selection);
        assert_eq!(tree.children[0], Node::paragraph(vec![Node::text("a b")]));
    }

    #[test]
    fn test_toggle_mark_on_single_run() {
        let mut tree = parse("<p>a<span class=\"be-variable\"></span>b</p>");
        let mut selection = NodePath::new(vec![0, 2]);

        run(Command::ToggleMark { mark: Mark::Italic }, &mut tree, &mut selection);
        let children = tree.children[0].inline_children().unwrap();
        assert_eq!(children[0], Node::text("a"));
        assert!(matches!(&children[2], Node::Text { marks, .. } if marks.italic));
        assert_eq!(selection, NodePath::new(vec![0]));
    }

    #[test]
    fn test_insert_placeholder_and_delete_it_whole() {
        let mut tree = parse("<p>Hi </p>");
        let mut selection = NodePath::new(vec![0, 0]);

        assert_eq!(run(Command::InsertPlaceholder, &mut tree, &mut selection), CommandOutcome::Applied);
        assert_eq!(selection, NodePath::new(vec![0, 1]));
        assert_eq!(
            tree.children[0],
            Node::paragraph(vec![Node::text("Hi "), Node::Placeholder])
        );

        assert_eq!(run(Command::DeleteNode, &mut tree, &mut selection), CommandOutcome::Applied);
        assert_eq!(tree.children[0], Node::paragraph(vec![Node::text("Hi ")]));
        assert_eq!(selection, NodePath::new(vec![0]));
    }

    #[test]
    fn test_insert_text_merges_runs() {
        let mut tree = parse("<p>Hello</p>");
        let mut selection = NodePath::new(vec![0]);

        run(Command::InsertText { text: " world".to_string() }, &mut tree, &mut selection);
        assert_eq!(tree.children[0], Node::paragraph(vec![Node::text("Hello world")]));
        assert_eq!(selection, NodePath::new(vec![0, 0]));
    }

    #[test]
    fn test_update_text_to_empty_removes_run() {
        let mut tree = parse("<p>a<br>b</p>");
        let mut selection = NodePath::new(vec![0, 2]);

        run(Command::UpdateText { content: String::new() }, &mut tree, &mut selection);
        assert_eq!(tree.children[0], Node::paragraph(vec![Node::text("a"), Node::HardBreak]));
        assert_eq!(selection, NodePath::new(vec![0]));

        let mut selection = NodePath::new(vec![0]);
        assert!(matches!(
            Command::UpdateText { content: "x".to_string() }.apply(&mut tree, &mut selection),
            Err(CommandError::WrongTarget(_, _))
        ));
    }

    #[test]
    fn test_delete_last_block_leaves_empty_paragraph() {
        let mut tree = parse("<h1>only</h1>");
        let mut selection = NodePath::new(vec![0]);

        assert_eq!(run(Command::DeleteNode, &mut tree, &mut selection), CommandOutcome::Applied);
        assert_eq!(tree.children, vec![Node::empty_paragraph()]);
        assert_eq!(selection, NodePath::new(vec![0]));
    }

    #[test]
    fn test_delete_last_item_removes_list() {
        let mut tree = parse("<p>a</p><ul><li>x</li></ul>");
        let mut selection = NodePath::new(vec![1, 0]);

        assert_eq!(run(Command::DeleteNode, &mut tree, &mut selection), CommandOutcome::Applied);
        assert_eq!(tree.children.len(), 1);
        assert_eq!(selection, NodePath::new(vec![0]));
    }

    #[test]
    fn test_insert_table_replaces_empty_paragraph() {
        let mut tree = ASTDocument::blank();
        let mut selection = NodePath::new(vec![0]);

        assert_eq!(run(Command::default(), &mut tree, &mut selection), CommandOutcome::Applied);
        assert_eq!(tree.children.len(), 1);
        assert!(matches!(tree.children[0], Node::Table(_)));
        assert_eq!(selection, NodePath::new(vec![0, 0, 0]));
    }

    #[test]
    fn test_insert_table_after_content() {
        let mut tree = parse("<p>text</p>");
        let mut selection = NodePath::new(vec![0, 0]);

        run(Command::InsertTable { rows: 3, cols: 1 }, &mut tree, &mut selection);
        assert_eq!(tree.children.len(), 2);
        assert_eq!(selection, NodePath::new(vec![1, 0, 0]));
        assert!(matches!(
            Command::InsertTable { rows: 0, cols: 1 }.apply(&mut tree, &mut selection),
            Ok(CommandOutcome::Rejected(_))
        ));
    }

    #[test]
    fn test_oversized_insert_table_is_rejected() {
        let mut tree = parse("<p>text</p>");
        let mut selection = NodePath::new(vec![0]);
        let before = tree.clone();

        let outcome = run(Command::InsertTable { rows: 1_000_000, cols: 1_000_000 }, &mut tree, &mut selection);
        assert!(matches!(outcome, CommandOutcome::Rejected(_)));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_table_edit_outside_table_is_rejected() {
        let mut tree = parse("<p>x</p>");
        let mut selection = NodePath::new(vec![0]);
        assert_eq!(
            run(Command::AddRowAfter, &mut tree, &mut selection),
            CommandOutcome::Rejected(NOT_IN_TABLE.to_string())
        );
    }

    #[test]
    fn test_merge_text_runs() {
        let mut children = vec![
            Node::text("a"),
            Node::text(""),
            Node::text("b"),
            Node::Placeholder,
            Node::text("c"),
        ];
        merge_text_runs(&mut children);
        assert_eq!(children, vec![Node::text("ab"), Node::Placeholder, Node::text("c")]);
    }
}
