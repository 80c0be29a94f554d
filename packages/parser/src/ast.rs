use crate::level::ListLevel;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Root of a template document. Holds block nodes only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Fresh document for a new session: one empty paragraph
    pub fn blank() -> Self {
        Self {
            children: vec![Node::empty_paragraph()],
        }
    }

    /// Visit every node depth-first, list items, rows and cells included
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(NodeVisit<'a>)) {
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// Inline formatting carried by a text run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Marks {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub underline: bool,
}

impl Marks {
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.bold && !self.italic && !self.underline
    }

    pub fn has(&self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
            Mark::Underline => self.underline,
        }
    }

    pub fn with(mut self, mark: Mark, on: bool) -> Self {
        match mark {
            Mark::Bold => self.bold = on,
            Mark::Italic => self.italic = on,
            Mark::Underline => self.underline = on,
        }
        self
    }
}

/// A single inline mark kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Bold,
    Italic,
    Underline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" => Some(TextAlign::Right),
            _ => None,
        }
    }

    pub fn css_name(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Heading level must be 1, 2 or 3, got {0}")]
pub struct InvalidHeadingLevel(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn get(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }

    /// Map an element name to a heading level; `h4`..`h6` are not headings here
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "h1" => Some(HeadingLevel::H1),
            "h2" => Some(HeadingLevel::H2),
            "h3" => Some(HeadingLevel::H3),
            _ => None,
        }
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = InvalidHeadingLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(HeadingLevel::H1),
            2 => Ok(HeadingLevel::H2),
            3 => Ok(HeadingLevel::H3),
            other => Err(InvalidHeadingLevel(other)),
        }
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.get()
    }
}

/// Document node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    /// Run of text sharing one set of marks
    Text {
        content: String,
        #[serde(default, skip_serializing_if = "Marks::is_empty")]
        marks: Marks,
    },

    Paragraph {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        align: Option<TextAlign>,
        children: Vec<Node>,
    },

    Heading {
        level: HeadingLevel,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        align: Option<TextAlign>,
        children: Vec<Node>,
    },

    BulletList {
        items: Vec<ListItem>,
    },

    OrderedList {
        #[serde(default)]
        level: ListLevel,
        #[serde(default = "default_start")]
        start: u32,
        items: Vec<ListItem>,
    },

    Table(Table),

    /// Atomic template variable. Has no content of its own.
    Placeholder,

    HardBreak,
}

fn default_start() -> u32 {
    1
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text {
            content: content.into(),
            marks: Marks::default(),
        }
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Paragraph {
            align: None,
            children,
        }
    }

    pub fn empty_paragraph() -> Self {
        Node::paragraph(Vec::new())
    }

    pub fn ordered_list(items: Vec<ListItem>) -> Self {
        Node::OrderedList {
            level: ListLevel::default(),
            start: default_start(),
            items,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Node::Text { .. } | Node::Placeholder | Node::HardBreak)
    }

    pub fn is_textblock(&self) -> bool {
        matches!(self, Node::Paragraph { .. } | Node::Heading { .. })
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Node::BulletList { .. } | Node::OrderedList { .. })
    }

    /// Inline children of a paragraph or heading
    pub fn inline_children(&self) -> Option<&Vec<Node>> {
        match self {
            Node::Paragraph { children, .. } | Node::Heading { children, .. } => Some(children),
            _ => None,
        }
    }

    pub fn inline_children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Paragraph { children, .. } | Node::Heading { children, .. } => Some(children),
            _ => None,
        }
    }

    pub fn list_items(&self) -> Option<&Vec<ListItem>> {
        match self {
            Node::BulletList { items } | Node::OrderedList { items, .. } => Some(items),
            _ => None,
        }
    }

    pub fn list_items_mut(&mut self) -> Option<&mut Vec<ListItem>> {
        match self {
            Node::BulletList { items } | Node::OrderedList { items, .. } => Some(items),
            _ => None,
        }
    }

    /// Whether two lists are of the same kind (attributes ignored)
    pub fn same_list_kind(&self, other: &Node) -> bool {
        matches!(
            (self, other),
            (Node::BulletList { .. }, Node::BulletList { .. })
                | (Node::OrderedList { .. }, Node::OrderedList { .. })
        )
    }

    /// Empty list of the same kind with default attributes
    pub fn empty_list_like(&self) -> Option<Node> {
        match self {
            Node::BulletList { .. } => Some(Node::BulletList { items: Vec::new() }),
            Node::OrderedList { .. } => Some(Node::ordered_list(Vec::new())),
            _ => None,
        }
    }

    /// Plain text of this node and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text { content, .. } => out.push_str(content),
            Node::Paragraph { children, .. } | Node::Heading { children, .. } => {
                children.iter().for_each(|c| c.collect_text(out))
            }
            Node::BulletList { items } | Node::OrderedList { items, .. } => items
                .iter()
                .flat_map(|item| &item.children)
                .for_each(|c| c.collect_text(out)),
            Node::Table(table) => table
                .rows
                .iter()
                .flat_map(|row| &row.cells)
                .flat_map(|cell| &cell.children)
                .for_each(|c| c.collect_text(out)),
            Node::Placeholder | Node::HardBreak => {}
        }
    }

    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(NodeVisit<'a>)) {
        visit(NodeVisit::Node(self));
        match self {
            Node::Paragraph { children, .. } | Node::Heading { children, .. } => {
                for child in children {
                    child.walk(visit);
                }
            }
            Node::BulletList { items } | Node::OrderedList { items, .. } => {
                for item in items {
                    visit(NodeVisit::Item(item));
                    for child in &item.children {
                        child.walk(visit);
                    }
                }
            }
            Node::Table(table) => {
                for row in &table.rows {
                    visit(NodeVisit::Row(row));
                    for cell in &row.cells {
                        visit(NodeVisit::Cell(cell));
                        for child in &cell.children {
                            child.walk(visit);
                        }
                    }
                }
            }
            Node::Text { .. } | Node::Placeholder | Node::HardBreak => {}
        }
    }
}

/// Visitor payload for [`Document::walk`]
#[derive(Debug, Clone, Copy)]
pub enum NodeVisit<'a> {
    Node(&'a Node),
    Item(&'a ListItem),
    Row(&'a TableRow),
    Cell(&'a TableCell),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListItem {
    pub children: Vec<Node>,
}

impl ListItem {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self::new(vec![Node::paragraph(vec![Node::text(text)])])
    }
}

/// Width metadata of one table column, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Number of logical columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Sum of all column widths
    pub fn total_width(&self) -> f64 {
        self.columns.iter().map(|c| c.width).sum()
    }

    /// Check the table invariants: at least 1x1, every row spans exactly the
    /// column count, widths positive and summing to 100.
    pub fn is_well_formed(&self) -> bool {
        !self.rows.is_empty()
            && !self.columns.is_empty()
            && self.rows.iter().all(|row| row.span() == self.columns.len())
            && self.columns.iter().all(|c| c.width > 0.0)
            && (self.total_width() - 100.0).abs() < WIDTH_TOLERANCE
    }
}

/// Accepted drift of a width sum from 100
pub const WIDTH_TOLERANCE: f64 = 1e-6;

/// Most logical columns a table may span
pub const MAX_TABLE_COLUMNS: usize = 1_000;

/// Most cells a table may hold, padding included
pub const MAX_TABLE_CELLS: usize = 10_000;

/// Whether a `rows` x `cols` grid stays within [`MAX_TABLE_CELLS`]
pub fn fits_cell_budget(rows: usize, cols: usize) -> bool {
    cols <= MAX_TABLE_COLUMNS && rows.checked_mul(cols).is_some_and(|cells| cells <= MAX_TABLE_CELLS)
}

/// Equal widths for `count` columns
pub fn equal_columns(count: usize) -> Vec<ColumnSpec> {
    let width = 100.0 / count as f64;
    vec![ColumnSpec { width }; count]
}

/// Scale widths so they sum to 100, keeping their ratios.
///
/// Falls back to equal widths when any width is not positive. Widths that
/// already sum to 100 are left bit-for-bit untouched.
pub fn normalize_columns(columns: &mut [ColumnSpec]) {
    if columns.is_empty() {
        return;
    }
    let total: f64 = columns.iter().map(|c| c.width).sum();
    if !total.is_finite() || columns.iter().any(|c| !(c.width > 0.0)) {
        let width = 100.0 / columns.len() as f64;
        columns.iter_mut().for_each(|c| c.width = width);
        return;
    }
    if (total - 100.0).abs() < WIDTH_TOLERANCE {
        return;
    }
    columns
        .iter_mut()
        .for_each(|c| c.width = c.width * 100.0 / total);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub is_header: bool,
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Number of logical columns this row covers
    pub fn span(&self) -> usize {
        self.cells.iter().map(|c| c.colspan as usize).sum()
    }

    /// First logical column of the cell at `index`
    pub fn column_of(&self, index: usize) -> usize {
        self.cells[..index.min(self.cells.len())]
            .iter()
            .map(|c| c.colspan as usize)
            .sum()
    }

    /// Cell covering logical column `column`, with that cell's first column
    pub fn cell_at_column(&self, column: usize) -> Option<(usize, usize)> {
        let mut start = 0;
        for (index, cell) in self.cells.iter().enumerate() {
            let end = start + cell.colspan as usize;
            if column < end {
                return Some((index, start));
            }
            start = end;
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    #[serde(default = "default_colspan")]
    pub colspan: u32,
    pub children: Vec<Node>,
}

fn default_colspan() -> u32 {
    1
}

impl TableCell {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            colspan: 1,
            children,
        }
    }

    /// Cell holding one empty paragraph
    pub fn empty() -> Self {
        Self::new(vec![Node::empty_paragraph()])
    }

    pub fn is_blank(&self) -> bool {
        self.children.iter().all(|child| match child {
            Node::Paragraph { children, .. } => children.is_empty(),
            _ => false,
        })
    }
}
