use crate::ast::*;
use crate::level::ListLevel;
use crate::tokenizer::{tokenize, Lexeme, StartTag};
use templet_codec::PLACEHOLDER_CLASS;
use tracing::debug;

/// Elements that never have content
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements dropped together with everything inside them
const SKIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "title", "template", "noscript", "svg", "math", "iframe", "object",
    "video", "audio", "canvas", "select", "textarea",
];

/// Block-level wrappers whose children are hoisted into the parent
const TRANSPARENT_BLOCKS: &[&str] = &[
    "html", "head", "body", "div", "section", "article", "header", "footer", "main", "nav",
    "aside", "blockquote", "pre", "form", "fieldset", "figure", "figcaption", "address", "center",
    "dl", "dt", "dd", "details", "summary",
];

/// Table parts that only have meaning inside a table
const TABLE_PARTS: &[&str] = &[
    "thead", "tbody", "tfoot", "tr", "td", "th", "caption", "colgroup", "col",
];

/// Open elements beyond this depth are unwrapped: their content is kept in
/// the enclosing element
const MAX_DEPTH: usize = 256;

/// Where a block flow is being collected, which decides the start tags
/// that implicitly end it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Root,
    ListItem,
    Cell,
    /// Content fostered out of a table
    Table,
}

impl Flow {
    fn stops_at(self, name: &str) -> bool {
        match self {
            Flow::Root => false,
            Flow::ListItem => name == "li",
            Flow::Cell => matches!(name, "td" | "th" | "tr"),
            Flow::Table => TABLE_PARTS.contains(&name),
        }
    }
}

fn is_heading(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// Start tags that end an open paragraph or inline element
fn is_block_start(name: &str) -> bool {
    matches!(name, "p" | "ul" | "ol" | "li" | "table")
        || is_heading(name)
        || TRANSPARENT_BLOCKS.contains(&name)
        || TABLE_PARTS.contains(&name)
}

/// End tags that close each other
fn same_element(open: &str, close: &str) -> bool {
    open == close
        || (matches!(open, "td" | "th") && matches!(close, "td" | "th"))
        || (is_heading(open) && is_heading(close))
}

fn is_blank(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_whitespace())
}

/// Tolerant HTML tree builder for template markup
pub struct Parser {
    lexemes: Vec<Lexeme>,
    pos: usize,
    /// Names of the elements currently open, outermost first
    open: Vec<String>,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self {
            lexemes: tokenize(source),
            pos: 0,
            open: Vec::new(),
        }
    }

    /// Build the document. Never fails: unknown or broken markup degrades
    /// to text or is dropped.
    pub fn parse_document(&mut self) -> Document {
        let mut children = Vec::new();
        while self.peek().is_some() {
            let start = self.pos;
            children.extend(self.parse_flow(Flow::Root));
            if self.pos == start {
                self.advance();
            }
        }
        Document::new(children)
    }

    fn peek(&self) -> Option<&Lexeme> {
        self.lexemes.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn is_current(&self, name: &str) -> bool {
        self.open
            .last()
            .map(|top| same_element(top, name))
            .unwrap_or(false)
    }

    fn in_scope(&self, name: &str) -> bool {
        self.open.iter().any(|open| same_element(open, name))
    }

    /// Handle an end tag inside a container named on top of the stack.
    /// Returns true when the container is finished.
    fn close_container(&mut self, name: &str) -> bool {
        if self.is_current(name) {
            self.advance();
            true
        } else if self.in_scope(name) {
            true
        } else {
            self.advance();
            false
        }
    }

    fn at_depth_limit(&self) -> bool {
        self.open.len() >= MAX_DEPTH
    }

    fn with_open<T>(&mut self, name: &str, f: impl FnOnce(&mut Self) -> T) -> T {
        self.open.push(name.to_string());
        let result = f(self);
        self.open.pop();
        result
    }

    /// Collect blocks until the enclosing container ends
    fn parse_flow(&mut self, flow: Flow) -> Vec<Node> {
        let mut blocks = Vec::new();
        let mut run = Vec::new();

        while let Some(lexeme) = self.peek() {
            match lexeme {
                Lexeme::Text(text) => {
                    let text = text.clone();
                    self.advance();
                    push_text(&mut run, &text, Marks::default());
                }
                Lexeme::Close(name) => {
                    let name = name.clone();
                    if self.close_container(&name) {
                        break;
                    }
                }
                Lexeme::Open(tag) => {
                    if flow.stops_at(&tag.name) {
                        break;
                    }
                    let tag = tag.clone();
                    if is_block_start(&tag.name) {
                        flush_run(&mut run, &mut blocks);
                        self.advance();
                        if self.at_depth_limit() {
                            continue;
                        }
                        self.parse_block(tag, flow, &mut blocks);
                    } else {
                        self.parse_inline_open(tag, Marks::default(), &mut run);
                    }
                }
            }
        }

        flush_run(&mut run, &mut blocks);
        blocks
    }

    /// Parse a block element whose start tag was just consumed
    fn parse_block(&mut self, tag: StartTag, flow: Flow, blocks: &mut Vec<Node>) {
        let name = tag.name.as_str();
        match name {
            "p" => blocks.push(self.parse_textblock(&tag)),
            _ if is_heading(name) => blocks.push(self.parse_textblock(&tag)),
            "ul" | "ol" => {
                if let Some(list) = self.parse_list(&tag) {
                    blocks.push(list);
                }
            }
            "table" => {
                let (table, fostered, overflow) = self.parse_table(&tag);
                blocks.extend(fostered);
                if let Some(table) = table {
                    blocks.push(Node::Table(table));
                }
                blocks.extend(overflow);
            }
            _ => {
                // Wrappers and misplaced list or table parts
                if !tag.self_closing && !VOID_ELEMENTS.contains(&name) {
                    let inner = self.with_open(name, |p| p.parse_flow(flow));
                    blocks.extend(inner);
                }
            }
        }
    }

    fn parse_textblock(&mut self, tag: &StartTag) -> Node {
        let mut children = Vec::new();
        if !tag.self_closing {
            self.with_open(&tag.name, |p| p.parse_inline(Marks::default(), &mut children));
        }
        let align = tag.style("text-align").and_then(|value| TextAlign::parse(&value));

        match HeadingLevel::from_tag(&tag.name) {
            Some(level) => Node::Heading {
                level,
                align,
                children,
            },
            None => Node::Paragraph { align, children },
        }
    }

    /// Inline content up to the end of the element on top of the stack
    fn parse_inline(&mut self, marks: Marks, out: &mut Vec<Node>) {
        while let Some(lexeme) = self.peek() {
            match lexeme {
                Lexeme::Text(text) => {
                    let text = text.clone();
                    self.advance();
                    push_text(out, &text, marks);
                }
                Lexeme::Close(name) => {
                    let name = name.clone();
                    if self.close_container(&name) {
                        return;
                    }
                }
                Lexeme::Open(tag) => {
                    if is_block_start(&tag.name) {
                        return;
                    }
                    let tag = tag.clone();
                    self.parse_inline_open(tag, marks, out);
                }
            }
        }
    }

    /// Handle an inline start tag that has not been consumed yet
    fn parse_inline_open(&mut self, tag: StartTag, marks: Marks, out: &mut Vec<Node>) {
        self.advance();
        let name = tag.name.as_str();

        if name == "br" {
            out.push(Node::HardBreak);
            return;
        }
        if VOID_ELEMENTS.contains(&name) {
            return;
        }
        if name == "span" && tag.has_class(PLACEHOLDER_CLASS) {
            out.push(Node::Placeholder);
            if !tag.self_closing {
                self.skip_content(name);
            }
            return;
        }
        if SKIPPED_ELEMENTS.contains(&name) {
            if !tag.self_closing {
                self.skip_content(name);
            }
            return;
        }
        if tag.self_closing || self.at_depth_limit() {
            return;
        }

        let marks = match name {
            "strong" | "b" => marks.with(Mark::Bold, true),
            "em" | "i" => marks.with(Mark::Italic, true),
            "u" => marks.with(Mark::Underline, true),
            _ => marks,
        };
        self.with_open(name, |p| p.parse_inline(marks, out));
    }

    /// Drop everything up to the end tag matching an already consumed start
    /// tag, honouring nesting of the same element
    fn skip_content(&mut self, name: &str) {
        let mut depth = 1usize;
        while let Some(lexeme) = self.peek() {
            match lexeme {
                Lexeme::Open(tag) if tag.name == name && !tag.self_closing => depth += 1,
                Lexeme::Close(close) if close == name => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                Lexeme::Close(close) if self.in_scope(close) => return,
                _ => {}
            }
            self.advance();
        }
    }

    fn parse_list(&mut self, tag: &StartTag) -> Option<Node> {
        let mut items: Vec<ListItem> = Vec::new();
        if !tag.self_closing {
            self.with_open(&tag.name, |p| p.parse_list_items(&mut items));
        }
        if items.is_empty() {
            return None;
        }

        let list = if tag.name == "ol" {
            let level = tag
                .attr("data-level")
                .and_then(|value| value.trim().parse::<i64>().ok())
                .map(ListLevel::clamped)
                .unwrap_or_default();
            let start = tag
                .attr("start")
                .and_then(|value| value.trim().parse::<i64>().ok())
                .filter(|&start| start >= 1)
                .map(|start| u32::try_from(start).unwrap_or(u32::MAX))
                .unwrap_or(1);
            Node::OrderedList { level, start, items }
        } else {
            Node::BulletList { items }
        };
        Some(list)
    }

    fn parse_list_items(&mut self, items: &mut Vec<ListItem>) {
        while let Some(lexeme) = self.peek() {
            match lexeme {
                Lexeme::Close(name) => {
                    let name = name.clone();
                    if self.close_container(&name) {
                        return;
                    }
                }
                Lexeme::Text(text) if is_blank(text) => self.advance(),
                Lexeme::Open(tag) if tag.name == "li" => {
                    let tag = tag.clone();
                    self.advance();
                    let children = if tag.self_closing {
                        Vec::new()
                    } else {
                        self.with_open("li", |p| p.parse_flow(Flow::ListItem))
                    };
                    items.push(ListItem::new(non_empty(children)));
                }
                Lexeme::Open(tag) if matches!(tag.name.as_str(), "ul" | "ol") => {
                    // A list nested directly in a list belongs to the item before it
                    let tag = tag.clone();
                    self.advance();
                    if self.at_depth_limit() {
                        continue;
                    }
                    if let Some(nested) = self.parse_list(&tag) {
                        match items.last_mut() {
                            Some(item) => item.children.push(nested),
                            None => items.push(ListItem::new(vec![nested])),
                        }
                    }
                }
                _ => {
                    // Content outside any item gets an item of its own
                    let start = self.pos;
                    let children = self.with_open("#item", |p| p.parse_flow(Flow::ListItem));
                    if !children.is_empty() {
                        items.push(ListItem::new(children));
                    }
                    if self.pos == start {
                        self.advance();
                    }
                }
            }
        }
    }

    /// Returns the table, the content fostered ahead of it and the rows
    /// past the cell budget, unwrapped into blocks that follow it
    fn parse_table(&mut self, tag: &StartTag) -> (Option<Table>, Vec<Node>, Vec<Node>) {
        let mut grid = RawTable::default();
        if !tag.self_closing {
            self.with_open("table", |p| p.parse_table_section(&mut grid));
        }
        let fostered = std::mem::take(&mut grid.fostered);
        let (table, overflow) = grid.build();
        (table, fostered, overflow)
    }

    /// Rows of a table or of a `thead`/`tbody`/`tfoot` inside it
    fn parse_table_section(&mut self, grid: &mut RawTable) {
        while let Some(lexeme) = self.peek() {
            match lexeme {
                Lexeme::Close(name) => {
                    let name = name.clone();
                    if self.close_container(&name) {
                        return;
                    }
                }
                Lexeme::Text(text) if is_blank(text) => self.advance(),
                Lexeme::Open(tag) => {
                    let tag = tag.clone();
                    match tag.name.as_str() {
                        "tr" => {
                            self.advance();
                            let row = if tag.self_closing {
                                RawRow::default()
                            } else {
                                self.with_open("tr", |p| p.parse_row(grid))
                            };
                            grid.rows.push(row);
                        }
                        "td" | "th" => {
                            let row = self.with_open("#row", |p| p.parse_row(grid));
                            grid.rows.push(row);
                        }
                        "thead" | "tbody" | "tfoot" | "colgroup" => {
                            self.advance();
                            if !tag.self_closing && !self.at_depth_limit() {
                                self.with_open(&tag.name, |p| p.parse_table_section(grid));
                            }
                        }
                        "col" => {
                            self.advance();
                            grid.push_col(&tag);
                        }
                        "caption" => {
                            self.advance();
                            if !tag.self_closing {
                                let blocks = self.with_open("caption", |p| p.parse_flow(Flow::Root));
                                grid.fostered.extend(blocks);
                            }
                        }
                        _ => self.foster(grid),
                    }
                }
                Lexeme::Text(_) => self.foster(grid),
            }
        }
    }

    fn parse_row(&mut self, grid: &mut RawTable) -> RawRow {
        let mut row = RawRow::default();
        while let Some(lexeme) = self.peek() {
            match lexeme {
                Lexeme::Close(name) => {
                    let name = name.clone();
                    if self.close_container(&name) {
                        break;
                    }
                }
                Lexeme::Text(text) if is_blank(text) => self.advance(),
                Lexeme::Open(tag) if matches!(tag.name.as_str(), "td" | "th") => {
                    let tag = tag.clone();
                    self.advance();
                    let children = if tag.self_closing {
                        Vec::new()
                    } else {
                        self.with_open(&tag.name, |p| p.parse_flow(Flow::Cell))
                    };
                    let room = MAX_TABLE_COLUMNS.saturating_sub(row.span());
                    if room == 0 {
                        // Row is full: the content joins its last cell
                        if let Some(last) = row.cells.last_mut() {
                            last.cell.children.extend(children);
                        }
                        continue;
                    }
                    let colspan = tag
                        .attr("colspan")
                        .and_then(|value| value.trim().parse::<u32>().ok())
                        .unwrap_or(1)
                        .clamp(1, u32::try_from(room).unwrap_or(u32::MAX));
                    row.cells.push(RawCell {
                        header: tag.name == "th",
                        cell: TableCell {
                            colspan,
                            children: non_empty(children),
                        },
                    });
                }
                Lexeme::Open(tag) if TABLE_PARTS.contains(&tag.name.as_str()) => break,
                _ => self.foster(grid),
            }
        }
        row
    }

    /// Move stray content out of a table, ahead of it
    fn foster(&mut self, grid: &mut RawTable) {
        let start = self.pos;
        let blocks = self.with_open("#foster", |p| p.parse_flow(Flow::Table));
        grid.fostered.extend(blocks);
        if self.pos == start {
            self.advance();
        }
    }
}

#[derive(Debug)]
struct RawCell {
    header: bool,
    cell: TableCell,
}

#[derive(Debug, Default)]
struct RawRow {
    cells: Vec<RawCell>,
}

impl RawRow {
    fn span(&self) -> usize {
        self.cells.iter().map(|c| c.cell.colspan as usize).sum()
    }
}

#[derive(Debug, Default)]
struct RawTable {
    rows: Vec<RawRow>,
    col_widths: Vec<Option<f64>>,
    fostered: Vec<Node>,
}

impl RawTable {
    fn push_col(&mut self, tag: &StartTag) {
        let width = tag
            .style("width")
            .or_else(|| tag.attr("width").map(str::to_string))
            .and_then(|value| parse_percent(&value));
        let room = MAX_TABLE_COLUMNS.saturating_sub(self.col_widths.len());
        let span = tag
            .attr("span")
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .clamp(1, MAX_TABLE_COLUMNS)
            .min(room);
        self.col_widths.extend(std::iter::repeat(width).take(span));
    }

    /// Square up the collected rows. Tables without a single cell vanish.
    ///
    /// Rows that would push the padded grid past [`MAX_TABLE_CELLS`] are not
    /// kept as rows; their cell content is returned as loose blocks.
    fn build(self) -> (Option<Table>, Vec<Node>) {
        let mut rows: Vec<RawRow> = self.rows.into_iter().filter(|row| !row.cells.is_empty()).collect();
        let Some(width) = rows.iter().map(RawRow::span).max() else {
            return (None, Vec::new());
        };

        let kept = (MAX_TABLE_CELLS / width).max(1);
        let overflow: Vec<Node> = if rows.len() > kept {
            debug!(rows = rows.len(), kept, width, "Table exceeds cell budget");
            rows.split_off(kept)
                .into_iter()
                .flat_map(|row| row.cells)
                .flat_map(|raw| raw.cell.children)
                .collect()
        } else {
            Vec::new()
        };

        let columns = if self.col_widths.len() == width && self.col_widths.iter().all(Option::is_some) {
            let mut columns: Vec<ColumnSpec> = self
                .col_widths
                .iter()
                .map(|width| ColumnSpec {
                    width: width.unwrap_or_default(),
                })
                .collect();
            normalize_columns(&mut columns);
            columns
        } else {
            equal_columns(width)
        };

        let rows = rows
            .into_iter()
            .map(|raw| {
                let is_header = raw.cells.iter().all(|c| c.header);
                let mut row = TableRow {
                    is_header,
                    cells: raw.cells.into_iter().map(|c| c.cell).collect(),
                };
                let missing = width.saturating_sub(row.span());
                row.cells.extend(std::iter::repeat_with(TableCell::empty).take(missing));
                row
            })
            .collect();

        (Some(Table { columns, rows }), overflow)
    }
}

/// Parse `"25%"`, `"25"` or `"25.5 %"` into a number
fn parse_percent(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix('%').unwrap_or(value).trim();
    number.parse::<f64>().ok().filter(|w| w.is_finite() && *w > 0.0)
}

/// Append text, merging with a preceding run that carries the same marks
fn push_text(out: &mut Vec<Node>, text: &str, marks: Marks) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text {
        content,
        marks: last_marks,
    }) = out.last_mut()
    {
        if *last_marks == marks {
            content.push_str(text);
            return;
        }
    }
    out.push(Node::Text {
        content: text.to_string(),
        marks,
    });
}

/// Wrap loose inline content into a paragraph. Whitespace-only runs between
/// blocks are dropped.
fn flush_run(run: &mut Vec<Node>, blocks: &mut Vec<Node>) {
    if run.is_empty() {
        return;
    }
    let blank = run.iter().all(|node| match node {
        Node::Text { content, .. } => is_blank(content),
        _ => false,
    });
    let children = std::mem::take(run);
    if !blank {
        blocks.push(Node::paragraph(children));
    }
}

/// Item and cell bodies always hold at least one block
fn non_empty(children: Vec<Node>) -> Vec<Node> {
    if children.is_empty() {
        vec![Node::empty_paragraph()]
    } else {
        children
    }
}

/// Parse template markup into a document tree
pub fn parse(source: &str) -> Document {
    let mut parser = Parser::new(source);
    let doc = parser.parse_document();
    debug!(
        bytes = source.len(),
        blocks = doc.children.len(),
        "Parsed template markup"
    );
    doc
}
