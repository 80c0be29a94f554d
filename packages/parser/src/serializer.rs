use crate::ast::*;
use crate::entities::{escape_attribute, escape_text};
use templet_codec::PLACEHOLDER_MARKUP;

const PARAGRAPH_CLASS: &str = "text-xs font-400";
const HEADING_CLASS: &str = "text-xs font-bold";
const LIST_ITEM_CLASS: &str = "text-xs font-400";
const BULLET_LIST_STYLE: &str = "list-style:disc;margin:0";
const TABLE_CLASS: &str = "document-table";
const TABLE_STYLE: &str = "width: 100%; border-collapse: collapse;";
const HEADER_CELL_CLASS: &str = "table-header";
const HEADER_CELL_STYLE: &str = "text-align:center; background-color: #f3f4f6; font-weight: bold;";
const BODY_CELL_STYLE: &str = "vertical-align: top; padding: 3px 5px;";

/// Serializer converts the document tree back to editor markup
///
/// Output is compact: no whitespace is added between elements, so
/// serializing and re-parsing yields an identical tree.
#[derive(Debug, Default)]
pub struct Serializer {
    output: String,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serialize(mut self, doc: &Document) -> String {
        for node in &doc.children {
            self.serialize_node(node);
        }
        self.output
    }

    /// Serialize a single subtree
    pub fn serialize_fragment(mut self, node: &Node) -> String {
        self.serialize_node(node);
        self.output
    }

    fn serialize_node(&mut self, node: &Node) {
        match node {
            Node::Text { content, marks } => self.serialize_text(content, *marks),
            Node::Paragraph { align, children } => {
                self.open_textblock("p", PARAGRAPH_CLASS, *align);
                self.serialize_children(children);
                self.output.push_str("</p>");
            }
            Node::Heading {
                level,
                align,
                children,
            } => {
                let tag = format!("h{}", level.get());
                self.open_textblock(&tag, HEADING_CLASS, *align);
                self.serialize_children(children);
                self.output.push_str("</");
                self.output.push_str(&tag);
                self.output.push('>');
            }
            Node::BulletList { items } => {
                self.output.push_str("<ul style=\"");
                self.output.push_str(BULLET_LIST_STYLE);
                self.output.push_str("\">");
                self.serialize_items(items);
                self.output.push_str("</ul>");
            }
            Node::OrderedList { level, start, items } => {
                self.output.push_str("<ol");
                if *start != 1 {
                    self.output.push_str(&format!(" start=\"{}\"", start));
                }
                self.output.push_str(&format!(" data-level=\"{}\"", level));
                self.attribute("style", &level.presentation().style_attribute());
                self.output.push('>');
                self.serialize_items(items);
                self.output.push_str("</ol>");
            }
            Node::Table(table) => self.serialize_table(table),
            Node::Placeholder => self.output.push_str(PLACEHOLDER_MARKUP),
            Node::HardBreak => self.output.push_str("<br>"),
        }
    }

    fn serialize_children(&mut self, children: &[Node]) {
        for child in children {
            self.serialize_node(child);
        }
    }

    fn serialize_items(&mut self, items: &[ListItem]) {
        for item in items {
            self.output.push_str("<li");
            self.attribute("class", LIST_ITEM_CLASS);
            self.output.push('>');
            self.serialize_children(&item.children);
            self.output.push_str("</li>");
        }
    }

    fn serialize_text(&mut self, content: &str, marks: Marks) {
        if marks.bold {
            self.output.push_str("<strong>");
        }
        if marks.italic {
            self.output.push_str("<em>");
        }
        if marks.underline {
            self.output.push_str("<u>");
        }
        escape_text(content, &mut self.output);
        if marks.underline {
            self.output.push_str("</u>");
        }
        if marks.italic {
            self.output.push_str("</em>");
        }
        if marks.bold {
            self.output.push_str("</strong>");
        }
    }

    fn serialize_table(&mut self, table: &Table) {
        debug_assert!(table.is_well_formed(), "serializing malformed table");

        self.output.push_str("<table");
        self.attribute("class", TABLE_CLASS);
        self.attribute("style", TABLE_STYLE);
        self.output.push_str("><colgroup>");
        for column in &table.columns {
            self.output
                .push_str(&format!("<col style=\"width: {}%\">", column.width));
        }
        self.output.push_str("</colgroup><tbody>");

        for row in &table.rows {
            self.output.push_str("<tr>");
            for cell in &row.cells {
                let tag = if row.is_header { "th" } else { "td" };
                self.output.push('<');
                self.output.push_str(tag);
                if cell.colspan > 1 {
                    self.output.push_str(&format!(" colspan=\"{}\"", cell.colspan));
                }
                if row.is_header {
                    self.attribute("class", HEADER_CELL_CLASS);
                    self.attribute("style", HEADER_CELL_STYLE);
                } else {
                    self.attribute("style", BODY_CELL_STYLE);
                }
                self.output.push('>');
                self.serialize_children(&cell.children);
                self.output.push_str("</");
                self.output.push_str(tag);
                self.output.push('>');
            }
            self.output.push_str("</tr>");
        }

        self.output.push_str("</tbody></table>");
    }

    fn open_textblock(&mut self, tag: &str, class: &str, align: Option<TextAlign>) {
        self.output.push('<');
        self.output.push_str(tag);
        self.attribute("class", class);
        if let Some(align) = align {
            self.attribute("style", &format!("text-align: {};", align.css_name()));
        }
        self.output.push('>');
    }

    fn attribute(&mut self, name: &str, value: &str) {
        self.output.push(' ');
        self.output.push_str(name);
        self.output.push_str("=\"");
        escape_attribute(value, &mut self.output);
        self.output.push('"');
    }
}

/// Serialize a document to editor markup
pub fn serialize(doc: &Document) -> String {
    Serializer::new().serialize(doc)
}
