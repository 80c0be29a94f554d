//! Addressing nodes by child-index paths
//!
//! A path is read from the document root. What an index selects depends on
//! the container it is applied to:
//!
//! ```text
//! document        → block
//! paragraph/head  → inline
//! list            → item
//! item            → block
//! table           → row
//! row             → cell
//! cell            → block
//! ```

use crate::ast::{Document, ListItem, Node, TableCell, TableRow};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn parent(&self) -> Option<NodePath> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    pub fn child(&self, index: usize) -> NodePath {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Path truncated to its first `len` indices
    pub fn prefix(&self, len: usize) -> NodePath {
        Self(self.0[..len.min(self.0.len())].to_vec())
    }

    pub fn starts_with(&self, other: &NodePath) -> bool {
        self.0.starts_with(&other.0)
    }

    /// Same path with the index at `depth` replaced
    pub fn with_index(&self, depth: usize, index: usize) -> NodePath {
        let mut indices = self.0.clone();
        if let Some(slot) = indices.get_mut(depth) {
            *slot = index;
        }
        Self(indices)
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", index)?;
        }
        Ok(())
    }
}

/// Kind of whatever a path position points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Document,
    Text,
    Paragraph,
    Heading,
    BulletList,
    OrderedList,
    ListItem,
    Table,
    TableRow,
    TableCell,
    Placeholder,
    HardBreak,
}

impl NodeKind {
    pub fn of(node: &Node) -> Self {
        match node {
            Node::Text { .. } => NodeKind::Text,
            Node::Paragraph { .. } => NodeKind::Paragraph,
            Node::Heading { .. } => NodeKind::Heading,
            Node::BulletList { .. } => NodeKind::BulletList,
            Node::OrderedList { .. } => NodeKind::OrderedList,
            Node::Table(_) => NodeKind::Table,
            Node::Placeholder => NodeKind::Placeholder,
            Node::HardBreak => NodeKind::HardBreak,
        }
    }

    pub fn is_list(self) -> bool {
        matches!(self, NodeKind::BulletList | NodeKind::OrderedList)
    }

    pub fn is_textblock(self) -> bool {
        matches!(self, NodeKind::Paragraph | NodeKind::Heading)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Document(&'a Document),
    Node(&'a Node),
    Item(&'a ListItem),
    Row(&'a TableRow),
    Cell(&'a TableCell),
}

impl<'a> NodeRef<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Document(_) => NodeKind::Document,
            NodeRef::Node(node) => NodeKind::of(node),
            NodeRef::Item(_) => NodeKind::ListItem,
            NodeRef::Row(_) => NodeKind::TableRow,
            NodeRef::Cell(_) => NodeKind::TableCell,
        }
    }

    pub fn child(self, index: usize) -> Option<NodeRef<'a>> {
        match self {
            NodeRef::Document(doc) => doc.children.get(index).map(NodeRef::Node),
            NodeRef::Node(node) => match node {
                Node::Paragraph { children, .. } | Node::Heading { children, .. } => {
                    children.get(index).map(NodeRef::Node)
                }
                Node::BulletList { items } | Node::OrderedList { items, .. } => {
                    items.get(index).map(NodeRef::Item)
                }
                Node::Table(table) => table.rows.get(index).map(NodeRef::Row),
                Node::Text { .. } | Node::Placeholder | Node::HardBreak => None,
            },
            NodeRef::Item(item) => item.children.get(index).map(NodeRef::Node),
            NodeRef::Row(row) => row.cells.get(index).map(NodeRef::Cell),
            NodeRef::Cell(cell) => cell.children.get(index).map(NodeRef::Node),
        }
    }

    pub fn as_node(self) -> Option<&'a Node> {
        match self {
            NodeRef::Node(node) => Some(node),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum NodeMut<'a> {
    Document(&'a mut Document),
    Node(&'a mut Node),
    Item(&'a mut ListItem),
    Row(&'a mut TableRow),
    Cell(&'a mut TableCell),
}

impl<'a> NodeMut<'a> {
    pub fn child(self, index: usize) -> Option<NodeMut<'a>> {
        match self {
            NodeMut::Document(doc) => doc.children.get_mut(index).map(NodeMut::Node),
            NodeMut::Node(node) => match node {
                Node::Paragraph { children, .. } | Node::Heading { children, .. } => {
                    children.get_mut(index).map(NodeMut::Node)
                }
                Node::BulletList { items } | Node::OrderedList { items, .. } => {
                    items.get_mut(index).map(NodeMut::Item)
                }
                Node::Table(table) => table.rows.get_mut(index).map(NodeMut::Row),
                Node::Text { .. } | Node::Placeholder | Node::HardBreak => None,
            },
            NodeMut::Item(item) => item.children.get_mut(index).map(NodeMut::Node),
            NodeMut::Row(row) => row.cells.get_mut(index).map(NodeMut::Cell),
            NodeMut::Cell(cell) => cell.children.get_mut(index).map(NodeMut::Node),
        }
    }

    pub fn into_node(self) -> Option<&'a mut Node> {
        match self {
            NodeMut::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn into_item(self) -> Option<&'a mut ListItem> {
        match self {
            NodeMut::Item(item) => Some(item),
            _ => None,
        }
    }

    /// Block children of a block container (document, list item, cell)
    pub fn into_blocks(self) -> Option<&'a mut Vec<Node>> {
        match self {
            NodeMut::Document(doc) => Some(&mut doc.children),
            NodeMut::Item(item) => Some(&mut item.children),
            NodeMut::Cell(cell) => Some(&mut cell.children),
            NodeMut::Node(_) | NodeMut::Row(_) => None,
        }
    }
}

/// Follow `path` from the root
pub fn resolve<'a>(doc: &'a Document, path: &NodePath) -> Option<NodeRef<'a>> {
    path.indices()
        .iter()
        .try_fold(NodeRef::Document(doc), |current, &index| current.child(index))
}

pub fn resolve_mut<'a>(doc: &'a mut Document, path: &NodePath) -> Option<NodeMut<'a>> {
    path.indices()
        .iter()
        .try_fold(NodeMut::Document(doc), |current, &index| current.child(index))
}

/// Kinds of every position along `path`, root first.
///
/// The result has `path.len() + 1` entries, or `None` when the path does not
/// resolve.
pub fn ancestry(doc: &Document, path: &NodePath) -> Option<Vec<NodeKind>> {
    let mut current = NodeRef::Document(doc);
    let mut kinds = vec![current.kind()];
    for &index in path.indices() {
        current = current.child(index)?;
        kinds.push(current.kind());
    }
    Some(kinds)
}

/// Path to the deepest position along `path` whose kind matches
pub fn closest(doc: &Document, path: &NodePath, matches: impl Fn(NodeKind) -> bool) -> Option<NodePath> {
    let kinds = ancestry(doc, path)?;
    kinds
        .iter()
        .rposition(|&kind| matches(kind))
        .map(|depth| path.prefix(depth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ListItem, Node};

    fn sample() -> Document {
        Document::new(vec![
            Node::paragraph(vec![Node::text("intro")]),
            Node::ordered_list(vec![ListItem::with_text("a"), ListItem::with_text("b")]),
        ])
    }

    #[test]
    fn test_resolve_through_list() {
        let doc = sample();
        let path = NodePath::new(vec![1, 1, 0, 0]);
        match resolve(&doc, &path) {
            Some(NodeRef::Node(Node::Text { content, .. })) => assert_eq!(content, "b"),
            other => panic!("Expected text node, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_out_of_range() {
        let doc = sample();
        assert!(resolve(&doc, &NodePath::new(vec![5])).is_none());
        assert!(resolve(&doc, &NodePath::new(vec![0, 0, 0])).is_none());
    }

    #[test]
    fn test_ancestry_kinds() {
        let doc = sample();
        let kinds = ancestry(&doc, &NodePath::new(vec![1, 0, 0])).unwrap();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Document,
                NodeKind::OrderedList,
                NodeKind::ListItem,
                NodeKind::Paragraph
            ]
        );
    }

    #[test]
    fn test_closest_item() {
        let doc = sample();
        let path = NodePath::new(vec![1, 1, 0, 0]);
        let item = closest(&doc, &path, |k| k == NodeKind::ListItem).unwrap();
        assert_eq!(item, NodePath::new(vec![1, 1]));
        assert!(closest(&doc, &NodePath::new(vec![0]), |k| k == NodeKind::ListItem).is_none());
    }

    #[test]
    fn test_resolve_mut_edits_in_place() {
        let mut doc = sample();
        if let Some(blocks) = resolve_mut(&mut doc, &NodePath::new(vec![1, 0])).and_then(NodeMut::into_blocks) {
            blocks.push(Node::empty_paragraph());
        }
        assert_eq!(doc.children[1].list_items().unwrap()[0].children.len(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(NodePath::new(vec![1, 0, 2]).to_string(), "/1/0/2");
        assert_eq!(NodePath::root().to_string(), "/");
    }
}
