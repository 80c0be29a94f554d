//! # List Commands
//!
//! Sinking and lifting list items, and the level bookkeeping that goes with
//! them for ordered lists:
//!
//! ```text
//! indent:  level < 3 → sink item, level + 1 on the list now holding it
//!          level = 3 → unchanged
//! outdent: level > 1 → lift item, level - 1 on the list now holding it
//!          level = 1 → lift item, level untouched
//! ```
//!
//! The structural move and the level update happen in one call, so callers
//! never observe a sunk item with a stale level.

use crate::commands::CommandOutcome;
use templet_parser::ast::{Document as ASTDocument, ListItem, Node};
use templet_parser::path::{ancestry, closest, resolve, resolve_mut, NodeKind, NodePath};
use templet_parser::ListLevel;
use tracing::debug;

/// The selection's closest list item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPosition {
    /// Path of the list holding the item
    pub list: NodePath,
    /// Index of the item in that list
    pub index: usize,
    /// Selection indices below the item
    pub inner: Vec<usize>,
}

impl ItemPosition {
    pub fn item_path(&self) -> NodePath {
        self.list.child(self.index)
    }

    /// Re-anchor the selection under an item that moved
    fn selection_under(&self, item: &NodePath) -> NodePath {
        NodePath::new(item.indices().iter().chain(&self.inner).copied().collect())
    }
}

pub fn item_position(tree: &ASTDocument, selection: &NodePath) -> Option<ItemPosition> {
    let item = closest(tree, selection, |kind| kind == NodeKind::ListItem)?;
    let index = item.last()?;
    let list = item.parent()?;
    Some(ItemPosition {
        list,
        index,
        inner: selection.indices()[item.len()..].to_vec(),
    })
}

/// Level of the list at `path` when it is an ordered list
pub fn ordered_level(tree: &ASTDocument, path: &NodePath) -> Option<ListLevel> {
    match resolve(tree, path)?.as_node()? {
        Node::OrderedList { level, .. } => Some(*level),
        _ => None,
    }
}

fn set_level(tree: &mut ASTDocument, path: &NodePath, new_level: ListLevel) {
    if let Some(Node::OrderedList { level, .. }) = resolve_mut(tree, path).and_then(|n| n.into_node()) {
        *level = new_level;
    }
}

fn item_count(tree: &ASTDocument, list: &NodePath) -> Option<usize> {
    resolve(tree, list)?.as_node()?.list_items().map(Vec::len)
}

/// Move the item into a nested list at the end of its previous sibling,
/// reusing a trailing nested list of the same kind. Returns the item's new
/// path, or `None` when the item has no previous sibling.
pub fn sink_item(tree: &mut ASTDocument, pos: &ItemPosition) -> Option<NodePath> {
    if pos.index == 0 || pos.index >= item_count(tree, &pos.list)? {
        return None;
    }

    let list = resolve_mut(tree, &pos.list)?.into_node()?;
    let template = list.empty_list_like()?;
    let items = list.list_items_mut()?;
    let item = items.remove(pos.index);
    let previous = &mut items[pos.index - 1];

    let reuse = previous
        .children
        .last()
        .map(|last| last.same_list_kind(&template))
        .unwrap_or(false);
    if !reuse {
        previous.children.push(template);
    }
    let nested_index = previous.children.len() - 1;
    let nested_items = previous.children[nested_index].list_items_mut()?;
    nested_items.push(item);
    let item_index = nested_items.len() - 1;

    Some(pos.list.child(pos.index - 1).child(nested_index).child(item_index))
}

/// Result of lifting an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lifted {
    /// Where the selection ends up
    pub selection: NodePath,
    /// The list now holding the item, if it is still in one
    pub list: Option<NodePath>,
}

/// Move the item one level up.
///
/// A nested item moves into the outer list right after its parent item and
/// takes its following siblings along as its own sublist. A top-level item
/// leaves the list: its blocks are spliced into the surrounding container
/// and the list is split around it.
pub fn lift_item(tree: &mut ASTDocument, pos: &ItemPosition) -> Option<Lifted> {
    if pos.index >= item_count(tree, &pos.list)? {
        return None;
    }
    let container = pos.list.parent()?;
    let kinds = ancestry(tree, &container)?;

    if kinds.last() == Some(&NodeKind::ListItem) {
        lift_to_outer_list(tree, pos, &container)
    } else {
        lift_out_of_list(tree, pos, &container)
    }
}

fn lift_to_outer_list(tree: &mut ASTDocument, pos: &ItemPosition, outer_item: &NodePath) -> Option<Lifted> {
    let outer_index = outer_item.last()?;
    let outer_list = outer_item.parent()?;
    let list_index = pos.list.last()?;

    let parent_item = resolve_mut(tree, outer_item)?.into_item()?;
    let nested = parent_item.children.get_mut(list_index)?;
    let nested_items = nested.list_items_mut()?;
    let trailing: Vec<ListItem> = nested_items.drain(pos.index + 1..).collect();
    let mut item = nested_items.remove(pos.index);
    let now_empty = nested_items.is_empty();

    if !trailing.is_empty() {
        match item.children.last_mut().filter(|last| last.same_list_kind(nested)) {
            Some(last) => {
                if let Some(items) = last.list_items_mut() {
                    items.extend(trailing);
                }
            }
            None => {
                let mut rest = nested.clone();
                if let Some(items) = rest.list_items_mut() {
                    *items = trailing;
                }
                item.children.push(rest);
            }
        }
    }
    if now_empty {
        parent_item.children.remove(list_index);
    }

    let outer_items = resolve_mut(tree, &outer_list)?.into_node()?.list_items_mut()?;
    outer_items.insert(outer_index + 1, item);

    let item_path = outer_list.child(outer_index + 1);
    Some(Lifted {
        selection: pos.selection_under(&item_path),
        list: Some(outer_list),
    })
}

fn lift_out_of_list(tree: &mut ASTDocument, pos: &ItemPosition, container: &NodePath) -> Option<Lifted> {
    let list_index = pos.list.last()?;
    let blocks = resolve_mut(tree, container)?.into_blocks()?;
    if !blocks.get(list_index).map(Node::is_list).unwrap_or(false) {
        return None;
    }

    let mut list = blocks.remove(list_index);
    let mut replacement = Vec::new();
    let mut after = None;

    if let Some(items) = list.list_items_mut() {
        let after_items: Vec<ListItem> = items.drain(pos.index + 1..).collect();
        let item = items.remove(pos.index);
        let has_before = !items.is_empty();

        if !after_items.is_empty() {
            let mut rest = list.clone();
            if let Some(items) = rest.list_items_mut() {
                *items = after_items;
            }
            after = Some(rest);
        }
        if has_before {
            replacement.push(list);
        }
        let first_block = list_index + replacement.len();
        replacement.extend(item.children);
        replacement.extend(after);
        blocks.splice(list_index..list_index, replacement);

        let selection = match pos.inner.split_first() {
            Some((block, rest)) => {
                let mut indices = container.child(first_block + block).indices().to_vec();
                indices.extend_from_slice(rest);
                NodePath::new(indices)
            }
            None => container.child(first_block),
        };
        return Some(Lifted { selection, list: None });
    }

    blocks.insert(list_index, list);
    None
}

/// Indent the selected list item
pub fn indent(tree: &mut ASTDocument, selection: &mut NodePath) -> CommandOutcome {
    let Some(pos) = item_position(tree, selection) else {
        return CommandOutcome::Unchanged;
    };

    let next_level = match ordered_level(tree, &pos.list) {
        Some(level) => match level.deeper() {
            Some(next) => Some(next),
            None => {
                debug!(%level, "Indent ignored at deepest level");
                return CommandOutcome::Unchanged;
            }
        },
        None => None,
    };

    let Some(item_path) = sink_item(tree, &pos) else {
        return CommandOutcome::Unchanged;
    };
    if let (Some(level), Some(list)) = (next_level, item_path.parent()) {
        set_level(tree, &list, level);
    }

    *selection = pos.selection_under(&item_path);
    CommandOutcome::Applied
}

/// Outdent the selected list item
pub fn outdent(tree: &mut ASTDocument, selection: &mut NodePath) -> CommandOutcome {
    let Some(pos) = item_position(tree, selection) else {
        return CommandOutcome::Unchanged;
    };
    let level = ordered_level(tree, &pos.list);

    let Some(lifted) = lift_item(tree, &pos) else {
        return CommandOutcome::Unchanged;
    };
    if let (Some(up), Some(list)) = (level.and_then(ListLevel::shallower), &lifted.list) {
        set_level(tree, list, up);
    }

    *selection = lifted.selection;
    CommandOutcome::Applied
}

/// Toggle a bullet or ordered list around the selection
pub fn toggle_list(tree: &mut ASTDocument, selection: &mut NodePath, ordered: bool) -> CommandOutcome {
    let Some(pos) = item_position(tree, selection) else {
        let list = if ordered {
            Node::ordered_list(Vec::new())
        } else {
            Node::BulletList { items: Vec::new() }
        };
        return match wrap_in_list(tree, selection, list) {
            Some(path) => {
                *selection = path;
                CommandOutcome::Applied
            }
            None => CommandOutcome::Unchanged,
        };
    };

    if ordered_level(tree, &pos.list).is_some() == ordered {
        return match lift_item(tree, &pos) {
            Some(lifted) => {
                *selection = lifted.selection;
                CommandOutcome::Applied
            }
            None => CommandOutcome::Unchanged,
        };
    }

    convert_list(tree, &pos.list, ordered);
    CommandOutcome::Applied
}

fn convert_list(tree: &mut ASTDocument, path: &NodePath, ordered: bool) {
    if let Some(node) = resolve_mut(tree, path).and_then(|n| n.into_node()) {
        if let Some(items) = node.list_items_mut() {
            let items = std::mem::take(items);
            *node = if ordered {
                Node::ordered_list(items)
            } else {
                Node::BulletList { items }
            };
        }
    }
}

/// Wrap the selection's text block in `list` as its only item. Returns the
/// new selection.
fn wrap_in_list(tree: &mut ASTDocument, selection: &NodePath, mut list: Node) -> Option<NodePath> {
    let block = closest(tree, selection, NodeKind::is_textblock)?;
    let index = block.last()?;
    let container = block.parent()?;
    let blocks = resolve_mut(tree, &container)?.into_blocks()?;

    let textblock = blocks.remove(index);
    if let Some(items) = list.list_items_mut() {
        items.push(ListItem::new(vec![textblock]));
    }
    blocks.insert(index, list);

    let mut indices = container.child(index).child(0).child(0).indices().to_vec();
    indices.extend_from_slice(&selection.indices()[block.len()..]);
    Some(NodePath::new(indices))
}

/// Set the start number of the selection's ordered list, creating or
/// converting the list when needed
pub fn start_ordered_list_at(tree: &mut ASTDocument, selection: &mut NodePath, new_start: u32) -> CommandOutcome {
    if new_start == 0 {
        return CommandOutcome::Rejected("List start must be a positive integer".to_string());
    }

    let list_path = match item_position(tree, selection) {
        Some(pos) => {
            if ordered_level(tree, &pos.list).is_none() {
                convert_list(tree, &pos.list, true);
            }
            pos.list
        }
        None => {
            let list = Node::OrderedList {
                level: ListLevel::default(),
                start: new_start,
                items: Vec::new(),
            };
            return match wrap_in_list(tree, selection, list) {
                Some(path) => {
                    *selection = path;
                    CommandOutcome::Applied
                }
                None => CommandOutcome::Unchanged,
            };
        }
    };

    match resolve_mut(tree, &list_path).and_then(|n| n.into_node()) {
        Some(Node::OrderedList { start, .. }) if *start != new_start => {
            *start = new_start;
            CommandOutcome::Applied
        }
        _ => CommandOutcome::Unchanged,
    }
}
