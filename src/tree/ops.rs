//! Query and mutation operations over an [`OrgNode`] tree
//!
//! The permissive operations (`update`, `add_child`, `remove_by_id`) are
//! total: an unknown id yields a copy of the input tree. The `checked_*`
//! variants report the same situations as [`TreeError`]s instead.

use std::collections::HashSet;

use super::{NodePatch, OrgNode};
use crate::error::TreeError;

/// Depth-first, pre-order search by id.
pub fn find<'a>(tree: &'a OrgNode, id: &str) -> Option<&'a OrgNode> {
    if tree.id == id {
        return Some(tree);
    }
    tree.children.iter().find_map(|child| find(child, id))
}

/// New tree with the patchable fields of node `id` replaced.
///
/// Returns an unchanged copy when `id` is not in the tree.
pub fn update(tree: &OrgNode, id: &str, patch: &NodePatch) -> OrgNode {
    rebuild_path(tree, id, &mut |node| patch.apply_to(node)).unwrap_or_else(|| tree.clone())
}

/// New tree with `child` appended last under `parent_id`.
///
/// Returns an unchanged copy when the parent is not in the tree. The caller
/// guarantees that `child.id` is not already present.
pub fn add_child(tree: &OrgNode, parent_id: &str, child: OrgNode) -> OrgNode {
    let mut child = Some(child);
    rebuild_path(tree, parent_id, &mut |parent| {
        if let Some(child) = child.take() {
            parent.children.push(child);
        }
    })
    .unwrap_or_else(|| tree.clone())
}

/// New tree without node `id` and its subtree.
///
/// Only descendants of `tree` are searched, so the root itself is never
/// removed. Returns an unchanged copy when `id` is not found.
pub fn remove_by_id(tree: &OrgNode, id: &str) -> OrgNode {
    remove_within(tree, id).unwrap_or_else(|| tree.clone())
}

/// Fully independent deep copy of a tree.
pub fn snapshot(tree: &OrgNode) -> OrgNode {
    tree.clone()
}

/// Like [`update`], failing with `NodeNotFound` for an unknown id.
pub fn checked_update(tree: &OrgNode, id: &str, patch: &NodePatch) -> Result<OrgNode, TreeError> {
    rebuild_path(tree, id, &mut |node| patch.apply_to(node))
        .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))
}

/// Like [`add_child`], also verifying that no id in `child`'s subtree is
/// already in use.
pub fn checked_add_child(
    tree: &OrgNode,
    parent_id: &str,
    child: OrgNode,
) -> Result<OrgNode, TreeError> {
    if find(tree, parent_id).is_none() {
        return Err(TreeError::NodeNotFound(parent_id.to_string()));
    }

    let existing: HashSet<&str> = iter_nodes(tree).map(|n| n.id.as_str()).collect();
    if let Some(dup) = iter_nodes(&child).find(|n| existing.contains(n.id.as_str())) {
        return Err(TreeError::DuplicateId(dup.id.clone()));
    }

    Ok(add_child(tree, parent_id, child))
}

/// Like [`remove_by_id`], failing with `RootRemoval` when `id` names the
/// root and `NodeNotFound` when it names nothing.
pub fn checked_remove(tree: &OrgNode, id: &str) -> Result<OrgNode, TreeError> {
    if tree.id == id {
        return Err(TreeError::RootRemoval(id.to_string()));
    }
    remove_within(tree, id).ok_or_else(|| TreeError::NodeNotFound(id.to_string()))
}

/// New tree with the stored sibling position of node `id` replaced.
pub fn checked_set_position(tree: &OrgNode, id: &str, position: i64) -> Result<OrgNode, TreeError> {
    rebuild_path(tree, id, &mut |node| node.position = Some(position))
        .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))
}

/// Position that sorts a new child of `parent` after all its current children.
///
/// Rows are ordered by position with unpositioned rows last, so this is only
/// well defined when every child has a position and they strictly increase
/// in display order. Returns `None` otherwise; the children must then be
/// renumbered first.
pub fn next_child_position(parent: &OrgNode) -> Option<i64> {
    let mut last: Option<i64> = None;
    for child in &parent.children {
        let position = child.position?;
        if last.is_some_and(|prev| position <= prev) {
            return None;
        }
        last = Some(position);
    }
    Some(last.map_or(0, |prev| prev.saturating_add(1)))
}

/// Ids of every node strictly below `node`, in pre-order.
pub fn descendant_ids(node: &OrgNode) -> Vec<String> {
    iter_nodes(node).skip(1).map(|n| n.id.clone()).collect()
}

/// Number of nodes in the tree, root included.
pub fn node_count(tree: &OrgNode) -> usize {
    iter_nodes(tree).count()
}

/// Number of levels in the tree; a lone root has depth 1.
pub fn depth(tree: &OrgNode) -> usize {
    1 + tree.children.iter().map(depth).max().unwrap_or(0)
}

/// Ids from the root down to `id` inclusive, or `None` if absent.
pub fn path_to(tree: &OrgNode, id: &str) -> Option<Vec<String>> {
    if tree.id == id {
        return Some(vec![tree.id.clone()]);
    }
    tree.children.iter().find_map(|child| {
        path_to(child, id).map(|mut path| {
            path.insert(0, tree.id.clone());
            path
        })
    })
}

/// Pre-order iterator over a tree.
pub(crate) fn iter_nodes(tree: &OrgNode) -> impl Iterator<Item = &OrgNode> {
    let mut stack = vec![tree];
    std::iter::from_fn(move || {
        let node = stack.pop()?;
        stack.extend(node.children.iter().rev());
        Some(node)
    })
}

/// Rebuild the path from `node` to the first pre-order match of `id`,
/// applying `edit` to the copy of the match. Siblings off the path are
/// cloned unchanged.
fn rebuild_path<F>(node: &OrgNode, id: &str, edit: &mut F) -> Option<OrgNode>
where
    F: FnMut(&mut OrgNode),
{
    if node.id == id {
        let mut copy = node.clone();
        edit(&mut copy);
        return Some(copy);
    }

    node.children.iter().enumerate().find_map(|(pos, child)| {
        rebuild_path(child, id, edit).map(|new_child| splice(node, pos, Some(new_child)))
    })
}

fn remove_within(node: &OrgNode, id: &str) -> Option<OrgNode> {
    node.children.iter().enumerate().find_map(|(pos, child)| {
        if child.id == id {
            Some(splice(node, pos, None))
        } else {
            remove_within(child, id).map(|new_child| splice(node, pos, Some(new_child)))
        }
    })
}

/// Copy of `node` with the child at `pos` replaced (or dropped for `None`).
fn splice(node: &OrgNode, pos: usize, replacement: Option<OrgNode>) -> OrgNode {
    let mut children = Vec::with_capacity(node.children.len());
    children.extend(node.children[..pos].iter().cloned());
    children.extend(replacement);
    children.extend(node.children[pos + 1..].iter().cloned());
    node.with_replaced_children(children)
}
