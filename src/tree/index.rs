//! Tree paired with an id index

use std::collections::HashMap;

use super::ops::{self, iter_nodes};
use super::{NodePatch, OrgNode};
use crate::error::TreeError;

/// A rooted organization tree with an id → child-index-path index.
///
/// The index is rebuilt after every structural change, so lookups cost one
/// step per level instead of a full traversal. Mutations are persistent:
/// they return a new `OrgTree` and leave `self` untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgTree {
    root: OrgNode,
    index: HashMap<String, Vec<usize>>,
}

impl OrgTree {
    pub fn new(root: OrgNode) -> Self {
        let index = build_index(&root);
        Self { root, index }
    }

    pub fn root(&self) -> &OrgNode {
        &self.root
    }

    pub fn into_root(self) -> OrgNode {
        self.root
    }

    /// Number of indexed nodes (first occurrence of each id).
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Indexed lookup, equivalent to [`ops::find`].
    pub fn find(&self, id: &str) -> Option<&OrgNode> {
        let path = self.index.get(id)?;
        path.iter()
            .try_fold(&self.root, |node, &pos| node.children.get(pos))
    }

    /// Ids of the ancestors of `id`, root first, excluding `id` itself.
    pub fn ancestors(&self, id: &str) -> Option<Vec<&str>> {
        let path = self.index.get(id)?;
        let mut node = &self.root;
        let mut ids = Vec::with_capacity(path.len());
        for &pos in path {
            ids.push(node.id.as_str());
            node = node.children.get(pos)?;
        }
        Some(ids)
    }

    pub fn update(&self, id: &str, patch: &NodePatch) -> Self {
        // Attribute patches never move nodes, so the index carries over.
        Self {
            root: ops::update(&self.root, id, patch),
            index: self.index.clone(),
        }
    }

    pub fn add_child(&self, parent_id: &str, child: OrgNode) -> Self {
        Self::new(ops::add_child(&self.root, parent_id, child))
    }

    pub fn remove(&self, id: &str) -> Self {
        Self::new(ops::remove_by_id(&self.root, id))
    }

    pub fn checked_update(&self, id: &str, patch: &NodePatch) -> Result<Self, TreeError> {
        if !self.contains(id) {
            return Err(TreeError::NodeNotFound(id.to_string()));
        }
        Ok(self.update(id, patch))
    }

    pub fn checked_add_child(&self, parent_id: &str, child: OrgNode) -> Result<Self, TreeError> {
        if !self.contains(parent_id) {
            return Err(TreeError::NodeNotFound(parent_id.to_string()));
        }
        if let Some(dup) = iter_nodes(&child).find(|n| self.contains(&n.id)) {
            return Err(TreeError::DuplicateId(dup.id.clone()));
        }
        Ok(self.add_child(parent_id, child))
    }

    /// Replace the stored sibling position of `id`; display order is untouched.
    pub fn checked_set_position(&self, id: &str, position: i64) -> Result<Self, TreeError> {
        Ok(Self {
            root: ops::checked_set_position(&self.root, id, position)?,
            index: self.index.clone(),
        })
    }

    pub fn checked_remove(&self, id: &str) -> Result<Self, TreeError> {
        ops::checked_remove(&self.root, id).map(Self::new)
    }
}

impl From<OrgNode> for OrgTree {
    fn from(root: OrgNode) -> Self {
        Self::new(root)
    }
}

fn build_index(root: &OrgNode) -> HashMap<String, Vec<usize>> {
    let mut index = HashMap::new();
    let mut stack = vec![(root, Vec::new())];
    // Children are pushed in reverse so nodes pop in pre-order and the first
    // occurrence of a duplicated id wins, matching `ops::find`.
    while let Some((node, path)) = stack.pop() {
        for (pos, child) in node.children.iter().enumerate().rev() {
            let mut child_path: Vec<usize> = path.clone();
            child_path.push(pos);
            stack.push((child, child_path));
        }
        index.entry(node.id.clone()).or_insert(path);
    }
    index
}
