//! Conversion between the nested tree and the store's flat rows

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::OrgNode;
use super::ops::iter_nodes;
use crate::error::TreeError;

/// One row of the organization table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,

    #[serde(default)]
    pub parent_id: Option<String>,

    pub name: String,

    pub title: String,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub count: Option<u32>,

    /// Sort key among siblings; rows without one keep their fetch order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

impl From<&OrgNode> for NodeRecord {
    fn from(node: &OrgNode) -> Self {
        Self {
            id: node.id.clone(),
            parent_id: node.parent_id.clone(),
            name: node.name.clone(),
            title: node.title.clone(),
            image: node.image.clone(),
            count: node.count,
            position: node.position,
        }
    }
}

impl From<NodeRecord> for OrgNode {
    fn from(record: NodeRecord) -> Self {
        OrgNode {
            id: record.id,
            name: record.name,
            title: record.title,
            image: record.image,
            count: record.count,
            parent_id: record.parent_id,
            position: record.position,
            children: Vec::new(),
        }
    }
}

/// Assemble the single rooted tree described by `records`.
///
/// Siblings are ordered by `position`; rows without a position come after
/// positioned ones, in input order. Fails on an empty or multi-rooted set,
/// duplicate ids, parents that do not exist, and rows that cannot be reached
/// from the root.
pub fn build_tree(records: Vec<NodeRecord>) -> Result<OrgNode, TreeError> {
    let mut seen = HashSet::new();
    for record in &records {
        if !seen.insert(record.id.as_str()) {
            return Err(TreeError::DuplicateId(record.id.clone()));
        }
    }

    let roots: Vec<&NodeRecord> = records.iter().filter(|r| r.parent_id.is_none()).collect();
    let root_id = match roots.as_slice() {
        [] => return Err(TreeError::MissingRoot),
        [root] => root.id.clone(),
        many => {
            return Err(TreeError::MultipleRoots(
                many.iter().map(|r| r.id.clone()).collect(),
            ));
        }
    };

    for record in &records {
        if let Some(ref parent_id) = record.parent_id
            && !seen.contains(parent_id.as_str())
        {
            return Err(TreeError::DanglingParent {
                id: record.id.clone(),
                parent_id: parent_id.clone(),
            });
        }
    }

    let total = records.len();
    let mut by_parent: HashMap<Option<String>, Vec<NodeRecord>> = HashMap::new();
    for record in records {
        by_parent
            .entry(record.parent_id.clone())
            .or_default()
            .push(record);
    }
    for siblings in by_parent.values_mut() {
        siblings.sort_by_key(|r| r.position.unwrap_or(i64::MAX));
    }

    let root_record = by_parent
        .remove(&None)
        .and_then(|mut roots| roots.pop())
        .ok_or(TreeError::MissingRoot)?;

    let mut built = 0;
    let root = attach(root_record.into(), &mut by_parent, &mut built);

    if built != total {
        // Whatever is left over hangs off a parent chain that never reaches the root.
        let orphan = by_parent
            .into_values()
            .flatten()
            .map(|r| r.id)
            .min()
            .unwrap_or(root_id);
        return Err(TreeError::Cycle(orphan));
    }

    Ok(root)
}

fn attach(
    mut node: OrgNode,
    by_parent: &mut HashMap<Option<String>, Vec<NodeRecord>>,
    built: &mut usize,
) -> OrgNode {
    *built += 1;
    if let Some(children) = by_parent.remove(&Some(node.id.clone())) {
        node.children = children
            .into_iter()
            .map(|record| attach(record.into(), by_parent, built))
            .collect();
    }
    node
}

/// Flatten a tree into rows, pre-order, keeping each node's stored position.
pub fn flatten(tree: &OrgNode) -> Vec<NodeRecord> {
    iter_nodes(tree).map(NodeRecord::from).collect()
}

/// Check tree well-formedness: unique ids, a parentless root, and every
/// child's `parent_id` pointing at the node that owns it.
pub fn validate(tree: &OrgNode) -> Result<(), TreeError> {
    if tree.parent_id.is_some() {
        return Err(TreeError::ParentMismatch {
            id: tree.id.clone(),
            expected: None,
            actual: tree.parent_id.clone(),
        });
    }

    let mut seen = HashSet::new();
    for node in iter_nodes(tree) {
        if !seen.insert(node.id.as_str()) {
            return Err(TreeError::DuplicateId(node.id.clone()));
        }
        for child in &node.children {
            if child.parent_id.as_deref() != Some(node.id.as_str()) {
                return Err(TreeError::ParentMismatch {
                    id: child.id.clone(),
                    expected: Some(node.id.clone()),
                    actual: child.parent_id.clone(),
                });
            }
        }
    }
    Ok(())
}
