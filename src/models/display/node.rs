//! Organization node display models

use serde::Serialize;
use tabled::Tabled;

use super::common::{or_dash, truncate_string};
use crate::directory::{contact_handle, location_code};
use crate::tree::OrgNode;

/// Maximum image URL width in table output
const IMAGE_COLUMN_WIDTH: usize = 32;

/// One table row per node, in pre-order.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct NodeDisplay {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "TITLE")]
    pub title: String,

    #[tabled(rename = "PARENT")]
    pub parent: String,

    /// Distance from the row's starting node
    #[tabled(rename = "LEVEL")]
    pub level: usize,

    /// Direct reports
    #[tabled(rename = "REPORTS")]
    pub reports: usize,

    #[tabled(rename = "COUNT")]
    pub count: String,

    #[tabled(rename = "IMAGE")]
    pub image: String,
}

impl NodeDisplay {
    fn from_node(node: &OrgNode, level: usize) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            title: node.title.clone(),
            parent: or_dash(node.parent_id.as_deref()),
            level,
            reports: node.children.len(),
            count: or_dash(node.count),
            image: node
                .image
                .as_deref()
                .map_or_else(|| "-".to_string(), |i| truncate_string(i, IMAGE_COLUMN_WIDTH)),
        }
    }

    /// Rows for `root` and its descendants down to `max_depth` levels.
    pub fn rows(root: &OrgNode, max_depth: Option<usize>) -> Vec<Self> {
        let mut rows = Vec::new();
        let mut stack = vec![(root, 0usize)];
        while let Some((node, level)) = stack.pop() {
            rows.push(Self::from_node(node, level));
            if max_depth.is_none_or(|max| level < max) {
                stack.extend(node.children.iter().rev().map(|c| (c, level + 1)));
            }
        }
        rows
    }
}

/// Everything shown by `orgtree find`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDetail {
    pub id: String,
    pub name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    pub parent_id: Option<String>,
    pub direct_reports: Vec<String>,
    /// Derived e-mail style handle
    pub contact: String,
    /// Derived three-digit location code
    pub location: String,
    /// Ids from the root down to this node
    pub path: Vec<String>,
}

impl NodeDetail {
    pub fn new(node: &OrgNode, path: Vec<String>, contact_domain: &str) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            title: node.title.clone(),
            image: node.image.clone(),
            count: node.count,
            parent_id: node.parent_id.clone(),
            direct_reports: node.children.iter().map(|c| c.id.clone()).collect(),
            contact: contact_handle(&node.name, contact_domain),
            location: location_code(&node.name, &node.title),
            path,
        }
    }
}

/// Copy of `node` keeping at most `max_depth` levels below it.
pub fn pruned(node: &OrgNode, max_depth: Option<usize>) -> OrgNode {
    match max_depth {
        None => node.clone(),
        Some(0) => node.with_replaced_children(Vec::new()),
        Some(depth) => node.with_replaced_children(
            node.children
                .iter()
                .map(|c| pruned(c, Some(depth - 1)))
                .collect(),
        ),
    }
}
