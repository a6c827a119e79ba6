//! Organization tree model
//!
//! An organization chart is a rooted, ordered tree of [`OrgNode`]s. The tree
//! is treated as a persistent value: every operation in [`ops`] borrows the
//! input tree and returns a new one, rebuilding only the path from the root
//! to the node that changed.
//!
//! - [`ops`] - find / update / add_child / remove_by_id and strict variants
//! - [`build`] - assembling a tree from flat store rows, validation
//! - [`index`] - [`OrgTree`], a tree paired with an id index

use serde::{Deserialize, Serialize};

pub mod build;
pub mod index;
pub mod ops;

pub use build::{NodeRecord, build_tree, flatten, validate};
pub use index::OrgTree;
pub use ops::{
    add_child, checked_add_child, checked_remove, checked_set_position, checked_update, depth,
    descendant_ids, find, next_child_position, node_count, path_to, remove_by_id, snapshot, update,
};

/// One position or person in the organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgNode {
    /// Stable identifier assigned by the store
    pub id: String,

    /// Display name
    pub name: String,

    /// Role or position label
    pub title: String,

    /// Avatar reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Team size for a subtree that is summarized rather than expanded.
    /// Never reconciled against `children`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,

    /// Id of the owning node, absent for the root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Sort key among siblings as stored; `None` for rows that never had one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,

    /// Direct reports in display order. Empty serializes as absent.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OrgNode>,
}

impl OrgNode {
    /// Create a leaf node with no parent.
    pub fn new(id: impl Into<String>, name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            title: title.into(),
            image: None,
            count: None,
            parent_id: None,
            position: None,
            children: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_position(mut self, position: i64) -> Self {
        self.position = Some(position);
        self
    }

    /// Attach children, setting each child's `parent_id` to this node.
    pub fn with_children(mut self, children: Vec<OrgNode>) -> Self {
        self.children = children
            .into_iter()
            .map(|mut child| {
                child.parent_id = Some(self.id.clone());
                child
            })
            .collect();
        self
    }

    /// Whether this node is the root of its tree.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Copy of the node's own attributes with a different children sequence.
    pub(crate) fn with_replaced_children(&self, children: Vec<OrgNode>) -> OrgNode {
        OrgNode {
            id: self.id.clone(),
            name: self.name.clone(),
            title: self.title.clone(),
            image: self.image.clone(),
            count: self.count,
            parent_id: self.parent_id.clone(),
            position: self.position,
            children,
        }
    }
}

/// Partial attribute update for an existing node.
///
/// Only `name`, `title`, `image` and `count` are patchable. Unknown keys such
/// as `id` or `parentId` are dropped when a patch is deserialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl NodePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.title.is_none() && self.image.is_none() && self.count.is_none()
    }

    /// Apply the patched fields to `node`, leaving identity and lineage alone.
    pub fn apply_to(&self, node: &mut OrgNode) {
        if let Some(ref name) = self.name {
            node.name = name.clone();
        }
        if let Some(ref title) = self.title {
            node.title = title.clone();
        }
        if let Some(ref image) = self.image {
            node.image = Some(image.clone());
        }
        if let Some(count) = self.count {
            node.count = Some(count);
        }
    }
}

/// Attributes for a node that does not exist yet; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNode {
    /// Owning node, `None` only when creating the root
    pub parent_id: Option<String>,

    pub name: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,

    /// Sibling position, filled in by the chart so new nodes sort last
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

impl NewNode {
    /// A new report under `parent_id`.
    pub fn child_of(
        parent_id: impl Into<String>,
        name: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            ..Self::root(name, title)
        }
    }

    /// A new top-level node.
    pub fn root(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            parent_id: None,
            name: name.into(),
            title: title.into(),
            image: None,
            count: None,
            position: None,
        }
    }

    /// Materialize the node once the store has assigned an id.
    pub fn into_node(self, id: impl Into<String>) -> OrgNode {
        OrgNode {
            id: id.into(),
            name: self.name,
            title: self.title,
            image: self.image,
            count: self.count,
            parent_id: self.parent_id,
            position: self.position,
            children: Vec::new(),
        }
    }
}
