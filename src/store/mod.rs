//! Persistence service abstraction
//!
//! The organization chart lives in a hosted relational table. [`OrgStore`]
//! is the only contract the rest of the crate depends on; [`RestStore`]
//! talks to a PostgREST-style endpoint.

use async_trait::async_trait;

use crate::error::Result;
use crate::tree::{NewNode, NodePatch, OrgNode};

#[cfg(test)]
pub mod mock;
pub mod rest;

#[cfg(test)]
pub use mock::MockOrgStore;
pub use rest::RestStore;

/// Persistence operations for organization nodes
#[async_trait]
pub trait OrgStore: Send + Sync {
    /// Fetch the whole tree, or `None` when the table holds no rows yet.
    async fn fetch_tree(&self) -> Result<Option<OrgNode>>;

    /// Fetch the tree, bypassing any cache.
    ///
    /// Only caching wrappers need to override this.
    async fn fetch_tree_fresh(&self) -> Result<Option<OrgNode>> {
        self.fetch_tree().await
    }

    /// Persist a new node and return it with its assigned id.
    async fn create_node(&self, node: NewNode) -> Result<OrgNode>;

    /// Persist a partial attribute change.
    async fn update_node(&self, id: &str, patch: &NodePatch) -> Result<()>;

    /// Persist a node's sort key among its siblings.
    async fn set_position(&self, id: &str, position: i64) -> Result<()>;

    /// Persist removal of a node. Descendants go with it by the store's
    /// cascade rules.
    async fn delete_node(&self, id: &str) -> Result<()>;
}
