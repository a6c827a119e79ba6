//! In-memory organization store for testing
//!
//! Keeps flat rows the way the hosted table does, assigns sequential ids,
//! cascades deletes, and can be told to fail the next call.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::OrgStore;
use crate::error::{Result, StoreError};
use crate::tree::{NewNode, NodePatch, NodeRecord, OrgNode, build_tree, flatten};

/// Mock store for testing.
///
/// # Example
/// ```ignore
/// let store = MockOrgStore::new().with_tree(root);
/// let tree = store.fetch_tree().await?;
/// ```
#[derive(Default, Clone)]
pub struct MockOrgStore {
    rows: Arc<Mutex<Vec<NodeRecord>>>,
    next_id: Arc<Mutex<usize>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<StoreError>>>,
    call_count: Arc<Mutex<CallCounts>>,
}

/// Tracks store call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub fetch_tree: usize,
    pub create_node: usize,
    pub update_node: usize,
    pub set_position: usize,
    pub delete_node: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.fetch_tree + self.create_node + self.update_node + self.set_position + self.delete_node
    }
}

impl MockOrgStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the table with the rows of `tree`.
    pub fn with_tree(self, tree: OrgNode) -> Self {
        if let Ok(mut rows) = self.rows.try_lock() {
            *rows = flatten(&tree);
        }
        self
    }

    /// Fail the next call with `error`.
    pub async fn fail_next(&self, error: StoreError) {
        *self.error.lock().await = Some(error);
    }

    pub async fn calls(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    pub async fn rows(&self) -> Vec<NodeRecord> {
        self.rows.lock().await.clone()
    }

    async fn take_error(&self) -> Result<()> {
        match self.error.lock().await.take() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl OrgStore for MockOrgStore {
    async fn fetch_tree(&self) -> Result<Option<OrgNode>> {
        self.call_count.lock().await.fetch_tree += 1;
        self.take_error().await?;

        let rows = self.rows.lock().await.clone();
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(build_tree(rows)?))
    }

    async fn create_node(&self, node: NewNode) -> Result<OrgNode> {
        self.call_count.lock().await.create_node += 1;
        self.take_error().await?;

        let mut rows = self.rows.lock().await;
        if let Some(ref parent_id) = node.parent_id
            && !rows.iter().any(|r| &r.id == parent_id)
        {
            return Err(StoreError::Conflict(format!("unknown parent {}", parent_id)).into());
        }

        let mut next_id = self.next_id.lock().await;
        *next_id += 1;
        let id = format!("node-{}", next_id);

        let created = node.into_node(id);
        rows.push(NodeRecord::from(&created));

        Ok(created)
    }

    async fn update_node(&self, id: &str, patch: &NodePatch) -> Result<()> {
        self.call_count.lock().await.update_node += 1;
        self.take_error().await?;

        let mut rows = self.rows.lock().await;
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("node {}", id)))?;

        if let Some(ref name) = patch.name {
            row.name = name.clone();
        }
        if let Some(ref title) = patch.title {
            row.title = title.clone();
        }
        if let Some(ref image) = patch.image {
            row.image = Some(image.clone());
        }
        if let Some(count) = patch.count {
            row.count = Some(count);
        }
        Ok(())
    }

    async fn set_position(&self, id: &str, position: i64) -> Result<()> {
        self.call_count.lock().await.set_position += 1;
        self.take_error().await?;

        let mut rows = self.rows.lock().await;
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("node {}", id)))?;
        row.position = Some(position);
        Ok(())
    }

    async fn delete_node(&self, id: &str) -> Result<()> {
        self.call_count.lock().await.delete_node += 1;
        self.take_error().await?;

        let mut rows = self.rows.lock().await;
        if !rows.iter().any(|r| r.id == id) {
            return Err(StoreError::NotFound(format!("node {}", id)).into());
        }

        // Cascade like an ON DELETE CASCADE foreign key
        let mut doomed = vec![id.to_string()];
        let mut i = 0;
        while i < doomed.len() {
            let parent = doomed[i].clone();
            doomed.extend(
                rows.iter()
                    .filter(|r| r.parent_id.as_deref() == Some(parent.as_str()))
                    .map(|r| r.id.clone()),
            );
            i += 1;
        }
        rows.retain(|r| !doomed.contains(&r.id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn seeded() -> MockOrgStore {
        MockOrgStore::new().with_tree(OrgNode::new("ceo", "A", "CEO").with_children(vec![
            OrgNode::new("cto", "B", "CTO")
                .with_children(vec![OrgNode::new("vp-data", "D", "VP Data")]),
        ]))
    }

    #[tokio::test]
    async fn test_empty_store_has_no_tree() {
        let store = MockOrgStore::new();
        assert!(store.fetch_tree().await.unwrap().is_none());
        assert_eq!(store.calls().await.fetch_tree, 1);
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let store = seeded();
        store.delete_node("cto").await.unwrap();

        let ids: Vec<_> = store.rows().await.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["ceo"]);
    }

    #[tokio::test]
    async fn test_create_under_unknown_parent() {
        let store = seeded();
        let err = store
            .create_node(NewNode::child_of("ghost", "X", "X"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_injected_error_is_consumed() {
        let store = seeded();
        store.fail_next(StoreError::ServerError("boom".into())).await;

        assert!(store.fetch_tree().await.is_err());
        assert!(store.fetch_tree().await.is_ok());
        assert_eq!(store.calls().await.total(), 2);
    }
}
