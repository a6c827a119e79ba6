//! Read-through organization chart
//!
//! [`OrgChart`] owns the in-memory tree for one session. Every mutation is
//! sent to the store first; the local tree is replaced only once the store
//! has confirmed the change, so the tree always reflects the last confirmed
//! state and never an optimistic projection.

use crate::error::{Result, TreeError};
use crate::store::OrgStore;
use crate::tree::{NewNode, NodePatch, OrgNode, OrgTree, ops};

/// Single owner of the current organization tree
pub struct OrgChart<S: OrgStore> {
    store: S,
    tree: Option<OrgTree>,
}

impl<S: OrgStore> OrgChart<S> {
    /// Create a chart with nothing loaded yet.
    pub fn new(store: S) -> Self {
        Self { store, tree: None }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The last confirmed tree, if one has been loaded.
    pub fn tree(&self) -> Option<&OrgTree> {
        self.tree.as_ref()
    }

    pub fn find(&self, id: &str) -> Option<&OrgNode> {
        self.tree.as_ref()?.find(id)
    }

    /// Load the tree through the store (and its cache, if any).
    pub async fn load(&mut self) -> Result<Option<&OrgTree>> {
        let fetched = self.store.fetch_tree().await?;
        Ok(self.replace(fetched))
    }

    /// Reload the tree, bypassing caches.
    pub async fn refresh(&mut self) -> Result<Option<&OrgTree>> {
        let fetched = self.store.fetch_tree_fresh().await?;
        Ok(self.replace(fetched))
    }

    fn replace(&mut self, fetched: Option<OrgNode>) -> Option<&OrgTree> {
        // Snapshot so the working copy shares nothing with what the store returned.
        self.tree = fetched.as_ref().map(|root| OrgTree::new(ops::snapshot(root)));
        if let Some(ref tree) = self.tree {
            log::debug!("Loaded organization tree with {} nodes", tree.len());
        }
        self.tree.as_ref()
    }

    /// Create the root of an empty organization.
    pub async fn create_root(&mut self, mut new: NewNode) -> Result<OrgNode> {
        if let Some(ref tree) = self.tree {
            return Err(TreeError::RootExists(tree.root().id.clone()).into());
        }
        new.parent_id = None;
        new.position = None;

        let created = self.store.create_node(new).await?;
        self.tree = Some(OrgTree::new(created.clone()));
        Ok(created)
    }

    /// Add a node as the last child of `new.parent_id` and return it as the
    /// store created it.
    pub async fn add_child(&mut self, mut new: NewNode) -> Result<OrgNode> {
        let Some(parent_id) = new.parent_id.clone() else {
            return self.create_root(new).await;
        };
        new.position = Some(self.append_position(&parent_id).await?);

        let created = self.store.create_node(new).await?;

        let placed = self
            .tree_ref(&parent_id)?
            .checked_add_child(&parent_id, created.clone());
        self.commit(placed, &created.id)?;
        Ok(created)
    }

    /// Position that sorts after every current child of `parent_id` once the
    /// tree is reloaded. Children whose stored positions cannot guarantee
    /// that (missing or out of order) are renumbered in the store first.
    async fn append_position(&mut self, parent_id: &str) -> Result<i64> {
        let parent = self.require(parent_id)?;
        if let Some(next) = ops::next_child_position(parent) {
            return Ok(next);
        }

        let siblings: Vec<(String, Option<i64>)> = parent
            .children
            .iter()
            .map(|c| (c.id.clone(), c.position))
            .collect();
        log::debug!("Renumbering {} children of {}", siblings.len(), parent_id);

        for (pos, (id, current)) in siblings.iter().enumerate() {
            let pos = pos as i64;
            if *current == Some(pos) {
                continue;
            }
            self.store.set_position(id, pos).await?;
            let renumbered = self.tree_ref(id)?.checked_set_position(id, pos);
            self.commit(renumbered, id)?;
        }
        Ok(siblings.len() as i64)
    }

    /// Patch node `id` and return its updated state.
    pub async fn update(&mut self, id: &str, patch: &NodePatch) -> Result<&OrgNode> {
        self.require(id)?;

        if !patch.is_empty() {
            self.store.update_node(id, patch).await?;
            let next = self.tree_ref(id)?.checked_update(id, patch);
            self.commit(next, id)?;
        }

        self.require(id)
    }

    /// Remove node `id` and its subtree; returns every removed id, `id` first.
    pub async fn remove(&mut self, id: &str) -> Result<Vec<String>> {
        let tree = self.tree_ref(id)?;
        if tree.root().id == id {
            return Err(TreeError::RootRemoval(id.to_string()).into());
        }
        let node = self.require(id)?;
        let mut removed = vec![node.id.clone()];
        removed.extend(ops::descendant_ids(node));

        self.store.delete_node(id).await?;

        let next = self.tree_ref(id)?.checked_remove(id);
        self.commit(next, id)?;
        Ok(removed)
    }

    /// Install the result of a local step that follows a confirmed store write.
    ///
    /// On failure the store and the local copy disagree, so the tree is
    /// dropped and the next load resynchronizes.
    fn commit(&mut self, next: std::result::Result<OrgTree, TreeError>, id: &str) -> Result<()> {
        match next {
            Ok(tree) => {
                self.tree = Some(tree);
                Ok(())
            }
            Err(e) => {
                log::warn!("Stored change to {} could not be applied locally: {}", id, e);
                self.tree = None;
                Err(e.into())
            }
        }
    }

    fn tree_ref(&self, id: &str) -> Result<&OrgTree> {
        self.tree
            .as_ref()
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()).into())
    }

    fn require(&self, id: &str) -> Result<&OrgNode> {
        self.find(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, StoreError};
    use crate::store::MockOrgStore;

    fn seeded() -> MockOrgStore {
        MockOrgStore::new().with_tree(OrgNode::new("ceo", "A", "CEO").with_children(vec![
            OrgNode::new("cto", "B", "CTO")
                .with_children(vec![OrgNode::new("vp-data", "D", "VP Data")]),
        ]))
    }

    async fn loaded() -> OrgChart<MockOrgStore> {
        let mut chart = OrgChart::new(seeded());
        chart.load().await.unwrap();
        chart
    }

    #[tokio::test]
    async fn test_load() {
        let chart = loaded().await;
        assert_eq!(chart.tree().unwrap().len(), 3);
        assert_eq!(chart.find("vp-data").unwrap().title, "VP Data");
    }

    #[tokio::test]
    async fn test_load_empty_store() {
        let mut chart = OrgChart::new(MockOrgStore::new());
        assert!(chart.load().await.unwrap().is_none());
        assert!(chart.find("ceo").is_none());
    }

    #[tokio::test]
    async fn test_add_child_appends_and_persists() {
        let mut chart = loaded().await;
        let created = chart
            .add_child(NewNode::child_of("ceo", "C", "VP"))
            .await
            .unwrap();

        let root = chart.tree().unwrap().root();
        let ids: Vec<_> = root.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["cto", created.id.as_str()]);

        // The store agrees with the local tree
        chart.refresh().await.unwrap();
        let ids: Vec<_> = chart
            .tree()
            .unwrap()
            .root()
            .children
            .iter()
            .map(|c| c.id.clone())
            .collect();
        assert_eq!(ids, vec!["cto".to_string(), created.id]);
    }

    fn child_ids(chart: &OrgChart<MockOrgStore>, parent: &str) -> Vec<String> {
        chart
            .find(parent)
            .unwrap()
            .children
            .iter()
            .map(|c| c.id.clone())
            .collect()
    }

    /// Add under `parent`, then check a fresh load reproduces the local order.
    async fn add_and_reload(chart: &mut OrgChart<MockOrgStore>, parent: &str) -> Vec<String> {
        let created = chart
            .add_child(NewNode::child_of(parent, "New", "Analyst"))
            .await
            .unwrap();
        let local = child_ids(chart, parent);
        assert_eq!(local.last(), Some(&created.id));

        chart.refresh().await.unwrap();
        assert_eq!(child_ids(chart, parent), local);
        local
    }

    #[tokio::test]
    async fn test_add_child_after_unpositioned_siblings_survives_reload() {
        let store = MockOrgStore::new().with_tree(OrgNode::new("ceo", "A", "CEO").with_children(
            vec![OrgNode::new("a", "B", "VP"), OrgNode::new("b", "C", "VP")],
        ));
        let mut chart = OrgChart::new(store);
        chart.load().await.unwrap();

        let ids = add_and_reload(&mut chart, "ceo").await;

        assert_eq!(ids[..2], ["a".to_string(), "b".to_string()]);
        assert_eq!(chart.store().calls().await.set_position, 2);
    }

    #[tokio::test]
    async fn test_add_child_after_remove_survives_reload() {
        let store = MockOrgStore::new().with_tree(OrgNode::new("ceo", "A", "CEO").with_children(
            vec![
                OrgNode::new("a", "B", "VP").with_position(0),
                OrgNode::new("b", "C", "VP").with_position(1),
                OrgNode::new("c", "D", "VP").with_position(2),
            ],
        ));
        let mut chart = OrgChart::new(store);
        chart.load().await.unwrap();
        chart.remove("a").await.unwrap();

        let ids = add_and_reload(&mut chart, "ceo").await;

        assert_eq!(ids[..2], ["b".to_string(), "c".to_string()]);
        let positions: Vec<_> = chart
            .find("ceo")
            .unwrap()
            .children
            .iter()
            .map(|c| c.position)
            .collect();
        assert_eq!(positions, vec![Some(1), Some(2), Some(3)]);
    }

    #[tokio::test]
    async fn test_add_child_after_position_gap_survives_reload() {
        let store = MockOrgStore::new().with_tree(OrgNode::new("ceo", "A", "CEO").with_children(
            vec![
                OrgNode::new("a", "B", "VP").with_position(1),
                OrgNode::new("b", "C", "VP").with_position(5),
            ],
        ));
        let mut chart = OrgChart::new(store);
        chart.load().await.unwrap();

        add_and_reload(&mut chart, "ceo").await;

        let created = &chart.find("ceo").unwrap().children[2];
        assert_eq!(created.position, Some(6));
        assert_eq!(chart.store().calls().await.set_position, 0);
    }

    #[tokio::test]
    async fn test_renumber_failure_skips_create() {
        let mut chart = loaded().await;
        let before = chart.tree().unwrap().clone();
        chart
            .store()
            .fail_next(StoreError::ServerError("unavailable".into()))
            .await;

        chart
            .add_child(NewNode::child_of("ceo", "C", "VP"))
            .await
            .unwrap_err();

        let calls = chart.store().calls().await;
        assert_eq!(calls.set_position, 1);
        assert_eq!(calls.create_node, 0);
        assert_eq!(chart.tree().unwrap(), &before);
    }

    #[tokio::test]
    async fn test_local_failure_after_store_write_drops_tree() {
        // The store hands out "node-1", which the loaded tree already uses
        let store = MockOrgStore::new().with_tree(
            OrgNode::new("ceo", "A", "CEO")
                .with_children(vec![OrgNode::new("node-1", "B", "CTO").with_position(0)]),
        );
        let mut chart = OrgChart::new(store);
        chart.load().await.unwrap();

        let err = chart
            .add_child(NewNode::child_of("ceo", "C", "VP"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Tree(TreeError::DuplicateId(_))));
        assert!(chart.tree().is_none());
    }

    #[tokio::test]
    async fn test_commit_failure_drops_tree() {
        let mut chart = loaded().await;

        let err = chart
            .commit(Err(TreeError::NodeNotFound("cto".to_string())), "cto")
            .unwrap_err();

        assert!(matches!(err, Error::Tree(TreeError::NodeNotFound(_))));
        assert!(chart.tree().is_none());
    }

    #[tokio::test]
    async fn test_add_child_unknown_parent_skips_store() {
        let mut chart = loaded().await;
        let err = chart
            .add_child(NewNode::child_of("ghost", "X", "X"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Tree(TreeError::NodeNotFound(_))));
        assert_eq!(chart.store().calls().await.create_node, 0);
    }

    #[tokio::test]
    async fn test_store_failure_leaves_tree_unchanged() {
        let mut chart = loaded().await;
        let before = chart.tree().unwrap().clone();

        chart
            .store()
            .fail_next(StoreError::Network("connection reset".into()))
            .await;
        let err = chart
            .update("cto", &NodePatch::new().name("B2"))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(chart.tree().unwrap(), &before);
    }

    #[tokio::test]
    async fn test_update_returns_patched_node() {
        let mut chart = loaded().await;
        let node = chart
            .update("cto", &NodePatch::new().name("B2"))
            .await
            .unwrap();

        assert_eq!(node.name, "B2");
        assert_eq!(node.title, "CTO");
        assert_eq!(node.parent_id.as_deref(), Some("ceo"));
    }

    #[tokio::test]
    async fn test_empty_update_skips_store() {
        let mut chart = loaded().await;
        chart.update("cto", &NodePatch::new()).await.unwrap();
        assert_eq!(chart.store().calls().await.update_node, 0);
    }

    #[tokio::test]
    async fn test_remove_subtree() {
        let mut chart = loaded().await;
        let removed = chart.remove("cto").await.unwrap();

        assert_eq!(removed, vec!["cto", "vp-data"]);
        assert!(chart.find("cto").is_none());
        assert!(chart.find("vp-data").is_none());
        assert_eq!(chart.store().rows().await.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_root_is_refused() {
        let mut chart = loaded().await;
        let err = chart.remove("ceo").await.unwrap_err();

        assert!(matches!(err, Error::Tree(TreeError::RootRemoval(_))));
        assert_eq!(chart.store().calls().await.delete_node, 0);
    }

    #[tokio::test]
    async fn test_create_root_on_empty_store() {
        let mut chart = OrgChart::new(MockOrgStore::new());
        chart.load().await.unwrap();

        let root = chart.create_root(NewNode::root("A", "CEO")).await.unwrap();
        assert!(root.is_root());

        let child = chart
            .add_child(NewNode::child_of(root.id.clone(), "B", "CTO"))
            .await
            .unwrap();
        assert_eq!(chart.find(&child.id).unwrap().parent_id, Some(root.id));
    }

    #[tokio::test]
    async fn test_create_root_refused_when_loaded() {
        let mut chart = loaded().await;
        let err = chart.create_root(NewNode::root("Z", "CEO")).await.unwrap_err();
        assert!(matches!(err, Error::Tree(TreeError::RootExists(_))));
    }
}
