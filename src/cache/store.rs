//! Caching wrapper for any [`OrgStore`]

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use super::{CacheStorage, cache_key};
use crate::error::Result;
use crate::store::OrgStore;
use crate::tree::{NewNode, NodePatch, OrgNode};

/// Wraps a store with an on-disk snapshot of the last fetched tree.
///
/// Reads are served from the snapshot while it is fresh. Every successful
/// mutation drops the snapshot so the next read goes back to the store.
/// Cache failures are logged and otherwise ignored.
pub struct CachedOrgStore<S: OrgStore> {
    inner: S,
    cache: Option<Mutex<CacheStorage>>,
    key: String,
    source: String,
    ttl: Duration,
}

impl<S: OrgStore> CachedOrgStore<S> {
    /// Wrap `inner`, caching under the default cache directory.
    ///
    /// # Arguments
    /// * `store_url` / `table` - identify the snapshot
    /// * `enabled` - false for `--no-cache`
    pub fn new(inner: S, store_url: &str, table: &str, ttl: Duration, enabled: bool) -> Self {
        let storage = if enabled {
            CacheStorage::open()
                .inspect_err(|e| log::warn!("Snapshot cache unavailable: {}", e))
                .ok()
        } else {
            None
        };
        Self::with_storage(inner, storage, store_url, table, ttl)
    }

    /// Wrap `inner` with an explicit storage (or none).
    pub fn with_storage(
        inner: S,
        storage: Option<CacheStorage>,
        store_url: &str,
        table: &str,
        ttl: Duration,
    ) -> Self {
        Self {
            inner,
            cache: storage.map(Mutex::new),
            key: cache_key("fetch_tree", store_url, table),
            source: format!("{}|{}", store_url.trim_end_matches('/'), table),
            ttl,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    fn get_cached(&self) -> Option<OrgNode> {
        let cache = self.cache.as_ref()?;
        let guard = cache.lock().ok()?;
        guard
            .get(&self.key)
            .ok()
            .flatten()
            .and_then(|data| serde_json::from_slice(&data).ok())
    }

    fn set_cached(&self, tree: &OrgNode) {
        if let Some(ref cache) = self.cache
            && let Ok(guard) = cache.lock()
            && let Ok(json) = serde_json::to_vec(tree)
            && let Err(e) = guard.put(&self.key, &json, &self.source, self.ttl)
        {
            log::warn!("Failed to write snapshot: {}", e);
        }
    }

    fn invalidate(&self) {
        if let Some(ref cache) = self.cache
            && let Ok(guard) = cache.lock()
        {
            match guard.delete(&self.key) {
                Ok(true) => log::debug!("Snapshot invalidated for {}", self.source),
                Ok(false) => {}
                Err(e) => log::warn!("Failed to invalidate snapshot: {}", e),
            }
        }
    }

    async fn fetch_and_store(&self) -> Result<Option<OrgNode>> {
        let tree = self.inner.fetch_tree().await?;
        match tree {
            Some(ref tree) => self.set_cached(tree),
            None => self.invalidate(),
        }
        Ok(tree)
    }
}

#[async_trait]
impl<S: OrgStore> OrgStore for CachedOrgStore<S> {
    async fn fetch_tree(&self) -> Result<Option<OrgNode>> {
        if let Some(cached) = self.get_cached() {
            log::debug!("Cache hit: fetch_tree");
            return Ok(Some(cached));
        }
        log::debug!("Cache miss: fetch_tree");
        self.fetch_and_store().await
    }

    async fn fetch_tree_fresh(&self) -> Result<Option<OrgNode>> {
        self.fetch_and_store().await
    }

    async fn create_node(&self, node: NewNode) -> Result<OrgNode> {
        let created = self.inner.create_node(node).await?;
        self.invalidate();
        Ok(created)
    }

    async fn update_node(&self, id: &str, patch: &NodePatch) -> Result<()> {
        self.inner.update_node(id, patch).await?;
        self.invalidate();
        Ok(())
    }

    async fn set_position(&self, id: &str, position: i64) -> Result<()> {
        self.inner.set_position(id, position).await?;
        self.invalidate();
        Ok(())
    }

    async fn delete_node(&self, id: &str) -> Result<()> {
        self.inner.delete_node(id).await?;
        self.invalidate();
        Ok(())
    }
}
