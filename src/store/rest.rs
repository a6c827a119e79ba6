//! REST store client for PostgREST-compatible hosted databases

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::OrgStore;
use crate::error::{Result, StoreError};
use crate::tree::{NewNode, NodePatch, NodeRecord, OrgNode, build_tree};

/// Path prefix of the REST interface on the hosted database
const REST_PREFIX: &str = "/rest/v1";

/// Client-side request ceiling
const RATE_LIMIT_PER_SECOND: u32 = 10;

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Organization store backed by a PostgREST table
pub struct RestStore {
    http: HttpClient,
    base_url: String,
    table: String,
    api_key: String,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl RestStore {
    /// Create a client for `table` on the database at `store_url`.
    pub fn new(store_url: &str, table: &str, api_key: &str) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let quota = Quota::per_second(
            std::num::NonZeroU32::new(RATE_LIMIT_PER_SECOND).unwrap_or(std::num::NonZeroU32::MIN),
        );

        Ok(Self {
            http,
            base_url: store_url.trim_end_matches('/').to_string(),
            table: table.to_string(),
            api_key: api_key.to_string(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    fn table_url(&self) -> String {
        format!("{}{}/{}", self.base_url, REST_PREFIX, self.table)
    }

    /// Build a request against the table with auth headers attached
    fn request(&self, method: Method) -> RequestBuilder {
        self.http
            .request(method, self.table_url())
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    /// Send a request and map non-success statuses to store errors
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        self.rate_limiter.until_ready().await;

        let response = request.send().await.map_err(StoreError::from)?;
        let status = response.status();
        log::debug!("{} {}", status.as_u16(), response.url());

        if status.is_success() {
            return Ok(response);
        }

        let err = match status {
            StatusCode::UNAUTHORIZED => StoreError::Unauthorized,
            StatusCode::FORBIDDEN => StoreError::Forbidden,
            StatusCode::NOT_FOUND => StoreError::NotFound(body_or(response, "Table not found").await),
            StatusCode::CONFLICT => StoreError::Conflict(body_or(response, "Conflict").await),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                StoreError::RateLimit(Duration::from_secs(retry_after))
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                StoreError::BadRequest(body_or(response, "Bad request").await)
            }
            status if status.is_server_error() => {
                StoreError::ServerError(body_or(response, &format!("Server error: {}", status)).await)
            }
            _ => StoreError::InvalidResponse(format!("Unexpected status code: {}", status)),
        };
        Err(err.into())
    }

    /// Send a request that returns rows as JSON
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let data = response.json::<T>().await.map_err(|e| {
            StoreError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;
        Ok(data)
    }

    /// Filter matching a single row by id
    fn id_filter(id: &str) -> [(&'static str, String); 1] {
        [("id", format!("eq.{}", id))]
    }
}

async fn body_or(response: Response, fallback: &str) -> String {
    match response.text().await {
        Ok(text) if !text.trim().is_empty() => text,
        _ => fallback.to_string(),
    }
}

#[async_trait]
impl OrgStore for RestStore {
    async fn fetch_tree(&self) -> Result<Option<OrgNode>> {
        let request = self
            .request(Method::GET)
            .query(&[("select", "*"), ("order", "position.asc.nullslast,id.asc")]);
        let rows: Vec<NodeRecord> = self.send_json(request).await?;

        log::debug!("Fetched {} rows from {}", rows.len(), self.table);
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(build_tree(rows)?))
    }

    async fn create_node(&self, node: NewNode) -> Result<OrgNode> {
        let request = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .json(&node);
        let mut rows: Vec<NodeRecord> = self.send_json(request).await?;

        match rows.pop() {
            Some(row) if rows.is_empty() => Ok(row.into()),
            _ => Err(StoreError::InvalidResponse(
                "Expected exactly one created row".to_string(),
            )
            .into()),
        }
    }

    async fn update_node(&self, id: &str, patch: &NodePatch) -> Result<()> {
        let request = self
            .request(Method::PATCH)
            .query(&Self::id_filter(id))
            .header("Prefer", "return=representation")
            .json(patch);
        let rows: Vec<NodeRecord> = self.send_json(request).await?;

        if rows.is_empty() {
            return Err(StoreError::NotFound(format!("node {}", id)).into());
        }
        Ok(())
    }

    async fn set_position(&self, id: &str, position: i64) -> Result<()> {
        let request = self
            .request(Method::PATCH)
            .query(&Self::id_filter(id))
            .header("Prefer", "return=representation")
            .json(&serde_json::json!({ "position": position }));
        let rows: Vec<NodeRecord> = self.send_json(request).await?;

        if rows.is_empty() {
            return Err(StoreError::NotFound(format!("node {}", id)).into());
        }
        Ok(())
    }

    async fn delete_node(&self, id: &str) -> Result<()> {
        let request = self
            .request(Method::DELETE)
            .query(&Self::id_filter(id))
            .header("Prefer", "return=representation");
        let rows: Vec<NodeRecord> = self.send_json(request).await?;

        if rows.is_empty() {
            return Err(StoreError::NotFound(format!("node {}", id)).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use mockito::Matcher;

    const ROWS: &str = r#"[
        {"id": "ceo", "parent_id": null, "name": "A", "title": "CEO", "position": null},
        {"id": "vp1", "parent_id": "ceo", "name": "C", "title": "VP", "position": 1},
        {"id": "cto", "parent_id": "ceo", "name": "B", "title": "CTO", "position": 0, "count": 8}
    ]"#;

    #[test]
    fn test_store_creation_trims_trailing_slash() {
        let store = RestStore::new("https://db.example.com/", "org_nodes", "key").unwrap();
        assert_eq!(store.table_url(), "https://db.example.com/rest/v1/org_nodes");
    }

    #[cfg_attr(not(feature = "http-tests"), ignore)]
    #[tokio::test]
    async fn test_fetch_tree_assembles_rows() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/org_nodes")
            .match_query(Matcher::Any)
            .match_header("apikey", "secret")
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_body(ROWS)
            .create_async()
            .await;

        let store = RestStore::new(&server.url(), "org_nodes", "secret").unwrap();
        let tree = store.fetch_tree().await.unwrap().unwrap();

        mock.assert_async().await;
        assert_eq!(tree.id, "ceo");
        let ids: Vec<_> = tree.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["cto", "vp1"]);
        assert_eq!(tree.children[0].count, Some(8));
    }

    #[cfg_attr(not(feature = "http-tests"), ignore)]
    #[tokio::test]
    async fn test_fetch_tree_empty_table() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/v1/org_nodes")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let store = RestStore::new(&server.url(), "org_nodes", "k").unwrap();
        assert!(store.fetch_tree().await.unwrap().is_none());
    }

    #[cfg_attr(not(feature = "http-tests"), ignore)]
    #[tokio::test]
    async fn test_create_node_returns_assigned_id() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/rest/v1/org_nodes")
            .match_header("prefer", "return=representation")
            .match_body(Matcher::PartialJsonString(
                r#"{"parent_id": "ceo", "name": "C", "title": "VP"}"#.to_string(),
            ))
            .with_status(201)
            .with_body(r#"[{"id": "vp1", "parent_id": "ceo", "name": "C", "title": "VP"}]"#)
            .create_async()
            .await;

        let store = RestStore::new(&server.url(), "org_nodes", "k").unwrap();
        let node = store
            .create_node(NewNode::child_of("ceo", "C", "VP"))
            .await
            .unwrap();

        assert_eq!(node.id, "vp1");
        assert_eq!(node.parent_id.as_deref(), Some("ceo"));
    }

    #[cfg_attr(not(feature = "http-tests"), ignore)]
    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("PATCH", "/rest/v1/org_nodes")
            .match_query(Matcher::UrlEncoded("id".into(), "eq.ghost".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let store = RestStore::new(&server.url(), "org_nodes", "k").unwrap();
        let err = store
            .update_node("ghost", &NodePatch::new().name("X"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Store(StoreError::NotFound(_))));
    }

    #[cfg_attr(not(feature = "http-tests"), ignore)]
    #[tokio::test]
    async fn test_status_mapping() {
        let mut server = mockito::Server::new_async().await;
        let _unauthorized = server
            .mock("DELETE", "/rest/v1/org_nodes")
            .match_query(Matcher::UrlEncoded("id".into(), "eq.cto".into()))
            .with_status(401)
            .create_async()
            .await;
        let _throttled = server
            .mock("DELETE", "/rest/v1/org_nodes")
            .match_query(Matcher::UrlEncoded("id".into(), "eq.cfo".into()))
            .with_status(429)
            .with_header("retry-after", "7")
            .create_async()
            .await;

        let store = RestStore::new(&server.url(), "org_nodes", "k").unwrap();

        let err = store.delete_node("cto").await.unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::Unauthorized)));

        let err = store.delete_node("cfo").await.unwrap_err();
        match err {
            Error::Store(StoreError::RateLimit(d)) => assert_eq!(d, Duration::from_secs(7)),
            other => panic!("Expected rate limit, got {:?}", other),
        }
    }

    #[cfg_attr(not(feature = "http-tests"), ignore)]
    #[tokio::test]
    async fn test_set_position_patches_only_position() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/rest/v1/org_nodes")
            .match_query(Matcher::UrlEncoded("id".into(), "eq.cto".into()))
            .match_body(Matcher::JsonString(r#"{"position": 3}"#.to_string()))
            .with_status(200)
            .with_body(r#"[{"id": "cto", "parent_id": "ceo", "name": "B", "title": "CTO", "position": 3}]"#)
            .create_async()
            .await;

        let store = RestStore::new(&server.url(), "org_nodes", "k").unwrap();
        store.set_position("cto", 3).await.unwrap();

        mock.assert_async().await;
    }
}
