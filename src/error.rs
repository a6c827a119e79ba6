//! Error types for orgtree

use std::time::Duration;
use thiserror::Error;

/// Result type alias for orgtree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

impl Error {
    /// Whether retrying the same command may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Store(err) if err.is_retryable())
    }
}

/// Failures reported by the persistence service
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Authentication failed. Run `orgtree init` to set up your API key.")]
    Unauthorized,

    #[error("Access denied. The API key is not allowed to access this table.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rate limit exceeded. Retry after {0:?}")]
    RateLimit(Duration),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid store response: {0}")]
    InvalidResponse(String),
}

impl StoreError {
    /// Transient failures worth surfacing as "try again".
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StoreError::Network(_) | StoreError::RateLimit(_) | StoreError::ServerError(_)
        )
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            StoreError::Network("Failed to connect to store".to_string())
        } else {
            StoreError::Network(err.to_string())
        }
    }
}

/// Structural errors raised by the strict tree operations and tree assembly
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Node id already exists in the tree: {0}")]
    DuplicateId(String),

    #[error("The root node cannot be removed: {0}")]
    RootRemoval(String),

    #[error("The tree already has a root: {0}")]
    RootExists(String),

    #[error("No root node (a node without a parent) was found")]
    MissingRoot,

    #[error("More than one root node: {}", .0.join(", "))]
    MultipleRoots(Vec<String>),

    #[error("Node {id} references unknown parent {parent_id}")]
    DanglingParent { id: String, parent_id: String },

    #[error("Node {0} is not reachable from the root (cycle in parent links)")]
    Cycle(String),

    #[error("Node {id} has parent_id {actual:?}, expected {expected:?}")]
    ParentMismatch {
        id: String,
        expected: Option<String>,
        actual: Option<String>,
    },
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found. Run `orgtree init` to set up.")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Store URL not configured. Run `orgtree init` or pass --store-url.")]
    MissingStoreUrl,

    #[error("API key not configured. Run `orgtree init` to set up your API key.")]
    MissingApiKey,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Snapshot cache errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Could not determine cache directory")]
    NoHome,

    #[error("Cache I/O error: {0}")]
    Io(String),

    #[error("Cache database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
