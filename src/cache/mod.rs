//! On-disk snapshot cache for fetched trees
//!
//! The last tree confirmed by the store is kept in SQLite so repeated reads
//! (`show`, `find`) skip the network. Every mutation invalidates it.

pub mod key;
pub mod storage;
pub mod store;

pub use key::cache_key;
pub use storage::CacheStorage;
pub use store::CachedOrgStore;
