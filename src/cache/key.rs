//! Cache key generation using SHA-256 hashes

use sha2::{Digest, Sha256};

/// Generate a deterministic cache key for a tree snapshot.
///
/// The key hashes the operation, the store URL and the table name, so two
/// configurations pointing at different tables never share an entry.
pub fn cache_key(operation: &str, store_url: &str, table: &str) -> String {
    let mut hasher = Sha256::new();

    for part in [operation, store_url.trim_end_matches('/'), table] {
        hasher.update(part.as_bytes());
        hasher.update(b"|");
    }

    format!("{:x}", hasher.finalize())
}
