//! SQLite-based snapshot storage

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::CacheError;

/// Schema version - increment to trigger nuke-and-rebuild
const SCHEMA_VERSION: i32 = 1;

type Result<T> = std::result::Result<T, CacheError>;

/// SQLite-backed store of serialized tree snapshots
pub struct CacheStorage {
    conn: Connection,
    db_path: PathBuf,
}

impl CacheStorage {
    /// Open or create cache storage at the default XDG cache location
    pub fn open() -> Result<Self> {
        let cache_dir = Self::cache_dir()?;
        Self::open_at(&cache_dir)
    }

    /// Get the cache directory path (~/.cache/orgtree on Linux)
    pub fn cache_dir() -> Result<PathBuf> {
        let cache_base = dirs::cache_dir().ok_or(CacheError::NoHome)?;
        Ok(cache_base.join("orgtree"))
    }

    /// Open cache storage at a specific directory
    pub fn open_at(cache_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(cache_dir)
            .map_err(|e| CacheError::Io(format!("Failed to create cache dir: {}", e)))?;

        let db_path = cache_dir.join("cache.db");
        let conn = Connection::open(&db_path)?;

        let version: i32 = conn
            .pragma_query_value(None, "user_version", |r| r.get(0))
            .unwrap_or(0);

        if version != 0 && version != SCHEMA_VERSION {
            log::info!(
                "Cache schema version mismatch ({} != {}), rebuilding",
                version,
                SCHEMA_VERSION
            );
            drop(conn);
            std::fs::remove_file(&db_path)
                .map_err(|e| CacheError::Io(format!("Failed to remove cache DB: {}", e)))?;
            return Self::open_at(cache_dir);
        }

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS snapshots (
                cache_key TEXT PRIMARY KEY NOT NULL,
                source TEXT NOT NULL,
                data TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                expires_at INTEGER NOT NULL,
                size_bytes INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_snapshots_expires_at ON snapshots(expires_at);
            "#,
        )?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(Self { conn, db_path })
    }

    /// Location of the database file
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Get a snapshot if present and not expired
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let now = Utc::now().timestamp();

        let data: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM snapshots WHERE cache_key = ?1 AND expires_at > ?2",
                params![key, now],
                |row| row.get(0),
            )
            .optional()?;

        Ok(data.map(String::into_bytes))
    }

    /// Store a snapshot with TTL, replacing any previous one under `key`
    pub fn put(&self, key: &str, data: &[u8], source: &str, ttl: Duration) -> Result<()> {
        let now = Utc::now().timestamp();
        let expires = now + ttl.as_secs() as i64;

        self.conn.execute(
            "INSERT OR REPLACE INTO snapshots
             (cache_key, source, data, created_at, expires_at, size_bytes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                key,
                source,
                String::from_utf8_lossy(data).to_string(),
                now,
                expires,
                data.len()
            ],
        )?;
        Ok(())
    }

    /// Delete a snapshot; returns whether one existed
    pub fn delete(&self, key: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM snapshots WHERE cache_key = ?1", [key])?;
        Ok(deleted > 0)
    }

    /// Clear all snapshots
    pub fn clear_all(&self) -> Result<ClearStats> {
        let removed = self.conn.execute("DELETE FROM snapshots", [])?;
        Ok(ClearStats {
            entries_removed: removed,
        })
    }

    /// Get cache statistics
    pub fn stats(&self) -> Result<CacheStats> {
        let now = Utc::now().timestamp();

        let (total, valid, size, oldest, newest): (i64, i64, i64, Option<i64>, Option<i64>) =
            self.conn.query_row(
                "SELECT COUNT(*),
                        COALESCE(SUM(expires_at > ?1), 0),
                        COALESCE(SUM(size_bytes), 0),
                        MIN(CASE WHEN expires_at > ?1 THEN created_at END),
                        MAX(CASE WHEN expires_at > ?1 THEN created_at END)
                 FROM snapshots",
                [now],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
            )?;

        Ok(CacheStats {
            total_entries: total as usize,
            valid_entries: valid as usize,
            expired_entries: (total - valid) as usize,
            total_size_bytes: size as usize,
            oldest_entry: oldest,
            newest_entry: newest,
        })
    }
}

/// Statistics about cache clear operation
#[derive(Debug)]
pub struct ClearStats {
    pub entries_removed: usize,
}

/// Statistics about cache state
#[derive(Debug)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
    pub total_size_bytes: usize,
    pub oldest_entry: Option<i64>,
    pub newest_entry: Option<i64>,
}
