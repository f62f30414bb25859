//! SQLite-based implementation of the PayloadCache trait
//!
//! This module provides persistent caching of translation artifacts using
//! SQLite, surviving process restarts. Payloads are stored as JSON in a
//! single table; expiry is enforced on read and swept periodically in the
//! background.

use crate::cache::traits::PayloadCache;
use crate::cache::{CacheStats, CachedValue, StoreKey};
use async_trait::async_trait;
use glossa_core::error::{CacheError, Error, Result};
use log::{debug, info, warn};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Interval between background sweeps of expired rows
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

/// SQLite-based payload store
pub struct SqliteCache {
    pool: SqlitePool,
    hit_count: Arc<AtomicU64>,
    miss_count: Arc<AtomicU64>,
    shutdown: Arc<AtomicBool>,
}

impl SqliteCache {
    /// Open (or create) the store at the given path
    pub async fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| store_err(format!("create cache directory: {e}")))?;
        }

        let connect_options =
            SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))
                .map_err(|e| store_err(format!("connect options: {e}")))?
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await
            .map_err(|e| store_err(format!("connect to cache database: {e}")))?;

        Self::initialize_schema(&pool).await?;
        info!("SQLite payload cache opened at {}", db_path.display());

        let cache = Self {
            pool,
            hit_count: Arc::new(AtomicU64::new(0)),
            miss_count: Arc::new(AtomicU64::new(0)),
            shutdown: Arc::new(AtomicBool::new(false)),
        };
        cache.spawn_sweeper();
        Ok(cache)
    }

    async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS payload_cache (
                store_key TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                expires_at INTEGER
            )",
        )
        .execute(pool)
        .await
        .map_err(|e| store_err(format!("create table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_payload_cache_expires
                ON payload_cache(expires_at)",
        )
        .execute(pool)
        .await
        .map_err(|e| store_err(format!("create index: {e}")))?;

        Ok(())
    }

    fn spawn_sweeper(&self) {
        let pool = self.pool.clone();
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
            ticker.tick().await; // skip the immediate first tick
            loop {
                ticker.tick().await;
                if shutdown.load(Ordering::Relaxed) {
                    break;
                }
                match sqlx::query(
                    "DELETE FROM payload_cache
                     WHERE expires_at IS NOT NULL AND expires_at <= ?1",
                )
                .bind(now_unix())
                .execute(&pool)
                .await
                {
                    Ok(result) if result.rows_affected() > 0 => {
                        info!("swept {} expired cache rows", result.rows_affected());
                    }
                    Ok(_) => {}
                    Err(e) => warn!("cache sweep failed: {e}"),
                }
            }
        });
    }

    async fn upsert(
        &self,
        key: &StoreKey,
        value: &CachedValue,
        expires_at: Option<i64>,
    ) -> Result<()> {
        let payload = serde_json::to_string(value)?;
        sqlx::query(
            "INSERT OR REPLACE INTO payload_cache (store_key, payload, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(key.as_str())
        .bind(payload)
        .bind(now_unix())
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| store_err(format!("insert: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl PayloadCache for SqliteCache {
    async fn get(&self, key: &StoreKey) -> Result<Option<CachedValue>> {
        let row = sqlx::query(
            "SELECT payload FROM payload_cache
             WHERE store_key = ?1 AND (expires_at IS NULL OR expires_at > ?2)",
        )
        .bind(key.as_str())
        .bind(now_unix())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_err(format!("select: {e}")))?;

        let Some(row) = row else {
            self.miss_count.fetch_add(1, Ordering::Relaxed);
            return Ok(None);
        };

        let payload: String = row.get("payload");
        match serde_json::from_str::<CachedValue>(&payload) {
            Ok(value) => {
                self.hit_count.fetch_add(1, Ordering::Relaxed);
                debug!("cache hit for {key}");
                Ok(Some(value))
            }
            Err(e) => {
                // A corrupt row behaves like a miss rather than poisoning reads
                warn!("discarding undecodable cache row for {key}: {e}");
                self.invalidate(key).await?;
                self.miss_count.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    async fn put(&self, key: &StoreKey, value: &CachedValue) -> Result<()> {
        self.upsert(key, value, None).await
    }

    async fn put_with_ttl(&self, key: &StoreKey, value: &CachedValue, ttl: Duration) -> Result<()> {
        self.upsert(key, value, Some(now_unix() + ttl.as_secs() as i64))
            .await
    }

    async fn add_if_absent(
        &self,
        key: &StoreKey,
        value: &CachedValue,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        // An expired row counts as absent; clear it so the insert can land.
        sqlx::query(
            "DELETE FROM payload_cache
             WHERE store_key = ?1 AND expires_at IS NOT NULL AND expires_at <= ?2",
        )
        .bind(key.as_str())
        .bind(now_unix())
        .execute(&self.pool)
        .await
        .map_err(|e| store_err(format!("expire: {e}")))?;

        let payload = serde_json::to_string(value)?;
        let result = sqlx::query(
            "INSERT OR IGNORE INTO payload_cache (store_key, payload, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(key.as_str())
        .bind(payload)
        .bind(now_unix())
        .bind(ttl.map(|ttl| now_unix() + ttl.as_secs() as i64))
        .execute(&self.pool)
        .await
        .map_err(|e| store_err(format!("insert if absent: {e}")))?;

        Ok(result.rows_affected() == 1)
    }

    async fn invalidate(&self, key: &StoreKey) -> Result<()> {
        sqlx::query("DELETE FROM payload_cache WHERE store_key = ?1")
            .bind(key.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| store_err(format!("delete: {e}")))?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM payload_cache")
            .execute(&self.pool)
            .await
            .map_err(|e| store_err(format!("clear: {e}")))?;
        self.hit_count.store(0, Ordering::Relaxed);
        self.miss_count.store(0, Ordering::Relaxed);
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM payload_cache")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| store_err(format!("count: {e}")))?;
        let entry_count: i64 = row.get("n");

        Ok(CacheStats {
            entry_count: entry_count as usize,
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
        })
    }
}

impl Drop for SqliteCache {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

fn store_err(message: String) -> Error {
    CacheError::store(message).into()
}

/// Current time as Unix timestamp (seconds)
fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
