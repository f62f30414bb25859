//! Cache factory for creating different store implementations
//!
//! This module provides a factory for creating store instances based on
//! configuration, including the layered memory-over-SQLite arrangement used
//! in production.

use crate::cache::memory_cache::{MemoryCache, MemoryCacheConfig};
use crate::cache::noop_cache::NoOpCache;
use crate::cache::sqlite_cache::SqliteCache;
use crate::cache::traits::PayloadCache;
use crate::cache::{CacheStats, CachedValue, StoreKey};
use crate::paths;
use async_trait::async_trait;
use glossa_core::error::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// How long an entry promoted from L2 stays in the L1 memory layer
const PROMOTE_TTL: Duration = Duration::from_secs(3600);

/// Configuration for the different store types
#[derive(Debug, Clone)]
pub enum CacheConfig {
    /// Memory-only store
    Memory(MemoryCacheConfig),
    /// SQLite-backed persistent store
    Sqlite { db_path: PathBuf },
    /// Memory L1 over SQLite L2
    Layered {
        memory_config: MemoryCacheConfig,
        db_path: PathBuf,
    },
    /// No caching
    NoOp,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::Layered {
            memory_config: MemoryCacheConfig::default(),
            db_path: paths::get_database_path(),
        }
    }
}

/// Factory for creating store implementations
pub struct CacheFactory;

impl CacheFactory {
    /// Create a store implementation based on configuration
    pub async fn create(config: CacheConfig) -> Result<Arc<dyn PayloadCache>> {
        match config {
            CacheConfig::Memory(config) => Ok(Arc::new(MemoryCache::with_config(config))),
            CacheConfig::Sqlite { db_path } => {
                Ok(Arc::new(SqliteCache::new(&db_path).await?))
            }
            CacheConfig::Layered {
                memory_config,
                db_path,
            } => {
                let l1 = MemoryCache::with_config(memory_config);
                let l2 = SqliteCache::new(&db_path).await?;
                Ok(Arc::new(LayeredCache::new(l1, l2)))
            }
            CacheConfig::NoOp => Ok(Arc::new(NoOpCache::new())),
        }
    }

    /// Create a memory-only store
    pub async fn memory() -> Result<Arc<dyn PayloadCache>> {
        Self::create(CacheConfig::Memory(MemoryCacheConfig::default())).await
    }

    /// Create a no-op store
    pub async fn noop() -> Result<Arc<dyn PayloadCache>> {
        Self::create(CacheConfig::NoOp).await
    }
}

/// Layered store (L1: memory, L2: SQLite)
struct LayeredCache {
    l1: MemoryCache,
    l2: SqliteCache,
}

impl LayeredCache {
    fn new(l1: MemoryCache, l2: SqliteCache) -> Self {
        Self { l1, l2 }
    }
}

#[async_trait]
impl PayloadCache for LayeredCache {
    async fn get(&self, key: &StoreKey) -> Result<Option<CachedValue>> {
        if let Some(value) = self.l1.get(key).await? {
            return Ok(Some(value));
        }

        if let Some(value) = self.l2.get(key).await? {
            // Promote to L1 with a short TTL
            let _ = self.l1.put_with_ttl(key, &value, PROMOTE_TTL).await;
            return Ok(Some(value));
        }

        Ok(None)
    }

    async fn put(&self, key: &StoreKey, value: &CachedValue) -> Result<()> {
        self.l1.put(key, value).await?;
        self.l2.put(key, value).await?;
        Ok(())
    }

    async fn put_with_ttl(&self, key: &StoreKey, value: &CachedValue, ttl: Duration) -> Result<()> {
        self.l1.put_with_ttl(key, value, ttl).await?;
        self.l2.put_with_ttl(key, value, ttl).await?;
        Ok(())
    }

    async fn add_if_absent(
        &self,
        key: &StoreKey,
        value: &CachedValue,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        // L2 is the arbiter: it is the layer shared across restarts
        let inserted = self.l2.add_if_absent(key, value, ttl).await?;
        if inserted {
            match ttl {
                Some(ttl) => self.l1.put_with_ttl(key, value, ttl).await?,
                None => self.l1.put(key, value).await?,
            }
        }
        Ok(inserted)
    }

    async fn invalidate(&self, key: &StoreKey) -> Result<()> {
        self.l1.invalidate(key).await?;
        self.l2.invalidate(key).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.l1.clear().await?;
        self.l2.clear().await?;
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        // L2 holds the authoritative entry set; L1 contributes hit traffic
        let l1_stats = self.l1.stats().await?;
        let l2_stats = self.l2.stats().await?;
        Ok(CacheStats {
            entry_count: l2_stats.entry_count,
            hit_count: l1_stats.hit_count + l2_stats.hit_count,
            miss_count: l2_stats.miss_count,
        })
    }
}
