//! Memory-based cache implementation
//!
//! This module provides an in-memory store with configurable size limits,
//! per-entry TTL, and LRU eviction. Used standalone in tests and as the L1
//! layer of the layered cache.

use crate::cache::traits::PayloadCache;
use crate::cache::{CacheStats, CachedValue, StoreKey};
use async_trait::async_trait;
use glossa_core::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;
use tokio::time::interval;

/// Configuration for the memory cache
#[derive(Debug, Clone)]
pub struct MemoryCacheConfig {
    /// Maximum number of entries to keep in cache
    pub max_entries: Option<usize>,
    /// Default TTL for entries inserted without an explicit one; `None`
    /// means entries live until evicted
    pub default_ttl: Option<Duration>,
    /// Interval for cleanup of expired entries
    pub cleanup_interval: Duration,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: Some(50_000),
            default_ttl: None,
            cleanup_interval: Duration::from_secs(300),
        }
    }
}

struct StoredEntry {
    value: CachedValue,
    last_accessed: SystemTime,
    expires_at: Option<SystemTime>,
}

impl StoredEntry {
    fn is_expired(&self, now: SystemTime) -> bool {
        self.expires_at.is_some_and(|at| now > at)
    }
}

/// Memory-based payload store
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<StoreKey, StoredEntry>>>,
    stats: Arc<RwLock<CacheStats>>,
    config: MemoryCacheConfig,
    shutdown: Arc<AtomicBool>,
}

impl MemoryCache {
    /// Create a new memory cache with default configuration
    pub fn new() -> Self {
        Self::with_config(MemoryCacheConfig::default())
    }

    /// Create a new memory cache with custom configuration
    pub fn with_config(config: MemoryCacheConfig) -> Self {
        let cache = Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(RwLock::new(CacheStats::default())),
            config: config.clone(),
            shutdown: Arc::new(AtomicBool::new(false)),
        };

        // Background cleanup of expired entries
        let entries = cache.entries.clone();
        let stats = cache.stats.clone();
        let shutdown = cache.shutdown.clone();
        let cleanup_interval = config.cleanup_interval;

        tokio::spawn(async move {
            let mut ticker = interval(cleanup_interval);
            loop {
                ticker.tick().await;
                if shutdown.load(Ordering::Relaxed) {
                    break;
                }

                let mut entries = entries.write().await;
                let mut stats = stats.write().await;
                let now = SystemTime::now();
                entries.retain(|_, entry| !entry.is_expired(now));
                stats.entry_count = entries.len();
            }
        });

        cache
    }

    /// Evict least-recently-accessed entries until under the size limit
    fn evict_if_needed(&self, entries: &mut HashMap<StoreKey, StoredEntry>) {
        let Some(max) = self.config.max_entries else {
            return;
        };
        while entries.len() >= max {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_accessed)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(key) => {
                    entries.remove(&key);
                }
                None => break,
            }
        }
    }

    async fn insert(&self, key: &StoreKey, value: &CachedValue, ttl: Option<Duration>) {
        let mut entries = self.entries.write().await;
        self.evict_if_needed(&mut entries);

        let now = SystemTime::now();
        entries.insert(
            key.clone(),
            StoredEntry {
                value: value.clone(),
                last_accessed: now,
                expires_at: ttl.map(|ttl| now + ttl),
            },
        );

        let mut stats = self.stats.write().await;
        stats.entry_count = entries.len();
    }
}

#[async_trait]
impl PayloadCache for MemoryCache {
    async fn get(&self, key: &StoreKey) -> Result<Option<CachedValue>> {
        let mut entries = self.entries.write().await;
        let mut stats = self.stats.write().await;
        let now = SystemTime::now();

        match entries.get_mut(key) {
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key);
                stats.entry_count = entries.len();
                stats.miss_count += 1;
                Ok(None)
            }
            Some(entry) => {
                entry.last_accessed = now;
                stats.hit_count += 1;
                Ok(Some(entry.value.clone()))
            }
            None => {
                stats.miss_count += 1;
                Ok(None)
            }
        }
    }

    async fn put(&self, key: &StoreKey, value: &CachedValue) -> Result<()> {
        self.insert(key, value, self.config.default_ttl).await;
        Ok(())
    }

    async fn put_with_ttl(&self, key: &StoreKey, value: &CachedValue, ttl: Duration) -> Result<()> {
        self.insert(key, value, Some(ttl)).await;
        Ok(())
    }

    async fn add_if_absent(
        &self,
        key: &StoreKey,
        value: &CachedValue,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        let mut entries = self.entries.write().await;
        let now = SystemTime::now();

        if let Some(existing) = entries.get(key)
            && !existing.is_expired(now)
        {
            return Ok(false);
        }

        self.evict_if_needed(&mut entries);
        entries.insert(
            key.clone(),
            StoredEntry {
                value: value.clone(),
                last_accessed: now,
                expires_at: ttl.or(self.config.default_ttl).map(|ttl| now + ttl),
            },
        );

        let mut stats = self.stats.write().await;
        stats.entry_count = entries.len();
        Ok(true)
    }

    async fn invalidate(&self, key: &StoreKey) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        let mut stats = self.stats.write().await;
        stats.entry_count = entries.len();
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.clear();
        let mut stats = self.stats.write().await;
        *stats = CacheStats::default();
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        let stats = self.stats.read().await;
        Ok(stats.clone())
    }
}

impl Drop for MemoryCache {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NegativeMarker;
    use glossa_core::keys;
    use glossa_core::language::LanguageTag;
    use glossa_core::upstream::Pronunciation;

    fn sample_key(text: &str) -> StoreKey {
        let source = LanguageTag::new("es").unwrap();
        let target = LanguageTag::new("en").unwrap();
        StoreKey::forward(&keys::derive_key(text, &source, &target, &[]))
    }

    fn sample_value() -> CachedValue {
        CachedValue::Pronunciation(Pronunciation {
            ipa: vec!["ˈpero".to_string()],
            romanization: vec![],
        })
    }

    #[tokio::test]
    async fn test_put_get_round_trip() {
        let cache = MemoryCache::new();
        let key = sample_key("perro");

        assert!(cache.get(&key).await.unwrap().is_none());
        cache.put(&key, &sample_value()).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(sample_value()));

        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.entry_count, 1);
        assert_eq!(stats.hit_count, 1);
        assert_eq!(stats.miss_count, 1);
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let cache = MemoryCache::new();
        let key = sample_key("gato");

        cache
            .put_with_ttl(&key, &sample_value(), Duration::from_millis(20))
            .await
            .unwrap();
        assert!(cache.get(&key).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_if_absent() {
        let cache = MemoryCache::new();
        let key = sample_key("casa");
        let marker = CachedValue::Negative(NegativeMarker::new(5, "down"));

        assert!(cache.add_if_absent(&key, &marker, None).await.unwrap());
        assert!(!cache.add_if_absent(&key, &marker, None).await.unwrap());
    }

    #[tokio::test]
    async fn test_add_if_absent_after_expiry() {
        let cache = MemoryCache::new();
        let key = sample_key("sol");
        let marker = CachedValue::Negative(NegativeMarker::new(1, "down"));

        assert!(
            cache
                .add_if_absent(&key, &marker, Some(Duration::from_millis(20)))
                .await
                .unwrap()
        );
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(
            cache
                .add_if_absent(&key, &marker, Some(Duration::from_millis(20)))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let cache = MemoryCache::with_config(MemoryCacheConfig {
            max_entries: Some(2),
            ..Default::default()
        });

        let first = sample_key("uno");
        let second = sample_key("dos");
        let third = sample_key("tres");

        cache.put(&first, &sample_value()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        cache.put(&second, &sample_value()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        // touch first so second becomes the LRU victim
        cache.get(&first).await.unwrap();
        cache.put(&third, &sample_value()).await.unwrap();

        assert!(cache.get(&first).await.unwrap().is_some());
        assert!(cache.get(&second).await.unwrap().is_none());
        assert!(cache.get(&third).await.unwrap().is_some());
    }
}
