//! Cache trait definitions
//!
//! This module defines the core PayloadCache trait that all store
//! implementations must implement.

use crate::cache::{CacheStats, CachedValue, StoreKey};
use async_trait::async_trait;
use glossa_core::error::Result;
use std::time::Duration;

/// Trait for payload store implementations
///
/// Implementations must be internally safe for concurrent access; get/set are
/// atomic per key, which makes `add_if_absent` usable for leader election
/// across process restarts.
#[async_trait]
pub trait PayloadCache: Send + Sync {
    /// Get a value from the store
    ///
    /// Returns `Ok(Some(value))` if the entry exists and is not expired,
    /// `Ok(None)` if the entry doesn't exist or has expired. A missing key is
    /// never an error.
    async fn get(&self, key: &StoreKey) -> Result<Option<CachedValue>>;

    /// Store a value without expiry (evicted only by the store's own
    /// capacity policy)
    async fn put(&self, key: &StoreKey, value: &CachedValue) -> Result<()>;

    /// Store a value that expires after `ttl`
    async fn put_with_ttl(&self, key: &StoreKey, value: &CachedValue, ttl: Duration) -> Result<()>;

    /// Insert only if no live entry exists for the key
    ///
    /// Returns `true` if this call inserted the value, `false` if another
    /// value was already present. An expired entry counts as absent.
    async fn add_if_absent(
        &self,
        key: &StoreKey,
        value: &CachedValue,
        ttl: Option<Duration>,
    ) -> Result<bool>;

    /// Remove a specific entry if it exists
    async fn invalidate(&self, key: &StoreKey) -> Result<()>;

    /// Remove all entries
    async fn clear(&self) -> Result<()>;

    /// Get statistics about store usage
    async fn stats(&self) -> Result<CacheStats>;
}
