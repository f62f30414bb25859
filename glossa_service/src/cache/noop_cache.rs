//! No-operation cache implementation
//!
//! This module provides a store implementation that doesn't store anything,
//! useful for testing or when caching is disabled.

use crate::cache::traits::PayloadCache;
use crate::cache::{CacheStats, CachedValue, StoreKey};
use async_trait::async_trait;
use glossa_core::error::Result;
use std::time::Duration;

/// A store implementation that doesn't cache anything
///
/// Every lookup misses and every write is discarded, which also disables
/// negative caching: with nothing persisted there is nothing to throttle on.
pub struct NoOpCache;

impl NoOpCache {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PayloadCache for NoOpCache {
    async fn get(&self, _key: &StoreKey) -> Result<Option<CachedValue>> {
        Ok(None)
    }

    async fn put(&self, _key: &StoreKey, _value: &CachedValue) -> Result<()> {
        Ok(())
    }

    async fn put_with_ttl(
        &self,
        _key: &StoreKey,
        _value: &CachedValue,
        _ttl: Duration,
    ) -> Result<()> {
        Ok(())
    }

    async fn add_if_absent(
        &self,
        _key: &StoreKey,
        _value: &CachedValue,
        _ttl: Option<Duration>,
    ) -> Result<bool> {
        // Report inserted so callers behave as if the write landed
        Ok(true)
    }

    async fn invalidate(&self, _key: &StoreKey) -> Result<()> {
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        Ok(CacheStats::default())
    }
}
