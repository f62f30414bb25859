//! Negative caching of recent upstream failures
//!
//! A burst of identical requests against a failing upstream should produce
//! one real failure and many fast ones. The marker lives in the `MISS:`
//! keyspace of the shared store with a short TTL; the store's expiry makes
//! the throttle lift on its own once the window passes.

use crate::cache::traits::PayloadCache;
use crate::cache::{CachedValue, NegativeMarker, StoreKey};
use glossa_core::error::Result;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

/// Short-TTL failure markers keyed by the computation they guard
pub struct NegativeCache {
    store: Arc<dyn PayloadCache>,
    ttl: Duration,
}

impl NegativeCache {
    pub fn new(store: Arc<dyn PayloadCache>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Record that the computation guarded by `key` just failed upstream.
    ///
    /// Uses add-if-absent so the throttle window starts at the first failure
    /// and is not extended by pile-on failures. Store errors are logged and
    /// swallowed: failing to mark must not mask the original upstream error.
    pub async fn mark_failure(&self, key: &StoreKey, reason: &str) {
        let marker = NegativeMarker::new(self.ttl.as_secs(), reason);
        let negative_key = StoreKey::negative(key);
        match self
            .store
            .add_if_absent(&negative_key, &CachedValue::Negative(marker), Some(self.ttl))
            .await
        {
            Ok(true) => debug!("negative marker set for {key}: {reason}"),
            Ok(false) => {}
            Err(e) => warn!("failed to set negative marker for {key}: {e}"),
        }
    }

    /// The live failure marker for `key`, if any
    pub async fn recent_failure(&self, key: &StoreKey) -> Result<Option<NegativeMarker>> {
        let negative_key = StoreKey::negative(key);
        Ok(self
            .store
            .get(&negative_key)
            .await?
            .and_then(CachedValue::into_negative))
    }

    /// Whether `key` failed upstream within the TTL window
    pub async fn has_recent_failure(&self, key: &StoreKey) -> Result<bool> {
        Ok(self.recent_failure(key).await?.is_some())
    }
}
