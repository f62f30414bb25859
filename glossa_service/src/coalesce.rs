//! Request coalescing: single-flight execution of expensive upstream work
//!
//! For a given store key, the first caller becomes the leader: it registers
//! an in-flight ticket, runs the computation under the bounded worker pool,
//! broadcasts the outcome to every waiter, and removes the ticket. Callers
//! arriving while the ticket exists become followers and wait on it with a
//! bounded timeout; on timeout they probe the store (the leader persists
//! before finishing) and, if nothing landed, evict the stale ticket and take
//! over leadership themselves. A hung or crashed leader therefore delays
//! followers by at most one wait window — it can never deadlock them.
//!
//! The in-flight registry is the only shared mutable state; it is a sharded
//! concurrent map whose guards are never held across an await.

use crate::cache::traits::PayloadCache;
use crate::cache::{CachedValue, StoreKey};
use crate::negative::NegativeCache;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use glossa_core::error::{CacheError, Error, InternalError, Result};
use log::{debug, trace, warn};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Semaphore, watch};
use tokio::time::timeout;

type FlightResult = Result<CachedValue>;

/// In-flight ticket: the id disambiguates waves, so a follower that timed out
/// on wave N never evicts a healthy wave N+1 ticket.
struct Flight {
    id: u64,
    rx: watch::Receiver<Option<FlightResult>>,
}

/// Configuration for the coalescer
#[derive(Debug, Clone)]
pub struct CoalescerConfig {
    /// How long a follower waits on an in-flight ticket before probing the
    /// store and escalating. Must not exceed the negative-cache TTL.
    pub follower_wait: Duration,
    /// Worker-pool size as a multiple of available CPU parallelism
    pub worker_multiplier: usize,
}

impl Default for CoalescerConfig {
    fn default() -> Self {
        Self {
            follower_wait: Duration::from_millis(4000),
            worker_multiplier: 2,
        }
    }
}

/// Single-flight executor for coalescer-guarded upstream work
pub struct Coalescer {
    store: Arc<dyn PayloadCache>,
    negative: Arc<NegativeCache>,
    inflight: DashMap<StoreKey, Flight>,
    permits: Semaphore,
    follower_wait: Duration,
    next_ticket: AtomicU64,
}

impl Coalescer {
    pub fn new(
        store: Arc<dyn PayloadCache>,
        negative: Arc<NegativeCache>,
        config: CoalescerConfig,
    ) -> Self {
        let parallelism = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        let pool_size = parallelism * config.worker_multiplier.max(1);

        Self {
            store,
            negative,
            inflight: DashMap::new(),
            permits: Semaphore::new(pool_size),
            follower_wait: config.follower_wait,
            next_ticket: AtomicU64::new(1),
        }
    }

    /// Number of computations currently in flight (diagnostics)
    pub fn in_flight(&self) -> usize {
        self.inflight.len()
    }

    /// Execute `compute` for `key` with single-flight semantics.
    ///
    /// `compute` must persist its own result under `key` before returning so
    /// that a timed-out follower's store probe can observe it. On upstream
    /// failure the leader records a negative marker before the error reaches
    /// any caller.
    pub async fn run<F, Fut>(&self, key: &StoreKey, compute: F) -> FlightResult
    where
        F: Fn() -> Fut,
        Fut: Future<Output = FlightResult>,
    {
        loop {
            // Known-bad request: fail fast without touching the upstream
            if let Some(marker) = self.negative.recent_failure(key).await? {
                debug!("negative cache hit for {key}");
                return Err(CacheError::negative_hit(marker.reason, marker.ttl_secs).into());
            }

            // Join an existing flight as a follower
            let joined = self
                .inflight
                .get(key)
                .map(|flight| (flight.id, flight.rx.clone()));
            if let Some((ticket_id, mut rx)) = joined {
                trace!("following in-flight computation for {key}");
                match timeout(self.follower_wait, rx.wait_for(|v| v.is_some())).await {
                    Ok(Ok(outcome)) => {
                        return (*outcome).clone().unwrap_or_else(|| {
                            Err(InternalError::assertion("empty flight outcome").into())
                        });
                    }
                    Ok(Err(_closed)) => {
                        // Leader dropped without broadcasting
                        trace!("leader vanished for {key}");
                    }
                    Err(_elapsed) => {
                        warn!("follower timed out waiting on {key}");
                    }
                }

                // The leader may have persisted before stalling
                if let Some(value) = self.store.get(key).await? {
                    return Ok(value);
                }

                // Evict the stale ticket (only this wave's) and escalate
                self.inflight.remove_if(key, |_, flight| flight.id == ticket_id);
                continue;
            }

            // Try to register as leader
            let ticket_id = self.next_ticket.fetch_add(1, Ordering::Relaxed);
            let (tx, rx) = watch::channel(None);
            match self.inflight.entry(key.clone()) {
                Entry::Occupied(_) => {
                    // Lost the race; loop around and follow
                    continue;
                }
                Entry::Vacant(slot) => {
                    slot.insert(Flight { id: ticket_id, rx });
                }
            }

            debug!("leading computation for {key}");
            let result = {
                let _permit = self.permits.acquire().await.map_err(|_| {
                    Error::from(InternalError::assertion("worker pool closed"))
                })?;
                compute().await
            };

            if let Err(error) = &result
                && matches!(error, Error::Upstream(_))
            {
                self.negative.mark_failure(key, &error.to_string()).await;
            }

            let _ = tx.send(Some(result.clone()));
            self.inflight.remove_if(key, |_, flight| flight.id == ticket_id);
            return result;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::memory_cache::MemoryCache;
    use glossa_core::error::UpstreamError;
    use glossa_core::keys;
    use glossa_core::language::LanguageTag;
    use glossa_core::upstream::Pronunciation;
    use std::sync::atomic::AtomicUsize;

    fn fixture() -> (Arc<dyn PayloadCache>, Arc<NegativeCache>, StoreKey) {
        let store: Arc<dyn PayloadCache> = Arc::new(MemoryCache::new());
        let negative = Arc::new(NegativeCache::new(store.clone(), Duration::from_secs(5)));
        let source = LanguageTag::new("es").unwrap();
        let target = LanguageTag::new("en").unwrap();
        let key = StoreKey::forward(&keys::derive_key("perro", &source, &target, &[]));
        (store, negative, key)
    }

    fn value() -> CachedValue {
        CachedValue::Pronunciation(Pronunciation {
            ipa: vec!["ˈpero".to_string()],
            romanization: vec![],
        })
    }

    #[tokio::test]
    async fn test_leader_executes_and_returns() {
        let (store, negative, key) = fixture();
        let coalescer = Coalescer::new(store, negative, CoalescerConfig::default());
        let calls = AtomicUsize::new(0);

        let result = coalescer
            .run(&key, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(value()) }
            })
            .await
            .unwrap();

        assert_eq!(result, value());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(coalescer.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_marks_negative() {
        let (store, negative, key) = fixture();
        let coalescer = Coalescer::new(store, negative.clone(), CoalescerConfig::default());

        let outcome = coalescer
            .run(&key, || async {
                Err(UpstreamError::unavailable("translator", "boom").into())
            })
            .await;
        assert!(matches!(outcome, Err(Error::Upstream(_))));
        assert!(negative.has_recent_failure(&key).await.unwrap());

        // Second call fails fast without invoking compute
        let calls = AtomicUsize::new(0);
        let outcome = coalescer
            .run(&key, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(value()) }
            })
            .await;
        assert!(matches!(
            outcome,
            Err(Error::Cache(CacheError::NegativeCacheHit { .. }))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_not_marked_negative() {
        let (store, negative, key) = fixture();
        let coalescer = Coalescer::new(store, negative.clone(), CoalescerConfig::default());

        let outcome = coalescer
            .run(&key, || async { Err(CacheError::store("disk full").into()) })
            .await;
        assert!(outcome.is_err());
        assert!(!negative.has_recent_failure(&key).await.unwrap());
    }
}
