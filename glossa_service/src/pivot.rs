//! Reverse-direction pivot index
//!
//! After a successful A→B translation of text X yielding Y, a pointer is
//! recorded under the key of the hypothetical B→A request for Y. A later B→A
//! lookup then loads the stored A→B entry and answers by field-swapping it —
//! no translator or pronunciation call. A lookup miss simply means "compute
//! normally".

use crate::cache::traits::PayloadCache;
use crate::cache::{CachedValue, PivotPointer, StoreKey};
use glossa_core::error::Result;
use glossa_core::keys::{self, CacheKey};
use glossa_core::language::LanguageTag;
use log::debug;
use std::sync::Arc;

/// Index of reverse-direction pointers in the `rev:` keyspace
pub struct PivotIndex {
    store: Arc<dyn PayloadCache>,
}

impl PivotIndex {
    pub fn new(store: Arc<dyn PayloadCache>) -> Self {
        Self { store }
    }

    /// Record that a request for `display_text` from `source` to `target`
    /// can be served by swapping the entry stored under `reverse_key`.
    pub async fn record(
        &self,
        display_text: &str,
        source: &LanguageTag,
        target: &LanguageTag,
        reverse_key: CacheKey,
        reverse_translated_text: String,
    ) -> Result<()> {
        let key = StoreKey::pivot(&keys::derive_key(display_text, source, target, &[]));
        let pointer = PivotPointer {
            reverse_key,
            reverse_translated_text,
        };
        debug!("recording pivot {key} -> th:{}", pointer.reverse_key);
        self.store.put(&key, &CachedValue::Pivot(pointer)).await
    }

    /// Look up a pointer for a `(display_text, source, target)` request
    pub async fn lookup(
        &self,
        display_text: &str,
        source: &LanguageTag,
        target: &LanguageTag,
    ) -> Result<Option<PivotPointer>> {
        let key = StoreKey::pivot(&keys::derive_key(display_text, source, target, &[]));
        Ok(self
            .store
            .get(&key)
            .await?
            .and_then(CachedValue::into_pivot))
    }
}
