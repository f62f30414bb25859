//! Payload caching for the translation pipeline
//!
//! One persistent store holds every cached artifact under a single namespace,
//! partitioned by string prefix: `th:` forward translation entries, `rev:`
//! pivot pointers, `pron:` pronunciation entries, `MISS:` negative markers.
//! Values are serialized as a tagged enum so a reader can never misinterpret
//! one record shape as another.

use glossa_core::keys::CacheKey;
use glossa_core::payload::TranslationPayload;
use glossa_core::upstream::Pronunciation;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

pub mod factory;
pub mod memory_cache;
pub mod noop_cache;
pub mod sqlite_cache;
pub mod traits;

/// Keyspace prefix for forward translation entries
pub const FORWARD_PREFIX: &str = "th:";
/// Keyspace prefix for reverse-direction pivot pointers
pub const PIVOT_PREFIX: &str = "rev:";
/// Keyspace prefix for pronunciation entries
pub const PRONUNCIATION_PREFIX: &str = "pron:";
/// Keyspace prefix for negative (recent failure) markers
pub const NEGATIVE_PREFIX: &str = "MISS:";

/// A fully-rendered store key: keyspace prefix plus hex cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreKey(String);

impl StoreKey {
    pub fn forward(key: &CacheKey) -> Self {
        Self(format!("{FORWARD_PREFIX}{key}"))
    }

    pub fn pivot(key: &CacheKey) -> Self {
        Self(format!("{PIVOT_PREFIX}{key}"))
    }

    pub fn pronunciation(key: &CacheKey) -> Self {
        Self(format!("{PRONUNCIATION_PREFIX}{key}"))
    }

    /// Negative marker key guarding the given computation key
    pub fn negative(guarded: &StoreKey) -> Self {
        Self(format!("{NEGATIVE_PREFIX}{}", guarded.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reverse-direction pointer: lets a B→A lookup reuse the A→B entry by
/// field-swapping instead of recomputation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotPointer {
    /// Store key (hex form) of the forward entry in the reverse direction
    pub reverse_key: CacheKey,
    /// The literal translated text in that reverse direction
    pub reverse_translated_text: String,
}

/// Marker recording that this exact request recently failed upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegativeMarker {
    /// Unix timestamp (seconds) of the failure
    pub recorded_at: u64,
    pub ttl_secs: u64,
    pub reason: String,
}

impl NegativeMarker {
    pub fn new(ttl_secs: u64, reason: impl Into<String>) -> Self {
        Self {
            recorded_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            ttl_secs,
            reason: reason.into(),
        }
    }
}

/// Any record persisted in the store, tagged by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CachedValue {
    Translation(TranslationPayload),
    Pronunciation(Pronunciation),
    Pivot(PivotPointer),
    Negative(NegativeMarker),
}

impl CachedValue {
    pub fn as_translation(&self) -> Option<&TranslationPayload> {
        match self {
            Self::Translation(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn into_translation(self) -> Option<TranslationPayload> {
        match self {
            Self::Translation(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn into_pronunciation(self) -> Option<Pronunciation> {
        match self {
            Self::Pronunciation(pron) => Some(pron),
            _ => None,
        }
    }

    pub fn into_pivot(self) -> Option<PivotPointer> {
        match self {
            Self::Pivot(pointer) => Some(pointer),
            _ => None,
        }
    }

    pub fn into_negative(self) -> Option<NegativeMarker> {
        match self {
            Self::Negative(marker) => Some(marker),
            _ => None,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub entry_count: usize,
    pub hit_count: u64,
    pub miss_count: u64,
}
