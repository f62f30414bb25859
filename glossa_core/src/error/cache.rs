//! Cache related error types

use thiserror::Error;

/// Errors surfaced by the cache layer
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// The exact request failed upstream recently; callers should not retry
    /// until the throttle window has passed
    #[error("request throttled for up to {retry_after_secs}s after recent upstream failure: {reason}")]
    NegativeCacheHit {
        reason: String,
        retry_after_secs: u64,
    },

    /// The backing store failed
    #[error("cache store error: {message}")]
    Store { message: String },
}

impl CacheError {
    /// Create a synthetic fast-fail error for a negatively cached request
    pub fn negative_hit(reason: impl Into<String>, retry_after_secs: u64) -> Self {
        Self::NegativeCacheHit {
            reason: reason.into(),
            retry_after_secs,
        }
    }

    /// Create a store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Check whether this is a synthetic negative-cache fast-fail
    pub fn is_negative_hit(&self) -> bool {
        matches!(self, Self::NegativeCacheHit { .. })
    }
}
