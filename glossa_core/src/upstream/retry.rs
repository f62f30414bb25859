//! Retry policy for upstream HTTP calls
//!
//! Expressed as a value object so the embedding application can tune attempt
//! counts and backoff without touching the client code.

use rand::Rng;
use std::time::Duration;

/// Configurable retry behavior: attempt budget, jittered exponential backoff,
/// and the predicate deciding which HTTP statuses are worth retrying.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Backoff before the second attempt; doubles per attempt after that
    pub base_backoff: Duration,
    /// Upper bound on any single backoff
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Whether another attempt is allowed after `attempt` failures
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts
    }

    /// Statuses that indicate a transient condition
    pub fn is_retryable_status(&self, status: u16) -> bool {
        matches!(status, 429 | 500 | 502 | 503 | 504)
    }

    /// Backoff before retry number `attempt` (0-based), with up to 50%
    /// additive jitter to spread out synchronized retry storms.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = self.base_backoff.saturating_mul(1u32 << attempt.min(16));
        let capped = exp.min(self.max_backoff);
        let jitter_ms = capped.as_millis() as u64 / 2;
        if jitter_ms == 0 {
            return capped;
        }
        capped + Duration::from_millis(rand::rng().random_range(0..=jitter_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_budget() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(0));
        assert!(policy.should_retry(1));
        assert!(!policy.should_retry(2));
    }

    #[test]
    fn test_retryable_statuses() {
        let policy = RetryPolicy::default();
        assert!(policy.is_retryable_status(429));
        assert!(policy.is_retryable_status(503));
        assert!(!policy.is_retryable_status(400));
        assert!(!policy.is_retryable_status(404));
    }

    #[test]
    fn test_backoff_grows_and_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(400),
        };
        // jitter adds at most 50%, so bounds are deterministic
        assert!(policy.backoff(0) >= Duration::from_millis(100));
        assert!(policy.backoff(0) <= Duration::from_millis(150));
        assert!(policy.backoff(10) <= Duration::from_millis(600));
    }
}
