//! Glossa service layer
//!
//! This crate is the result cache and request-coalescing core that sits
//! between the app's request surface and the slow external capabilities
//! defined in `glossa_core::upstream`. It guarantees that identical
//! concurrent requests trigger at most one upstream call, that results
//! computed in one translation direction serve the reverse direction by
//! field-swapping, and that repeated failures against a flaky upstream are
//! throttled through short-lived negative markers.

pub mod cache;
pub mod coalesce;
pub mod config;
pub mod negative;
pub mod orchestrators;
pub mod paths;
pub mod pivot;
pub mod service;

// Re-export commonly used types
pub use cache::{CacheStats, CachedValue, StoreKey, traits::PayloadCache};
pub use coalesce::{Coalescer, CoalescerConfig};
pub use config::AppConfig;
pub use negative::NegativeCache;
pub use orchestrators::{TranslateOrchestrator, TranslateRequest};
pub use pivot::PivotIndex;
pub use service::{Collaborators, TranslationCacheService};
