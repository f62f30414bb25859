//! Error types for the Glossa core library
//!
//! This module contains all error types used throughout the library, organized
//! into logical categories for better maintainability and clarity.
//!
//! Every category derives `Clone`: the coalescing layer fans a single failure
//! out to every waiter of an in-flight computation, so errors must be
//! duplicable without losing information.

use thiserror::Error;

pub mod cache;
pub mod internal;
pub mod upstream;
pub mod validation;

pub use cache::CacheError;
pub use internal::InternalError;
pub use upstream::UpstreamError;
pub use validation::ValidationError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Glossa core library
///
/// Errors are categorized into four main types:
/// - Upstream errors: failures of the external translation/pronunciation services
/// - Cache errors: store failures and synthetic negative-cache hits
/// - Validation errors: input validation and configuration errors
/// - Internal errors: library internal errors (serialization, assertions)
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// External service related errors
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Cache store related errors
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Validation related errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Internal library errors
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl Error {
    /// Whether the underlying condition is worth retrying later
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Upstream(err) => err.is_transient(),
            Self::Cache(err) => err.is_negative_hit(),
            _ => false,
        }
    }
}

// Conversions from external error types

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(InternalError::serialization(err.to_string()))
    }
}
