//! Upstream service error types

use thiserror::Error;

/// Errors produced by the external translation and pronunciation services
#[derive(Error, Debug, Clone)]
pub enum UpstreamError {
    /// The service could not be reached or answered with a server error
    #[error("{service} unavailable: {message}")]
    Unavailable { service: String, message: String },

    /// The service rejected the request (client error or malformed response)
    #[error("{service} rejected request ({status}): {message}")]
    Rejected {
        service: String,
        status: u16,
        message: String,
    },
}

impl UpstreamError {
    /// Create an unavailable error for the named service
    pub fn unavailable(service: &str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            service: service.to_string(),
            message: message.into(),
        }
    }

    /// Create a rejected error for the named service
    pub fn rejected(service: &str, status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            service: service.to_string(),
            status,
            message: message.into(),
        }
    }

    /// Classify an HTTP status code into the matching variant. Client errors
    /// are permanent rejections except 429, which is a load condition.
    pub fn from_status(service: &str, status: u16, message: impl Into<String>) -> Self {
        if (400..500).contains(&status) && status != 429 {
            Self::rejected(service, status, message)
        } else {
            Self::unavailable(service, message)
        }
    }

    /// Check if this error is transient and can be retried
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Check if this error indicates a permanent failure
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// The name of the failing service
    pub fn service(&self) -> &str {
        match self {
            Self::Unavailable { service, .. } | Self::Rejected { service, .. } => service,
        }
    }
}
