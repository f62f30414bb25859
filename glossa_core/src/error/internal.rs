//! Internal library error types

use thiserror::Error;

/// Internal library errors
#[derive(Error, Debug, Clone)]
pub enum InternalError {
    /// A persisted value could not be serialized or deserialized
    #[error("serialization failed: {message}")]
    Serialization { message: String },

    /// Internal assertion failure
    #[error("internal assertion failed: {message}")]
    Assertion { message: String },
}

impl InternalError {
    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create an internal assertion failure error
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_error() {
        let error = InternalError::serialization("unexpected token");
        assert!(error.to_string().contains("unexpected token"));
    }

    #[test]
    fn test_assertion_error() {
        let error = InternalError::assertion("value kind mismatch");
        assert!(error.to_string().contains("value kind mismatch"));
    }
}
