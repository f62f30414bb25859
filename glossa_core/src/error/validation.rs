//! Validation related error types

use thiserror::Error;

/// Input validation and configuration errors
#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    /// A language tag could not be parsed
    #[error("invalid language tag '{tag}': {reason}")]
    InvalidLanguageTag { tag: String, reason: String },

    /// The configuration is inconsistent or out of range
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl ValidationError {
    /// Create an invalid language tag error
    pub fn invalid_language_tag(tag: &str, reason: &str) -> Self {
        Self::InvalidLanguageTag {
            tag: tag.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_language_tag() {
        let error = ValidationError::invalid_language_tag("e!", "unexpected character");
        assert!(error.to_string().contains("e!"));
        assert!(error.to_string().contains("unexpected character"));
    }

    #[test]
    fn test_invalid_configuration() {
        let error = ValidationError::invalid_configuration("follower wait exceeds negative TTL");
        assert!(error.to_string().contains("follower wait"));
    }
}
