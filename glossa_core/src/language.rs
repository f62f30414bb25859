//! Language tag handling
//!
//! Language tags are short lower-case identifiers (`en`, `es`, `zh-hans`).
//! The special tag `auto` requests detection; pipelines resolve it to a
//! concrete tag before any key is derived.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default language produced by the content generator and used as a safe
/// fallback when detection is unreliable.
pub const DEFAULT_NEUTRAL: &str = "en";

/// A normalized language tag (trimmed, lower-cased).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Parse and normalize a language tag. Accepts letters, digits and `-`.
    pub fn new(tag: &str) -> Result<Self, ValidationError> {
        let normalized = tag.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::invalid_language_tag(tag, "empty tag"));
        }
        if !normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(ValidationError::invalid_language_tag(
                tag,
                "unexpected character",
            ));
        }
        Ok(Self(normalized))
    }

    /// The `auto` tag requesting language detection.
    pub fn auto() -> Self {
        Self("auto".to_string())
    }

    /// The default neutral language.
    pub fn neutral_default() -> Self {
        Self(DEFAULT_NEUTRAL.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_auto(&self) -> bool {
        self.0 == "auto"
    }

    /// Primary subtag, before any `-` (e.g. `zh` for `zh-hans`).
    pub fn primary(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_is_normalized() {
        let tag = LanguageTag::new("  EN ").unwrap();
        assert_eq!(tag.as_str(), "en");
    }

    #[test]
    fn test_invalid_tags_rejected() {
        assert!(LanguageTag::new("").is_err());
        assert!(LanguageTag::new("e n").is_err());
        assert!(LanguageTag::new("en_us").is_err());
    }

    #[test]
    fn test_auto_detection_tag() {
        assert!(LanguageTag::auto().is_auto());
        assert!(!LanguageTag::new("en").unwrap().is_auto());
    }

    #[test]
    fn test_primary_subtag() {
        assert_eq!(LanguageTag::new("zh-Hans").unwrap().primary(), "zh");
        assert_eq!(LanguageTag::new("ko").unwrap().primary(), "ko");
    }
}
