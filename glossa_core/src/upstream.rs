//! Collaborator contracts for the external capabilities
//!
//! The cache and coalescing core never implements translation, pronunciation,
//! OCR, segmentation or detection itself; it reaches them through the traits
//! defined here. Provided implementations cover the pieces the pack already
//! has good tooling for: an HTTP machine-translation client with retries and
//! a whatlang-backed detector. Everything else is supplied by the embedding
//! application (or by `glossa-test-utils` in tests).

use crate::error::Result;
use crate::language::LanguageTag;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod detector;
pub mod http;
pub mod retry;

pub use detector::WhatlangDetector;
pub use http::{HttpTranslator, HttpTranslatorConfig};
pub use retry::RetryPolicy;

/// Result of one translation call
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub translated_text: String,
    /// Language the engine detected, when the request asked for detection
    pub detected_language: Option<LanguageTag>,
}

/// Phonetic transcription for one (text, language) pair.
///
/// Either list may be empty: an unsupported script is a valid empty result,
/// not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pronunciation {
    pub ipa: Vec<String>,
    pub romanization: Vec<String>,
}

impl Pronunciation {
    pub fn is_empty(&self) -> bool {
        self.ipa.is_empty() && self.romanization.is_empty()
    }
}

/// Kind of seed text requested from the content generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedKind {
    /// A full beginner-level sentence
    Sentence,
    /// A single word, optionally restricted to a category
    Word { category: Option<String> },
}

/// Machine translation engine
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source` to `target`. `source` may be `auto`,
    /// in which case the engine reports the detected language.
    async fn translate(
        &self,
        text: &str,
        source: &LanguageTag,
        target: &LanguageTag,
    ) -> Result<Translation>;
}

/// Phonetic transcription engine
#[async_trait]
pub trait Pronouncer: Send + Sync {
    /// Produce IPA and romanization token lists for `text` in `language`.
    /// Unsupported language/script combinations return empty lists.
    async fn pronounce(&self, text: &str, language: &LanguageTag) -> Result<Pronunciation>;
}

/// Script-specific display segmentation. Best-effort: implementations return
/// the input unchanged when they cannot segment.
pub trait Segmenter: Send + Sync {
    fn insert_word_breaks(&self, text: &str, language: &LanguageTag) -> String;
}

/// Language auto-detection. Infallible: implementations return a safe default
/// when confidence is low.
pub trait Detector: Send + Sync {
    fn detect_language(&self, text: &str) -> LanguageTag;
}

/// Source of generated practice text in the neutral language
#[async_trait]
pub trait SentenceSource: Send + Sync {
    async fn next_text(&self, kind: &SeedKind) -> Result<String>;
}

/// OCR engine: extracts text from an encoded image
#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize_text(&self, image: &[u8]) -> Result<String>;
}

/// Segmenter that returns its input unchanged. The default for languages
/// whose scripts already carry word boundaries.
pub struct IdentitySegmenter;

impl Segmenter for IdentitySegmenter {
    fn insert_word_breaks(&self, text: &str, _language: &LanguageTag) -> String {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_segmenter_passes_through() {
        let segmenter = IdentitySegmenter;
        let tag = LanguageTag::new("ja").unwrap();
        assert_eq!(segmenter.insert_word_breaks("こんにちは", &tag), "こんにちは");
    }

    #[test]
    fn test_empty_pronunciation() {
        assert!(Pronunciation::default().is_empty());
        let pron = Pronunciation {
            ipa: vec!["həˈloʊ".to_string()],
            romanization: vec![],
        };
        assert!(!pron.is_empty());
    }
}
