//! Mock collaborator implementations

pub mod pronouncer;
pub mod translator;

pub use pronouncer::MockPronouncer;
pub use translator::MockTranslator;

use async_trait::async_trait;
use glossa_core::error::Result;
use glossa_core::language::LanguageTag;
use glossa_core::upstream::{Detector, Recognizer, Segmenter, SeedKind, SentenceSource};

/// Detector that always reports the same language
pub struct StaticDetector {
    tag: LanguageTag,
}

impl StaticDetector {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: LanguageTag::new(tag).expect("valid static detector tag"),
        }
    }
}

impl Detector for StaticDetector {
    fn detect_language(&self, _text: &str) -> LanguageTag {
        self.tag.clone()
    }
}

/// Segmenter that puts a space between every character for the configured
/// languages (a stand-in for CJK word segmentation) and passes everything
/// else through unchanged
pub struct SpacingSegmenter {
    languages: Vec<String>,
}

impl SpacingSegmenter {
    pub fn for_languages(languages: &[&str]) -> Self {
        Self {
            languages: languages.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Segmenter for SpacingSegmenter {
    fn insert_word_breaks(&self, text: &str, language: &LanguageTag) -> String {
        if !self.languages.iter().any(|l| l == language.primary()) {
            return text.to_string();
        }
        let chars: Vec<String> = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_string())
            .collect();
        chars.join(" ")
    }
}

/// Sentence source that always yields the same seed text
pub struct StaticSentenceSource {
    text: String,
}

impl StaticSentenceSource {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

#[async_trait]
impl SentenceSource for StaticSentenceSource {
    async fn next_text(&self, _kind: &SeedKind) -> Result<String> {
        Ok(self.text.clone())
    }
}

/// Recognizer that ignores the image and returns fixed text
pub struct StaticRecognizer {
    text: String,
}

impl StaticRecognizer {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

#[async_trait]
impl Recognizer for StaticRecognizer {
    async fn recognize_text(&self, _image: &[u8]) -> Result<String> {
        Ok(self.text.clone())
    }
}
