//! Assembled translation payloads
//!
//! A payload represents one completed (or partially completed) translation
//! round: the display texts for both sides, the language pair, and the
//! phonetic token lists. Completeness is an explicit flag; callers never
//! infer it from which fields happen to be present.

use crate::error::Error;
use crate::language::LanguageTag;
use crate::upstream::Pronunciation;
use serde::{Deserialize, Serialize};

/// Whether a payload carries all four pronunciation token lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completeness {
    /// Translation and all pronunciation fields are populated
    Complete,
    /// Translation is known but pronunciation fields are missing; callers
    /// should trigger enrichment rather than serve this silently
    Partial,
}

/// One translation round, as cached and as returned to callers.
///
/// Field names serialize in camelCase; this is the shape the app's clients
/// consume and the shape persisted in the forward keyspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationPayload {
    pub original_text: String,
    pub translated_text: Option<String>,
    pub detected_language: LanguageTag,
    pub target: LanguageTag,
    pub original_ipa: Option<Vec<String>>,
    pub translated_ipa: Option<Vec<String>>,
    pub original_romanization: Option<Vec<String>>,
    pub translated_romanization: Option<Vec<String>>,
    pub completeness: Completeness,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranslationPayload {
    /// Build a complete payload from both display texts and both
    /// pronunciations. Empty token lists are valid (unsupported scripts).
    pub fn complete(
        original_text: String,
        translated_text: String,
        detected_language: LanguageTag,
        target: LanguageTag,
        original_pronunciation: Pronunciation,
        translated_pronunciation: Pronunciation,
    ) -> Self {
        Self {
            original_text,
            translated_text: Some(translated_text),
            detected_language,
            target,
            original_ipa: Some(original_pronunciation.ipa),
            translated_ipa: Some(translated_pronunciation.ipa),
            original_romanization: Some(original_pronunciation.romanization),
            translated_romanization: Some(translated_pronunciation.romanization),
            completeness: Completeness::Complete,
            error: None,
        }
    }

    /// Build a partial payload: translation known, pronunciation pending.
    pub fn partial(
        original_text: String,
        translated_text: String,
        detected_language: LanguageTag,
        target: LanguageTag,
    ) -> Self {
        Self {
            original_text,
            translated_text: Some(translated_text),
            detected_language,
            target,
            original_ipa: None,
            translated_ipa: None,
            original_romanization: None,
            translated_romanization: None,
            completeness: Completeness::Partial,
            error: None,
        }
    }

    /// Build the payload for an empty input: both sides empty, trivially
    /// complete, no upstream touched.
    pub fn empty(detected_language: LanguageTag, target: LanguageTag) -> Self {
        Self::complete(
            String::new(),
            String::new(),
            detected_language,
            target,
            Pronunciation::default(),
            Pronunciation::default(),
        )
    }

    /// Build the error payload surfaced to callers on upstream failure: the
    /// original text is echoed back, everything else is null.
    pub fn failure(
        original_text: String,
        detected_language: LanguageTag,
        target: LanguageTag,
        error: &Error,
    ) -> Self {
        Self {
            original_text,
            translated_text: None,
            detected_language,
            target,
            original_ipa: None,
            translated_ipa: None,
            original_romanization: None,
            translated_romanization: None,
            completeness: Completeness::Partial,
            error: Some(error.to_string()),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completeness == Completeness::Complete
    }

    /// Produce the reverse-direction payload by exchanging the original and
    /// translated fields. Returns `None` when there is no translated text to
    /// swap onto the original side.
    pub fn swapped(&self) -> Option<Self> {
        let translated_text = self.translated_text.clone()?;
        Some(Self {
            original_text: translated_text,
            translated_text: Some(self.original_text.clone()),
            detected_language: self.target.clone(),
            target: self.detected_language.clone(),
            original_ipa: self.translated_ipa.clone(),
            translated_ipa: self.original_ipa.clone(),
            original_romanization: self.translated_romanization.clone(),
            translated_romanization: self.original_romanization.clone(),
            completeness: self.completeness,
            error: None,
        })
    }
}
