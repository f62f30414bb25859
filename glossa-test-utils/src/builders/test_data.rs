//! Builders for cache payloads used across integration tests

use glossa_core::language::LanguageTag;
use glossa_core::payload::TranslationPayload;
use glossa_core::upstream::Pronunciation;

/// Parse a language tag, panicking on invalid test input
pub fn tag(s: &str) -> LanguageTag {
    LanguageTag::new(s).expect("valid test language tag")
}

/// A pronunciation with one IPA and one romanization token per word,
/// matching what [`crate::MockPronouncer`] produces
pub fn mock_pronunciation(text: &str) -> Pronunciation {
    let words: Vec<&str> = text.split_whitespace().collect();
    Pronunciation {
        ipa: words.iter().map(|w| format!("ˈ{w}")).collect(),
        romanization: words.iter().map(|w| format!("{w}-r")).collect(),
    }
}

/// A complete payload with mock pronunciations on both sides
pub fn complete_payload(
    original: &str,
    translated: &str,
    source: &str,
    target: &str,
) -> TranslationPayload {
    TranslationPayload::complete(
        original.to_string(),
        translated.to_string(),
        tag(source),
        tag(target),
        mock_pronunciation(original),
        mock_pronunciation(translated),
    )
}

/// A partial payload: translation known, pronunciation fields missing
pub fn partial_payload(
    original: &str,
    translated: &str,
    source: &str,
    target: &str,
) -> TranslationPayload {
    TranslationPayload::partial(
        original.to_string(),
        translated.to_string(),
        tag(source),
        tag(target),
    )
}
