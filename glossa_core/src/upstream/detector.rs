//! Whatlang-backed language detection
//!
//! Detection is best-effort by contract: when whatlang is not confident, the
//! detector falls back to the configured default rather than failing.

use crate::language::LanguageTag;
use crate::upstream::Detector;
use log::trace;

/// Default [`Detector`] built on whatlang
pub struct WhatlangDetector {
    fallback: LanguageTag,
}

impl WhatlangDetector {
    pub fn new(fallback: LanguageTag) -> Self {
        Self { fallback }
    }
}

impl Default for WhatlangDetector {
    fn default() -> Self {
        Self::new(LanguageTag::neutral_default())
    }
}

impl Detector for WhatlangDetector {
    fn detect_language(&self, text: &str) -> LanguageTag {
        let Some(info) = whatlang::detect(text) else {
            return self.fallback.clone();
        };
        if !info.is_reliable() {
            trace!("unreliable detection for {} chars, using fallback", text.len());
            return self.fallback.clone();
        }
        match lang_to_code(info.lang()) {
            Some(code) => LanguageTag::new(code).unwrap_or_else(|_| self.fallback.clone()),
            None => self.fallback.clone(),
        }
    }
}

/// Map whatlang's language enum onto the ISO 639-1 codes the translation
/// service understands. Languages outside this set fall back.
fn lang_to_code(lang: whatlang::Lang) -> Option<&'static str> {
    use whatlang::Lang::*;
    let code = match lang {
        Eng => "en",
        Spa => "es",
        Cmn => "zh",
        Jpn => "ja",
        Kor => "ko",
        Fra => "fr",
        Deu => "de",
        Rus => "ru",
        Por => "pt",
        Ita => "it",
        Ara => "ar",
        Hin => "hi",
        Tur => "tr",
        Vie => "vi",
        Tha => "th",
        Nld => "nl",
        Pol => "pl",
        Ukr => "uk",
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_unambiguous_text() {
        let detector = WhatlangDetector::default();
        let tag = detector.detect_language(
            "El perro corre por el parque mientras los niños juegan con la pelota",
        );
        assert_eq!(tag.as_str(), "es");
    }

    #[test]
    fn test_short_text_falls_back() {
        let fallback = LanguageTag::new("en").unwrap();
        let detector = WhatlangDetector::new(fallback.clone());
        // far too short for reliable detection
        assert_eq!(detector.detect_language("ok"), fallback);
    }

    #[test]
    fn test_empty_text_falls_back() {
        let detector = WhatlangDetector::default();
        assert_eq!(detector.detect_language("").as_str(), "en");
    }
}
