//! Shared test harness wiring mock collaborators into the service

use glossa_core::language::LanguageTag;
use glossa_core::upstream::IdentitySegmenter;
use glossa_service::cache::memory_cache::MemoryCache;
use glossa_service::cache::traits::PayloadCache;
use glossa_service::coalesce::CoalescerConfig;
use glossa_service::orchestrators::TranslateRequest;
use glossa_service::service::{Collaborators, TranslationCacheService};
use glossa_test_utils::{
    MockPronouncer, MockTranslator, StaticDetector, StaticRecognizer, StaticSentenceSource,
};
use std::sync::Arc;
use std::time::Duration;

pub const SEED_TEXT: &str = "The cat sleeps";
pub const OCR_TEXT: &str = "hola mundo";

pub struct Harness {
    pub store: Arc<dyn PayloadCache>,
    pub translator: Arc<MockTranslator>,
    pub pronouncer: Arc<MockPronouncer>,
    pub service: TranslationCacheService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_mocks(MockTranslator::new(), MockPronouncer::new())
    }

    pub fn with_mocks(translator: MockTranslator, pronouncer: MockPronouncer) -> Self {
        let store: Arc<dyn PayloadCache> = Arc::new(MemoryCache::new());
        let translator = Arc::new(translator);
        let pronouncer = Arc::new(pronouncer);

        let collaborators = Collaborators {
            translator: translator.clone(),
            pronouncer: pronouncer.clone(),
            segmenter: Arc::new(IdentitySegmenter),
            detector: Arc::new(StaticDetector::new("es")),
            sentence_source: Arc::new(StaticSentenceSource::new(SEED_TEXT)),
            recognizer: Arc::new(StaticRecognizer::new(OCR_TEXT)),
        };

        let service = TranslationCacheService::new(
            store.clone(),
            CoalescerConfig {
                follower_wait: Duration::from_millis(2000),
                worker_multiplier: 2,
            },
            Duration::from_secs(5),
            tag("en"),
            50,
            collaborators,
        );

        Self {
            store,
            translator,
            pronouncer,
            service,
        }
    }
}

pub fn tag(s: &str) -> LanguageTag {
    LanguageTag::new(s).unwrap()
}

pub fn request(text: &str, source: &str, target: &str) -> TranslateRequest {
    let source = if source == "auto" {
        LanguageTag::auto()
    } else {
        tag(source)
    };
    TranslateRequest {
        text: text.to_string(),
        source,
        target: tag(target),
    }
}
