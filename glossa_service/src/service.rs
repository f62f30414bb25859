//! Service facade
//!
//! Wires the store, coalescer, negative cache, pivot index and orchestrator
//! together with the collaborator implementations, and exposes the three
//! operations the request surface calls: translate, generate-and-translate,
//! and translate-recognized.

use crate::cache::factory::CacheFactory;
use crate::cache::traits::PayloadCache;
use crate::cache::CacheStats;
use crate::coalesce::{Coalescer, CoalescerConfig};
use crate::config::AppConfig;
use crate::negative::NegativeCache;
use crate::orchestrators::{TranslateOrchestrator, TranslateRequest};
use crate::pivot::PivotIndex;
use glossa_core::error::Result;
use glossa_core::language::LanguageTag;
use glossa_core::payload::TranslationPayload;
use glossa_core::upstream::{
    Detector, Pronouncer, Recognizer, Segmenter, SeedKind, SentenceSource, Translator,
};
use log::debug;
use std::sync::Arc;
use std::time::Duration;

/// The external capabilities the service delegates to
#[derive(Clone)]
pub struct Collaborators {
    pub translator: Arc<dyn Translator>,
    pub pronouncer: Arc<dyn Pronouncer>,
    pub segmenter: Arc<dyn Segmenter>,
    pub detector: Arc<dyn Detector>,
    pub sentence_source: Arc<dyn SentenceSource>,
    pub recognizer: Arc<dyn Recognizer>,
}

/// Facade over the cache-and-coalescing core
pub struct TranslationCacheService {
    store: Arc<dyn PayloadCache>,
    orchestrator: TranslateOrchestrator,
    sentence_source: Arc<dyn SentenceSource>,
    recognizer: Arc<dyn Recognizer>,
}

impl TranslationCacheService {
    /// Build the service from a validated configuration
    pub async fn from_config(config: &AppConfig, collaborators: Collaborators) -> Result<Self> {
        config.validate()?;
        let store = CacheFactory::create(config.cache_config()).await?;
        Ok(Self::assemble(
            store,
            config.coalescer_config(),
            config.negative_ttl(),
            config.neutral_language()?,
            config.pipeline.max_text_chars,
            collaborators,
        ))
    }

    /// Direct construction over an existing store (used by tests)
    pub fn new(
        store: Arc<dyn PayloadCache>,
        coalescer_config: CoalescerConfig,
        negative_ttl: Duration,
        neutral: LanguageTag,
        max_text_chars: usize,
        collaborators: Collaborators,
    ) -> Self {
        Self::assemble(
            store,
            coalescer_config,
            negative_ttl,
            neutral,
            max_text_chars,
            collaborators,
        )
    }

    fn assemble(
        store: Arc<dyn PayloadCache>,
        coalescer_config: CoalescerConfig,
        negative_ttl: Duration,
        neutral: LanguageTag,
        max_text_chars: usize,
        collaborators: Collaborators,
    ) -> Self {
        let negative = Arc::new(NegativeCache::new(store.clone(), negative_ttl));
        let coalescer = Arc::new(Coalescer::new(
            store.clone(),
            negative,
            coalescer_config,
        ));
        let pivot = Arc::new(PivotIndex::new(store.clone()));
        let orchestrator = TranslateOrchestrator::new(
            store.clone(),
            coalescer,
            pivot,
            collaborators.translator,
            collaborators.pronouncer,
            collaborators.segmenter,
            collaborators.detector,
            neutral,
            max_text_chars,
        );

        Self {
            store,
            orchestrator,
            sentence_source: collaborators.sentence_source,
            recognizer: collaborators.recognizer,
        }
    }

    /// Translate a caller-provided text
    pub async fn translate(&self, request: TranslateRequest) -> Result<TranslationPayload> {
        self.orchestrator.translate(request).await
    }

    /// Like [`translate`](Self::translate), but upstream failures come back
    /// as an error payload (original text echoed, translation null) instead
    /// of an `Err`
    pub async fn translate_or_error_payload(
        &self,
        request: TranslateRequest,
    ) -> TranslationPayload {
        let original = request.text.clone();
        let source = request.source.clone();
        let target = request.target.clone();
        match self.orchestrator.translate(request).await {
            Ok(payload) => payload,
            Err(error) => {
                debug!("translation failed, returning error payload: {error}");
                TranslationPayload::failure(original, source, target, &error)
            }
        }
    }

    /// Generate a practice text in the neutral language and translate it
    pub async fn generate_and_translate(
        &self,
        kind: &SeedKind,
        source: &LanguageTag,
        target: &LanguageTag,
    ) -> Result<TranslationPayload> {
        let seed = self.sentence_source.next_text(kind).await?;
        self.orchestrator
            .translate_seeded(&seed, source, target)
            .await
    }

    /// Run OCR on an encoded image and translate the recognized text
    pub async fn translate_recognized(
        &self,
        image: &[u8],
        target: &LanguageTag,
    ) -> Result<TranslationPayload> {
        let text = self.recognizer.recognize_text(image).await?;
        self.orchestrator
            .translate(TranslateRequest {
                text,
                source: LanguageTag::auto(),
                target: target.clone(),
            })
            .await
    }

    /// Statistics of the underlying store
    pub async fn cache_stats(&self) -> Result<CacheStats> {
        self.store.stats().await
    }

    /// Remove all cached entries
    pub async fn clear_cache(&self) -> Result<()> {
        self.store.clear().await
    }
}
