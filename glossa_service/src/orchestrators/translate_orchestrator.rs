//! Translation request pipeline
//!
//! Per request: normalize → check forward cache (enrich partial hits) →
//! check pivot → coalesced translation → coalesced pronunciations for both
//! sides, in parallel → assemble → persist forward entry and pivot pointer.
//!
//! Display segmentation runs before any key is derived, so keys are stable
//! regardless of whether the caller already segmented the text. Every call
//! into the translator or pronouncer goes through the coalescer, which is
//! where single-flight dedup and negative caching happen.

use crate::cache::traits::PayloadCache;
use crate::cache::{CachedValue, PivotPointer, StoreKey};
use crate::coalesce::Coalescer;
use crate::pivot::PivotIndex;
use glossa_core::error::{InternalError, Result};
use glossa_core::keys::{self, CacheKey};
use glossa_core::language::LanguageTag;
use glossa_core::payload::TranslationPayload;
use glossa_core::text;
use glossa_core::upstream::{Detector, Pronouncer, Pronunciation, Segmenter, Translator};
use log::debug;
use std::sync::Arc;

/// Discriminator mixed into the keys of generate-and-translate entries.
/// A seeded entry keyed by (seed, source, target) is semantically different
/// from a direct translation of the same text when the source is not the
/// neutral language, so they must never share a key.
const SEEDED_DISCRIMINATOR: &str = "seeded";

/// One inbound translation request
#[derive(Debug, Clone)]
pub struct TranslateRequest {
    pub text: String,
    /// May be `auto`, resolved via the detector before keying
    pub source: LanguageTag,
    /// May be `auto`, resolved to the neutral language
    pub target: LanguageTag,
}

/// Orchestrator for translation requests
pub struct TranslateOrchestrator {
    store: Arc<dyn PayloadCache>,
    coalescer: Arc<Coalescer>,
    pivot: Arc<PivotIndex>,
    translator: Arc<dyn Translator>,
    pronouncer: Arc<dyn Pronouncer>,
    segmenter: Arc<dyn Segmenter>,
    detector: Arc<dyn Detector>,
    neutral: LanguageTag,
    max_text_chars: usize,
}

impl TranslateOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn PayloadCache>,
        coalescer: Arc<Coalescer>,
        pivot: Arc<PivotIndex>,
        translator: Arc<dyn Translator>,
        pronouncer: Arc<dyn Pronouncer>,
        segmenter: Arc<dyn Segmenter>,
        detector: Arc<dyn Detector>,
        neutral: LanguageTag,
        max_text_chars: usize,
    ) -> Self {
        Self {
            store,
            coalescer,
            pivot,
            translator,
            pronouncer,
            segmenter,
            detector,
            neutral,
            max_text_chars,
        }
    }

    /// Whitespace-collapse and truncate inbound text
    fn intake(&self, raw: &str) -> String {
        let collapsed = text::collapse_whitespace(raw);
        text::truncate_chars(&collapsed, self.max_text_chars)
            .trim_end()
            .to_string()
    }

    /// Run the full pipeline for a direct translation request
    pub async fn translate(&self, request: TranslateRequest) -> Result<TranslationPayload> {
        let input = self.intake(&request.text);
        let target = if request.target.is_auto() {
            self.neutral.clone()
        } else {
            request.target.clone()
        };

        if input.is_empty() {
            let source = if request.source.is_auto() {
                self.neutral.clone()
            } else {
                request.source.clone()
            };
            return Ok(TranslationPayload::empty(source, target));
        }

        let source = if request.source.is_auto() {
            self.detector.detect_language(&input)
        } else {
            request.source.clone()
        };

        let original_display = self.segmenter.insert_word_breaks(&input, &source);

        if source == target {
            return self.identity(original_display, source, target).await;
        }

        let forward_cache_key = keys::derive_key(&original_display, &source, &target, &[]);
        let forward_key = StoreKey::forward(&forward_cache_key);

        // CHECK_FORWARD_CACHE
        if let Some(value) = self.store.get(&forward_key).await?
            && let Some(cached) = value.into_translation()
        {
            if cached.is_complete() {
                debug!("forward cache hit for {forward_key}");
                return Ok(cached);
            }
            if cached
                .translated_text
                .as_deref()
                .is_some_and(|t| !t.is_empty())
            {
                debug!("partial forward entry for {forward_key}, enriching");
                return self
                    .enrich(&forward_key, forward_cache_key, cached, &source, &target)
                    .await;
            }
            // no usable translation text in the entry: recompute below
        }

        // CHECK_PIVOT
        if let Some(pointer) = self.pivot.lookup(&original_display, &source, &target).await? {
            if let Some(payload) = self.assemble_from_pivot(&pointer, &forward_key).await? {
                return Ok(payload);
            }
            debug!("dangling pivot pointer for {forward_key}, computing normally");
        }

        // RESOLVE_TRANSLATION
        let resolved = self
            .resolve_translation(&forward_key, &input, &original_display, &source, &target)
            .await?;
        if resolved.is_complete() {
            // another wave finished the whole pipeline while we waited
            return Ok(resolved);
        }
        let translated_display = resolved.translated_text.clone().unwrap_or_default();
        let detected = resolved.detected_language.clone();

        // RESOLVE_PRONUNCIATION, both sides in parallel
        let (original_pron, translated_pron) = tokio::try_join!(
            self.resolve_pronunciation(&original_display, &detected),
            self.resolve_pronunciation(&translated_display, &target),
        )?;

        // ASSEMBLE + PERSIST
        let payload = TranslationPayload::complete(
            original_display.clone(),
            translated_display.clone(),
            detected,
            target.clone(),
            original_pron,
            translated_pron,
        );
        self.store
            .put(&forward_key, &CachedValue::Translation(payload.clone()))
            .await?;
        self.pivot
            .record(
                &translated_display,
                &target,
                &source,
                forward_cache_key,
                original_display,
            )
            .await?;
        Ok(payload)
    }

    /// Run the pipeline for a generated neutral-language seed text.
    ///
    /// Sides equal to the neutral language use the seed literally and are
    /// never sent to the translator; other sides are translated from the
    /// seed, both concurrently.
    pub async fn translate_seeded(
        &self,
        seed_text: &str,
        source: &LanguageTag,
        target: &LanguageTag,
    ) -> Result<TranslationPayload> {
        let seed = self.intake(seed_text);
        // generated text is always neutral-language; `auto` means unknown
        let source = if source.is_auto() {
            self.neutral.clone()
        } else {
            source.clone()
        };
        let target = if target.is_auto() {
            self.neutral.clone()
        } else {
            target.clone()
        };

        if seed.is_empty() {
            return Ok(TranslationPayload::empty(source, target));
        }

        let seed_display = self.segmenter.insert_word_breaks(&seed, &self.neutral);
        let seeded_cache_key =
            keys::derive_key(&seed_display, &source, &target, &[SEEDED_DISCRIMINATOR]);
        let seeded_key = StoreKey::forward(&seeded_cache_key);

        if let Some(value) = self.store.get(&seeded_key).await?
            && let Some(cached) = value.into_translation()
        {
            if cached.is_complete() {
                debug!("seeded cache hit for {seeded_key}");
                return Ok(cached);
            }
            if cached
                .translated_text
                .as_deref()
                .is_some_and(|t| !t.is_empty())
            {
                return self
                    .enrich(&seeded_key, seeded_cache_key, cached, &source, &target)
                    .await;
            }
        }

        // both sides neutral: the seed is the answer, pronounce once
        if source == self.neutral && target == self.neutral {
            let pron = self.resolve_pronunciation(&seed_display, &self.neutral).await?;
            let payload = TranslationPayload::complete(
                seed_display.clone(),
                seed_display,
                source,
                target,
                pron.clone(),
                pron,
            );
            self.store
                .put(&seeded_key, &CachedValue::Translation(payload.clone()))
                .await?;
            return Ok(payload);
        }

        // same non-neutral language on both sides: translate once, reuse
        if source == target {
            let side_key = keys::derive_key(&seed_display, &self.neutral, &target, &[]);
            let resolved = self
                .resolve_translation(
                    &StoreKey::forward(&side_key),
                    &seed,
                    &seed_display,
                    &self.neutral,
                    &target,
                )
                .await?;
            let side_display = resolved.translated_text.clone().unwrap_or_default();
            let pron = self.resolve_pronunciation(&side_display, &target).await?;
            let payload = TranslationPayload::complete(
                side_display.clone(),
                side_display,
                source,
                target,
                pron.clone(),
                pron,
            );
            self.store
                .put(&seeded_key, &CachedValue::Translation(payload.clone()))
                .await?;
            return Ok(payload);
        }

        // general case: resolve each non-neutral side from the seed
        let original_side = async {
            if source == self.neutral {
                Ok::<String, glossa_core::Error>(seed_display.clone())
            } else {
                let side_key = keys::derive_key(&seed_display, &self.neutral, &source, &[]);
                let resolved = self
                    .resolve_translation(
                        &StoreKey::forward(&side_key),
                        &seed,
                        &seed_display,
                        &self.neutral,
                        &source,
                    )
                    .await?;
                Ok(resolved.translated_text.unwrap_or_default())
            }
        };
        let translated_side = async {
            if target == self.neutral {
                Ok::<String, glossa_core::Error>(seed_display.clone())
            } else {
                let side_key = keys::derive_key(&seed_display, &self.neutral, &target, &[]);
                let resolved = self
                    .resolve_translation(
                        &StoreKey::forward(&side_key),
                        &seed,
                        &seed_display,
                        &self.neutral,
                        &target,
                    )
                    .await?;
                Ok(resolved.translated_text.unwrap_or_default())
            }
        };
        let (original_display, translated_display): (String, String) =
            tokio::try_join!(original_side, translated_side)?;

        let (original_pron, translated_pron) = tokio::try_join!(
            self.resolve_pronunciation(&original_display, &source),
            self.resolve_pronunciation(&translated_display, &target),
        )?;

        let payload = TranslationPayload::complete(
            original_display.clone(),
            translated_display.clone(),
            source.clone(),
            target.clone(),
            original_pron,
            translated_pron,
        );
        self.store
            .put(&seeded_key, &CachedValue::Translation(payload.clone()))
            .await?;
        self.pivot
            .record(
                &translated_display,
                &target,
                &source,
                seeded_cache_key,
                original_display,
            )
            .await?;
        Ok(payload)
    }

    /// Identity translation: same language on both sides, translator skipped,
    /// pronunciation computed once and reused
    async fn identity(
        &self,
        display: String,
        source: LanguageTag,
        target: LanguageTag,
    ) -> Result<TranslationPayload> {
        debug!("identity request for {source}, skipping translator");
        let cache_key = keys::derive_key(&display, &source, &target, &[]);
        let key = StoreKey::forward(&cache_key);

        if let Some(value) = self.store.get(&key).await?
            && let Some(cached) = value.into_translation()
            && cached.is_complete()
        {
            return Ok(cached);
        }

        let pron = self.resolve_pronunciation(&display, &source).await?;
        let payload = TranslationPayload::complete(
            display.clone(),
            display,
            source,
            target,
            pron.clone(),
            pron,
        );
        self.store
            .put(&key, &CachedValue::Translation(payload.clone()))
            .await?;
        Ok(payload)
    }

    /// Backfill the pronunciation fields of a partial forward entry
    async fn enrich(
        &self,
        forward_key: &StoreKey,
        forward_cache_key: CacheKey,
        partial: TranslationPayload,
        source: &LanguageTag,
        target: &LanguageTag,
    ) -> Result<TranslationPayload> {
        let translated_display = partial.translated_text.clone().unwrap_or_default();
        let detected = partial.detected_language.clone();

        // A complete entry in the reverse direction already carries both
        // pronunciations; swap it instead of recomputing.
        let reverse_cache_key = keys::derive_key(&translated_display, target, source, &[]);
        if let Some(value) = self
            .store
            .get(&StoreKey::forward(&reverse_cache_key))
            .await?
            && let Some(reverse) = value.into_translation()
            && reverse.is_complete()
            && let Some(swapped) = reverse.swapped()
        {
            debug!("enriched {forward_key} from reverse entry");
            self.store
                .put(forward_key, &CachedValue::Translation(swapped.clone()))
                .await?;
            return Ok(swapped);
        }

        let (original_pron, translated_pron) = tokio::try_join!(
            self.resolve_pronunciation(&partial.original_text, &detected),
            self.resolve_pronunciation(&translated_display, target),
        )?;

        let payload = TranslationPayload::complete(
            partial.original_text.clone(),
            translated_display.clone(),
            detected,
            target.clone(),
            original_pron,
            translated_pron,
        );
        self.store
            .put(forward_key, &CachedValue::Translation(payload.clone()))
            .await?;
        self.pivot
            .record(
                &translated_display,
                target,
                source,
                forward_cache_key,
                payload.original_text.clone(),
            )
            .await?;
        Ok(payload)
    }

    /// Serve a request from the reverse-direction entry a pivot points at.
    /// Returns `None` when the pointer dangles or the entry is unusable.
    async fn assemble_from_pivot(
        &self,
        pointer: &PivotPointer,
        forward_key: &StoreKey,
    ) -> Result<Option<TranslationPayload>> {
        let Some(value) = self
            .store
            .get(&StoreKey::forward(&pointer.reverse_key))
            .await?
        else {
            return Ok(None);
        };
        let Some(reverse) = value.into_translation() else {
            return Ok(None);
        };
        if !reverse.is_complete() {
            return Ok(None);
        }
        let Some(payload) = reverse.swapped() else {
            return Ok(None);
        };

        debug!("assembled {forward_key} by swapping pivot target");
        // persist so the next identical request is a direct hit
        self.store
            .put(forward_key, &CachedValue::Translation(payload.clone()))
            .await?;
        Ok(Some(payload))
    }

    /// Coalesced call into the translator. The leader persists a partial
    /// forward entry before broadcasting, so timed-out followers can recover
    /// it from the store.
    async fn resolve_translation(
        &self,
        forward_key: &StoreKey,
        input: &str,
        original_display: &str,
        source: &LanguageTag,
        target: &LanguageTag,
    ) -> Result<TranslationPayload> {
        let value = self
            .coalescer
            .run(forward_key, || {
                let input = input.to_string();
                let original_display = original_display.to_string();
                let source = source.clone();
                let target = target.clone();
                let forward_key = forward_key.clone();
                async move {
                    let translation = self.translator.translate(&input, &source, &target).await?;
                    let translated_display = self
                        .segmenter
                        .insert_word_breaks(&translation.translated_text, &target);
                    let detected = translation.detected_language.unwrap_or(source);
                    let partial = TranslationPayload::partial(
                        original_display,
                        translated_display,
                        detected,
                        target,
                    );
                    let value = CachedValue::Translation(partial);
                    self.store.put(&forward_key, &value).await?;
                    Ok(value)
                }
            })
            .await?;

        value.into_translation().ok_or_else(|| {
            InternalError::assertion("translation flight returned a non-translation value").into()
        })
    }

    /// Coalesced call into the pronouncer, keyed by (text, language)
    /// independent of which request direction triggered it
    async fn resolve_pronunciation(
        &self,
        display_text: &str,
        language: &LanguageTag,
    ) -> Result<Pronunciation> {
        if display_text.trim().is_empty() {
            return Ok(Pronunciation::default());
        }

        let key = StoreKey::pronunciation(&keys::pronunciation_key(display_text, language));
        if let Some(value) = self.store.get(&key).await?
            && let Some(pron) = value.into_pronunciation()
        {
            return Ok(pron);
        }

        let value = self
            .coalescer
            .run(&key, || {
                let display_text = display_text.to_string();
                let language = language.clone();
                let key = key.clone();
                async move {
                    let pron = self.pronouncer.pronounce(&display_text, &language).await?;
                    let value = CachedValue::Pronunciation(pron);
                    self.store.put(&key, &value).await?;
                    Ok(value)
                }
            })
            .await?;

        value.into_pronunciation().ok_or_else(|| {
            InternalError::assertion("pronunciation flight returned a non-pronunciation value")
                .into()
        })
    }
}
