//! Mock implementation of the Translator contract
//!
//! The mock counts every call, can delay to widen race windows in
//! concurrency tests, answers from a table of fixed responses, and can be
//! switched into a failure mode.

use async_trait::async_trait;
use glossa_core::error::{Result, UpstreamError};
use glossa_core::language::LanguageTag;
use glossa_core::upstream::{Translation, Translator};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
struct Behavior {
    /// Fixed responses keyed by (text, source, target)
    responses: HashMap<(String, String, String), String>,
    /// When set, every call fails with this error
    failure: Option<UpstreamError>,
    /// Artificial latency per call
    delay: Duration,
}

/// Programmable mock translator
///
/// By default translates `text` to `"[target] text"` and echoes the source
/// language as detected (`en` when the source was `auto`).
pub struct MockTranslator {
    behavior: Mutex<Behavior>,
    calls: AtomicUsize,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self {
            behavior: Mutex::new(Behavior::default()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Add a fixed response for one (text, source, target) triple
    pub fn respond(&self, text: &str, source: &str, target: &str, translated: &str) -> &Self {
        self.behavior.lock().unwrap().responses.insert(
            (text.to_string(), source.to_string(), target.to_string()),
            translated.to_string(),
        );
        self
    }

    /// Make every subsequent call fail with the given error
    pub fn fail_with(&self, error: UpstreamError) {
        self.behavior.lock().unwrap().failure = Some(error);
    }

    /// Restore normal operation after `fail_with`
    pub fn recover(&self) {
        self.behavior.lock().unwrap().failure = None;
    }

    /// Delay each call; widens race windows in coalescing tests
    pub fn with_delay(self, delay: Duration) -> Self {
        self.behavior.lock().unwrap().delay = delay;
        self
    }

    /// Number of translate calls observed so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &LanguageTag,
        target: &LanguageTag,
    ) -> Result<Translation> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let (failure, fixed, delay) = {
            let behavior = self.behavior.lock().unwrap();
            (
                behavior.failure.clone(),
                behavior
                    .responses
                    .get(&(
                        text.to_string(),
                        source.as_str().to_string(),
                        target.as_str().to_string(),
                    ))
                    .cloned(),
                behavior.delay,
            )
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = failure {
            return Err(error.into());
        }

        let detected = if source.is_auto() {
            LanguageTag::neutral_default()
        } else {
            source.clone()
        };
        let translated_text =
            fixed.unwrap_or_else(|| format!("[{}] {}", target.as_str(), text));

        Ok(Translation {
            translated_text,
            detected_language: Some(detected),
        })
    }
}
