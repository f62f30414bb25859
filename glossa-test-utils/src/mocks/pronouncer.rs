//! Mock implementation of the Pronouncer contract

use async_trait::async_trait;
use glossa_core::error::{Result, UpstreamError};
use glossa_core::language::LanguageTag;
use glossa_core::upstream::{Pronouncer, Pronunciation};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
struct Behavior {
    /// Languages reported as having no pronunciation support
    unsupported: HashSet<String>,
    failure: Option<UpstreamError>,
    delay: Duration,
}

/// Programmable mock pronouncer
///
/// By default yields one IPA token (`ˈword`) and one romanization token per
/// whitespace-separated word. Languages marked unsupported return empty
/// token lists, which is the contract's "no pronunciation available" value.
pub struct MockPronouncer {
    behavior: Mutex<Behavior>,
    calls: AtomicUsize,
}

impl MockPronouncer {
    pub fn new() -> Self {
        Self {
            behavior: Mutex::new(Behavior::default()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Mark a language as unsupported (empty token lists)
    pub fn without_support_for(self, language: &str) -> Self {
        self.behavior
            .lock()
            .unwrap()
            .unsupported
            .insert(language.to_string());
        self
    }

    /// Make every subsequent call fail with the given error
    pub fn fail_with(&self, error: UpstreamError) {
        self.behavior.lock().unwrap().failure = Some(error);
    }

    /// Delay each call; widens race windows in coalescing tests
    pub fn with_delay(self, delay: Duration) -> Self {
        self.behavior.lock().unwrap().delay = delay;
        self
    }

    /// Number of pronounce calls observed so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockPronouncer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Pronouncer for MockPronouncer {
    async fn pronounce(&self, text: &str, language: &LanguageTag) -> Result<Pronunciation> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let (failure, unsupported, delay) = {
            let behavior = self.behavior.lock().unwrap();
            (
                behavior.failure.clone(),
                behavior.unsupported.contains(language.primary()),
                behavior.delay,
            )
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = failure {
            return Err(error.into());
        }
        if unsupported {
            return Ok(Pronunciation::default());
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        Ok(Pronunciation {
            ipa: words.iter().map(|w| format!("ˈ{w}")).collect(),
            romanization: words.iter().map(|w| format!("{w}-r")).collect(),
        })
    }
}
