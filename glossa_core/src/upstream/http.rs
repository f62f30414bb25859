//! HTTP machine-translation client
//!
//! Speaks the LibreTranslate-shaped `POST /translate` contract: a JSON body
//! with `q`/`source`/`target` and a response carrying `translatedText` plus an
//! optional `detectedLanguage` that some deployments send as an object and
//! others as a bare string. Transport and server errors are retried per the
//! configured [`RetryPolicy`]; client errors are surfaced immediately.

use crate::error::{Result, UpstreamError, ValidationError};
use crate::language::LanguageTag;
use crate::upstream::retry::RetryPolicy;
use crate::upstream::{Translation, Translator};
use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;
use std::time::Duration;

const SERVICE: &str = "translator";

/// Configuration for the HTTP translator client
#[derive(Debug, Clone)]
pub struct HttpTranslatorConfig {
    /// Base URL of the translation service (no trailing slash needed)
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for HttpTranslatorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5050".to_string(),
            timeout: Duration::from_secs(20),
            retry: RetryPolicy::default(),
        }
    }
}

/// Reqwest-backed [`Translator`] implementation
pub struct HttpTranslator {
    http: reqwest::Client,
    config: HttpTranslatorConfig,
}

impl HttpTranslator {
    pub fn new(config: HttpTranslatorConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ValidationError::invalid_configuration(format!("http client: {e}"))
            })?;
        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/translate", self.config.base_url.trim_end_matches('/'))
    }

    async fn send_with_retry(&self, body: &serde_json::Value) -> Result<TranslateResponse> {
        let mut attempt: u32 = 0;
        loop {
            let outcome = self.http.post(self.endpoint()).json(body).send().await;

            match outcome {
                Ok(resp) if resp.status().is_success() => {
                    return resp.json::<TranslateResponse>().await.map_err(|e| {
                        UpstreamError::rejected(SERVICE, 200, format!("malformed response: {e}"))
                            .into()
                    });
                }
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    let detail = resp.text().await.unwrap_or_default();
                    let detail: String = detail.chars().take(200).collect();
                    if self.config.retry.is_retryable_status(status)
                        && self.config.retry.should_retry(attempt)
                    {
                        let wait = self.config.retry.backoff(attempt);
                        warn!(
                            "translator returned {status}, retrying in {}ms (attempt {attempt})",
                            wait.as_millis()
                        );
                        tokio::time::sleep(wait).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(UpstreamError::from_status(SERVICE, status, detail).into());
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    if self.config.retry.should_retry(attempt) {
                        let wait = self.config.retry.backoff(attempt);
                        warn!(
                            "translator transport error ({e}), retrying in {}ms",
                            wait.as_millis()
                        );
                        tokio::time::sleep(wait).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(UpstreamError::unavailable(SERVICE, e.to_string()).into());
                }
                Err(e) => {
                    return Err(UpstreamError::unavailable(SERVICE, e.to_string()).into());
                }
            }
        }
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &LanguageTag,
        target: &LanguageTag,
    ) -> Result<Translation> {
        let body = serde_json::json!({
            "q": text,
            "source": source.as_str(),
            "target": target.as_str(),
            "format": "text",
        });

        debug!("translating {} -> {} ({} chars)", source, target, text.len());
        let response = self.send_with_retry(&body).await?;

        let translated_text = response.translated_text.ok_or_else(|| {
            UpstreamError::rejected(SERVICE, 200, "malformed response: missing translatedText")
        })?;

        Ok(Translation {
            translated_text,
            detected_language: response.detected_language.and_then(DetectedLanguage::into_tag),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
    #[serde(rename = "detectedLanguage")]
    detected_language: Option<DetectedLanguage>,
}

/// Some deployments report detection as `{"language": "es", ...}`, others as
/// a bare `"es"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DetectedLanguage {
    Tagged {
        language: String,
        #[allow(dead_code)]
        confidence: Option<f64>,
    },
    Plain(String),
}

impl DetectedLanguage {
    fn into_tag(self) -> Option<LanguageTag> {
        let raw = match self {
            Self::Tagged { language, .. } => language,
            Self::Plain(language) => language,
        };
        LanguageTag::new(&raw).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detected_language_object_form() {
        let response: TranslateResponse = serde_json::from_str(
            r#"{"translatedText": "dog", "detectedLanguage": {"language": "es", "confidence": 0.93}}"#,
        )
        .unwrap();
        let tag = response.detected_language.unwrap().into_tag().unwrap();
        assert_eq!(tag.as_str(), "es");
    }

    #[test]
    fn test_detected_language_string_form() {
        let response: TranslateResponse =
            serde_json::from_str(r#"{"translatedText": "dog", "detectedLanguage": "ES"}"#).unwrap();
        let tag = response.detected_language.unwrap().into_tag().unwrap();
        assert_eq!(tag.as_str(), "es");
    }

    #[test]
    fn test_missing_detection_is_none() {
        let response: TranslateResponse =
            serde_json::from_str(r#"{"translatedText": "dog"}"#).unwrap();
        assert!(response.detected_language.is_none());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let translator = HttpTranslator::new(HttpTranslatorConfig {
            base_url: "http://mt.local/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(translator.endpoint(), "http://mt.local/translate");
    }
}
