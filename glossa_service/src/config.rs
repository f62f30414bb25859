//! Layered application configuration
//!
//! Configuration is resolved in three layers: built-in defaults, an optional
//! TOML file at the XDG config path, and `GLOSSA_`-prefixed environment
//! variables (nested fields separated by `__`, e.g.
//! `GLOSSA_COALESCE__NEGATIVE_TTL_SECS=3`).

use crate::cache::factory::CacheConfig;
use crate::cache::memory_cache::MemoryCacheConfig;
use crate::coalesce::CoalescerConfig;
use crate::paths;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use glossa_core::error::{Result, ValidationError};
use glossa_core::language::{DEFAULT_NEUTRAL, LanguageTag};
use glossa_core::upstream::retry::RetryPolicy;
use glossa_core::upstream::http::HttpTranslatorConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub coalesce: CoalesceSettings,

    #[serde(default)]
    pub pipeline: PipelineSettings,

    #[serde(default)]
    pub upstream: UpstreamSettings,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CacheSettings {
    /// Store backend: "layered", "sqlite", "memory" or "none"
    pub backend: String,
    /// Database path for persistent backends; defaults to the platform path
    pub db_path: Option<PathBuf>,
    /// Entry limit for the memory layer
    pub max_entries: Option<usize>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CoalesceSettings {
    /// Bounded wait of a follower on an in-flight ticket, in milliseconds
    pub follower_wait_ms: u64,
    /// Negative-marker lifetime, in seconds
    pub negative_ttl_secs: u64,
    /// Worker-pool size as a multiple of available CPU parallelism
    pub worker_multiplier: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PipelineSettings {
    /// Language the content generator produces; that side of a generated
    /// request is never sent to the translator
    pub neutral_language: String,
    /// Inbound text is whitespace-collapsed and truncated to this many
    /// characters before keying
    pub max_text_chars: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UpstreamSettings {
    /// Base URL of the translation service
    pub translate_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Retry attempts per translation request, including the first
    pub retry_max_attempts: u32,
    /// Base backoff between retries, in milliseconds
    pub retry_base_backoff_ms: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: "layered".to_string(),
            db_path: None,
            max_entries: None,
        }
    }
}

impl Default for CoalesceSettings {
    fn default() -> Self {
        Self {
            follower_wait_ms: 4000,
            negative_ttl_secs: 5,
            worker_multiplier: 2,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            neutral_language: DEFAULT_NEUTRAL.to_string(),
            max_text_chars: 50,
        }
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            translate_url: "http://localhost:5050".to_string(),
            timeout_secs: 20,
            retry_max_attempts: 3,
            retry_base_backoff_ms: 500,
        }
    }
}

impl AppConfig {
    /// Validate cross-field invariants
    pub fn validate(&self) -> Result<()> {
        // A follower waiting longer than the negative TTL could outlive the
        // window in which a retry makes sense.
        if self.coalesce.follower_wait_ms > self.coalesce.negative_ttl_secs * 1000 {
            return Err(ValidationError::invalid_configuration(format!(
                "follower_wait_ms ({}) must not exceed negative_ttl_secs ({}s)",
                self.coalesce.follower_wait_ms, self.coalesce.negative_ttl_secs
            ))
            .into());
        }
        if self.pipeline.max_text_chars == 0 {
            return Err(
                ValidationError::invalid_configuration("max_text_chars must be positive").into(),
            );
        }
        if !matches!(
            self.cache.backend.as_str(),
            "layered" | "sqlite" | "memory" | "none"
        ) {
            return Err(ValidationError::invalid_configuration(format!(
                "unknown cache backend '{}'",
                self.cache.backend
            ))
            .into());
        }
        self.neutral_language()?;
        Ok(())
    }

    /// Parsed neutral language tag
    pub fn neutral_language(&self) -> Result<LanguageTag> {
        Ok(LanguageTag::new(&self.pipeline.neutral_language)?)
    }

    /// Store configuration derived from the cache section
    pub fn cache_config(&self) -> CacheConfig {
        let memory_config = MemoryCacheConfig {
            max_entries: self.cache.max_entries.or(Some(50_000)),
            ..Default::default()
        };
        let db_path = self
            .cache
            .db_path
            .clone()
            .unwrap_or_else(paths::get_database_path);

        match self.cache.backend.as_str() {
            "memory" => CacheConfig::Memory(memory_config),
            "sqlite" => CacheConfig::Sqlite { db_path },
            "none" => CacheConfig::NoOp,
            _ => CacheConfig::Layered {
                memory_config,
                db_path,
            },
        }
    }

    /// Coalescer configuration derived from the coalesce section
    pub fn coalescer_config(&self) -> CoalescerConfig {
        CoalescerConfig {
            follower_wait: Duration::from_millis(self.coalesce.follower_wait_ms),
            worker_multiplier: self.coalesce.worker_multiplier,
        }
    }

    /// Negative-marker lifetime
    pub fn negative_ttl(&self) -> Duration {
        Duration::from_secs(self.coalesce.negative_ttl_secs)
    }

    /// HTTP translator configuration derived from the upstream section
    pub fn translator_config(&self) -> HttpTranslatorConfig {
        HttpTranslatorConfig {
            base_url: self.upstream.translate_url.clone(),
            timeout: Duration::from_secs(self.upstream.timeout_secs),
            retry: RetryPolicy {
                max_attempts: self.upstream.retry_max_attempts,
                base_backoff: Duration::from_millis(self.upstream.retry_base_backoff_ms),
                ..Default::default()
            },
        }
    }
}

/// Configuration manager handling the layered load
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Create a new ConfigManager with the default XDG-compliant path
    pub fn new() -> Self {
        Self {
            config_path: paths::get_config_path(),
        }
    }

    /// Create a ConfigManager with a specific path (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load and validate the configuration: defaults, then the TOML file,
    /// then `GLOSSA_` environment overrides
    pub fn load(&self) -> Result<AppConfig> {
        let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(&self.config_path))
            .merge(Env::prefixed("GLOSSA_").split("__"))
            .extract()
            .map_err(|e| ValidationError::invalid_configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.neutral_language().unwrap().as_str(), "en");
    }

    #[test]
    fn test_follower_wait_bounded_by_negative_ttl() {
        let mut config = AppConfig::default();
        config.coalesce.follower_wait_ms = 6000;
        config.coalesce.negative_ttl_secs = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let mut config = AppConfig::default();
        config.cache.backend = "redis".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backend_selection() {
        let mut config = AppConfig::default();
        config.cache.backend = "memory".to_string();
        assert!(matches!(config.cache_config(), CacheConfig::Memory(_)));

        config.cache.backend = "none".to_string();
        assert!(matches!(config.cache_config(), CacheConfig::NoOp));
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[coalesce]\nnegative_ttl_secs = 8\nfollower_wait_ms = 2000\n",
        )
        .unwrap();

        let config = ConfigManager::with_path(path).load().unwrap();
        assert_eq!(config.coalesce.negative_ttl_secs, 8);
        assert_eq!(config.coalesce.follower_wait_ms, 2000);
        // untouched sections keep their defaults
        assert_eq!(config.pipeline.max_text_chars, 50);
    }
}
