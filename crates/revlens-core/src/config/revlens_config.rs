//! Top-level revlens configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    CacheConfig, CorpusConfig, IndexConfig, ObservabilityConfig, ProviderConfig,
    RetrievalConfig, SentimentConfig,
};
use crate::errors::ConfigError;

/// File name looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "revlens.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`REVLENS_*`)
/// 2. Project config (`revlens.toml` in the given root)
/// 3. Compiled defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RevlensConfig {
    pub provider: ProviderConfig,
    pub sentiment: SentimentConfig,
    pub index: IndexConfig,
    pub corpus: CorpusConfig,
    pub cache: CacheConfig,
    pub retrieval: RetrievalConfig,
    pub observability: ObservabilityConfig,
}

impl RevlensConfig {
    /// Load configuration from `root/revlens.toml` (if present) and the environment.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE_NAME);
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        Self::apply_env_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file. Keys missing from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.max_attempts == 0 {
            return Err(invalid("provider.max_attempts", "must be at least 1"));
        }
        if self.provider.max_text_chars == 0 {
            return Err(invalid("provider.max_text_chars", "must be greater than 0"));
        }
        if self.provider.initial_backoff_ms > self.provider.max_backoff_ms {
            return Err(invalid(
                "provider.initial_backoff_ms",
                "must not exceed provider.max_backoff_ms",
            ));
        }
        if self.provider.embedding_dimensions == 0 {
            return Err(invalid("provider.embedding_dimensions", "must be greater than 0"));
        }
        if self.provider.api.dimensions == 0 {
            return Err(invalid("provider.api.dimensions", "must be greater than 0"));
        }
        if self.sentiment.provider.trim().is_empty() {
            return Err(invalid("sentiment.provider", "must not be empty"));
        }
        if self.index.chunk_size == 0 {
            return Err(invalid("index.chunk_size", "must be greater than 0"));
        }
        if self.corpus.step_size == 0 {
            return Err(invalid("corpus.step_size", "must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&self.corpus.latency_smoothing) {
            return Err(invalid("corpus.latency_smoothing", "must be between 0.0 and 1.0"));
        }
        if self.corpus.assumed_per_record_ms < 0.0 {
            return Err(invalid("corpus.assumed_per_record_ms", "must not be negative"));
        }
        Ok(())
    }

    /// Apply environment variable overrides.
    /// Pattern: `REVLENS_CORPUS_STEP_SIZE`, `REVLENS_CACHE_DIR`, etc.
    fn apply_env_overrides(config: &mut RevlensConfig) {
        if let Some(v) = env_parse::<u32>("REVLENS_PROVIDER_MAX_ATTEMPTS") {
            config.provider.max_attempts = v;
        }
        if let Some(v) = env_parse::<u64>("REVLENS_PROVIDER_REQUEST_TIMEOUT_MS") {
            config.provider.request_timeout_ms = v;
        }
        if let Ok(val) = std::env::var("REVLENS_EMBEDDING_PROVIDER") {
            config.provider.embedding_provider = val;
        }
        if let Ok(val) = std::env::var("REVLENS_API_MODEL") {
            config.provider.api.model = val;
        }
        if let Ok(val) = std::env::var("REVLENS_CORPUS_SOURCE") {
            config.corpus.source_path = Some(val);
        }
        if let Some(v) = env_parse::<usize>("REVLENS_CORPUS_STEP_SIZE") {
            config.corpus.step_size = v;
        }
        if let Some(v) = env_parse::<usize>("REVLENS_CORPUS_INITIAL_WINDOW") {
            config.corpus.initial_window = v;
        }
        if let Some(v) = env_parse::<usize>("REVLENS_INDEX_CHUNK_SIZE") {
            config.index.chunk_size = v;
        }
        if let Some(v) = env_parse::<bool>("REVLENS_CACHE_ENABLED") {
            config.cache.enabled = v;
        }
        if let Ok(val) = std::env::var("REVLENS_CACHE_DIR") {
            config.cache.dir = val;
        }
        if let Ok(val) = std::env::var("REVLENS_LOG_LEVEL") {
            config.observability.log_level = val;
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
