use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Scoring provider configuration: retry policy, truncation, and provider selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Total attempts per call, including the first one.
    pub max_attempts: u32,
    /// Backoff before the first retry (doubles each retry).
    pub initial_backoff_ms: u64,
    /// Upper bound on a single backoff delay.
    pub max_backoff_ms: u64,
    /// Overall deadline for one adapter call across all attempts.
    pub request_timeout_ms: u64,
    /// Timeout of a single network attempt.
    pub attempt_timeout_ms: u64,
    /// Texts are cut to this many characters before being sent.
    pub max_text_chars: usize,
    /// Embedding provider: "hashed-tf" or "api".
    pub embedding_provider: String,
    /// Dimensions of the local hashed embedder.
    pub embedding_dimensions: usize,
    /// HTTP embedding API settings.
    pub api: ApiProviderConfig,
}

impl ProviderConfig {
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::DEFAULT_MAX_ATTEMPTS,
            initial_backoff_ms: defaults::DEFAULT_INITIAL_BACKOFF_MS,
            max_backoff_ms: defaults::DEFAULT_MAX_BACKOFF_MS,
            request_timeout_ms: defaults::DEFAULT_REQUEST_TIMEOUT_MS,
            attempt_timeout_ms: defaults::DEFAULT_ATTEMPT_TIMEOUT_MS,
            max_text_chars: defaults::DEFAULT_MAX_TEXT_CHARS,
            embedding_provider: defaults::DEFAULT_EMBEDDING_PROVIDER.to_string(),
            embedding_dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            api: ApiProviderConfig::default(),
        }
    }
}

/// OpenAI-compatible embedding endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiProviderConfig {
    pub endpoint: String,
    pub model: String,
    pub dimensions: usize,
    /// Name of the environment variable holding the bearer token.
    pub api_key_env: String,
}

impl Default for ApiProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::DEFAULT_API_ENDPOINT.to_string(),
            model: defaults::DEFAULT_API_MODEL.to_string(),
            dimensions: defaults::DEFAULT_API_DIMENSIONS,
            api_key_env: defaults::DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}
