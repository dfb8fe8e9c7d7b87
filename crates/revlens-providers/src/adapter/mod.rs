//! Provider adapter: truncation, retry, and failure classification in one place.
//!
//! Transient errors are retried with backoff until attempts or the request
//! deadline run out, then reported as [`Scored::Failed`]. Permanent errors are
//! not retried; the caller gets the safe default as [`Scored::Degraded`].

mod retry;
mod truncate;

pub use retry::RetryPolicy;
pub use truncate::Truncator;

use std::sync::Arc;
use std::time::Instant;

use revlens_core::config::ProviderConfig;
use revlens_core::constants::SENTIMENT_STRIDE;
use revlens_core::errors::ProviderError;
use revlens_core::models::SentimentScores;
use revlens_core::traits::{IEmbeddingProvider, ISentimentProvider};
use tracing::{debug, warn};

/// One scoring call against a provider, as seen by the adapter.
pub trait ScoringCall: Send + Sync {
    type Output: Clone + Send + Sync;

    fn call(&self, text: &str) -> Result<Self::Output, ProviderError>;

    /// Safe default stored for degraded and pending entries.
    fn fallback(&self) -> Self::Output;

    fn model_id(&self) -> &str;

    /// Number of values per output (embedding dimension, sentiment stride).
    fn width(&self) -> usize;

    /// Component name used in logs and degradation events.
    fn component(&self) -> &'static str;
}

impl ScoringCall for dyn ISentimentProvider {
    type Output = SentimentScores;

    fn call(&self, text: &str) -> Result<SentimentScores, ProviderError> {
        self.score(text)
    }

    fn fallback(&self) -> SentimentScores {
        SentimentScores::neutral()
    }

    fn model_id(&self) -> &str {
        ISentimentProvider::model_id(self)
    }

    fn width(&self) -> usize {
        SENTIMENT_STRIDE
    }

    fn component(&self) -> &'static str {
        "sentiment"
    }
}

impl ScoringCall for dyn IEmbeddingProvider {
    type Output = Vec<f32>;

    fn call(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let vector = self.embed(text)?;
        if vector.len() != self.dimensions() {
            return Err(ProviderError::permanent(
                IEmbeddingProvider::model_id(self),
                format!(
                    "expected {} dimensions, got {}",
                    self.dimensions(),
                    vector.len()
                ),
            ));
        }
        Ok(vector)
    }

    fn fallback(&self) -> Vec<f32> {
        vec![0.0; self.dimensions()]
    }

    fn model_id(&self) -> &str {
        IEmbeddingProvider::model_id(self)
    }

    fn width(&self) -> usize {
        self.dimensions()
    }

    fn component(&self) -> &'static str {
        "embeddings"
    }
}

/// Result of one adapter call.
#[derive(Debug, Clone, PartialEq)]
pub enum Scored<T> {
    Ok(T),
    /// Permanent failure; `value` is the provider's safe default.
    Degraded { value: T, reason: String },
    /// Transient failures exhausted the retry budget.
    Failed { attempts: u32, reason: String },
}

impl<T> Scored<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }
}

/// Adapter around a shared provider.
pub struct ProviderAdapter<P: ?Sized> {
    provider: Arc<P>,
    policy: RetryPolicy,
    truncator: Truncator,
}

pub type SentimentAdapter = ProviderAdapter<dyn ISentimentProvider>;
pub type EmbeddingAdapter = ProviderAdapter<dyn IEmbeddingProvider>;

impl<P: ?Sized> Clone for ProviderAdapter<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            policy: self.policy,
            truncator: self.truncator,
        }
    }
}

impl<P: ScoringCall + ?Sized> ProviderAdapter<P> {
    pub fn new(provider: Arc<P>, policy: RetryPolicy, truncator: Truncator) -> Self {
        Self {
            provider,
            policy,
            truncator,
        }
    }

    pub fn from_config(provider: Arc<P>, config: &ProviderConfig) -> Self {
        Self::new(
            provider,
            RetryPolicy::from_config(config),
            Truncator::new(config.max_text_chars),
        )
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    pub fn model_id(&self) -> &str {
        self.provider.model_id()
    }

    pub fn width(&self) -> usize {
        self.provider.width()
    }

    pub fn component(&self) -> &'static str {
        self.provider.component()
    }

    pub fn fallback(&self) -> P::Output {
        self.provider.fallback()
    }

    /// The exact text that would be sent for `text`.
    pub fn truncate<'a>(&self, text: &'a str) -> &'a str {
        self.truncator.apply(text)
    }

    /// Score one text, retrying transient failures.
    pub fn score(&self, text: &str) -> Scored<P::Output> {
        let input = self.truncator.apply(text);
        let started = Instant::now();
        let mut attempts = 0u32;
        let mut last_reason = String::new();

        while attempts < self.policy.max_attempts {
            if attempts > 0 {
                let delay = self.policy.backoff(attempts);
                if started.elapsed() + delay > self.policy.request_timeout {
                    debug!(
                        component = self.component(),
                        attempts, "request deadline reached, not retrying"
                    );
                    break;
                }
                debug!(
                    component = self.component(),
                    attempt = attempts + 1,
                    max_attempts = self.policy.max_attempts,
                    ?delay,
                    "retrying provider call"
                );
                std::thread::sleep(delay);
            }
            attempts += 1;

            match self.provider.call(input) {
                Ok(value) => return Scored::Ok(value),
                Err(e) if e.is_transient() => {
                    warn!(
                        component = self.component(),
                        model = self.model_id(),
                        attempt = attempts,
                        error = %e,
                        "transient provider failure"
                    );
                    last_reason = e.reason().to_string();
                }
                Err(e) => {
                    warn!(
                        component = self.component(),
                        model = self.model_id(),
                        error = %e,
                        "permanent provider failure, using safe default"
                    );
                    return Scored::Degraded {
                        value: self.provider.fallback(),
                        reason: e.reason().to_string(),
                    };
                }
            }
        }

        warn!(
            component = self.component(),
            model = self.model_id(),
            attempts,
            reason = %last_reason,
            "provider retries exhausted"
        );
        Scored::Failed {
            attempts,
            reason: last_reason,
        }
    }
}
