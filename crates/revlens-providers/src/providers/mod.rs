//! Concrete providers and the config-driven registry.
//!
//! Embedding priority: HTTP API (when configured and a key is present), then
//! the hashed TF embedder, which is always available.

pub mod api_provider;
pub mod hashed_tf;
pub mod lexicon;

pub use api_provider::ApiEmbeddingProvider;
pub use hashed_tf::HashedTfEmbedder;
pub use lexicon::LexiconScorer;

use std::sync::Arc;

use revlens_core::config::{ProviderConfig, SentimentConfig};
use revlens_core::traits::{IEmbeddingProvider, ISentimentProvider};
use tracing::{info, warn};

/// Create the configured embedding provider, falling back to the hashed embedder.
pub fn create_embedding_provider(config: &ProviderConfig) -> Arc<dyn IEmbeddingProvider> {
    match config.embedding_provider.as_str() {
        "api" => {
            let key = std::env::var(&config.api.api_key_env)
                .ok()
                .filter(|k| !k.trim().is_empty());
            match key {
                Some(key) => {
                    match ApiEmbeddingProvider::new(&config.api, key, config.attempt_timeout()) {
                        Ok(p) => {
                            info!(provider = "api", model = %config.api.model, "embedding provider ready");
                            return Arc::new(p);
                        }
                        Err(e) => {
                            warn!(error = %e, "API embedding provider failed to initialize, falling back");
                        }
                    }
                }
                None => {
                    warn!(
                        env = %config.api.api_key_env,
                        "API embedding provider configured but no key set, falling back"
                    );
                }
            }
            hashed(config)
        }
        "hashed-tf" => hashed(config),
        other => {
            warn!(provider = other, "unknown embedding provider, using hashed-tf");
            hashed(config)
        }
    }
}

fn hashed(config: &ProviderConfig) -> Arc<dyn IEmbeddingProvider> {
    info!(provider = "hashed-tf", dimensions = config.embedding_dimensions, "using hashed TF embedder");
    Arc::new(HashedTfEmbedder::new(config.embedding_dimensions))
}

/// Create the configured sentiment provider.
pub fn create_sentiment_provider(config: &SentimentConfig) -> Arc<dyn ISentimentProvider> {
    if config.provider != "lexicon" {
        warn!(provider = %config.provider, "unknown sentiment provider, using lexicon");
    }
    Arc::new(LexiconScorer::new())
}
