//! # revlens-providers
//!
//! Uniform access to sentiment and embedding providers.
//!
//! [`ProviderAdapter`] wraps either provider kind with deterministic input
//! truncation, bounded retries with exponential backoff for transient failures,
//! and degradation to a safe default on permanent failures. The `providers`
//! module holds the concrete implementations and the config-driven registry.

pub mod adapter;
pub mod providers;

pub use adapter::{
    EmbeddingAdapter, ProviderAdapter, RetryPolicy, Scored, ScoringCall, SentimentAdapter,
    Truncator,
};
pub use providers::{
    create_embedding_provider, create_sentiment_provider, ApiEmbeddingProvider,
    HashedTfEmbedder, LexiconScorer,
};
