use crate::errors::ProviderError;
use crate::models::SentimentScores;

/// Sentiment scoring provider.
pub trait ISentimentProvider: Send + Sync {
    /// Score a single text.
    fn score(&self, text: &str) -> Result<SentimentScores, ProviderError>;

    /// Identity of the underlying model; snapshots built with a different id are
    /// never reused.
    fn model_id(&self) -> &str;
}
