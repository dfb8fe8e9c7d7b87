use serde::{Deserialize, Serialize};

use super::defaults;

/// Sentiment scoring configuration.
///
/// Label thresholds are fixed (see `constants::POSITIVE_THRESHOLD`) so that labels
/// stay comparable across snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// Sentiment provider: "lexicon".
    pub provider: String,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_SENTIMENT_PROVIDER.to_string(),
        }
    }
}
