//! Ties each entry type to its provider kind and its flat snapshot layout.

use std::sync::Arc;

use revlens_core::constants::SENTIMENT_STRIDE;
use revlens_core::models::{EmbeddingEntry, EntryStatus, SentimentEntry, SentimentScores};
use revlens_core::traits::{IEmbeddingProvider, ISentimentProvider};
use revlens_providers::ScoringCall;

/// Which derived index an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    Sentiment,
    Embedding,
}

impl IndexKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sentiment => "sentiment",
            Self::Embedding => "embedding",
        }
    }
}

/// An entry of a derived index.
pub trait IndexEntry: Clone + Send + Sync + 'static {
    type Provider: ScoringCall + ?Sized;

    const KIND: IndexKind;

    fn record_id(&self) -> u64;

    fn status(&self) -> EntryStatus;

    fn from_output(
        record_id: u64,
        output: <Self::Provider as ScoringCall>::Output,
        status: EntryStatus,
        model_id: &Arc<str>,
    ) -> Self;

    /// Append this entry's values to a flat payload.
    fn write_values(&self, out: &mut Vec<f32>);

    /// Rebuild an entry from `values` written by [`IndexEntry::write_values`].
    fn from_values(record_id: u64, status: EntryStatus, values: &[f32], model_id: &Arc<str>)
        -> Self;
}

impl IndexEntry for SentimentEntry {
    type Provider = dyn ISentimentProvider;

    const KIND: IndexKind = IndexKind::Sentiment;

    fn record_id(&self) -> u64 {
        self.record_id
    }

    fn status(&self) -> EntryStatus {
        self.status
    }

    fn from_output(
        record_id: u64,
        output: SentimentScores,
        status: EntryStatus,
        _model_id: &Arc<str>,
    ) -> Self {
        SentimentEntry::new(record_id, output, status)
    }

    fn write_values(&self, out: &mut Vec<f32>) {
        let s = self.scores();
        out.extend_from_slice(&[s.compound, s.positive, s.neutral, s.negative, s.subjectivity]);
    }

    fn from_values(
        record_id: u64,
        status: EntryStatus,
        values: &[f32],
        _model_id: &Arc<str>,
    ) -> Self {
        let v = |i: usize| values.get(i).copied().unwrap_or(0.0);
        debug_assert_eq!(values.len(), SENTIMENT_STRIDE);
        let scores = SentimentScores {
            compound: v(0),
            positive: v(1),
            neutral: v(2),
            negative: v(3),
            subjectivity: v(4),
        };
        SentimentEntry::new(record_id, scores, status)
    }
}

impl IndexEntry for EmbeddingEntry {
    type Provider = dyn IEmbeddingProvider;

    const KIND: IndexKind = IndexKind::Embedding;

    fn record_id(&self) -> u64 {
        self.record_id
    }

    fn status(&self) -> EntryStatus {
        self.status
    }

    fn from_output(
        record_id: u64,
        output: Vec<f32>,
        status: EntryStatus,
        model_id: &Arc<str>,
    ) -> Self {
        EmbeddingEntry {
            record_id,
            vector: output,
            model_id: Arc::clone(model_id),
            status,
        }
    }

    fn write_values(&self, out: &mut Vec<f32>) {
        out.extend_from_slice(&self.vector);
    }

    fn from_values(
        record_id: u64,
        status: EntryStatus,
        values: &[f32],
        model_id: &Arc<str>,
    ) -> Self {
        EmbeddingEntry {
            record_id,
            vector: values.to_vec(),
            model_id: Arc::clone(model_id),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_values_roundtrip() {
        let model: Arc<str> = Arc::from("lexicon-v1");
        let entry = SentimentEntry::new(
            9,
            SentimentScores {
                compound: -0.4,
                positive: 0.1,
                neutral: 0.5,
                negative: 0.4,
                subjectivity: 0.3,
            },
            EntryStatus::Scored,
        );
        let mut values = Vec::new();
        entry.write_values(&mut values);
        assert_eq!(values.len(), SENTIMENT_STRIDE);
        let back = SentimentEntry::from_values(9, EntryStatus::Scored, &values, &model);
        assert_eq!(back, entry);
    }
}
