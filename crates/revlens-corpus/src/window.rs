use revlens_core::models::Record;
use revlens_core::Segmented;
use revlens_index::{EmbeddingIndex, SentimentIndex};

/// The loaded window and both derived indices, always the same length.
///
/// Published whole behind an `Arc`; readers never see a half-applied step.
#[derive(Debug, Clone)]
pub struct WindowSnapshot {
    pub records: Segmented<Record>,
    pub sentiment: SentimentIndex,
    pub embeddings: EmbeddingIndex,
}

impl WindowSnapshot {
    pub fn empty(sentiment: SentimentIndex, embeddings: EmbeddingIndex) -> Self {
        Self {
            records: Segmented::new(),
            sentiment,
            embeddings,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, pos: usize) -> Option<&Record> {
        self.records.get(pos)
    }

    /// Whether window, sentiment and embeddings line up record by record.
    pub fn is_aligned(&self) -> bool {
        self.sentiment.version() == self.records.len()
            && self.embeddings.version() == self.records.len()
            && self
                .records
                .iter()
                .zip(self.sentiment.iter())
                .zip(self.embeddings.iter())
                .all(|((r, s), e)| r.id == s.record_id && r.id == e.record_id)
    }
}
