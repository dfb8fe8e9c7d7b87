use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::EntryStatus;

/// Embedding index entry for one record.
///
/// All entries of one index share `model_id` and vector length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingEntry {
    pub record_id: u64,
    pub vector: Vec<f32>,
    pub model_id: Arc<str>,
    pub status: EntryStatus,
}

impl EmbeddingEntry {
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}
