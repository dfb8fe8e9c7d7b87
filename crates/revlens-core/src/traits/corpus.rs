use crate::errors::CorpusError;
use crate::models::Record;

/// Ordered, append-only source of records.
pub trait ICorpusSource: Send + Sync {
    /// Number of records that can currently be loaded.
    fn total_available(&self) -> usize;

    /// Records at positions `start..end`, in corpus order.
    fn fetch(&self, start: usize, end: usize) -> Result<Vec<Record>, CorpusError>;
}
