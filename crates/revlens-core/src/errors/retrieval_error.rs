/// Retrieval subsystem errors.
///
/// An empty result is not an error; these mean the search could not run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RetrievalError {
    #[error("semantic search temporarily unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("query dimension mismatch: index has {expected}, query has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
