/// A single record that could not be scored after the adapter's retries.
///
/// Never aborts a batch: the entry is kept as `pending`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("record {record_id} could not be scored after {attempts} attempts: {reason}")]
pub struct BuildFailure {
    pub record_id: u64,
    pub attempts: u32,
    pub reason: String,
}

/// Batch-level build errors. Carried next to a partial index, not instead of it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("provider unreachable for chunk at {chunk_start} ({chunk_len} records): {reason}")]
    ProviderUnreachable {
        chunk_start: usize,
        chunk_len: usize,
        reason: String,
    },
}
