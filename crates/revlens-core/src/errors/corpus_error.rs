/// Corpus source and corpus manager errors.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("corpus I/O failed: {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("corpus parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("duplicate record id {id}")]
    DuplicateId { id: u64 },

    #[error("range {start}..{end} outside corpus of {available} records")]
    OutOfRange {
        start: usize,
        end: usize,
        available: usize,
    },
}
