/// Index snapshot cache errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("snapshot corrupt: {path}: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("snapshot I/O failed: {path}: {reason}")]
    Io { path: String, reason: String },
}

impl CacheError {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}
