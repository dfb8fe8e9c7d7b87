use super::{BuildError, CacheError, ConfigError, CorpusError, ProviderError, RetrievalError};

/// Top-level error aggregating subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum RevlensError {
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("build error: {0}")]
    Build(#[from] BuildError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("a grow sequence is already in progress")]
    GrowInProgress,
}

impl RevlensError {
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Provider(ProviderError::Transient { .. }) => "PROVIDER_TRANSIENT",
            Self::Provider(ProviderError::Permanent { .. }) => "PROVIDER_PERMANENT",
            Self::Build(_) => "BUILD_FAILURE",
            Self::Cache(CacheError::Corrupt { .. }) => "CACHE_CORRUPT",
            Self::Cache(CacheError::Io { .. }) => "CACHE_IO",
            Self::Retrieval(_) => "RETRIEVAL_UNAVAILABLE",
            Self::Corpus(_) => "CORPUS_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::InvalidRequest { .. } => "INVALID_REQUEST",
            Self::GrowInProgress => "GROW_IN_PROGRESS",
        }
    }
}

pub type RevlensResult<T> = Result<T, RevlensError>;
