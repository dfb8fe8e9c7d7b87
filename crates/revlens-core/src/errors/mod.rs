//! Error handling for revlens.
//! One error enum per subsystem, `thiserror` only.

pub mod build_error;
pub mod cache_error;
pub mod config_error;
pub mod corpus_error;
pub mod provider_error;
pub mod retrieval_error;
pub mod revlens_error;

pub use build_error::{BuildError, BuildFailure};
pub use cache_error::CacheError;
pub use config_error::ConfigError;
pub use corpus_error::CorpusError;
pub use provider_error::ProviderError;
pub use retrieval_error::RetrievalError;
pub use revlens_error::{RevlensError, RevlensResult};
