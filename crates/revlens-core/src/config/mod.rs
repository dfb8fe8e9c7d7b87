pub mod cache_config;
pub mod corpus_config;
pub mod defaults;
pub mod index_config;
pub mod observability_config;
pub mod provider_config;
pub mod retrieval_config;
pub mod revlens_config;
pub mod sentiment_config;

pub use cache_config::CacheConfig;
pub use corpus_config::CorpusConfig;
pub use index_config::IndexConfig;
pub use observability_config::ObservabilityConfig;
pub use provider_config::{ApiProviderConfig, ProviderConfig};
pub use retrieval_config::RetrievalConfig;
pub use revlens_config::{RevlensConfig, CONFIG_FILE_NAME};
pub use sentiment_config::SentimentConfig;
