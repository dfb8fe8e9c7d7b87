//! # revlens-retrieval
//!
//! Semantic top-k search over an [`EmbeddingIndex`](revlens_index::EmbeddingIndex)
//! and a case-insensitive keyword baseline over the loaded records.

pub mod keyword;
pub mod query_cache;
pub mod searcher;
pub mod similarity;

pub use keyword::{search_keyword, KeywordHit};
pub use query_cache::QueryCache;
pub use searcher::{SearchHit, SemanticSearcher};
pub use similarity::cosine_similarity;
