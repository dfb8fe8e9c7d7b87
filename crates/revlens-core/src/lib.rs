//! # revlens-core
//!
//! Foundation crate for the revlens review pipeline.
//! Defines records, derived-index entries, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod segmented;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::RevlensConfig;
pub use errors::{RevlensError, RevlensResult};
pub use models::{
    EmbeddingEntry, EntryStatus, Record, SentimentComponents, SentimentEntry, SentimentLabel,
    SentimentScores,
};
pub use segmented::Segmented;
