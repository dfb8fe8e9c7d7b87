//! # revlens-index
//!
//! Derived indices aligned position-by-position with the corpus window.
//!
//! - [`DerivedIndex`]: append-only segmented entries plus model id and dimension.
//! - [`IndexBuilder`]: incremental build through the provider adapter, with
//!   per-record degradation, chunk-level outage detection, and pending retry.
//! - [`BuildProgress`]: pull-based progress with ETA.

pub mod builder;
pub mod derived_index;
pub mod entry;
pub mod progress;

pub use builder::{BuildOutcome, IndexBuilder, Reuse};
pub use derived_index::{DerivedIndex, StatusCounts};
pub use entry::{IndexEntry, IndexKind};
pub use progress::{BuildProgress, BuildStatus, ProgressSnapshot};

use revlens_core::models::{EmbeddingEntry, SentimentEntry};

pub type SentimentIndex = DerivedIndex<SentimentEntry>;
pub type EmbeddingIndex = DerivedIndex<EmbeddingEntry>;
pub type SentimentBuilder = IndexBuilder<SentimentEntry>;
pub type EmbeddingBuilder = IndexBuilder<EmbeddingEntry>;
