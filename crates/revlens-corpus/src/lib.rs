//! # revlens-corpus
//!
//! Owns the ordered window of loaded records and grows it in steps. After each
//! step both derived indices are extended and the window, sentiment index and
//! embedding index are published together as one [`WindowSnapshot`].

pub mod estimate;
pub mod manager;
pub mod sources;
pub mod window;

pub use estimate::{estimate_seconds, LatencyTracker};
pub use manager::{CorpusManager, GrowPhase, GrowProgress, GrowReport, WriterGuard};
pub use sources::{InMemoryCorpus, JsonlCorpus};
pub use window::WindowSnapshot;
