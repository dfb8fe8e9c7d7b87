//! # revlens-cache
//!
//! Persists derived indices as binary snapshots and loads them back.
//!
//! Snapshots are written to a temp file in the cache directory and renamed
//! over the previous one, so a crash mid-save leaves the old snapshot intact.
//! Loading validates the whole file (magic, format version, kind, lengths,
//! blake3 checksum); anything off is reported as corrupt, never half-loaded.

pub mod format;
pub mod freshness;
pub mod store;

pub use format::{CacheSnapshot, SnapshotMeta, FORMAT_VERSION, MAGIC};
pub use freshness::{evaluate_freshness, Freshness};
pub use store::{snapshot_file_name, IndexCache};
