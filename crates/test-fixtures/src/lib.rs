//! Test fixtures for the revlens workspace: fixture corpora, record builders,
//! and mock scoring providers with controllable failure behavior.

pub mod mocks;

pub use mocks::{
    AlwaysTransient, CountingEmbedder, CountingSentiment, FixedVectorEmbedder, Flaky, Gate,
    Outage, PermanentFailing,
};

use std::path::PathBuf;

use chrono::NaiveDate;
use revlens_core::models::Record;

/// Directory holding the fixture data files.
pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// Load a JSON Lines fixture into records.
///
/// # Panics
/// Panics if the file doesn't exist or a line can't be deserialized.
pub fn load_records(relative_path: &str) -> Vec<Record> {
    let path = fixture_path(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .enumerate()
        .map(|(i, line)| {
            serde_json::from_str(line).unwrap_or_else(|e| {
                panic!("Failed to parse line {} of {}: {}", i + 1, path.display(), e)
            })
        })
        .collect()
}

/// Records with ids `1..=texts.len()`, one day apart starting 2021-01-01.
pub fn records_from_texts(texts: &[&str]) -> Vec<Record> {
    let start = base_date();
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            Record::new(
                i as u64 + 1,
                *text,
                start + chrono::Days::new(i as u64),
                format!("guest{}", i + 1),
            )
        })
        .collect()
}

/// `n` synthetic records cycling through a small vocabulary, spread over months.
pub fn synthetic_records(n: usize) -> Vec<Record> {
    const PHRASES: [&str; 6] = [
        "great host and a lovely clean apartment",
        "not good, the room was dirty and noisy",
        "ok stay near the station",
        "amazing view, friendly host, would come back",
        "terrible check-in experience and rude staff",
        "the flat was fine for a short trip",
    ];
    let start = base_date();
    (0..n)
        .map(|i| {
            Record::new(
                i as u64 + 1,
                format!("{} #{}", PHRASES[i % PHRASES.len()], i),
                start + chrono::Days::new((i as u64 * 9) % 730),
                format!("guest{}", i % 37),
            )
        })
        .collect()
}

/// A fresh temporary directory for cache files.
pub fn temp_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap_or_else(|e| panic!("Failed to create temp dir: {e}"))
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or_default()
}
