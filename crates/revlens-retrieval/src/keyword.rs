//! Case-insensitive substring search, the baseline next to semantic search.

use revlens_core::models::Record;
use revlens_core::Segmented;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordHit {
    pub record_id: u64,
    pub position: usize,
}

/// The first `k` records, in corpus order, whose text contains `query`
/// ignoring case. An empty query matches nothing.
pub fn search_keyword(records: &Segmented<Record>, query: &str, k: usize) -> Vec<KeywordHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() || k == 0 {
        return Vec::new();
    }
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.text.to_lowercase().contains(&needle))
        .take(k)
        .map(|(position, r)| KeywordHit {
            record_id: r.id,
            position,
        })
        .collect()
}
