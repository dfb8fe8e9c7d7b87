//! Semantic search: embed the query, rank scored rows by cosine similarity.

use std::cmp::Ordering;
use std::sync::Arc;

use rayon::prelude::*;
use revlens_core::errors::RetrievalError;
use revlens_core::models::{EmbeddingEntry, EntryStatus};
use revlens_index::EmbeddingIndex;
use revlens_providers::{EmbeddingAdapter, Scored};
use serde::Serialize;
use tracing::{debug, warn};

use crate::query_cache::QueryCache;
use crate::similarity::cosine_similarity;

/// One ranked result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub record_id: u64,
    /// Position of the record in the window.
    pub position: usize,
    pub similarity: f64,
}

pub struct SemanticSearcher {
    adapter: EmbeddingAdapter,
    cache: QueryCache,
}

impl SemanticSearcher {
    pub fn new(adapter: EmbeddingAdapter, query_cache_size: u64) -> Self {
        Self {
            adapter,
            cache: QueryCache::new(query_cache_size),
        }
    }

    pub fn adapter(&self) -> &EmbeddingAdapter {
        &self.adapter
    }

    pub fn query_cache(&self) -> &QueryCache {
        &self.cache
    }

    /// The `k` scored rows most similar to `query`, best first. Ties go to the
    /// lower record id. Pending and degraded rows are never returned.
    ///
    /// `Ok(empty)` means nothing to rank; `Err(Unavailable)` means the query
    /// could not be embedded.
    pub fn search(
        &self,
        index: &EmbeddingIndex,
        query: &str,
        k: usize,
    ) -> Result<Vec<SearchHit>, RetrievalError> {
        let rows: Vec<(usize, &EmbeddingEntry)> = index
            .iter()
            .enumerate()
            .filter(|(_, e)| e.status == EntryStatus::Scored)
            .collect();
        if k == 0 || rows.is_empty() {
            return Ok(Vec::new());
        }

        let vector = self.embed_query(query)?;
        if vector.len() != index.dimension() {
            return Err(RetrievalError::DimensionMismatch {
                expected: index.dimension(),
                actual: vector.len(),
            });
        }

        let mut hits: Vec<SearchHit> = rows
            .par_iter()
            .map(|(position, entry)| SearchHit {
                record_id: entry.record_id,
                position: *position,
                similarity: cosine_similarity(&vector, &entry.vector),
            })
            .collect();

        let k = k.min(hits.len());
        if k < hits.len() {
            hits.select_nth_unstable_by(k - 1, rank);
            hits.truncate(k);
        }
        hits.sort_by(rank);

        debug!(
            candidates = rows.len(),
            returned = hits.len(),
            "semantic search complete"
        );
        Ok(hits)
    }

    /// Embed a query through the adapter, with caching. Degraded results are
    /// not cached and are reported as unavailable.
    pub fn embed_query(&self, query: &str) -> Result<Arc<Vec<f32>>, RetrievalError> {
        let key = QueryCache::key(self.adapter.model_id(), self.adapter.truncate(query));
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }
        match self.adapter.score(query) {
            Scored::Ok(vector) => {
                let vector = Arc::new(vector);
                self.cache.insert(key, Arc::clone(&vector));
                Ok(vector)
            }
            Scored::Degraded { reason, .. } => {
                warn!(%reason, "query embedding degraded");
                Err(RetrievalError::Unavailable { reason })
            }
            Scored::Failed { attempts, reason } => {
                warn!(attempts, %reason, "query embedding failed");
                Err(RetrievalError::Unavailable {
                    reason: format!("{reason} after {attempts} attempts"),
                })
            }
        }
    }
}

/// Similarity descending, then record id ascending.
fn rank(a: &SearchHit, b: &SearchHit) -> Ordering {
    b.similarity
        .total_cmp(&a.similarity)
        .then_with(|| a.record_id.cmp(&b.record_id))
}
