//! In-memory cache of query embeddings using moka.
//!
//! Keys are blake3 hashes of the model id and the truncated query text, so a
//! model change never serves a stale vector.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

pub struct QueryCache {
    cache: Cache<String, Arc<Vec<f32>>>,
}

impl QueryCache {
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_idle(Duration::from_secs(3600))
            .build();
        Self { cache }
    }

    /// Cache key for `query` embedded by `model_id`.
    pub fn key(model_id: &str, query: &str) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(model_id.as_bytes());
        hasher.update(&[0]);
        hasher.update(query.as_bytes());
        hasher.finalize().to_hex().to_string()
    }

    pub fn get(&self, key: &str) -> Option<Arc<Vec<f32>>> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: String, vector: Arc<Vec<f32>>) {
        self.cache.insert(key, vector);
    }

    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}
