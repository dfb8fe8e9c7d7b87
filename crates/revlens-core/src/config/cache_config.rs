use serde::{Deserialize, Serialize};

use super::defaults;

/// Index snapshot cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Directory holding `sentiment.rvls` and `embeddings.rvls`.
    pub dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::DEFAULT_CACHE_ENABLED,
            dir: defaults::DEFAULT_CACHE_DIR.to_string(),
        }
    }
}
