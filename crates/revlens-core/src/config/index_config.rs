use serde::{Deserialize, Serialize};

use super::defaults;

/// Derived-index builder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Records per progress chunk. A chunk in which every record fails
    /// transiently stops the build.
    pub chunk_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            chunk_size: defaults::DEFAULT_CHUNK_SIZE,
        }
    }
}
