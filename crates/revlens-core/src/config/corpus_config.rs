use serde::{Deserialize, Serialize};

use super::defaults;

/// Corpus manager configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Path to a JSON Lines corpus file.
    pub source_path: Option<String>,
    /// Records added per grow step.
    pub step_size: usize,
    /// Window size requested when the service starts.
    pub initial_window: usize,
    /// Advance the window to a partially built step instead of discarding it.
    pub accept_partial_builds: bool,
    /// Per-record latency assumed before any build has been timed.
    pub assumed_per_record_ms: f64,
    /// Weight of the newest observation in the latency moving average.
    pub latency_smoothing: f64,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            source_path: None,
            step_size: defaults::DEFAULT_STEP_SIZE,
            initial_window: defaults::DEFAULT_INITIAL_WINDOW,
            accept_partial_builds: defaults::DEFAULT_ACCEPT_PARTIAL_BUILDS,
            assumed_per_record_ms: defaults::DEFAULT_ASSUMED_PER_RECORD_MS,
            latency_smoothing: defaults::DEFAULT_LATENCY_SMOOTHING,
        }
    }
}
