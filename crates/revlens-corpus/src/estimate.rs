//! Advisory time estimates for growing the window.

use std::time::Duration;

/// Seconds needed to score `records_to_add` records at `per_record_seconds`.
pub fn estimate_seconds(records_to_add: usize, per_record_seconds: f64) -> f64 {
    records_to_add as f64 * per_record_seconds.max(0.0)
}

/// Exponentially weighted moving average of per-record build latency.
#[derive(Debug, Clone)]
pub struct LatencyTracker {
    smoothing: f64,
    assumed: f64,
    average: Option<f64>,
}

impl LatencyTracker {
    /// `smoothing` is the weight of the newest observation; `assumed` is used
    /// until the first observation arrives.
    pub fn new(smoothing: f64, assumed: Duration) -> Self {
        Self {
            smoothing: smoothing.clamp(0.0, 1.0),
            assumed: assumed.as_secs_f64(),
            average: None,
        }
    }

    /// Record that `records` records took `elapsed` to score.
    pub fn observe(&mut self, elapsed: Duration, records: usize) {
        if records == 0 {
            return;
        }
        let sample = elapsed.as_secs_f64() / records as f64;
        self.average = Some(match self.average {
            Some(avg) => self.smoothing * sample + (1.0 - self.smoothing) * avg,
            None => sample,
        });
    }

    pub fn per_record_seconds(&self) -> f64 {
        self.average.unwrap_or(self.assumed)
    }
}
