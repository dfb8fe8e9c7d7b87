//! Build progress tracking.
//!
//! Pull-based: the builder updates counters after every chunk, and callers
//! read a [`ProgressSnapshot`] whenever they like.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    Idle,
    InProgress,
    Complete,
    Failed,
}

impl BuildStatus {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Idle,
            1 => Self::InProgress,
            2 => Self::Complete,
            _ => Self::Failed,
        }
    }
}

/// Thread-safe progress of the current build.
#[derive(Debug)]
pub struct BuildProgress {
    total: AtomicU64,
    processed: AtomicU64,
    failed: AtomicU64,
    degraded: AtomicU64,
    status: AtomicU8,
    started_at: Mutex<Option<Instant>>,
}

impl Default for BuildProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildProgress {
    pub fn new() -> Self {
        Self {
            total: AtomicU64::new(0),
            processed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            degraded: AtomicU64::new(0),
            status: AtomicU8::new(0),
            started_at: Mutex::new(None),
        }
    }

    /// Reset counters for a build of `total` records.
    pub fn start(&self, total: u64) {
        self.total.store(total, Ordering::Relaxed);
        self.processed.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
        self.degraded.store(0, Ordering::Relaxed);
        self.status.store(1, Ordering::Relaxed);
        if let Ok(mut started) = self.started_at.lock() {
            *started = Some(Instant::now());
        }
    }

    /// Record a completed chunk.
    pub fn record_chunk(&self, processed: u64, failed: u64, degraded: u64) {
        self.processed.fetch_add(processed, Ordering::Relaxed);
        self.failed.fetch_add(failed, Ordering::Relaxed);
        self.degraded.fetch_add(degraded, Ordering::Relaxed);
    }

    pub fn mark_complete(&self) {
        self.status.store(2, Ordering::Relaxed);
    }

    pub fn mark_failed(&self) {
        self.status.store(3, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let total = self.total.load(Ordering::Relaxed);
        let processed = self.processed.load(Ordering::Relaxed);
        let remaining = total.saturating_sub(processed);
        let status = BuildStatus::from_u8(self.status.load(Ordering::Relaxed));

        let started = self.started_at.lock().ok().and_then(|s| *s);
        let eta_seconds = match (status, started) {
            (BuildStatus::InProgress, Some(start)) if processed > 0 => {
                let rate = processed as f64 / start.elapsed().as_secs_f64().max(1e-9);
                Some(remaining as f64 / rate)
            }
            _ => None,
        };

        ProgressSnapshot {
            total,
            processed,
            failed: self.failed.load(Ordering::Relaxed),
            degraded: self.degraded.load(Ordering::Relaxed),
            remaining,
            status,
            eta_seconds,
        }
    }
}

/// Immutable view of build progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub total: u64,
    pub processed: u64,
    pub failed: u64,
    pub degraded: u64,
    pub remaining: u64,
    pub status: BuildStatus,
    pub eta_seconds: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_idle() {
        let snap = BuildProgress::new().snapshot();
        assert_eq!(snap.status, BuildStatus::Idle);
        assert_eq!(snap.total, 0);
        assert_eq!(snap.eta_seconds, None);
    }

    #[test]
    fn chunks_accumulate() {
        let progress = BuildProgress::new();
        progress.start(10);
        progress.record_chunk(4, 1, 0);
        progress.record_chunk(4, 0, 1);

        let snap = progress.snapshot();
        assert_eq!(snap.processed, 8);
        assert_eq!(snap.failed, 1);
        assert_eq!(snap.degraded, 1);
        assert_eq!(snap.remaining, 2);
        assert_eq!(snap.status, BuildStatus::InProgress);
        assert!(snap.eta_seconds.is_some());
    }

    #[test]
    fn start_resets_counters() {
        let progress = BuildProgress::new();
        progress.start(3);
        progress.record_chunk(3, 0, 0);
        progress.mark_complete();
        progress.start(5);

        let snap = progress.snapshot();
        assert_eq!(snap.processed, 0);
        assert_eq!(snap.total, 5);
        assert_eq!(snap.status, BuildStatus::InProgress);
    }
}
