//! Corpus manager: the window-growing state machine.
//!
//! ```text
//! Initial ──grow(target > size)──▶ Loading { target, step_target } ──▶ Ready { size }
//!                                        ▲            │
//!                                        └── step ────┘
//! ```
//!
//! Growth is single-writer. Each step extends both indices over the new
//! records and publishes a fresh `Arc<WindowSnapshot>`; cancellation is
//! checked between steps only.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use revlens_cache::IndexCache;
use revlens_core::config::CorpusConfig;
use revlens_core::errors::{BuildError, BuildFailure, RevlensError, RevlensResult};
use revlens_core::models::{DegradationEvent, EmbeddingEntry, Record, SentimentEntry};
use revlens_core::traits::{Cancellable, CancellationToken, ICorpusSource};
use revlens_index::{
    BuildOutcome, DerivedIndex, EmbeddingBuilder, IndexBuilder, IndexEntry, ProgressSnapshot,
    SentimentBuilder,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::estimate::{estimate_seconds, LatencyTracker};
use crate::window::WindowSnapshot;

/// Where the manager is in its grow cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GrowPhase {
    Initial,
    Loading { target: usize, step_target: usize },
    Ready { size: usize },
}

/// Build progress of both indices for the step in flight.
#[derive(Debug, Clone, Serialize)]
pub struct GrowProgress {
    pub sentiment: ProgressSnapshot,
    pub embeddings: ProgressSnapshot,
}

/// Summary of one grow sequence or pending retry.
#[derive(Debug, Clone, Default)]
pub struct GrowReport {
    pub start_size: usize,
    pub final_size: usize,
    /// Requested target after clamping to the corpus size.
    pub target: usize,
    pub steps: usize,
    pub cancelled: bool,
    pub error: Option<BuildError>,
    pub failures: Vec<BuildFailure>,
    pub events: Vec<DegradationEvent>,
}

/// Held while a writer (grow or pending retry) runs. Dropping it releases
/// the writer slot. Owns its flag, so it can move to a worker thread.
#[derive(Debug)]
pub struct WriterGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for WriterGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

pub struct CorpusManager {
    source: Arc<dyn ICorpusSource>,
    sentiment: SentimentBuilder,
    embeddings: EmbeddingBuilder,
    cache: Option<IndexCache>,
    config: CorpusConfig,
    current: RwLock<Arc<WindowSnapshot>>,
    phase: RwLock<GrowPhase>,
    writer: Arc<AtomicBool>,
    cancel: CancellationToken,
    latency: Mutex<LatencyTracker>,
    last_error: RwLock<Option<String>>,
}

impl CorpusManager {
    pub fn new(
        source: Arc<dyn ICorpusSource>,
        sentiment: SentimentBuilder,
        embeddings: EmbeddingBuilder,
        cache: Option<IndexCache>,
        mut config: CorpusConfig,
    ) -> Self {
        config.step_size = config.step_size.max(1);
        let empty = WindowSnapshot::empty(sentiment.empty_index(), embeddings.empty_index());
        let latency = LatencyTracker::new(
            config.latency_smoothing,
            Duration::from_secs_f64(config.assumed_per_record_ms.max(0.0) / 1000.0),
        );
        Self {
            source,
            sentiment,
            embeddings,
            cache,
            config,
            current: RwLock::new(Arc::new(empty)),
            phase: RwLock::new(GrowPhase::Initial),
            writer: Arc::new(AtomicBool::new(false)),
            cancel: CancellationToken::new(),
            latency: Mutex::new(latency),
            last_error: RwLock::new(None),
        }
    }

    /// The current published window. Cheap; readers work on the returned
    /// `Arc` without holding any lock.
    pub fn snapshot(&self) -> Arc<WindowSnapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn window_size(&self) -> usize {
        self.snapshot().len()
    }

    pub fn total_available(&self) -> usize {
        self.source.total_available()
    }

    pub fn phase(&self) -> GrowPhase {
        *self.phase.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_growing(&self) -> bool {
        self.writer.load(Ordering::SeqCst)
    }

    pub fn progress(&self) -> GrowProgress {
        GrowProgress {
            sentiment: self.sentiment.progress().snapshot(),
            embeddings: self.embeddings.progress().snapshot(),
        }
    }

    /// Reason the last grow stopped early, if it did.
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn sentiment_builder(&self) -> &SentimentBuilder {
        &self.sentiment
    }

    pub fn embedding_builder(&self) -> &EmbeddingBuilder {
        &self.embeddings
    }

    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    /// Advisory seconds to grow the window to `target`.
    pub fn estimate_for(&self, target: usize) -> f64 {
        let to_add = target
            .min(self.total_available())
            .saturating_sub(self.window_size());
        let per_record = self
            .latency
            .lock()
            .map(|t| t.per_record_seconds())
            .unwrap_or_else(|e| e.into_inner().per_record_seconds());
        estimate_seconds(to_add, per_record)
    }

    /// Claim the writer slot. `None` if a grow or retry is already running.
    /// Clears any earlier cancellation request.
    pub fn try_begin_write(&self) -> Option<WriterGuard> {
        self.writer
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()?;
        self.cancel.reset();
        Some(WriterGuard {
            flag: Arc::clone(&self.writer),
        })
    }

    /// Request cooperative cancellation of the running grow. The step in
    /// flight finishes; no further step starts.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Claim the writer slot and grow to `target` in the caller's thread.
    pub fn grow_blocking(&self, target: usize) -> RevlensResult<GrowReport> {
        let guard = self.try_begin_write().ok_or(RevlensError::GrowInProgress)?;
        self.grow(&guard, target)
    }

    /// Grow the window to `target` (clamped to the corpus size) in steps of
    /// `step_size`. A target at or below the current size is a no-op.
    ///
    /// `guard` must come from this manager's `try_begin_write`; a guard held
    /// on another manager is rejected as `GrowInProgress`.
    pub fn grow(&self, guard: &WriterGuard, target: usize) -> RevlensResult<GrowReport> {
        if !Arc::ptr_eq(&guard.flag, &self.writer) {
            return Err(RevlensError::GrowInProgress);
        }
        let start = self.snapshot();
        let start_size = start.len();
        let target = target.min(self.total_available());
        let mut report = GrowReport {
            start_size,
            final_size: start_size,
            target,
            ..GrowReport::default()
        };
        if target <= start_size {
            return Ok(report);
        }

        self.set_last_error(None);
        let records = match self.source.fetch(0, target) {
            Ok(records) => records,
            Err(e) => {
                self.set_phase(ready_or_initial(start_size));
                return Err(e.into());
            }
        };

        let sentiment_seed = self.seed(&self.sentiment, target, &start.sentiment);
        let embedding_seed = self.seed(&self.embeddings, target, &start.embeddings);

        info!(from = start_size, target, step = self.config.step_size, "grow started");

        let mut window = start_size;
        while window < target {
            if self.cancel.is_cancelled() {
                info!(window, target, "grow cancelled between steps");
                report.cancelled = true;
                break;
            }
            let step_target = (window + self.config.step_size).min(target);
            self.set_phase(GrowPhase::Loading {
                target,
                step_target,
            });

            let step = &records[..step_target];
            let current = self.snapshot();
            let sentiment_base = match &sentiment_seed {
                Some(seed) if seed.version() > window => seed,
                _ => &current.sentiment,
            };
            let embedding_base = match &embedding_seed {
                Some(seed) if seed.version() > window => seed,
                _ => &current.embeddings,
            };
            let started = Instant::now();
            let sentiment = self.sentiment.build(step, Some(sentiment_base));
            let embeddings = self.embeddings.build(step, Some(embedding_base));
            let scored = sentiment.built.max(embeddings.built);
            if let Ok(mut latency) = self.latency.lock() {
                latency.observe(started.elapsed(), scored);
            }
            report.steps += 1;

            let error = sentiment.error.clone().or_else(|| embeddings.error.clone());
            collect(&mut report, &sentiment);
            collect(&mut report, &embeddings);

            match error {
                None => {
                    self.publish(&records[window..step_target], sentiment.index, embeddings.index);
                    window = step_target;
                }
                Some(err) => {
                    warn!(window, step_target, error = %err, "grow step incomplete");
                    if self.config.accept_partial_builds {
                        let covered = sentiment.index.version().min(embeddings.index.version());
                        if covered > window {
                            self.publish(
                                &records[window..covered],
                                sentiment.index.prefix(covered),
                                embeddings.index.prefix(covered),
                            );
                            window = covered;
                        }
                    }
                    self.set_last_error(Some(err.to_string()));
                    report.error = Some(err);
                    break;
                }
            }
        }

        report.final_size = window;
        self.set_phase(ready_or_initial(window));
        info!(
            from = start_size,
            to = window,
            steps = report.steps,
            cancelled = report.cancelled,
            failures = report.failures.len(),
            "grow finished"
        );

        if window > start_size {
            self.save_snapshots();
        }
        Ok(report)
    }

    /// Rescore pending entries of both indices and publish the result.
    pub fn retry_pending(&self) -> RevlensResult<GrowReport> {
        let _guard = self.try_begin_write().ok_or(RevlensError::GrowInProgress)?;
        let current = self.snapshot();
        let mut report = GrowReport {
            start_size: current.len(),
            final_size: current.len(),
            target: current.len(),
            ..GrowReport::default()
        };
        let pending =
            current.sentiment.status_counts().pending + current.embeddings.status_counts().pending;
        if pending == 0 {
            return Ok(report);
        }

        let records: Vec<Record> = current.records.to_vec();
        let sentiment = self.sentiment.retry_pending(&current.sentiment, &records);
        let embeddings = self.embeddings.retry_pending(&current.embeddings, &records);
        collect(&mut report, &sentiment);
        collect(&mut report, &embeddings);
        report.steps = 1;

        self.swap(WindowSnapshot {
            records: current.records.clone(),
            sentiment: sentiment.index,
            embeddings: embeddings.index,
        });
        self.save_snapshots();
        Ok(report)
    }

    /// A cached index that may seed the build, if it goes beyond what is
    /// already loaded.
    fn seed<E: IndexEntry>(
        &self,
        builder: &IndexBuilder<E>,
        target: usize,
        loaded: &DerivedIndex<E>,
    ) -> Option<DerivedIndex<E>> {
        let cache = self.cache.as_ref()?;
        let seed = cache.load_fresh::<E>(target, builder.model_id(), builder.dimension())?;
        (seed.version() > loaded.version()).then_some(seed)
    }

    fn publish(
        &self,
        delta: &[Record],
        sentiment: DerivedIndex<SentimentEntry>,
        embeddings: DerivedIndex<EmbeddingEntry>,
    ) {
        let mut records = self.snapshot().records.clone();
        records.append(delta.to_vec());
        let next = WindowSnapshot {
            records,
            sentiment,
            embeddings,
        };
        debug_assert!(next.is_aligned());
        self.swap(next);
    }

    fn swap(&self, next: WindowSnapshot) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
    }

    fn set_phase(&self, phase: GrowPhase) {
        *self.phase.write().unwrap_or_else(PoisonError::into_inner) = phase;
    }

    fn set_last_error(&self, error: Option<String>) {
        *self.last_error.write().unwrap_or_else(PoisonError::into_inner) = error;
    }

    fn save_snapshots(&self) {
        let Some(cache) = &self.cache else {
            return;
        };
        let current = self.snapshot();
        if let Err(e) = cache.save(&current.sentiment) {
            warn!(error = %e, "failed to save sentiment snapshot");
        }
        if let Err(e) = cache.save(&current.embeddings) {
            warn!(error = %e, "failed to save embedding snapshot");
        }
    }
}

fn ready_or_initial(size: usize) -> GrowPhase {
    if size == 0 {
        GrowPhase::Initial
    } else {
        GrowPhase::Ready { size }
    }
}

fn collect<E>(report: &mut GrowReport, outcome: &BuildOutcome<E>) {
    report.failures.extend(outcome.failures.iter().cloned());
    report.events.extend(outcome.events.iter().cloned());
}
