//! Incremental derived-index builder.
//!
//! Records already covered by a matching index are never sent to the provider
//! again. New entries are scored in corpus order, in chunks of `chunk_size`;
//! the delta is appended as one segment once scoring finishes.

use std::sync::Arc;

use chrono::Utc;
use revlens_core::errors::{BuildError, BuildFailure};
use revlens_core::models::{DegradationEvent, EntryStatus, Record};
use revlens_providers::{ProviderAdapter, Scored};
use tracing::{debug, info, warn};

use crate::derived_index::DerivedIndex;
use crate::entry::IndexEntry;
use crate::progress::BuildProgress;

/// Whether an existing index can seed a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reuse {
    /// The first `covered` records are already indexed.
    Extend { covered: usize },
    /// Everything has to be scored again.
    Rebuild { reason: String },
}

/// Result of a build or a pending retry.
#[derive(Debug, Clone)]
pub struct BuildOutcome<E> {
    pub index: DerivedIndex<E>,
    /// Entries taken over from the existing index.
    pub reused: usize,
    /// Entries produced by this build.
    pub built: usize,
    /// Records left pending after retries.
    pub failures: Vec<BuildFailure>,
    pub events: Vec<DegradationEvent>,
    /// Set when the build stopped early; `index` then covers only the chunks
    /// completed before the error.
    pub error: Option<BuildError>,
}

impl<E> BuildOutcome<E> {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Builds one kind of derived index through a provider adapter.
pub struct IndexBuilder<E: IndexEntry> {
    adapter: ProviderAdapter<E::Provider>,
    chunk_size: usize,
    progress: Arc<BuildProgress>,
}

impl<E: IndexEntry> IndexBuilder<E> {
    pub fn new(adapter: ProviderAdapter<E::Provider>, chunk_size: usize) -> Self {
        Self {
            adapter,
            chunk_size: chunk_size.max(1),
            progress: Arc::new(BuildProgress::new()),
        }
    }

    pub fn adapter(&self) -> &ProviderAdapter<E::Provider> {
        &self.adapter
    }

    pub fn progress(&self) -> &Arc<BuildProgress> {
        &self.progress
    }

    pub fn model_id(&self) -> &str {
        self.adapter.model_id()
    }

    pub fn dimension(&self) -> usize {
        self.adapter.width()
    }

    pub fn empty_index(&self) -> DerivedIndex<E> {
        DerivedIndex::new(self.adapter.model_id(), self.adapter.width())
    }

    /// Decide how much of `existing` can be kept for `records`.
    pub fn reuse(&self, records: &[Record], existing: Option<&DerivedIndex<E>>) -> Reuse {
        let Some(existing) = existing else {
            return Reuse::Rebuild {
                reason: "no existing index".to_string(),
            };
        };
        if existing.model_id() != self.model_id() {
            return Reuse::Rebuild {
                reason: format!(
                    "model changed from {} to {}",
                    existing.model_id(),
                    self.model_id()
                ),
            };
        }
        if existing.dimension() != self.dimension() {
            return Reuse::Rebuild {
                reason: format!(
                    "dimension changed from {} to {}",
                    existing.dimension(),
                    self.dimension()
                ),
            };
        }
        let covered = existing.version().min(records.len());
        let aligned = existing
            .iter()
            .zip(&records[..covered])
            .all(|(entry, record)| entry.record_id() == record.id);
        if !aligned {
            return Reuse::Rebuild {
                reason: "existing index is not a prefix of the records".to_string(),
            };
        }
        Reuse::Extend { covered }
    }

    /// Build an index covering `records`, reusing `existing` where possible.
    pub fn build(&self, records: &[Record], existing: Option<&DerivedIndex<E>>) -> BuildOutcome<E> {
        let (base, start) = match self.reuse(records, existing) {
            Reuse::Extend { covered } => match existing {
                Some(index) => (index.prefix(covered), covered),
                None => (self.empty_index(), 0),
            },
            Reuse::Rebuild { reason } => {
                if existing.is_some() {
                    info!(kind = E::KIND.as_str(), %reason, "full index rebuild");
                }
                (self.empty_index(), 0)
            }
        };

        let delta = &records[start..];
        self.progress.start(delta.len() as u64);
        if delta.is_empty() {
            self.progress.mark_complete();
            return BuildOutcome {
                index: base,
                reused: start,
                built: 0,
                failures: Vec::new(),
                events: Vec::new(),
                error: None,
            };
        }

        info!(
            kind = E::KIND.as_str(),
            model = self.model_id(),
            reused = start,
            to_score = delta.len(),
            "building index delta"
        );

        let model_id = Arc::clone(base.model_id_arc());
        let mut new_entries: Vec<E> = Vec::with_capacity(delta.len());
        let mut failures = Vec::new();
        let mut events = Vec::new();
        let mut error = None;

        for (chunk_idx, chunk) in delta.chunks(self.chunk_size).enumerate() {
            let chunk_start = start + chunk_idx * self.chunk_size;
            let scored = self.score_chunk(chunk, &model_id);

            if scored.failures.len() == chunk.len() {
                let reason = scored
                    .failures
                    .last()
                    .map(|f| f.reason.clone())
                    .unwrap_or_default();
                warn!(
                    kind = E::KIND.as_str(),
                    chunk_start,
                    chunk_len = chunk.len(),
                    %reason,
                    "provider unreachable for a whole chunk, stopping build"
                );
                error = Some(BuildError::ProviderUnreachable {
                    chunk_start,
                    chunk_len: chunk.len(),
                    reason,
                });
                break;
            }

            self.progress.record_chunk(
                chunk.len() as u64,
                scored.failures.len() as u64,
                scored.degraded as u64,
            );
            debug!(
                kind = E::KIND.as_str(),
                chunk_start,
                chunk_len = chunk.len(),
                failed = scored.failures.len(),
                degraded = scored.degraded,
                "chunk scored"
            );
            new_entries.extend(scored.entries);
            failures.extend(scored.failures);
            events.extend(scored.events);
        }

        if error.is_some() {
            self.progress.mark_failed();
        } else {
            self.progress.mark_complete();
        }

        let built = new_entries.len();
        BuildOutcome {
            index: base.with_appended(new_entries),
            reused: start,
            built,
            failures,
            events,
            error,
        }
    }

    /// Rescore `pending` entries of `index`. Segments without pending entries
    /// are shared with the input; the input index is never modified.
    pub fn retry_pending(&self, index: &DerivedIndex<E>, records: &[Record]) -> BuildOutcome<E> {
        let pending = index.pending_positions();
        let mut next = index.clone();
        let mut failures = Vec::new();
        let mut events = Vec::new();
        let mut rescored = 0usize;

        self.progress.start(pending.len() as u64);
        let model_id = Arc::clone(index.model_id_arc());

        for (seg_idx, segment) in index.entries().segments().iter().enumerate() {
            if !segment.iter().any(|e| e.status().is_pending()) {
                continue;
            }
            let offset = index.entries().segment_offset(seg_idx).unwrap_or(0);
            let mut replacement: Vec<E> = segment.to_vec();
            let mut seg_failed = 0u64;
            let mut seg_degraded = 0u64;
            let mut seg_pending = 0u64;

            for (local, entry) in segment.iter().enumerate() {
                if !entry.status().is_pending() {
                    continue;
                }
                seg_pending += 1;
                let Some(record) = records.get(offset + local) else {
                    continue;
                };
                if record.id != entry.record_id() {
                    warn!(
                        kind = E::KIND.as_str(),
                        position = offset + local,
                        "record misaligned with index, skipping pending retry"
                    );
                    continue;
                }
                let (new_entry, outcome) = self.score_record(record, &model_id);
                match outcome {
                    RecordOutcome::Scored => rescored += 1,
                    RecordOutcome::Degraded(event) => {
                        rescored += 1;
                        seg_degraded += 1;
                        events.push(event);
                    }
                    RecordOutcome::Failed(failure, event) => {
                        seg_failed += 1;
                        failures.push(failure);
                        events.push(event);
                    }
                }
                replacement[local] = new_entry;
            }

            next.replace_segment(seg_idx, replacement);
            self.progress
                .record_chunk(seg_pending, seg_failed, seg_degraded);
        }

        self.progress.mark_complete();
        info!(
            kind = E::KIND.as_str(),
            pending = pending.len(),
            rescored,
            still_pending = failures.len(),
            "pending retry finished"
        );

        BuildOutcome {
            index: next,
            reused: index.version() - pending.len(),
            built: rescored,
            failures,
            events,
            error: None,
        }
    }

    fn score_chunk(&self, chunk: &[Record], model_id: &Arc<str>) -> ChunkResult<E> {
        let mut result = ChunkResult {
            entries: Vec::with_capacity(chunk.len()),
            failures: Vec::new(),
            events: Vec::new(),
            degraded: 0,
        };
        for record in chunk {
            let (entry, outcome) = self.score_record(record, model_id);
            match outcome {
                RecordOutcome::Scored => {}
                RecordOutcome::Degraded(event) => {
                    result.degraded += 1;
                    result.events.push(event);
                }
                RecordOutcome::Failed(failure, event) => {
                    result.failures.push(failure);
                    result.events.push(event);
                }
            }
            result.entries.push(entry);
        }
        result
    }

    fn score_record(&self, record: &Record, model_id: &Arc<str>) -> (E, RecordOutcome) {
        match self.adapter.score(&record.text) {
            Scored::Ok(value) => (
                E::from_output(record.id, value, EntryStatus::Scored, model_id),
                RecordOutcome::Scored,
            ),
            Scored::Degraded { value, reason } => {
                let event = self.event(record.id, reason, "safe_default");
                (
                    E::from_output(record.id, value, EntryStatus::Degraded, model_id),
                    RecordOutcome::Degraded(event),
                )
            }
            Scored::Failed { attempts, reason } => {
                let event = self.event(record.id, reason.clone(), "pending");
                let failure = BuildFailure {
                    record_id: record.id,
                    attempts,
                    reason,
                };
                (
                    E::from_output(
                        record.id,
                        self.adapter.fallback(),
                        EntryStatus::Pending,
                        model_id,
                    ),
                    RecordOutcome::Failed(failure, event),
                )
            }
        }
    }

    fn event(&self, record_id: u64, failure: String, fallback: &str) -> DegradationEvent {
        DegradationEvent {
            component: self.adapter.component().to_string(),
            record_id: Some(record_id),
            failure,
            fallback_used: fallback.to_string(),
            timestamp: Utc::now(),
        }
    }
}

enum RecordOutcome {
    Scored,
    Degraded(DegradationEvent),
    Failed(BuildFailure, DegradationEvent),
}

struct ChunkResult<E> {
    entries: Vec<E>,
    failures: Vec<BuildFailure>,
    events: Vec<DegradationEvent>,
    degraded: usize,
}
