//! Position-aligned derived index over the corpus window.

use std::collections::HashMap;
use std::sync::Arc;

use revlens_core::models::{EntryStatus, Record};
use revlens_core::Segmented;
use serde::{Deserialize, Serialize};

use crate::entry::IndexEntry;

/// Entry counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub scored: usize,
    pub degraded: usize,
    pub pending: usize,
}

/// Ordered entries aligned with the window, plus the identity of the model
/// that produced them. Cloning shares all segments.
#[derive(Debug)]
pub struct DerivedIndex<E> {
    entries: Segmented<E>,
    /// Per-segment `record_id -> position` maps, aligned with `entries.segments()`.
    id_maps: Vec<Arc<HashMap<u64, usize>>>,
    model_id: Arc<str>,
    dimension: usize,
}

impl<E> Clone for DerivedIndex<E> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            id_maps: self.id_maps.clone(),
            model_id: Arc::clone(&self.model_id),
            dimension: self.dimension,
        }
    }
}

impl<E: IndexEntry> DerivedIndex<E> {
    pub fn new(model_id: impl Into<Arc<str>>, dimension: usize) -> Self {
        Self {
            entries: Segmented::new(),
            id_maps: Vec::new(),
            model_id: model_id.into(),
            dimension,
        }
    }

    /// Build an index from already materialized entries (one segment).
    pub fn from_entries(model_id: impl Into<Arc<str>>, dimension: usize, entries: Vec<E>) -> Self {
        let mut index = Self::new(model_id, dimension);
        index.push_segment(entries);
        index
    }

    /// Number of records covered.
    pub fn version(&self) -> usize {
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn model_id_arc(&self) -> &Arc<str> {
        &self.model_id
    }

    /// Embedding dimension, or values per entry for sentiment.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn get(&self, pos: usize) -> Option<&E> {
        self.entries.get(pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> + '_ {
        self.entries.iter()
    }

    pub fn entries(&self) -> &Segmented<E> {
        &self.entries
    }

    pub fn position_of(&self, record_id: u64) -> Option<usize> {
        self.id_maps
            .iter()
            .enumerate()
            .find_map(|(seg, map)| {
                let offset = self.entries.segment_offset(seg)?;
                map.get(&record_id).map(|local| offset + local)
            })
    }

    pub fn get_by_id(&self, record_id: u64) -> Option<&E> {
        self.position_of(record_id).and_then(|pos| self.get(pos))
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for entry in self.iter() {
            match entry.status() {
                EntryStatus::Scored => counts.scored += 1,
                EntryStatus::Degraded => counts.degraded += 1,
                EntryStatus::Pending => counts.pending += 1,
            }
        }
        counts
    }

    /// Positions of entries still waiting for a successful score.
    pub fn pending_positions(&self) -> Vec<usize> {
        self.iter()
            .enumerate()
            .filter(|(_, e)| e.status().is_pending())
            .map(|(i, _)| i)
            .collect()
    }

    /// Whether this index's entries match the first `version()` records by id.
    pub fn is_prefix_of(&self, records: &[Record]) -> bool {
        self.version() <= records.len()
            && self
                .iter()
                .zip(records)
                .all(|(entry, record)| entry.record_id() == record.id)
    }

    /// A new index with `entries` appended as one segment. `self` is untouched.
    pub fn with_appended(&self, entries: Vec<E>) -> Self {
        let mut next = self.clone();
        next.push_segment(entries);
        next
    }

    /// The first `n` entries. Whole segments and their id maps are shared.
    pub fn prefix(&self, n: usize) -> Self {
        if n >= self.len() {
            return self.clone();
        }
        let entries = self.entries.prefix(n);
        let id_maps = entries
            .segments()
            .iter()
            .enumerate()
            .map(|(i, seg)| {
                let shared = self
                    .entries
                    .segments()
                    .get(i)
                    .is_some_and(|old| Arc::ptr_eq(old, seg));
                match (shared, self.id_maps.get(i)) {
                    (true, Some(map)) => Arc::clone(map),
                    _ => Arc::new(id_map(seg)),
                }
            })
            .collect();
        Self {
            entries,
            id_maps,
            model_id: Arc::clone(&self.model_id),
            dimension: self.dimension,
        }
    }

    /// Replace one segment with rescored entries for the same records.
    /// Returns `false` if the segment index or length does not match.
    pub(crate) fn replace_segment(&mut self, idx: usize, entries: Vec<E>) -> bool {
        self.entries.replace_segment(idx, entries)
    }

    fn push_segment(&mut self, entries: Vec<E>) {
        if entries.is_empty() {
            return;
        }
        let map = id_map(&entries);
        self.entries.append(entries);
        self.id_maps.push(Arc::new(map));
    }
}

fn id_map<E: IndexEntry>(entries: &[E]) -> HashMap<u64, usize> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.record_id(), i))
        .collect()
}
