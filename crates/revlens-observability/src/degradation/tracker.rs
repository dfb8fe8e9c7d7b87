//! Record every degradation event with its recovery status.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use revlens_core::models::DegradationEvent;
use serde::{Deserialize, Serialize};

/// Events kept before the oldest are dropped.
const MAX_EVENTS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    /// Still in degraded mode.
    Active,
    /// Recovered to normal operation.
    Recovered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedDegradation {
    pub event: DegradationEvent,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
}

/// Tracks degradation events for diagnostics and alerting.
#[derive(Debug, Clone, Default)]
pub struct DegradationTracker {
    events: VecDeque<TrackedDegradation>,
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new degradation event.
    pub fn record(&mut self, event: DegradationEvent) {
        crate::tracing_setup::events::degradation_triggered(
            &event.component,
            &event.failure,
            &event.fallback_used,
        );
        if self.events.len() >= MAX_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(TrackedDegradation {
            event,
            recovery_status: RecoveryStatus::Active,
            recovered_at: None,
        });
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = DegradationEvent>) {
        for event in events {
            self.record(event);
        }
    }

    /// Mark every active degradation of `component` for `record_id` as recovered.
    /// `None` matches all records of the component.
    pub fn mark_recovered(&mut self, component: &str, record_id: Option<u64>) -> usize {
        let now = Utc::now();
        let mut recovered = 0;
        for tracked in &mut self.events {
            if tracked.event.component == component
                && tracked.recovery_status == RecoveryStatus::Active
                && (record_id.is_none() || tracked.event.record_id == record_id)
            {
                tracked.recovery_status = RecoveryStatus::Recovered;
                tracked.recovered_at = Some(now);
                recovered += 1;
            }
        }
        recovered
    }

    /// All retained events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &TrackedDegradation> + '_ {
        self.events.iter()
    }

    /// Most recent `n` events, newest first.
    pub fn recent(&self, n: usize) -> Vec<TrackedDegradation> {
        self.events.iter().rev().take(n).cloned().collect()
    }

    pub fn active_degradations(&self) -> Vec<&TrackedDegradation> {
        self.events
            .iter()
            .filter(|t| t.recovery_status == RecoveryStatus::Active)
            .collect()
    }

    /// Count events in the last N seconds for a given component.
    pub fn count_recent(&self, component: &str, window_secs: i64) -> usize {
        let cutoff = Utc::now() - chrono::Duration::seconds(window_secs);
        self.events
            .iter()
            .filter(|t| t.event.component == component && t.event.timestamp > cutoff)
            .count()
    }

    /// How long the oldest still-active degradation of `component` has lasted.
    pub fn degraded_duration(&self, component: &str) -> Option<chrono::Duration> {
        self.events
            .iter()
            .find(|t| {
                t.event.component == component && t.recovery_status == RecoveryStatus::Active
            })
            .map(|t| Utc::now() - t.event.timestamp)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(component: &str, record_id: u64) -> DegradationEvent {
        DegradationEvent {
            component: component.to_string(),
            record_id: Some(record_id),
            failure: "503".to_string(),
            fallback_used: "pending".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn record_and_recover() {
        let mut t = DegradationTracker::new();
        t.record(event("sentiment", 1));
        t.record(event("sentiment", 2));
        t.record(event("embeddings", 2));
        assert_eq!(t.active_degradations().len(), 3);

        assert_eq!(t.mark_recovered("sentiment", Some(2)), 1);
        assert_eq!(t.active_degradations().len(), 2);
        assert_eq!(t.mark_recovered("sentiment", None), 1);
        assert_eq!(t.active_degradations().len(), 1);
        assert_eq!(t.count_recent("sentiment", 60), 2);
    }

    #[test]
    fn recent_is_newest_first() {
        let mut t = DegradationTracker::new();
        t.extend((1..=5).map(|id| event("embeddings", id)));
        let ids: Vec<_> = t.recent(2).iter().map(|e| e.event.record_id).collect();
        assert_eq!(ids, vec![Some(5), Some(4)]);
    }

    #[test]
    fn oldest_event_is_dropped_when_full() {
        let mut t = DegradationTracker::new();
        t.extend((0..MAX_EVENTS as u64 + 2).map(|id| event("sentiment", id)));
        assert_eq!(t.len(), MAX_EVENTS);
        assert_eq!(t.events().next().and_then(|e| e.event.record_id), Some(2));
        assert_eq!(t.recent(1)[0].event.record_id, Some(MAX_EVENTS as u64 + 1));
    }
}
