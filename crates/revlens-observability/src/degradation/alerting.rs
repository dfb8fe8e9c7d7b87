//! Alert thresholds: more than 3 degradations of one component within an hour
//! is a warning; a component degraded for over 24 hours is critical.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::tracker::DegradationTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    None,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationAlert {
    pub level: AlertLevel,
    pub component: String,
    pub message: String,
}

/// Evaluate alerts from the tracker's current state, one per component at most.
pub fn evaluate_alerts(tracker: &DegradationTracker) -> Vec<DegradationAlert> {
    let mut alerts = Vec::new();
    let mut seen = HashSet::new();

    for tracked in tracker.events() {
        let component = &tracked.event.component;
        if !seen.insert(component.clone()) {
            continue;
        }

        if let Some(duration) = tracker.degraded_duration(component) {
            if duration > chrono::Duration::hours(24) {
                alerts.push(DegradationAlert {
                    level: AlertLevel::Critical,
                    component: component.clone(),
                    message: format!("{component} has been degraded for over 24 hours"),
                });
                continue;
            }
        }

        let recent = tracker.count_recent(component, 3600);
        if recent > 3 {
            alerts.push(DegradationAlert {
                level: AlertLevel::Warning,
                component: component.clone(),
                message: format!("{component} has {recent} degradation events in the last hour"),
            });
        }
    }
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use revlens_core::models::DegradationEvent;

    fn event(component: &str, age_hours: i64) -> DegradationEvent {
        DegradationEvent {
            component: component.to_string(),
            record_id: None,
            failure: "timeout".to_string(),
            fallback_used: "pending".to_string(),
            timestamp: Utc::now() - chrono::Duration::hours(age_hours),
        }
    }

    #[test]
    fn bursts_warn() {
        let mut t = DegradationTracker::new();
        for _ in 0..4 {
            t.record(event("embeddings", 0));
        }
        t.record(event("sentiment", 0));
        let alerts = evaluate_alerts(&t);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Warning);
        assert_eq!(alerts[0].component, "embeddings");
    }

    #[test]
    fn long_degradation_is_critical() {
        let mut t = DegradationTracker::new();
        t.record(event("sentiment", 30));
        let alerts = evaluate_alerts(&t);
        assert_eq!(alerts[0].level, AlertLevel::Critical);

        t.mark_recovered("sentiment", None);
        assert!(evaluate_alerts(&t).is_empty());
    }
}
