//! Health reports built from tracked degradations.

use chrono::Utc;
use revlens_core::models::DegradationEvent;
use revlens_observability::{
    evaluate_alerts, DegradationTracker, HealthReport, HealthSnapshot, HealthStatus,
};

fn event(component: &str) -> DegradationEvent {
    DegradationEvent {
        component: component.to_string(),
        record_id: Some(7),
        failure: "429 Too Many Requests".to_string(),
        fallback_used: "pending".to_string(),
        timestamp: Utc::now(),
    }
}

#[test]
fn degradation_burst_shows_up_in_report() {
    let mut tracker = DegradationTracker::new();
    for _ in 0..5 {
        tracker.record(event("embeddings"));
    }
    let snapshot = HealthSnapshot {
        window_size: 5,
        total_available: 5,
        embedding_provider_available: true,
        ..HealthSnapshot::default()
    };
    let report = HealthReport::build(snapshot, evaluate_alerts(&tracker));
    assert_eq!(report.status, HealthStatus::Degraded);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["alerts"][0]["level"], "warning");
    assert_eq!(json["alerts"][0]["component"], "embeddings");
}
