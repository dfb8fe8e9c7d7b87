//! Structured log events for key operations.

/// Log a grow request that was accepted.
pub fn grow_accepted(from: usize, target: usize, estimated_seconds: f64) {
    tracing::info!(
        event = "grow_accepted",
        from,
        target,
        estimated_seconds,
        "grow accepted"
    );
}

/// Log a grow request that was rejected.
pub fn grow_rejected(target: i64, reason: &str) {
    tracing::warn!(event = "grow_rejected", target, reason = %reason, "grow rejected");
}

/// Log a degradation event.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

/// Log a finished search.
pub fn search_completed(mode: &str, k: usize, returned: usize) {
    tracing::debug!(event = "search_completed", mode = %mode, k, returned, "search completed");
}
