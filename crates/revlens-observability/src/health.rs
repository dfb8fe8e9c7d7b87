//! Service health: a snapshot of subsystem state reduced to one status.

use serde::Serialize;

use crate::degradation::{AlertLevel, DegradationAlert};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Raw subsystem state gathered by the caller.
#[derive(Debug, Clone, Default)]
pub struct HealthSnapshot {
    pub window_size: usize,
    pub total_available: usize,
    pub is_growing: bool,
    pub sentiment_model: String,
    pub embedding_model: String,
    pub embedding_provider_available: bool,
    pub degraded_entries: usize,
    pub pending_entries: usize,
    pub last_error: Option<String>,
    pub cache_enabled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub window_size: usize,
    pub total_available: usize,
    pub is_growing: bool,
    pub sentiment_model: String,
    pub embedding_model: String,
    pub embedding_provider_available: bool,
    pub degraded_entries: usize,
    pub pending_entries: usize,
    pub cache_enabled: bool,
    pub last_error: Option<String>,
    pub alerts: Vec<DegradationAlert>,
}

impl HealthReport {
    /// Unhealthy if the embedding provider is down or an alert is critical;
    /// degraded if anything fell back or a grow stopped early.
    pub fn build(snapshot: HealthSnapshot, alerts: Vec<DegradationAlert>) -> Self {
        let critical = alerts.iter().any(|a| a.level == AlertLevel::Critical);
        let status = if !snapshot.embedding_provider_available || critical {
            HealthStatus::Unhealthy
        } else if snapshot.degraded_entries > 0
            || snapshot.pending_entries > 0
            || snapshot.last_error.is_some()
            || !alerts.is_empty()
        {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        Self {
            status,
            window_size: snapshot.window_size,
            total_available: snapshot.total_available,
            is_growing: snapshot.is_growing,
            sentiment_model: snapshot.sentiment_model,
            embedding_model: snapshot.embedding_model,
            embedding_provider_available: snapshot.embedding_provider_available,
            degraded_entries: snapshot.degraded_entries,
            pending_entries: snapshot.pending_entries,
            cache_enabled: snapshot.cache_enabled,
            last_error: snapshot.last_error,
            alerts,
        }
    }
}
