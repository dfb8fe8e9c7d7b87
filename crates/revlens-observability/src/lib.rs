//! # revlens-observability
//!
//! Structured tracing with span definitions, degradation event tracking with
//! alerting, and the service health report.

pub mod degradation;
pub mod health;
pub mod tracing_setup;

pub use degradation::{evaluate_alerts, AlertLevel, DegradationAlert, DegradationTracker};
pub use health::{HealthReport, HealthSnapshot, HealthStatus};
