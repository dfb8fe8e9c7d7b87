use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A record-level fallback: an entry was degraded or parked as pending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationEvent {
    pub component: String,
    pub record_id: Option<u64>,
    pub failure: String,
    pub fallback_used: String,
    pub timestamp: DateTime<Utc>,
}
