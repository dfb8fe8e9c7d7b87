//! Whether a stored snapshot may seed a build.

use tracing::info;

use crate::format::SnapshotMeta;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    Usable,
    Stale { reason: String },
}

impl Freshness {
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Usable)
    }
}

/// A snapshot is usable iff it covers no more than the desired window and was
/// produced by the configured model with the configured dimension.
pub fn evaluate_freshness(
    meta: &SnapshotMeta,
    desired_window: usize,
    model_id: &str,
    dimension: usize,
) -> Freshness {
    let stale = |reason: String| {
        info!(kind = %meta.kind, %reason, "cached snapshot is stale");
        Freshness::Stale { reason }
    };

    if meta.model_id != model_id {
        return stale(format!(
            "model id {} does not match configured {model_id}",
            meta.model_id
        ));
    }
    if meta.dimension != dimension {
        return stale(format!(
            "dimension {} does not match configured {dimension}",
            meta.dimension
        ));
    }
    if meta.version > desired_window {
        return stale(format!(
            "covers {} records, more than the desired window of {desired_window}",
            meta.version
        ));
    }
    Freshness::Usable
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn meta(model: &str, dims: usize, version: usize) -> SnapshotMeta {
        SnapshotMeta {
            kind: "embedding".to_string(),
            version,
            model_id: model.to_string(),
            dimension: dims,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn matching_snapshot_is_usable() {
        assert!(evaluate_freshness(&meta("m", 8, 100), 100, "m", 8).is_usable());
        assert!(evaluate_freshness(&meta("m", 8, 50), 100, "m", 8).is_usable());
    }

    #[test]
    fn model_mismatch_is_stale() {
        let f = evaluate_freshness(&meta("old", 8, 10), 100, "new", 8);
        assert!(matches!(f, Freshness::Stale { reason } if reason.contains("model")));
    }

    #[test]
    fn dimension_mismatch_is_stale() {
        assert!(!evaluate_freshness(&meta("m", 8, 10), 100, "m", 16).is_usable());
    }

    #[test]
    fn larger_than_window_is_stale() {
        assert!(!evaluate_freshness(&meta("m", 8, 200), 100, "m", 8).is_usable());
    }
}
