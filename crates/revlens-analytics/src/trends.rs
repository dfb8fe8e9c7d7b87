//! Per-month sentiment trends.

use std::collections::BTreeMap;

use revlens_core::models::Record;
use revlens_core::Segmented;
use revlens_index::SentimentIndex;
use serde::Serialize;

use crate::statistics::{effective, mean, LabelDistribution};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrend {
    /// `YYYY-MM`.
    pub month: String,
    /// Non-pending reviews in the month.
    pub count: usize,
    pub mean_compound: f64,
    pub distribution: LabelDistribution,
}

/// Monthly aggregates in ascending month order. Months with only pending
/// entries are omitted.
pub fn compute_trends(records: &Segmented<Record>, index: &SentimentIndex) -> Vec<MonthlyTrend> {
    let mut months: BTreeMap<String, (Vec<f64>, LabelDistribution)> = BTreeMap::new();
    for (entry, record) in index.iter().zip(records.iter()) {
        let Some((compound, _, label)) = effective(entry) else {
            continue;
        };
        let (compounds, distribution) = months.entry(record.month_key()).or_default();
        compounds.push(compound);
        distribution.add(label);
    }

    months
        .into_iter()
        .map(|(month, (compounds, distribution))| MonthlyTrend {
            month,
            count: compounds.len(),
            mean_compound: mean(&compounds),
            distribution,
        })
        .collect()
}
