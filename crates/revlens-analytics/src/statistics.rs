//! Window-wide sentiment statistics.

use revlens_core::constants::EXCERPT_CHARS;
use revlens_core::models::{EntryStatus, Record, SentimentEntry, SentimentLabel};
use revlens_core::Segmented;
use revlens_index::SentimentIndex;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelDistribution {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl LabelDistribution {
    pub fn add(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

/// The most positive or most negative review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewExtreme {
    pub record_id: u64,
    pub excerpt: String,
    pub compound_score: f32,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    /// Entries in the window, pending included.
    pub total_reviews: usize,
    /// Label counts over scored and degraded entries.
    pub distribution: LabelDistribution,
    pub degraded: usize,
    pub pending: usize,
    pub average_compound: f64,
    pub average_subjectivity: f64,
    /// Sample standard deviation (n - 1). 0 with fewer than two values.
    pub compound_std: f64,
    /// Picked among scored entries only; ties go to the lowest record id.
    pub most_positive: Option<ReviewExtreme>,
    pub most_negative: Option<ReviewExtreme>,
}

/// Compound and subjectivity an entry contributes, or `None` for pending.
pub(crate) fn effective(entry: &SentimentEntry) -> Option<(f64, f64, SentimentLabel)> {
    match entry.status {
        EntryStatus::Scored => Some((
            entry.compound_score as f64,
            entry.components.subjectivity as f64,
            entry.label,
        )),
        EntryStatus::Degraded => Some((0.0, 0.0, SentimentLabel::Neutral)),
        EntryStatus::Pending => None,
    }
}

/// Aggregate `index` over its aligned `records`.
pub fn compute_statistics(records: &Segmented<Record>, index: &SentimentIndex) -> Statistics {
    let mut distribution = LabelDistribution::default();
    let mut degraded = 0;
    let mut pending = 0;
    let mut compounds = Vec::with_capacity(index.len());
    let mut subjectivity_sum = 0.0;
    let mut best: Option<(&SentimentEntry, &Record)> = None;
    let mut worst: Option<(&SentimentEntry, &Record)> = None;

    for (entry, record) in index.iter().zip(records.iter()) {
        match entry.status {
            EntryStatus::Degraded => degraded += 1,
            EntryStatus::Pending => pending += 1,
            EntryStatus::Scored => {
                if best.map_or(true, |(b, _)| beats(entry, b, |x, y| x > y)) {
                    best = Some((entry, record));
                }
                if worst.map_or(true, |(w, _)| beats(entry, w, |x, y| x < y)) {
                    worst = Some((entry, record));
                }
            }
        }
        if let Some((compound, subjectivity, label)) = effective(entry) {
            distribution.add(label);
            compounds.push(compound);
            subjectivity_sum += subjectivity;
        }
    }

    let n = compounds.len();
    let average_compound = mean(&compounds);
    let average_subjectivity = if n == 0 { 0.0 } else { subjectivity_sum / n as f64 };
    let compound_std = sample_std(&compounds, average_compound);

    debug!(total = index.len(), degraded, pending, "statistics computed");
    Statistics {
        total_reviews: index.len(),
        distribution,
        degraded,
        pending,
        average_compound,
        average_subjectivity,
        compound_std,
        most_positive: best.map(extreme),
        most_negative: worst.map(extreme),
    }
}

/// Whether `candidate` replaces `current` as an extreme under `better`.
fn beats(
    candidate: &SentimentEntry,
    current: &SentimentEntry,
    better: impl Fn(f32, f32) -> bool,
) -> bool {
    better(candidate.compound_score, current.compound_score)
        || (candidate.compound_score == current.compound_score
            && candidate.record_id < current.record_id)
}

fn extreme((entry, record): (&SentimentEntry, &Record)) -> ReviewExtreme {
    ReviewExtreme {
        record_id: entry.record_id,
        excerpt: record.excerpt(EXCERPT_CHARS),
        compound_score: entry.compound_score,
        author: record.author.clone(),
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}
