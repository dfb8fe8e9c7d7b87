//! Statistics and trends over sentiment indices.

use std::sync::Arc;

use revlens_analytics::{compute_statistics, compute_trends, LabelDistribution};
use revlens_core::constants::SENTIMENT_STRIDE;
use revlens_core::models::{EntryStatus, Record, SentimentEntry, SentimentScores};
use revlens_core::traits::ISentimentProvider;
use revlens_core::Segmented;
use revlens_index::{IndexBuilder, SentimentBuilder, SentimentIndex};
use revlens_providers::{LexiconScorer, ProviderAdapter, RetryPolicy, Truncator};
use test_fixtures::{load_records, records_from_texts};

fn scores(compound: f32, subjectivity: f32) -> SentimentScores {
    SentimentScores {
        compound,
        subjectivity,
        ..SentimentScores::neutral()
    }
}

fn index(entries: Vec<SentimentEntry>) -> SentimentIndex {
    SentimentIndex::from_entries("mock-sentiment", SENTIMENT_STRIDE, entries)
}

fn window(n: usize) -> Segmented<Record> {
    let texts: Vec<String> = (0..n).map(|i| format!("review number {i}")).collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    Segmented::from_vec(records_from_texts(&refs))
}

#[test]
fn mixed_statuses_aggregate_as_documented() {
    let records = window(5);
    let idx = index(vec![
        SentimentEntry::new(1, scores(0.8, 0.6), EntryStatus::Scored),
        SentimentEntry::new(2, scores(-0.4, 0.2), EntryStatus::Scored),
        SentimentEntry::new(3, SentimentScores::neutral(), EntryStatus::Degraded),
        SentimentEntry::new(4, SentimentScores::neutral(), EntryStatus::Pending),
        SentimentEntry::new(5, scores(0.2, 0.4), EntryStatus::Scored),
    ]);

    let stats = compute_statistics(&records, &idx);
    assert_eq!(stats.total_reviews, 5);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.degraded, 1);
    assert_eq!(
        stats.distribution,
        LabelDistribution {
            positive: 2,
            neutral: 1,
            negative: 1
        }
    );
    // (0.8 - 0.4 + 0 + 0.2) / 4
    assert!((stats.average_compound - 0.15).abs() < 1e-6);
    assert!((stats.average_subjectivity - 0.3).abs() < 1e-6);
    assert!(stats.compound_std > 0.0);

    let best = stats.most_positive.unwrap();
    assert_eq!(best.record_id, 1);
    assert_eq!(best.author, "guest1");
    assert_eq!(stats.most_negative.unwrap().record_id, 2);
}

#[test]
fn all_degraded_is_fully_neutral() {
    let records = window(4);
    let idx = index(
        (1..=4)
            .map(|id| SentimentEntry::new(id, SentimentScores::neutral(), EntryStatus::Degraded))
            .collect(),
    );
    let stats = compute_statistics(&records, &idx);
    assert_eq!(stats.distribution.neutral, 4);
    assert_eq!(stats.distribution.total(), 4);
    assert_eq!(stats.average_compound, 0.0);
    assert_eq!(stats.compound_std, 0.0);
    assert!(stats.most_positive.is_none());
    assert!(stats.most_negative.is_none());
}

#[test]
fn empty_window() {
    let stats = compute_statistics(&Segmented::new(), &index(Vec::new()));
    assert_eq!(stats.total_reviews, 0);
    assert_eq!(stats.average_compound, 0.0);
    assert!(stats.most_positive.is_none());
    assert!(compute_trends(&Segmented::new(), &index(Vec::new())).is_empty());
}

#[test]
fn extreme_ties_go_to_lowest_record_id() {
    let records = Segmented::from_vec(vec![
        Record::new(7, "a", chrono::NaiveDate::MIN, "x"),
        Record::new(3, "b", chrono::NaiveDate::MIN, "y"),
    ]);
    let idx = index(vec![
        SentimentEntry::new(7, scores(0.5, 0.0), EntryStatus::Scored),
        SentimentEntry::new(3, scores(0.5, 0.0), EntryStatus::Scored),
    ]);
    let stats = compute_statistics(&records, &idx);
    assert_eq!(stats.most_positive.unwrap().record_id, 3);
    assert_eq!(stats.most_negative.unwrap().record_id, 3);
}

#[test]
fn extreme_excerpt_is_cut_at_200_chars() {
    let long = "wonderful ".repeat(40);
    let records = Segmented::from_vec(records_from_texts(&[long.as_str()]));
    let idx = index(vec![SentimentEntry::new(1, scores(0.9, 1.0), EntryStatus::Scored)]);
    let excerpt = compute_statistics(&records, &idx).most_positive.unwrap().excerpt;
    assert_eq!(excerpt.chars().count(), 203);
    assert!(excerpt.ends_with("..."));
}

#[test]
fn trends_group_by_month_in_order() {
    let records = load_records("reviews_small.jsonl");
    let provider: Arc<dyn ISentimentProvider> = Arc::new(LexiconScorer::new());
    let builder: SentimentBuilder = IndexBuilder::new(
        ProviderAdapter::new(provider, RetryPolicy::immediate(1), Truncator::new(8000)),
        100,
    );
    let idx = builder.build(&records, None).index;
    let window = Segmented::from_vec(records.clone());

    let trends = compute_trends(&window, &idx);
    let months: Vec<&str> = trends.iter().map(|t| t.month.as_str()).collect();
    let mut sorted = months.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(months, sorted);
    assert_eq!(trends.iter().map(|t| t.count).sum::<usize>(), records.len());
    for t in &trends {
        assert_eq!(t.distribution.total(), t.count);
        assert!((-1.0..=1.0).contains(&t.mean_compound));
    }
}

#[test]
fn trends_skip_pending_entries() {
    let records = window(3);
    let idx = index(vec![
        SentimentEntry::new(1, scores(0.6, 0.0), EntryStatus::Scored),
        SentimentEntry::new(2, SentimentScores::neutral(), EntryStatus::Pending),
        SentimentEntry::new(3, scores(-0.2, 0.0), EntryStatus::Scored),
    ]);
    let trends = compute_trends(&records, &idx);
    // records_from_texts spaces records one day apart from 2021-01-01.
    assert_eq!(trends.len(), 1);
    assert_eq!(trends[0].month, "2021-01");
    assert_eq!(trends[0].count, 2);
    assert!((trends[0].mean_compound - 0.2).abs() < 1e-6);
}

#[test]
fn statistics_serialize_to_json() {
    let records = window(1);
    let idx = index(vec![SentimentEntry::new(1, scores(0.3, 0.5), EntryStatus::Scored)]);
    let json = serde_json::to_value(compute_statistics(&records, &idx)).unwrap();
    assert_eq!(json["distribution"]["positive"], 1);
    assert_eq!(json["most_positive"]["author"], "guest1");
}
