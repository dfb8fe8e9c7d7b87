//! End-to-end behavior of ReviewService over mock and built-in providers.

use std::sync::Arc;

use revlens_core::config::RevlensConfig;
use revlens_core::errors::RevlensError;
use revlens_core::models::{EntryStatus, Record, SentimentLabel};
use revlens_core::traits::{IEmbeddingProvider, ISentimentProvider};
use revlens_corpus::{GrowPhase, InMemoryCorpus};
use revlens_observability::HealthStatus;
use revlens_providers::{HashedTfEmbedder, LexiconScorer};
use revlens_service::{ReviewQuery, ReviewService, ServiceParts};
use test_fixtures::{
    load_records, records_from_texts, synthetic_records, temp_dir, CountingEmbedder,
    CountingSentiment, Flaky, Gate,
};

fn config(step: usize) -> RevlensConfig {
    let mut config = RevlensConfig::default();
    config.corpus.step_size = step;
    config.provider.initial_backoff_ms = 1;
    config.provider.max_backoff_ms = 2;
    config.cache.enabled = false;
    config
}

fn service(
    records: Vec<Record>,
    sentiment: Arc<dyn ISentimentProvider>,
    embeddings: Arc<dyn IEmbeddingProvider>,
    step: usize,
) -> ReviewService {
    ReviewService::new(ServiceParts {
        source: Arc::new(InMemoryCorpus::new(records).unwrap()),
        sentiment,
        embeddings,
        cache: None,
        config: config(step),
    })
}

fn lexicon_service(records: Vec<Record>, step: usize) -> ReviewService {
    service(
        records,
        Arc::new(LexiconScorer::new()),
        Arc::new(HashedTfEmbedder::new(256)),
        step,
    )
}

#[test]
fn first_step_labels_three_reviews() {
    let svc = lexicon_service(records_from_texts(&["great host", "not good", "ok stay"]), 3);
    let report = svc.grow_blocking(3).unwrap();
    assert_eq!(report.steps, 1);

    let page = svc.list_reviews(&ReviewQuery::default()).unwrap();
    let labels: Vec<_> = page
        .reviews
        .iter()
        .map(|r| r.sentiment.as_ref().map(|s| s.label))
        .collect();
    assert_eq!(
        labels,
        vec![
            Some(SentimentLabel::Positive),
            Some(SentimentLabel::Negative),
            Some(SentimentLabel::Neutral)
        ]
    );
}

#[test]
fn near_duplicate_is_found_first() {
    let svc = lexicon_service(
        records_from_texts(&[
            "Lovely quiet apartment close to the old town",
            "Parking was impossible and the garage was closed",
            "lovely, quiet apartment close to the old town!",
        ]),
        10,
    );
    svc.grow_blocking(3).unwrap();

    let response = svc
        .search_semantic("Lovely quiet apartment close to the old town", 3)
        .unwrap();
    let ids: Vec<u64> = response.hits.iter().map(|h| h.record_id).collect();
    assert_eq!(ids, vec![1, 3, 2]);
    assert!((response.hits[1].similarity - 1.0).abs() < 1e-6);
    assert_eq!(response.searched, 3);
    assert_eq!(response.hits[1].author, "guest3");
}

#[test]
fn transient_failure_on_second_record_recovers_without_gaps() {
    let records = records_from_texts(&["one", "two", "three", "four", "five"]);
    let flaky = Arc::new(Flaky::new(CountingSentiment::new(), "two", 1));
    let svc = service(records, flaky.clone(), Arc::new(CountingEmbedder::new(8)), 5);

    let report = svc.grow_blocking(5).unwrap();
    assert!(report.failures.is_empty());
    assert_eq!(flaky.trigger_attempts(), 2);

    let snapshot = svc.manager().snapshot();
    assert_eq!(snapshot.len(), 5);
    assert!(snapshot.is_aligned());
    assert!(snapshot
        .sentiment
        .iter()
        .all(|e| e.status == EntryStatus::Scored));
}

#[test]
fn stop_after_first_step_keeps_first_step() {
    let records = synthetic_records(40);
    // Park the build on the last record of the first step.
    let gate = Arc::new(Gate::new(CountingSentiment::new(), &records[9].text));
    let svc = service(records, gate.clone(), Arc::new(CountingEmbedder::new(8)), 10);

    let response = svc.grow(40).unwrap();
    assert!(response.accepted);
    gate.wait_until_reached();
    svc.stop_growing();
    gate.release();
    svc.wait_for_grow();

    let info = svc.get_window_info();
    assert_eq!(info.loaded, 10);
    assert!(info.can_load_more);
    assert!(!info.is_growing);
    assert_eq!(info.phase, GrowPhase::Ready { size: 10 });

    assert_eq!(svc.get_statistics().total_reviews, 10);
    let hits = svc.search_semantic("great host", 50).unwrap().hits;
    assert!(!hits.is_empty() && hits.len() <= 10);

    // Growing again resumes from the smaller window.
    svc.grow_blocking(40).unwrap();
    assert_eq!(svc.get_window_info().loaded, 40);
}

#[test]
fn second_grow_is_rejected_while_one_runs() {
    let records = synthetic_records(20);
    let gate = Arc::new(Gate::new(CountingSentiment::new(), &records[0].text));
    let svc = service(records, gate.clone(), Arc::new(CountingEmbedder::new(8)), 10);

    assert!(svc.grow(20).unwrap().accepted);
    gate.wait_until_reached();

    let second = svc.grow(20).unwrap();
    assert!(!second.accepted);
    assert!(second.reason.is_some());
    assert!(matches!(svc.grow_blocking(20), Err(RevlensError::GrowInProgress)));
    assert!(svc.get_window_info().is_growing);

    gate.release();
    svc.wait_for_grow();
    assert_eq!(svc.get_window_info().loaded, 20);
}

#[test]
fn grow_to_loaded_size_is_a_noop() {
    let svc = lexicon_service(synthetic_records(6), 6);
    svc.grow_blocking(6).unwrap();
    let response = svc.grow(4).unwrap();
    assert!(response.accepted);
    assert_eq!(response.estimated_seconds, 0.0);
    assert!(!svc.get_window_info().is_growing);
}

#[test]
fn invalid_requests_are_rejected_up_front() {
    let sentiment = Arc::new(CountingSentiment::new());
    let svc = service(
        synthetic_records(5),
        sentiment.clone(),
        Arc::new(CountingEmbedder::new(8)),
        5,
    );

    assert!(matches!(svc.grow(-1), Err(RevlensError::InvalidRequest { .. })));
    assert!(matches!(
        svc.search_semantic("quiet", -3),
        Err(RevlensError::InvalidRequest { .. })
    ));
    assert!(matches!(
        svc.search_keyword("quiet", -1),
        Err(RevlensError::InvalidRequest { .. })
    ));
    assert!(matches!(svc.analyze_text("   "), Err(RevlensError::InvalidRequest { .. })));
    assert_eq!(sentiment.calls(), 0);
}

#[test]
fn semantic_search_edge_cases() {
    let svc = lexicon_service(synthetic_records(12), 12);
    // Empty window: no results, not an error.
    assert!(svc.search_semantic("host", 5).unwrap().hits.is_empty());

    svc.grow_blocking(12).unwrap();
    assert!(svc.search_semantic("host", 0).unwrap().hits.is_empty());

    let first = svc.search_semantic("friendly host", 5).unwrap();
    let second = svc.search_semantic("friendly host", 5).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.hits.len(), 5);
    assert_eq!(svc.search_semantic("friendly host", 100).unwrap().hits.len(), 12);
}

#[test]
fn analyze_text_bypasses_the_index() {
    let svc = lexicon_service(synthetic_records(3), 3);
    let analysis = svc.analyze_text("What a great host").unwrap();
    assert_eq!(analysis.label, SentimentLabel::Positive);
    assert_eq!(analysis.status, EntryStatus::Scored);
    assert_eq!(analysis.model_id, "lexicon-v1");
    assert_eq!(svc.get_window_info().loaded, 0);
}

#[test]
fn keyword_search_is_case_insensitive_and_ordered() {
    let svc = lexicon_service(load_records("reviews_small.jsonl"), 100);
    svc.grow_blocking(100).unwrap();

    let response = svc.search_keyword("HOST", 50).unwrap();
    assert!(!response.hits.is_empty());
    assert!(response
        .hits
        .iter()
        .all(|h| h.text.to_lowercase().contains("host")));
    let ids: Vec<u64> = response.hits.iter().map(|h| h.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
}

#[test]
fn list_reviews_paginates_and_filters() {
    let svc = lexicon_service(load_records("reviews_small.jsonl"), 100);
    svc.grow_blocking(100).unwrap();

    let page = svc
        .list_reviews(&ReviewQuery {
            page: 3,
            per_page: 5,
            ..ReviewQuery::default()
        })
        .unwrap();
    assert_eq!(page.total, 12);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.reviews.len(), 2);
    assert_eq!(page.reviews[0].id, 111);

    let positive = svc
        .list_reviews(&ReviewQuery {
            label: Some(SentimentLabel::Positive),
            per_page: 100,
            ..ReviewQuery::default()
        })
        .unwrap();
    assert_eq!(positive.total, svc.get_statistics().distribution.positive);
    assert!(positive
        .reviews
        .iter()
        .all(|r| r.sentiment.as_ref().map(|s| s.label) == Some(SentimentLabel::Positive)));

    assert!(matches!(
        svc.list_reviews(&ReviewQuery {
            page: 0,
            ..ReviewQuery::default()
        }),
        Err(RevlensError::InvalidRequest { .. })
    ));
}

#[test]
fn statistics_and_trends_follow_the_window() {
    let svc = lexicon_service(load_records("reviews_small.jsonl"), 4);
    assert_eq!(svc.get_statistics().total_reviews, 0);
    assert!(svc.get_trends().is_empty());

    svc.grow_blocking(8).unwrap();
    let stats = svc.get_statistics();
    assert_eq!(stats.total_reviews, 8);
    assert_eq!(stats.distribution.total(), 8);
    let trend_total: usize = svc.get_trends().iter().map(|t| t.count).sum();
    assert_eq!(trend_total, 8);
}

#[test]
fn pending_entries_are_tracked_and_recovered() {
    let records = records_from_texts(&["fine", "flaky one", "fine too"]);
    let flaky = Arc::new(Flaky::new(CountingSentiment::new(), "flaky", 3));
    let svc = service(records, flaky, Arc::new(CountingEmbedder::new(8)), 3);

    svc.grow_blocking(3).unwrap();
    assert_eq!(svc.get_statistics().pending, 1);
    assert_eq!(svc.health().status, HealthStatus::Degraded);
    let events = svc.degradation_events(10);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.record_id, Some(2));

    let report = svc.retry_pending().unwrap();
    assert!(report.failures.is_empty());
    assert_eq!(svc.get_statistics().pending, 0);
    assert_eq!(svc.health().status, HealthStatus::Healthy);
}

#[test]
fn open_reads_config_and_corpus_from_root() {
    let root = temp_dir();
    std::fs::copy(
        test_fixtures::fixture_path("reviews_small.jsonl"),
        root.path().join("reviews.jsonl"),
    )
    .unwrap();
    std::fs::write(
        root.path().join("revlens.toml"),
        "[corpus]\nsource_path = \"reviews.jsonl\"\nstep_size = 5\n\n[cache]\ndir = \"cache\"\n",
    )
    .unwrap();

    let svc = ReviewService::open(root.path()).unwrap();
    assert_eq!(svc.get_window_info().total_available, 12);
    svc.grow_blocking(12).unwrap();
    assert_eq!(svc.get_statistics().total_reviews, 12);
    assert!(root.path().join("cache").join("sentiment.rvls").exists());
    assert!(root.path().join("cache").join("embeddings.rvls").exists());
}

#[test]
fn open_without_corpus_is_a_config_error() {
    let root = temp_dir();
    assert!(matches!(
        ReviewService::open(root.path()),
        Err(RevlensError::Config(_))
    ));
}

#[test]
fn responses_serialize_to_json() {
    let svc = lexicon_service(records_from_texts(&["great host"]), 1);
    svc.grow_blocking(1).unwrap();
    let info = serde_json::to_value(svc.get_window_info()).unwrap();
    assert_eq!(info["loaded"], 1);
    assert_eq!(info["phase"]["state"], "ready");
    let hits = serde_json::to_value(svc.search_semantic("host", 1).unwrap()).unwrap();
    assert_eq!(hits["hits"][0]["record_id"], 1);
}
