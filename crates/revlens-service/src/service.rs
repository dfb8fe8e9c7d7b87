//! ReviewService: owns the corpus manager and every read-side engine.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use revlens_analytics::{compute_statistics, compute_trends, MonthlyTrend, Statistics};
use revlens_cache::IndexCache;
use revlens_core::config::{defaults, RevlensConfig};
use revlens_core::errors::{ConfigError, ProviderError, RevlensError, RevlensResult};
use revlens_core::models::{EntryStatus, SentimentEntry, SentimentScores};
use revlens_core::traits::{ICorpusSource, IEmbeddingProvider, ISentimentProvider};
use revlens_corpus::{CorpusManager, GrowReport, JsonlCorpus};
use revlens_index::IndexBuilder;
use revlens_observability::degradation::TrackedDegradation;
use revlens_observability::tracing_setup::{events, init_tracing};
use revlens_observability::{
    evaluate_alerts, grow_span, search_span, DegradationTracker, HealthReport, HealthSnapshot,
};
use revlens_providers::{
    create_embedding_provider, create_sentiment_provider, ProviderAdapter, Scored,
    SentimentAdapter,
};
use revlens_retrieval::{search_keyword, SemanticSearcher};
use tracing::{info, warn};

use crate::types::{
    GrowResponse, KeywordResponse, ReviewPage, ReviewQuery, ReviewView, SemanticHit,
    SemanticResponse, SentimentView, TextAnalysis, WindowInfo,
};

/// Everything a service is assembled from.
pub struct ServiceParts {
    pub source: Arc<dyn ICorpusSource>,
    pub sentiment: Arc<dyn ISentimentProvider>,
    pub embeddings: Arc<dyn IEmbeddingProvider>,
    /// `None` disables snapshot persistence.
    pub cache: Option<IndexCache>,
    pub config: RevlensConfig,
}

pub struct ReviewService {
    manager: Arc<CorpusManager>,
    analyzer: SentimentAdapter,
    searcher: SemanticSearcher,
    tracker: Arc<Mutex<DegradationTracker>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    config: RevlensConfig,
}

impl ReviewService {
    pub fn new(parts: ServiceParts) -> Self {
        let ServiceParts {
            source,
            sentiment,
            embeddings,
            cache,
            config,
        } = parts;

        let analyzer = ProviderAdapter::from_config(sentiment, &config.provider);
        let embedder = ProviderAdapter::from_config(embeddings, &config.provider);
        let manager = CorpusManager::new(
            source,
            IndexBuilder::new(analyzer.clone(), config.index.chunk_size),
            IndexBuilder::new(embedder.clone(), config.index.chunk_size),
            cache,
            config.corpus.clone(),
        );
        let searcher = SemanticSearcher::new(embedder, config.retrieval.query_cache_size);

        Self {
            manager: Arc::new(manager),
            analyzer,
            searcher,
            tracker: Arc::new(Mutex::new(DegradationTracker::new())),
            worker: Mutex::new(None),
            config,
        }
    }

    /// Build from `root/revlens.toml` plus environment overrides, with providers
    /// from the registry. Installs tracing and starts growing to
    /// `corpus.initial_window` when it is non-zero.
    pub fn open(root: &Path) -> RevlensResult<Self> {
        let config = RevlensConfig::load(root)?;
        init_tracing(&config.observability);

        let source_path = config.corpus.source_path.as_deref().ok_or_else(|| {
            ConfigError::ValidationFailed {
                field: "corpus.source_path".to_string(),
                message: "a corpus file is required".to_string(),
            }
        })?;
        let source = JsonlCorpus::open(&root.join(source_path))?;
        let cache = IndexCache::from_config(&config.cache, root);

        let service = Self::new(ServiceParts {
            source: Arc::new(source),
            sentiment: create_sentiment_provider(&config.sentiment),
            embeddings: create_embedding_provider(&config.provider),
            cache,
            config,
        });
        info!(
            root = %root.display(),
            total = service.manager.total_available(),
            "review service opened"
        );

        let initial = service.config.corpus.initial_window;
        if initial > 0 {
            service.grow(initial as i64)?;
        }
        Ok(service)
    }

    pub fn config(&self) -> &RevlensConfig {
        &self.config
    }

    pub fn manager(&self) -> &Arc<CorpusManager> {
        &self.manager
    }

    // --- Window ---

    /// Start growing the window to `target_size` on a background thread.
    ///
    /// A target at or below the loaded size is accepted and does nothing. A
    /// request while another grow runs is not accepted.
    pub fn grow(&self, target_size: i64) -> RevlensResult<GrowResponse> {
        let target = validate_target(target_size)?;
        let estimated_seconds = self.manager.estimate_for(target);
        if target.min(self.manager.total_available()) <= self.manager.window_size() {
            return Ok(GrowResponse {
                accepted: true,
                estimated_seconds: 0.0,
                reason: None,
            });
        }

        let Some(guard) = self.manager.try_begin_write() else {
            events::grow_rejected(target_size, "grow in progress");
            return Ok(rejected("a grow sequence is already in progress"));
        };

        let manager = Arc::clone(&self.manager);
        let tracker = Arc::clone(&self.tracker);
        let spawned = std::thread::Builder::new()
            .name("revlens-grow".to_string())
            .spawn(move || {
                let span = grow_span!(manager.window_size(), target);
                let _entered = span.enter();
                match manager.grow(&guard, target) {
                    Ok(report) => record_events(&tracker, report),
                    Err(e) => warn!(error = %e, "background grow failed"),
                }
            });

        match spawned {
            Ok(handle) => {
                let previous = self
                    .worker
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .replace(handle);
                if let Some(done) = previous {
                    let _ = done.join();
                }
                events::grow_accepted(self.manager.window_size(), target, estimated_seconds);
                Ok(GrowResponse {
                    accepted: true,
                    estimated_seconds,
                    reason: None,
                })
            }
            Err(e) => {
                warn!(error = %e, "failed to spawn grow thread");
                Ok(rejected(&format!("failed to start grow: {e}")))
            }
        }
    }

    /// Grow to `target_size` in the caller's thread.
    pub fn grow_blocking(&self, target_size: i64) -> RevlensResult<GrowReport> {
        let target = validate_target(target_size)?;
        let span = grow_span!(self.manager.window_size(), target);
        let _entered = span.enter();
        let report = self.manager.grow_blocking(target)?;
        record_events(&self.tracker, report.clone());
        Ok(report)
    }

    /// Wait for the background grow, if any, to finish.
    pub fn wait_for_grow(&self) {
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("grow thread panicked");
            }
        }
    }

    /// Request cooperative cancellation. The step in flight completes.
    pub fn stop_growing(&self) {
        info!("stop requested");
        self.manager.cancel();
    }

    pub fn get_window_info(&self) -> WindowInfo {
        let loaded = self.manager.window_size();
        let total_available = self.manager.total_available();
        WindowInfo {
            loaded,
            total_available,
            can_load_more: loaded < total_available,
            is_growing: self.manager.is_growing(),
            phase: self.manager.phase(),
            progress: self.manager.progress(),
            estimated_seconds_remaining: self.manager.estimate_for(total_available),
            last_error: self.manager.last_error(),
        }
    }

    /// Rescore pending entries and mark the recovered ones in the tracker.
    pub fn retry_pending(&self) -> RevlensResult<GrowReport> {
        let before = self.manager.snapshot();
        let report = self.manager.retry_pending()?;
        let after = self.manager.snapshot();

        let mut tracker = self.tracker.lock().unwrap_or_else(PoisonError::into_inner);
        for pos in before.sentiment.pending_positions() {
            match after.sentiment.get(pos) {
                Some(e) if e.status != EntryStatus::Pending => {
                    tracker.mark_recovered("sentiment", Some(e.record_id));
                }
                _ => {}
            }
        }
        for pos in before.embeddings.pending_positions() {
            match after.embeddings.get(pos) {
                Some(e) if e.status != EntryStatus::Pending => {
                    tracker.mark_recovered("embeddings", Some(e.record_id));
                }
                _ => {}
            }
        }
        tracker.extend(report.events.iter().cloned());
        Ok(report)
    }

    // --- Queries ---

    /// Score `text` directly, bypassing the index.
    pub fn analyze_text(&self, text: &str) -> RevlensResult<TextAnalysis> {
        if text.trim().is_empty() {
            return Err(RevlensError::invalid_request("text must not be empty"));
        }
        let (scores, status) = match self.analyzer.score(text) {
            Scored::Ok(scores) => (scores, EntryStatus::Scored),
            Scored::Degraded { .. } => (SentimentScores::neutral(), EntryStatus::Degraded),
            Scored::Failed { attempts, reason } => {
                return Err(ProviderError::transient(
                    self.analyzer.model_id(),
                    format!("{reason} after {attempts} attempts"),
                )
                .into());
            }
        };
        let entry = SentimentEntry::new(0, scores, status);
        Ok(TextAnalysis {
            compound_score: entry.compound_score,
            label: entry.label,
            components: entry.components,
            status,
            model_id: self.analyzer.model_id().to_string(),
        })
    }

    /// The `k` loaded reviews closest in meaning to `query`.
    pub fn search_semantic(&self, query: &str, k: i64) -> RevlensResult<SemanticResponse> {
        let k = validate_k(k)?;
        if query.trim().is_empty() {
            return Err(RevlensError::invalid_request("query must not be empty"));
        }
        let span = search_span!("semantic", k);
        let _entered = span.enter();

        let snapshot = self.manager.snapshot();
        let hits = self.searcher.search(&snapshot.embeddings, query, k)?;
        let hits: Vec<SemanticHit> = hits
            .into_iter()
            .filter_map(|hit| {
                let record = snapshot.record(hit.position)?;
                Some(SemanticHit {
                    record_id: hit.record_id,
                    similarity: hit.similarity,
                    text: record.text.clone(),
                    author: record.author.clone(),
                    date: record.timestamp,
                    sentiment: snapshot.sentiment.get(hit.position).map(SentimentView::from),
                })
            })
            .collect();

        events::search_completed("semantic", k, hits.len());
        Ok(SemanticResponse {
            query: query.to_string(),
            k,
            searched: snapshot.len(),
            hits,
        })
    }

    /// Case-insensitive substring matches, in corpus order.
    pub fn search_keyword(&self, query: &str, k: i64) -> RevlensResult<KeywordResponse> {
        let k = validate_k(k)?;
        let span = search_span!("keyword", k);
        let _entered = span.enter();

        let snapshot = self.manager.snapshot();
        let hits: Vec<ReviewView> = search_keyword(&snapshot.records, query, k)
            .into_iter()
            .filter_map(|hit| {
                let record = snapshot.record(hit.position)?;
                Some(ReviewView::new(record, snapshot.sentiment.get(hit.position)))
            })
            .collect();

        events::search_completed("keyword", k, hits.len());
        Ok(KeywordResponse {
            query: query.to_string(),
            hits,
        })
    }

    pub fn get_statistics(&self) -> Statistics {
        let snapshot = self.manager.snapshot();
        compute_statistics(&snapshot.records, &snapshot.sentiment)
    }

    pub fn get_trends(&self) -> Vec<MonthlyTrend> {
        let snapshot = self.manager.snapshot();
        compute_trends(&snapshot.records, &snapshot.sentiment)
    }

    /// One page of loaded reviews, optionally filtered by label and text.
    /// Pending entries never match a label filter.
    pub fn list_reviews(&self, query: &ReviewQuery) -> RevlensResult<ReviewPage> {
        if query.page == 0 {
            return Err(RevlensError::invalid_request("page starts at 1"));
        }
        if query.per_page == 0 {
            return Err(RevlensError::invalid_request("per_page must be at least 1"));
        }
        let per_page = query.per_page.min(defaults::MAX_PER_PAGE);
        let needle = query
            .contains
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let snapshot = self.manager.snapshot();
        let matches: Vec<ReviewView> = snapshot
            .records
            .iter()
            .zip(snapshot.sentiment.iter())
            .filter(|(record, entry)| {
                let label_ok = query.label.map_or(true, |label| {
                    entry.status != EntryStatus::Pending && entry.label == label
                });
                let text_ok = needle
                    .as_deref()
                    .map_or(true, |n| record.text.to_lowercase().contains(n));
                label_ok && text_ok
            })
            .map(|(record, entry)| ReviewView::new(record, Some(entry)))
            .collect();

        let total = matches.len();
        let reviews = matches
            .into_iter()
            .skip((query.page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();
        Ok(ReviewPage {
            reviews,
            total,
            page: query.page,
            per_page,
            total_pages: total.div_ceil(per_page),
        })
    }

    // --- Diagnostics ---

    pub fn health(&self) -> HealthReport {
        let snapshot = self.manager.snapshot();
        let sentiment = snapshot.sentiment.status_counts();
        let embeddings = snapshot.embeddings.status_counts();
        let alerts = {
            let tracker = self.tracker.lock().unwrap_or_else(PoisonError::into_inner);
            evaluate_alerts(&tracker)
        };
        HealthReport::build(
            HealthSnapshot {
                window_size: snapshot.len(),
                total_available: self.manager.total_available(),
                is_growing: self.manager.is_growing(),
                sentiment_model: self.analyzer.model_id().to_string(),
                embedding_model: self.searcher.adapter().model_id().to_string(),
                embedding_provider_available: self.searcher.adapter().provider().is_available(),
                degraded_entries: sentiment.degraded + embeddings.degraded,
                pending_entries: sentiment.pending + embeddings.pending,
                last_error: self.manager.last_error(),
                cache_enabled: self.config.cache.enabled,
            },
            alerts,
        )
    }

    /// Most recent degradation events, newest first.
    pub fn degradation_events(&self, limit: usize) -> Vec<TrackedDegradation> {
        self.tracker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recent(limit)
    }
}

impl Drop for ReviewService {
    fn drop(&mut self) {
        self.manager.cancel();
        self.wait_for_grow();
    }
}

fn validate_target(target_size: i64) -> RevlensResult<usize> {
    usize::try_from(target_size)
        .map_err(|_| RevlensError::invalid_request("target size must not be negative"))
}

fn validate_k(k: i64) -> RevlensResult<usize> {
    usize::try_from(k).map_err(|_| RevlensError::invalid_request("k must not be negative"))
}

fn rejected(reason: &str) -> GrowResponse {
    GrowResponse {
        accepted: false,
        estimated_seconds: 0.0,
        reason: Some(reason.to_string()),
    }
}

fn record_events(tracker: &Mutex<DegradationTracker>, report: GrowReport) {
    if report.events.is_empty() {
        return;
    }
    tracker
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .extend(report.events);
}
