//! Request and response shapes of the service API.

use chrono::NaiveDate;
use revlens_core::config::defaults;
use revlens_core::models::{EntryStatus, Record, SentimentComponents, SentimentEntry, SentimentLabel};
use revlens_corpus::{GrowPhase, GrowProgress};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowResponse {
    pub accepted: bool,
    /// Advisory only.
    pub estimated_seconds: f64,
    /// Why the request was not accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowInfo {
    pub loaded: usize,
    pub total_available: usize,
    pub can_load_more: bool,
    pub is_growing: bool,
    pub phase: GrowPhase,
    pub progress: GrowProgress,
    /// Advisory seconds to load the rest of the corpus.
    pub estimated_seconds_remaining: f64,
    pub last_error: Option<String>,
}

/// On-demand sentiment of a text outside the corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextAnalysis {
    pub compound_score: f32,
    pub label: SentimentLabel,
    pub components: SentimentComponents,
    pub status: EntryStatus,
    pub model_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentView {
    pub label: SentimentLabel,
    pub compound_score: f32,
    pub subjectivity: f32,
    pub status: EntryStatus,
}

impl From<&SentimentEntry> for SentimentView {
    fn from(entry: &SentimentEntry) -> Self {
        Self {
            label: entry.label,
            compound_score: entry.compound_score,
            subjectivity: entry.components.subjectivity,
            status: entry.status,
        }
    }
}

/// A record annotated with its sentiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewView {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<u64>,
    pub date: NaiveDate,
    pub author: String,
    pub text: String,
    pub sentiment: Option<SentimentView>,
}

impl ReviewView {
    pub fn new(record: &Record, sentiment: Option<&SentimentEntry>) -> Self {
        Self {
            id: record.id,
            listing_id: record.listing_id,
            date: record.timestamp,
            author: record.author.clone(),
            text: record.text.clone(),
            sentiment: sentiment.map(SentimentView::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemanticHit {
    pub record_id: u64,
    pub similarity: f64,
    pub text: String,
    pub author: String,
    pub date: NaiveDate,
    pub sentiment: Option<SentimentView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemanticResponse {
    pub query: String,
    pub k: usize,
    /// Window size the search ran against.
    pub searched: usize,
    pub hits: Vec<SemanticHit>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordResponse {
    pub query: String,
    pub hits: Vec<ReviewView>,
}

/// Paged listing of the loaded window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewQuery {
    /// 1-based.
    pub page: usize,
    pub per_page: usize,
    pub label: Option<SentimentLabel>,
    /// Case-insensitive substring filter on the text.
    pub contains: Option<String>,
}

impl Default for ReviewQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: defaults::DEFAULT_PER_PAGE,
            label: None,
            contains: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewPage {
    pub reviews: Vec<ReviewView>,
    /// Matches before pagination.
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}
