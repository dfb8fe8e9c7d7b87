use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One review in the corpus. Immutable once ingested.
///
/// Field aliases accept the column names of the source review dataset
/// (`comments`, `date`, `reviewer_name`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<u64>,
    #[serde(alias = "comments")]
    pub text: String,
    #[serde(alias = "date")]
    pub timestamp: NaiveDate,
    #[serde(alias = "reviewer_name")]
    pub author: String,
}

impl Record {
    pub fn new(
        id: u64,
        text: impl Into<String>,
        timestamp: NaiveDate,
        author: impl Into<String>,
    ) -> Self {
        Self {
            id,
            listing_id: None,
            text: text.into(),
            timestamp,
            author: author.into(),
        }
    }

    /// Calendar month bucket, e.g. `2019-05`.
    pub fn month_key(&self) -> String {
        format!("{:04}-{:02}", self.timestamp.year(), self.timestamp.month())
    }

    /// First `max_chars` characters, with `...` appended when cut.
    pub fn excerpt(&self, max_chars: usize) -> String {
        match self.text.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => format!("{}...", &self.text[..byte_idx]),
            None => self.text.clone(),
        }
    }
}
