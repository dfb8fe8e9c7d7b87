//! Corpus sources.

use std::collections::HashSet;
use std::path::Path;

use revlens_core::errors::CorpusError;
use revlens_core::models::Record;
use revlens_core::traits::ICorpusSource;
use tracing::info;

/// Records held in memory, in corpus order. Ids are unique.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpus {
    records: Vec<Record>,
}

impl InMemoryCorpus {
    pub fn new(records: Vec<Record>) -> Result<Self, CorpusError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id) {
                return Err(CorpusError::DuplicateId { id: record.id });
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

impl ICorpusSource for InMemoryCorpus {
    fn total_available(&self) -> usize {
        self.records.len()
    }

    fn fetch(&self, start: usize, end: usize) -> Result<Vec<Record>, CorpusError> {
        if start > end || end > self.records.len() {
            return Err(CorpusError::OutOfRange {
                start,
                end,
                available: self.records.len(),
            });
        }
        Ok(self.records[start..end].to_vec())
    }
}

/// A JSON Lines file, one record per line, loaded fully on open.
///
/// Lines may use either the record field names or the review dataset column
/// names (`comments`, `date`, `reviewer_name`). Blank lines are skipped.
#[derive(Debug, Clone)]
pub struct JsonlCorpus {
    inner: InMemoryCorpus,
}

impl JsonlCorpus {
    pub fn open(path: &Path) -> Result<Self, CorpusError> {
        let content = std::fs::read_to_string(path).map_err(|e| CorpusError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let corpus = Self::parse(&content)?;
        info!(path = %path.display(), records = corpus.inner.records.len(), "corpus loaded");
        Ok(corpus)
    }

    pub fn parse(content: &str) -> Result<Self, CorpusError> {
        let mut records = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: Record = serde_json::from_str(line).map_err(|e| CorpusError::Parse {
                line: idx + 1,
                reason: e.to_string(),
            })?;
            records.push(record);
        }
        Ok(Self {
            inner: InMemoryCorpus::new(records)?,
        })
    }

    pub fn records(&self) -> &[Record] {
        self.inner.records()
    }
}

impl ICorpusSource for JsonlCorpus {
    fn total_available(&self) -> usize {
        self.inner.total_available()
    }

    fn fetch(&self, start: usize, end: usize) -> Result<Vec<Record>, CorpusError> {
        self.inner.fetch(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_are_rejected() {
        let content = r#"{"id": 1, "text": "a", "timestamp": "2020-01-01", "author": "x"}
{"id": 1, "text": "b", "timestamp": "2020-01-02", "author": "y"}"#;
        assert!(matches!(
            JsonlCorpus::parse(content),
            Err(CorpusError::DuplicateId { id: 1 })
        ));
    }

    #[test]
    fn parse_error_reports_line() {
        let content = "\n{\"id\": 1, \"text\": \"a\", \"timestamp\": \"2020-01-01\", \"author\": \"x\"}\n{oops\n";
        match JsonlCorpus::parse(content) {
            Err(CorpusError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn fetch_checks_range() {
        let corpus = JsonlCorpus::parse(
            r#"{"id": 5, "text": "a", "timestamp": "2020-01-01", "author": "x"}"#,
        )
        .unwrap();
        assert_eq!(corpus.fetch(0, 1).unwrap()[0].id, 5);
        assert!(corpus.fetch(0, 2).is_err());
        assert!(corpus.fetch(0, 0).unwrap().is_empty());
    }
}
