use serde::{Deserialize, Serialize};

use super::EntryStatus;
use crate::constants::{NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD};

/// Sentiment label derived from the compound score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// `>= 0.05` positive, `<= -0.05` negative, neutral otherwise.
    pub fn from_compound(compound: f32) -> Self {
        if compound >= POSITIVE_THRESHOLD {
            Self::Positive
        } else if compound <= NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "positive" => Some(Self::Positive),
            "neutral" => Some(Self::Neutral),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }
}

/// Raw output of a sentiment provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    /// Normalized overall score in [-1, 1].
    pub compound: f32,
    pub positive: f32,
    pub neutral: f32,
    pub negative: f32,
    /// 0.0 (objective) to 1.0 (subjective).
    pub subjectivity: f32,
}

impl SentimentScores {
    /// Safe default used for degraded and pending entries.
    pub fn neutral() -> Self {
        Self {
            compound: 0.0,
            positive: 0.0,
            neutral: 1.0,
            negative: 0.0,
            subjectivity: 0.0,
        }
    }
}

/// Per-polarity proportions kept alongside the compound score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentComponents {
    pub positive: f32,
    pub neutral: f32,
    pub negative: f32,
    pub subjectivity: f32,
}

/// Sentiment index entry for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentEntry {
    pub record_id: u64,
    pub compound_score: f32,
    pub label: SentimentLabel,
    pub components: SentimentComponents,
    pub status: EntryStatus,
}

impl SentimentEntry {
    pub fn new(record_id: u64, scores: SentimentScores, status: EntryStatus) -> Self {
        let compound = scores.compound.clamp(-1.0, 1.0);
        Self {
            record_id,
            compound_score: compound,
            label: SentimentLabel::from_compound(compound),
            components: SentimentComponents {
                positive: scores.positive,
                neutral: scores.neutral,
                negative: scores.negative,
                subjectivity: scores.subjectivity,
            },
            status,
        }
    }

    pub fn scores(&self) -> SentimentScores {
        SentimentScores {
            compound: self.compound_score,
            positive: self.components.positive,
            neutral: self.components.neutral,
            negative: self.components.negative,
            subjectivity: self.components.subjectivity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_thresholds_are_inclusive() {
        assert_eq!(SentimentLabel::from_compound(0.05), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_compound(-0.05), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_compound(0.049), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_compound(-0.049), SentimentLabel::Neutral);
    }

    #[test]
    fn entry_clamps_out_of_range_compound() {
        let scores = SentimentScores {
            compound: 1.7,
            ..SentimentScores::neutral()
        };
        let entry = SentimentEntry::new(1, scores, EntryStatus::Scored);
        assert_eq!(entry.compound_score, 1.0);
        assert_eq!(entry.label, SentimentLabel::Positive);
    }

    #[test]
    fn label_string_roundtrip() {
        for label in [
            SentimentLabel::Positive,
            SentimentLabel::Neutral,
            SentimentLabel::Negative,
        ] {
            assert_eq!(SentimentLabel::parse(label.as_str()), Some(label));
        }
        assert_eq!(SentimentLabel::parse("mixed"), None);
    }
}
