//! Rule-based sentiment scorer.
//!
//! Valence lexicon with negation and intensity modifiers. The summed valence is
//! squashed into [-1, 1] with `x / sqrt(x² + alpha)`. Runs in-process, so it never
//! fails transiently.

use std::collections::HashMap;

use revlens_core::errors::ProviderError;
use revlens_core::models::SentimentScores;
use revlens_core::traits::ISentimentProvider;

const MODEL_ID: &str = "lexicon-v1";

/// Normalization constant for the compound score.
const ALPHA: f32 = 15.0;

/// Scale applied to a negated valence.
const NEGATION_SCALAR: f32 = -0.74;

/// Valence added (in the direction of the word) by a booster.
const BOOST_INCREMENT: f32 = 0.293;

/// How many preceding tokens are checked for negations and boosters.
const LOOKBACK: usize = 3;

/// Emphasis added per exclamation mark, up to four.
const EXCLAMATION_BOOST: f32 = 0.292;

const VALENCES: &[(&str, f32)] = &[
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("brilliant", 2.8),
    ("charming", 2.2),
    ("clean", 1.7),
    ("comfortable", 1.8),
    ("comfy", 1.7),
    ("convenient", 1.5),
    ("cozy", 1.9),
    ("cosy", 1.9),
    ("delightful", 2.9),
    ("easy", 1.9),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("excellent", 2.7),
    ("fantastic", 2.6),
    ("friendly", 2.2),
    ("gorgeous", 3.0),
    ("great", 3.1),
    ("good", 1.9),
    ("happy", 2.7),
    ("helpful", 1.8),
    ("hospitable", 1.9),
    ("love", 3.2),
    ("loved", 2.9),
    ("lovely", 2.8),
    ("nice", 1.8),
    ("perfect", 2.7),
    ("pleasant", 2.3),
    ("quiet", 0.9),
    ("recommend", 1.5),
    ("recommended", 1.6),
    ("responsive", 1.5),
    ("spacious", 1.4),
    ("spotless", 2.1),
    ("stunning", 2.7),
    ("superb", 3.1),
    ("thanks", 1.9),
    ("welcoming", 2.0),
    ("wonderful", 2.7),
    ("awful", -2.0),
    ("bad", -2.5),
    ("broken", -1.9),
    ("cold", -0.7),
    ("complaint", -1.5),
    ("cramped", -1.4),
    ("dirty", -1.9),
    ("disappointed", -2.1),
    ("disappointing", -2.2),
    ("disgusting", -2.4),
    ("filthy", -2.5),
    ("hate", -2.7),
    ("horrible", -2.5),
    ("loud", -0.9),
    ("mess", -1.5),
    ("messy", -1.5),
    ("noisy", -1.3),
    ("poor", -2.1),
    ("problem", -1.7),
    ("problems", -1.7),
    ("rude", -2.0),
    ("smelly", -1.8),
    ("stained", -1.4),
    ("terrible", -2.1),
    ("uncomfortable", -1.6),
    ("unfriendly", -1.9),
    ("unhelpful", -1.9),
    ("unsafe", -2.0),
    ("worse", -2.1),
    ("worst", -3.1),
];

const BOOSTERS: &[(&str, f32)] = &[
    ("absolutely", BOOST_INCREMENT),
    ("extremely", BOOST_INCREMENT),
    ("highly", BOOST_INCREMENT),
    ("incredibly", BOOST_INCREMENT),
    ("really", BOOST_INCREMENT),
    ("so", BOOST_INCREMENT),
    ("super", BOOST_INCREMENT),
    ("totally", BOOST_INCREMENT),
    ("very", BOOST_INCREMENT),
    ("barely", -BOOST_INCREMENT),
    ("slightly", -BOOST_INCREMENT),
    ("somewhat", -BOOST_INCREMENT),
    ("kinda", -BOOST_INCREMENT),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "nothing", "nobody", "none", "neither", "nor", "without", "hardly",
    "cannot", "dont", "didnt", "doesnt", "isnt", "wasnt", "werent", "wont", "cant", "couldnt",
    "wouldnt", "shouldnt", "hadnt", "hasnt", "havent", "arent", "aint",
];

/// Lexicon sentiment scorer.
pub struct LexiconScorer {
    valences: HashMap<&'static str, f32>,
    boosters: HashMap<&'static str, f32>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            valences: VALENCES.iter().copied().collect(),
            boosters: BOOSTERS.iter().copied().collect(),
        }
    }

    /// Lowercase word tokens with apostrophes dropped (`didn't` -> `didnt`).
    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '\'' && c != '\u{2019}')
            .map(|t| {
                t.chars()
                    .filter(|c| *c != '\'' && *c != '\u{2019}')
                    .flat_map(char::to_lowercase)
                    .collect::<String>()
            })
            .filter(|t| !t.is_empty())
            .collect()
    }

    fn is_negation(token: &str) -> bool {
        NEGATIONS.contains(&token)
    }

    /// Valence of the token at `idx`, adjusted by the tokens before it.
    fn token_valence(&self, tokens: &[String], idx: usize) -> Option<f32> {
        let mut valence = *self.valences.get(tokens[idx].as_str())?;
        let start = idx.saturating_sub(LOOKBACK);
        for (distance, prev) in tokens[start..idx].iter().rev().enumerate() {
            if let Some(&boost) = self.boosters.get(prev.as_str()) {
                // Boosters further away count less.
                let scaled = boost * (1.0 - 0.05 * distance as f32);
                valence += if valence > 0.0 { scaled } else { -scaled };
            }
        }
        if tokens[start..idx].iter().any(|t| Self::is_negation(t)) {
            valence *= NEGATION_SCALAR;
        }
        Some(valence)
    }

    /// Score `text`. Never fails.
    pub fn polarity_scores(&self, text: &str) -> SentimentScores {
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return SentimentScores::neutral();
        }

        let valences: Vec<Option<f32>> = (0..tokens.len())
            .map(|i| self.token_valence(&tokens, i))
            .collect();

        let mut sum: f32 = valences.iter().flatten().sum();
        if sum != 0.0 {
            let marks = text.chars().filter(|c| *c == '!').count().min(4) as f32;
            let emphasis = marks * EXCLAMATION_BOOST;
            sum += if sum > 0.0 { emphasis } else { -emphasis };
        }
        let compound = sum / (sum * sum + ALPHA).sqrt();

        let mut pos = 0.0f32;
        let mut neg = 0.0f32;
        let mut neu = 0.0f32;
        let mut bearing = 0usize;
        for v in &valences {
            match v {
                Some(v) if *v > 0.0 => {
                    pos += v + 1.0;
                    bearing += 1;
                }
                Some(v) if *v < 0.0 => {
                    neg += v.abs() + 1.0;
                    bearing += 1;
                }
                _ => neu += 1.0,
            }
        }
        let total = pos + neg + neu;

        SentimentScores {
            compound: compound.clamp(-1.0, 1.0),
            positive: pos / total,
            neutral: neu / total,
            negative: neg / total,
            subjectivity: bearing as f32 / tokens.len() as f32,
        }
    }
}

impl ISentimentProvider for LexiconScorer {
    fn score(&self, text: &str) -> Result<SentimentScores, ProviderError> {
        Ok(self.polarity_scores(text))
    }

    fn model_id(&self) -> &str {
        MODEL_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revlens_core::models::SentimentLabel;

    fn label(text: &str) -> SentimentLabel {
        SentimentLabel::from_compound(LexiconScorer::new().polarity_scores(text).compound)
    }

    #[test]
    fn short_reviews_get_expected_labels() {
        assert_eq!(label("great host"), SentimentLabel::Positive);
        assert_eq!(label("not good"), SentimentLabel::Negative);
        assert_eq!(label("ok stay"), SentimentLabel::Neutral);
    }

    #[test]
    fn empty_text_is_neutral() {
        let s = LexiconScorer::new().polarity_scores("");
        assert_eq!(s, SentimentScores::neutral());
    }

    #[test]
    fn boosters_strengthen_valence() {
        let scorer = LexiconScorer::new();
        let plain = scorer.polarity_scores("the host was nice").compound;
        let boosted = scorer.polarity_scores("the host was very nice").compound;
        assert!(boosted > plain);
    }

    #[test]
    fn contractions_negate() {
        assert_eq!(label("we didn't enjoy it"), SentimentLabel::Negative);
        assert_eq!(label("the room wasn’t clean"), SentimentLabel::Negative);
    }

    #[test]
    fn proportions_sum_to_one() {
        let s = LexiconScorer::new().polarity_scores("lovely place but a dirty kitchen");
        let total = s.positive + s.neutral + s.negative;
        assert!((total - 1.0).abs() < 1e-5);
        assert!(s.subjectivity > 0.0 && s.subjectivity < 1.0);
    }

    #[test]
    fn compound_stays_in_range() {
        let s = LexiconScorer::new()
            .polarity_scores("best best best amazing perfect wonderful love love!!!!!");
        assert!(s.compound <= 1.0 && s.compound > 0.9);
    }
}
