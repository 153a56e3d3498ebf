// src/services/sentiment.rs
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{truncate_chars, DisabledModel, DynSentimentModel, ModelLabel};

pub const SENTIMENT_INPUT_CHARS: usize = 512;
pub const MIN_SENTIMENT_INPUT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub score: f64,
    pub confidence: Confidence,
}

impl SentimentResult {
    fn neutral() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score: 0.5,
            confidence: Confidence::Low,
        }
    }
}

const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "amazing",
    "wonderful",
    "fantastic",
    "positive",
    "success",
    "win",
    "achievement",
    "breakthrough",
    "innovation",
    "growth",
    "profit",
    "gain",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "negative", "failure", "lose", "problem", "issue",
    "crisis", "decline", "loss", "crash", "disaster",
];

#[derive(Clone)]
pub struct SentimentAnalyzer {
    model: DynSentimentModel,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::disabled()
    }
}

impl SentimentAnalyzer {
    pub fn new(model: DynSentimentModel) -> Self {
        Self { model }
    }

    pub fn disabled() -> Self {
        Self::new(Arc::new(DisabledModel))
    }

    pub fn model_name(&self) -> &'static str {
        self.model.name()
    }

    /// Classify the first 512 chars; keyword fallback when the model is
    /// unavailable.
    pub async fn analyze(&self, text: &str) -> SentimentResult {
        if text.trim().chars().count() < MIN_SENTIMENT_INPUT {
            return SentimentResult::neutral();
        }
        let input = truncate_chars(text, SENTIMENT_INPUT_CHARS);
        match self.model.classify(input).await {
            Ok(m) => from_model(&m),
            Err(e) => {
                if self.model.name() != "disabled" {
                    warn!(error = %e, model = self.model.name(), "sentiment model failed, using fallback");
                }
                keyword_sentiment(text)
            }
        }
    }
}

/// Map a classifier label (`positive`, `LABEL_2`, ...) onto the fixed scale.
pub fn from_model(m: &ModelLabel) -> SentimentResult {
    let upper = m.label.to_ascii_uppercase();
    let label = if upper.contains("POSITIVE") || upper.contains("LABEL_2") {
        SentimentLabel::Positive
    } else if upper.contains("NEGATIVE") || upper.contains("LABEL_0") {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };
    let score = m.score.clamp(0.0, 1.0);
    let confidence = if score > 0.8 {
        Confidence::High
    } else if score > 0.6 {
        Confidence::Medium
    } else {
        Confidence::Low
    };
    SentimentResult {
        label,
        score: (score * 1000.0).round() / 1000.0,
        confidence,
    }
}

/// Count positive vs negative keywords present (substring match, lower-case).
pub fn keyword_sentiment(text: &str) -> SentimentResult {
    let lower = text.to_lowercase();
    let pos = POSITIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();
    let neg = NEGATIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();

    let label = match pos.cmp(&neg) {
        std::cmp::Ordering::Greater => SentimentLabel::Positive,
        std::cmp::Ordering::Less => SentimentLabel::Negative,
        std::cmp::Ordering::Equal => return SentimentResult::neutral(),
    };
    SentimentResult {
        label,
        score: 0.7,
        confidence: Confidence::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_fallback_counts_words() {
        let r = keyword_sentiment("A great breakthrough for the team");
        assert_eq!(r.label, SentimentLabel::Positive);
        assert_eq!(r.score, 0.7);
        let r = keyword_sentiment("Crash deepens the crisis");
        assert_eq!(r.label, SentimentLabel::Negative);
        let r = keyword_sentiment("The committee met on Tuesday");
        assert_eq!(r, SentimentResult::neutral());
    }

    #[test]
    fn model_labels_map_with_confidence() {
        let r = from_model(&ModelLabel {
            label: "LABEL_2".into(),
            score: 0.91234,
        });
        assert_eq!(r.label, SentimentLabel::Positive);
        assert_eq!(r.score, 0.912);
        assert_eq!(r.confidence, Confidence::High);

        let r = from_model(&ModelLabel {
            label: "negative".into(),
            score: 0.7,
        });
        assert_eq!(r.label, SentimentLabel::Negative);
        assert_eq!(r.confidence, Confidence::Medium);

        let r = from_model(&ModelLabel {
            label: "neutral".into(),
            score: 0.5,
        });
        assert_eq!(r.label, SentimentLabel::Neutral);
        assert_eq!(r.confidence, Confidence::Low);
    }

    #[tokio::test]
    async fn short_text_is_neutral() {
        let a = SentimentAnalyzer::disabled();
        assert_eq!(a.analyze("  ok  ").await, SentimentResult::neutral());
    }

    #[test]
    fn wire_format_matches_contract() {
        let v = serde_json::to_value(keyword_sentiment("great win")).unwrap();
        assert_eq!(v["label"], "POSITIVE");
        assert_eq!(v["confidence"], "low");
    }
}
