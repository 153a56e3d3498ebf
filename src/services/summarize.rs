// src/services/summarize.rs
use std::sync::Arc;

use tracing::warn;

use super::{truncate_chars, DisabledModel, DynSummaryModel};

pub const SUMMARY_INPUT_CHARS: usize = 1024;
pub const DEFAULT_MAX_LENGTH: u32 = 150;
pub const DEFAULT_MIN_LENGTH: u32 = 30;
pub const MIN_SUMMARY_INPUT: usize = 50;
pub const TOO_SHORT: &str = "Text too short for summarization";

#[derive(Clone)]
pub struct Summarizer {
    model: DynSummaryModel,
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::disabled()
    }
}

impl Summarizer {
    pub fn new(model: DynSummaryModel) -> Self {
        Self { model }
    }

    pub fn disabled() -> Self {
        Self::new(Arc::new(DisabledModel))
    }

    pub fn model_name(&self) -> &'static str {
        self.model.name()
    }

    /// Model summary of the first 1024 chars, or the extractive fallback.
    pub async fn summarize(&self, text: &str, max_length: u32, min_length: u32) -> String {
        if text.trim().chars().count() < MIN_SUMMARY_INPUT {
            return TOO_SHORT.to_string();
        }
        let input = truncate_chars(text, SUMMARY_INPUT_CHARS);
        match self.model.summarize(input, max_length, min_length).await {
            Ok(s) => s,
            Err(e) => {
                if self.model.name() != "disabled" {
                    warn!(error = %e, model = self.model.name(), "summarization failed, using fallback");
                }
                extractive_summary(text, max_length as usize)
            }
        }
    }
}

/// First three `". "`-separated sentences, terminated with a period and cut
/// to `max_length` chars. Two sentences or fewer come back unchanged.
pub fn extractive_summary(text: &str, max_length: usize) -> String {
    let sentences: Vec<&str> = text.split(". ").collect();
    if sentences.len() <= 2 {
        return text.to_string();
    }
    let mut summary = sentences[..3].join(". ");
    if !summary.ends_with('.') {
        summary.push('.');
    }
    truncate_chars(&summary, max_length).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{BoxFuture, SummaryModel};

    struct Fixed;
    impl SummaryModel for Fixed {
        fn summarize<'a>(
            &'a self,
            text: &'a str,
            _max: u32,
            _min: u32,
        ) -> BoxFuture<'a, anyhow::Result<String>> {
            Box::pin(async move { Ok(format!("len={}", text.chars().count())) })
        }
        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    #[test]
    fn extractive_takes_three_sentences() {
        let t = "One is here. Two is here. Three is here. Four is here.";
        assert_eq!(extractive_summary(t, 150), "One is here. Two is here. Three is here.");
        assert_eq!(extractive_summary(t, 8), "One is h");
        assert_eq!(extractive_summary("Only. Two", 150), "Only. Two");
    }

    #[tokio::test]
    async fn short_input_is_refused() {
        let s = Summarizer::disabled();
        assert_eq!(s.summarize("   tiny   ", 150, 30).await, TOO_SHORT);
    }

    #[tokio::test]
    async fn model_sees_truncated_input() {
        let s = Summarizer::new(Arc::new(Fixed));
        let long = "word ".repeat(1000);
        assert_eq!(s.summarize(&long, 150, 30).await, "len=1024");
    }

    #[tokio::test]
    async fn disabled_model_falls_back() {
        let s = Summarizer::disabled();
        let t = "Markets rose today. Oil slipped. Gold held steady. Bonds were flat overall.";
        assert_eq!(
            s.summarize(t, 150, 30).await,
            "Markets rose today. Oil slipped. Gold held steady."
        );
    }
}
