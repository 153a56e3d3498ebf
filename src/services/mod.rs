//! Capability services: summarization and sentiment.
//!
//! Both wrap an optional hosted model behind a trait and fall back to a local
//! heuristic whenever the model is disabled or fails. Callers always get a
//! best-effort answer, never an error.

pub mod hf;
pub mod sentiment;
pub mod summarize;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub use sentiment::{Confidence, SentimentAnalyzer, SentimentLabel, SentimentResult};
pub use summarize::Summarizer;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Abstractive summarization backend.
pub trait SummaryModel: Send + Sync {
    fn summarize<'a>(
        &'a self,
        text: &'a str,
        max_length: u32,
        min_length: u32,
    ) -> BoxFuture<'a, anyhow::Result<String>>;
    fn name(&self) -> &'static str;
}

/// Raw classifier output before mapping to [`SentimentResult`].
#[derive(Debug, Clone, PartialEq)]
pub struct ModelLabel {
    pub label: String,
    pub score: f64,
}

/// Sentiment classification backend.
pub trait SentimentModel: Send + Sync {
    fn classify<'a>(&'a self, text: &'a str) -> BoxFuture<'a, anyhow::Result<ModelLabel>>;
    fn name(&self) -> &'static str;
}

/// Always fails; selects the local fallback.
pub struct DisabledModel;

impl SummaryModel for DisabledModel {
    fn summarize<'a>(
        &'a self,
        _text: &'a str,
        _max_length: u32,
        _min_length: u32,
    ) -> BoxFuture<'a, anyhow::Result<String>> {
        Box::pin(async { Err(anyhow::anyhow!("summary model disabled")) })
    }
    fn name(&self) -> &'static str {
        "disabled"
    }
}

impl SentimentModel for DisabledModel {
    fn classify<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, anyhow::Result<ModelLabel>> {
        Box::pin(async { Err(anyhow::anyhow!("sentiment model disabled")) })
    }
    fn name(&self) -> &'static str {
        "disabled"
    }
}

pub type DynSummaryModel = Arc<dyn SummaryModel>;
pub type DynSentimentModel = Arc<dyn SentimentModel>;

/// First `max` chars of `s` (char boundary safe).
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
