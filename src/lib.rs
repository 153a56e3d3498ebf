// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod article;
pub mod config;
pub mod engine;
pub mod error;
pub mod favorites;
pub mod fetch;
pub mod metrics;
pub mod provider;
pub mod recency;
pub mod services;
pub mod similarity;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::article::{normalize, Article, ArticleSource, RawArticle};
pub use crate::engine::NewsHub;
pub use crate::error::NewsError;
pub use crate::fetch::FetchQuery;
pub use crate::similarity::{Recommendation, SimilarityIndex};
