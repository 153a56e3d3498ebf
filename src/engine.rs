//! # NewsHub Engine
//! The aggregation-and-similarity core handed to the service layer:
//! fetch → (re-fit) → recommend / top terms, plus the capability services.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::article::Article;
use crate::config::AppConfig;
use crate::error::Result;
use crate::favorites::{FavoritesStore, InMemoryFavorites, SqliteFavorites};
use crate::fetch::{self, FetchQuery};
use crate::provider::{NewsApiClient, NewsProvider};
use crate::services::hf::HfModel;
use crate::services::{SentimentAnalyzer, Summarizer};
use crate::similarity::{IndexHandle, Recommendation};

#[derive(Clone)]
pub struct NewsHub {
    provider: Arc<dyn NewsProvider>,
    index: IndexHandle,
    pub summarizer: Summarizer,
    pub sentiment: SentimentAnalyzer,
    pub favorites: Arc<dyn FavoritesStore>,
}

impl NewsHub {
    /// Engine over `provider` with fallback-only capability services and an
    /// in-memory favorites store.
    pub fn new(provider: Arc<dyn NewsProvider>) -> Self {
        Self {
            provider,
            index: IndexHandle::new(),
            summarizer: Summarizer::disabled(),
            sentiment: SentimentAnalyzer::disabled(),
            favorites: Arc::new(InMemoryFavorites::new()),
        }
    }

    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let client = NewsApiClient::new(
            &cfg.newsapi.base_url,
            &cfg.newsapi.api_key,
            Duration::from_secs(cfg.newsapi.timeout_secs),
        )?;
        info!(
            base_url = %cfg.newsapi.base_url,
            key_len = cfg.newsapi.api_key.len(),
            timeout_secs = cfg.newsapi.timeout_secs,
            "news provider configured"
        );
        let favorites = SqliteFavorites::open(&cfg.storage.favorites_db)?;
        let mut hub = Self::new(Arc::new(client)).with_favorites(Arc::new(favorites));

        match cfg.models.hf_token.as_deref() {
            Some(token) => {
                let m = &cfg.models;
                hub.summarizer =
                    Summarizer::new(Arc::new(HfModel::new(&m.base_url, &m.summarizer, token)?));
                hub.sentiment =
                    SentimentAnalyzer::new(Arc::new(HfModel::new(&m.base_url, &m.sentiment, token)?));
                info!(summarizer = %m.summarizer, sentiment = %m.sentiment, "hosted models enabled");
            }
            None => warn!("HF_API_TOKEN not set; summarization and sentiment use local fallbacks"),
        }
        Ok(hub)
    }

    pub fn with_favorites(mut self, store: Arc<dyn FavoritesStore>) -> Self {
        self.favorites = store;
        self
    }

    pub fn with_services(mut self, summarizer: Summarizer, sentiment: SentimentAnalyzer) -> Self {
        self.summarizer = summarizer;
        self.sentiment = sentiment;
        self
    }

    pub fn index(&self) -> &IndexHandle {
        &self.index
    }

    /// Single-region fetch; a successful result re-fits the similarity index.
    pub async fn fetch(&self, query: &FetchQuery) -> Result<Vec<Article>> {
        let articles = fetch::fetch_single(self.provider.as_ref(), query).await?;
        self.reindex(&articles);
        Ok(articles)
    }

    /// Up to 10 trending articles for a country or the world sentinels.
    pub async fn fetch_trending(&self, country: &str) -> Result<Vec<Article>> {
        fetch::fetch_trending(self.provider.as_ref(), country).await
    }

    /// Replace the similarity index with one fitted on `articles`.
    pub fn reindex(&self, articles: &[Article]) {
        self.index.reindex(articles);
    }

    pub fn recommend(&self, target: &Article, n: usize) -> Vec<Recommendation> {
        self.index.snapshot().recommend(target, n)
    }

    pub fn top_terms(&self, k: usize) -> Vec<String> {
        self.index.snapshot().top_terms(k)
    }
}
