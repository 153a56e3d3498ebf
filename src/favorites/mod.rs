//! User-selected articles keyed by URL.

pub mod sqlite;

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::article::Article;

pub use sqlite::SqliteFavorites;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    #[serde(flatten)]
    pub article: Article,
    pub saved_at: DateTime<Utc>,
}

/// Keyed record store for favorites.
pub trait FavoritesStore: Send + Sync {
    /// Insert unless the URL is already present. Idempotent: re-adding an
    /// existing URL returns `true` without changing it. `false` means the
    /// article has no URL and was not stored.
    fn add(&self, article: &Article) -> anyhow::Result<bool>;
    /// All favorites, most recently saved first.
    fn list(&self) -> anyhow::Result<Vec<Favorite>>;
    /// `true` when a record was removed.
    fn remove(&self, url: &str) -> anyhow::Result<bool>;
    fn exists(&self, url: &str) -> anyhow::Result<bool>;
}

#[derive(Debug, Default)]
pub struct InMemoryFavorites {
    inner: Mutex<Vec<Favorite>>,
}

impl InMemoryFavorites {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut Vec<Favorite>) -> R) -> R {
        let mut g = match self.inner.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut g)
    }
}

impl FavoritesStore for InMemoryFavorites {
    fn add(&self, article: &Article) -> anyhow::Result<bool> {
        if article.url.is_empty() {
            return Ok(false);
        }
        Ok(self.with(|v| {
            if !v.iter().any(|f| f.article.url == article.url) {
                v.push(Favorite {
                    article: article.clone(),
                    saved_at: Utc::now(),
                });
            }
            true
        }))
    }

    fn list(&self) -> anyhow::Result<Vec<Favorite>> {
        // insertion order is save order; newest last
        Ok(self.with(|v| v.iter().rev().cloned().collect()))
    }

    fn remove(&self, url: &str) -> anyhow::Result<bool> {
        Ok(self.with(|v| {
            let before = v.len();
            v.retain(|f| f.article.url != url);
            v.len() != before
        }))
    }

    fn exists(&self, url: &str) -> anyhow::Result<bool> {
        Ok(self.with(|v| v.iter().any(|f| f.article.url == url)))
    }
}
