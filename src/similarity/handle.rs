// src/similarity/handle.rs
use std::sync::{Arc, RwLock};

use metrics::{counter, gauge};
use tracing::info;

use super::SimilarityIndex;
use crate::article::Article;

/// Process-wide, swappable similarity index.
///
/// Readers take an `Arc` snapshot and work against it to completion; a
/// re-fit builds the new index outside the lock and swaps the reference, so a
/// reader sees either the whole old index or the whole new one.
#[derive(Clone, Default)]
pub struct IndexHandle {
    inner: Arc<RwLock<Arc<SimilarityIndex>>>,
}

impl IndexHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<SimilarityIndex> {
        match self.inner.read() {
            Ok(g) => Arc::clone(&g),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn replace(&self, index: SimilarityIndex) {
        let fresh = Arc::new(index);
        match self.inner.write() {
            Ok(mut g) => *g = fresh,
            Err(poisoned) => {
                let mut g = poisoned.into_inner();
                *g = fresh;
            }
        }
    }

    /// Fit on `articles` and swap it in. Returns the new corpus size.
    pub fn reindex(&self, articles: &[Article]) -> usize {
        let index = SimilarityIndex::fit(articles);
        let corpus = index.corpus().len();
        if index.is_fitted() {
            info!(corpus, vocabulary = index.vocabulary_len(), "similarity index fitted");
        } else {
            info!(input = articles.len(), "no usable article text, similarity index cleared");
        }
        self.replace(index);

        counter!("newshub_index_fits_total").increment(1);
        gauge!("newshub_index_corpus_size").set(corpus as f64);
        corpus
    }
}
