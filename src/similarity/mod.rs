// src/similarity/mod.rs
//! Content-similarity index over a fetched corpus: nearest-neighbour
//! recommendations and top-term extraction.

pub mod handle;
mod stopwords;
pub mod vectorizer;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::article::Article;
use vectorizer::{dot, SparseVec, TfidfVectorizer};

pub use handle::IndexHandle;

pub const MAX_FEATURES: usize = 1000;
/// Articles with fewer combined words carry too little signal to vectorize.
pub const MIN_WORDS: usize = 3;

/// A corpus article returned by [`SimilarityIndex::recommend`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub article: Article,
    pub similarity_score: f64,
}

#[derive(Debug)]
struct Fitted {
    vectorizer: TfidfVectorizer,
    corpus: Vec<Article>,
    vectors: Vec<SparseVec>,
}

/// Either fully fitted (non-empty corpus, one row per article) or empty.
#[derive(Debug, Default)]
pub struct SimilarityIndex {
    fitted: Option<Fitted>,
}

impl SimilarityIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a fresh index. Articles under [`MIN_WORDS`] words are left out;
    /// an empty usable corpus or vocabulary yields an empty index.
    pub fn fit(articles: &[Article]) -> Self {
        let (corpus, texts): (Vec<Article>, Vec<String>) = articles
            .iter()
            .filter_map(|a| {
                let text = a.combined_text();
                (text.split_whitespace().count() >= MIN_WORDS).then(|| (a.clone(), text))
            })
            .unzip();

        if corpus.is_empty() {
            return Self::empty();
        }

        match TfidfVectorizer::fit_transform(&texts, MAX_FEATURES) {
            Some((vectorizer, vectors)) => Self {
                fitted: Some(Fitted {
                    vectorizer,
                    corpus,
                    vectors,
                }),
            },
            None => Self::empty(),
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn corpus(&self) -> &[Article] {
        self.fitted.as_ref().map(|f| f.corpus.as_slice()).unwrap_or(&[])
    }

    pub fn vocabulary_len(&self) -> usize {
        self.fitted
            .as_ref()
            .map(|f| f.vectorizer.terms().len())
            .unwrap_or(0)
    }

    /// Up to `n` corpus articles most similar to `target`, best first, the
    /// target itself excluded. Equal scores keep corpus order.
    pub fn recommend(&self, target: &Article, n: usize) -> Vec<Recommendation> {
        let Some(f) = &self.fitted else {
            return Vec::new();
        };
        let query = f.vectorizer.transform(&target.combined_text());
        if query.is_empty() {
            return Vec::new();
        }

        let sims: Vec<f64> = f
            .vectors
            .iter()
            .map(|row| dot(&query, row).clamp(0.0, 1.0))
            .collect();

        let mut order: Vec<usize> = (0..sims.len()).collect();
        order.sort_by(|&a, &b| sims[b].partial_cmp(&sims[a]).unwrap_or(Ordering::Equal));

        order
            .into_iter()
            .filter(|&i| !target.is_same_as(&f.corpus[i]))
            .take(n)
            .map(|i| Recommendation {
                article: f.corpus[i].clone(),
                similarity_score: round3(sims[i]),
            })
            .collect()
    }

    /// The `k` terms with the highest mean weight across the corpus.
    /// Ties keep vocabulary order.
    pub fn top_terms(&self, k: usize) -> Vec<String> {
        let Some(f) = &self.fitted else {
            return Vec::new();
        };
        let terms = f.vectorizer.terms();
        let mut sums = vec![0.0f64; terms.len()];
        for row in &f.vectors {
            for &(i, w) in row {
                sums[i] += w;
            }
        }
        let rows = f.vectors.len() as f64;
        let means: Vec<f64> = sums.into_iter().map(|s| s / rows).collect();

        let mut order: Vec<usize> = (0..terms.len()).collect();
        order.sort_by(|&a, &b| means[b].partial_cmp(&means[a]).unwrap_or(Ordering::Equal));
        order.into_iter().take(k).map(|i| terms[i].clone()).collect()
    }
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn art(url: &str, title: &str, description: &str) -> Article {
        Article {
            url: url.into(),
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    #[test]
    fn short_articles_are_left_out_in_order() {
        let idx = SimilarityIndex::fit(&[
            art("u1", "Solar panels", "cheaper than ever"),
            art("u2", "Brief", ""),
            art("u3", "Wind farms expand", "offshore"),
        ]);
        let urls: Vec<_> = idx.corpus().iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec!["u1", "u3"]);
    }

    #[test]
    fn unfit_index_answers_empty() {
        let idx = SimilarityIndex::fit(&[art("u", "one", "")]);
        assert!(!idx.is_fitted());
        assert!(idx.recommend(&art("x", "one two three", ""), 3).is_empty());
        assert!(idx.top_terms(5).is_empty());
    }

    #[test]
    fn equal_scores_keep_corpus_order() {
        let idx = SimilarityIndex::fit(&[
            art("u1", "river flood warning", "issued"),
            art("u2", "river flood warning", "issued"),
            art("u3", "stock market rally", "continues"),
        ]);
        let recs = idx.recommend(&art("q", "river flood", "warning"), 2);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].article.url, "u1");
        assert_eq!(recs[1].article.url, "u2");
        assert_eq!(recs[0].similarity_score, recs[1].similarity_score);
    }

    #[test]
    fn out_of_vocabulary_target_gets_nothing() {
        let idx = SimilarityIndex::fit(&[art("u1", "river flood warning", "issued")]);
        assert!(idx.recommend(&art("q", "quantum chess", ""), 3).is_empty());
    }

    #[test]
    fn scores_are_rounded_to_three_places() {
        let idx = SimilarityIndex::fit(&[
            art("u1", "river flood warning", "issued tonight"),
            art("u2", "market rally continues", "tech stocks"),
        ]);
        for r in idx.recommend(&art("q", "flood warning for river towns", ""), 2) {
            let scaled = r.similarity_score * 1000.0;
            assert!((scaled - scaled.round()).abs() < 1e-6);
            assert!((0.0..=1.0).contains(&r.similarity_score));
        }
    }
}
