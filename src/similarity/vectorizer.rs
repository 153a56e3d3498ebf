// src/similarity/vectorizer.rs
//! TF-IDF over unigrams and adjacent-pair bigrams with a bounded vocabulary.
//!
//! Weights: raw term count × smoothed idf `ln((1+n)/(1+df)) + 1`, rows L2
//! normalized. The vocabulary keeps the `max_features` most frequent terms
//! (ties by term) and is ordered alphabetically.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use super::stopwords::is_stop_word;

/// Sparse row: `(feature index, weight)` sorted by index.
pub type SparseVec = Vec<(usize, f64)>;

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?u)\b\w\w+\b").expect("token regex"));

/// Lower-cased word tokens (2+ word chars), stop words removed.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| !is_stop_word(t))
        .map(str::to_string)
        .collect()
}

/// Unigrams followed by bigrams of adjacent kept tokens.
pub fn features(text: &str) -> Vec<String> {
    let toks = tokenize(text);
    let mut out = Vec::with_capacity(toks.len() * 2);
    out.extend(toks.iter().cloned());
    out.extend(toks.windows(2).map(|w| format!("{} {}", w[0], w[1])));
    out
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    /// Feature names in vocabulary order.
    terms: Vec<String>,
    index: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn vocabulary and idf from `docs` and return their rows.
    /// `None` when no document yields a single feature.
    pub fn fit_transform(docs: &[String], max_features: usize) -> Option<(Self, Vec<SparseVec>)> {
        let counted: Vec<HashMap<String, u32>> = docs.iter().map(|d| count(features(d))).collect();

        let mut total: HashMap<&str, u64> = HashMap::new();
        let mut df: HashMap<&str, u32> = HashMap::new();
        for doc in &counted {
            for (term, n) in doc {
                *total.entry(term.as_str()).or_default() += u64::from(*n);
                *df.entry(term.as_str()).or_default() += 1;
            }
        }
        if total.is_empty() {
            return None;
        }

        let mut ranked: Vec<(&str, u64)> = total.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(max_features);

        let mut terms: Vec<String> = ranked.iter().map(|(t, _)| t.to_string()).collect();
        terms.sort();

        let n_docs = docs.len() as f64;
        let idf = terms
            .iter()
            .map(|t| {
                let d = f64::from(df.get(t.as_str()).copied().unwrap_or(0));
                ((1.0 + n_docs) / (1.0 + d)).ln() + 1.0
            })
            .collect();
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        let vectorizer = Self { terms, index, idf };
        let rows = counted.iter().map(|c| vectorizer.weigh(c)).collect();
        Some((vectorizer, rows))
    }

    /// Vectorize with the fitted vocabulary; out-of-vocabulary terms are ignored.
    pub fn transform(&self, text: &str) -> SparseVec {
        self.weigh(&count(features(text)))
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    fn weigh(&self, counts: &HashMap<String, u32>) -> SparseVec {
        let mut row: SparseVec = counts
            .iter()
            .filter_map(|(t, n)| {
                self.index
                    .get(t)
                    .map(|&i| (i, f64::from(*n) * self.idf[i]))
            })
            .collect();
        row.sort_by_key(|(i, _)| *i);

        let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in row.iter_mut() {
                *w /= norm;
            }
        }
        row
    }
}

fn count(feats: Vec<String>) -> HashMap<String, u32> {
    let mut m = HashMap::new();
    for f in feats {
        *m.entry(f).or_insert(0) += 1;
    }
    m
}

/// Dot product of two index-sorted sparse rows.
pub fn dot(a: &SparseVec, b: &SparseVec) -> f64 {
    let (mut i, mut j, mut acc) = (0, 0, 0.0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                acc += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    acc
}
