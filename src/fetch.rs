// src/fetch.rs
//! Fetch orchestration: headline query with a search fallback for one region,
//! and URL-deduplicated fan-out across regions for world trending.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::article::{normalize, normalize_all, Article};
use crate::error::{NewsError, Result};
use crate::provider::tables::{
    country_display_name, is_supported_country, is_world, language_for, route_category,
    world_countries,
};
use crate::provider::{call, Endpoint, NewsProvider, Params};
use crate::recency::{filter_recent, DEFAULT_HORIZON_HOURS};

pub const FALLBACK_PAGE_SIZE: u32 = 20;
pub const FALLBACK_LOOKBACK_DAYS: i64 = 7;
pub const WORLD_ARTICLE_CAP: usize = 10;
pub const TRENDING_ARTICLE_CAP: usize = 10;

/// One incoming news request. Built per call, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchQuery {
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, alias = "q")]
    pub keyword: Option<String>,
}

fn default_country() -> String {
    "us".to_string()
}

fn default_category() -> String {
    "general".to_string()
}

impl Default for FetchQuery {
    fn default() -> Self {
        Self {
            country: default_country(),
            category: default_category(),
            keyword: None,
        }
    }
}

impl FetchQuery {
    pub fn new(country: &str, category: &str, keyword: Option<&str>) -> Self {
        Self {
            country: country.to_string(),
            category: category.to_string(),
            keyword: keyword.map(str::to_string),
        }
    }

    fn keyword_trimmed(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// Category and keyword after routing through the category table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuery {
    pub upstream_category: String,
    pub keyword: Option<String>,
    /// Lower-cased country code, present only when the provider accepts it.
    pub country_filter: Option<String>,
}

pub fn resolve(query: &FetchQuery) -> ResolvedQuery {
    let (upstream_category, fold) = route_category(&query.category);
    let keyword = match (query.keyword_trimmed(), fold) {
        (Some(k), true) => Some(format!("{k} {}", query.category)),
        (None, true) => Some(query.category.clone()),
        (Some(k), false) => Some(k.to_string()),
        (None, false) => None,
    };
    let country_filter =
        is_supported_country(&query.country).then(|| query.country.to_ascii_lowercase());
    ResolvedQuery {
        upstream_category,
        keyword,
        country_filter,
    }
}

pub fn primary_params(resolved: &ResolvedQuery) -> Params {
    let mut params: Params = vec![("category".into(), resolved.upstream_category.clone())];
    if let Some(c) = &resolved.country_filter {
        params.push(("country".into(), c.clone()));
    }
    if let Some(k) = &resolved.keyword {
        params.push(("q".into(), k.clone()));
    }
    params
}

/// Free-text query for the search fallback: category, the caller's keyword
/// and the country display name. The keyword is taken before category
/// folding, so a folded category is not repeated; the caller's own words are
/// passed through untouched.
pub fn fallback_query_string(query: &FetchQuery) -> String {
    let country_name = country_display_name(&query.country);
    let category = query.category.trim();
    [Some(category), query.keyword_trimmed(), Some(country_name.as_str())]
        .into_iter()
        .flatten()
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn fallback_params(query: &FetchQuery, now: DateTime<Utc>) -> Params {
    let from = now - Duration::days(FALLBACK_LOOKBACK_DAYS);
    vec![
        ("q".into(), fallback_query_string(query)),
        ("language".into(), language_for(&query.country).to_string()),
        ("pageSize".into(), FALLBACK_PAGE_SIZE.to_string()),
        ("sortBy".into(), "publishedAt".into()),
        ("from".into(), from.format("%Y-%m-%d").to_string()),
        ("to".into(), now.format("%Y-%m-%d").to_string()),
    ]
}

/// Single-region fetch: headlines first, search fallback when headlines come
/// back empty. Both paths are normalized and recency-filtered.
///
/// Headline failures surface as `NewsError`. A rejected or undecodable
/// fallback reply yields an empty list; transport failures still surface.
pub async fn fetch_single(provider: &dyn NewsProvider, query: &FetchQuery) -> Result<Vec<Article>> {
    let resolved = resolve(query);
    info!(
        country = %query.country,
        category = %query.category,
        keyword = ?resolved.keyword,
        upstream_category = %resolved.upstream_category,
        country_filter = ?resolved.country_filter,
        "fetching headlines"
    );

    let raws = call(provider, Endpoint::TopHeadlines, &primary_params(&resolved)).await?;
    if !raws.is_empty() {
        let out = filter_recent(normalize_all(raws), DEFAULT_HORIZON_HOURS);
        info!(count = out.len(), "headlines fetched");
        return Ok(out);
    }

    let params = fallback_params(query, Utc::now());
    counter!("newshub_fallback_total").increment(1);
    info!(?params, "headlines empty, falling back to search");

    match call(provider, Endpoint::Everything, &params).await {
        Ok(raws) => {
            let out = filter_recent(normalize_all(raws), DEFAULT_HORIZON_HOURS);
            info!(count = out.len(), "search fallback fetched");
            Ok(out)
        }
        Err(e @ (NewsError::Rejected { .. } | NewsError::Decode(_))) => {
            warn!(error = %e, "search fallback failed, returning empty result");
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// World fan-out: headlines per supported candidate country, deduplicated by
/// exact URL, stopping at [`WORLD_ARTICLE_CAP`].
///
/// Countries whose reply is rejected or undecodable are skipped. Transport
/// failures abort the run.
pub async fn fetch_world(provider: &dyn NewsProvider) -> Result<Vec<Article>> {
    let countries = world_countries();
    info!(candidates = countries.len(), "fetching world trending");

    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut aggregated = Vec::with_capacity(WORLD_ARTICLE_CAP);

    'countries: for c in countries {
        let params: Params = vec![("country".into(), c.to_string())];
        let raws = match call(provider, Endpoint::TopHeadlines, &params).await {
            Ok(r) => r,
            Err(e @ (NewsError::Rejected { .. } | NewsError::Decode(_))) => {
                warn!(country = c, error = %e, "skipping country");
                counter!("newshub_world_skipped_total").increment(1);
                continue;
            }
            Err(e) => return Err(e),
        };

        for raw in raws {
            let url = match raw.url.as_deref() {
                Some(u) if !u.is_empty() => u.to_string(),
                _ => continue,
            };
            if !seen_urls.insert(url) {
                continue;
            }
            aggregated.push(normalize(raw));
            if aggregated.len() >= WORLD_ARTICLE_CAP {
                break 'countries;
            }
        }
    }

    info!(count = aggregated.len(), "world trending fetched");
    Ok(aggregated)
}

/// Trending headlines for one country (or the world sentinels).
pub async fn fetch_trending(provider: &dyn NewsProvider, country: &str) -> Result<Vec<Article>> {
    if is_world(country) {
        return fetch_world(provider).await;
    }

    let mut params: Params = Vec::new();
    if is_supported_country(country) {
        params.push(("country".into(), country.to_ascii_lowercase()));
    }
    info!(%country, "fetching trending");

    let raws = call(provider, Endpoint::TopHeadlines, &params).await?;
    Ok(raws
        .into_iter()
        .take(TRENDING_ARTICLE_CAP)
        .map(normalize)
        .collect())
}
