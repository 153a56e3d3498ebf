//! # Recency Filter
//! Keeps articles published within the last `horizon` hours (default 48h).
//!
//! Timestamps that cannot be parsed, or are missing, are *kept*: the filter
//! leans toward recall. Output order follows input order.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use metrics::counter;
use tracing::{debug, info};

use crate::article::Article;

pub const DEFAULT_HORIZON_HOURS: i64 = 48;

/// Outcome of reading a `published_at` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishedAt {
    Parsed(DateTime<Utc>),
    Unparsable,
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"];

/// Parse an ISO-8601-ish timestamp: trailing `Z`, numeric UTC offset, or a bare
/// local-looking value (read as UTC).
pub fn parse_published_at(raw: &str) -> PublishedAt {
    let s = raw.trim();
    if s.is_empty() {
        return PublishedAt::Unparsable;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return PublishedAt::Parsed(dt.with_timezone(&Utc));
    }
    for f in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, f) {
            return PublishedAt::Parsed(dt.with_timezone(&Utc));
        }
    }
    for f in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, f) {
            return PublishedAt::Parsed(naive.and_utc());
        }
    }
    PublishedAt::Unparsable
}

/// Same as [`filter_recent_at`] against the current wall clock.
pub fn filter_recent(articles: Vec<Article>, horizon_hours: i64) -> Vec<Article> {
    filter_recent_at(articles, horizon_hours, Utc::now())
}

/// Keep articles whose timestamp falls in `[now - horizon, now]`, plus every
/// article whose timestamp is missing or unparsable.
pub fn filter_recent_at(
    articles: Vec<Article>,
    horizon_hours: i64,
    now: DateTime<Utc>,
) -> Vec<Article> {
    let cutoff = now - Duration::hours(horizon_hours);
    let total = articles.len();

    let kept: Vec<Article> = articles
        .into_iter()
        .filter(|a| match parse_published_at(&a.published_at) {
            PublishedAt::Parsed(ts) => ts >= cutoff && ts <= now,
            PublishedAt::Unparsable => {
                debug!(published_at = %a.published_at, "unparsable timestamp, keeping article");
                true
            }
        })
        .collect();

    counter!("newshub_recency_kept_total").increment(kept.len() as u64);
    counter!("newshub_recency_dropped_total").increment((total - kept.len()) as u64);
    info!(kept = kept.len(), total, horizon_hours, "recency filter applied");

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(published_at: &str) -> Article {
        Article {
            published_at: published_at.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn parses_zulu_offset_and_bare() {
        let want = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(
            parse_published_at("2024-05-01T12:00:00Z"),
            PublishedAt::Parsed(want)
        );
        assert_eq!(
            parse_published_at("2024-05-01T14:00:00+02:00"),
            PublishedAt::Parsed(want)
        );
        assert_eq!(
            parse_published_at("2024-05-01T07:00:00-0500"),
            PublishedAt::Parsed(want)
        );
        assert_eq!(
            parse_published_at("2024-05-01T12:00:00"),
            PublishedAt::Parsed(want)
        );
        assert!(matches!(
            parse_published_at("2024-05-01T12:00:00.123Z"),
            PublishedAt::Parsed(_)
        ));
    }

    #[test]
    fn garbage_is_unparsable() {
        assert_eq!(parse_published_at("not-a-date"), PublishedAt::Unparsable);
        assert_eq!(parse_published_at(""), PublishedAt::Unparsable);
    }

    #[test]
    fn keeps_order_and_unparsable() {
        let now = Utc.with_ymd_and_hms(2024, 5, 3, 0, 0, 0).unwrap();
        let input = vec![
            at("2024-05-02T23:00:00Z"),
            at("not-a-date"),
            at("2024-04-01T00:00:00Z"),
            at(""),
        ];
        let out = filter_recent_at(input, 48, now);
        let stamps: Vec<_> = out.iter().map(|a| a.published_at.as_str()).collect();
        assert_eq!(stamps, vec!["2024-05-02T23:00:00Z", "not-a-date", ""]);
    }
}
