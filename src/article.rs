// src/article.rs
//! Canonical article shape and the normalizer that produces it from loosely
//! structured provider records.

use serde::{Deserialize, Deserializer, Serialize};

pub const UNKNOWN_SOURCE: &str = "Unknown Source";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub id: String,
    #[serde(default = "unknown_source")]
    pub name: String,
}

fn unknown_source() -> String {
    UNKNOWN_SOURCE.to_string()
}

impl Default for ArticleSource {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: unknown_source(),
        }
    }
}

/// Canonical article. Every field is populated; `url` is the identity key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "urlToImage")]
    pub image_url: Option<String>,
    #[serde(default, rename = "publishedAt")]
    pub published_at: String,
    #[serde(default)]
    pub source: ArticleSource,
}

impl Article {
    /// `title + description + content`, space-joined, empty parts skipped.
    pub fn combined_text(&self) -> String {
        [&self.title, &self.description, &self.content]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }

    /// Same-article test used to keep a target out of its own recommendations:
    /// URL equality when both have one, else case-insensitive title equality.
    pub fn is_same_as(&self, other: &Article) -> bool {
        if !self.url.is_empty() && !other.url.is_empty() {
            return self.url == other.url;
        }
        if !self.title.is_empty() && !other.title.is_empty() {
            return self.title.to_lowercase() == other.title.to_lowercase();
        }
        false
    }
}

/// Provider record as received. Any field may be absent, null, or of the wrong
/// JSON type; all of those read as `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArticle {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default, rename = "urlToImage", deserialize_with = "lenient_string")]
    pub url_to_image: Option<String>,
    #[serde(default, rename = "publishedAt", deserialize_with = "lenient_string")]
    pub published_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_source")]
    pub source: Option<RawSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSource {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

fn lenient_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = serde_json::Value::deserialize(de)?;
    Ok(match v {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_source<'de, D>(de: D) -> Result<Option<RawSource>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = serde_json::Value::deserialize(de)?;
    if v.is_object() {
        Ok(serde_json::from_value(v).ok())
    } else {
        Ok(None)
    }
}

/// Canonicalize a provider record. Never fails.
pub fn normalize(raw: RawArticle) -> Article {
    let description = raw.description.unwrap_or_default();
    let content = raw.content.unwrap_or_else(|| description.clone());
    let source = match raw.source {
        Some(s) => ArticleSource {
            id: s.id.unwrap_or_default(),
            name: s.name.unwrap_or_else(unknown_source),
        },
        None => ArticleSource::default(),
    };

    Article {
        title: raw.title.unwrap_or_default(),
        description,
        content,
        url: raw.url.unwrap_or_default(),
        image_url: raw.url_to_image,
        published_at: raw.published_at.unwrap_or_default(),
        source,
    }
}

pub fn normalize_all(raws: Vec<RawArticle>) -> Vec<Article> {
    raws.into_iter().map(normalize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawArticle {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn content_falls_back_to_description() {
        let a = normalize(raw(r#"{"title":"T","description":"D","url":"u"}"#));
        assert_eq!(a.content, "D");
        let b = normalize(raw(r#"{"description":"D","content":null}"#));
        assert_eq!(b.content, "D");
    }

    #[test]
    fn missing_source_is_unknown() {
        let a = normalize(raw("{}"));
        assert_eq!(a.source.name, UNKNOWN_SOURCE);
        assert_eq!(a.source.id, "");
        assert_eq!(a.title, "");
        assert!(a.image_url.is_none());
    }

    #[test]
    fn wrong_types_read_as_absent() {
        let a = normalize(raw(r#"{"title":42,"source":"bbc","publishedAt":false}"#));
        assert_eq!(a.title, "");
        assert_eq!(a.source.name, UNKNOWN_SOURCE);
        assert_eq!(a.published_at, "");
    }

    #[test]
    fn null_source_fields_get_defaults() {
        let a = normalize(raw(r#"{"source":{"id":null,"name":null}}"#));
        assert_eq!(a.source.id, "");
        assert_eq!(a.source.name, UNKNOWN_SOURCE);
    }

    #[test]
    fn sameness_prefers_url_then_title() {
        let a = Article {
            title: "Rates Rise".into(),
            url: "https://x/1".into(),
            ..Default::default()
        };
        let mut b = a.clone();
        b.url = "https://x/2".into();
        assert!(!a.is_same_as(&b));

        let c = Article {
            title: "rates rise".into(),
            ..Default::default()
        };
        assert!(a.is_same_as(&c));
        assert!(!Article::default().is_same_as(&Article::default()));
    }

    #[test]
    fn combined_text_skips_empty_parts() {
        let a = Article {
            title: "Alpha".into(),
            content: "Gamma".into(),
            ..Default::default()
        };
        assert_eq!(a.combined_text(), "Alpha Gamma");
    }
}
