// src/provider/newsapi.rs
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{Endpoint, NewsProvider, ProviderReply};
use crate::error::{NewsError, Result};

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTPS transport to NewsAPI.org. The key travels in the `X-Api-Key` header.
pub struct NewsApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NewsApiClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("newshub/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(timeout)
            .build()
            .map_err(|e| NewsError::Client(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn url_for(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }
}

#[async_trait]
impl NewsProvider for NewsApiClient {
    async fn get(&self, endpoint: Endpoint, params: &[(String, String)]) -> Result<ProviderReply> {
        let url = self.url_for(endpoint);
        debug!(%url, ?params, "provider request");

        let resp = self
            .http
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                warn!(error = ?e, endpoint = endpoint.path(), "provider http error");
                NewsError::from(e)
            })?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(NewsError::from)?;
        Ok(ProviderReply { status, body })
    }

    fn name(&self) -> &'static str {
        "newsapi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let c = NewsApiClient::new("https://example.test/v2/", "k", Duration::from_secs(1)).unwrap();
        assert_eq!(
            c.url_for(Endpoint::Everything),
            "https://example.test/v2/everything"
        );
    }

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        // Port 9 (discard) on loopback is closed in test environments.
        let c = NewsApiClient::new("http://127.0.0.1:9", "k", Duration::from_secs(2)).unwrap();
        let err = c.get(Endpoint::TopHeadlines, &[]).await.unwrap_err();
        assert_eq!(err, NewsError::Unreachable);
    }
}
