// src/provider/mod.rs
pub mod newsapi;
pub mod tables;

use async_trait::async_trait;
use metrics::counter;
use serde::Deserialize;

use crate::article::RawArticle;
use crate::error::{NewsError, Result};

pub use newsapi::NewsApiClient;

/// Read endpoints exposed by the upstream provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Filtered current headlines (category / country / keyword).
    TopHeadlines,
    /// Free-text search with explicit date bounds and language.
    Everything,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::TopHeadlines => "top-headlines",
            Endpoint::Everything => "everything",
        }
    }
}

/// Raw HTTP reply: status code and body text, undecoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderReply {
    pub status: u16,
    pub body: String,
}

/// Query parameters for one provider call, in insertion order.
pub type Params = Vec<(String, String)>;

/// Transport to the upstream provider. Implementations only move bytes;
/// interpreting the reply is [`decode_reply`]'s job.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn get(&self, endpoint: Endpoint, params: &[(String, String)]) -> Result<ProviderReply>;
    fn name(&self) -> &'static str;
}

/// Decoded provider envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderPayload {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "totalResults")]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Vec<RawArticle>,
}

/// Turn a raw reply into the article array, or a typed rejection.
///
/// Non-200 → `Rejected` with the provider's status and body/message;
/// 200 with `status != "ok"` → `Rejected` (400) carrying the provider message.
pub fn decode_reply(reply: ProviderReply) -> Result<Vec<RawArticle>> {
    if reply.status != 200 {
        let message = serde_json::from_str::<ProviderPayload>(&reply.body)
            .ok()
            .and_then(|p| p.message)
            .unwrap_or(reply.body);
        return Err(NewsError::Rejected {
            status: reply.status,
            message,
        });
    }

    let payload: ProviderPayload = serde_json::from_str(&reply.body)?;
    if payload.status != "ok" {
        return Err(NewsError::Rejected {
            status: 400,
            message: payload
                .message
                .or(payload.code)
                .unwrap_or_else(|| "unknown provider error".to_string()),
        });
    }
    Ok(payload.articles)
}

/// Issue a call and decode it, counting the attempt and any failure.
pub(crate) async fn call(
    provider: &dyn NewsProvider,
    endpoint: Endpoint,
    params: &[(String, String)],
) -> Result<Vec<RawArticle>> {
    counter!("newshub_provider_calls_total", "endpoint" => endpoint.path()).increment(1);

    let res = match provider.get(endpoint, params).await {
        Ok(reply) => decode_reply(reply),
        Err(e) => Err(e),
    };
    if let Err(e) = &res {
        counter!("newshub_provider_errors_total", "kind" => e.kind()).increment(1);
    }
    res
}
