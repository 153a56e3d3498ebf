// src/services/hf.rs
//! Hosted inference models (Hugging Face inference API). Requires a token;
//! without one the service layer uses [`super::DisabledModel`].

use std::time::Duration;

use anyhow::{anyhow, Context};
use serde::Serialize;
use serde_json::Value;

use super::{BoxFuture, ModelLabel, SentimentModel, SummaryModel};

pub const DEFAULT_HF_BASE_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_SUMMARY_MODEL: &str = "facebook/bart-large-cnn";
pub const DEFAULT_SENTIMENT_MODEL: &str = "cardiffnlp/twitter-roberta-base-sentiment-latest";

pub struct HfModel {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl HfModel {
    pub fn new(base_url: &str, model: &str, token: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("newshub/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(30))
            .build()
            .context("building inference http client")?;
        Ok(Self {
            http,
            endpoint: format!("{}/{}", base_url.trim_end_matches('/'), model),
            token: token.to_string(),
        })
    }

    async fn post<T: Serialize + ?Sized>(&self, body: &T) -> anyhow::Result<Value> {
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .context("inference request")?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("inference endpoint returned {status}: {text}"));
        }
        resp.json().await.context("decoding inference reply")
    }
}

#[derive(Serialize)]
struct SummaryReq<'a> {
    inputs: &'a str,
    parameters: SummaryParams,
}

#[derive(Serialize)]
struct SummaryParams {
    max_length: u32,
    min_length: u32,
    do_sample: bool,
}

#[derive(Serialize)]
struct ClassifyReq<'a> {
    inputs: &'a str,
}

impl SummaryModel for HfModel {
    fn summarize<'a>(
        &'a self,
        text: &'a str,
        max_length: u32,
        min_length: u32,
    ) -> BoxFuture<'a, anyhow::Result<String>> {
        Box::pin(async move {
            let req = SummaryReq {
                inputs: text,
                parameters: SummaryParams {
                    max_length,
                    min_length,
                    do_sample: false,
                },
            };
            let v = self.post(&req).await?;
            parse_summary(&v).ok_or_else(|| anyhow!("no summary_text in reply"))
        })
    }
    fn name(&self) -> &'static str {
        "hf-summarization"
    }
}

impl SentimentModel for HfModel {
    fn classify<'a>(&'a self, text: &'a str) -> BoxFuture<'a, anyhow::Result<ModelLabel>> {
        Box::pin(async move {
            let v = self.post(&ClassifyReq { inputs: text }).await?;
            parse_top_label(&v).ok_or_else(|| anyhow!("no label in reply"))
        })
    }
    fn name(&self) -> &'static str {
        "hf-sentiment"
    }
}

/// `[{"summary_text": "..."}]`
pub fn parse_summary(v: &Value) -> Option<String> {
    v.as_array()?
        .first()?
        .get("summary_text")?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Highest-scored label from `[{"label","score"}]` or `[[{"label","score"}, ..]]`.
pub fn parse_top_label(v: &Value) -> Option<ModelLabel> {
    let outer = v.as_array()?;
    let candidates = match outer.first()? {
        Value::Array(inner) => inner.as_slice(),
        _ => outer.as_slice(),
    };
    candidates
        .iter()
        .filter_map(|c| {
            Some(ModelLabel {
                label: c.get("label")?.as_str()?.to_string(),
                score: c.get("score")?.as_f64()?,
            })
        })
        .max_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}
