// tests/common/mod.rs
//
// Scripted in-memory provider: answers each call through a closure and
// records every (endpoint, params) pair it saw.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, SecondsFormat, Utc};
use serde_json::{json, Value};

use newshub::error::{NewsError, Result};
use newshub::provider::{Endpoint, NewsProvider, ProviderReply};

pub type Call = (Endpoint, Vec<(String, String)>);
type Responder = dyn Fn(Endpoint, &[(String, String)]) -> Result<ProviderReply> + Send + Sync;

pub struct ScriptedProvider {
    respond: Box<Responder>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedProvider {
    pub fn new<F>(f: F) -> Arc<Self>
    where
        F: Fn(Endpoint, &[(String, String)]) -> Result<ProviderReply> + Send + Sync + 'static,
    {
        Arc::new(Self {
            respond: Box::new(f),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NewsProvider for ScriptedProvider {
    async fn get(&self, endpoint: Endpoint, params: &[(String, String)]) -> Result<ProviderReply> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint, params.to_vec()));
        (self.respond)(endpoint, params)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

pub fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

pub fn hours_ago(h: i64) -> String {
    (Utc::now() - Duration::hours(h)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn raw_article(url: &str, title: &str, published_at: &str) -> Value {
    json!({
        "source": { "id": null, "name": "Wire" },
        "title": title,
        "description": format!("{title} description text"),
        "content": null,
        "url": url,
        "urlToImage": null,
        "publishedAt": published_at
    })
}

pub fn ok(articles: Vec<Value>) -> Result<ProviderReply> {
    Ok(ProviderReply {
        status: 200,
        body: json!({ "status": "ok", "totalResults": articles.len(), "articles": articles })
            .to_string(),
    })
}

pub fn provider_error(message: &str) -> Result<ProviderReply> {
    Ok(ProviderReply {
        status: 200,
        body: json!({ "status": "error", "code": "x", "message": message }).to_string(),
    })
}

pub fn http_status(status: u16) -> Result<ProviderReply> {
    Ok(ProviderReply {
        status,
        body: "upstream unavailable".to_string(),
    })
}

pub fn timeout() -> Result<ProviderReply> {
    Err(NewsError::Timeout)
}
