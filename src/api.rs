use axum::{
    extract::{Query, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::article::Article;
use crate::engine::NewsHub;
use crate::error::NewsError;
use crate::fetch::FetchQuery;
use crate::services::summarize::{DEFAULT_MAX_LENGTH, DEFAULT_MIN_LENGTH};

const SOURCE_LABEL: &str = "NewsAPI.org (Live)";

#[derive(Clone)]
pub struct AppState {
    pub hub: NewsHub,
}

/// Router with permissive CORS.
pub fn router(hub: NewsHub) -> Router {
    router_with_origins(hub, &[])
}

pub fn router_with_origins(hub: NewsHub, allowed_origins: &[String]) -> Router {
    let state = AppState { hub };

    Router::new()
        .route("/", get(root))
        .route("/health", get(|| async { "ok" }))
        .route("/news", get(get_news))
        .route("/news/trending", get(get_trending))
        .route("/news/topics", get(get_topics))
        .route("/news/summarize", post(summarize))
        .route("/news/sentiment", post(sentiment))
        .route("/news/recommend", post(recommend))
        .route(
            "/user/favorites",
            get(list_favorites)
                .post(add_favorite)
                .delete(remove_favorite),
        )
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return CorsLayer::very_permissive();
    }
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// JSON error envelope: `{"status":"error","detail":...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.to_string(),
        }
    }

    fn storage(e: anyhow::Error) -> Self {
        warn!(error = ?e, "favorites storage failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: "favorites storage unavailable".to_string(),
        }
    }
}

impl From<NewsError> for ApiError {
    fn from(e: NewsError) -> Self {
        let status =
            StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        warn!(error = %e, kind = e.kind(), "news fetch failed");
        Self {
            status,
            detail: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "status": "error", "detail": self.detail })),
        )
            .into_response()
    }
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "NewsHub API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "Live news from NewsAPI.org",
        "endpoints": {
            "news": "/news",
            "trending": "/news/trending",
            "topics": "/news/topics",
            "summarize": "/news/summarize",
            "sentiment": "/news/sentiment",
            "recommend": "/news/recommend",
            "favorites": "/user/favorites"
        }
    }))
}

async fn get_news(
    State(state): State<AppState>,
    Query(q): Query<FetchQuery>,
) -> Result<Json<Value>, ApiError> {
    let articles = state.hub.fetch(&q).await?;
    Ok(Json(json!({
        "status": "success",
        "source": SOURCE_LABEL,
        "country": q.country,
        "category": q.category,
        "keyword": q.keyword,
        "totalResults": articles.len(),
        "articles": articles,
    })))
}

#[derive(Deserialize)]
struct TrendingParams {
    #[serde(default = "default_trending_country")]
    country: String,
}

fn default_trending_country() -> String {
    "us".to_string()
}

async fn get_trending(
    State(state): State<AppState>,
    Query(p): Query<TrendingParams>,
) -> Result<Json<Value>, ApiError> {
    let articles = state.hub.fetch_trending(&p.country).await?;
    Ok(Json(json!({
        "status": "success",
        "source": SOURCE_LABEL,
        "country": p.country,
        "totalResults": articles.len(),
        "articles": articles,
    })))
}

#[derive(Deserialize)]
struct TopicsParams {
    #[serde(default)]
    k: Option<usize>,
}

async fn get_topics(State(state): State<AppState>, Query(p): Query<TopicsParams>) -> Json<Value> {
    let topics = state.hub.top_terms(p.k.unwrap_or(5));
    Json(json!({ "status": "success", "count": topics.len(), "topics": topics }))
}

#[derive(Deserialize)]
struct SummarizeReq {
    text: String,
    #[serde(default)]
    max_length: Option<u32>,
    #[serde(default)]
    min_length: Option<u32>,
}

async fn summarize(
    State(state): State<AppState>,
    Json(body): Json<SummarizeReq>,
) -> Result<Json<Value>, ApiError> {
    if body.text.trim().is_empty() {
        return Err(ApiError::bad_request("Text cannot be empty"));
    }
    let summary = state
        .hub
        .summarizer
        .summarize(
            &body.text,
            body.max_length.unwrap_or(DEFAULT_MAX_LENGTH),
            body.min_length.unwrap_or(DEFAULT_MIN_LENGTH),
        )
        .await;
    Ok(Json(json!({
        "status": "success",
        "original_length": body.text.chars().count(),
        "summary_length": summary.chars().count(),
        "summary": summary,
    })))
}

#[derive(Deserialize)]
struct SentimentReq {
    text: String,
}

async fn sentiment(
    State(state): State<AppState>,
    Json(body): Json<SentimentReq>,
) -> Result<Json<Value>, ApiError> {
    if body.text.trim().is_empty() {
        return Err(ApiError::bad_request("Text cannot be empty"));
    }
    let result = state.hub.sentiment.analyze(&body.text).await;
    Ok(Json(json!({ "status": "success", "sentiment": result })))
}

#[derive(Deserialize)]
struct RecommendReq {
    article: Article,
    #[serde(default)]
    n_recommendations: Option<usize>,
}

async fn recommend(State(state): State<AppState>, Json(body): Json<RecommendReq>) -> Json<Value> {
    let recs = state
        .hub
        .recommend(&body.article, body.n_recommendations.unwrap_or(3));
    Json(json!({ "status": "success", "count": recs.len(), "recommendations": recs }))
}

async fn list_favorites(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let favs = state.hub.favorites.list().map_err(ApiError::storage)?;
    Ok(Json(json!({ "status": "success", "count": favs.len(), "favorites": favs })))
}

#[derive(Deserialize)]
struct FavoriteReq {
    article: Article,
}

async fn add_favorite(
    State(state): State<AppState>,
    Json(body): Json<FavoriteReq>,
) -> Result<Json<Value>, ApiError> {
    let saved = state
        .hub
        .favorites
        .add(&body.article)
        .map_err(ApiError::storage)?;
    if !saved {
        return Err(ApiError::bad_request("Article needs a url to be saved"));
    }
    Ok(Json(json!({
        "status": "success",
        "message": "Article added to favorites"
    })))
}

#[derive(Deserialize)]
struct RemoveParams {
    url: String,
}

async fn remove_favorite(
    State(state): State<AppState>,
    Query(p): Query<RemoveParams>,
) -> Result<Json<Value>, ApiError> {
    let removed = state
        .hub
        .favorites
        .remove(&p.url)
        .map_err(ApiError::storage)?;
    Ok(Json(json!({
        "status": "success",
        "removed": removed,
        "message": "Article removed from favorites"
    })))
}
