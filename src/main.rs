//! NewsHub binary entrypoint.
//! Boots the Axum HTTP server, wiring config, the news engine, and metrics.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newshub::config::AppConfig;
use newshub::metrics::Metrics;
use newshub::{api, NewsHub};

/// Default filter `newshub=info,warn`, overridable via RUST_LOG.
/// NEWSHUB_LOG_JSON=1 switches to JSON lines.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("newshub=info,warn"));
    let json = std::env::var("NEWSHUB_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    // Shuttle may already have installed a subscriber; keep theirs in that case.
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = AppConfig::load()?;
    let hub = NewsHub::from_config(&cfg)?;

    let mut router = api::router_with_origins(hub, &cfg.server.allowed_origins);
    match Metrics::init() {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => tracing::warn!(error = %e, "metrics disabled"),
    }

    Ok(router.into())
}
