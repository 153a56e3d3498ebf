use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder and describe every series.
    /// Call once per process.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?;
        describe_metrics();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// Registers HELP text with whatever recorder is installed. Descriptions sent
/// before a recorder exists are dropped, so [`Metrics::init`] calls this after
/// installing.
pub fn describe_metrics() {
    describe_counter!(
        "newshub_provider_calls_total",
        "Outbound provider calls by endpoint."
    );
    describe_counter!(
        "newshub_provider_errors_total",
        "Provider failures by error kind."
    );
    describe_counter!(
        "newshub_fallback_total",
        "Search fallbacks issued after an empty headline reply."
    );
    describe_counter!(
        "newshub_world_skipped_total",
        "Countries skipped during world aggregation."
    );
    describe_counter!(
        "newshub_recency_kept_total",
        "Articles kept by the recency filter."
    );
    describe_counter!(
        "newshub_recency_dropped_total",
        "Articles dropped by the recency filter."
    );
    describe_counter!("newshub_index_fits_total", "Similarity index re-fits.");
    describe_gauge!(
        "newshub_index_corpus_size",
        "Articles in the current similarity index."
    );
}
