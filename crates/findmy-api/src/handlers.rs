//! HTTP handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::debug;

use crate::ApiState;

/// Content type of the Prometheus text format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

// ── Prometheus ─────────────────────────────────────────────────

/// GET /metrics
///
/// Runs a full scrape; per-device failures show up as
/// `scrape_success 0` samples, so this always answers 200.
pub async fn prometheus_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    let batch = state.collector.scrape().await;
    debug!(devices = batch.samples.len(), "serving scrape");

    let body = findmy_metrics::render_prometheus(&batch);
    (
        StatusCode::OK,
        [("content-type", PROMETHEUS_CONTENT_TYPE)],
        body,
    )
}
