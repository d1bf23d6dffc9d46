//! findmy-api — HTTP surface of the exporter.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/metrics` | Prometheus exposition of a fresh scrape |

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use findmy_metrics::DeviceCollector;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub collector: Arc<DeviceCollector>,
}

/// Build the exporter router.
pub fn build_router(collector: Arc<DeviceCollector>) -> Router {
    let state = ApiState { collector };

    Router::new()
        .route("/metrics", get(handlers::prometheus_metrics))
        .with_state(state)
}
