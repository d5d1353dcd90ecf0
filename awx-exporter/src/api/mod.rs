//! API Module
//!
//! HTTP surface of the exporter: the scrape endpoint and a liveness check.

pub mod error;
pub mod health;
pub mod metrics;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::metrics::JobMetrics;

/// Create the router with all endpoints
pub fn create_router(metrics: Arc<JobMetrics>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::scrape))
        .with_state(metrics)
        .layer(TraceLayer::new_for_http())
}
