//! Health Check API Handler
//!
//! Liveness only; poll failures are reported through logs, not here.

use axum::{http::StatusCode, response::IntoResponse};

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
