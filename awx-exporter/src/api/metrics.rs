//! Metrics API Handler

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::error::ApiResult;
use crate::metrics::JobMetrics;

/// GET /metrics
/// Current gauge state in the text exposition format
pub async fn scrape(State(metrics): State<Arc<JobMetrics>>) -> ApiResult<Response> {
    let body = metrics.render()?;
    Ok(([(header::CONTENT_TYPE, metrics.content_type())], body).into_response())
}
