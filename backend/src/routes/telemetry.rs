//! Prometheus scrape endpoint

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::State;

/// Render all recorded metrics in the Prometheus text format
pub async fn render_metrics(State(state): State<AppState>) -> ApiResult<String> {
    match &state.metrics {
        Some(handle) => Ok(handle.render()),
        None => Err(ApiError::NotFound("metrics are disabled".to_string())),
    }
}
