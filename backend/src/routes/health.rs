//! Health check endpoints
//!
//! Provides Kubernetes-compatible health check endpoints:
//! - /health - Basic health check
//! - /health/ready - Readiness probe (runs a reference calculation)
//! - /health/live - Liveness probe (always returns OK if server is running)

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use health_calc_shared::pregnancy::{derive_dates, PregnancyAnchor};
use health_calc_shared::CalendarDate;
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

/// Individual health checks
#[derive(Serialize)]
pub struct HealthChecks {
    pub calculators: CheckStatus,
    pub metrics: CheckStatus,
}

/// Status of an individual check
#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            message: None,
        }
    }

    fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: "unhealthy".to_string(),
            message: Some(message.into()),
        }
    }
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    })
}

/// Naegele's rule on a fixed date: LMP 2024-01-01 is due 2024-10-07
fn reference_calculation() -> CheckStatus {
    let result = CalendarDate::from_ymd(2024, 1, 1)
        .and_then(|lmp| derive_dates(PregnancyAnchor::LastMenstrualPeriod(lmp), 28));
    match result {
        Ok(dates) if dates.due_date.to_string() == "2024-10-07" => CheckStatus::healthy(),
        Ok(dates) => CheckStatus::unhealthy(format!("unexpected due date {}", dates.due_date)),
        Err(e) => CheckStatus::unhealthy(e.to_string()),
    }
}

/// Readiness probe - checks if the service is ready to accept traffic
/// Returns 503 if any check fails
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let calculators = reference_calculation();
    let metrics = match (&state.metrics, state.config().metrics.enabled) {
        (Some(_), _) | (None, false) => CheckStatus::healthy(),
        (None, true) => CheckStatus::unhealthy("metrics recorder not installed"),
    };

    let is_healthy = calculators.status == "healthy" && metrics.status == "healthy";

    let response = HealthResponse {
        status: if is_healthy { "ready" } else { "not_ready" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(HealthChecks { calculators, metrics }),
    };

    if is_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Liveness probe - checks if the service is alive
/// Always returns OK if the server is running
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "alive".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    })
}
