//! Calculator API routes
//!
//! Every handler validates the request shape, evaluates it with the shared
//! core against today's date, and counts the outcome.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use health_calc_shared::types::{
    BsaRequest, BsaResponse, OvulationRequest, OvulationResponse, PeriodRequest, PeriodResponse,
    PregnancyRequest, PregnancyResponse, WeightGainRequest, WeightGainResponse,
};
use health_calc_shared::{
    evaluate_bsa, evaluate_ovulation, evaluate_period, evaluate_pregnancy, evaluate_weight_gain,
    CalcResult, CalendarDate,
};
use metrics::counter;
use tracing::debug;
use validator::Validate;

/// Create calculator routes
pub fn calculator_routes() -> Router<AppState> {
    Router::new()
        .route("/pregnancy", post(pregnancy))
        .route("/ovulation", post(ovulation))
        .route("/period", post(period))
        .route("/weight-gain", post(weight_gain))
        .route("/bsa", post(bsa))
}

/// The server's local calendar day
fn today() -> CalendarDate {
    CalendarDate::from(chrono::Local::now().date_naive())
}

/// Count the evaluation and lift calculator errors into API errors
fn observe<T>(calculator: &'static str, result: CalcResult<T>) -> ApiResult<Json<T>> {
    let outcome = if result.is_ok() { "ok" } else { "rejected" };
    counter!("calculator_evaluations_total", "calculator" => calculator, "outcome" => outcome)
        .increment(1);
    result.map(Json).map_err(ApiError::from)
}

/// POST /api/v1/calculators/pregnancy - Due date, conception and gestational age
async fn pregnancy(
    State(state): State<AppState>,
    Json(req): Json<PregnancyRequest>,
) -> ApiResult<Json<PregnancyResponse>> {
    req.validate()?;
    debug!(method = ?req.method, date = %req.date, "Evaluating pregnancy dates");
    observe("pregnancy", evaluate_pregnancy(&req, state.settings(), today()))
}

/// POST /api/v1/calculators/ovulation - Ovulation day, fertile window, next cycles
async fn ovulation(
    State(state): State<AppState>,
    Json(req): Json<OvulationRequest>,
) -> ApiResult<Json<OvulationResponse>> {
    req.validate()?;
    debug!(last_period = %req.last_period_date, "Evaluating ovulation");
    observe("ovulation", evaluate_ovulation(&req, state.settings(), today()))
}

/// POST /api/v1/calculators/period - Next period and multi-cycle forecast
async fn period(
    State(state): State<AppState>,
    Json(req): Json<PeriodRequest>,
) -> ApiResult<Json<PeriodResponse>> {
    req.validate()?;
    debug!(
        last_period = %req.last_period_date,
        cycles = ?req.cycles_to_predict,
        "Evaluating period forecast"
    );
    observe("period", evaluate_period(&req, state.settings(), today()))
}

/// POST /api/v1/calculators/weight-gain - IOM weight gain assessment
async fn weight_gain(
    State(state): State<AppState>,
    Json(req): Json<WeightGainRequest>,
) -> ApiResult<Json<WeightGainResponse>> {
    req.validate()?;
    debug!(unit = %req.weight_unit, pregnancy_type = ?req.pregnancy_type, "Evaluating weight gain");
    observe("weight_gain", evaluate_weight_gain(&req, state.settings()))
}

/// POST /api/v1/calculators/bsa - Body surface area by five formulas
async fn bsa(Json(req): Json<BsaRequest>) -> ApiResult<Json<BsaResponse>> {
    req.validate()?;
    debug!(unit = %req.weight_unit, height = %req.height, age = ?req.age_years, "Evaluating BSA");
    observe("bsa", evaluate_bsa(&req))
}
