//! API request and response types
//!
//! Requests keep dates as strings and numbers as [`FormNumber`] so that
//! malformed form input surfaces as a typed [`crate::CalcError`] from the
//! calculators rather than as a deserialization failure.

use crate::bsa::{BiologicalSex, BsaAnalysis, BsaFormula};
use crate::cycle::{CyclePhase, FertileWindow};
use crate::date_math::CalendarDate;
use crate::pregnancy::{DateSpan, GestationalAge, Trimester};
use crate::units::{HeightMeasurement, WeightUnit};
use crate::validation::FormNumber;
use crate::weight_gain::{BmiCategory, GainRange, PregnancyType, WeightStatus};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

// ============================================================================
// Shared Views
// ============================================================================

/// A date with its display forms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateView {
    pub date: CalendarDate,
    pub long: String,
    pub short: String,
}

impl From<CalendarDate> for DateView {
    fn from(date: CalendarDate) -> Self {
        Self {
            date,
            long: date.format_long(),
            short: date.format_short(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanView {
    pub start: DateView,
    pub end: DateView,
}

impl From<DateSpan> for SpanView {
    fn from(span: DateSpan) -> Self {
        Self {
            start: span.start.into(),
            end: span.end.into(),
        }
    }
}

impl From<FertileWindow> for SpanView {
    fn from(window: FertileWindow) -> Self {
        Self {
            start: window.window_start.into(),
            end: window.window_end.into(),
        }
    }
}

// ============================================================================
// Pregnancy Dating
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PregnancyMethod {
    Lmp,
    Conception,
    DueDate,
    BirthDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PregnancyRequest {
    pub method: PregnancyMethod,
    pub date: String,
    pub cycle_length_days: Option<FormNumber>,
    /// Defaults to today
    pub as_of: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneView {
    pub week: i64,
    pub label: String,
    pub date: DateView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PregnancyResponse {
    pub method: PregnancyMethod,
    pub as_of: CalendarDate,
    pub lmp_date: DateView,
    pub conception_date: DateView,
    pub due_date: DateView,
    /// Progress fields are null before the LMP and for a birth-date anchor
    pub gestational_age: Option<GestationalAge>,
    pub trimester: Option<Trimester>,
    pub trimester_number: Option<u8>,
    pub week_in_trimester: Option<i64>,
    pub progress_percentage: Option<f64>,
    pub days_until_due: Option<i64>,
    pub milestones: Vec<MilestoneView>,
    pub term_window: SpanView,
    pub conception_window: SpanView,
    pub ovulation_window: SpanView,
    pub is_approximation: bool,
}

// ============================================================================
// Ovulation and Period
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OvulationRequest {
    pub last_period_date: String,
    pub cycle_length_days: Option<FormNumber>,
    pub period_length_days: Option<FormNumber>,
    pub luteal_phase_days: Option<FormNumber>,
    pub as_of: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleForecastView {
    pub cycle_number: u32,
    pub period_start: DateView,
    pub period_end: DateView,
    pub ovulation_date: DateView,
    pub fertile_window: SpanView,
    /// Days from `as_of` to the period start
    pub days_away: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OvulationResponse {
    pub as_of: CalendarDate,
    pub ovulation_date: DateView,
    pub fertile_window: SpanView,
    pub next_period: DateView,
    pub period_end: DateView,
    pub days_until_ovulation: i64,
    pub days_until_next_period: i64,
    pub day_of_cycle: i64,
    pub phase: CyclePhase,
    pub phase_description: String,
    pub currently_fertile: bool,
    pub fertility_probability_today: u8,
    pub upcoming_cycles: Vec<CycleForecastView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PeriodRequest {
    pub last_period_date: String,
    pub cycle_length_days: Option<FormNumber>,
    pub period_length_days: Option<FormNumber>,
    pub luteal_phase_days: Option<FormNumber>,
    #[validate(range(min = 1, max = 12, message = "Cycles to predict must be between 1 and 12"))]
    pub cycles_to_predict: Option<u32>,
    pub as_of: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodResponse {
    pub as_of: CalendarDate,
    pub next_period_start: DateView,
    pub next_period_end: DateView,
    pub days_until_next_period: i64,
    pub ovulation_date: DateView,
    pub fertile_window: SpanView,
    pub day_of_cycle: i64,
    pub phase: CyclePhase,
    pub phase_description: String,
    pub currently_fertile: bool,
    pub forecasts: Vec<CycleForecastView>,
}

// ============================================================================
// Weight Gain
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WeightGainRequest {
    pub pre_pregnancy_weight: FormNumber,
    pub current_weight: FormNumber,
    #[serde(default)]
    pub weight_unit: WeightUnit,
    pub height: HeightMeasurement,
    pub gestational_weeks: FormNumber,
    #[serde(default)]
    pub pregnancy_type: PregnancyType,
}

/// Gains are reported in `weight_unit`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightGainResponse {
    pub pre_pregnancy_bmi: f64,
    pub bmi_category: BmiCategory,
    pub bmi_category_description: String,
    pub pregnancy_type: PregnancyType,
    pub weight_unit: WeightUnit,
    pub total_gain_target: GainRange,
    pub weekly_gain_target: GainRange,
    pub current_gain: f64,
    pub expected_gain_now: GainRange,
    pub status: WeightStatus,
    pub status_description: String,
    pub remaining_weeks: i64,
    pub remaining_gain: GainRange,
    pub weekly_gain_needed: f64,
}

// ============================================================================
// Body Surface Area
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BsaRequest {
    pub weight: FormNumber,
    #[serde(default)]
    pub weight_unit: WeightUnit,
    pub height: HeightMeasurement,
    #[validate(range(min = 0.0, max = 130.0, message = "Age must be between 0 and 130 years"))]
    pub age_years: Option<f64>,
    pub sex: Option<BiologicalSex>,
    pub formula: Option<BsaFormula>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BsaResponse {
    pub weight_kg: f64,
    pub height_cm: f64,
    #[serde(flatten)]
    pub analysis: BsaAnalysis,
}
