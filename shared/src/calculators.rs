//! Request evaluation for the five calculators
//!
//! Each `evaluate_*` turns a raw request into a response using the pure
//! modules of this crate. `today` is always passed in; nothing here reads
//! the clock.

use crate::bsa;
use crate::cycle::{
    self, current_cycle_phase, day_of_cycle, derive_fertile_window, fertility_probability,
    forecast_cycles, next_period_after, period_end_date, CycleForecast, CycleLimits, CycleParameters,
    WindowEnd,
};
use crate::date_math::{diff_days, CalendarDate};
use crate::errors::{CalcError, CalcResult};
use crate::pregnancy::{self, PregnancyAnchor, PregnancyRecord};
use crate::types::*;
use crate::units::{weight_to_kg, WeightUnit};
use crate::validation::{parse_cycle_days_or, parse_measurement, validate_cycle_parameters, FormNumber};
use crate::weight_gain::{self, GainRange, WeightGainInput};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CYCLES_TO_PREDICT: u32 = 6;

/// Tunables shared by every calculator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculatorSettings {
    pub cycle_limits: CycleLimits,
    pub fertile_lead_days: i64,
    pub weight_gain_tolerance_lbs: f64,
    /// Cycles listed by the ovulation calculator
    pub upcoming_cycles: u32,
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        Self {
            cycle_limits: CycleLimits::default(),
            fertile_lead_days: cycle::DEFAULT_FERTILE_LEAD_DAYS,
            weight_gain_tolerance_lbs: weight_gain::DEFAULT_STATUS_TOLERANCE_LBS,
            upcoming_cycles: 3,
        }
    }
}

fn resolve_as_of(as_of: Option<&str>, today: CalendarDate) -> CalcResult<CalendarDate> {
    match as_of {
        Some(raw) if !raw.trim().is_empty() => CalendarDate::parse(raw),
        _ => Ok(today),
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn forecast_view(forecast: &CycleForecast, as_of: CalendarDate) -> CycleForecastView {
    CycleForecastView {
        cycle_number: forecast.cycle_number,
        period_start: forecast.period_start.into(),
        period_end: forecast.period_end.into(),
        ovulation_date: forecast.ovulation_date.into(),
        fertile_window: forecast.fertile_window.into(),
        days_away: diff_days(forecast.period_start, as_of),
    }
}

// ============================================================================
// Pregnancy Dating
// ============================================================================

pub fn evaluate_pregnancy(
    request: &PregnancyRequest,
    settings: &CalculatorSettings,
    today: CalendarDate,
) -> CalcResult<PregnancyResponse> {
    let as_of = resolve_as_of(request.as_of.as_deref(), today)?;
    let date = CalendarDate::parse(&request.date)?;
    let cycle_length = parse_cycle_days_or(
        "cycle length",
        request.cycle_length_days.as_ref(),
        pregnancy::DEFAULT_CYCLE_LENGTH_DAYS,
    )?;
    settings.cycle_limits.check_cycle_length(cycle_length)?;

    let anchor = match request.method {
        PregnancyMethod::Lmp => PregnancyAnchor::LastMenstrualPeriod(date),
        PregnancyMethod::Conception => PregnancyAnchor::Conception(date),
        PregnancyMethod::DueDate => PregnancyAnchor::DueDate(date),
        PregnancyMethod::BirthDate => PregnancyAnchor::BirthDate(date),
    };
    let record = PregnancyRecord::build(anchor, cycle_length, as_of)?;

    let milestones = pregnancy::milestones(record.lmp_date)?
        .into_iter()
        .map(|milestone| MilestoneView {
            week: milestone.week,
            label: milestone.label.to_string(),
            date: milestone.date.into(),
        })
        .collect();

    Ok(PregnancyResponse {
        method: request.method,
        as_of,
        lmp_date: record.lmp_date.into(),
        conception_date: record.conception_date.into(),
        due_date: record.due_date.into(),
        gestational_age: record.gestational_age,
        trimester: record.trimester,
        trimester_number: record.trimester.map(|trimester| trimester.number()),
        week_in_trimester: record
            .trimester
            .zip(record.gestational_age)
            .map(|(trimester, age)| trimester.week_within(age.weeks)),
        progress_percentage: record.progress_percentage.map(|progress| round_to(progress, 1)),
        days_until_due: record.days_until_due,
        milestones,
        term_window: pregnancy::term_window(record.lmp_date)?.into(),
        conception_window: pregnancy::conception_window(record.conception_date, settings.fertile_lead_days)?
            .into(),
        ovulation_window: pregnancy::ovulation_window(record.conception_date)?.into(),
        is_approximation: record.is_approximation,
    })
}

// ============================================================================
// Ovulation
// ============================================================================

fn cycle_parameters(
    cycle_length: Option<&FormNumber>,
    period_length: Option<&FormNumber>,
    luteal_phase: Option<&FormNumber>,
    settings: &CalculatorSettings,
) -> CalcResult<CycleParameters> {
    validate_cycle_parameters(
        cycle_length,
        period_length,
        luteal_phase,
        &CycleParameters::default(),
        &settings.cycle_limits,
    )
}

pub fn evaluate_ovulation(
    request: &OvulationRequest,
    settings: &CalculatorSettings,
    today: CalendarDate,
) -> CalcResult<OvulationResponse> {
    let as_of = resolve_as_of(request.as_of.as_deref(), today)?;
    let last_period = CalendarDate::parse(&request.last_period_date)?;
    let params = cycle_parameters(
        request.cycle_length_days.as_ref(),
        request.period_length_days.as_ref(),
        request.luteal_phase_days.as_ref(),
        settings,
    )?;

    let ovulation_date = last_period.add_days(params.ovulation_offset_days())?;
    let fertile_window =
        derive_fertile_window(ovulation_date, settings.fertile_lead_days, WindowEnd::OvulationDay)?;
    let next_period = cycle::derive_next_period_date(last_period, params.cycle_length_days())?;

    let upcoming = forecast_cycles(next_period, &params, settings.upcoming_cycles, settings.fertile_lead_days)?;
    let phase = current_cycle_phase(
        as_of,
        last_period,
        params.cycle_length_days(),
        params.period_length_days(),
        params.ovulation_offset_days(),
    )?;

    Ok(OvulationResponse {
        as_of,
        ovulation_date: ovulation_date.into(),
        fertile_window: fertile_window.into(),
        next_period: next_period.into(),
        period_end: period_end_date(last_period, params.period_length_days())?.into(),
        days_until_ovulation: diff_days(ovulation_date, as_of),
        days_until_next_period: diff_days(next_period, as_of),
        day_of_cycle: day_of_cycle(as_of, last_period, params.cycle_length_days())?,
        phase,
        phase_description: phase.description().to_string(),
        currently_fertile: fertile_window.contains(as_of),
        fertility_probability_today: fertility_probability(as_of, ovulation_date),
        upcoming_cycles: upcoming.iter().map(|f| forecast_view(f, as_of)).collect(),
    })
}

// ============================================================================
// Period
// ============================================================================

pub fn evaluate_period(
    request: &PeriodRequest,
    settings: &CalculatorSettings,
    today: CalendarDate,
) -> CalcResult<PeriodResponse> {
    let as_of = resolve_as_of(request.as_of.as_deref(), today)?;
    let last_period = CalendarDate::parse(&request.last_period_date)?;
    let params = cycle_parameters(
        request.cycle_length_days.as_ref(),
        request.period_length_days.as_ref(),
        request.luteal_phase_days.as_ref(),
        settings,
    )?;
    if last_period > as_of {
        return Err(CalcError::InvalidDateInput(format!(
            "last period {} is after {}",
            last_period, as_of
        )));
    }

    let next_start = next_period_after(last_period, params.cycle_length_days(), as_of)?;
    let current_start = next_start.add_days(-params.cycle_length_days())?;
    // Ovulation of the current cycle, one luteal phase before the next period
    let ovulation_date = next_start.add_days(-params.luteal_phase_days())?;
    let fertile_window =
        derive_fertile_window(ovulation_date, settings.fertile_lead_days, WindowEnd::OvulationDay)?;

    let phase = current_cycle_phase(
        as_of,
        current_start,
        params.cycle_length_days(),
        params.period_length_days(),
        params.ovulation_offset_days(),
    )?;
    let count = request.cycles_to_predict.unwrap_or(DEFAULT_CYCLES_TO_PREDICT);
    let forecasts = forecast_cycles(next_start, &params, count, settings.fertile_lead_days)?;

    Ok(PeriodResponse {
        as_of,
        next_period_start: next_start.into(),
        next_period_end: period_end_date(next_start, params.period_length_days())?.into(),
        days_until_next_period: diff_days(next_start, as_of),
        ovulation_date: ovulation_date.into(),
        fertile_window: fertile_window.into(),
        day_of_cycle: day_of_cycle(as_of, current_start, params.cycle_length_days())?,
        phase,
        phase_description: phase.description().to_string(),
        currently_fertile: fertile_window.contains(as_of),
        forecasts: forecasts.iter().map(|f| forecast_view(f, as_of)).collect(),
    })
}

// ============================================================================
// Weight Gain
// ============================================================================

fn gain_in_unit(range: GainRange, unit: WeightUnit) -> GainRange {
    GainRange {
        min: round_to(unit.from_kg(WeightUnit::Lbs.to_kg(range.min)), 1),
        max: round_to(unit.from_kg(WeightUnit::Lbs.to_kg(range.max)), 1),
    }
}

pub fn evaluate_weight_gain(
    request: &WeightGainRequest,
    settings: &CalculatorSettings,
) -> CalcResult<WeightGainResponse> {
    let unit = request.weight_unit;
    let pre_kg = weight_to_kg(parse_measurement("pre-pregnancy weight", &request.pre_pregnancy_weight)?, unit)?;
    let current_kg = weight_to_kg(parse_measurement("current weight", &request.current_weight)?, unit)?;
    let gestational_weeks = request
        .gestational_weeks
        .parse_whole()
        .map_err(|msg| CalcError::InvalidMeasurement(format!("gestational weeks {}", msg)))?;

    let input = WeightGainInput {
        pre_pregnancy_weight_kg: pre_kg,
        current_weight_kg: current_kg,
        height_m: request.height.to_m()?,
        gestational_weeks,
        pregnancy_type: request.pregnancy_type,
    };
    let assessment = weight_gain::assess(&input, settings.weight_gain_tolerance_lbs)?;
    let lbs_in_unit = |lbs: f64| round_to(unit.from_kg(WeightUnit::Lbs.to_kg(lbs)), 1);

    Ok(WeightGainResponse {
        pre_pregnancy_bmi: round_to(assessment.pre_pregnancy_bmi, 1),
        bmi_category: assessment.target.bmi_category,
        bmi_category_description: assessment.target.bmi_category.description().to_string(),
        pregnancy_type: assessment.target.pregnancy_type,
        weight_unit: unit,
        total_gain_target: gain_in_unit(assessment.target.total_gain, unit),
        weekly_gain_target: gain_in_unit(assessment.target.weekly_gain, unit),
        current_gain: lbs_in_unit(assessment.current_gain_lbs),
        expected_gain_now: gain_in_unit(assessment.expected_gain_now, unit),
        status: assessment.status,
        status_description: assessment.status.description().to_string(),
        remaining_weeks: assessment.remaining_weeks,
        remaining_gain: gain_in_unit(assessment.remaining_gain, unit),
        weekly_gain_needed: lbs_in_unit(assessment.weekly_gain_needed_lbs),
    })
}

// ============================================================================
// Body Surface Area
// ============================================================================

pub fn evaluate_bsa(request: &BsaRequest) -> CalcResult<BsaResponse> {
    let weight_kg = weight_to_kg(parse_measurement("weight", &request.weight)?, request.weight_unit)?;
    let height_cm = request.height.to_cm()?;

    let mut analysis = bsa::analyze(weight_kg, height_cm, request.age_years, request.sex, request.formula)?;
    analysis.bmi = round_to(analysis.bmi, 1);
    analysis.weight_to_bsa_ratio = round_to(analysis.weight_to_bsa_ratio, 1);
    analysis.height_to_bsa_ratio = round_to(analysis.height_to_bsa_ratio, 2);

    Ok(BsaResponse {
        weight_kg: round_to(weight_kg, 1),
        height_cm: round_to(height_cm, 1),
        analysis,
    })
}
