//! Menstrual cycle model
//!
//! Ovulation is placed a fixed luteal phase before the next period:
//! `ovulation_offset = cycle_length - luteal_phase`, counted from the first
//! day of the period. Fertile windows, next-period forecasts and the current
//! cycle phase all derive from that one offset.

use crate::date_math::{diff_days, CalendarDate};
use crate::errors::{CalcError, CalcResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CYCLE_LENGTH_DAYS: i64 = 28;
pub const DEFAULT_PERIOD_LENGTH_DAYS: i64 = 5;
pub const DEFAULT_LUTEAL_PHASE_DAYS: i64 = 14;
/// Sperm survive up to five days before ovulation
pub const DEFAULT_FERTILE_LEAD_DAYS: i64 = 5;
/// Upper bound on cycles returned by one forecast
pub const MAX_FORECAST_CYCLES: u32 = 12;

// ============================================================================
// Cycle Parameters
// ============================================================================

/// Accepted bounds for cycle parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleLimits {
    pub min_cycle_length_days: i64,
    pub max_cycle_length_days: i64,
    pub min_period_length_days: i64,
    pub max_period_length_days: i64,
    pub min_luteal_phase_days: i64,
    pub max_luteal_phase_days: i64,
}

impl Default for CycleLimits {
    fn default() -> Self {
        Self {
            min_cycle_length_days: 21,
            max_cycle_length_days: 35,
            min_period_length_days: 3,
            max_period_length_days: 10,
            min_luteal_phase_days: 10,
            max_luteal_phase_days: 17,
        }
    }
}

impl CycleLimits {
    /// Check a cycle length against the configured bounds
    pub fn check_cycle_length(&self, cycle_length_days: i64) -> CalcResult<i64> {
        check_bounds(
            "cycle length",
            cycle_length_days,
            self.min_cycle_length_days,
            self.max_cycle_length_days,
        )
    }

    pub fn check_period_length(&self, period_length_days: i64) -> CalcResult<i64> {
        check_bounds(
            "period length",
            period_length_days,
            self.min_period_length_days,
            self.max_period_length_days,
        )
    }

    pub fn check_luteal_phase(&self, luteal_phase_days: i64) -> CalcResult<i64> {
        check_bounds(
            "luteal phase",
            luteal_phase_days,
            self.min_luteal_phase_days,
            self.max_luteal_phase_days,
        )
    }
}

fn check_bounds(field: &str, value: i64, min: i64, max: i64) -> CalcResult<i64> {
    if value < min || value > max {
        return Err(CalcError::InvalidCycleParameters(format!(
            "{} must be between {} and {} days, got {}",
            field, min, max, value
        )));
    }
    Ok(value)
}

/// Validated cycle description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleParameters {
    cycle_length_days: i64,
    period_length_days: i64,
    luteal_phase_days: i64,
}

impl CycleParameters {
    /// Validate against `limits` and the cross-field invariants
    pub fn new(
        cycle_length_days: i64,
        period_length_days: i64,
        luteal_phase_days: i64,
        limits: &CycleLimits,
    ) -> CalcResult<Self> {
        limits.check_cycle_length(cycle_length_days)?;
        limits.check_period_length(period_length_days)?;
        limits.check_luteal_phase(luteal_phase_days)?;

        if period_length_days > cycle_length_days {
            return Err(CalcError::InvalidCycleParameters(format!(
                "period length ({}) cannot exceed cycle length ({})",
                period_length_days, cycle_length_days
            )));
        }
        // Also rejects luteal >= cycle
        ovulation_offset_days(cycle_length_days, luteal_phase_days)?;

        Ok(Self {
            cycle_length_days,
            period_length_days,
            luteal_phase_days,
        })
    }

    pub fn cycle_length_days(&self) -> i64 {
        self.cycle_length_days
    }

    pub fn period_length_days(&self) -> i64 {
        self.period_length_days
    }

    pub fn luteal_phase_days(&self) -> i64 {
        self.luteal_phase_days
    }

    /// Day offset of ovulation from the period start
    pub fn ovulation_offset_days(&self) -> i64 {
        self.cycle_length_days - self.luteal_phase_days
    }
}

impl Default for CycleParameters {
    fn default() -> Self {
        Self {
            cycle_length_days: DEFAULT_CYCLE_LENGTH_DAYS,
            period_length_days: DEFAULT_PERIOD_LENGTH_DAYS,
            luteal_phase_days: DEFAULT_LUTEAL_PHASE_DAYS,
        }
    }
}

// ============================================================================
// Ovulation and Fertile Window
// ============================================================================

/// Days from period start to ovulation
///
/// Fails when the luteal phase is not strictly shorter than the cycle.
pub fn ovulation_offset_days(cycle_length_days: i64, luteal_phase_days: i64) -> CalcResult<i64> {
    if cycle_length_days <= 0 || luteal_phase_days <= 0 {
        return Err(CalcError::InvalidCycleParameters(
            "cycle length and luteal phase must be positive".to_string(),
        ));
    }
    let offset = cycle_length_days - luteal_phase_days;
    if offset <= 0 {
        return Err(CalcError::InvalidCycleParameters(format!(
            "luteal phase ({}) must be shorter than the cycle ({})",
            luteal_phase_days, cycle_length_days
        )));
    }
    Ok(offset)
}

/// Estimated ovulation day of the cycle that starts on `period_start`
pub fn derive_ovulation_date(
    period_start: CalendarDate,
    cycle_length_days: i64,
    luteal_phase_days: i64,
) -> CalcResult<CalendarDate> {
    period_start.add_days(ovulation_offset_days(cycle_length_days, luteal_phase_days)?)
}

/// Where a fertile window ends relative to ovulation
///
/// The ovulation calculator closes the window on ovulation day; the
/// conception calculator keeps it open one more day to cover the egg's
/// lifetime. Callers choose explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowEnd {
    OvulationDay,
    DayAfterOvulation,
}

impl WindowEnd {
    pub fn trail_days(&self) -> i64 {
        match self {
            WindowEnd::OvulationDay => 0,
            WindowEnd::DayAfterOvulation => 1,
        }
    }
}

/// Days on which intercourse may lead to conception
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FertileWindow {
    pub ovulation_date: CalendarDate,
    pub window_start: CalendarDate,
    pub window_end: CalendarDate,
}

impl FertileWindow {
    /// Inclusive on both ends
    pub fn contains(&self, date: CalendarDate) -> bool {
        date >= self.window_start && date <= self.window_end
    }
}

pub fn derive_fertile_window(
    ovulation_date: CalendarDate,
    lead_days: i64,
    window_end: WindowEnd,
) -> CalcResult<FertileWindow> {
    if lead_days < 0 {
        return Err(CalcError::InvalidCycleParameters(format!(
            "fertile window lead cannot be negative, got {}",
            lead_days
        )));
    }
    Ok(FertileWindow {
        ovulation_date,
        window_start: ovulation_date.add_days(-lead_days)?,
        window_end: ovulation_date.add_days(window_end.trail_days())?,
    })
}

/// Chance of conception (percent) from intercourse on `date`
pub fn fertility_probability(date: CalendarDate, ovulation_date: CalendarDate) -> u8 {
    match diff_days(date, ovulation_date) {
        0 => 33,
        -1 => 30,
        -2 => 27,
        -3 => 15,
        -4 => 10,
        -5 => 5,
        _ => 0,
    }
}

// ============================================================================
// Period Forecasting
// ============================================================================

pub fn derive_next_period_date(
    period_start: CalendarDate,
    cycle_length_days: i64,
) -> CalcResult<CalendarDate> {
    if cycle_length_days <= 0 {
        return Err(CalcError::InvalidCycleParameters(
            "cycle length must be positive".to_string(),
        ));
    }
    period_start.add_days(cycle_length_days)
}

/// Last bleeding day of a period that starts on `period_start`
pub fn period_end_date(period_start: CalendarDate, period_length_days: i64) -> CalcResult<CalendarDate> {
    if period_length_days <= 0 {
        return Err(CalcError::InvalidCycleParameters(
            "period length must be positive".to_string(),
        ));
    }
    period_start.add_days(period_length_days - 1)
}

/// First predicted period start strictly after `today`
///
/// Steps forward one cycle at a time from the last known start.
pub fn next_period_after(
    last_period_start: CalendarDate,
    cycle_length_days: i64,
    today: CalendarDate,
) -> CalcResult<CalendarDate> {
    let mut next = derive_next_period_date(last_period_start, cycle_length_days)?;
    while next <= today {
        next = derive_next_period_date(next, cycle_length_days)?;
    }
    Ok(next)
}

/// One predicted cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleForecast {
    /// 1-based position in the forecast
    pub cycle_number: u32,
    pub period_start: CalendarDate,
    pub period_end: CalendarDate,
    pub ovulation_date: CalendarDate,
    pub fertile_window: FertileWindow,
}

/// Forecast `count` consecutive cycles, the first starting on `first_start`
pub fn forecast_cycles(
    first_start: CalendarDate,
    params: &CycleParameters,
    count: u32,
    lead_days: i64,
) -> CalcResult<Vec<CycleForecast>> {
    if !(1..=MAX_FORECAST_CYCLES).contains(&count) {
        return Err(CalcError::InvalidCycleParameters(format!(
            "cycles to forecast must be between 1 and {}, got {}",
            MAX_FORECAST_CYCLES, count
        )));
    }

    let mut forecasts = Vec::with_capacity(count as usize);
    let mut period_start = first_start;

    for cycle_number in 1..=count {
        let ovulation_date = period_start.add_days(params.ovulation_offset_days())?;
        forecasts.push(CycleForecast {
            cycle_number,
            period_start,
            period_end: period_end_date(period_start, params.period_length_days())?,
            ovulation_date,
            fertile_window: derive_fertile_window(ovulation_date, lead_days, WindowEnd::OvulationDay)?,
        });
        period_start = derive_next_period_date(period_start, params.cycle_length_days())?;
    }

    Ok(forecasts)
}

// ============================================================================
// Cycle Phase
// ============================================================================

/// Phase of the menstrual cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
}

impl CyclePhase {
    pub fn description(&self) -> &'static str {
        match self {
            CyclePhase::Menstrual => "Menstrual Phase",
            CyclePhase::Follicular => "Follicular Phase",
            CyclePhase::Ovulation => "Ovulation",
            CyclePhase::Luteal => "Luteal Phase",
        }
    }
}

/// 1-based day of the current cycle, wrapping every `cycle_length_days`
pub fn day_of_cycle(
    today: CalendarDate,
    period_start: CalendarDate,
    cycle_length_days: i64,
) -> CalcResult<i64> {
    if cycle_length_days <= 0 {
        return Err(CalcError::InvalidCycleParameters(
            "cycle length must be positive".to_string(),
        ));
    }
    let elapsed = diff_days(today, period_start);
    if elapsed < 0 {
        return Err(CalcError::OutOfDomainResult(format!(
            "{} is before the period start {}",
            today, period_start
        )));
    }
    Ok(elapsed % cycle_length_days + 1)
}

/// Classify a 1-based cycle day
///
/// Menstrual: `day <= period_length`. Follicular: up to the day before
/// ovulation. Ovulation: the ovulation offset day and the day after.
/// Luteal: everything else.
pub fn phase_for_day(day: i64, period_length_days: i64, ovulation_offset_days: i64) -> CyclePhase {
    if day <= period_length_days {
        CyclePhase::Menstrual
    } else if day < ovulation_offset_days {
        CyclePhase::Follicular
    } else if day == ovulation_offset_days || day == ovulation_offset_days + 1 {
        CyclePhase::Ovulation
    } else {
        CyclePhase::Luteal
    }
}

pub fn current_cycle_phase(
    today: CalendarDate,
    period_start: CalendarDate,
    cycle_length_days: i64,
    period_length_days: i64,
    ovulation_offset_days: i64,
) -> CalcResult<CyclePhase> {
    let day = day_of_cycle(today, period_start, cycle_length_days)?;
    Ok(phase_for_day(day, period_length_days, ovulation_offset_days))
}
