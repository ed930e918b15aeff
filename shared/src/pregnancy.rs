//! Pregnancy dating
//!
//! Naegele's rule and its inverses. Any one of four anchor dates fixes the
//! whole timeline (LMP, conception, due date); gestational age and the
//! derived progress figures are then measured from the LMP.

use crate::cycle::{derive_fertile_window, ovulation_offset_days, FertileWindow, WindowEnd};
use crate::date_math::{diff_days, CalendarDate};
use crate::errors::{CalcError, CalcResult};
use serde::{Deserialize, Serialize};

/// LMP to due date
pub const NAEGELE_DAYS: i64 = 280;
/// Conception to due date
pub const CONCEPTION_TO_DUE_DAYS: i64 = 266;
pub const DEFAULT_LUTEAL_PHASE_DAYS: i64 = 14;
pub const DEFAULT_CYCLE_LENGTH_DAYS: i64 = 28;

pub const EARLY_TERM_WEEKS: i64 = 37;
pub const LATE_TERM_WEEKS: i64 = 42;

// ============================================================================
// Anchors and Derived Dates
// ============================================================================

/// The single date a pregnancy timeline is computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "date", rename_all = "snake_case")]
pub enum PregnancyAnchor {
    #[serde(rename = "lmp")]
    LastMenstrualPeriod(CalendarDate),
    Conception(CalendarDate),
    DueDate(CalendarDate),
    /// Treated as if the baby arrived on its due date
    BirthDate(CalendarDate),
}

impl PregnancyAnchor {
    pub fn date(&self) -> CalendarDate {
        match self {
            PregnancyAnchor::LastMenstrualPeriod(date)
            | PregnancyAnchor::Conception(date)
            | PregnancyAnchor::DueDate(date)
            | PregnancyAnchor::BirthDate(date) => *date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PregnancyDates {
    pub lmp_date: CalendarDate,
    pub conception_date: CalendarDate,
    pub due_date: CalendarDate,
    /// Set when the timeline was reconstructed retrospectively
    pub is_approximation: bool,
}

/// Derive the full timeline from one anchor
///
/// `cycle_length_days` shifts conception relative to the LMP; it must leave
/// room for a 14-day luteal phase.
pub fn derive_dates(anchor: PregnancyAnchor, cycle_length_days: i64) -> CalcResult<PregnancyDates> {
    let conception_offset = ovulation_offset_days(cycle_length_days, DEFAULT_LUTEAL_PHASE_DAYS)?;

    let dates = match anchor {
        PregnancyAnchor::LastMenstrualPeriod(lmp) => PregnancyDates {
            lmp_date: lmp,
            conception_date: lmp.add_days(conception_offset)?,
            due_date: lmp.add_days(NAEGELE_DAYS)?,
            is_approximation: false,
        },
        PregnancyAnchor::Conception(conception) => PregnancyDates {
            lmp_date: conception.add_days(-conception_offset)?,
            conception_date: conception,
            due_date: conception.add_days(CONCEPTION_TO_DUE_DAYS)?,
            is_approximation: false,
        },
        PregnancyAnchor::DueDate(due) => {
            let conception = due.add_days(-CONCEPTION_TO_DUE_DAYS)?;
            PregnancyDates {
                lmp_date: conception.add_days(-conception_offset)?,
                conception_date: conception,
                due_date: due,
                is_approximation: false,
            }
        }
        PregnancyAnchor::BirthDate(birth) => {
            let conception = birth.add_days(-CONCEPTION_TO_DUE_DAYS)?;
            let lmp = conception.add_days(-conception_offset)?;
            // Reported due date is what the LMP would have predicted
            PregnancyDates {
                lmp_date: lmp,
                conception_date: conception,
                due_date: lmp.add_days(NAEGELE_DAYS)?,
                is_approximation: true,
            }
        }
    };

    Ok(dates)
}

// ============================================================================
// Gestational Age and Trimesters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestationalAge {
    pub total_days: i64,
    pub weeks: i64,
    /// Days past the last completed week (0..=6)
    pub days: i64,
}

pub fn gestational_age(lmp: CalendarDate, as_of: CalendarDate) -> CalcResult<GestationalAge> {
    let total_days = diff_days(as_of, lmp);
    if total_days < 0 {
        return Err(CalcError::OutOfDomainResult(format!(
            "{} is before the last menstrual period {}",
            as_of, lmp
        )));
    }
    Ok(GestationalAge {
        total_days,
        weeks: total_days / 7,
        days: total_days % 7,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trimester {
    First,
    Second,
    Third,
}

impl Trimester {
    /// Completed weeks into this trimester
    pub fn week_within(&self, gestational_weeks: i64) -> i64 {
        match self {
            Trimester::First => gestational_weeks,
            Trimester::Second => gestational_weeks - 13,
            Trimester::Third => gestational_weeks - 26,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Trimester::First => 1,
            Trimester::Second => 2,
            Trimester::Third => 3,
        }
    }
}

pub fn trimester_of(gestational_weeks: i64) -> Trimester {
    if gestational_weeks <= 13 {
        Trimester::First
    } else if gestational_weeks <= 26 {
        Trimester::Second
    } else {
        Trimester::Third
    }
}

/// Share of a 280-day pregnancy elapsed, clamped to `0..=100`
pub fn progress_percentage(gestational_days: i64) -> f64 {
    (gestational_days as f64 / NAEGELE_DAYS as f64 * 100.0).clamp(0.0, 100.0)
}

/// Negative once the due date has passed
pub fn days_until_due(due_date: CalendarDate, as_of: CalendarDate) -> i64 {
    diff_days(due_date, as_of)
}

// ============================================================================
// Milestones and Windows
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub week: i64,
    pub label: &'static str,
    pub date: CalendarDate,
}

const MILESTONES: [(i64, &str); 5] = [
    (13, "End of first trimester"),
    (20, "Anatomy scan"),
    (24, "Viability milestone"),
    (27, "Third trimester begins"),
    (37, "Full term"),
];

pub fn milestones(lmp: CalendarDate) -> CalcResult<Vec<Milestone>> {
    MILESTONES
        .iter()
        .map(|&(week, label)| {
            Ok(Milestone {
                week,
                label,
                date: lmp.add_days(week * 7)?,
            })
        })
        .collect()
}

/// Inclusive span of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: CalendarDate,
    pub end: CalendarDate,
}

/// Early term (37w) to late term (42w)
pub fn term_window(lmp: CalendarDate) -> CalcResult<DateSpan> {
    Ok(DateSpan {
        start: lmp.add_days(EARLY_TERM_WEEKS * 7)?,
        end: lmp.add_days(LATE_TERM_WEEKS * 7)?,
    })
}

/// Days of intercourse that could have led to conception on `conception`
pub fn conception_window(conception: CalendarDate, lead_days: i64) -> CalcResult<FertileWindow> {
    derive_fertile_window(conception, lead_days, WindowEnd::DayAfterOvulation)
}

/// Ovulation day and the egg's one-day lifetime
pub fn ovulation_window(conception: CalendarDate) -> CalcResult<DateSpan> {
    Ok(DateSpan {
        start: conception,
        end: conception.add_days(1)?,
    })
}

// ============================================================================
// Pregnancy Record
// ============================================================================

/// Timeline plus progress as of a given day
///
/// Progress fields are `None` when `as_of` falls before the LMP, and always
/// `None` for a birth-date anchor since that pregnancy is over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PregnancyRecord {
    pub lmp_date: CalendarDate,
    pub conception_date: CalendarDate,
    pub due_date: CalendarDate,
    pub gestational_age: Option<GestationalAge>,
    pub trimester: Option<Trimester>,
    pub progress_percentage: Option<f64>,
    pub days_until_due: Option<i64>,
    pub is_approximation: bool,
}

impl PregnancyRecord {
    pub fn build(
        anchor: PregnancyAnchor,
        cycle_length_days: i64,
        as_of: CalendarDate,
    ) -> CalcResult<Self> {
        let dates = derive_dates(anchor, cycle_length_days)?;
        let ongoing = !matches!(anchor, PregnancyAnchor::BirthDate(_));
        let age = if ongoing {
            gestational_age(dates.lmp_date, as_of).ok()
        } else {
            None
        };

        Ok(Self {
            lmp_date: dates.lmp_date,
            conception_date: dates.conception_date,
            due_date: dates.due_date,
            gestational_age: age,
            trimester: age.map(|age| trimester_of(age.weeks)),
            progress_percentage: age.map(|age| progress_percentage(age.total_days)),
            days_until_due: ongoing.then(|| days_until_due(dates.due_date, as_of)),
            is_approximation: dates.is_approximation,
        })
    }
}
