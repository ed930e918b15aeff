//! Pregnancy weight gain guidance
//!
//! Targets follow the IOM 2009 recommendations, keyed by pre-pregnancy BMI
//! category and by singleton or twin pregnancy. All gains are in pounds,
//! as in the published table.

use crate::errors::{CalcError, CalcResult};
use crate::units::WeightUnit;
use crate::validation::require_positive_measurement;
use serde::{Deserialize, Serialize};

/// Gain expected over the first trimester, in pounds
pub const FIRST_TRIMESTER_GAIN: GainRange = GainRange { min: 1.0, max: 4.4 };
pub const FIRST_TRIMESTER_WEEKS: i64 = 13;
pub const FULL_TERM_WEEKS: i64 = 40;
pub const MAX_GESTATIONAL_WEEKS: i64 = 42;
pub const DEFAULT_STATUS_TOLERANCE_LBS: f64 = 2.0;

// ============================================================================
// BMI
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn description(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal Weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

/// BMI = weight (kg) / height (m)²
pub fn bmi_of(weight_kg: f64, height_m: f64) -> CalcResult<f64> {
    let weight_kg = require_positive_measurement("weight", weight_kg)?;
    let height_m = require_positive_measurement("height", height_m)?;
    Ok(weight_kg / (height_m * height_m))
}

pub fn bmi_category_of(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

// ============================================================================
// IOM Targets
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PregnancyType {
    #[default]
    Singleton,
    Twins,
}

/// Inclusive range of pounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainRange {
    pub min: f64,
    pub max: f64,
}

impl GainRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightGainTarget {
    pub bmi_category: BmiCategory,
    pub pregnancy_type: PregnancyType,
    pub total_gain: GainRange,
    /// Per week in the second and third trimesters
    pub weekly_gain: GainRange,
}

/// IOM 2009 total and weekly gain for a category
pub fn gain_target_for(bmi_category: BmiCategory, pregnancy_type: PregnancyType) -> WeightGainTarget {
    use BmiCategory::*;
    use PregnancyType::*;

    let (total_gain, weekly_gain) = match (pregnancy_type, bmi_category) {
        (Singleton, Underweight) => (GainRange::new(28.0, 40.0), GainRange::new(1.0, 1.3)),
        (Singleton, Normal) => (GainRange::new(25.0, 35.0), GainRange::new(0.8, 1.0)),
        (Singleton, Overweight) => (GainRange::new(15.0, 25.0), GainRange::new(0.5, 0.7)),
        (Singleton, Obese) => (GainRange::new(11.0, 20.0), GainRange::new(0.4, 0.6)),
        (Twins, Underweight) => (GainRange::new(50.0, 62.0), GainRange::new(1.25, 1.75)),
        (Twins, Normal) => (GainRange::new(37.0, 54.0), GainRange::new(1.0, 1.25)),
        (Twins, Overweight) => (GainRange::new(31.0, 50.0), GainRange::new(0.75, 1.0)),
        (Twins, Obese) => (GainRange::new(25.0, 42.0), GainRange::new(0.5, 0.75)),
    };

    WeightGainTarget {
        bmi_category,
        pregnancy_type,
        total_gain,
        weekly_gain,
    }
}

/// Cumulative gain expected by `gestational_weeks`
///
/// Flat first-trimester allowance, then the weekly rate for every week past 13.
pub fn expected_gain_at_week(gestational_weeks: i64, weekly_gain: GainRange) -> GainRange {
    if gestational_weeks <= FIRST_TRIMESTER_WEEKS {
        return FIRST_TRIMESTER_GAIN;
    }
    let weeks_past = (gestational_weeks - FIRST_TRIMESTER_WEEKS) as f64;
    GainRange {
        min: FIRST_TRIMESTER_GAIN.min + weeks_past * weekly_gain.min,
        max: FIRST_TRIMESTER_GAIN.max + weeks_past * weekly_gain.max,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightStatus {
    BelowRange,
    WithinRange,
    AboveRange,
}

impl WeightStatus {
    pub fn description(&self) -> &'static str {
        match self {
            WeightStatus::BelowRange => "Below Recommended Range",
            WeightStatus::WithinRange => "Within Recommended Range",
            WeightStatus::AboveRange => "Above Recommended Range",
        }
    }
}

pub fn status_of(current_gain: f64, expected: GainRange, tolerance: f64) -> WeightStatus {
    if current_gain < expected.min - tolerance {
        WeightStatus::BelowRange
    } else if current_gain > expected.max + tolerance {
        WeightStatus::AboveRange
    } else {
        WeightStatus::WithinRange
    }
}

// ============================================================================
// Assessment
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightGainInput {
    pub pre_pregnancy_weight_kg: f64,
    pub current_weight_kg: f64,
    pub height_m: f64,
    pub gestational_weeks: i64,
    pub pregnancy_type: PregnancyType,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightGainAssessment {
    pub pre_pregnancy_bmi: f64,
    pub target: WeightGainTarget,
    pub current_gain_lbs: f64,
    pub expected_gain_now: GainRange,
    pub status: WeightStatus,
    pub remaining_weeks: i64,
    /// Still to gain to reach the total target
    pub remaining_gain: GainRange,
    /// Per week to land on the middle of the total target
    pub weekly_gain_needed_lbs: f64,
}

pub fn assess(input: &WeightGainInput, tolerance_lbs: f64) -> CalcResult<WeightGainAssessment> {
    if !(1..=MAX_GESTATIONAL_WEEKS).contains(&input.gestational_weeks) {
        return Err(CalcError::InvalidMeasurement(format!(
            "gestational week must be between 1 and {}, got {}",
            MAX_GESTATIONAL_WEEKS, input.gestational_weeks
        )));
    }
    let current_weight_kg = require_positive_measurement("current weight", input.current_weight_kg)?;
    let pre_pregnancy_bmi = bmi_of(input.pre_pregnancy_weight_kg, input.height_m)?;

    let target = gain_target_for(bmi_category_of(pre_pregnancy_bmi), input.pregnancy_type);
    let current_gain_lbs =
        WeightUnit::Kg.to_lbs(current_weight_kg) - WeightUnit::Kg.to_lbs(input.pre_pregnancy_weight_kg);
    let expected_gain_now = expected_gain_at_week(input.gestational_weeks, target.weekly_gain);

    let remaining_weeks = (FULL_TERM_WEEKS - input.gestational_weeks).max(0);
    let weekly_gain_needed_lbs = if remaining_weeks > 0 {
        (target.total_gain.midpoint() - current_gain_lbs) / remaining_weeks as f64
    } else {
        0.0
    };

    Ok(WeightGainAssessment {
        pre_pregnancy_bmi,
        target,
        current_gain_lbs,
        expected_gain_now,
        status: status_of(current_gain_lbs, expected_gain_now, tolerance_lbs),
        remaining_weeks,
        remaining_gain: GainRange {
            min: (target.total_gain.min - current_gain_lbs).max(0.0),
            max: (target.total_gain.max - current_gain_lbs).max(0.0),
        },
        weekly_gain_needed_lbs,
    })
}
