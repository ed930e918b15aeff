//! Unit conversion for body measurements
//!
//! Calculators work in kilograms and centimeters internally; forms may
//! submit pounds, meters, inches or feet plus inches. Conversion happens
//! once, at the boundary, and never in the formulas themselves.

use crate::errors::{CalcError, CalcResult};
use crate::validation::{parse_measurement, require_positive_measurement, FormNumber};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const KG_PER_LB: f64 = 0.453592;
pub const CM_PER_INCH: f64 = 2.54;
pub const INCHES_PER_FOOT: f64 = 12.0;

// ============================================================================
// Weight Units
// ============================================================================

/// Unit a weight was entered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    /// Convert from this unit to kilograms
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lbs => value * KG_PER_LB,
        }
    }

    /// Convert from kilograms to this unit
    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            WeightUnit::Kg => kg,
            WeightUnit::Lbs => kg / KG_PER_LB,
        }
    }

    pub fn to_lbs(&self, value: f64) -> f64 {
        WeightUnit::Lbs.from_kg(self.to_kg(value))
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for WeightUnit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kg" | "kilogram" | "kilograms" => Ok(WeightUnit::Kg),
            "lbs" | "lb" | "pound" | "pounds" => Ok(WeightUnit::Lbs),
            other => Err(CalcError::InvalidMeasurement(format!(
                "unknown weight unit '{}'",
                other
            ))),
        }
    }
}

/// Validated weight in kilograms
pub fn weight_to_kg(value: f64, unit: WeightUnit) -> CalcResult<f64> {
    let value = require_positive_measurement("weight", value)?;
    Ok(unit.to_kg(value))
}

// ============================================================================
// Height Measurements
// ============================================================================

/// A height as entered, in one of the supported systems
///
/// Values are kept as submitted so that non-numeric form text is reported
/// as an invalid measurement by [`HeightMeasurement::to_cm`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", rename_all = "snake_case")]
pub enum HeightMeasurement {
    #[serde(rename = "cm")]
    Centimeters { value: FormNumber },
    #[serde(rename = "m")]
    Meters { value: FormNumber },
    #[serde(rename = "in")]
    Inches { value: FormNumber },
    FeetInches { feet: FormNumber, inches: FormNumber },
}

fn parse_non_negative(field: &str, raw: &FormNumber) -> CalcResult<f64> {
    let value = raw
        .parse_f64()
        .map_err(|msg| CalcError::InvalidMeasurement(format!("{} {}", field, msg)))?;
    if value < 0.0 {
        return Err(CalcError::InvalidMeasurement(format!("{} cannot be negative", field)));
    }
    Ok(value)
}

impl HeightMeasurement {
    /// Total height in centimeters
    ///
    /// Feet and inches may each be zero but not negative; the combined
    /// height must be positive.
    pub fn to_cm(&self) -> CalcResult<f64> {
        let cm = match self {
            HeightMeasurement::Centimeters { value } => parse_measurement("height", value)?,
            HeightMeasurement::Meters { value } => parse_measurement("height", value)? * 100.0,
            HeightMeasurement::Inches { value } => parse_measurement("height", value)? * CM_PER_INCH,
            HeightMeasurement::FeetInches { feet, inches } => {
                let total_inches =
                    parse_non_negative("feet", feet)? * INCHES_PER_FOOT + parse_non_negative("inches", inches)?;
                require_positive_measurement("height", total_inches)? * CM_PER_INCH
            }
        };
        Ok(cm)
    }

    pub fn to_m(&self) -> CalcResult<f64> {
        Ok(self.to_cm()? / 100.0)
    }
}

impl fmt::Display for HeightMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeightMeasurement::Centimeters { value } => write!(f, "{} cm", value),
            HeightMeasurement::Meters { value } => write!(f, "{} m", value),
            HeightMeasurement::Inches { value } => write!(f, "{} in", value),
            HeightMeasurement::FeetInches { feet, inches } => write!(f, "{}'{}\"", feet, inches),
        }
    }
}
