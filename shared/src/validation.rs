//! Input validation at the calculator boundary
//!
//! Form fields arrive either as JSON numbers or as the raw strings an HTML
//! input produces. Everything here turns those into checked values or a
//! typed [`CalcError`]; nothing downstream ever sees `NaN`.

use crate::cycle::{CycleLimits, CycleParameters};
use crate::errors::{CalcError, CalcResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric form field: a JSON number or numeric text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormNumber {
    Number(f64),
    Text(String),
}

impl FormNumber {
    /// Parse as a finite floating point value
    pub fn parse_f64(&self) -> Result<f64, String> {
        match self {
            FormNumber::Number(value) if value.is_finite() => Ok(*value),
            FormNumber::Number(_) => Err("must be a finite number".to_string()),
            FormNumber::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err("is required".to_string());
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| format!("'{}' is not a number", trimmed))
            }
        }
    }

    /// Parse as a whole number (`"28"` and `28.0` are accepted, `28.5` is not)
    pub fn parse_whole(&self) -> Result<i64, String> {
        let value = self.parse_f64()?;
        if value.fract() != 0.0 {
            return Err(format!("{} is not a whole number", value));
        }
        if value.abs() > i64::MAX as f64 {
            return Err(format!("{} is out of range", value));
        }
        Ok(value as i64)
    }
}

impl fmt::Display for FormNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormNumber::Number(value) => write!(f, "{}", value),
            FormNumber::Text(text) => write!(f, "{}", text.trim()),
        }
    }
}

impl From<f64> for FormNumber {
    fn from(value: f64) -> Self {
        FormNumber::Number(value)
    }
}

impl From<u32> for FormNumber {
    fn from(value: u32) -> Self {
        FormNumber::Number(value as f64)
    }
}

impl From<&str> for FormNumber {
    fn from(value: &str) -> Self {
        FormNumber::Text(value.to_string())
    }
}

/// Reject zero, negative and non-finite measured values
pub fn require_positive_measurement(field: &str, value: f64) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::InvalidMeasurement(format!(
            "{} must be a valid number",
            field
        )));
    }
    if value <= 0.0 {
        return Err(CalcError::InvalidMeasurement(format!(
            "{} must be greater than zero",
            field
        )));
    }
    Ok(value)
}

/// Parse a weight/height style form field
pub fn parse_measurement(field: &str, raw: &FormNumber) -> CalcResult<f64> {
    let value = raw
        .parse_f64()
        .map_err(|msg| CalcError::InvalidMeasurement(format!("{} {}", field, msg)))?;
    require_positive_measurement(field, value)
}

/// Parse a day-count field of the cycle model
pub fn parse_cycle_days(field: &str, raw: &FormNumber) -> CalcResult<i64> {
    raw.parse_whole()
        .map_err(|msg| CalcError::InvalidCycleParameters(format!("{} {}", field, msg)))
}

/// Parse an optional day-count field, falling back to `default`
pub fn parse_cycle_days_or(field: &str, raw: Option<&FormNumber>, default: i64) -> CalcResult<i64> {
    match raw {
        Some(raw) => parse_cycle_days(field, raw),
        None => Ok(default),
    }
}

/// Parse and validate the three cycle fields of a form
pub fn validate_cycle_parameters(
    cycle_length: Option<&FormNumber>,
    period_length: Option<&FormNumber>,
    luteal_phase: Option<&FormNumber>,
    defaults: &CycleParameters,
    limits: &CycleLimits,
) -> CalcResult<CycleParameters> {
    CycleParameters::new(
        parse_cycle_days_or("cycle length", cycle_length, defaults.cycle_length_days())?,
        parse_cycle_days_or("period length", period_length, defaults.period_length_days())?,
        parse_cycle_days_or("luteal phase", luteal_phase, defaults.luteal_phase_days())?,
        limits,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(FormNumber::Number(28.0), 28.0)]
    #[case(FormNumber::from("28"), 28.0)]
    #[case(FormNumber::from(" 70.5 "), 70.5)]
    fn test_parse_f64_accepts_numbers(#[case] raw: FormNumber, #[case] expected: f64) {
        assert_eq!(raw.parse_f64().unwrap(), expected);
    }

    #[rstest]
    #[case(FormNumber::from(""))]
    #[case(FormNumber::from("abc"))]
    #[case(FormNumber::from("NaN"))]
    #[case(FormNumber::from("inf"))]
    #[case(FormNumber::Number(f64::NAN))]
    fn test_parse_f64_rejects_garbage(#[case] raw: FormNumber) {
        assert!(raw.parse_f64().is_err());
    }

    #[test]
    fn test_parse_whole() {
        assert_eq!(FormNumber::from("28").parse_whole().unwrap(), 28);
        assert_eq!(FormNumber::Number(28.0).parse_whole().unwrap(), 28);
        assert!(FormNumber::Number(28.5).parse_whole().is_err());
    }

    #[test]
    fn test_form_number_deserializes_from_json_number_and_string() {
        let from_number: FormNumber = serde_json::from_str("28").unwrap();
        let from_text: FormNumber = serde_json::from_str("\"28\"").unwrap();
        assert_eq!(from_number.parse_whole().unwrap(), 28);
        assert_eq!(from_text.parse_whole().unwrap(), 28);
    }

    #[test]
    fn test_require_positive_measurement() {
        assert!(require_positive_measurement("height", 170.0).is_ok());
        assert!(matches!(
            require_positive_measurement("height", 0.0),
            Err(CalcError::InvalidMeasurement(_))
        ));
        assert!(require_positive_measurement("height", -5.0).is_err());
        assert!(require_positive_measurement("height", f64::INFINITY).is_err());
    }

    #[test]
    fn test_parse_cycle_days_error_kind() {
        assert!(matches!(
            parse_cycle_days("cycle length", &FormNumber::from("twenty")),
            Err(CalcError::InvalidCycleParameters(_))
        ));
        assert_eq!(parse_cycle_days_or("cycle length", None, 28).unwrap(), 28);
    }

    #[test]
    fn test_parse_measurement_error_kind() {
        assert!(matches!(
            parse_measurement("weight", &FormNumber::from("")),
            Err(CalcError::InvalidMeasurement(_))
        ));
    }

    #[test]
    fn test_validate_cycle_parameters_defaults_and_bounds() {
        let defaults = CycleParameters::default();
        let limits = CycleLimits::default();

        let params = validate_cycle_parameters(None, None, None, &defaults, &limits).unwrap();
        assert_eq!(params, defaults);

        let cycle = FormNumber::from("30");
        let params = validate_cycle_parameters(Some(&cycle), None, None, &defaults, &limits).unwrap();
        assert_eq!(params.cycle_length_days(), 30);
        assert_eq!(params.ovulation_offset_days(), 16);

        let too_long = FormNumber::from(40u32);
        assert!(matches!(
            validate_cycle_parameters(Some(&too_long), None, None, &defaults, &limits),
            Err(CalcError::InvalidCycleParameters(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_text_and_number_agree(value in 0.1f64..500.0) {
            let text = FormNumber::Text(value.to_string());
            prop_assert_eq!(text.parse_f64().unwrap(), value);
        }
    }
}
