//! Health Calculators WASM Module
//!
//! Browser bindings for the calculators. Each JSON entry point takes the
//! same request body as the HTTP API plus today's date (`YYYY-MM-DD`, from
//! the caller's local clock) and returns the response as JSON.

use health_calc_shared::bsa::{self, BsaFormula};
use health_calc_shared::weight_gain::bmi_of;
use health_calc_shared::{
    evaluate_bsa, evaluate_ovulation, evaluate_period, evaluate_pregnancy, evaluate_weight_gain,
    CalcResult, CalculatorSettings, CalendarDate,
};
use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;
use wasm_bindgen::prelude::*;

/// Decode, validate, evaluate and encode one request
fn run<Req, Resp>(request_json: &str, evaluate: impl FnOnce(&Req) -> CalcResult<Resp>) -> Result<String, String>
where
    Req: DeserializeOwned + Validate,
    Resp: Serialize,
{
    let request: Req = serde_json::from_str(request_json).map_err(|e| format!("Invalid request: {}", e))?;
    request.validate().map_err(|e| e.to_string())?;
    let response = evaluate(&request).map_err(|e| e.to_string())?;
    serde_json::to_string(&response).map_err(|e| e.to_string())
}

fn parse_today(today: &str) -> Result<CalendarDate, String> {
    CalendarDate::parse(today).map_err(|e| e.to_string())
}

pub fn pregnancy_impl(request_json: &str, today: &str) -> Result<String, String> {
    let today = parse_today(today)?;
    run(request_json, |req| evaluate_pregnancy(req, &CalculatorSettings::default(), today))
}

pub fn ovulation_impl(request_json: &str, today: &str) -> Result<String, String> {
    let today = parse_today(today)?;
    run(request_json, |req| evaluate_ovulation(req, &CalculatorSettings::default(), today))
}

pub fn period_impl(request_json: &str, today: &str) -> Result<String, String> {
    let today = parse_today(today)?;
    run(request_json, |req| evaluate_period(req, &CalculatorSettings::default(), today))
}

pub fn weight_gain_impl(request_json: &str) -> Result<String, String> {
    run(request_json, |req| evaluate_weight_gain(req, &CalculatorSettings::default()))
}

pub fn bsa_impl(request_json: &str) -> Result<String, String> {
    run(request_json, evaluate_bsa)
}

/// Pregnancy dates from an LMP, conception, due or birth date
#[wasm_bindgen]
pub fn calculate_pregnancy(request_json: &str, today: &str) -> Result<String, JsError> {
    pregnancy_impl(request_json, today).map_err(|e| JsError::new(&e))
}

/// Ovulation date, fertile window and upcoming cycles
#[wasm_bindgen]
pub fn calculate_ovulation(request_json: &str, today: &str) -> Result<String, JsError> {
    ovulation_impl(request_json, today).map_err(|e| JsError::new(&e))
}

/// Next period and multi-cycle forecast
#[wasm_bindgen]
pub fn calculate_period(request_json: &str, today: &str) -> Result<String, JsError> {
    period_impl(request_json, today).map_err(|e| JsError::new(&e))
}

#[wasm_bindgen]
pub fn calculate_weight_gain(request_json: &str) -> Result<String, JsError> {
    weight_gain_impl(request_json).map_err(|e| JsError::new(&e))
}

#[wasm_bindgen]
pub fn calculate_bsa(request_json: &str) -> Result<String, JsError> {
    bsa_impl(request_json).map_err(|e| JsError::new(&e))
}

pub fn bmi_impl(weight_kg: f64, height_cm: f64) -> Result<f64, String> {
    bmi_of(weight_kg, height_cm / 100.0).map_err(|e| e.to_string())
}

pub fn bsa_value_impl(formula: BsaFormula, weight_kg: f64, height_cm: f64) -> Result<f64, String> {
    bsa::compute(formula, weight_kg, height_cm)
        .map(|result| result.value_m2)
        .map_err(|e| e.to_string())
}

/// Calculate BMI from weight (kg) and height (cm)
#[wasm_bindgen]
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> Result<f64, JsError> {
    bmi_impl(weight_kg, height_cm).map_err(|e| JsError::new(&e))
}

fn single_bsa(formula: BsaFormula, weight_kg: f64, height_cm: f64) -> Result<f64, JsError> {
    bsa_value_impl(formula, weight_kg, height_cm).map_err(|e| JsError::new(&e))
}

#[wasm_bindgen]
pub fn bsa_dubois(weight_kg: f64, height_cm: f64) -> Result<f64, JsError> {
    single_bsa(BsaFormula::DuBois, weight_kg, height_cm)
}

#[wasm_bindgen]
pub fn bsa_mosteller(weight_kg: f64, height_cm: f64) -> Result<f64, JsError> {
    single_bsa(BsaFormula::Mosteller, weight_kg, height_cm)
}

#[wasm_bindgen]
pub fn bsa_haycock(weight_kg: f64, height_cm: f64) -> Result<f64, JsError> {
    single_bsa(BsaFormula::Haycock, weight_kg, height_cm)
}

#[wasm_bindgen]
pub fn bsa_gehan_george(weight_kg: f64, height_cm: f64) -> Result<f64, JsError> {
    single_bsa(BsaFormula::GehanGeorge, weight_kg, height_cm)
}

#[wasm_bindgen]
pub fn bsa_boyd(weight_kg: f64, height_cm: f64) -> Result<f64, JsError> {
    single_bsa(BsaFormula::Boyd, weight_kg, height_cm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pregnancy_json_round_trip() {
        let response = pregnancy_impl(r#"{"method":"lmp","date":"2024-01-01"}"#, "2024-05-20").unwrap();
        let value: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["due_date"]["date"], "2024-10-07");
        assert_eq!(value["gestational_age"]["weeks"], 20);
    }

    #[test]
    fn test_invalid_today_is_reported() {
        let err = ovulation_impl(r#"{"last_period_date":"2024-03-01"}"#, "03/13/2024").unwrap_err();
        assert!(err.contains("Invalid date input"));
    }

    #[test]
    fn test_shape_errors_are_reported() {
        assert!(period_impl(r#"{"last_period_date":"2024-01-01","cycles_to_predict":0}"#, "2024-01-10").is_err());
        assert!(bsa_impl("not json").unwrap_err().starts_with("Invalid request"));
    }

    #[test]
    fn test_weight_gain_json() {
        let request = r#"{
            "pre_pregnancy_weight": 60,
            "current_weight": 64,
            "height": {"unit": "m", "value": 1.65},
            "gestational_weeks": 20,
            "pregnancy_type": "twins"
        }"#;
        let value: serde_json::Value = serde_json::from_str(&weight_gain_impl(request).unwrap()).unwrap();
        assert_eq!(value["pregnancy_type"], "twins");
        assert_eq!(value["weight_unit"], "kg");
        assert_eq!(value["total_gain_target"]["min"], 16.8);
    }

    #[test]
    fn test_bmi() {
        let bmi = bmi_impl(70.0, 175.0).unwrap();
        assert!((bmi - 22.86).abs() < 0.1);
    }

    #[test]
    fn test_bmi_rejects_bad_input() {
        assert!(bmi_impl(70.0, 0.0).unwrap_err().contains("Invalid measurement"));
        assert!(bmi_impl(-70.0, 175.0).is_err());
        assert!(bmi_impl(f64::NAN, 175.0).is_err());
    }

    #[test]
    fn test_single_formulas() {
        assert_eq!(bsa_value_impl(BsaFormula::DuBois, 70.0, 170.0).unwrap(), 1.81);
        assert_eq!(bsa_value_impl(BsaFormula::Mosteller, 70.0, 170.0).unwrap(), 1.818);
    }

    #[test]
    fn test_single_formulas_reject_bad_input() {
        for formula in BsaFormula::ALL {
            assert!(bsa_value_impl(formula, -1.0, 170.0).unwrap_err().contains("Invalid measurement"));
            assert!(bsa_value_impl(formula, 70.0, 0.0).is_err());
        }
    }
}
