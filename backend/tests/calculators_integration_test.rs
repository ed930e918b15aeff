//! Integration tests for the calculator endpoints

mod common;

use axum::http::StatusCode;
use rstest::rstest;
use serde_json::json;

// ============================================================================
// Pregnancy
// ============================================================================

#[tokio::test]
async fn test_pregnancy_from_lmp() {
    let app = common::TestApp::new();
    let body = json!({
        "method": "lmp",
        "date": "2024-01-01",
        "as_of": "2024-05-20"
    });

    let (status, response) = app.post_json("/api/v1/calculators/pregnancy", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["due_date"]["date"], "2024-10-07");
    assert_eq!(response["due_date"]["long"], "Monday, October 7, 2024");
    assert_eq!(response["conception_date"]["date"], "2024-01-15");
    assert_eq!(response["gestational_age"]["weeks"], 20);
    assert_eq!(response["trimester"], "second");
    assert_eq!(response["progress_percentage"], 50.0);
    assert_eq!(response["is_approximation"], false);
}

#[tokio::test]
async fn test_pregnancy_from_due_date_with_string_cycle() {
    let app = common::TestApp::new();
    let body = json!({
        "method": "due_date",
        "date": "2024-10-07",
        "cycle_length_days": "28",
        "as_of": "2024-03-01"
    });

    let (status, response) = app.post_json("/api/v1/calculators/pregnancy", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["lmp_date"]["date"], "2024-01-01");
    assert_eq!(response["conception_date"]["date"], "2024-01-15");
}

#[rstest]
#[case(json!({"method": "lmp", "date": "", "as_of": "2024-05-01"}), "INVALID_DATE_INPUT")]
#[case(json!({"method": "lmp", "date": "2024-02-30", "as_of": "2024-05-01"}), "INVALID_DATE_INPUT")]
#[case(json!({"method": "lmp", "date": "2024-01-01", "cycle_length_days": 60, "as_of": "2024-05-01"}), "INVALID_CYCLE_PARAMETERS")]
#[tokio::test]
async fn test_pregnancy_rejections(#[case] body: serde_json::Value, #[case] code: &str) {
    let app = common::TestApp::new();

    let (status, response) = app.post_json("/api/v1/calculators/pregnancy", &body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response["error"]["code"], code);
}

#[tokio::test]
async fn test_pregnancy_before_lmp_returns_dates_without_progress() {
    let app = common::TestApp::new();
    let body = json!({"method": "due_date", "date": "2027-08-01", "as_of": "2026-10-14"});

    let (status, response) = app.post_json("/api/v1/calculators/pregnancy", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["lmp_date"]["date"], "2026-10-25");
    assert!(response["gestational_age"].is_null());
    assert!(response["trimester"].is_null());
    assert!(response["progress_percentage"].is_null());
    assert_eq!(response["days_until_due"], 291);
}

#[tokio::test]
async fn test_pregnancy_from_birth_date_has_no_progress() {
    let app = common::TestApp::new();
    let body = json!({"method": "birth_date", "date": "2020-05-01", "as_of": "2026-10-14"});

    let (status, response) = app.post_json("/api/v1/calculators/pregnancy", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["is_approximation"], true);
    assert!(response["gestational_age"].is_null());
    assert!(response["days_until_due"].is_null());
}

// ============================================================================
// Ovulation and Period
// ============================================================================

#[tokio::test]
async fn test_ovulation_defaults() {
    let app = common::TestApp::new();
    let body = json!({
        "last_period_date": "2024-03-01",
        "as_of": "2024-03-13"
    });

    let (status, response) = app.post_json("/api/v1/calculators/ovulation", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["ovulation_date"]["date"], "2024-03-15");
    assert_eq!(response["fertile_window"]["start"]["date"], "2024-03-10");
    assert_eq!(response["fertile_window"]["end"]["date"], "2024-03-15");
    assert_eq!(response["next_period"]["date"], "2024-03-29");
    assert_eq!(response["phase"], "follicular");
    assert_eq!(response["currently_fertile"], true);
    assert_eq!(response["upcoming_cycles"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_ovulation_rejects_luteal_longer_than_cycle() {
    let app = common::TestApp::new();
    let body = json!({
        "last_period_date": "2024-03-01",
        "cycle_length_days": 21,
        "luteal_phase_days": 25
    });

    let (status, response) = app.post_json("/api/v1/calculators/ovulation", &body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response["error"]["code"], "INVALID_CYCLE_PARAMETERS");
}

#[tokio::test]
async fn test_period_forecast() {
    let app = common::TestApp::new();
    let body = json!({
        "last_period_date": "2024-01-01",
        "cycles_to_predict": 4,
        "as_of": "2024-02-10"
    });

    let (status, response) = app.post_json("/api/v1/calculators/period", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["next_period_start"]["date"], "2024-02-26");
    assert_eq!(response["days_until_next_period"], 16);
    let forecasts = response["forecasts"].as_array().unwrap();
    assert_eq!(forecasts.len(), 4);
    assert_eq!(forecasts[1]["period_start"]["date"], "2024-03-25");
}

#[tokio::test]
async fn test_period_cycle_count_out_of_bounds_is_validation_error() {
    let app = common::TestApp::new();
    let body = json!({
        "last_period_date": "2024-01-01",
        "cycles_to_predict": 24
    });

    let (status, response) = app.post_json("/api/v1/calculators/period", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(response["error"]["field"], "cycles_to_predict");
}

#[tokio::test]
async fn test_wider_configured_cycle_bounds() {
    let mut config = common::test_config();
    config.calculators.max_cycle_length_days = 45;
    let app = common::TestApp::with_config(config);
    let body = json!({
        "last_period_date": "2024-01-01",
        "cycle_length_days": 40,
        "as_of": "2024-01-05"
    });

    let (status, response) = app.post_json("/api/v1/calculators/ovulation", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["ovulation_date"]["date"], "2024-01-27");
}

// ============================================================================
// Weight Gain and BSA
// ============================================================================

#[tokio::test]
async fn test_weight_gain_metric() {
    let app = common::TestApp::new();
    let body = json!({
        "pre_pregnancy_weight": 60,
        "current_weight": "64",
        "weight_unit": "kg",
        "height": {"unit": "cm", "value": 165},
        "gestational_weeks": 20
    });

    let (status, response) = app.post_json("/api/v1/calculators/weight-gain", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["bmi_category"], "normal");
    assert_eq!(response["pre_pregnancy_bmi"], 22.0);
    assert_eq!(response["status"], "within_range");
    assert_eq!(response["remaining_weeks"], 20);
    assert_eq!(response["current_gain"], 4.0);
}

#[tokio::test]
async fn test_weight_gain_rejects_zero_height() {
    let app = common::TestApp::new();
    let body = json!({
        "pre_pregnancy_weight": 60,
        "current_weight": 64,
        "height": {"unit": "cm", "value": 0},
        "gestational_weeks": 20
    });

    let (status, response) = app.post_json("/api/v1/calculators/weight-gain", &body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response["error"]["code"], "INVALID_MEASUREMENT");
}

#[rstest]
#[case(json!({"unit": "cm", "value": "abc"}))]
#[case(json!({"unit": "feet_inches", "feet": "5", "inches": ""}))]
#[tokio::test]
async fn test_bsa_rejects_non_numeric_height_text(#[case] height: serde_json::Value) {
    let app = common::TestApp::new();
    let body = json!({"weight": 70, "height": height});

    let (status, response) = app.post_json("/api/v1/calculators/bsa", &body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response["error"]["code"], "INVALID_MEASUREMENT");
}

#[tokio::test]
async fn test_bsa_accepts_height_as_form_text() {
    let app = common::TestApp::new();
    let body = json!({"weight": "70", "height": {"unit": "cm", "value": "170"}});

    let (status, response) = app.post_json("/api/v1/calculators/bsa", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["height_cm"], 170.0);
}

#[tokio::test]
async fn test_bsa_reference_adult() {
    let app = common::TestApp::new();
    let body = json!({
        "weight": 70,
        "height": {"unit": "cm", "value": 170},
        "age_years": 35,
        "sex": "male"
    });

    let (status, response) = app.post_json("/api/v1/calculators/bsa", &body).await;

    assert_eq!(status, StatusCode::OK);
    let results = response["results"].as_array().unwrap();
    assert_eq!(results.len(), 5);
    assert_eq!(results[0]["formula"], "du_bois");
    assert_eq!(results[0]["value_m2"], 1.81);
    assert_eq!(response["recommended_formula"], "mosteller");
    assert_eq!(response["classification"]["category"], "normal");
}

#[tokio::test]
async fn test_bsa_negative_age_is_validation_error() {
    let app = common::TestApp::new();
    let body = json!({
        "weight": 70,
        "height": {"unit": "cm", "value": 170},
        "age_years": -1
    });

    let (status, response) = app.post_json("/api/v1/calculators/bsa", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["field"], "age_years");
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let app = common::TestApp::new();

    let (status, _) = app.post("/api/v1/calculators/bsa", "{not json").await;

    assert!(status.is_client_error());
}
