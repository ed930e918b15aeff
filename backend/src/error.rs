//! Application error handling
//!
//! Converts calculator and request-shape errors into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use health_calc_shared::{CalcError, ErrorDetail, ErrorResponse};
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request fields outside their declared bounds
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// Input the calculators rejected
    #[error(transparent)]
    Calculation(#[from] CalcError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn field(&self) -> Option<String> {
        match self {
            ApiError::Validation(errors) => {
                let mut fields: Vec<String> =
                    errors.field_errors().keys().map(|key| key.to_string()).collect();
                fields.sort();
                fields.into_iter().next()
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let field = self.field();
        let (status, code, message) = match &self {
            ApiError::Validation(errors) => {
                warn!(error = %errors, "Rejected request shape");
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", errors.to_string())
            }
            ApiError::Calculation(err) => {
                warn!(code = err.code(), error = %err, "Rejected calculator input");
                (StatusCode::UNPROCESSABLE_ENTITY, err.code(), err.to_string())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
                details: None,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use validator::Validate;

    #[rstest]
    #[case(CalcError::InvalidDateInput("bad".into()))]
    #[case(CalcError::InvalidMeasurement("bad".into()))]
    #[case(CalcError::InvalidCycleParameters("bad".into()))]
    #[case(CalcError::OutOfDomainResult("bad".into()))]
    fn test_calc_errors_are_unprocessable(#[case] err: CalcError) {
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_validation_error_status() {
        #[derive(Validate)]
        struct Probe {
            #[validate(range(min = 1, max = 12))]
            count: u32,
        }
        let errors = Probe { count: 20 }.validate().unwrap_err();
        let error = ApiError::from(errors);
        assert_eq!(error.field().as_deref(), Some("count"));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_status() {
        let error = ApiError::NotFound("metrics disabled".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_error_status() {
        let error = ApiError::from(anyhow::anyhow!("boom"));
        assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
