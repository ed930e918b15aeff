//! Error types for the calculator core

use thiserror::Error;

/// Errors raised by the calculation core
///
/// Every public calculator returns one of these instead of a sentinel
/// (`NaN`, an invalid date, a silently substituted default).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// Unparseable or missing date string
    #[error("Invalid date input: {0}")]
    InvalidDateInput(String),

    /// Non-positive or non-numeric weight/height (or other measured value)
    #[error("Invalid measurement: {0}")]
    InvalidMeasurement(String),

    /// Luteal phase >= cycle length, or lengths outside their bounds
    #[error("Invalid cycle parameters: {0}")]
    InvalidCycleParameters(String),

    /// Computation has no meaningful answer for these inputs
    #[error("Result out of domain: {0}")]
    OutOfDomainResult(String),
}

impl CalcError {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            CalcError::InvalidDateInput(_) => "INVALID_DATE_INPUT",
            CalcError::InvalidMeasurement(_) => "INVALID_MEASUREMENT",
            CalcError::InvalidCycleParameters(_) => "INVALID_CYCLE_PARAMETERS",
            CalcError::OutOfDomainResult(_) => "OUT_OF_DOMAIN",
        }
    }
}

/// Result alias used throughout the calculator core
pub type CalcResult<T> = Result<T, CalcError>;
