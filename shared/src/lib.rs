//! Health Calculators Shared Library
//!
//! Pure date and formula calculators (pregnancy dating, ovulation, period
//! forecasting, pregnancy weight gain, body surface area) plus the request
//! and response types used by the backend and WASM crates.

pub mod bsa;
pub mod calculators;
pub mod cycle;
pub mod date_math;
pub mod errors;
pub mod pregnancy;
pub mod types;
pub mod units;
pub mod validation;
pub mod weight_gain;

// Re-export commonly used items
pub use calculators::{
    evaluate_bsa, evaluate_ovulation, evaluate_period, evaluate_pregnancy, evaluate_weight_gain,
    CalculatorSettings,
};
pub use date_math::{diff_days, CalendarDate};
pub use errors::*;
pub use types::*;
pub use units::{HeightMeasurement, WeightUnit};
pub use validation::FormNumber;
