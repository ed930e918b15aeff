//! Body surface area
//!
//! Five published estimates from weight (kg) and height (cm). Each formula
//! result is rounded to three decimals once; the average and every
//! downstream figure is computed from the rounded values.

use crate::errors::{CalcError, CalcResult};
use crate::validation::require_positive_measurement;
use serde::{Deserialize, Serialize};

pub const PEDIATRIC_AGE_LIMIT_YEARS: f64 = 18.0;

// ============================================================================
// Formulas
// ============================================================================

/// Biological sex for normal-range lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiologicalSex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BsaFormula {
    DuBois,
    Mosteller,
    Haycock,
    GehanGeorge,
    Boyd,
}

impl BsaFormula {
    pub const ALL: [BsaFormula; 5] = [
        BsaFormula::DuBois,
        BsaFormula::Mosteller,
        BsaFormula::Haycock,
        BsaFormula::GehanGeorge,
        BsaFormula::Boyd,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BsaFormula::DuBois => "DuBois (1916)",
            BsaFormula::Mosteller => "Mosteller (1987)",
            BsaFormula::Haycock => "Haycock (1978)",
            BsaFormula::GehanGeorge => "Gehan & George (1970)",
            BsaFormula::Boyd => "Boyd (1935)",
        }
    }

    /// Raw, unrounded estimate in m²
    fn evaluate(&self, weight_kg: f64, height_cm: f64) -> f64 {
        match self {
            BsaFormula::DuBois => 0.007184 * weight_kg.powf(0.425) * height_cm.powf(0.725),
            BsaFormula::Mosteller => (weight_kg * height_cm / 3600.0).sqrt(),
            BsaFormula::Haycock => 0.024265 * weight_kg.powf(0.5378) * height_cm.powf(0.3964),
            BsaFormula::GehanGeorge => 0.0235 * weight_kg.powf(0.51456) * height_cm.powf(0.42246),
            BsaFormula::Boyd => {
                let grams = weight_kg * 1000.0;
                0.0003207 * grams.powf(0.7285 - 0.0188 * grams.log10()) * height_cm.powf(0.3)
            }
        }
    }

    /// Whether the formula contributes to [`average_of`]
    pub fn in_average(&self) -> bool {
        !matches!(self, BsaFormula::Boyd)
    }
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BsaResult {
    pub formula: BsaFormula,
    pub value_m2: f64,
}

/// BSA in m², rounded to three decimals
pub fn compute(formula: BsaFormula, weight_kg: f64, height_cm: f64) -> CalcResult<BsaResult> {
    let weight_kg = require_positive_measurement("weight", weight_kg)?;
    let height_cm = require_positive_measurement("height", height_cm)?;

    let value = formula.evaluate(weight_kg, height_cm);
    if !value.is_finite() {
        return Err(CalcError::OutOfDomainResult(format!(
            "{} produced no finite value",
            formula.name()
        )));
    }
    Ok(BsaResult {
        formula,
        value_m2: round3(value),
    })
}

pub fn compute_all(weight_kg: f64, height_cm: f64) -> CalcResult<Vec<BsaResult>> {
    BsaFormula::ALL
        .iter()
        .map(|formula| compute(*formula, weight_kg, height_cm))
        .collect()
}

/// Mean of DuBois, Mosteller, Haycock and Gehan-George, rounded to three decimals
pub fn average_of(results: &[BsaResult]) -> CalcResult<f64> {
    let values: Vec<f64> = results
        .iter()
        .filter(|result| result.formula.in_average())
        .map(|result| result.value_m2)
        .collect();
    if values.is_empty() {
        return Err(CalcError::OutOfDomainResult(
            "no formula results to average".to_string(),
        ));
    }
    Ok(round3(values.iter().sum::<f64>() / values.len() as f64))
}

/// Haycock for children, Mosteller for adults
pub fn recommended_formula(age_years: Option<f64>) -> BsaFormula {
    match age_years {
        Some(age) if age < PEDIATRIC_AGE_LIMIT_YEARS => BsaFormula::Haycock,
        _ => BsaFormula::Mosteller,
    }
}

// ============================================================================
// Classification
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BsaCategory {
    Small,
    Normal,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalRange {
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BsaClassification {
    pub category: BsaCategory,
    pub normal_range: NormalRange,
    pub pediatric: bool,
}

/// Normal adult and pediatric bands in m²
pub fn normal_range(age_years: f64, sex: Option<BiologicalSex>) -> CalcResult<NormalRange> {
    if !age_years.is_finite() || age_years < 0.0 {
        return Err(CalcError::OutOfDomainResult(format!(
            "age {} is not a valid age",
            age_years
        )));
    }
    if age_years < PEDIATRIC_AGE_LIMIT_YEARS {
        return Ok(NormalRange { low: 0.5, high: 1.8 });
    }
    match sex {
        Some(BiologicalSex::Male) => Ok(NormalRange { low: 1.6, high: 2.2 }),
        Some(BiologicalSex::Female) => Ok(NormalRange { low: 1.4, high: 2.0 }),
        None => Err(CalcError::OutOfDomainResult(
            "adult classification needs biological sex".to_string(),
        )),
    }
}

pub fn classify(bsa_m2: f64, age_years: f64, sex: Option<BiologicalSex>) -> CalcResult<BsaClassification> {
    if !bsa_m2.is_finite() {
        return Err(CalcError::OutOfDomainResult(
            "body surface area is not a finite value".to_string(),
        ));
    }
    let range = normal_range(age_years, sex)?;
    let category = if bsa_m2 < range.low {
        BsaCategory::Small
    } else if bsa_m2 <= range.high {
        BsaCategory::Normal
    } else {
        BsaCategory::Large
    };
    Ok(BsaClassification {
        category,
        normal_range: range,
        pediatric: age_years < PEDIATRIC_AGE_LIMIT_YEARS,
    })
}

// ============================================================================
// Analysis
// ============================================================================

/// Every formula plus derived body-size ratios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BsaAnalysis {
    pub results: Vec<BsaResult>,
    pub average_m2: f64,
    /// The formula the ratios and classification are based on
    pub primary: BsaResult,
    pub recommended_formula: BsaFormula,
    pub classification: Option<BsaClassification>,
    pub bmi: f64,
    /// kg per m²
    pub weight_to_bsa_ratio: f64,
    /// m per m²
    pub height_to_bsa_ratio: f64,
}

/// Run all formulas; classify only when an age is known
pub fn analyze(
    weight_kg: f64,
    height_cm: f64,
    age_years: Option<f64>,
    sex: Option<BiologicalSex>,
    preferred: Option<BsaFormula>,
) -> CalcResult<BsaAnalysis> {
    let results = compute_all(weight_kg, height_cm)?;
    let average_m2 = average_of(&results)?;
    let recommended = recommended_formula(age_years);
    let primary_formula = preferred.unwrap_or(recommended);

    let primary = results
        .iter()
        .copied()
        .find(|result| result.formula == primary_formula)
        .ok_or_else(|| CalcError::OutOfDomainResult(format!("{} missing", primary_formula.name())))?;

    let classification = match age_years {
        Some(age) => Some(classify(primary.value_m2, age, sex)?),
        None => None,
    };

    let height_m = height_cm / 100.0;
    Ok(BsaAnalysis {
        results,
        average_m2,
        primary,
        recommended_formula: recommended,
        classification,
        bmi: weight_kg / (height_m * height_m),
        weight_to_bsa_ratio: weight_kg / primary.value_m2,
        height_to_bsa_ratio: height_m / primary.value_m2,
    })
}
