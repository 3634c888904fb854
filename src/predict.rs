//! Point prediction from fitted coefficients.
//!
//! Pure function of the model and the supplied feature values; the model is
//! never mutated and no state is carried between calls.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{Coefficient, FittedModel};

/// A point prediction with the coefficients and R² echoed for transparency.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// `intercept + Σ coefficients[v] · values[v]`.
    pub value: f64,
    /// Intercept used in the computation.
    pub intercept: f64,
    /// Coefficients of the model, echoed back.
    pub coefficients: Vec<Coefficient>,
    /// R² of the model, echoed back.
    pub r_squared: f64,
    /// Coefficient variables the caller supplied no value for.
    ///
    /// Each contributed 0 to the prediction. Callers that consider an
    /// incomplete request malformed should reject when this is non-empty.
    pub missing_inputs: Vec<String>,
}

/// Apply a fitted model's coefficients to a feature-value mapping.
///
/// Variables absent from `values` contribute 0 and are reported in
/// [`Prediction::missing_inputs`]; values for variables the model has no
/// coefficient for are ignored.
pub fn predict(model: &FittedModel, values: &BTreeMap<String, f64>) -> Prediction {
    let mut value = model.intercept;
    let mut missing_inputs = Vec::new();

    for coefficient in &model.coefficients {
        match values.get(&coefficient.name) {
            Some(&v) => value += coefficient.value * v,
            None => missing_inputs.push(coefficient.name.clone()),
        }
    }

    Prediction {
        value,
        intercept: model.intercept,
        coefficients: model.coefficients.clone(),
        r_squared: model.r_squared,
        missing_inputs,
    }
}
