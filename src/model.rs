//! OLS model fitting over the panel: target regressed on a chosen subset of
//! independent variables, plus an intercept.
//!
//! The fitter always returns something renderable. A fit that cannot be
//! solved (empty variable list, exact collinearity in the chosen subset, or
//! fewer regions than parameters) comes back as [`FitOutcome::Degenerate`]
//! with zeroed coefficients rather than as an error; callers handle the
//! degenerate case by type.

use faer::{Col, Mat};
use serde::Serialize;

use crate::dataset::Dataset;
use crate::error::AnalysisError;
use crate::impute::impute;
use crate::ols::{self, OlsError};

/// One named slope coefficient of a fitted model.
#[derive(Debug, Clone, Serialize)]
pub struct Coefficient {
    /// Independent-variable name.
    pub name: String,
    /// Estimated β.
    pub value: f64,
}

/// Observed vs. predicted target for one region.
#[derive(Debug, Clone, Serialize)]
pub struct RegionFit {
    /// Region label.
    pub region: String,
    /// Observed target value (after imputation).
    pub observed: f64,
    /// Model prediction for the region.
    pub predicted: f64,
}

/// A fitted (or fallback) regression model.
///
/// Created fresh per fit request and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct FittedModel {
    /// Intercept term.
    pub intercept: f64,
    /// Slope coefficients, in the order the variables were requested.
    pub coefficients: Vec<Coefficient>,
    /// Coefficient of determination in `[0, 1]`.
    pub r_squared: f64,
    /// R² adjusted for degrees of freedom.
    pub adj_r_squared: f64,
    /// Standard error of the regression.
    pub rmse: f64,
    /// F-statistic for overall significance.
    pub f_statistic: f64,
    /// P-value of the F-statistic.
    pub f_pvalue: f64,
    /// Per-region observed and predicted target values.
    pub fitted: Vec<RegionFit>,
}

impl FittedModel {
    /// Look up a slope coefficient by variable name.
    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.coefficients
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value)
    }
}

/// Result of a fit request: either a converged model or a well-formed
/// zero-filled fallback.
#[derive(Debug, Clone, Serialize)]
pub enum FitOutcome {
    /// The least-squares problem was solved.
    Converged(FittedModel),
    /// The fit was degenerate; all coefficients, R², and predictions are 0.
    Degenerate(FittedModel),
}

impl FitOutcome {
    /// The model, converged or fallback.
    pub fn model(&self) -> &FittedModel {
        match self {
            FitOutcome::Converged(m) | FitOutcome::Degenerate(m) => m,
        }
    }

    /// Consume the outcome, yielding the model.
    pub fn into_model(self) -> FittedModel {
        match self {
            FitOutcome::Converged(m) | FitOutcome::Degenerate(m) => m,
        }
    }

    /// Whether this is the zero-filled fallback.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, FitOutcome::Degenerate(_))
    }
}

/// Fit `target = intercept + Σ βᵢ·xᵢ` over the chosen variables.
///
/// Non-finite values in the chosen variables and the target are mean-imputed
/// before the solve. Deterministic: the same dataset and variable selection
/// always produce bit-identical coefficients.
///
/// # Errors
///
/// - [`AnalysisError::Data`] if the dataset is empty or a field is unknown
/// - [`AnalysisError::Computation`] on an internal shape fault (mismatched
///   row counts between design and target)
///
/// Rank deficiency and an underdetermined panel (fewer regions than
/// parameters) are not errors; both yield [`FitOutcome::Degenerate`].
pub fn fit_model(
    dataset: &Dataset,
    target: &str,
    variables: &[&str],
) -> Result<FitOutcome, AnalysisError> {
    let mut fields: Vec<&str> = variables.to_vec();
    fields.push(target);

    let imputed = impute(dataset, &fields)?;
    let observed = imputed.column(target)?;
    let labels: Vec<String> = imputed.regions().map(String::from).collect();

    if variables.is_empty() {
        return Ok(FitOutcome::Degenerate(fallback(variables, &labels, &observed)));
    }

    let columns: Vec<Vec<f64>> = variables
        .iter()
        .map(|&v| imputed.column(v))
        .collect::<Result<_, _>>()?;

    let n = observed.len();
    let x = Mat::from_fn(n, variables.len(), |i, j| columns[j][i]);
    let y = Col::from_fn(n, |i| observed[i]);

    match ols::fit(&x, &y) {
        Ok(solved) => {
            let coefficients = variables
                .iter()
                .enumerate()
                .map(|(j, &name)| Coefficient {
                    name: name.to_string(),
                    value: solved.coefficients[j],
                })
                .collect();

            let fitted = labels
                .iter()
                .enumerate()
                .map(|(i, region)| RegionFit {
                    region: region.clone(),
                    observed: observed[i],
                    predicted: solved.fitted_values[i],
                })
                .collect();

            Ok(FitOutcome::Converged(FittedModel {
                intercept: solved.intercept,
                coefficients,
                r_squared: solved.r_squared,
                adj_r_squared: solved.adj_r_squared,
                rmse: solved.rmse,
                f_statistic: solved.f_statistic,
                f_pvalue: solved.f_pvalue,
                fitted,
            }))
        }
        Err(OlsError::RankDeficient { .. } | OlsError::InsufficientObservations { .. }) => {
            Ok(FitOutcome::Degenerate(fallback(variables, &labels, &observed)))
        }
        Err(fault @ OlsError::DimensionMismatch { .. }) => {
            Err(AnalysisError::Computation(fault))
        }
    }
}

/// Zero-filled fallback model: renderable, never a fault.
fn fallback(variables: &[&str], labels: &[String], observed: &[f64]) -> FittedModel {
    FittedModel {
        intercept: 0.0,
        coefficients: variables
            .iter()
            .map(|&name| Coefficient {
                name: name.to_string(),
                value: 0.0,
            })
            .collect(),
        r_squared: 0.0,
        adj_r_squared: 0.0,
        rmse: 0.0,
        f_statistic: 0.0,
        f_pvalue: 1.0,
        fitted: labels
            .iter()
            .zip(observed)
            .map(|(region, &obs)| RegionFit {
                region: region.clone(),
                observed: obs,
                predicted: 0.0,
            })
            .collect(),
    }
}
