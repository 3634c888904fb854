//! Variance Inflation Factor diagnostics.
//!
//! For each candidate independent variable `v`, an auxiliary regression of
//! `v` on the remaining candidates (plus intercept) quantifies how well the
//! rest of the set linearly predicts `v`:
//!
//! `VIF_v = 1 / (1 - R²_v)`
//!
//! - VIF ≈ 1: `v` carries independent information
//! - VIF above 5 to 10: problematic multicollinearity
//!
//! Degenerate diagnostics (perfect collinearity dividing by zero, or an
//! auxiliary fit that fails outright) substitute [`DEGENERATE_VIF`] instead
//! of propagating a fault: severe multicollinearity is flagged, not crashed
//! on.

use serde::Serialize;

use faer::{Col, Mat};

use crate::dataset::Dataset;
use crate::error::AnalysisError;
use crate::impute::impute;
use crate::ols;

/// Sentinel reported when a VIF diagnostic is numerically degenerate.
///
/// The exact magnitude is arbitrary; it only needs to dwarf every ordinary
/// VIF so degenerate variables sort last in "least collinear" selection.
pub const DEGENERATE_VIF: f64 = 999.0;

/// `1 - R²` below this is treated as division by zero.
const UNIT_R_SQUARED_TOLERANCE: f64 = 1e-12;

/// VIF for a single candidate variable.
#[derive(Debug, Clone, Serialize)]
pub struct VifEntry {
    /// Variable name.
    pub field: String,
    /// Variance inflation factor, `>= 1`, or [`DEGENERATE_VIF`].
    pub vif: f64,
}

/// VIF diagnostics for a candidate set, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct VifReport {
    entries: Vec<VifEntry>,
}

impl VifReport {
    /// The entries, preserving the order the candidates were supplied in.
    pub fn entries(&self) -> &[VifEntry] {
        &self.entries
    }

    /// VIF for one variable by name.
    pub fn get(&self, field: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.vif)
    }

    /// Entries sorted ascending by VIF. Ties keep input order.
    pub fn sorted_ascending(&self) -> Vec<&VifEntry> {
        let mut sorted: Vec<&VifEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.vif.partial_cmp(&b.vif).unwrap_or(std::cmp::Ordering::Equal));
        sorted
    }

    /// The `k` least collinear variable names, ascending by VIF.
    pub fn least_collinear(&self, k: usize) -> Vec<&str> {
        self.sorted_ascending()
            .into_iter()
            .take(k)
            .map(|e| e.field.as_str())
            .collect()
    }
}

/// Compute the VIF for each variable in `variables`.
///
/// The candidate set is mean-imputed once, then each variable is regressed on
/// the rest. A singleton candidate set has nothing to be collinear with and
/// reports 1.0.
///
/// # Errors
///
/// [`AnalysisError::Data`] if the dataset is empty or a variable is unknown.
/// Auxiliary-fit failures never surface; they become [`DEGENERATE_VIF`].
pub fn vif_report(dataset: &Dataset, variables: &[&str]) -> Result<VifReport, AnalysisError> {
    let imputed = impute(dataset, variables)?;

    let columns: Vec<Vec<f64>> = variables
        .iter()
        .map(|&v| imputed.column(v))
        .collect::<Result<_, _>>()?;

    let n = imputed.len();
    let entries = variables
        .iter()
        .enumerate()
        .map(|(target, &field)| {
            let others: Vec<usize> = (0..variables.len()).filter(|&j| j != target).collect();

            let x = Mat::from_fn(n, others.len(), |i, j| columns[others[j]][i]);
            let y = Col::from_fn(n, |i| columns[target][i]);

            let vif = match ols::fit(&x, &y) {
                Ok(aux) => {
                    let remainder = 1.0 - aux.r_squared;
                    if remainder > UNIT_R_SQUARED_TOLERANCE {
                        (1.0 / remainder).max(1.0)
                    } else {
                        DEGENERATE_VIF
                    }
                }
                Err(_) => DEGENERATE_VIF,
            };

            VifEntry {
                field: field.to_string(),
                vif,
            }
        })
        .collect();

    Ok(VifReport { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;
    use approx::assert_relative_eq;

    fn panel(columns: &[(&str, &[f64])]) -> Dataset {
        let n = columns[0].1.len();
        let records = (0..n)
            .map(|i| {
                let values = columns
                    .iter()
                    .map(|&(name, col)| (name.to_string(), col[i]))
                    .collect();
                Record::new(format!("R{i}"), values)
            })
            .collect();
        Dataset::new(records).expect("valid dataset")
    }

    #[test]
    fn test_singleton_candidate_reports_one() {
        let ds = panel(&[("a", &[1.0, 2.0, 3.0, 4.0])]);
        let report = vif_report(&ds, &["a"]).unwrap();

        assert_relative_eq!(report.get("a").unwrap(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_exact_collinearity_hits_sentinel() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b: Vec<f64> = a.iter().map(|v| 2.0 * v).collect();
        let ds = panel(&[("a", &a), ("b", &b)]);

        let report = vif_report(&ds, &["a", "b"]).unwrap();
        assert!(report.get("a").unwrap() >= DEGENERATE_VIF);
        assert!(report.get("b").unwrap() >= DEGENERATE_VIF);
    }

    #[test]
    fn test_input_order_preserved() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 1.0, 4.0, 3.0, 6.0];
        let ds = panel(&[("a", &a), ("b", &b)]);

        let report = vif_report(&ds, &["b", "a"]).unwrap();
        assert_eq!(report.entries()[0].field, "b");
        assert_eq!(report.entries()[1].field, "a");
    }

    #[test]
    fn test_sorted_and_least_collinear() {
        // c is a near-copy of a; b is independent of both.
        let n = 40;
        let a: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let b: Vec<f64> = (0..n).map(|i| (i as f64 * 0.73).sin()).collect();
        let c: Vec<f64> = (0..n).map(|i| i as f64 + 0.001 * (i as f64).cos()).collect();
        let ds = panel(&[("a", &a), ("b", &b), ("c", &c)]);

        let report = vif_report(&ds, &["a", "b", "c"]).unwrap();
        let sorted = report.sorted_ascending();
        assert_eq!(sorted[0].field, "b");

        let pick = report.least_collinear(1);
        assert_eq!(pick, vec!["b"]);
    }

    #[test]
    fn test_imputes_before_diagnosing() {
        let a = [1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0];
        let b = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0];
        let ds = panel(&[("a", &a), ("b", &b)]);

        let report = vif_report(&ds, &["a", "b"]).unwrap();
        assert!(report.get("a").unwrap().is_finite());
        assert!(report.get("b").unwrap().is_finite());
    }

    #[test]
    fn test_unknown_variable_is_error() {
        let ds = panel(&[("a", &[1.0, 2.0])]);
        assert!(vif_report(&ds, &["a", "z"]).is_err());
    }
}
