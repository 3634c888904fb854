//! Pairwise Pearson correlation matrix.
//!
//! Works on the raw, non-imputed dataset: a row enters a pair's computation
//! only if both values are finite (pairwise-complete observations). Entries
//! are rounded to three decimals for presentation.

use serde::Serialize;

use crate::dataset::{DataError, Dataset};

/// Symmetric correlation matrix over a fixed field list.
///
/// The diagonal is exactly 1.0. Entries that are undefined (fewer than two
/// complete pairs, or a zero-variance field) are `NaN`.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    fields: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Field names, in the order the matrix was requested.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// The full matrix, row-major in field order.
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Correlation between two fields by name.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.fields.iter().position(|f| f == a)?;
        let j = self.fields.iter().position(|f| f == b)?;
        Some(self.values[i][j])
    }
}

/// Compute the pairwise Pearson correlation matrix over `fields`.
///
/// # Errors
///
/// [`DataError::UnknownField`] if any field is not in the dataset.
pub fn correlation_matrix(
    dataset: &Dataset,
    fields: &[&str],
) -> Result<CorrelationMatrix, DataError> {
    let columns: Vec<Vec<f64>> = fields
        .iter()
        .map(|&f| dataset.column(f))
        .collect::<Result<_, _>>()?;

    let k = fields.len();
    let mut values = vec![vec![0.0_f64; k]; k];

    for i in 0..k {
        values[i][i] = 1.0;
        for j in (i + 1)..k {
            let r = round3(pairwise_pearson(&columns[i], &columns[j]));
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        fields: fields.iter().map(|&f| f.to_string()).collect(),
        values,
    })
}

/// Pearson correlation over rows where both values are finite.
fn pairwise_pearson(a: &[f64], b: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| (x, y))
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for &(x, y) in &pairs {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a <= 0.0 || var_b <= 0.0 {
        return f64::NAN;
    }

    (cov / (var_a * var_b).sqrt()).clamp(-1.0, 1.0)
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;
    use approx::assert_relative_eq;

    fn dataset_from_columns(columns: &[(&str, &[f64])]) -> Dataset {
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
    fn test_diagonal_is_one() {
        let ds = dataset_from_columns(&[
            ("a", &[1.0, 2.0, 3.0, 4.0]),
            ("b", &[4.0, 1.0, 3.0, 2.0]),
        ]);
        let m = correlation_matrix(&ds, &["a", "b"]).unwrap();

        assert_eq!(m.get("a", "a"), Some(1.0));
        assert_eq!(m.get("b", "b"), Some(1.0));
    }

    #[test]
    fn test_symmetry() {
        let ds = dataset_from_columns(&[
            ("a", &[1.0, 2.0, 3.0, 5.0, 8.0]),
            ("b", &[2.0, 1.0, 4.0, 3.0, 7.0]),
            ("c", &[9.0, 4.0, 1.0, 0.0, 2.0]),
        ]);
        let m = correlation_matrix(&ds, &["a", "b", "c"]).unwrap();

        for x in ["a", "b", "c"] {
            for y in ["a", "b", "c"] {
                assert_eq!(m.get(x, y), m.get(y, x));
            }
        }
    }

    #[test]
    fn test_exact_linear_transform_is_one() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b: Vec<f64> = a.iter().map(|x| 2.0 * x).collect();
        let ds = dataset_from_columns(&[("a", &a), ("b", &b)]);
        let m = correlation_matrix(&ds, &["a", "b"]).unwrap();

        assert_relative_eq!(m.get("a", "b").unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_correlation() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [4.0, 3.0, 2.0, 1.0];
        let ds = dataset_from_columns(&[("a", &a), ("b", &b)]);
        let m = correlation_matrix(&ds, &["a", "b"]).unwrap();

        assert_relative_eq!(m.get("a", "b").unwrap(), -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pairwise_complete_excludes_nan_rows() {
        // Row 2 is incomplete for the (a, b) pair and must not poison it.
        let ds = dataset_from_columns(&[
            ("a", &[1.0, 2.0, f64::NAN, 4.0]),
            ("b", &[2.0, 4.0, 100.0, 8.0]),
        ]);
        let m = correlation_matrix(&ds, &["a", "b"]).unwrap();

        assert_relative_eq!(m.get("a", "b").unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_variance_is_nan() {
        let ds = dataset_from_columns(&[
            ("a", &[3.0, 3.0, 3.0]),
            ("b", &[1.0, 2.0, 3.0]),
        ]);
        let m = correlation_matrix(&ds, &["a", "b"]).unwrap();

        assert!(m.get("a", "b").unwrap().is_nan());
    }

    #[test]
    fn test_rounding_to_three_decimals() {
        let ds = dataset_from_columns(&[
            ("a", &[1.0, 2.0, 3.0, 4.0, 5.0]),
            ("b", &[1.1, 1.9, 3.3, 3.8, 5.2]),
        ]);
        let m = correlation_matrix(&ds, &["a", "b"]).unwrap();

        let r = m.get("a", "b").unwrap();
        assert_relative_eq!(r, (r * 1000.0).round() / 1000.0, epsilon = 1e-12);
        assert!(r > 0.9 && r <= 1.0);
    }

    #[test]
    fn test_unknown_field() {
        let ds = dataset_from_columns(&[("a", &[1.0, 2.0])]);
        assert!(correlation_matrix(&ds, &["a", "z"]).is_err());
    }
}
