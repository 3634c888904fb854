//! Ordinary least squares engine.
//!
//! Solves `y = intercept + X·β` through a column-pivoted QR decomposition of
//! the centered design matrix. The intercept is always fit; callers that need
//! an intercept-only model pass a design matrix with zero columns.
//!
//! Rank deficiency is detected against a fixed tolerance and reported as an
//! error rather than silently dropping columns; the higher-level fitters
//! translate it into their fallback/sentinel policies.

use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use thiserror::Error;

/// Tolerance on the R diagonal for numerical rank determination.
pub(crate) const RANK_TOLERANCE: f64 = 1e-10;

/// Errors from the least-squares solve.
#[derive(Debug, Error)]
pub enum OlsError {
    /// Design matrix and target have different row counts.
    #[error("dimension mismatch: x has {x_rows} rows but y has {y_len} elements")]
    DimensionMismatch { x_rows: usize, y_len: usize },

    /// Not enough observations for the requested parameter count.
    #[error("insufficient observations: need at least {needed}, got {got}")]
    InsufficientObservations { needed: usize, got: usize },

    /// Exact collinearity: the design matrix does not have full column rank.
    #[error("design matrix is rank deficient: rank {rank} of {n_features} columns")]
    RankDeficient { rank: usize, n_features: usize },
}

/// A solved least-squares fit with goodness-of-fit statistics.
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// Slope coefficients, one per design-matrix column.
    pub coefficients: Col<f64>,
    /// Intercept term.
    pub intercept: f64,
    /// Predictions on the training rows.
    pub fitted_values: Col<f64>,
    /// `y - fitted_values`.
    pub residuals: Col<f64>,
    /// Coefficient of determination, clamped to `[0, 1]`.
    pub r_squared: f64,
    /// R² adjusted for degrees of freedom (`NaN` on an exact fit).
    pub adj_r_squared: f64,
    /// Standard error of the regression (`NaN` on an exact fit).
    pub rmse: f64,
    /// F-statistic for overall model significance (`NaN` when undefined).
    pub f_statistic: f64,
    /// P-value of the F-statistic (`NaN` when undefined).
    pub f_pvalue: f64,
}

/// Fit `y = intercept + X·β` by column-pivoted QR.
///
/// # Errors
///
/// See [`OlsError`]. A zero-column `x` is legal and yields the intercept-only
/// (mean) model.
pub fn fit(x: &Mat<f64>, y: &Col<f64>) -> Result<OlsFit, OlsError> {
    let n = x.nrows();
    let p = x.ncols();

    if n != y.nrows() {
        return Err(OlsError::DimensionMismatch {
            x_rows: n,
            y_len: y.nrows(),
        });
    }

    let n_params = p + 1;
    if n < 2 || n < n_params {
        return Err(OlsError::InsufficientObservations {
            needed: n_params.max(2),
            got: n,
        });
    }

    if p == 0 {
        let intercept = y.iter().sum::<f64>() / n as f64;
        let fitted_values = Col::from_fn(n, |_| intercept);
        let residuals = Col::from_fn(n, |i| y[i] - intercept);
        return Ok(finish(
            Col::zeros(0),
            intercept,
            fitted_values,
            residuals,
            y,
            n_params,
        ));
    }

    // Center so the intercept drops out of the decomposition.
    let (x_centered, x_means) = center_columns(x);
    let (y_centered, y_mean) = center_vector(y);

    let coefficients = solve_centered(&x_centered, &y_centered)?;

    let mut intercept = y_mean;
    for j in 0..p {
        intercept -= x_means[j] * coefficients[j];
    }

    let mut fitted_values = Col::zeros(n);
    let mut residuals = Col::zeros(n);
    for i in 0..n {
        let mut pred = intercept;
        for j in 0..p {
            pred += x[(i, j)] * coefficients[j];
        }
        fitted_values[i] = pred;
        residuals[i] = y[i] - pred;
    }

    Ok(finish(
        coefficients,
        intercept,
        fitted_values,
        residuals,
        y,
        n_params,
    ))
}

/// Solve the centered system, requiring full column rank.
fn solve_centered(x: &Mat<f64>, y: &Col<f64>) -> Result<Col<f64>, OlsError> {
    let p = x.ncols();
    let n = x.nrows();

    let qr = x.col_piv_qr();
    let q = qr.compute_Q();
    let r = qr.R();
    let perm = qr.P();
    let perm_arr = perm.arrays().0;

    let mut rank = 0;
    for i in 0..p.min(n) {
        if r[(i, i)].abs() > RANK_TOLERANCE {
            rank += 1;
        } else {
            break;
        }
    }

    if rank < p {
        return Err(OlsError::RankDeficient {
            rank,
            n_features: p,
        });
    }

    let qty = q.transpose() * y;

    // Back-substitution on the upper triangular system.
    let mut beta_perm = Col::zeros(p);
    for i in (0..p).rev() {
        let mut sum = qty[i];
        for j in (i + 1)..p {
            sum -= r[(i, j)] * beta_perm[j];
        }
        beta_perm[i] = sum / r[(i, i)];
    }

    // Map back to original column order.
    let coefficients = Col::from_fn(p, |j| beta_perm[perm_arr[j]]);

    Ok(coefficients)
}

/// Assemble goodness-of-fit statistics.
fn finish(
    coefficients: Col<f64>,
    intercept: f64,
    fitted_values: Col<f64>,
    residuals: Col<f64>,
    y: &Col<f64>,
    n_params: usize,
) -> OlsFit {
    let n = y.nrows();

    let y_mean: f64 = y.iter().sum::<f64>() / n as f64;
    let tss: f64 = y.iter().map(|&yi| (yi - y_mean).powi(2)).sum();
    let rss: f64 = residuals.iter().map(|&r| r.powi(2)).sum();

    let r_squared = if tss > 0.0 {
        (1.0 - rss / tss).clamp(0.0, 1.0)
    } else if rss < 1e-10 {
        1.0
    } else {
        0.0
    };

    let df_total = (n - 1) as f64;
    let df_resid = (n - n_params) as f64;
    let adj_r_squared = if df_resid > 0.0 && df_total > 0.0 {
        1.0 - (1.0 - r_squared) * df_total / df_resid
    } else {
        f64::NAN
    };

    let mse = if df_resid > 0.0 { rss / df_resid } else { f64::NAN };
    let rmse = mse.sqrt();

    let ess = tss - rss;
    let df_model = (n_params - 1) as f64;
    let f_statistic = if df_model > 0.0 && df_resid > 0.0 && mse > 0.0 {
        (ess / df_model) / mse
    } else {
        f64::NAN
    };

    let f_pvalue = if f_statistic.is_finite() && df_model > 0.0 && df_resid > 0.0 {
        let f_dist = FisherSnedecor::new(df_model, df_resid).ok();
        f_dist.map_or(f64::NAN, |d| 1.0 - d.cdf(f_statistic))
    } else {
        f64::NAN
    };

    OlsFit {
        coefficients,
        intercept,
        fitted_values,
        residuals,
        r_squared,
        adj_r_squared,
        rmse,
        f_statistic,
        f_pvalue,
    }
}

/// Center a matrix by subtracting column means.
fn center_columns(x: &Mat<f64>) -> (Mat<f64>, Col<f64>) {
    let n = x.nrows();
    let p = x.ncols();

    let mut means = Col::zeros(p);
    let mut centered = Mat::zeros(n, p);

    for j in 0..p {
        let sum: f64 = (0..n).map(|i| x[(i, j)]).sum();
        means[j] = sum / n as f64;
        for i in 0..n {
            centered[(i, j)] = x[(i, j)] - means[j];
        }
    }

    (centered, means)
}

/// Center a vector by subtracting the mean.
fn center_vector(y: &Col<f64>) -> (Col<f64>, f64) {
    let n = y.nrows();
    let mean: f64 = y.iter().sum::<f64>() / n as f64;
    (Col::from_fn(n, |i| y[i] - mean), mean)
}
