//! Ordinary Least Squares (OLS) regression on a row-major design matrix.
//!
//! Shared by the linear meta-regressor and the lag-regression forecaster.

use crate::error::{ForecastError, Result};
use tracing::warn;

/// Ridge added to the normal-equation diagonal, relative to its mean.
const BASE_JITTER: f64 = 1e-10;

/// Number of times the jitter is escalated before giving up.
const MAX_JITTER_STEPS: usize = 6;

/// OLS regression coefficients and intercept.
#[derive(Debug, Clone, PartialEq)]
pub struct OLSResult {
    /// Regression coefficients (one per design column).
    pub coefficients: Vec<f64>,
    /// Intercept term (0.0 when fitted without intercept).
    pub intercept: f64,
}

impl OLSResult {
    /// Predict a single observation.
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.coefficients.len(),
                got: row.len(),
            });
        }
        Ok(self.intercept
            + row
                .iter()
                .zip(&self.coefficients)
                .map(|(x, b)| x * b)
                .sum::<f64>())
    }

    /// Predict every row of a design matrix.
    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.predict_row(row)).collect()
    }

    /// Get the number of regressors.
    pub fn num_regressors(&self) -> usize {
        self.coefficients.len()
    }
}

/// Fit `y = intercept + X @ coefficients` by least squares.
///
/// `rows` holds one observation per entry, each with the same number of
/// columns. The normal equations are solved with a Cholesky factorisation;
/// a small ridge is added when the system is singular (collinear columns).
pub fn ols_fit(rows: &[Vec<f64>], y: &[f64], fit_intercept: bool) -> Result<OLSResult> {
    let n = y.len();
    if n == 0 {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }
    if rows.len() != n {
        return Err(ForecastError::DimensionMismatch {
            expected: n,
            got: rows.len(),
        });
    }

    let k = rows[0].len();
    for row in rows {
        if row.len() != k {
            return Err(ForecastError::DimensionMismatch {
                expected: k,
                got: row.len(),
            });
        }
    }

    if k == 0 {
        let intercept = if fit_intercept {
            y.iter().sum::<f64>() / n as f64
        } else {
            0.0
        };
        return Ok(OLSResult {
            coefficients: vec![],
            intercept,
        });
    }

    // Design columns are [1, x1, x2, ...] with an intercept, [x1, x2, ...] without.
    let offset = usize::from(fit_intercept);
    let num_params = k + offset;

    let mut xtx = vec![vec![0.0; num_params]; num_params];
    let mut xty = vec![0.0; num_params];
    let mut full = vec![1.0; num_params];

    for (row, &y_obs) in rows.iter().zip(y) {
        full[offset..].copy_from_slice(row);
        for i in 0..num_params {
            xty[i] += full[i] * y_obs;
            for j in 0..=i {
                xtx[i][j] += full[i] * full[j];
            }
        }
    }
    for i in 0..num_params {
        for j in 0..i {
            xtx[j][i] = xtx[i][j];
        }
    }

    let beta = solve_with_jitter(&xtx, &xty).ok_or_else(|| {
        ForecastError::ComputationError(
            "OLS regression failed: normal equations are not positive definite".into(),
        )
    })?;

    let (intercept, coefficients) = if fit_intercept {
        (beta[0], beta[1..].to_vec())
    } else {
        (0.0, beta)
    };

    Ok(OLSResult {
        coefficients,
        intercept,
    })
}

/// Solve `A x = b`, escalating a diagonal ridge until `A` factorises.
fn solve_with_jitter(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let p = b.len();
    let mean_diag = (0..p).map(|i| a[i][i].abs()).sum::<f64>() / p as f64;
    let scale = if mean_diag > 0.0 { mean_diag } else { 1.0 };

    let mut jitter = BASE_JITTER * scale;
    for step in 0..MAX_JITTER_STEPS {
        let mut regularised = a.to_vec();
        for (i, row) in regularised.iter_mut().enumerate() {
            row[i] += jitter;
        }
        if let Some(x) = solve_symmetric(&regularised, b) {
            if step > 0 {
                warn!(jitter, "design matrix is near-singular, solved with ridge");
            }
            return Some(x);
        }
        jitter *= 100.0;
    }
    None
}

/// Solve symmetric positive definite system using Cholesky decomposition.
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    // A = L @ L'
    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // L @ y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // L' @ x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}
