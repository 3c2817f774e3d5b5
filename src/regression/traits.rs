//! Regressor trait shared by every meta-regressor.

use crate::error::{ForecastError, Result};
use crate::utils::metrics::r_squared;

/// A tabular regression model.
///
/// `x` is row-major: one inner vector per observation, all of equal width.
/// This trait is object-safe and can be used with `Box<dyn Regressor>`.
pub trait Regressor {
    /// Fit the model to features `x` and targets `y`.
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()>;

    /// Predict one value per row of `x`.
    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>>;

    /// Linear coefficients, one per feature, for models that have them.
    fn coefficients(&self) -> Option<&[f64]> {
        None
    }

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool;

    /// Get the model name.
    fn name(&self) -> &str;

    /// Coefficient of determination of the predictions on `x` against `y`.
    fn score(&self, x: &[Vec<f64>], y: &[f64]) -> Result<f64> {
        let predicted = self.predict(x)?;
        if predicted.len() != y.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: y.len(),
                got: predicted.len(),
            });
        }
        Ok(r_squared(y, &predicted))
    }
}

/// Type alias for boxed regressor trait objects.
pub type BoxedRegressor = Box<dyn Regressor>;

/// Validate a training set, returning the number of features.
pub(crate) fn check_training_input(x: &[Vec<f64>], y: &[f64]) -> Result<usize> {
    if x.is_empty() || y.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    if x.len() != y.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: y.len(),
            got: x.len(),
        });
    }
    let width = check_rows(x, x[0].len())?;
    if x.iter().flatten().chain(y).any(|v| !v.is_finite()) {
        return Err(ForecastError::MissingValues);
    }
    Ok(width)
}

/// Validate that every row has `width` columns.
pub(crate) fn check_rows(x: &[Vec<f64>], width: usize) -> Result<usize> {
    for row in x {
        if row.len() != width {
            return Err(ForecastError::DimensionMismatch {
                expected: width,
                got: row.len(),
            });
        }
    }
    Ok(width)
}
