//! Ordinary least squares regressor.

use super::traits::{check_rows, check_training_input, Regressor};
use crate::error::{ForecastError, Result};
use crate::utils::{ols_fit, OLSResult};

/// Linear regression fitted by ordinary least squares.
///
/// Fits without an intercept unless [`with_intercept`](Self::with_intercept)
/// is set: as a meta-regressor the coefficients are then the weights given
/// to each base forecast.
#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    fit_intercept: bool,
    model: Option<OLSResult>,
    n_features: usize,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether to fit an intercept term.
    pub fn with_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn fits_intercept(&self) -> bool {
        self.fit_intercept
    }

    /// Fitted intercept (0.0 when fitted without one).
    pub fn intercept(&self) -> Option<f64> {
        self.model.as_ref().map(|m| m.intercept)
    }
}

impl Regressor for LinearRegression {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        let n_features = check_training_input(x, y)?;
        self.model = Some(ols_fit(x, y, self.fit_intercept)?);
        self.n_features = n_features;
        Ok(())
    }

    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        let model = self.model.as_ref().ok_or(ForecastError::FitRequired)?;
        check_rows(x, self.n_features)?;
        model.predict(x)
    }

    fn coefficients(&self) -> Option<&[f64]> {
        self.model.as_ref().map(|m| m.coefficients.as_slice())
    }

    fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    fn name(&self) -> &str {
        "LinearRegression"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn learns_convex_weights_without_intercept() {
        // y = 0.25 a + 0.75 b
        let x: Vec<Vec<f64>> = (0..10)
            .map(|i| vec![i as f64, (i * i) as f64 * 0.5])
            .collect();
        let y: Vec<f64> = x.iter().map(|r| 0.25 * r[0] + 0.75 * r[1]).collect();

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let coef = model.coefficients().unwrap();
        assert_relative_eq!(coef[0], 0.25, epsilon = 1e-6);
        assert_relative_eq!(coef[1], 0.75, epsilon = 1e-6);
        assert_eq!(model.intercept(), Some(0.0));
        assert_relative_eq!(model.score(&x, &y).unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn intercept_absorbs_constant_offset() {
        let x: Vec<Vec<f64>> = (0..8).map(|i| vec![i as f64]).collect();
        let y: Vec<f64> = (0..8).map(|i| 10.0 + 2.0 * i as f64).collect();

        let mut model = LinearRegression::new().with_intercept(true);
        model.fit(&x, &y).unwrap();

        assert!(model.fits_intercept());
        assert_relative_eq!(model.intercept().unwrap(), 10.0, epsilon = 1e-6);
        let pred = model.predict(&[vec![10.0]]).unwrap();
        assert_relative_eq!(pred[0], 30.0, epsilon = 1e-6);
    }

    #[test]
    fn predict_checks_state_and_width() {
        let mut model = LinearRegression::new();
        assert!(matches!(
            model.predict(&[vec![1.0]]),
            Err(ForecastError::FitRequired)
        ));
        assert!(!model.is_fitted());

        model
            .fit(&[vec![1.0, 2.0], vec![2.0, 1.0]], &[3.0, 3.0])
            .unwrap();
        assert!(matches!(
            model.predict(&[vec![1.0]]),
            Err(ForecastError::DimensionMismatch {
                expected: 2,
                got: 1
            })
        ));
    }
}
