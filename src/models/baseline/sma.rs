//! Simple Moving Average forecasting model.

use super::normal_bands;
use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::Forecaster;
use crate::utils::stats::residual_variance;

/// Simple Moving Average forecaster.
///
/// Predicts future values as the mean of the last `window` observations.
/// A window of 0 uses the mean of all historical data.
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    window: usize,
    last_mean: Option<f64>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    residual_variance: Option<f64>,
}

impl SimpleMovingAverage {
    /// Create a new SMA with the given window size.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            last_mean: None,
            fitted: None,
            residuals: None,
            residual_variance: None,
        }
    }

    /// Get the window size.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Mean of the (at most `window`) values before `end`.
    fn trailing_mean(&self, values: &[f64], end: usize) -> f64 {
        let width = if self.window == 0 {
            end
        } else {
            self.window.min(end)
        };
        if width == 0 {
            return f64::NAN;
        }
        values[end - width..end].iter().sum::<f64>() / width as f64
    }
}

impl Default for SimpleMovingAverage {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Forecaster for SimpleMovingAverage {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let values = series.primary_values();
        let n = values.len();
        if n == 0 {
            return Err(ForecastError::EmptyData);
        }
        if n < self.min_train_len() {
            return Err(ForecastError::InsufficientData {
                needed: self.min_train_len(),
                got: n,
            });
        }

        let fitted: Vec<f64> = (0..n).map(|i| self.trailing_mean(values, i)).collect();
        let residuals: Vec<f64> = values.iter().zip(&fitted).map(|(y, f)| y - f).collect();

        self.residual_variance = residual_variance(&residuals);
        self.last_mean = Some(self.trailing_mean(values, n));
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let mean = self.last_mean.ok_or(ForecastError::FitRequired)?;
        Ok(Forecast::from_values(vec![mean; horizon]))
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let point = self.predict(horizon)?;
        let variance = self.residual_variance.unwrap_or(0.0);
        if horizon == 0 || variance == 0.0 {
            return Ok(point);
        }
        Ok(normal_bands(point.into_primary(), variance.sqrt(), level, |_| 1.0))
    }

    fn min_train_len(&self) -> usize {
        self.window.max(1)
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::generators::timestamps;
    use approx::assert_relative_eq;

    fn series(values: Vec<f64>) -> TimeSeries {
        TimeSeries::univariate(timestamps(values.len()), values).unwrap()
    }

    #[test]
    fn sma_forecasts_trailing_mean() {
        let mut model = SimpleMovingAverage::new(3);
        model.fit(&series(vec![1.0, 2.0, 3.0, 4.0, 5.0])).unwrap();

        let forecast = model.predict(2).unwrap();
        assert_eq!(forecast.primary(), &[4.0, 4.0]);
    }

    #[test]
    fn sma_window_zero_uses_full_history() {
        let mut model = SimpleMovingAverage::default();
        model.fit(&series(vec![2.0, 4.0, 6.0])).unwrap();
        assert_relative_eq!(model.predict(1).unwrap().primary()[0], 4.0);
        assert_eq!(model.min_train_len(), 1);
    }

    #[test]
    fn sma_fitted_values_use_partial_windows_early_on() {
        let mut model = SimpleMovingAverage::new(2);
        model.fit(&series(vec![1.0, 3.0, 5.0, 7.0])).unwrap();

        let fitted = model.fitted_values().unwrap();
        assert!(fitted[0].is_nan());
        assert_eq!(&fitted[1..], &[1.0, 2.0, 4.0]);
    }

    #[test]
    fn sma_requires_a_full_window() {
        let mut model = SimpleMovingAverage::new(5);
        assert!(matches!(
            model.fit(&series(vec![1.0, 2.0])),
            Err(ForecastError::InsufficientData { needed: 5, got: 2 })
        ));
    }

    #[test]
    fn sma_intervals_are_flat() {
        let mut model = SimpleMovingAverage::new(3);
        model
            .fit(&series(vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]))
            .unwrap();
        let forecast = model.predict_with_intervals(3, 0.9).unwrap();
        let lower = forecast.lower_series(0).unwrap();
        assert_relative_eq!(lower[0], lower[2]);
    }
}
