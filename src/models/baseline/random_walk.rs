//! Random Walk with Drift model.
//!
//! Forecasts based on the last value plus a drift term estimated from historical data.

use super::normal_bands;
use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::Forecaster;
use crate::utils::stats::residual_variance;

/// Random walk with drift forecaster.
///
/// The forecast is: y_hat\[t+h\] = y\[t\] + h * drift
/// where drift is the average change in the series.
#[derive(Debug, Clone, Default)]
pub struct RandomWalkWithDrift {
    last_value: Option<f64>,
    drift: Option<f64>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    residual_variance: Option<f64>,
}

impl RandomWalkWithDrift {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the estimated drift parameter.
    pub fn drift(&self) -> Option<f64> {
        self.drift
    }
}

impl Forecaster for RandomWalkWithDrift {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let values = series.primary_values();
        let n = values.len();
        if n < self.min_train_len() {
            return Err(ForecastError::InsufficientData {
                needed: self.min_train_len(),
                got: n,
            });
        }

        let drift = (values[n - 1] - values[0]) / (n - 1) as f64;

        // y_hat[t] = y[t-1] + drift
        let fitted: Vec<f64> = std::iter::once(f64::NAN)
            .chain(values[..n - 1].iter().map(|y| y + drift))
            .collect();
        let residuals: Vec<f64> = values.iter().zip(&fitted).map(|(y, f)| y - f).collect();

        self.residual_variance = residual_variance(&residuals);
        self.last_value = Some(values[n - 1]);
        self.drift = Some(drift);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let last = self.last_value.ok_or(ForecastError::FitRequired)?;
        let drift = self.drift.ok_or(ForecastError::FitRequired)?;

        if horizon == 0 {
            return Ok(Forecast::new());
        }

        let predictions = (1..=horizon).map(|h| last + h as f64 * drift).collect();
        Ok(Forecast::from_values(predictions))
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let point = self.predict(horizon)?;
        let variance = self.residual_variance.unwrap_or(0.0);
        if horizon == 0 || variance == 0.0 {
            return Ok(point);
        }
        Ok(normal_bands(point.into_primary(), variance.sqrt(), level, |h| {
            (h as f64).sqrt()
        }))
    }

    fn min_train_len(&self) -> usize {
        2
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "RandomWalkWithDrift"
    }
}
