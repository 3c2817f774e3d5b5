//! Seasonal Naive forecasting model.
//!
//! Forecasts by repeating the value from the same season in the previous cycle.

use super::normal_bands;
use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::Forecaster;
use crate::utils::stats::residual_variance;

/// Seasonal Naive forecaster.
///
/// Each forecast is equal to the observation from the same season
/// in the previous seasonal period.
#[derive(Debug, Clone)]
pub struct SeasonalNaive {
    period: usize,
    last_season: Option<Vec<f64>>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    residual_variance: Option<f64>,
}

impl SeasonalNaive {
    /// Create a new SeasonalNaive model with the given seasonal period.
    ///
    /// A period of 0 is treated as 1 (plain naive).
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
            last_season: None,
            fitted: None,
            residuals: None,
            residual_variance: None,
        }
    }

    /// Get the seasonal period.
    pub fn period(&self) -> usize {
        self.period
    }
}

impl Default for SeasonalNaive {
    fn default() -> Self {
        Self::new(12)
    }
}

impl Forecaster for SeasonalNaive {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let values = series.primary_values();
        let n = values.len();
        if n < self.period {
            return Err(ForecastError::InsufficientData {
                needed: self.period,
                got: n,
            });
        }

        // y_hat[t] = y[t - period]
        let fitted: Vec<f64> = (0..n)
            .map(|i| {
                if i < self.period {
                    f64::NAN
                } else {
                    values[i - self.period]
                }
            })
            .collect();
        let residuals: Vec<f64> = values.iter().zip(&fitted).map(|(y, f)| y - f).collect();

        self.residual_variance = residual_variance(&residuals);
        self.last_season = Some(values[n - self.period..].to_vec());
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let season = self.last_season.as_ref().ok_or(ForecastError::FitRequired)?;
        let predictions = (0..horizon).map(|h| season[h % self.period]).collect();
        Ok(Forecast::from_values(predictions))
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let point = self.predict(horizon)?;
        let variance = self.residual_variance.unwrap_or(0.0);
        if horizon == 0 || variance == 0.0 {
            return Ok(point);
        }
        // Uncertainty grows with the number of completed seasons
        let period = self.period;
        Ok(normal_bands(point.into_primary(), variance.sqrt(), level, |h| {
            (((h - 1) / period + 1) as f64).sqrt()
        }))
    }

    fn min_train_len(&self) -> usize {
        self.period
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "SeasonalNaive"
    }
}
