//! Forecast result structure for holding predictions.

use crate::error::{ForecastError, Result};

/// A forecast result containing point predictions and optional intervals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    /// Point predictions: point[dimension][step]
    point: Vec<Vec<f64>>,
    /// Lower prediction interval bounds (optional)
    lower: Option<Vec<Vec<f64>>>,
    /// Upper prediction interval bounds (optional)
    upper: Option<Vec<Vec<f64>>>,
}

impl Forecast {
    /// Create an empty forecast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a univariate forecast from point predictions.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            point: vec![values],
            lower: None,
            upper: None,
        }
    }

    /// Create a univariate forecast with prediction intervals.
    pub fn from_values_with_intervals(
        values: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
    ) -> Self {
        Self {
            point: vec![values],
            lower: Some(vec![lower]),
            upper: Some(vec![upper]),
        }
    }

    /// Get the number of dimensions.
    pub fn dimensions(&self) -> usize {
        self.point.len()
    }

    /// Get the forecast horizon (number of steps).
    pub fn horizon(&self) -> usize {
        self.point.first().map(|s| s.len()).unwrap_or(0)
    }

    /// Check if forecast is empty.
    pub fn is_empty(&self) -> bool {
        self.point.iter().all(|s| s.is_empty())
    }

    /// Get reference to a series.
    pub fn series(&self, dimension: usize) -> Result<&[f64]> {
        self.point
            .get(dimension)
            .map(|v| v.as_slice())
            .ok_or(ForecastError::IndexOutOfBounds {
                index: dimension,
                size: self.point.len(),
            })
    }

    /// Get reference to the primary (first) series.
    pub fn primary(&self) -> &[f64] {
        self.point.first().map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Consume the forecast, returning the primary point predictions.
    pub fn into_primary(self) -> Vec<f64> {
        self.point.into_iter().next().unwrap_or_default()
    }

    pub fn has_lower(&self) -> bool {
        self.lower.is_some()
    }

    pub fn has_upper(&self) -> bool {
        self.upper.is_some()
    }

    /// Get reference to lower series for a dimension.
    pub fn lower_series(&self, dimension: usize) -> Result<&[f64]> {
        band(&self.lower, dimension)
    }

    /// Get reference to upper series for a dimension.
    pub fn upper_series(&self, dimension: usize) -> Result<&[f64]> {
        band(&self.upper, dimension)
    }

    /// Drop the first `steps` predictions of every series and band.
    ///
    /// Used when a model fitted on an earlier cut-off must skip the steps
    /// that are already observed.
    pub fn without_first(mut self, steps: usize) -> Self {
        let cut = |rows: &mut Vec<Vec<f64>>| {
            for row in rows.iter_mut() {
                row.drain(..steps.min(row.len()));
            }
        };
        cut(&mut self.point);
        if let Some(lower) = self.lower.as_mut() {
            cut(lower);
        }
        if let Some(upper) = self.upper.as_mut() {
            cut(upper);
        }
        self
    }
}

fn band(rows: &Option<Vec<Vec<f64>>>, dimension: usize) -> Result<&[f64]> {
    rows.as_ref()
        .and_then(|r| r.get(dimension))
        .map(|v| v.as_slice())
        .ok_or(ForecastError::IndexOutOfBounds {
            index: dimension,
            size: rows.as_ref().map(|r| r.len()).unwrap_or(0),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_empty_state_reflects_missing_values() {
        let forecast = Forecast::new();
        assert!(forecast.is_empty());
        assert_eq!(forecast.horizon(), 0);
        assert_eq!(forecast.dimensions(), 0);

        let forecast = Forecast::from_values(vec![1.0, 2.0, 3.0]);
        assert!(!forecast.is_empty());
        assert_eq!(forecast.horizon(), 3);
    }

    #[test]
    fn forecast_from_values_with_intervals() {
        let forecast = Forecast::from_values_with_intervals(
            vec![2.0, 3.0],
            vec![1.0, 2.0],
            vec![3.0, 4.0],
        );

        assert_eq!(forecast.primary(), &[2.0, 3.0]);
        assert_eq!(forecast.lower_series(0).unwrap(), &[1.0, 2.0]);
        assert_eq!(forecast.upper_series(0).unwrap(), &[3.0, 4.0]);
        assert!(forecast.lower_series(1).is_err());
    }

    #[test]
    fn point_forecast_has_no_bands() {
        let forecast = Forecast::from_values(vec![1.0]);
        assert!(!forecast.has_lower());
        assert!(!forecast.has_upper());
        assert!(matches!(
            forecast.upper_series(0),
            Err(ForecastError::IndexOutOfBounds { index: 0, size: 0 })
        ));
    }

    #[test]
    fn without_first_trims_points_and_bands() {
        let forecast = Forecast::from_values_with_intervals(
            vec![1.0, 2.0, 3.0, 4.0],
            vec![0.0, 1.0, 2.0, 3.0],
            vec![2.0, 3.0, 4.0, 5.0],
        )
        .without_first(2);

        assert_eq!(forecast.primary(), &[3.0, 4.0]);
        assert_eq!(forecast.lower_series(0).unwrap(), &[2.0, 3.0]);
        assert_eq!(forecast.upper_series(0).unwrap(), &[4.0, 5.0]);

        let trimmed = Forecast::from_values(vec![1.0]).without_first(5);
        assert!(trimmed.is_empty());
    }

    #[test]
    fn into_primary_returns_point_values() {
        let forecast = Forecast::from_values(vec![4.0, 5.0]);
        assert_eq!(forecast.into_primary(), vec![4.0, 5.0]);
        assert!(Forecast::new().into_primary().is_empty());
    }
}
