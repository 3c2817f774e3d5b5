//! TimeSeries data structure for representing temporal data.

use crate::core::covariates::{slice_covariates, Covariates};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Layout of multivariate data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueLayout {
    /// Each inner vector is a dimension (column-major).
    #[default]
    Column,
    /// Each inner vector is an observation across dimensions (row-major).
    Row,
}

/// A time series with timestamps, values and aligned covariates.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    /// Values stored in column-major format: values[dimension][observation]
    values: Vec<Vec<f64>>,
    labels: Vec<String>,
    frequency: Option<Duration>,
    /// Named exogenous columns, one value per timestamp.
    covariates: Covariates,
}

/// Builder for constructing TimeSeries.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesBuilder {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<Vec<f64>>,
    layout: ValueLayout,
    labels: Vec<String>,
    frequency: Option<Duration>,
    covariates: Covariates,
}

impl TimeSeriesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timestamps(mut self, timestamps: Vec<DateTime<Utc>>) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Set univariate values.
    pub fn values(mut self, values: Vec<f64>) -> Self {
        self.values = vec![values];
        self.layout = ValueLayout::Column;
        self
    }

    /// Set multivariate values with specified layout.
    pub fn multivariate_values(mut self, values: Vec<Vec<f64>>, layout: ValueLayout) -> Self {
        self.values = values;
        self.layout = layout;
        self
    }

    pub fn labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn frequency(mut self, freq: Duration) -> Self {
        self.frequency = Some(freq);
        self
    }

    /// Attach a named covariate column.
    pub fn covariate(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.covariates.insert(name.into(), values);
        self
    }

    pub fn build(self) -> Result<TimeSeries> {
        let mut series = TimeSeries::new(self.timestamps, self.values, self.layout)?;
        series.set_labels(self.labels)?;
        series.frequency = self.frequency;
        series.set_covariates(self.covariates)?;
        Ok(series)
    }
}

impl TimeSeries {
    /// Create a new TimeSeries from timestamps and values in the given layout.
    pub fn new(
        timestamps: Vec<DateTime<Utc>>,
        values: Vec<Vec<f64>>,
        layout: ValueLayout,
    ) -> Result<Self> {
        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(ForecastError::TimestampError(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }

        let values = match layout {
            ValueLayout::Column => {
                for series in &values {
                    if series.len() != timestamps.len() {
                        return Err(ForecastError::DimensionMismatch {
                            expected: timestamps.len(),
                            got: series.len(),
                        });
                    }
                }
                values
            }
            ValueLayout::Row => {
                if values.len() != timestamps.len() {
                    return Err(ForecastError::DimensionMismatch {
                        expected: timestamps.len(),
                        got: values.len(),
                    });
                }

                let dims = values.first().map(|row| row.len()).unwrap_or(0);
                for row in &values {
                    if row.len() != dims {
                        return Err(ForecastError::DimensionMismatch {
                            expected: dims,
                            got: row.len(),
                        });
                    }
                }

                (0..dims)
                    .map(|d| values.iter().map(|row| row[d]).collect())
                    .collect()
            }
        };

        Ok(Self {
            timestamps,
            values,
            labels: Vec::new(),
            frequency: None,
            covariates: Covariates::new(),
        })
    }

    /// Create a simple univariate time series.
    pub fn univariate(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        Self::new(timestamps, vec![values], ValueLayout::Column)
    }

    /// Build a univariate series from timestamps already known to be
    /// increasing and aligned with `values`.
    pub(crate) fn regular(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Self {
        debug_assert_eq!(timestamps.len(), values.len());
        Self {
            timestamps,
            values: vec![values],
            labels: Vec::new(),
            frequency: Some(Duration::days(1)),
            covariates: Covariates::new(),
        }
    }

    /// Create a multivariate series from column-major values.
    pub fn multivariate(timestamps: Vec<DateTime<Utc>>, columns: Vec<Vec<f64>>) -> Result<Self> {
        Self::new(timestamps, columns, ValueLayout::Column)
    }

    /// Attach covariates, consuming the series.
    pub fn with_covariates(mut self, covariates: Covariates) -> Result<Self> {
        self.set_covariates(covariates)?;
        Ok(self)
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Get the number of dimensions (1 for univariate).
    pub fn dimensions(&self) -> usize {
        self.values.len()
    }

    /// Check if the series is multivariate.
    pub fn is_multivariate(&self) -> bool {
        self.values.len() > 1
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Get values for a specific dimension.
    pub fn values(&self, dimension: usize) -> Result<&[f64]> {
        self.values
            .get(dimension)
            .map(|v| v.as_slice())
            .ok_or(ForecastError::IndexOutOfBounds {
                index: dimension,
                size: self.values.len(),
            })
    }

    /// Get primary (first dimension) values.
    pub fn primary_values(&self) -> &[f64] {
        self.values.first().map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Get all values organized by dimension.
    pub fn values_by_dimension(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Set dimension labels.
    pub fn set_labels(&mut self, labels: Vec<String>) -> Result<()> {
        if !labels.is_empty() && labels.len() != self.dimensions() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.dimensions(),
                got: labels.len(),
            });
        }
        self.labels = labels;
        Ok(())
    }

    pub fn frequency(&self) -> Option<Duration> {
        self.frequency
    }

    pub fn set_frequency(&mut self, freq: Duration) {
        self.frequency = Some(freq);
    }

    /// Get all covariate columns.
    pub fn covariates(&self) -> &Covariates {
        &self.covariates
    }

    /// Get a covariate column by name.
    pub fn covariate(&self, name: &str) -> Option<&[f64]> {
        self.covariates.get(name).map(|v| v.as_slice())
    }

    pub fn has_covariates(&self) -> bool {
        !self.covariates.is_empty()
    }

    /// Replace the covariates. Every column must match the series length.
    pub fn set_covariates(&mut self, covariates: Covariates) -> Result<()> {
        for values in covariates.values() {
            if values.len() != self.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: self.len(),
                    got: values.len(),
                });
            }
        }
        self.covariates = covariates;
        Ok(())
    }

    /// Extract the observations in `start..end`, covariates included.
    pub fn slice(&self, start: usize, end: usize) -> Result<TimeSeries> {
        if start > end {
            return Err(ForecastError::InvalidParameter(
                "start must be <= end".to_string(),
            ));
        }
        if end > self.len() {
            return Err(ForecastError::IndexOutOfBounds {
                index: end,
                size: self.len(),
            });
        }

        Ok(TimeSeries {
            timestamps: self.timestamps[start..end].to_vec(),
            values: self
                .values
                .iter()
                .map(|dim| dim[start..end].to_vec())
                .collect(),
            labels: self.labels.clone(),
            frequency: self.frequency,
            covariates: slice_covariates(&self.covariates, start, end)?,
        })
    }

    /// Check if series has missing values (NaN or Inf).
    pub fn has_missing_values(&self) -> bool {
        self.values
            .iter()
            .any(|dim| dim.iter().any(|v| !v.is_finite()))
    }

    /// Infer frequency from the modal spacing of the timestamps.
    ///
    /// `tolerance` is the minimum share of gaps that must equal the modal gap.
    pub fn infer_frequency(&self, tolerance: f64) -> Result<Duration> {
        if self.len() < 2 {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: self.len(),
            });
        }

        let mut counts: HashMap<i64, usize> = HashMap::new();
        for w in self.timestamps.windows(2) {
            *counts.entry((w[1] - w[0]).num_seconds()).or_insert(0) += 1;
        }

        let (modal_diff, modal_count) = counts
            .iter()
            .max_by_key(|(&diff, &count)| (count, std::cmp::Reverse(diff)))
            .map(|(&diff, &count)| (diff, count))
            .ok_or_else(|| ForecastError::TimestampError("empty spacing data".to_string()))?;

        let modal_ratio = modal_count as f64 / (self.len() - 1) as f64;
        if modal_ratio < tolerance {
            return Err(ForecastError::TimestampError(
                "no unique modal spacing found".to_string(),
            ));
        }

        Ok(Duration::seconds(modal_diff))
    }
}
