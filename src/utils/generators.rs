//! Synthetic series for tests, benchmarks and demos.
//!
//! All generated series are daily, starting at 2000-01-01 UTC.

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// `n` consecutive daily timestamps starting at 2000-01-01.
pub fn timestamps(n: usize) -> Vec<DateTime<Utc>> {
    timestamps_from(0, n)
}

/// `n` daily timestamps starting `offset` days after 2000-01-01.
pub fn timestamps_from(offset: usize, n: usize) -> Vec<DateTime<Utc>> {
    let base = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).single();
    match base {
        Some(base) => (offset..offset + n)
            .map(|i| base + Duration::days(i as i64))
            .collect(),
        None => Vec::new(),
    }
}

fn daily(values: Vec<f64>) -> TimeSeries {
    TimeSeries::regular(timestamps(values.len()), values)
}

/// `intercept + slope * t` for `t` in `0..len`.
pub fn linear_series(len: usize, intercept: f64, slope: f64) -> TimeSeries {
    daily((0..len).map(|t| intercept + slope * t as f64).collect())
}

/// `offset + amplitude * sin(2πt / period)`.
pub fn sine_series(len: usize, amplitude: f64, period: f64, offset: f64) -> TimeSeries {
    daily(
        (0..len)
            .map(|t| offset + amplitude * (2.0 * std::f64::consts::PI * t as f64 / period).sin())
            .collect(),
    )
}

/// A constant series.
pub fn constant_series(len: usize, value: f64) -> TimeSeries {
    daily(vec![value; len])
}

/// Independent Gaussian draws, reproducible for a given `seed`.
pub fn gaussian_series(len: usize, mean: f64, std_dev: f64, seed: u64) -> Result<TimeSeries> {
    let normal = Normal::new(mean, std_dev)
        .map_err(|e| ForecastError::InvalidParameter(format!("gaussian series: {}", e)))?;
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(daily((0..len).map(|_| normal.sample(&mut rng)).collect()))
}

/// Element-wise sum of two univariate series of equal length.
pub fn add_series(a: &TimeSeries, b: &TimeSeries) -> Result<TimeSeries> {
    if a.len() != b.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }
    let values = a
        .primary_values()
        .iter()
        .zip(b.primary_values())
        .map(|(x, y)| x + y)
        .collect();
    TimeSeries::univariate(a.timestamps().to_vec(), values)
}
