//! Baseline forecasting models.
//!
//! Simple local methods that serve as benchmarks and as cheap, diverse
//! members of a stacking ensemble.

mod naive;
mod random_walk;
mod seasonal_naive;
mod sma;

pub use naive::Naive;
pub use random_walk::RandomWalkWithDrift;
pub use seasonal_naive::SeasonalNaive;
pub use sma::SimpleMovingAverage;

use crate::core::Forecast;
use crate::utils::z_for_level;

/// Wrap point predictions in symmetric normal bands.
///
/// `spread(h)` scales the residual standard deviation for step `h` (1-based).
pub(crate) fn normal_bands<F>(points: Vec<f64>, sigma: f64, level: f64, spread: F) -> Forecast
where
    F: Fn(usize) -> f64,
{
    let z = z_for_level(level);
    let (lower, upper) = points
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let half = z * sigma * spread(i + 1);
            (p - half, p + half)
        })
        .unzip();
    Forecast::from_values_with_intervals(points, lower, upper)
}
