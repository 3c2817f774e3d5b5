//! Utility functions for forecasting models and regressors.

pub mod generators;
pub mod metrics;
pub mod ols;
pub mod stats;

pub use metrics::{calculate_metrics, AccuracyMetrics};
pub use ols::{ols_fit, OLSResult};
pub use stats::{quantile_normal, z_for_level};
