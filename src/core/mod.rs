//! Core data structures for time series forecasting.

mod covariates;
mod forecast;
mod time_series;

pub use covariates::{slice_covariates, validate_covariates, Covariates};
pub use forecast::Forecast;
pub use time_series::{TimeSeries, TimeSeriesBuilder, ValueLayout};
