//! # anofox-stacking
//!
//! Regression-ensemble (stacking) time series forecasting.
//!
//! A [`RegressionEnsemble`](models::RegressionEnsemble) fits a set of base
//! forecasters on the start of a series, forecasts a held-out evaluation
//! window with each of them and trains a meta-regressor to combine those
//! forecasts. Base forecasters implement [`Forecaster`](models::Forecaster);
//! meta-regressors implement [`Regressor`](regression::Regressor).
//!
//! ```
//! use anofox_stacking::prelude::*;
//! use anofox_stacking::models::baseline::{Naive, SeasonalNaive};
//! use anofox_stacking::utils::generators::sine_series;
//!
//! let series = sine_series(60, 5.0, 12.0, 20.0);
//! let mut ensemble = RegressionEnsemble::new(
//!     vec![Box::new(Naive::new()), Box::new(SeasonalNaive::new(12))],
//!     12,
//! )
//! .with_regressor(Box::new(LinearRegression::new()));
//!
//! ensemble.fit(&series)?;
//! let forecast = ensemble.predict(6)?;
//! assert_eq!(forecast.horizon(), 6);
//! # Ok::<(), ForecastError>(())
//! ```

#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod models;
pub mod regression;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{Covariates, Forecast, TimeSeries};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::ensemble::{EnsembleConfig, TrainingStrategy};
    pub use crate::models::{Forecaster, RegressionEnsemble};
    pub use crate::regression::{
        DecisionTreeRegressor, LinearRegression, RandomForestRegressor, Regressor,
    };
    pub use crate::utils::{calculate_metrics, quantile_normal, AccuracyMetrics};
}
