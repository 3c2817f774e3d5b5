//! Forecasting models.

mod traits;

pub mod baseline;
pub mod ensemble;
pub mod lag_regression;

pub use ensemble::RegressionEnsemble;
pub use lag_regression::LagRegression;
pub use traits::{BoxedForecaster, Forecaster, ModelRegistry, ModelSpec};
