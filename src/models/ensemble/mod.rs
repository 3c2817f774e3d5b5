//! Ensemble forecasting methods.
//!
//! Combines several base forecasters through a learned meta-regressor.

mod regression;

pub use regression::{
    validate_training_window, EnsembleConfig, RegressionEnsemble, TrainingStrategy,
};
