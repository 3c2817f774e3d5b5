//! Error types for the anofox-stacking library.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur during forecasting and regression operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// The evaluation window cannot be carved out of the series while
    /// leaving enough observations to train every base model.
    #[error(
        "invalid training window: holding out {window} of {series_len} points leaves {} for training, need at least {min_train_len}",
        .series_len.saturating_sub(*.window)
    )]
    InvalidTrainingWindow {
        series_len: usize,
        window: usize,
        min_train_len: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Missing values detected when not allowed.
    #[error("missing values detected in data")]
    MissingValues,

    /// Index out of bounds.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = ForecastError::EmptyData;
        assert_eq!(err.to_string(), "empty input data");

        let err = ForecastError::InsufficientData { needed: 10, got: 5 };
        assert_eq!(
            err.to_string(),
            "insufficient data: need at least 10, got 5"
        );

        let err = ForecastError::DimensionMismatch {
            expected: 3,
            got: 2,
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 3, got 2");

        let err = ForecastError::FitRequired;
        assert_eq!(err.to_string(), "model must be fitted before prediction");
    }

    #[test]
    fn training_window_error_reports_remaining_points() {
        let err = ForecastError::InvalidTrainingWindow {
            series_len: 50,
            window: 45,
            min_train_len: 12,
        };
        assert_eq!(
            err.to_string(),
            "invalid training window: holding out 45 of 50 points leaves 5 for training, need at least 12"
        );

        // A window larger than the series leaves nothing rather than underflowing
        let err = ForecastError::InvalidTrainingWindow {
            series_len: 50,
            window: 100,
            min_train_len: 1,
        };
        assert!(err.to_string().contains("leaves 0 for training"));
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = ForecastError::InvalidParameter("lags must be positive".to_string());
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
