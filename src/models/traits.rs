//! Forecaster trait defining the common interface for all models.

use crate::core::{Covariates, Forecast, TimeSeries};
use crate::error::{ForecastError, Result};

/// Common interface for all forecasting models.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to the time series data.
    fn fit(&mut self, series: &TimeSeries) -> Result<()>;

    /// Fit shared parameters on several series.
    ///
    /// Local models accept exactly one series.
    fn fit_many(&mut self, series: &[TimeSeries]) -> Result<()> {
        match series {
            [] => Err(ForecastError::EmptyData),
            [single] => self.fit(single),
            _ => Err(ForecastError::InvalidParameter(format!(
                "{} is a local model and fits one series at a time",
                self.name()
            ))),
        }
    }

    /// Generate predictions for the specified horizon.
    fn predict(&self, horizon: usize) -> Result<Forecast>;

    /// Generate predictions with confidence intervals.
    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let _ = level;
        self.predict(horizon)
    }

    /// Minimum number of observations `fit` accepts.
    fn min_train_len(&self) -> usize {
        1
    }

    /// Whether the model can consume exogenous covariates.
    fn supports_exog(&self) -> bool {
        false
    }

    /// Whether the fitted (or configured) model depends on covariates.
    fn has_exog(&self) -> bool {
        false
    }

    /// Names of the covariates the model reads, in coefficient order.
    fn exog_names(&self) -> Option<&[String]> {
        None
    }

    /// Generate predictions given future values of the covariates.
    ///
    /// Models without covariates ignore `future`.
    fn predict_with_exog(&self, horizon: usize, future: &Covariates) -> Result<Forecast> {
        let _ = future;
        self.predict(horizon)
    }

    /// Whether the model can forecast series other than the one it was fit on.
    fn is_global(&self) -> bool {
        false
    }

    /// Forecast `horizon` steps past the end of `series` using the fitted
    /// parameters. Only global models support this.
    fn predict_series(
        &self,
        series: &TimeSeries,
        horizon: usize,
        future: Option<&Covariates>,
    ) -> Result<Forecast> {
        let _ = (series, horizon, future);
        Err(ForecastError::InvalidParameter(format!(
            "{} is a local model and only forecasts the series it was fit on",
            self.name()
        )))
    }

    /// Get the fitted values (in-sample predictions).
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Get the residuals (actual - fitted).
    fn residuals(&self) -> Option<&[f64]>;

    /// Get the model name.
    fn name(&self) -> &str;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}

/// Type alias for boxed forecaster trait objects.
///
/// # Example
///
/// ```
/// use anofox_stacking::models::{BoxedForecaster, Forecaster};
/// use anofox_stacking::models::baseline::Naive;
///
/// let model: BoxedForecaster = Box::new(Naive::new());
/// assert_eq!(model.name(), "Naive");
/// ```
pub type BoxedForecaster = Box<dyn Forecaster>;

/// Named factory for a forecaster.
///
/// Lets an ensemble be assembled repeatedly from the same description, each
/// time with fresh, unfitted base models.
///
/// # Example
///
/// ```
/// use anofox_stacking::models::ModelSpec;
/// use anofox_stacking::models::baseline::{Naive, SeasonalNaive};
///
/// let specs = vec![
///     ModelSpec::new("Naive", || Box::new(Naive::new())),
///     ModelSpec::with_period("SeasonalNaive", |p| Box::new(SeasonalNaive::new(p)), 12),
/// ];
///
/// for spec in &specs {
///     let model = spec.create();
///     assert!(!model.is_fitted());
/// }
/// ```
pub struct ModelSpec {
    /// Display name of the model
    pub name: &'static str,
    factory: Box<dyn Fn() -> BoxedForecaster + Send + Sync>,
}

impl ModelSpec {
    /// Create a model spec with a simple factory.
    pub fn new<F>(name: &'static str, factory: F) -> Self
    where
        F: Fn() -> BoxedForecaster + Send + Sync + 'static,
    {
        Self {
            name,
            factory: Box::new(factory),
        }
    }

    /// Create a model spec with a period parameter.
    pub fn with_period<F>(name: &'static str, factory: F, period: usize) -> Self
    where
        F: Fn(usize) -> BoxedForecaster + Send + Sync + 'static,
    {
        Self {
            name,
            factory: Box::new(move || factory(period)),
        }
    }

    /// Create a new model instance.
    pub fn create(&self) -> BoxedForecaster {
        (self.factory)()
    }
}

/// Ordered collection of model specifications.
#[derive(Default)]
pub struct ModelRegistry {
    models: Vec<ModelSpec>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model specification.
    pub fn register(&mut self, spec: ModelSpec) {
        self.models.push(spec);
    }

    /// Builder-style registration.
    pub fn with(mut self, spec: ModelSpec) -> Self {
        self.register(spec);
        self
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelSpec> {
        self.models.iter()
    }

    /// Instantiate one fresh model per registered spec.
    pub fn create_all(&self) -> Vec<BoxedForecaster> {
        self.models.iter().map(|s| s.create()).collect()
    }
}
