//! Stacked ensemble combining base forecasts with a learned regressor.
//!
//! The last `evaluation_window` observations are held out. Every base model
//! is fit on the remaining prefix and forecasts the held-out points; the
//! meta-regressor then learns to map those forecasts (one feature per base
//! model) onto the observed values.

use crate::core::{slice_covariates, validate_covariates, Covariates, Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::{BoxedForecaster, Forecaster, ModelRegistry};
use crate::regression::{BoxedRegressor, LinearRegression, Regressor};
use tracing::{debug, trace, warn};

/// How base-model forecasts over the evaluation window are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrainingStrategy {
    /// Fit once on the training prefix and forecast the whole window.
    #[default]
    Holdout,
    /// Refit on an expanding prefix and forecast one step at a time.
    HistoricalForecasts,
}

/// Training options for [`RegressionEnsemble`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnsembleConfig {
    /// Refit the base models on the full series after the meta-regressor.
    pub retrain: bool,
    pub strategy: TrainingStrategy,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            retrain: true,
            strategy: TrainingStrategy::Holdout,
        }
    }
}

/// Check that `window` points can be held out of a series of `series_len`
/// points while leaving every base model enough data to train on.
///
/// `min_train_lens` holds the minimum training length of each base model.
pub fn validate_training_window(
    series_len: usize,
    window: usize,
    min_train_lens: &[usize],
) -> Result<()> {
    if window == 0 {
        return Err(ForecastError::InvalidParameter(
            "evaluation window must hold out at least one point".to_string(),
        ));
    }
    let min_train_len = min_train_lens.iter().copied().max().unwrap_or(1);
    if window >= series_len || series_len - window < min_train_len {
        return Err(ForecastError::InvalidTrainingWindow {
            series_len,
            window,
            min_train_len,
        });
    }
    Ok(())
}

#[derive(Debug, Clone)]
struct FittedState {
    series_len: usize,
    /// Number of leading observations the base models are currently fit on.
    cutoff: usize,
    /// Covariates observed after `cutoff`.
    observed: Covariates,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
}

impl FittedState {
    fn skip(&self) -> usize {
        self.series_len - self.cutoff
    }
}

/// Ensemble whose combination weights are learned by a regressor.
///
/// # Example
///
/// ```
/// use anofox_stacking::models::baseline::{Naive, RandomWalkWithDrift};
/// use anofox_stacking::models::ensemble::RegressionEnsemble;
/// use anofox_stacking::models::Forecaster;
/// use anofox_stacking::utils::generators::linear_series;
///
/// let series = linear_series(50, 10.0, 0.5);
/// let mut ensemble = RegressionEnsemble::new(
///     vec![Box::new(Naive::new()), Box::new(RandomWalkWithDrift::new())],
///     5,
/// );
/// ensemble.fit(&series).unwrap();
/// assert_eq!(ensemble.predict(10).unwrap().horizon(), 10);
/// ```
pub struct RegressionEnsemble {
    models: Vec<BoxedForecaster>,
    evaluation_window: usize,
    regressor: BoxedRegressor,
    config: EnsembleConfig,
    exog_names: Vec<String>,
    state: Option<FittedState>,
}

impl RegressionEnsemble {
    /// Create an ensemble holding out the last `evaluation_window` points
    /// to train the default meta-regressor (OLS without intercept).
    pub fn new(models: Vec<BoxedForecaster>, evaluation_window: usize) -> Self {
        let mut exog_names: Vec<String> = models
            .iter()
            .flat_map(|m| m.exog_names().unwrap_or(&[]).iter().cloned())
            .collect();
        exog_names.sort();
        exog_names.dedup();

        Self {
            models,
            evaluation_window,
            regressor: Box::new(LinearRegression::new()),
            config: EnsembleConfig::default(),
            exog_names,
            state: None,
        }
    }

    /// Build an ensemble from fresh instances of every registered model.
    pub fn from_registry(registry: &ModelRegistry, evaluation_window: usize) -> Self {
        Self::new(registry.create_all(), evaluation_window)
    }

    /// Replace the meta-regressor.
    pub fn with_regressor(mut self, regressor: BoxedRegressor) -> Self {
        self.regressor = regressor;
        self.state = None;
        self
    }

    /// Whether to refit the base models on the full series.
    pub fn with_retrain(mut self, retrain: bool) -> Self {
        self.config.retrain = retrain;
        self
    }

    /// Choose how base forecasts over the evaluation window are produced.
    pub fn with_strategy(mut self, strategy: TrainingStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Replace both training options at once.
    pub fn with_config(mut self, config: EnsembleConfig) -> Self {
        self.config = config;
        self
    }

    /// Current training options.
    pub fn config(&self) -> EnsembleConfig {
        self.config
    }

    /// Number of base models.
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Base models in the order their forecasts enter the meta-regressor.
    pub fn models(&self) -> &[BoxedForecaster] {
        &self.models
    }

    /// Number of trailing points held out to train the meta-regressor.
    pub fn evaluation_window(&self) -> usize {
        self.evaluation_window
    }

    /// Change the number of held-out points. Clears any fitted state.
    pub fn set_evaluation_window(&mut self, evaluation_window: usize) {
        self.evaluation_window = evaluation_window;
        self.state = None;
    }

    /// The meta-regressor combining base forecasts.
    pub fn regressor(&self) -> &dyn Regressor {
        self.regressor.as_ref()
    }

    /// Learned weight of each base model, for linear meta-regressors.
    pub fn coefficients(&self) -> Option<&[f64]> {
        self.state.as_ref()?;
        self.regressor.coefficients()
    }

    /// Largest minimum training length among the base models.
    pub fn base_min_train_len(&self) -> usize {
        self.models
            .iter()
            .map(|m| m.min_train_len())
            .max()
            .unwrap_or(1)
    }

    /// Forecast the end of each series with the fitted base models.
    ///
    /// Every base model must be global. `futures`, when given, holds the
    /// future covariates of each series in the same order.
    pub fn predict_many(
        &self,
        series: &[TimeSeries],
        horizon: usize,
        futures: Option<&[Covariates]>,
    ) -> Result<Vec<Forecast>> {
        if let Some(futures) = futures {
            if futures.len() != series.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: series.len(),
                    got: futures.len(),
                });
            }
        }
        series
            .iter()
            .enumerate()
            .map(|(i, s)| self.predict_series(s, horizon, futures.map(|f| &f[i])))
            .collect()
    }

    /// Reject configurations that cannot be trained on `series`.
    ///
    /// Nothing is fit or modified here.
    fn validate(&self, series: &[TimeSeries]) -> Result<()> {
        if self.models.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "regression ensemble needs at least one base model".to_string(),
            ));
        }
        if series.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if series.len() > 1 {
            if let Some(local) = self.models.iter().find(|m| !m.is_global()) {
                return Err(ForecastError::InvalidParameter(format!(
                    "fitting several series needs global base models, {} is local",
                    local.name()
                )));
            }
        }
        let min_train_lens: Vec<usize> = self.models.iter().map(|m| m.min_train_len()).collect();
        for s in series {
            // A series without value dimensions still reports its timestamp count.
            if s.primary_values().len() != s.len() {
                return Err(ForecastError::EmptyData);
            }
            validate_training_window(s.len(), self.evaluation_window, &min_train_lens)?;
            validate_covariates(s.covariates(), &self.exog_names, s.len())?;
        }
        Ok(())
    }

    /// Feature rows for every held-out point, series by series.
    fn holdout_features(&mut self, series: &[TimeSeries]) -> Result<Vec<Vec<f64>>> {
        let window = self.evaluation_window;
        let train = series
            .iter()
            .map(|s| s.slice(0, s.len() - window))
            .collect::<Result<Vec<_>>>()?;

        for model in self.models.iter_mut() {
            model.fit_many(&train)?;
        }

        let mut rows = Vec::with_capacity(window * series.len());
        for (i, (s, prefix)) in series.iter().zip(&train).enumerate() {
            let held_out = slice_covariates(s.covariates(), prefix.len(), s.len())?;
            let mut columns = Vec::with_capacity(self.models.len());
            for model in &self.models {
                let column = if i == 0 {
                    base_forecast(&**model, window, &held_out)?
                } else {
                    series_forecast(&**model, prefix, window, &held_out)?
                };
                trace!(
                    model = model.name(),
                    series = i,
                    window,
                    "base model forecast evaluation window"
                );
                columns.push(column);
            }
            rows.extend(to_rows(&columns, window));
        }
        Ok(rows)
    }

    fn historical_features(&mut self, series: &[TimeSeries]) -> Result<Vec<Vec<f64>>> {
        let window = self.evaluation_window;
        // columns[series][model]
        let mut columns = vec![vec![Vec::with_capacity(window); self.models.len()]; series.len()];
        for step in 0..window {
            let histories = series
                .iter()
                .map(|s| s.slice(0, s.len() - window + step))
                .collect::<Result<Vec<_>>>()?;
            for (m, model) in self.models.iter_mut().enumerate() {
                model.fit_many(&histories)?;
                for (i, (s, history)) in series.iter().zip(&histories).enumerate() {
                    let t = history.len();
                    let next = slice_covariates(s.covariates(), t, t + 1)?;
                    let value = if i == 0 {
                        base_forecast(&**model, 1, &next)?
                    } else {
                        series_forecast(&**model, history, 1, &next)?
                    };
                    columns[i][m].extend(value);
                }
            }
            trace!(step, "historical one-step forecasts");
        }
        Ok(columns.iter().flat_map(|c| to_rows(c, window)).collect())
    }

    /// Base forecasts for the `horizon` steps after the end of the series,
    /// one column per model.
    fn forecast_base(&self, horizon: usize, future: Option<&Covariates>) -> Result<Vec<Vec<f64>>> {
        let state = self.state.as_ref().ok_or(ForecastError::FitRequired)?;
        let skip = state.skip();

        let mut columns = Vec::with_capacity(self.models.len());
        for model in &self.models {
            let forecast = if model.has_exog() {
                let future = future.ok_or_else(|| {
                    ForecastError::InvalidParameter(format!(
                        "{} needs future covariates; use predict_with_exog",
                        model.name()
                    ))
                })?;
                let names = model.exog_names().unwrap_or(&[]);
                let covariates = join_covariates(&state.observed, future, names, horizon)?;
                model.predict_with_exog(skip + horizon, &covariates)?
            } else {
                model.predict(skip + horizon)?
            };
            columns.push(checked_primary(
                &**model,
                forecast.without_first(skip),
                horizon,
            )?);
        }
        Ok(columns)
    }

    fn combine(&self, columns: &[Vec<f64>], horizon: usize) -> Result<Forecast> {
        if horizon == 0 {
            return Ok(Forecast::from_values(Vec::new()));
        }
        let rows = to_rows(columns, horizon);
        Ok(Forecast::from_values(self.regressor.predict(&rows)?))
    }
}

impl Forecaster for RegressionEnsemble {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        self.fit_many(std::slice::from_ref(series))
    }

    /// Stack the held-out windows of every series into the meta-regressor's
    /// training rows. Fitted values and the default forecast origin refer to
    /// the first series.
    fn fit_many(&mut self, series: &[TimeSeries]) -> Result<()> {
        self.validate(series)?;
        let first = series.first().ok_or(ForecastError::EmptyData)?;

        let series_len = first.len();
        let window = self.evaluation_window;
        let split = series_len - window;
        debug!(
            series = series.len(),
            series_len,
            window,
            models = self.models.len(),
            strategy = ?self.config.strategy,
            regressor = self.regressor.name(),
            "fitting regression ensemble"
        );

        // Base models are about to be refit; the previous state is stale.
        self.state = None;

        let features = match self.config.strategy {
            TrainingStrategy::Holdout => self.holdout_features(series)?,
            TrainingStrategy::HistoricalForecasts => self.historical_features(series)?,
        };
        if features.len() < self.models.len() {
            warn!(
                rows = features.len(),
                models = self.models.len(),
                "fewer held-out points than base models, meta-regression is underdetermined"
            );
        }

        let targets: Vec<f64> = series
            .iter()
            .flat_map(|s| s.primary_values()[s.len() - window..].iter().copied())
            .collect();
        self.regressor.fit(&features, &targets)?;
        let in_sample = self.regressor.predict(&features[..window])?;
        debug!(coefficients = ?self.regressor.coefficients(), "fitted meta-regressor");

        let cutoff = if self.config.retrain {
            for model in self.models.iter_mut() {
                model.fit_many(series)?;
            }
            debug!(series_len, "retrained base models on full series");
            series_len
        } else {
            match self.config.strategy {
                TrainingStrategy::Holdout => split,
                TrainingStrategy::HistoricalForecasts => series_len - 1,
            }
        };

        let mut fitted = vec![f64::NAN; split];
        fitted.extend(in_sample);
        let residuals = first
            .primary_values()
            .iter()
            .zip(&fitted)
            .map(|(y, f)| y - f)
            .collect();

        self.state = Some(FittedState {
            series_len,
            cutoff,
            observed: slice_covariates(first.covariates(), cutoff, series_len)?,
            fitted,
            residuals,
        });
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let columns = self.forecast_base(horizon, None)?;
        self.combine(&columns, horizon)
    }

    /// The shortest series `fit` accepts: the base models' requirement plus
    /// the evaluation window.
    fn min_train_len(&self) -> usize {
        self.base_min_train_len() + self.evaluation_window.max(1)
    }

    fn supports_exog(&self) -> bool {
        self.models.iter().any(|m| m.supports_exog())
    }

    fn has_exog(&self) -> bool {
        !self.exog_names.is_empty()
    }

    fn exog_names(&self) -> Option<&[String]> {
        if self.exog_names.is_empty() {
            None
        } else {
            Some(&self.exog_names)
        }
    }

    fn predict_with_exog(&self, horizon: usize, future: &Covariates) -> Result<Forecast> {
        let columns = self.forecast_base(horizon, Some(future))?;
        self.combine(&columns, horizon)
    }

    fn is_global(&self) -> bool {
        !self.models.is_empty() && self.models.iter().all(|m| m.is_global())
    }

    fn predict_series(
        &self,
        series: &TimeSeries,
        horizon: usize,
        future: Option<&Covariates>,
    ) -> Result<Forecast> {
        if self.state.is_none() {
            return Err(ForecastError::FitRequired);
        }
        if let Some(local) = self.models.iter().find(|m| !m.is_global()) {
            return Err(ForecastError::InvalidParameter(format!(
                "predict_series needs global base models, {} is local",
                local.name()
            )));
        }

        let mut columns = Vec::with_capacity(self.models.len());
        for model in &self.models {
            let future = future.filter(|_| model.has_exog());
            let forecast = model.predict_series(series, horizon, future)?;
            columns.push(checked_primary(&**model, forecast, horizon)?);
        }
        self.combine(&columns, horizon)
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.state.as_ref().map(|s| s.fitted.as_slice())
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.state.as_ref().map(|s| s.residuals.as_slice())
    }

    fn name(&self) -> &str {
        "RegressionEnsemble"
    }

    fn is_fitted(&self) -> bool {
        self.state.is_some()
    }
}

fn base_forecast(model: &dyn Forecaster, horizon: usize, covariates: &Covariates) -> Result<Vec<f64>> {
    let forecast = if model.has_exog() {
        model.predict_with_exog(horizon, covariates)?
    } else {
        model.predict(horizon)?
    };
    checked_primary(model, forecast, horizon)
}

/// Forecast past the end of `history` with a global model.
fn series_forecast(
    model: &dyn Forecaster,
    history: &TimeSeries,
    horizon: usize,
    covariates: &Covariates,
) -> Result<Vec<f64>> {
    let future = if model.has_exog() { Some(covariates) } else { None };
    let forecast = model.predict_series(history, horizon, future)?;
    checked_primary(model, forecast, horizon)
}

fn checked_primary(model: &dyn Forecaster, forecast: Forecast, horizon: usize) -> Result<Vec<f64>> {
    let values = forecast.into_primary();
    if values.len() != horizon {
        return Err(ForecastError::ComputationError(format!(
            "{} returned {} values for a horizon of {}",
            model.name(),
            values.len(),
            horizon
        )));
    }
    Ok(values)
}

/// Covariates for a model fit `observed.len()` steps before the series end:
/// the observed tail followed by the first `horizon` future values.
fn join_covariates(
    observed: &Covariates,
    future: &Covariates,
    names: &[String],
    horizon: usize,
) -> Result<Covariates> {
    validate_covariates(future, names, horizon)?;
    Ok(names
        .iter()
        .map(|name| {
            let mut column = observed.get(name).cloned().unwrap_or_default();
            if let Some(values) = future.get(name) {
                column.extend_from_slice(&values[..horizon]);
            }
            (name.clone(), column)
        })
        .collect())
}

/// Transpose per-model columns into one feature row per time step.
fn to_rows(columns: &[Vec<f64>], len: usize) -> Vec<Vec<f64>> {
    (0..len)
        .map(|t| columns.iter().map(|c| c[t]).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::baseline::{Naive, RandomWalkWithDrift, SeasonalNaive, SimpleMovingAverage};
    use crate::models::{LagRegression, ModelSpec};
    use crate::core::ValueLayout;
    use crate::utils::generators::timestamps;
    use crate::regression::RandomForestRegressor;
    use crate::utils::generators::{add_series, linear_series, sine_series};
    use approx::assert_relative_eq;

    fn baselines() -> Vec<BoxedForecaster> {
        vec![
            Box::new(Naive::new()),
            Box::new(RandomWalkWithDrift::new()),
            Box::new(SimpleMovingAverage::new(3)),
        ]
    }

    #[test]
    fn window_rule_bounds() {
        assert!(validate_training_window(50, 5, &[1, 2, 3]).is_ok());
        assert!(validate_training_window(50, 45, &[5]).is_ok());
        assert!(matches!(
            validate_training_window(50, 45, &[6]),
            Err(ForecastError::InvalidTrainingWindow {
                series_len: 50,
                window: 45,
                min_train_len: 6
            })
        ));
        assert!(matches!(
            validate_training_window(50, 50, &[1]),
            Err(ForecastError::InvalidTrainingWindow { .. })
        ));
        assert!(matches!(
            validate_training_window(50, 0, &[1]),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn fits_and_forecasts_requested_horizon() {
        let series = add_series(&linear_series(60, 5.0, 0.3), &sine_series(60, 2.0, 7.0, 0.0))
            .unwrap();
        let mut ensemble = RegressionEnsemble::new(baselines(), 8);
        ensemble.fit(&series).unwrap();

        assert!(ensemble.is_fitted());
        assert_eq!(ensemble.coefficients().unwrap().len(), 3);
        assert_eq!(ensemble.predict(12).unwrap().horizon(), 12);
        assert!(ensemble.predict(0).unwrap().is_empty());
    }

    #[test]
    fn fitted_values_cover_only_the_evaluation_window() {
        let series = linear_series(30, 0.0, 1.0);
        let mut ensemble = RegressionEnsemble::new(baselines(), 6);
        ensemble.fit(&series).unwrap();

        let fitted = ensemble.fitted_values().unwrap();
        assert_eq!(fitted.len(), 30);
        assert!(fitted[..24].iter().all(|v| v.is_nan()));
        assert!(fitted[24..].iter().all(|v| v.is_finite()));
        assert!(ensemble.residuals().unwrap()[24..]
            .iter()
            .all(|r| r.abs() < 1e-6));
    }

    #[test]
    fn rejected_window_leaves_ensemble_untouched() {
        let series = linear_series(20, 0.0, 1.0);
        let mut ensemble = RegressionEnsemble::new(vec![Box::new(SeasonalNaive::new(12))], 10);

        assert!(matches!(
            ensemble.fit(&series),
            Err(ForecastError::InvalidTrainingWindow {
                min_train_len: 12,
                ..
            })
        ));
        assert!(!ensemble.is_fitted());
        assert!(!ensemble.models()[0].is_fitted());
        assert!(matches!(ensemble.predict(3), Err(ForecastError::FitRequired)));
    }

    #[test]
    fn series_without_values_is_rejected() {
        let series = TimeSeries::new(timestamps(50), Vec::new(), ValueLayout::Column).unwrap();
        assert_eq!(series.len(), 50);
        assert!(series.primary_values().is_empty());

        let mut ensemble = RegressionEnsemble::new(baselines(), 5);
        assert!(matches!(ensemble.fit(&series), Err(ForecastError::EmptyData)));
        assert!(!ensemble.is_fitted());
        assert!(ensemble.models().iter().all(|m| !m.is_fitted()));
    }

    #[test]
    fn fit_many_rejects_local_models_and_empty_input() {
        let a = linear_series(30, 0.0, 1.0);
        let b = linear_series(30, 5.0, 2.0);
        let mut ensemble = RegressionEnsemble::new(baselines(), 5);

        assert!(matches!(ensemble.fit_many(&[]), Err(ForecastError::EmptyData)));
        assert!(matches!(
            ensemble.fit_many(&[a.clone(), b]),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(ensemble.models().iter().all(|m| !m.is_fitted()));

        ensemble.fit_many(std::slice::from_ref(&a)).unwrap();
        assert!(ensemble.is_fitted());
    }

    #[test]
    fn fit_many_applies_the_window_rule_to_every_series() {
        let lag = || -> BoxedForecaster { Box::new(LagRegression::new(2).with_intercept(false)) };
        let mut ensemble = RegressionEnsemble::new(vec![lag()], 5);
        let long = linear_series(40, 0.0, 1.0);
        let short = linear_series(8, 0.0, 1.0);

        // LagRegression(2) without intercept needs 4 points; 8 - 5 leaves 3
        assert!(matches!(
            ensemble.fit_many(&[long, short]),
            Err(ForecastError::InvalidTrainingWindow {
                series_len: 8,
                window: 5,
                min_train_len: 4
            })
        ));
        assert!(!ensemble.models()[0].is_fitted());
    }

    #[test]
    fn fit_many_stacks_every_held_out_window() {
        let lag = || -> BoxedForecaster { Box::new(LagRegression::new(2).with_intercept(false)) };
        let series = vec![
            linear_series(30, 0.0, 1.0),
            linear_series(25, 10.0, 2.0),
            linear_series(35, -4.0, 0.5),
        ];
        for strategy in [TrainingStrategy::Holdout, TrainingStrategy::HistoricalForecasts] {
            let mut ensemble = RegressionEnsemble::new(vec![lag()], 4).with_strategy(strategy);
            ensemble.fit_many(&series).unwrap();

            assert_relative_eq!(ensemble.coefficients().unwrap()[0], 1.0, epsilon = 1e-6);
            assert_eq!(ensemble.fitted_values().unwrap().len(), 30);

            let forecasts = ensemble.predict_many(&series, 3, None).unwrap();
            assert_eq!(forecasts.len(), 3);
            assert_relative_eq!(forecasts[1].primary()[0], 10.0 + 2.0 * 25.0, epsilon = 1e-4);
            assert_relative_eq!(forecasts[2].primary()[2], -4.0 + 0.5 * 37.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn predict_many_checks_future_covariate_count() {
        let lag = || -> BoxedForecaster { Box::new(LagRegression::new(2).with_intercept(false)) };
        let series = vec![linear_series(30, 0.0, 1.0), linear_series(30, 3.0, 1.0)];
        let mut ensemble = RegressionEnsemble::new(vec![lag()], 4);
        ensemble.fit_many(&series).unwrap();

        let futures = vec![Covariates::new()];
        assert!(matches!(
            ensemble.predict_many(&series, 2, Some(&futures)),
            Err(ForecastError::DimensionMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn empty_ensemble_is_rejected() {
        let mut ensemble = RegressionEnsemble::new(Vec::new(), 3);
        assert!(matches!(
            ensemble.fit(&linear_series(20, 0.0, 1.0)),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn drift_only_ensemble_reproduces_drift_forecast() {
        let series = linear_series(40, 3.0, 2.0);
        let mut ensemble =
            RegressionEnsemble::new(vec![Box::new(RandomWalkWithDrift::new())], 5);
        ensemble.fit(&series).unwrap();
        assert_relative_eq!(ensemble.coefficients().unwrap()[0], 1.0, epsilon = 1e-6);

        let mut drift = RandomWalkWithDrift::new();
        drift.fit(&series).unwrap();
        let expected = drift.predict(6).unwrap();
        for (a, b) in ensemble.predict(6).unwrap().primary().iter().zip(expected.primary()) {
            assert_relative_eq!(a, b, epsilon = 1e-6);
        }
    }

    #[test]
    fn without_retrain_base_models_keep_training_cutoff() {
        let series = linear_series(40, 3.0, 2.0);
        let mut ensemble = RegressionEnsemble::new(vec![Box::new(RandomWalkWithDrift::new())], 5)
            .with_retrain(false);
        ensemble.fit(&series).unwrap();

        assert_eq!(ensemble.models()[0].fitted_values().unwrap().len(), 35);
        let forecast = ensemble.predict(3).unwrap();
        assert_relative_eq!(forecast.primary()[0], 3.0 + 2.0 * 40.0, epsilon = 1e-6);
        assert_relative_eq!(forecast.primary()[2], 3.0 + 2.0 * 42.0, epsilon = 1e-6);
    }

    #[test]
    fn historical_strategy_uses_one_step_forecasts() {
        let series = linear_series(30, 1.0, 1.0);
        let mut ensemble = RegressionEnsemble::new(vec![Box::new(Naive::new())], 4)
            .with_strategy(TrainingStrategy::HistoricalForecasts);
        ensemble.fit(&series).unwrap();

        // One-step naive forecasts trail the target by exactly one slope.
        let coef = ensemble.coefficients().unwrap()[0];
        let values = series.primary_values();
        let expected: f64 = values[26..].iter().zip(&values[25..29]).map(|(y, x)| y * x).sum::<f64>()
            / values[25..29].iter().map(|x| x * x).sum::<f64>();
        assert_relative_eq!(coef, expected, epsilon = 1e-8);
    }

    #[test]
    fn historical_strategy_without_retrain_skips_one_step() {
        let series = linear_series(30, 1.0, 1.0);
        let mut ensemble = RegressionEnsemble::new(vec![Box::new(RandomWalkWithDrift::new())], 4)
            .with_config(EnsembleConfig {
                retrain: false,
                strategy: TrainingStrategy::HistoricalForecasts,
            });
        ensemble.fit(&series).unwrap();

        assert_eq!(ensemble.models()[0].fitted_values().unwrap().len(), 29);
        let forecast = ensemble.predict(2).unwrap();
        assert_relative_eq!(forecast.primary()[0], 31.0, epsilon = 1e-6);
        assert_relative_eq!(forecast.primary()[1], 32.0, epsilon = 1e-6);
    }

    #[test]
    fn forest_meta_regressor_is_accepted() {
        let series = sine_series(50, 3.0, 10.0, 20.0);
        let mut ensemble = RegressionEnsemble::new(baselines(), 10)
            .with_regressor(Box::new(RandomForestRegressor::new(20).with_random_state(11)));
        ensemble.fit(&series).unwrap();

        assert!(ensemble.coefficients().is_none());
        assert_eq!(ensemble.regressor().name(), "RandomForestRegressor");
        assert_eq!(ensemble.predict(4).unwrap().horizon(), 4);
    }

    #[test]
    fn covariate_models_need_future_values() {
        let series = linear_series(40, 0.0, 1.0);
        let driver: Vec<f64> = (0..40).map(|i| (i % 5) as f64).collect();
        let target: Vec<f64> = series
            .primary_values()
            .iter()
            .zip(&driver)
            .map(|(y, x)| y + 2.0 * x)
            .collect();
        let series = TimeSeries::univariate(series.timestamps().to_vec(), target)
            .unwrap()
            .with_covariates(Covariates::from([("driver".to_string(), driver)]))
            .unwrap();

        let mut ensemble = RegressionEnsemble::new(
            vec![
                Box::new(Naive::new()),
                Box::new(LagRegression::new(2).with_covariates(["driver"])),
            ],
            6,
        );
        assert!(ensemble.has_exog());
        assert_eq!(ensemble.exog_names().unwrap(), &["driver".to_string()]);
        ensemble.fit(&series).unwrap();

        assert!(matches!(
            ensemble.predict(3),
            Err(ForecastError::InvalidParameter(_))
        ));
        let future = Covariates::from([("driver".to_string(), vec![0.0, 1.0, 2.0])]);
        assert_eq!(ensemble.predict_with_exog(3, &future).unwrap().horizon(), 3);
    }

    #[test]
    fn missing_series_covariate_fails_validation() {
        let mut ensemble = RegressionEnsemble::new(
            vec![Box::new(LagRegression::new(1).with_covariates(["price"]))],
            3,
        );
        assert!(matches!(
            ensemble.fit(&linear_series(30, 0.0, 1.0)),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(!ensemble.models()[0].is_fitted());
    }

    #[test]
    fn predict_series_requires_global_models() {
        let train = linear_series(40, 0.0, 1.0);
        let other = linear_series(15, 100.0, 3.0);

        // Without an intercept the lag model learns y[t] = 2 y[t-1] - y[t-2]
        let lag = || -> BoxedForecaster { Box::new(LagRegression::new(2).with_intercept(false)) };
        let mut global = RegressionEnsemble::new(vec![lag()], 5);
        global.fit(&train).unwrap();
        assert!(global.is_global());
        let forecast = global.predict_series(&other, 2, None).unwrap();
        assert_relative_eq!(forecast.primary()[0], 145.0, epsilon = 1e-4);

        let mut mixed = RegressionEnsemble::new(
            vec![lag(), Box::new(Naive::new())],
            5,
        );
        mixed.fit(&train).unwrap();
        assert!(matches!(
            mixed.predict_series(&other, 2, None),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn registry_builds_fresh_ensemble_members() {
        let registry = ModelRegistry::new()
            .with(ModelSpec::new("Naive", || Box::new(Naive::new())))
            .with(ModelSpec::with_period(
                "SeasonalNaive",
                |p| Box::new(SeasonalNaive::new(p)),
                7,
            ));
        let mut ensemble = RegressionEnsemble::from_registry(&registry, 7);
        assert_eq!(ensemble.model_count(), 2);
        assert_eq!(ensemble.base_min_train_len(), 7);
        assert_eq!(ensemble.min_train_len(), 14);

        assert!(ensemble.fit(&sine_series(13, 1.0, 7.0, 0.0)).is_err());
        ensemble.fit(&sine_series(14, 1.0, 7.0, 0.0)).unwrap();
    }

    #[test]
    fn ensembles_can_be_nested() {
        let inner = RegressionEnsemble::new(baselines(), 3);
        let mut outer = RegressionEnsemble::new(
            vec![Box::new(inner), Box::new(SeasonalNaive::new(7))],
            5,
        );
        assert_eq!(outer.base_min_train_len(), 7);
        let series = add_series(&linear_series(50, 1.0, 0.2), &sine_series(50, 1.0, 7.0, 0.0))
            .unwrap();
        outer.fit(&series).unwrap();
        assert_eq!(outer.predict(7).unwrap().horizon(), 7);
    }
}
