//! Global autoregressive model with optional covariates.
//!
//! The target at time `t` is regressed on its previous `lags` values and on
//! the value of each configured covariate at `t`:
//!
//! ```text
//! y[t] = c + a_1 y[t-1] + ... + a_p y[t-p] + b_1 x_1[t] + ... + b_k x_k[t]
//! ```
//!
//! Coefficients are shared across every series the model is fit on, so a
//! fitted model can forecast any series with at least `lags` observations.
//! Multi-step forecasts are produced recursively.

use crate::core::{validate_covariates, Covariates, Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::Forecaster;
use crate::utils::{ols_fit, OLSResult};
use tracing::debug;

/// Linear autoregression on lagged targets and current covariates.
#[derive(Debug, Clone)]
pub struct LagRegression {
    lags: usize,
    covariate_names: Vec<String>,
    fit_intercept: bool,
    ols: Option<OLSResult>,
    /// Last `lags` observations of the first fitted series, oldest first.
    history: Option<Vec<f64>>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
}

impl LagRegression {
    /// Create a model using the previous `lags` target values.
    pub fn new(lags: usize) -> Self {
        Self {
            lags,
            covariate_names: Vec::new(),
            fit_intercept: true,
            ols: None,
            history: None,
            fitted: None,
            residuals: None,
        }
    }

    /// Read the named covariates from the series at fit time.
    ///
    /// Names are kept sorted so the coefficient order matches the
    /// covariate map iteration order.
    pub fn with_covariates<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.covariate_names = names.into_iter().map(Into::into).collect();
        self.covariate_names.sort();
        self.covariate_names.dedup();
        self
    }

    /// Whether to fit an intercept (default `true`).
    pub fn with_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn lags(&self) -> usize {
        self.lags
    }

    /// Fitted lag coefficients followed by covariate coefficients.
    pub fn coefficients(&self) -> Option<&[f64]> {
        self.ols.as_ref().map(|o| o.coefficients.as_slice())
    }

    pub fn intercept(&self) -> Option<f64> {
        self.ols.as_ref().map(|o| o.intercept)
    }

    fn num_params(&self) -> usize {
        self.lags + self.covariate_names.len() + usize::from(self.fit_intercept)
    }

    /// Feature row for predicting position `t` from `values[..t]`.
    fn feature_row(&self, lagged: &[f64], covariates: &[f64]) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.lags + covariates.len());
        row.extend(lagged.iter().rev());
        row.extend_from_slice(covariates);
        row
    }

    fn design(&self, series: &TimeSeries) -> Result<(Vec<Vec<f64>>, Vec<f64>)> {
        let values = series.primary_values();
        if values.len() <= self.lags {
            return Err(ForecastError::InsufficientData {
                needed: self.lags + 1,
                got: values.len(),
            });
        }
        validate_covariates(series.covariates(), &self.covariate_names, values.len())?;

        let columns: Vec<&[f64]> = self
            .covariate_names
            .iter()
            .filter_map(|name| series.covariate(name))
            .collect();

        let rows = (self.lags..values.len())
            .map(|t| {
                let current: Vec<f64> = columns.iter().map(|c| c[t]).collect();
                self.feature_row(&values[t - self.lags..t], &current)
            })
            .collect();
        Ok((rows, values[self.lags..].to_vec()))
    }

    fn forecast_from(
        &self,
        history: &[f64],
        horizon: usize,
        future: Option<&Covariates>,
    ) -> Result<Forecast> {
        let ols = self.ols.as_ref().ok_or(ForecastError::FitRequired)?;
        if history.len() < self.lags {
            return Err(ForecastError::InsufficientData {
                needed: self.lags,
                got: history.len(),
            });
        }

        let future_columns: Vec<&[f64]> = match future {
            Some(future) => {
                validate_covariates(future, &self.covariate_names, horizon)?;
                self.covariate_names
                    .iter()
                    .filter_map(|name| future.get(name).map(|v| v.as_slice()))
                    .collect()
            }
            None if self.has_exog() => {
                return Err(ForecastError::InvalidParameter(format!(
                    "{} was fit with covariates; future values are required",
                    self.name()
                )))
            }
            None => Vec::new(),
        };

        let mut window = history[history.len() - self.lags..].to_vec();
        let mut predictions = Vec::with_capacity(horizon);
        for h in 0..horizon {
            let current: Vec<f64> = future_columns.iter().map(|c| c[h]).collect();
            let next = ols.predict_row(&self.feature_row(&window, &current))?;
            predictions.push(next);
            window.remove(0);
            window.push(next);
        }
        Ok(Forecast::from_values(predictions))
    }
}

impl Forecaster for LagRegression {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        self.fit_many(std::slice::from_ref(series))
    }

    /// Fit shared coefficients on several series at once.
    ///
    /// Fitted values, residuals and the default forecast origin refer to the
    /// first series.
    fn fit_many(&mut self, series: &[TimeSeries]) -> Result<()> {
        if self.lags == 0 {
            return Err(ForecastError::InvalidParameter(
                "lags must be at least 1".to_string(),
            ));
        }
        let first = series.first().ok_or(ForecastError::EmptyData)?;

        let mut rows = Vec::new();
        let mut targets = Vec::new();
        for s in series {
            let (r, y) = self.design(s)?;
            rows.extend(r);
            targets.extend(y);
        }
        if rows.len() < self.num_params() {
            return Err(ForecastError::InsufficientData {
                needed: self.min_train_len(),
                got: first.len(),
            });
        }

        let ols = ols_fit(&rows, &targets, self.fit_intercept)?;
        debug!(
            series = series.len(),
            samples = rows.len(),
            lags = self.lags,
            covariates = self.covariate_names.len(),
            "fitted lag regression"
        );

        let values = first.primary_values();
        let (first_rows, _) = self.design(first)?;
        let mut fitted = vec![f64::NAN; self.lags];
        fitted.extend(ols.predict(&first_rows)?);
        let residuals = values.iter().zip(&fitted).map(|(y, f)| y - f).collect();

        self.history = Some(values[values.len() - self.lags..].to_vec());
        self.ols = Some(ols);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let history = self.history.as_ref().ok_or(ForecastError::FitRequired)?;
        self.forecast_from(history, horizon, None)
    }

    fn min_train_len(&self) -> usize {
        self.lags + self.num_params()
    }

    fn supports_exog(&self) -> bool {
        true
    }

    fn has_exog(&self) -> bool {
        !self.covariate_names.is_empty()
    }

    fn exog_names(&self) -> Option<&[String]> {
        if self.covariate_names.is_empty() {
            None
        } else {
            Some(&self.covariate_names)
        }
    }

    fn predict_with_exog(&self, horizon: usize, future: &Covariates) -> Result<Forecast> {
        let history = self.history.as_ref().ok_or(ForecastError::FitRequired)?;
        self.forecast_from(history, horizon, Some(future))
    }

    fn is_global(&self) -> bool {
        true
    }

    fn predict_series(
        &self,
        series: &TimeSeries,
        horizon: usize,
        future: Option<&Covariates>,
    ) -> Result<Forecast> {
        self.forecast_from(series.primary_values(), horizon, future)
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "LagRegression"
    }
}
