//! Stacking demo: compare base forecasters with regression ensembles.
//!
//! Run with: cargo run --example stacking
//! Set RUST_LOG=anofox_stacking=debug to see the ensemble's training steps.

use anofox_stacking::core::TimeSeries;
use anofox_stacking::models::baseline::{
    Naive, RandomWalkWithDrift, SeasonalNaive, SimpleMovingAverage,
};
use anofox_stacking::models::ensemble::{RegressionEnsemble, TrainingStrategy};
use anofox_stacking::models::{BoxedForecaster, Forecaster, LagRegression};
use anofox_stacking::regression::{LinearRegression, RandomForestRegressor};
use anofox_stacking::utils::calculate_metrics;
use anofox_stacking::utils::generators::{add_series, gaussian_series, linear_series, sine_series};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const PERIOD: usize = 12;
const HORIZON: usize = 12;

fn base_models() -> Vec<BoxedForecaster> {
    vec![
        Box::new(Naive::new()),
        Box::new(RandomWalkWithDrift::new()),
        Box::new(SeasonalNaive::new(PERIOD)),
        Box::new(SimpleMovingAverage::new(PERIOD)),
        Box::new(LagRegression::new(PERIOD)),
    ]
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "anofox_stacking=info".into()),
        )
        .init();

    println!("=== anofox-stacking demo ===\n");

    // Trend + yearly season + noise, last HORIZON points kept for scoring
    let n = 120;
    let trend = linear_series(n, 50.0, 0.3);
    let season = sine_series(n, 6.0, PERIOD as f64, 0.0);
    let noise = gaussian_series(n, 0.0, 1.0, 2024).unwrap();
    let full = add_series(&add_series(&trend, &season).unwrap(), &noise).unwrap();

    let train = full.slice(0, n - HORIZON).unwrap();
    let actual = &full.primary_values()[n - HORIZON..];
    println!(
        "Series: {} observations, training on {}, scoring the last {}",
        full.len(),
        train.len(),
        HORIZON
    );

    println!("\n--- Base forecasters ---");
    for mut model in base_models() {
        model.fit(&train).unwrap();
        report(model.name(), &*model, actual);
    }

    println!("\n--- Regression ensembles ---");
    let configs: Vec<(&str, RegressionEnsemble)> = vec![
        (
            "OLS, holdout",
            RegressionEnsemble::new(base_models(), 24),
        ),
        (
            "OLS + intercept, historical",
            RegressionEnsemble::new(base_models(), 24)
                .with_regressor(Box::new(LinearRegression::new().with_intercept(true)))
                .with_strategy(TrainingStrategy::HistoricalForecasts),
        ),
        (
            "Random forest, no retrain",
            RegressionEnsemble::new(base_models(), 24)
                .with_regressor(Box::new(
                    RandomForestRegressor::new(100)
                        .with_max_depth(4)
                        .with_random_state(7),
                ))
                .with_retrain(false),
        ),
    ];

    for (label, mut ensemble) in configs {
        ensemble.fit(&train).unwrap();
        report(label, &ensemble, actual);
        if let Some(weights) = ensemble.coefficients() {
            let names: Vec<&str> = ensemble.models().iter().map(|m| m.name()).collect();
            for (name, w) in names.iter().zip(weights) {
                println!("    weight {:<20} {:>8.4}", name, w);
            }
        }
    }

    println!("\n--- Rejected configuration ---");
    let short: TimeSeries = train.slice(0, 30).unwrap();
    let mut ensemble = RegressionEnsemble::new(base_models(), 10);
    match ensemble.fit(&short) {
        Ok(()) => println!("unexpectedly accepted"),
        Err(e) => println!("{}", e),
    }
}

fn report(label: &str, model: &dyn Forecaster, actual: &[f64]) {
    let forecast = model.predict(actual.len()).unwrap();
    let metrics = calculate_metrics(actual, forecast.primary()).unwrap();
    println!(
        "{:<30} MAE {:>8.3}  RMSE {:>8.3}  sMAPE {:>7.3}",
        label, metrics.mae, metrics.rmse, metrics.smape
    );
}
