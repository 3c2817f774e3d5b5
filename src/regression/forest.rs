//! Bagged ensemble of regression trees.

use super::traits::{check_rows, check_training_input, Regressor};
use super::tree::DecisionTreeRegressor;
use crate::error::{ForecastError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random forest regressor.
///
/// Each tree is grown on a bootstrap sample of the rows; the prediction is
/// the mean over all trees. Set [`with_random_state`](Self::with_random_state)
/// for reproducible fits.
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    n_estimators: usize,
    max_depth: Option<usize>,
    min_samples_split: usize,
    random_state: Option<u64>,
    trees: Vec<DecisionTreeRegressor>,
    n_features: usize,
}

impl Default for RandomForestRegressor {
    fn default() -> Self {
        Self::new(100)
    }
}

impl RandomForestRegressor {
    /// Create a forest of `n_estimators` unbounded trees.
    pub fn new(n_estimators: usize) -> Self {
        Self {
            n_estimators,
            max_depth: None,
            min_samples_split: 2,
            random_state: None,
            trees: Vec::new(),
            n_features: 0,
        }
    }

    /// Limit the depth of every tree.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split.max(2);
        self
    }

    /// Seed the bootstrap sampler.
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Number of trees grown by `fit`.
    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    /// Fitted trees.
    pub fn trees(&self) -> &[DecisionTreeRegressor] {
        &self.trees
    }

    fn make_tree(&self) -> DecisionTreeRegressor {
        let tree = DecisionTreeRegressor::new().with_min_samples_split(self.min_samples_split);
        match self.max_depth {
            Some(depth) => tree.with_max_depth(depth),
            None => tree,
        }
    }
}

impl Regressor for RandomForestRegressor {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(ForecastError::InvalidParameter(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        let n_features = check_training_input(x, y)?;
        let n = y.len();

        let mut rng = match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut trees = Vec::with_capacity(self.n_estimators);
        for _ in 0..self.n_estimators {
            let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            let mut tree = self.make_tree();
            tree.fit_indices(x, y, sample)?;
            trees.push(tree);
        }

        tracing::trace!(trees = trees.len(), rows = n, "random forest fitted");
        self.trees = trees;
        self.n_features = n_features;
        Ok(())
    }

    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        if self.trees.is_empty() {
            return Err(ForecastError::FitRequired);
        }
        check_rows(x, self.n_features)?;

        let mut sums = vec![0.0; x.len()];
        for tree in &self.trees {
            for (sum, p) in sums.iter_mut().zip(tree.predict(x)?) {
                *sum += p;
            }
        }
        let count = self.trees.len() as f64;
        Ok(sums.into_iter().map(|s| s / count).collect())
    }

    fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    fn name(&self) -> &str {
        "RandomForestRegressor"
    }
}
