//! CART regression tree.
//!
//! Splits greedily on the feature/threshold pair with the largest reduction
//! in squared error. Leaves predict the mean target of their samples.

use super::traits::{check_rows, check_training_input, Regressor};
use crate::error::{ForecastError, Result};

#[derive(Debug, Clone)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn predict(&self, row: &[f64]) -> f64 {
        let mut node = self;
        loop {
            match node {
                Node::Leaf(value) => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    fn depth(&self) -> usize {
        match self {
            Node::Leaf(_) => 0,
            Node::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn leaves(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Split { left, right, .. } => left.leaves() + right.leaves(),
        }
    }
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    /// Number of samples (in sorted order) going left.
    left_len: usize,
    sorted: Vec<usize>,
}

/// Regression tree with variance-reduction splits.
#[derive(Debug, Clone)]
pub struct DecisionTreeRegressor {
    max_depth: Option<usize>,
    min_samples_split: usize,
    root: Option<Node>,
    n_features: usize,
}

impl Default for DecisionTreeRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTreeRegressor {
    /// Create an unbounded tree that splits nodes with at least 2 samples.
    pub fn new() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            root: None,
            n_features: 0,
        }
    }

    /// Stop splitting below `max_depth` levels.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Minimum samples a node needs to be split (at least 2).
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split.max(2);
        self
    }

    /// Depth of the fitted tree (0 for a single leaf).
    pub fn depth(&self) -> Option<usize> {
        self.root.as_ref().map(Node::depth)
    }

    /// Number of leaves of the fitted tree.
    pub fn leaf_count(&self) -> Option<usize> {
        self.root.as_ref().map(Node::leaves)
    }

    /// Fit on the rows selected by `indices` (repeats allowed).
    pub(crate) fn fit_indices(
        &mut self,
        x: &[Vec<f64>],
        y: &[f64],
        indices: Vec<usize>,
    ) -> Result<()> {
        if indices.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        self.n_features = x.first().map(|r| r.len()).unwrap_or(0);
        self.root = Some(self.build(x, y, indices, 0));
        Ok(())
    }

    fn build(&self, x: &[Vec<f64>], y: &[f64], indices: Vec<usize>, depth: usize) -> Node {
        let mean = indices.iter().map(|&i| y[i]).sum::<f64>() / indices.len() as f64;

        let depth_reached = self.max_depth.is_some_and(|d| depth >= d);
        if depth_reached || indices.len() < self.min_samples_split {
            return Node::Leaf(mean);
        }

        match self.best_split(x, y, &indices) {
            Some(split) => {
                let mut sorted = split.sorted;
                let right = sorted.split_off(split.left_len);
                Node::Split {
                    feature: split.feature,
                    threshold: split.threshold,
                    left: Box::new(self.build(x, y, sorted, depth + 1)),
                    right: Box::new(self.build(x, y, right, depth + 1)),
                }
            }
            None => Node::Leaf(mean),
        }
    }

    fn best_split(&self, x: &[Vec<f64>], y: &[f64], indices: &[usize]) -> Option<BestSplit> {
        let n = indices.len();
        let total_sum: f64 = indices.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();
        let parent_sse = total_sq - total_sum * total_sum / n as f64;
        if parent_sse <= 1e-12 {
            return None;
        }

        let mut best: Option<(f64, BestSplit)> = None;
        for feature in 0..self.n_features {
            let mut sorted = indices.to_vec();
            sorted.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            let mut best_here: Option<(f64, usize)> = None;
            for k in 1..n {
                let yi = y[sorted[k - 1]];
                left_sum += yi;
                left_sq += yi * yi;

                // Only cut between distinct feature values
                if x[sorted[k - 1]][feature] == x[sorted[k]][feature] {
                    continue;
                }
                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / k as f64)
                    + (right_sq - right_sum * right_sum / (n - k) as f64);
                if best_here.map_or(true, |(b, _)| sse < b) {
                    best_here = Some((sse, k));
                }
            }

            if let Some((sse, k)) = best_here {
                if best.as_ref().map_or(true, |(b, _)| sse < *b) {
                    let threshold = 0.5 * (x[sorted[k - 1]][feature] + x[sorted[k]][feature]);
                    best = Some((
                        sse,
                        BestSplit {
                            feature,
                            threshold,
                            left_len: k,
                            sorted,
                        },
                    ));
                }
            }
        }

        best.filter(|(sse, _)| *sse < parent_sse).map(|(_, s)| s)
    }
}

impl Regressor for DecisionTreeRegressor {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        check_training_input(x, y)?;
        self.fit_indices(x, y, (0..y.len()).collect())
    }

    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        let root = self.root.as_ref().ok_or(ForecastError::FitRequired)?;
        check_rows(x, self.n_features)?;
        Ok(x.iter().map(|row| root.predict(row)).collect())
    }

    fn is_fitted(&self) -> bool {
        self.root.is_some()
    }

    fn name(&self) -> &str {
        "DecisionTreeRegressor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn step_function_is_learned_exactly() {
        let x: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let y: Vec<f64> = (0..10).map(|i| if i < 5 { 1.0 } else { 7.0 }).collect();

        let mut tree = DecisionTreeRegressor::new();
        tree.fit(&x, &y).unwrap();

        assert_eq!(tree.depth(), Some(1));
        assert_eq!(tree.leaf_count(), Some(2));
        let pred = tree.predict(&[vec![4.4], vec![4.6]]).unwrap();
        assert_relative_eq!(pred[0], 1.0);
        assert_relative_eq!(pred[1], 7.0);
    }

    #[test]
    fn max_depth_limits_growth() {
        let x: Vec<Vec<f64>> = (0..32).map(|i| vec![i as f64]).collect();
        let y: Vec<f64> = (0..32).map(|i| (i * i) as f64).collect();

        let mut tree = DecisionTreeRegressor::new().with_max_depth(2);
        tree.fit(&x, &y).unwrap();
        assert_eq!(tree.depth(), Some(2));
        assert!(tree.leaf_count().unwrap() <= 4);
    }

    #[test]
    fn unbounded_tree_interpolates_training_data() {
        let x: Vec<Vec<f64>> = (0..12).map(|i| vec![i as f64, (i % 3) as f64]).collect();
        let y: Vec<f64> = (0..12).map(|i| ((i * 5) % 7) as f64).collect();

        let mut tree = DecisionTreeRegressor::new();
        tree.fit(&x, &y).unwrap();
        let pred = tree.predict(&x).unwrap();
        for (p, t) in pred.iter().zip(&y) {
            assert_relative_eq!(p, t);
        }
    }

    #[test]
    fn constant_target_is_a_single_leaf() {
        let x: Vec<Vec<f64>> = (0..5).map(|i| vec![i as f64]).collect();
        let mut tree = DecisionTreeRegressor::new().with_min_samples_split(0);
        tree.fit(&x, &[3.0; 5]).unwrap();
        assert_eq!(tree.leaf_count(), Some(1));
        assert_eq!(tree.predict(&[vec![100.0]]).unwrap(), vec![3.0]);
    }

    #[test]
    fn requires_fit_and_matching_width() {
        let tree = DecisionTreeRegressor::default();
        assert!(matches!(
            tree.predict(&[vec![1.0]]),
            Err(ForecastError::FitRequired)
        ));

        let mut tree = DecisionTreeRegressor::new();
        tree.fit(&[vec![1.0, 2.0], vec![2.0, 3.0]], &[1.0, 2.0])
            .unwrap();
        assert!(tree.predict(&[vec![1.0]]).is_err());
    }
}
