//! Random-forest classifier training.
//!
//! Bagging over seeded bootstrap samples with per-node feature subsampling.
//! Training is deterministic for a fixed seed and hyperparameter set: tree
//! `t` draws from `StdRng::seed_from_u64(seed + t)`, so runs are repeatable
//! and individual trees are independent of forest size.

mod tree;

use crate::data::Dataset;
use crate::{PublicarError, Result};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tree::{DecisionTree, TreeParams};

/// Random-forest hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestParams {
    /// Number of trees in the ensemble.
    pub n_trees: usize,
    /// Maximum tree depth.
    pub max_depth: usize,
    /// Minimum rows required to attempt a split.
    pub min_samples_split: usize,
    /// Master random seed.
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 16,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

impl ForestParams {
    /// Set the ensemble size.
    pub fn with_n_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees;
        self
    }

    /// Set the maximum tree depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// A fitted random-forest classifier. Opaque and immutable after training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTree>,
    n_features: usize,
    n_classes: usize,
    seed: u64,
}

impl RandomForestClassifier {
    /// Fit a forest on the given training dataset.
    pub fn fit(dataset: &Dataset, params: &ForestParams) -> Result<Self> {
        let n = dataset.n_samples();
        if n == 0 {
            return Err(PublicarError::EmptyDataset);
        }
        if params.n_trees == 0 {
            return Err(PublicarError::Training(
                "ensemble size must be at least 1".to_string(),
            ));
        }
        if dataset.n_features() == 0 {
            return Err(PublicarError::Training(
                "dataset has no feature columns".to_string(),
            ));
        }

        let n_classes = dataset.n_classes();
        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            n_split_features: split_features_per_node(dataset.n_features()),
        };

        let trees = (0..params.n_trees)
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(params.seed.wrapping_add(t as u64));
                let rows: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
                DecisionTree::fit(
                    dataset.features(),
                    dataset.labels(),
                    &rows,
                    n_classes,
                    &tree_params,
                    &mut rng,
                )
            })
            .collect();

        Ok(Self {
            trees,
            n_features: dataset.n_features(),
            n_classes,
            seed: params.seed,
        })
    }

    /// Predict a label for every row of the given feature matrix.
    pub fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>> {
        if features.ncols() != self.n_features {
            return Err(PublicarError::FeatureCountMismatch {
                expected: self.n_features,
                actual: features.ncols(),
            });
        }
        Ok(features
            .rows()
            .into_iter()
            .map(|row| {
                let mut votes = vec![0usize; self.n_classes.max(1)];
                for tree in &self.trees {
                    votes[tree.predict_row(row)] += 1;
                }
                // Ties resolve to the lowest label for determinism.
                votes
                    .iter()
                    .enumerate()
                    .max_by_key(|&(label, &count)| (count, std::cmp::Reverse(label)))
                    .map_or(0, |(label, _)| label)
            })
            .collect())
    }

    /// Number of trees in the fitted ensemble.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of features the forest was fitted on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of classes the forest can predict.
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }
}

/// Features examined per split: `ceil(sqrt(n_features))`, at least 1.
fn split_features_per_node(n_features: usize) -> usize {
    ((n_features as f64).sqrt().ceil() as usize).max(1)
}
