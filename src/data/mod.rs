//! Dataset container and deterministic train/eval splitting.
//!
//! A [`Dataset`] pairs a dense feature matrix with a parallel label vector.
//! The row-count invariant is checked once at construction and the dataset
//! is never mutated afterwards.

mod iris;
pub mod split;

pub use split::{train_test_split, TrainTestSplit};

use crate::{PublicarError, Result};
use ndarray::{Array2, ArrayView1, Axis};

/// An immutable labeled dataset: rows are samples, columns are named features.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Array2<f64>,
    labels: Vec<usize>,
    feature_names: Vec<String>,
}

impl Dataset {
    /// Create a dataset, validating that features and labels agree on row count.
    pub fn new(
        features: Array2<f64>,
        labels: Vec<usize>,
        feature_names: Vec<String>,
    ) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(PublicarError::RowCountMismatch {
                features: features.nrows(),
                labels: labels.len(),
            });
        }
        Ok(Self {
            features,
            labels,
            feature_names,
        })
    }

    /// The built-in Iris dataset: 150 samples, 4 features, 3 classes.
    pub fn iris() -> Self {
        iris::load()
    }

    /// Number of samples (rows).
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    /// Number of features (columns).
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Number of distinct classes, assuming labels are `0..n_classes`.
    pub fn n_classes(&self) -> usize {
        self.labels.iter().max().map_or(0, |&m| m + 1)
    }

    /// The feature matrix.
    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    /// The label vector, parallel to the feature rows.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Feature column names.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// A single sample row.
    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.features.row(index)
    }

    /// Build a new dataset from the given row indices, in order.
    pub fn select(&self, indices: &[usize]) -> Self {
        let features = self.features.select(Axis(0), indices);
        let labels = indices.iter().map(|&i| self.labels[i]).collect();
        Self {
            features,
            labels,
            feature_names: self.feature_names.clone(),
        }
    }
}
