//! Classification evaluation: accuracy and confusion matrix.
//!
//! Pure functions of the model and evaluation split; the model is never
//! mutated. Accuracy is the fraction of rows whose predicted label equals
//! the true label, always in `[0, 1]`.

use crate::data::Dataset;
use crate::train::RandomForestClassifier;
use crate::{PublicarError, Result};
use std::fmt;

/// Evaluation summary for a model on a held-out split.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Fraction of correct predictions, in `[0, 1]`.
    pub accuracy: f64,
    /// Per-class breakdown of predictions.
    pub confusion: ConfusionMatrix,
}

/// Confusion matrix: element `[i][j]` counts samples with true label `i`
/// predicted as `j`.
#[derive(Debug, Clone)]
pub struct ConfusionMatrix {
    matrix: Vec<Vec<usize>>,
    n_classes: usize,
}

impl ConfusionMatrix {
    /// Build from parallel prediction and truth slices.
    pub fn from_predictions(predictions: &[usize], truth: &[usize]) -> Result<Self> {
        if predictions.len() != truth.len() {
            return Err(PublicarError::RowCountMismatch {
                features: predictions.len(),
                labels: truth.len(),
            });
        }
        let n_classes = predictions
            .iter()
            .chain(truth.iter())
            .max()
            .map_or(0, |&m| m + 1);
        let mut matrix = vec![vec![0; n_classes]; n_classes];
        for (&pred, &actual) in predictions.iter().zip(truth) {
            matrix[actual][pred] += 1;
        }
        Ok(Self { matrix, n_classes })
    }

    /// Count at `[true_label][predicted_label]`.
    pub fn get(&self, true_label: usize, predicted_label: usize) -> usize {
        self.matrix[true_label][predicted_label]
    }

    /// Number of classes.
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Total samples counted.
    pub fn total(&self) -> usize {
        self.matrix.iter().flatten().sum()
    }

    /// Correct predictions (diagonal sum).
    pub fn correct(&self) -> usize {
        (0..self.n_classes).map(|i| self.matrix[i][i]).sum()
    }

    /// Accuracy derived from the matrix; 0.0 for an empty matrix.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.correct() as f64 / total as f64
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "true\\pred")?;
        for row in &self.matrix {
            for count in row {
                write!(f, "{count:>6}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Fraction of positions where prediction equals truth.
///
/// Both slices must have the same length and at least one element.
pub fn accuracy(predictions: &[usize], truth: &[usize]) -> Result<f64> {
    if predictions.len() != truth.len() {
        return Err(PublicarError::RowCountMismatch {
            features: predictions.len(),
            labels: truth.len(),
        });
    }
    if predictions.is_empty() {
        return Err(PublicarError::EmptyDataset);
    }
    let correct = predictions.iter().zip(truth).filter(|(p, t)| p == t).count();
    Ok(correct as f64 / predictions.len() as f64)
}

/// Score a fitted model against an evaluation split.
pub fn evaluate(model: &RandomForestClassifier, dataset: &Dataset) -> Result<Evaluation> {
    let predictions = model.predict(dataset.features())?;
    Ok(Evaluation {
        accuracy: accuracy(&predictions, dataset.labels())?,
        confusion: ConfusionMatrix::from_predictions(&predictions, dataset.labels())?,
    })
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_accuracy_in_unit_interval(
            pairs in prop::collection::vec((0usize..5, 0usize..5), 1..200)
        ) {
            let predictions: Vec<usize> = pairs.iter().map(|&(p, _)| p).collect();
            let truth: Vec<usize> = pairs.iter().map(|&(_, t)| t).collect();
            let acc = accuracy(&predictions, &truth).unwrap();
            prop_assert!((0.0..=1.0).contains(&acc));
        }

        #[test]
        fn prop_self_accuracy_is_one(labels in prop::collection::vec(0usize..5, 1..200)) {
            let acc = accuracy(&labels, &labels).unwrap();
            prop_assert_eq!(acc, 1.0);
        }

        #[test]
        fn prop_confusion_total_matches_input_len(
            pairs in prop::collection::vec((0usize..4, 0usize..4), 1..100)
        ) {
            let predictions: Vec<usize> = pairs.iter().map(|&(p, _)| p).collect();
            let truth: Vec<usize> = pairs.iter().map(|&(_, t)| t).collect();
            let cm = ConfusionMatrix::from_predictions(&predictions, &truth).unwrap();
            prop_assert_eq!(cm.total(), pairs.len());
        }
    }
}
