//! Deterministic train/eval partitioning.
//!
//! The same (dataset, ratio, seed) triple always yields an identical
//! partition: row indices are shuffled with a seeded [`StdRng`] and the
//! first `round(ratio * n)` go to the evaluation set.

use super::Dataset;
use crate::{PublicarError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// A partition of a dataset into training and evaluation subsets.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: Dataset,
    pub eval: Dataset,
}

/// Split a dataset into train/eval subsets.
///
/// The evaluation set holds `round(ratio * n_samples)` rows; the training
/// set holds the remainder. Errors if the dataset is empty or the ratio is
/// outside the open interval (0, 1).
pub fn train_test_split(dataset: &Dataset, ratio: f64, seed: u64) -> Result<TrainTestSplit> {
    if dataset.n_samples() == 0 {
        return Err(PublicarError::EmptyDataset);
    }
    if !(ratio > 0.0 && ratio < 1.0) {
        return Err(PublicarError::InvalidRatio { ratio });
    }

    let n = dataset.n_samples();
    let n_eval = (ratio * n as f64).round() as usize;

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (eval_idx, train_idx) = indices.split_at(n_eval);
    Ok(TrainTestSplit {
        train: dataset.select(train_idx),
        eval: dataset.select(eval_idx),
    })
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use ndarray::Array2;
    use proptest::prelude::*;

    fn dataset(n: usize) -> Dataset {
        let features = Array2::from_shape_fn((n, 3), |(i, j)| (i + j) as f64);
        let labels = (0..n).map(|i| i % 2).collect();
        Dataset::new(
            features,
            labels,
            vec!["a".into(), "b".into(), "c".into()],
        )
        .unwrap()
    }

    proptest! {
        #[test]
        fn prop_split_sizes_add_up(n in 1usize..300, ratio in 0.01f64..0.99, seed in any::<u64>()) {
            let ds = dataset(n);
            let split = train_test_split(&ds, ratio, seed).unwrap();
            prop_assert_eq!(split.eval.n_samples(), (ratio * n as f64).round() as usize);
            prop_assert_eq!(split.train.n_samples() + split.eval.n_samples(), n);
        }

        #[test]
        fn prop_split_deterministic(n in 1usize..200, seed in any::<u64>()) {
            let ds = dataset(n);
            let a = train_test_split(&ds, 0.3, seed).unwrap();
            let b = train_test_split(&ds, 0.3, seed).unwrap();
            prop_assert_eq!(a.train.features(), b.train.features());
            prop_assert_eq!(a.eval.features(), b.eval.features());
        }

        #[test]
        fn prop_split_partitions_all_rows(n in 2usize..200, seed in any::<u64>()) {
            let ds = dataset(n);
            let split = train_test_split(&ds, 0.25, seed).unwrap();
            // Every original first-column value appears exactly once across both sets.
            let mut seen: Vec<f64> = split
                .train
                .features()
                .column(0)
                .iter()
                .chain(split.eval.features().column(0).iter())
                .copied()
                .collect();
            seen.sort_by(f64::total_cmp);
            let expected: Vec<f64> = (0..n).map(|i| i as f64).collect();
            prop_assert_eq!(seen, expected);
        }
    }
}
