//! CART decision tree used as the random-forest base learner.
//!
//! Nodes live in a flat `Vec` with index-based child links; the root is
//! always node 0. Splits are chosen greedily by Gini impurity over a random
//! feature subset per node.

use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use serde::{Deserialize, Serialize};

/// Per-tree growth limits, fixed by the forest before building.
#[derive(Debug, Clone)]
pub(crate) struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    /// Number of candidate features examined at each split.
    pub n_split_features: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        label: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted decision tree. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct DecisionTree {
    nodes: Vec<Node>,
}

struct TreeBuilder<'a> {
    features: &'a Array2<f64>,
    labels: &'a [usize],
    n_classes: usize,
    params: &'a TreeParams,
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Grow a tree over the given row indices (a bootstrap sample).
    pub fn fit(
        features: &Array2<f64>,
        labels: &[usize],
        rows: &[usize],
        n_classes: usize,
        params: &TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        let mut builder = TreeBuilder {
            features,
            labels,
            n_classes,
            params,
            nodes: Vec::new(),
        };
        builder.grow(rows, 0, rng);
        Self {
            nodes: builder.nodes,
        }
    }

    /// Predict the label for a single feature row.
    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> usize {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { label } => return *label,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Number of nodes in the tree.
    #[cfg(test)]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }
}

impl TreeBuilder<'_> {
    fn class_counts(&self, rows: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &r in rows {
            counts[self.labels[r]] += 1;
        }
        counts
    }

    fn majority(counts: &[usize]) -> usize {
        counts
            .iter()
            .enumerate()
            .max_by_key(|&(label, &count)| (count, std::cmp::Reverse(label)))
            .map_or(0, |(label, _)| label)
    }

    /// Build the subtree for `rows`, returning its node index.
    fn grow(&mut self, rows: &[usize], depth: usize, rng: &mut StdRng) -> usize {
        let counts = self.class_counts(rows);
        let label = Self::majority(&counts);
        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;

        if pure || depth >= self.params.max_depth || rows.len() < self.params.min_samples_split {
            self.nodes.push(Node::Leaf { label });
            return self.nodes.len() - 1;
        }

        let parent_impurity = gini(&counts, rows.len());
        let best = self.best_split(rows, &counts, rng);
        let Some((feature, threshold, impurity)) = best else {
            self.nodes.push(Node::Leaf { label });
            return self.nodes.len() - 1;
        };
        if impurity >= parent_impurity - 1e-12 {
            self.nodes.push(Node::Leaf { label });
            return self.nodes.len() - 1;
        }

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .iter()
            .copied()
            .partition(|&r| self.features[[r, feature]] <= threshold);
        if left_rows.is_empty() || right_rows.is_empty() {
            self.nodes.push(Node::Leaf { label });
            return self.nodes.len() - 1;
        }

        // Reserve the split slot before recursing so the root stays at index 0.
        let index = self.nodes.len();
        self.nodes.push(Node::Leaf { label });
        let left = self.grow(&left_rows, depth + 1, rng);
        let right = self.grow(&right_rows, depth + 1, rng);
        self.nodes[index] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        index
    }

    /// Greedy search over a sampled feature subset; returns
    /// (feature, threshold, weighted child impurity) for the best cut found.
    fn best_split(
        &self,
        rows: &[usize],
        counts: &[usize],
        rng: &mut StdRng,
    ) -> Option<(usize, f64, f64)> {
        let n_features = self.features.ncols();
        let k = self.params.n_split_features.clamp(1, n_features);
        let candidates = sample(rng, n_features, k);

        let total = rows.len();
        let mut best: Option<(usize, f64, f64)> = None;

        for feature in candidates {
            let mut ordered: Vec<(f64, usize)> = rows
                .iter()
                .map(|&r| (self.features[[r, feature]], self.labels[r]))
                .collect();
            ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_counts = vec![0usize; self.n_classes];
            for i in 1..total {
                left_counts[ordered[i - 1].1] += 1;
                // Only cut between distinct feature values.
                if ordered[i].0 <= ordered[i - 1].0 {
                    continue;
                }
                let right_counts: Vec<usize> = counts
                    .iter()
                    .zip(&left_counts)
                    .map(|(&c, &l)| c - l)
                    .collect();
                let impurity = (i as f64 * gini(&left_counts, i)
                    + (total - i) as f64 * gini(&right_counts, total - i))
                    / total as f64;
                if best.is_none_or(|(_, _, b)| impurity < b) {
                    let threshold = (ordered[i - 1].0 + ordered[i].0) / 2.0;
                    best = Some((feature, threshold, impurity));
                }
            }
        }
        best
    }
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let sum_sq: f64 = counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total as f64;
            p * p
        })
        .sum();
    1.0 - sum_sq
}
