//! Decision tree classifier

use crate::error::{MlError, Result};
use ndarray::{Array1, Array2};
use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Decision tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf node holding the share of positive training rows that reached it
    Leaf {
        positive_fraction: f64,
        n_samples: usize,
    },
    /// Internal node with split
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
        impurity: f64,
    },
}

/// Impurity criterion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    /// Gini impurity
    Gini,
    /// Shannon entropy
    Entropy,
}

impl Criterion {
    /// Impurity of a node holding `positives` positive rows out of `total`
    pub fn impurity(self, positives: usize, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        let p = positives as f64 / total as f64;
        let q = 1.0 - p;
        match self {
            Criterion::Gini => 1.0 - p * p - q * q,
            Criterion::Entropy => -[p, q]
                .iter()
                .filter(|&&v| v > 0.0)
                .map(|&v| v * v.log2())
                .sum::<f64>(),
        }
    }
}

/// Best split found for one candidate feature
#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    gain: f64,
}

/// Binary decision tree classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Tree root
    root: Option<TreeNode>,
    /// Maximum depth
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Features drawn per node (None = all)
    pub max_features: Option<usize>,
    /// Impurity criterion
    pub criterion: Criterion,
    /// Seed for per-node feature sampling
    pub random_state: u64,
    /// Number of features
    n_features: usize,
    /// Feature importances
    feature_importances: Option<Array1<f64>>,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTree {
    /// Create a new classifier tree
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            criterion: Criterion::Gini,
            random_state: 0,
            n_features: 0,
            feature_importances: None,
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set minimum samples to split
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples;
        self
    }

    /// Set minimum samples in leaf
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }

    /// Set number of features drawn per node
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }

    /// Set criterion
    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Set random state
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Fit the tree to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<bool>) -> Result<&mut Self> {
        check_training_input(x, y)?;

        let n_features = x.ncols();
        self.n_features = n_features;

        let mut rng = ChaCha8Rng::seed_from_u64(self.random_state);
        let mut importances = vec![0.0; n_features];
        let indices: Vec<usize> = (0..x.nrows()).collect();
        self.root = Some(self.build_tree(x, y, &indices, 0, &mut importances, &mut rng));

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }
        self.feature_importances = Some(Array1::from_vec(importances));

        Ok(self)
    }

    fn build_tree(
        &self,
        x: &Array2<f64>,
        y: &Array1<bool>,
        indices: &[usize],
        depth: usize,
        importances: &mut [f64],
        rng: &mut ChaCha8Rng,
    ) -> TreeNode {
        let n_samples = indices.len();
        let positives = indices.iter().filter(|&&i| y[i]).count();
        let leaf = TreeNode::Leaf {
            positive_fraction: positives as f64 / n_samples.max(1) as f64,
            n_samples,
        };

        let should_stop = n_samples < self.min_samples_split
            || n_samples < 2 * self.min_samples_leaf
            || self.max_depth.map_or(false, |d| depth >= d)
            || positives == 0
            || positives == n_samples;
        if should_stop {
            return leaf;
        }

        let impurity = self.criterion.impurity(positives, n_samples);
        let candidates = self.draw_features(rng);

        let Some(best) = self.find_best_split(x, y, indices, &candidates, positives, impurity) else {
            return leaf;
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[[i, best.feature_idx]] <= best.threshold);

        importances[best.feature_idx] += n_samples as f64 * best.gain;

        let left = Box::new(self.build_tree(x, y, &left_indices, depth + 1, importances, rng));
        let right = Box::new(self.build_tree(x, y, &right_indices, depth + 1, importances, rng));

        TreeNode::Split {
            feature_idx: best.feature_idx,
            threshold: best.threshold,
            left,
            right,
            n_samples,
            impurity,
        }
    }

    fn draw_features(&self, rng: &mut ChaCha8Rng) -> Vec<usize> {
        let k = self.max_features.unwrap_or(self.n_features).clamp(1, self.n_features);
        if k == self.n_features {
            (0..self.n_features).collect()
        } else {
            index::sample(rng, self.n_features, k).into_vec()
        }
    }

    fn find_best_split(
        &self,
        x: &Array2<f64>,
        y: &Array1<bool>,
        indices: &[usize],
        candidates: &[usize],
        positives: usize,
        parent_impurity: f64,
    ) -> Option<SplitCandidate> {
        let per_feature: Vec<Option<SplitCandidate>> = candidates
            .par_iter()
            .map(|&feature_idx| {
                self.best_split_for_feature(x, y, indices, feature_idx, positives, parent_impurity)
            })
            .collect();

        // Ties go to the earlier candidate so results don't depend on scheduling.
        let mut best: Option<SplitCandidate> = None;
        for candidate in per_feature.into_iter().flatten() {
            if best.map_or(true, |b| candidate.gain > b.gain) {
                best = Some(candidate);
            }
        }
        best
    }

    fn best_split_for_feature(
        &self,
        x: &Array2<f64>,
        y: &Array1<bool>,
        indices: &[usize],
        feature_idx: usize,
        positives: usize,
        parent_impurity: f64,
    ) -> Option<SplitCandidate> {
        let mut pairs: Vec<(f64, bool)> = indices
            .iter()
            .map(|&i| (x[[i, feature_idx]], y[i]))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let n = pairs.len();
        let mut left_positives = 0usize;
        let mut best_gain = 0.0f64;
        let mut best_threshold = None;

        for i in 0..n - 1 {
            if pairs[i].1 {
                left_positives += 1;
            }
            if pairs[i].0 == pairs[i + 1].0 {
                continue;
            }

            let left_count = i + 1;
            let right_count = n - left_count;
            if left_count < self.min_samples_leaf || right_count < self.min_samples_leaf {
                continue;
            }

            let weighted = (left_count as f64 * self.criterion.impurity(left_positives, left_count)
                + right_count as f64
                    * self.criterion.impurity(positives - left_positives, right_count))
                / n as f64;

            let gain = parent_impurity - weighted;
            if gain > best_gain {
                best_gain = gain;
                let mut threshold = (pairs[i].0 + pairs[i + 1].0) / 2.0;
                if threshold >= pairs[i + 1].0 {
                    threshold = pairs[i].0;
                }
                best_threshold = Some(threshold);
            }
        }

        best_threshold.map(|threshold| SplitCandidate {
            feature_idx,
            threshold,
            gain: best_gain,
        })
    }

    /// Probability of the positive class for each row
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let root = self.root.as_ref().ok_or(MlError::ModelNotFitted)?;

        if x.ncols() != self.n_features {
            return Err(MlError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }

        Ok(x.rows()
            .into_iter()
            .map(|row| {
                let mut node = root;
                loop {
                    match node {
                        TreeNode::Leaf { positive_fraction, .. } => break *positive_fraction,
                        TreeNode::Split { feature_idx, threshold, left, right, .. } => {
                            node = if row[*feature_idx] <= *threshold { &**left } else { &**right };
                        }
                    }
                }
            })
            .collect())
    }

    /// Predict class labels
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<bool>> {
        Ok(self.predict_proba(x)?.mapv(|p| p > 0.5))
    }

    /// Get feature importances
    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }

    /// Depth of the tree in edges (a single leaf has depth 0)
    pub fn get_depth(&self) -> usize {
        fn depth(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => 1 + depth(left).max(depth(right)),
            }
        }
        self.root.as_ref().map_or(0, depth)
    }

    /// Get number of leaves
    pub fn get_n_leaves(&self) -> usize {
        fn leaves(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 1,
                TreeNode::Split { left, right, .. } => leaves(left) + leaves(right),
            }
        }
        self.root.as_ref().map_or(0, leaves)
    }
}

/// Reject inputs the tree builder cannot work with
pub(crate) fn check_training_input(x: &Array2<f64>, y: &Array1<bool>) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(MlError::ShapeError {
            expected: format!("y length = {}", x.nrows()),
            actual: format!("y length = {}", y.len()),
        });
    }
    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(MlError::TrainingError(format!(
            "cannot fit on an empty feature matrix ({} x {})",
            x.nrows(),
            x.ncols()
        )));
    }
    if let Some(pos) = x.iter().position(|v| !v.is_finite()) {
        let (row, col) = (pos / x.ncols(), pos % x.ncols());
        return Err(MlError::TrainingError(format!(
            "input contains NaN or infinity at row {}, column {}",
            row, col
        )));
    }
    Ok(())
}
