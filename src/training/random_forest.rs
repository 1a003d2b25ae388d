//! Random Forest classifier

use super::config::ForestParams;
use super::decision_tree::{check_training_input, Criterion, DecisionTree};
use crate::error::{MlError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Named strategies for the number of features drawn per split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureStrategy {
    /// Square root of n_features
    Sqrt,
    /// Log2 of n_features
    Log2,
    /// All features
    All,
}

/// Strategy for max features
///
/// Serialises as a bare integer, a bare fraction or one of `"sqrt"`, `"log2"`,
/// `"all"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaxFeatures {
    /// Fixed number, clamped to n_features
    Fixed(usize),
    /// Fraction of n_features
    Fraction(f64),
    /// Named strategy
    Strategy(FeatureStrategy),
}

impl MaxFeatures {
    /// Resolve to a concrete feature count for `n_features` columns
    pub fn resolve(&self, n_features: usize) -> usize {
        match *self {
            MaxFeatures::Fixed(n) => n.min(n_features),
            MaxFeatures::Fraction(f) => (n_features as f64 * f).floor() as usize,
            MaxFeatures::Strategy(FeatureStrategy::Sqrt) => (n_features as f64).sqrt().floor() as usize,
            MaxFeatures::Strategy(FeatureStrategy::Log2) => (n_features as f64).log2().floor() as usize,
            MaxFeatures::Strategy(FeatureStrategy::All) => n_features,
        }
        .max(1)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match *self {
            MaxFeatures::Fixed(0) => Err(MlError::invalid_parameter("max_features", 0, "must be at least 1")),
            MaxFeatures::Fraction(f) if !(f > 0.0 && f <= 1.0) => {
                Err(MlError::invalid_parameter("max_features", f, "fraction must be in (0, 1]"))
            }
            _ => Ok(()),
        }
    }
}

/// Random Forest model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    /// Individual trees
    trees: Vec<DecisionTree>,
    /// Number of trees
    pub n_estimators: usize,
    /// Maximum depth per tree
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Maximum features per split
    pub max_features: MaxFeatures,
    /// Bootstrap sampling
    pub bootstrap: bool,
    /// Fraction of rows per bootstrap sample
    pub max_samples: Option<f64>,
    /// Impurity criterion
    pub criterion: Criterion,
    /// Random state
    pub random_state: Option<u64>,
    /// Requested worker threads (see [`ForestParams::n_jobs`])
    pub n_jobs: i32,
    /// Feature importances
    feature_importances: Option<Array1<f64>>,
    /// Number of features
    n_features: usize,
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::from_params(&ForestParams::default())
    }
}

impl RandomForest {
    /// Create a forest of `n_estimators` unconstrained trees
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Strategy(FeatureStrategy::Sqrt),
            bootstrap: true,
            max_samples: None,
            criterion: Criterion::Gini,
            random_state: None,
            n_jobs: -1,
            feature_importances: None,
            n_features: 0,
        }
    }

    /// Create an unfitted forest from a hyper-parameter configuration
    pub fn from_params(params: &ForestParams) -> Self {
        Self {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            min_samples_leaf: params.min_samples_leaf,
            max_features: params.max_features,
            bootstrap: params.bootstrap,
            max_samples: params.max_samples,
            criterion: params.criterion,
            random_state: params.random_state,
            n_jobs: params.n_jobs,
            ..Self::new(params.n_estimators)
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set minimum samples in leaf
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }

    /// Set random state
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Set worker thread count
    pub fn with_n_jobs(mut self, n_jobs: i32) -> Self {
        self.n_jobs = n_jobs;
        self
    }

    fn params(&self) -> ForestParams {
        ForestParams {
            random_state: self.random_state,
            criterion: self.criterion,
            n_estimators: self.n_estimators,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: self.max_features,
            bootstrap: self.bootstrap,
            n_jobs: self.n_jobs,
            max_samples: self.max_samples,
        }
    }

    /// Fit the forest to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<bool>) -> Result<&mut Self> {
        let params = self.params();
        params.validate()?;
        check_training_input(x, y)?;

        let n_samples = x.nrows();
        let n_features = x.ncols();
        self.n_features = n_features;
        let max_features = self.max_features.resolve(n_features);

        let n_draws = match (self.bootstrap, self.max_samples) {
            (true, Some(fraction)) => ((n_samples as f64 * fraction).round() as usize).max(1),
            _ => n_samples,
        };

        // Per-tree seeds come from one master stream so every tree is reproducible
        // whatever order the pool builds them in.
        let mut master = match self.random_state {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let seeds: Vec<u64> = (0..self.n_estimators).map(|_| master.next_u64()).collect();

        let build = |seed: &u64| -> Result<DecisionTree> {
            let mut rng = ChaCha8Rng::seed_from_u64(*seed);

            let mut tree = DecisionTree::new()
                .with_min_samples_split(self.min_samples_split)
                .with_min_samples_leaf(self.min_samples_leaf)
                .with_max_features(max_features)
                .with_criterion(self.criterion)
                .with_random_state(rng.next_u64());
            if let Some(d) = self.max_depth {
                tree = tree.with_max_depth(d);
            }

            if self.bootstrap {
                let sample_indices: Vec<usize> =
                    (0..n_draws).map(|_| rng.gen_range(0..n_samples)).collect();
                let x_boot = x.select(Axis(0), &sample_indices);
                let y_boot = y.select(Axis(0), &sample_indices);
                tree.fit(&x_boot, &y_boot)?;
            } else {
                tree.fit(x, y)?;
            }
            Ok(tree)
        };

        let workers = params.worker_threads();
        let trees: Vec<DecisionTree> = if workers == rayon::current_num_threads() {
            seeds.par_iter().map(build).collect::<Result<_>>()?
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()
                .map_err(|e| MlError::TrainingError(e.to_string()))?;
            pool.install(|| seeds.par_iter().map(build).collect::<Result<_>>())?
        };

        debug!(
            n_trees = trees.len(),
            n_samples,
            n_features,
            max_features,
            workers,
            "forest fitted"
        );

        self.trees = trees;
        self.compute_feature_importances();

        Ok(self)
    }

    fn compute_feature_importances(&mut self) {
        if self.trees.is_empty() {
            return;
        }

        let mut total_importances = Array1::<f64>::zeros(self.n_features);
        for imp in self.trees.iter().filter_map(|tree| tree.feature_importances()) {
            total_importances += imp;
        }

        let total = total_importances.sum();
        if total > 0.0 {
            total_importances /= total;
        }

        self.feature_importances = Some(total_importances);
    }

    /// Probability of the positive class: mean of the per-tree leaf fractions
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(MlError::ModelNotFitted);
        }

        let per_tree: Vec<Array1<f64>> = self
            .trees
            .par_iter()
            .map(|tree| tree.predict_proba(x))
            .collect::<Result<_>>()?;

        let mut proba = Array1::<f64>::zeros(x.nrows());
        for p in &per_tree {
            proba += p;
        }
        proba /= per_tree.len() as f64;

        Ok(proba)
    }

    /// Predict class labels (positive when the mean probability exceeds 0.5)
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<bool>> {
        Ok(self.predict_proba(x)?.mapv(|p| p > 0.5))
    }

    /// Fraction of rows predicted correctly
    pub fn score(&self, x: &Array2<f64>, y: &Array1<bool>) -> Result<f64> {
        if x.nrows() != y.len() {
            return Err(MlError::ShapeError {
                expected: format!("y length = {}", x.nrows()),
                actual: format!("y length = {}", y.len()),
            });
        }
        if y.is_empty() {
            return Err(MlError::ValidationError("cannot score an empty partition".to_string()));
        }

        let predictions = self.predict(x)?;
        let correct = predictions.iter().zip(y.iter()).filter(|(p, t)| p == t).count();
        Ok(correct as f64 / y.len() as f64)
    }

    /// Get feature importances
    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }

    /// Get number of trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of features seen during fit
    pub fn n_features(&self) -> usize {
        self.n_features
    }
}
