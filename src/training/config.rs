//! Random forest hyper-parameters

use super::decision_tree::Criterion;
use super::random_forest::MaxFeatures;
use crate::error::{MlError, Result};
use serde::{Deserialize, Serialize};

/// Hyper-parameter configuration for one training run
///
/// Field names follow the keys of the configuration literal so a JSON file
/// such as `{"n_estimators": 25, "max_depth": 25, ...}` maps one-to-one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    /// Seed for bootstrap sampling and per-node feature sampling
    pub random_state: Option<u64>,
    /// Impurity criterion
    pub criterion: Criterion,
    /// Number of trees
    pub n_estimators: usize,
    /// Maximum depth per tree (None = unlimited)
    pub max_depth: Option<usize>,
    /// Minimum samples required to split a node
    pub min_samples_split: usize,
    /// Minimum samples required in each leaf
    pub min_samples_leaf: usize,
    /// Features considered per split
    pub max_features: MaxFeatures,
    /// Draw bootstrap samples per tree
    pub bootstrap: bool,
    /// Worker threads: -1 all cores, -k all but k-1, k > 0 exactly k
    pub n_jobs: i32,
    /// Fraction of rows drawn per bootstrap sample (None = all rows)
    pub max_samples: Option<f64>,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            random_state: Some(42),
            criterion: Criterion::Gini,
            n_estimators: 25,
            max_depth: Some(25),
            min_samples_split: 50,
            min_samples_leaf: 50,
            max_features: MaxFeatures::Fixed(25),
            bootstrap: true,
            n_jobs: -1,
            max_samples: Some(0.8),
        }
    }
}

impl ForestParams {
    /// Set number of trees
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
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

    /// Set max features strategy
    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    /// Set random state
    pub fn with_random_state(mut self, seed: Option<u64>) -> Self {
        self.random_state = seed;
        self
    }

    /// Set worker thread count
    pub fn with_n_jobs(mut self, n_jobs: i32) -> Self {
        self.n_jobs = n_jobs;
        self
    }

    /// Set bootstrap sampling and the per-tree sample fraction
    pub fn with_bootstrap(mut self, bootstrap: bool, max_samples: Option<f64>) -> Self {
        self.bootstrap = bootstrap;
        self.max_samples = max_samples;
        self
    }

    /// Check every knob is within its accepted range
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(MlError::invalid_parameter("n_estimators", 0, "must be at least 1"));
        }
        if self.max_depth == Some(0) {
            return Err(MlError::invalid_parameter("max_depth", 0, "must be at least 1"));
        }
        if self.min_samples_split < 2 {
            return Err(MlError::invalid_parameter(
                "min_samples_split",
                self.min_samples_split,
                "must be at least 2",
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(MlError::invalid_parameter("min_samples_leaf", 0, "must be at least 1"));
        }
        if self.n_jobs == 0 {
            return Err(MlError::invalid_parameter("n_jobs", 0, "must be non-zero"));
        }
        self.max_features.validate()?;
        match (self.bootstrap, self.max_samples) {
            (false, Some(fraction)) => Err(MlError::invalid_parameter(
                "max_samples",
                fraction,
                "cannot be set when bootstrap is false",
            )),
            (true, Some(fraction)) if !(fraction > 0.0 && fraction <= 1.0) => Err(
                MlError::invalid_parameter("max_samples", fraction, "must be in (0, 1]"),
            ),
            _ => Ok(()),
        }
    }

    /// Number of rayon workers this configuration asks for
    pub fn worker_threads(&self) -> usize {
        let available = rayon::current_num_threads() as i64;
        let n_jobs = self.n_jobs as i64;
        if n_jobs < 0 {
            (available + 1 + n_jobs).max(1) as usize
        } else {
            n_jobs as usize
        }
    }
}
