//! Fits a forest for one pipeline run and times the fit

use super::config::ForestParams;
use super::random_forest::RandomForest;
use crate::error::{MlError, Result};
use crate::utils::Timer;
use ndarray::{Array1, Array2};
use std::time::Duration;
use tracing::info;

/// A fitted forest together with the names of the columns it was fitted on
#[derive(Debug, Clone)]
pub struct TrainedModel {
    forest: RandomForest,
    feature_names: Vec<String>,
}

impl TrainedModel {
    /// Probability of the positive class per row
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.forest.predict_proba(x)
    }

    /// Predicted labels per row
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<bool>> {
        self.forest.predict(x)
    }

    /// Fraction of correct predictions
    pub fn score(&self, x: &Array2<f64>, y: &Array1<bool>) -> Result<f64> {
        self.forest.score(x, y)
    }

    /// Column names in feature-matrix order
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Underlying forest
    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    /// Feature importances paired with column names, most important first
    pub fn ranked_importances(&self) -> Vec<(String, f64)> {
        let Some(importances) = self.forest.feature_importances() else {
            return Vec::new();
        };
        let mut ranked: Vec<(String, f64)> = self
            .feature_names
            .iter()
            .cloned()
            .zip(importances.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

/// Output of [`Trainer::fit`]
#[derive(Debug, Clone)]
pub struct TrainingRun {
    pub model: TrainedModel,
    /// Wall-clock time of the fit call
    pub elapsed: Duration,
}

/// Random forest trainer bound to one hyper-parameter configuration
#[derive(Debug, Clone)]
pub struct Trainer {
    params: ForestParams,
}

impl Trainer {
    pub fn new(params: ForestParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    /// Fit a forest on the training partition.
    ///
    /// Malformed input (NaN, wrong shape, empty partition) is returned as an
    /// error; there is no retry or partial result.
    pub fn fit(
        &self,
        x_train: &Array2<f64>,
        y_train: &Array1<bool>,
        feature_names: &[String],
    ) -> Result<TrainingRun> {
        if feature_names.len() != x_train.ncols() {
            return Err(MlError::ShapeError {
                expected: format!("{} feature names", x_train.ncols()),
                actual: format!("{} feature names", feature_names.len()),
            });
        }

        let timer = Timer::start("random forest fit");
        let mut forest = RandomForest::from_params(&self.params);
        forest.fit(x_train, y_train)?;
        let elapsed = timer.stop();

        info!(
            n_trees = forest.n_trees(),
            n_rows = x_train.nrows(),
            n_features = x_train.ncols(),
            "model trained"
        );

        Ok(TrainingRun {
            model: TrainedModel {
                forest,
                feature_names: feature_names.to_vec(),
            },
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{}", i)).collect()
    }

    #[test]
    fn test_fit_small_leaf_config() {
        let x = array![[0.0, 5.0], [1.0, 4.0], [2.0, 3.0], [3.0, 2.0], [4.0, 1.0], [5.0, 0.0]];
        let y = array![false, false, false, true, true, true];
        let params = ForestParams::default()
            .with_n_estimators(5)
            .with_min_samples_split(2)
            .with_min_samples_leaf(1);

        let run = Trainer::new(params).fit(&x, &y, &names(2)).unwrap();
        assert_eq!(run.model.forest().n_trees(), 5);
        assert_eq!(run.model.ranked_importances().len(), 2);
    }

    #[test]
    fn test_fit_rejects_nan() {
        let x = array![[0.0], [f64::NAN]];
        let y = array![false, true];
        let err = Trainer::new(ForestParams::default()).fit(&x, &y, &names(1)).unwrap_err();
        assert!(matches!(err, MlError::TrainingError(_)));
    }

    #[test]
    fn test_fit_rejects_name_mismatch() {
        let x = array![[0.0, 1.0], [1.0, 0.0]];
        let y = array![false, true];
        let err = Trainer::new(ForestParams::default()).fit(&x, &y, &names(3)).unwrap_err();
        assert!(matches!(err, MlError::ShapeError { .. }));
    }
}
