//! Scores a trained model on both partitions of a split

use super::metrics::ConfusionMatrix;
use super::roc::RocCurve;
use crate::error::Result;
use crate::training::{SplitData, TrainedModel};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Everything measured about one training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Accuracy on the training partition
    pub train_score: f64,
    /// Accuracy on the test partition
    pub test_score: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Test-partition confusion matrix
    pub confusion: ConfusionMatrix,
    /// Test-partition ROC curve
    pub roc: RocCurve,
    pub auc: f64,
    /// Wall-clock duration of the fit
    pub elapsed: Duration,
}

impl EvaluationResult {
    /// Test score minus train score
    pub fn score_delta(&self) -> f64 {
        self.test_score - self.train_score
    }
}

/// Computes an [`EvaluationResult`] from a model and its split
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Precision, recall, F1 and the confusion matrix use hard test predictions;
    /// the ROC curve uses positive-class probabilities on the test partition.
    pub fn evaluate(
        &self,
        model: &TrainedModel,
        data: &SplitData,
        elapsed: Duration,
    ) -> Result<EvaluationResult> {
        let train_score = model.score(&data.x_train, &data.y_train)?;

        let proba = model.predict_proba(&data.x_test)?;
        let predicted = proba.mapv(|p| p > 0.5);
        let confusion = ConfusionMatrix::from_predictions(&data.y_test, &predicted)?;

        let roc = RocCurve::from_scores(&data.y_test, &proba)?;
        let auc = roc.auc()?;

        let result = EvaluationResult {
            train_score,
            test_score: confusion.accuracy(),
            precision: confusion.precision(),
            recall: confusion.recall(),
            f1: confusion.f1_score(),
            confusion,
            roc,
            auc,
            elapsed,
        };

        info!(
            train_score = result.train_score,
            test_score = result.test_score,
            f1 = result.f1,
            auc = result.auc,
            "model evaluated"
        );
        Ok(result)
    }
}
