//! Confusion matrix and threshold metrics for binary classification
//!
//! The positive class is `true`. Matrix layout follows the usual metrics
//! convention: rows are the actual label, columns the predicted label, both
//! ordered `[false, true]`:
//!
//! ```text
//!                 predicted false   predicted true
//! actual false         TN                FP
//! actual true          FN                TP
//! ```

use crate::error::{MlError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Confusion matrix for binary classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// True Negatives
    pub tn: usize,
    /// False Positives
    pub fp: usize,
    /// False Negatives
    pub fn_: usize,
    /// True Positives
    pub tp: usize,
}

impl ConfusionMatrix {
    /// Count (actual, predicted) pairs
    pub fn from_predictions(actual: &Array1<bool>, predicted: &Array1<bool>) -> Result<Self> {
        if actual.len() != predicted.len() {
            return Err(MlError::ShapeError {
                expected: format!("{} predictions", actual.len()),
                actual: format!("{} predictions", predicted.len()),
            });
        }

        let mut matrix = Self::default();
        for (&truth, &pred) in actual.iter().zip(predicted.iter()) {
            match (truth, pred) {
                (false, false) => matrix.tn += 1,
                (false, true) => matrix.fp += 1,
                (true, false) => matrix.fn_ += 1,
                (true, true) => matrix.tp += 1,
            }
        }
        Ok(matrix)
    }

    /// Build from a `[[TN, FP], [FN, TP]]` array
    pub fn from_array(counts: [[usize; 2]; 2]) -> Self {
        Self {
            tn: counts[0][0],
            fp: counts[0][1],
            fn_: counts[1][0],
            tp: counts[1][1],
        }
    }

    /// `[[TN, FP], [FN, TP]]`: rows actual, columns predicted, order `[false, true]`
    pub fn as_array(&self) -> [[usize; 2]; 2] {
        [[self.tn, self.fp], [self.fn_, self.tp]]
    }

    /// Total number of samples
    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }

    /// Accuracy: (TP + TN) / Total
    pub fn accuracy(&self) -> f64 {
        ratio(self.tp + self.tn, self.total())
    }

    /// Precision: TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp)
    }

    /// Recall: TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_)
    }

    /// F1 Score: harmonic mean of precision and recall, 0 when both are 0
    pub fn f1_score(&self) -> f64 {
        let precision = self.precision();
        let recall = self.recall();
        let denom = precision + recall;
        if denom == 0.0 {
            return 0.0;
        }
        2.0 * precision * recall / denom
    }
}

fn ratio(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}
