//! Seeded train/test partitioning

use crate::error::{MlError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Row indices of a train/test partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainTestSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Feature and label partitions materialised from a [`TrainTestSplit`]
#[derive(Debug, Clone)]
pub struct SplitData {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<bool>,
    pub y_test: Array1<bool>,
}

/// Partition `0..n_samples` into shuffled train and test index sets.
///
/// The test partition holds `ceil(test_size * n_samples)` rows. The same
/// `n_samples`, `test_size` and `seed` always give the same partition.
pub fn train_test_split(n_samples: usize, test_size: f64, seed: u64) -> Result<TrainTestSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(MlError::invalid_parameter("test_size", test_size, "must be in (0, 1)"));
    }

    let n_test = (test_size * n_samples as f64).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(MlError::ValidationError(format!(
            "with n_samples={} and test_size={}, one partition would be empty",
            n_samples, test_size
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train_indices = indices.split_off(n_test);
    Ok(TrainTestSplit {
        train_indices,
        test_indices: indices,
    })
}

impl TrainTestSplit {
    /// Number of rows across both partitions
    pub fn n_samples(&self) -> usize {
        self.train_indices.len() + self.test_indices.len()
    }

    /// Select the partitions out of a feature matrix and its labels
    pub fn apply(&self, x: &Array2<f64>, y: &Array1<bool>) -> Result<SplitData> {
        if x.nrows() != y.len() || x.nrows() != self.n_samples() {
            return Err(MlError::ShapeError {
                expected: format!("{} rows in features and labels", self.n_samples()),
                actual: format!("{} feature rows, {} labels", x.nrows(), y.len()),
            });
        }

        Ok(SplitData {
            x_train: x.select(Axis(0), &self.train_indices),
            x_test: x.select(Axis(0), &self.test_indices),
            y_train: y.select(Axis(0), &self.train_indices),
            y_test: y.select(Axis(0), &self.test_indices),
        })
    }
}
