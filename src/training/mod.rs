//! Model training module
//!
//! Provides the classifier side of the pipeline:
//! - Seeded train/test splitting
//! - Decision trees and Random Forests
//! - Hyper-parameter configuration
//! - A timed trainer producing the model consumed by evaluation

mod config;
pub mod decision_tree;
pub mod random_forest;
pub mod split;
mod trainer;

pub use config::ForestParams;
pub use decision_tree::{Criterion, DecisionTree, TreeNode};
pub use random_forest::{FeatureStrategy, MaxFeatures, RandomForest};
pub use split::{train_test_split, SplitData, TrainTestSplit};
pub use trainer::{TrainedModel, Trainer, TrainingRun};
