//! Spotify ML - chart-presence classifier for the Spotify 2023 top-songs dataset
//!
//! One run loads a Latin-1 CSV, prepares a numeric feature matrix, splits it
//! 67/33, fits a random forest, evaluates it on both partitions and builds a
//! display-ready report (metric tiles plus Vega-Lite chart specs).
//!
//! # Modules
//!
//! ## Pipeline stages
//! - [`preprocessing`] - Decoding, renaming, column selection, one-hot expansion
//! - [`training`] - Train/test split, decision trees, random forest, trainer
//! - [`evaluation`] - Confusion matrix, precision/recall/F1, ROC and AUC
//! - [`report`] - Metric tiles, confusion heat-map and ROC chart
//! - [`pipeline`] - The end-to-end run as a function of its inputs
//!
//! ## Supporting
//! - [`config`] - Run configuration and hyper-parameters
//! - [`session`] - Per-session run counter and prepared-data memo
//! - [`export`] - Filtered CSV export
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;
pub mod config;

// Pipeline stages
pub mod preprocessing;
pub mod training;
pub mod evaluation;
pub mod report;
pub mod pipeline;

// Supporting
pub mod session;
pub mod export;
pub mod utils;
pub mod cli;

pub use error::{MlError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{MlError, Result};

    // Configuration
    pub use crate::config::PipelineConfig;
    pub use crate::training::ForestParams;

    // Preprocessing
    pub use crate::preprocessing::{DatasetLoader, FeatureMatrix, OneHotEncoder, PreparedData};

    // Training
    pub use crate::training::{train_test_split, RandomForest, SplitData, TrainedModel, Trainer};

    // Evaluation
    pub use crate::evaluation::{ConfusionMatrix, EvaluationResult, Evaluator, RocCurve};

    // Report
    pub use crate::report::{Report, ReportBuilder};

    // Pipeline
    pub use crate::pipeline::{Pipeline, PipelineInput, PipelineOutput};
    pub use crate::session::Session;
    pub use crate::export::ExportFilter;
}
