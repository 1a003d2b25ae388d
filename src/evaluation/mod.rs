//! Model evaluation: threshold metrics, ROC analysis and the combined result

mod evaluator;
pub mod metrics;
pub mod roc;

pub use evaluator::{EvaluationResult, Evaluator};
pub use metrics::ConfusionMatrix;
pub use roc::{auc, RocCurve, RocPoint, RocPoints};
