//! Scalar metric tiles

use crate::evaluation::EvaluationResult;
use serde::{Deserialize, Serialize};

/// A labelled value with an optional change indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricTile {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
}

impl MetricTile {
    fn percent(label: &str, value: f64) -> Self {
        Self {
            label: label.to_string(),
            value: format_percent(value),
            delta: None,
        }
    }
}

/// Ratio as a percentage rounded to two decimals, e.g. `0.85 -> "85.0%"`
pub fn format_percent(ratio: f64) -> String {
    format!("{}%", display_rounded(ratio * 100.0, 2))
}

/// Seconds rounded to four decimals
pub fn format_runtime(seconds: f64) -> String {
    format!("Model ran in: {} seconds", display_rounded(seconds, 4))
}

fn display_rounded(value: f64, decimals: i32) -> String {
    let scale = 10f64.powi(decimals);
    let rounded = (value * scale).round() / scale;
    if rounded.fract() == 0.0 {
        format!("{:.1}", rounded)
    } else {
        rounded.to_string()
    }
}

/// Training score, test score with delta, precision, recall and F1
pub fn metric_tiles(result: &EvaluationResult) -> Vec<MetricTile> {
    let mut test = MetricTile::percent("Test Score", result.test_score);
    test.delta = Some(format_percent(result.score_delta()));

    vec![
        MetricTile::percent("Training Score", result.train_score),
        test,
        MetricTile::percent("Precision", result.precision),
        MetricTile::percent("Recall", result.recall),
        MetricTile::percent("F1", result.f1),
    ]
}
