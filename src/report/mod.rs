//! Display-ready report built from an evaluation result
//!
//! Charts are produced as data plus a Vega-Lite document; nothing here renders
//! pixels.

mod confusion;
mod roc;
mod tiles;

pub use confusion::{confusion_heatmap, ConfusionHeatmap, HeatmapCell, CORRECT_COLOR, INCORRECT_COLOR};
pub use roc::{roc_chart, RocChart};
pub use tiles::{format_percent, format_runtime, metric_tiles, MetricTile};

use crate::error::Result;
use crate::evaluation::EvaluationResult;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub(crate) const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Tiles and both charts for one training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub runtime: String,
    pub tiles: Vec<MetricTile>,
    pub confusion: ConfusionHeatmap,
    pub roc: RocChart,
}

impl Report {
    /// Report with both charts replaced by their Vega-Lite documents
    pub fn to_json(&self) -> Value {
        json!({
            "runtime": self.runtime,
            "tiles": self.tiles,
            "confusion_matrix": self.confusion.to_vega_lite(),
            "roc_curve": self.roc.to_vega_lite(),
        })
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_json())?)
    }
}

/// Builds a [`Report`]; a pure function of the evaluation result
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportBuilder;

impl ReportBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, result: &EvaluationResult) -> Report {
        Report {
            runtime: format_runtime(result.elapsed.as_secs_f64()),
            tiles: metric_tiles(result),
            confusion: confusion_heatmap(&result.confusion),
            roc: roc_chart(&result.roc, result.auc),
        }
    }
}
