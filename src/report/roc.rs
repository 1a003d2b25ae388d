//! ROC line chart

use crate::evaluation::RocCurve;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Line chart of TPR against FPR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    /// `(fpr, tpr)` in sweep order
    pub points: Vec<(f64, f64)>,
}

impl RocChart {
    pub fn to_vega_lite(&self) -> Value {
        let values: Vec<Value> = self
            .points
            .iter()
            .map(|&(fpr, tpr)| json!({ "False Positive Rate": fpr, "True Positive Rate": tpr }))
            .collect();

        json!({
            "$schema": super::VEGA_LITE_SCHEMA,
            "title": self.title,
            "data": { "values": values },
            "mark": "line",
            "encoding": {
                "x": { "field": "False Positive Rate", "type": "quantitative", "title": self.x_title },
                "y": { "field": "True Positive Rate", "type": "quantitative", "title": self.y_title },
                "order": { "field": "index", "type": "quantitative" },
            },
            "transform": [{ "window": [{ "op": "row_number", "as": "index" }] }],
        })
    }
}

/// Chart titled with the AUC at two decimals
pub fn roc_chart(curve: &RocCurve, auc: f64) -> RocChart {
    RocChart {
        title: format!("ROC Curve (AUC = {:.2})", auc),
        x_title: "False Positive Rate (FPR)".to_string(),
        y_title: "True Positive Rate (TPR)".to_string(),
        points: curve.points().collect(),
    }
}
