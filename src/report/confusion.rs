//! Confusion-matrix heat-map

use crate::evaluation::ConfusionMatrix;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const CORRECT_COLOR: &str = "#66BB6A";
pub const INCORRECT_COLOR: &str = "#EF5350";

const POSITIVE: &str = "Positive";
const NEGATIVE: &str = "Negative";

/// One cell of the 2×2 grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub actual: String,
    pub predicted: String,
    pub count: usize,
    pub correct: bool,
    /// Fill colour
    pub color: String,
    /// Colour of the count label
    pub text_color: String,
}

impl HeatmapCell {
    fn new(actual: bool, predicted: bool, count: usize) -> Self {
        let correct = actual == predicted;
        Self {
            actual: label(actual).to_string(),
            predicted: label(predicted).to_string(),
            count,
            correct,
            color: if correct { CORRECT_COLOR } else { INCORRECT_COLOR }.to_string(),
            text_color: if correct { "black" } else { "white" }.to_string(),
        }
    }
}

fn label(positive: bool) -> &'static str {
    if positive {
        POSITIVE
    } else {
        NEGATIVE
    }
}

/// Heat-map chart of a confusion matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionHeatmap {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Cells in the order TN, TP, FP, FN
    pub cells: Vec<HeatmapCell>,
}

impl ConfusionHeatmap {
    /// Vega-Lite document: a rect layer coloured per cell with a count label on top
    pub fn to_vega_lite(&self) -> Value {
        let values: Vec<Value> = self
            .cells
            .iter()
            .map(|c| {
                json!({
                    "Actual": c.actual,
                    "Predicted": c.predicted,
                    "Count": c.count,
                    "Color": c.color,
                })
            })
            .collect();
        let incorrect_test = format!("datum.Color == '{}'", INCORRECT_COLOR);

        json!({
            "$schema": super::VEGA_LITE_SCHEMA,
            "title": self.title,
            "width": self.width,
            "height": self.height,
            "data": { "values": values },
            "encoding": {
                "x": { "field": "Actual", "type": "nominal" },
                "y": { "field": "Predicted", "type": "nominal" },
            },
            "layer": [
                {
                    "mark": "rect",
                    "encoding": {
                        "color": { "field": "Color", "type": "nominal", "scale": null, "legend": null },
                        "tooltip": [
                            { "field": "Actual", "type": "nominal" },
                            { "field": "Predicted", "type": "nominal" },
                            { "field": "Count", "type": "quantitative" },
                        ],
                    },
                },
                {
                    "mark": { "type": "text", "fontSize": 16, "fontWeight": "bold" },
                    "encoding": {
                        "text": { "field": "Count", "type": "quantitative" },
                        "color": {
                            "condition": { "test": incorrect_test, "value": "white" },
                            "value": "black",
                        },
                    },
                },
            ],
            "config": {
                "title": { "fontSize": 18, "fontWeight": "bold", "anchor": "middle" },
            },
        })
    }
}

/// Build the heat-map for a `[[TN, FP], [FN, TP]]` matrix
pub fn confusion_heatmap(matrix: &ConfusionMatrix) -> ConfusionHeatmap {
    ConfusionHeatmap {
        title: "Confusion Matrix".to_string(),
        width: 300,
        height: 350,
        cells: vec![
            HeatmapCell::new(false, false, matrix.tn),
            HeatmapCell::new(true, true, matrix.tp),
            HeatmapCell::new(false, true, matrix.fp),
            HeatmapCell::new(true, false, matrix.fn_),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_follow_matrix() {
        let heatmap = confusion_heatmap(&ConfusionMatrix::from_array([[8, 2], [1, 9]]));
        let counts: Vec<usize> = heatmap.cells.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![8, 9, 2, 1]);

        let correct: Vec<bool> = heatmap.cells.iter().map(|c| c.correct).collect();
        assert_eq!(correct, vec![true, true, false, false]);

        let fp = &heatmap.cells[2];
        assert_eq!((fp.actual.as_str(), fp.predicted.as_str()), ("Negative", "Positive"));
        assert_eq!(fp.color, INCORRECT_COLOR);
        assert_eq!(fp.text_color, "white");
        assert_eq!(heatmap.cells[0].text_color, "black");
    }

    #[test]
    fn test_vega_lite_document() {
        let spec = confusion_heatmap(&ConfusionMatrix::from_array([[8, 2], [1, 9]])).to_vega_lite();
        assert_eq!(spec["title"], "Confusion Matrix");
        assert_eq!(spec["width"], 300);
        assert_eq!(spec["height"], 350);
        assert_eq!(spec["data"]["values"].as_array().map(Vec::len), Some(4));
        assert_eq!(spec["data"]["values"][1]["Count"], 9);
        assert_eq!(spec["layer"][0]["mark"], "rect");
        assert_eq!(spec["config"]["title"]["anchor"], "middle");
    }
}
