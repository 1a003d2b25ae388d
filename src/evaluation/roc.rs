//! ROC curve and area under the curve

use crate::error::{MlError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// One operating point of the ROC curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocPoint {
    pub fpr: f64,
    pub tpr: f64,
    /// Rows scoring at or above this value are predicted positive
    pub threshold: f64,
}

/// Lazy sweep of the decision threshold over positive-class scores.
///
/// Yields `(0, 0)` at an infinite threshold first, then one point per distinct
/// score from highest to lowest; the last point is always `(1, 1)`.
#[derive(Debug, Clone)]
pub struct RocPoints {
    ranked: Vec<(f64, bool)>,
    next: usize,
    tp: usize,
    fp: usize,
    n_pos: usize,
    n_neg: usize,
    started: bool,
}

impl RocPoints {
    pub fn new(labels: &Array1<bool>, scores: &Array1<f64>) -> Result<Self> {
        if labels.len() != scores.len() {
            return Err(MlError::ShapeError {
                expected: format!("{} scores", labels.len()),
                actual: format!("{} scores", scores.len()),
            });
        }
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(MlError::ValidationError("scores must be finite".to_string()));
        }

        let n_pos = labels.iter().filter(|&&l| l).count();
        let n_neg = labels.len() - n_pos;
        if n_pos == 0 || n_neg == 0 {
            return Err(MlError::ValidationError(format!(
                "ROC curve needs both classes, got {} positive and {} negative labels",
                n_pos, n_neg
            )));
        }

        let mut ranked: Vec<(f64, bool)> = scores.iter().copied().zip(labels.iter().copied()).collect();
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(Self {
            ranked,
            next: 0,
            tp: 0,
            fp: 0,
            n_pos,
            n_neg,
            started: false,
        })
    }
}

impl Iterator for RocPoints {
    type Item = RocPoint;

    fn next(&mut self) -> Option<RocPoint> {
        if !self.started {
            self.started = true;
            return Some(RocPoint {
                fpr: 0.0,
                tpr: 0.0,
                threshold: f64::INFINITY,
            });
        }

        let threshold = self.ranked.get(self.next)?.0;
        while let Some(&(score, label)) = self.ranked.get(self.next) {
            if score != threshold {
                break;
            }
            if label {
                self.tp += 1;
            } else {
                self.fp += 1;
            }
            self.next += 1;
        }

        Some(RocPoint {
            fpr: self.fp as f64 / self.n_neg as f64,
            tpr: self.tp as f64 / self.n_pos as f64,
            threshold,
        })
    }
}

/// Collected ROC curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocCurve {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    pub thresholds: Vec<f64>,
}

impl RocCurve {
    /// Sweep every distinct score of the positive class
    pub fn from_scores(labels: &Array1<bool>, scores: &Array1<f64>) -> Result<Self> {
        let mut curve = Self {
            fpr: Vec::new(),
            tpr: Vec::new(),
            thresholds: Vec::new(),
        };
        for point in RocPoints::new(labels, scores)? {
            curve.fpr.push(point.fpr);
            curve.tpr.push(point.tpr);
            curve.thresholds.push(point.threshold);
        }
        Ok(curve)
    }

    /// `(fpr, tpr)` pairs in sweep order
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.fpr.iter().copied().zip(self.tpr.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.fpr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fpr.is_empty()
    }

    /// Area under this curve
    pub fn auc(&self) -> Result<f64> {
        auc(&self.fpr, &self.tpr)
    }
}

/// Area under a curve by the trapezoidal rule; `x` must be monotonic
pub fn auc(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(MlError::ShapeError {
            expected: format!("{} y values", x.len()),
            actual: format!("{} y values", y.len()),
        });
    }
    if x.len() < 2 {
        return Err(MlError::ValidationError(format!(
            "at least 2 points are needed to compute an area, got {}",
            x.len()
        )));
    }

    let direction = if x.windows(2).all(|w| w[1] >= w[0]) {
        1.0
    } else if x.windows(2).all(|w| w[1] <= w[0]) {
        -1.0
    } else {
        return Err(MlError::ValidationError("x is neither increasing nor decreasing".to_string()));
    };

    let area: f64 = x
        .windows(2)
        .zip(y.windows(2))
        .map(|(xw, yw)| (xw[1] - xw[0]) * (yw[0] + yw[1]) / 2.0)
        .sum();
    Ok(direction * area)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_known_curve() {
        let labels = array![false, false, true, true];
        let scores = array![0.1, 0.4, 0.35, 0.8];
        let curve = RocCurve::from_scores(&labels, &scores).unwrap();

        assert_eq!(curve.fpr, vec![0.0, 0.0, 0.5, 0.5, 1.0]);
        assert_eq!(curve.tpr, vec![0.0, 0.5, 0.5, 1.0, 1.0]);
        assert_eq!(curve.thresholds[1], 0.8);
        assert!((curve.auc().unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_perfect_and_inverted() {
        let labels = array![false, false, true, true];
        let perfect = RocCurve::from_scores(&labels, &array![0.1, 0.2, 0.8, 0.9]).unwrap();
        assert_eq!(perfect.auc().unwrap(), 1.0);

        let inverted = RocCurve::from_scores(&labels, &array![0.9, 0.8, 0.2, 0.1]).unwrap();
        assert_eq!(inverted.auc().unwrap(), 0.0);
    }

    #[test]
    fn test_unrelated_scores_give_half() {
        let labels = array![true, false, true, false, true, false];
        let constant = RocCurve::from_scores(&labels, &array![0.3, 0.3, 0.3, 0.3, 0.3, 0.3]).unwrap();
        assert_eq!(constant.len(), 2);
        assert_eq!(constant.auc().unwrap(), 0.5);

        // Each score level holds one positive and one negative.
        let paired = RocCurve::from_scores(&labels, &array![0.9, 0.9, 0.5, 0.5, 0.1, 0.1]).unwrap();
        assert!((paired.auc().unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_random_scores_near_half() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let n = 4000;
        let labels: Array1<bool> = (0..n).map(|i| i % 2 == 0).collect();
        let scores: Array1<f64> = (0..n).map(|_| rng.gen::<f64>()).collect();

        let value = RocCurve::from_scores(&labels, &scores).unwrap().auc().unwrap();
        assert!((0.0..=1.0).contains(&value));
        assert!((value - 0.5).abs() < 0.05, "AUC of random scores: {}", value);
    }

    #[test]
    fn test_points_are_lazy_and_monotonic() {
        let labels = array![true, false, true, false, false];
        let scores = array![0.9, 0.7, 0.6, 0.2, 0.2];
        let mut points = RocPoints::new(&labels, &scores).unwrap();

        let first = points.next().unwrap();
        assert_eq!((first.fpr, first.tpr), (0.0, 0.0));

        let rest: Vec<RocPoint> = points.collect();
        assert_eq!(rest.len(), 4);
        assert!(rest.windows(2).all(|w| w[1].fpr >= w[0].fpr && w[1].tpr >= w[0].tpr));
        let last = rest.last().unwrap();
        assert_eq!((last.fpr, last.tpr), (1.0, 1.0));
    }

    #[test]
    fn test_single_class_rejected() {
        let err = RocCurve::from_scores(&array![true, true], &array![0.2, 0.4]).unwrap_err();
        assert!(matches!(err, MlError::ValidationError(_)));
    }

    #[test]
    fn test_auc_requires_monotonic_x() {
        assert!(auc(&[0.0, 1.0, 0.5], &[0.0, 1.0, 1.0]).is_err());
        assert!(auc(&[0.0], &[0.0]).is_err());
        assert_eq!(auc(&[1.0, 0.0], &[1.0, 1.0]).unwrap(), 1.0);
    }
}
