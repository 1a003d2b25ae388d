//! Integration tests for splitting, forest training and evaluation properties

use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use spotify_ml::evaluation::auc;
use spotify_ml::prelude::*;
use spotify_ml::report::confusion_heatmap;
use std::collections::HashSet;

fn create_classification_data(n: usize, seed: u64) -> (Array2<f64>, Array1<bool>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let x = Array2::from_shape_fn((n, 4), |_| rng.gen::<f64>());
    let y = x.rows().into_iter().map(|row| row[0] + 0.5 * row[1] > 0.75).collect();
    (x, y)
}

#[test]
fn test_split_is_a_partition() {
    for n in [3, 10, 99, 953] {
        let split = train_test_split(n, 0.33, 42).unwrap();
        let train: HashSet<usize> = split.train_indices.iter().copied().collect();
        let test: HashSet<usize> = split.test_indices.iter().copied().collect();

        assert!(train.is_disjoint(&test));
        assert_eq!(train.len() + test.len(), n);
        assert!(train.union(&test).all(|&i| i < n));
    }
}

#[test]
fn test_split_is_reproducible() {
    assert_eq!(train_test_split(953, 0.33, 42).unwrap(), train_test_split(953, 0.33, 42).unwrap());
    assert_ne!(train_test_split(953, 0.33, 42).unwrap(), train_test_split(953, 0.33, 43).unwrap());
}

#[test]
fn test_forest_learns_linear_boundary() {
    let (x, y) = create_classification_data(400, 1);
    let data = train_test_split(400, 0.33, 42).unwrap().apply(&x, &y).unwrap();

    let params = ForestParams::default()
        .with_n_estimators(30)
        .with_min_samples_split(4)
        .with_min_samples_leaf(2);
    let names: Vec<String> = (0..4).map(|i| format!("x{}", i)).collect();
    let run = Trainer::new(params).fit(&data.x_train, &data.y_train, &names).unwrap();
    let eval = Evaluator::new().evaluate(&run.model, &data, run.elapsed).unwrap();

    assert!(eval.test_score > 0.8, "test accuracy {}", eval.test_score);
    assert!(eval.auc > 0.85, "AUC {}", eval.auc);
    assert_eq!(eval.confusion.total(), data.y_test.len());

    let ranked = run.model.ranked_importances();
    assert_eq!(ranked[0].0, "x0");
}

#[test]
fn test_unrelated_scores_have_half_auc() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let labels: Array1<bool> = (0..6000).map(|_| rng.gen_bool(0.3)).collect();
    let scores: Array1<f64> = (0..6000).map(|_| rng.gen::<f64>()).collect();

    let curve = RocCurve::from_scores(&labels, &scores).unwrap();
    let value = auc(&curve.fpr, &curve.tpr).unwrap();
    assert!((value - 0.5).abs() < 0.05, "AUC {}", value);

    let constant = Array1::from_elem(labels.len(), 0.42);
    assert_eq!(RocCurve::from_scores(&labels, &constant).unwrap().auc().unwrap(), 0.5);
}

#[test]
fn test_confusion_counts_and_metric_ranges() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    for _ in 0..50 {
        let n = rng.gen_range(1..60);
        let actual: Array1<bool> = (0..n).map(|_| rng.gen_bool(0.5)).collect();
        let predicted: Array1<bool> = (0..n).map(|_| rng.gen_bool(0.5)).collect();
        let cm = ConfusionMatrix::from_predictions(&actual, &predicted).unwrap();

        assert_eq!(cm.total(), n);
        for m in [cm.precision(), cm.recall(), cm.f1_score()] {
            assert!((0.0..=1.0).contains(&m));
        }
        if cm.precision() == 0.0 && cm.recall() == 0.0 {
            assert_eq!(cm.f1_score(), 0.0);
        }
    }
}

#[test]
fn test_heatmap_scenario() {
    let heatmap = confusion_heatmap(&ConfusionMatrix::from_array([[8, 2], [1, 9]]));
    let cells: Vec<(usize, bool)> = heatmap.cells.iter().map(|c| (c.count, c.correct)).collect();
    assert_eq!(cells, vec![(8, true), (9, true), (2, false), (1, false)]);
}

#[test]
fn test_forest_parallelism_is_deterministic() {
    let (x, y) = create_classification_data(200, 3);
    let fit = |n_jobs: i32| {
        let mut forest = RandomForest::new(12).with_random_state(5).with_n_jobs(n_jobs);
        forest.fit(&x, &y).unwrap();
        forest.predict_proba(&x).unwrap()
    };
    assert_eq!(fit(1), fit(-1));
    assert_eq!(fit(2), fit(-1));
}
