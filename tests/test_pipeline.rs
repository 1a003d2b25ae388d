//! Integration test: full run (load → split → train → evaluate → report)

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use spotify_ml::prelude::*;

const HEADER: &str = "track_name,artist(s)_name,streams,in_spotify_charts,bpm,key,mode,danceability_%,valence_%,energy_%,acousticness_%,instrumentalness_%,liveness_%,speechiness_%";
const KEYS: [&str; 8] = ["C", "C#", "D", "E", "F", "G", "A", "B"];

/// Songs chart far more often when danceability is high
fn create_spotify_csv(n: usize, seed: u64) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut text = String::from(HEADER);

    for i in 0..n {
        let danceability: u32 = rng.gen_range(20..96);
        let charts = if rng.gen_bool(if danceability > 60 { 0.9 } else { 0.1 }) {
            rng.gen_range(1..150)
        } else {
            0
        };
        let key = if i % 10 == 0 { "" } else { KEYS[rng.gen_range(0..KEYS.len())] };
        let mode = if rng.gen_bool(0.5) { "Major" } else { "Minor" };

        text.push_str(&format!(
            "\nsong {},artist {},{},{},{},{},{},{},{},{},{},{},{},{}",
            i,
            i % 17,
            rng.gen_range(1_000u64..2_000_000_000),
            charts,
            rng.gen_range(65..206),
            key,
            mode,
            danceability,
            rng.gen_range(4..98),
            rng.gen_range(10..98),
            rng.gen_range(0..98),
            rng.gen_range(0..10),
            rng.gen_range(3..60),
            rng.gen_range(2..40),
        ));
    }
    text.push('\n');
    text.into_bytes()
}

#[test]
fn test_full_run_with_default_config() {
    let bytes = create_spotify_csv(300, 1);
    let output = Pipeline::default().run(PipelineInput::new(Some(&bytes), true)).unwrap();

    assert_eq!(output.split.test_indices.len(), 99);
    assert_eq!(output.split.train_indices.len(), 201);

    let training = output.training.expect("training was requested");
    let eval = &training.evaluation;
    assert_eq!(eval.confusion.total(), output.split.test_indices.len());
    for m in [eval.train_score, eval.test_score, eval.precision, eval.recall, eval.f1, eval.auc] {
        assert!((0.0..=1.0).contains(&m), "metric out of range: {}", m);
    }
    assert!(eval.auc > 0.7, "AUC on a learnable signal: {}", eval.auc);

    let report = &training.report;
    assert_eq!(report.tiles.len(), 5);
    assert_eq!(report.confusion.cells.len(), 4);
    assert!(report.roc.title.starts_with("ROC Curve (AUC = "));
    assert!(report.runtime.starts_with("Model ran in: "));
}

#[test]
fn test_run_without_trigger_skips_training() {
    let bytes = create_spotify_csv(120, 2);
    let output = Pipeline::default().run(PipelineInput::new(Some(&bytes), false)).unwrap();

    assert!(output.training.is_none());
    assert_eq!(output.data.features.n_rows(), 120);
    assert_eq!(output.split_data.x_test.nrows(), 40);
    assert_eq!(output.split_data.x_train.nrows(), 80);
}

#[test]
fn test_reruns_reproduce_outputs() {
    let bytes = create_spotify_csv(300, 3);
    let pipeline = Pipeline::default();

    let a = pipeline.run(PipelineInput::new(Some(&bytes), true)).unwrap();
    let b = pipeline.run(PipelineInput::new(Some(&bytes), true)).unwrap();
    assert_eq!(a.split, b.split);

    let (a, b) = (a.training.unwrap(), b.training.unwrap());
    assert_eq!(a.evaluation.confusion, b.evaluation.confusion);
    assert_eq!(a.evaluation.roc, b.evaluation.roc);
    assert_eq!(a.evaluation.auc, b.evaluation.auc);
    assert_eq!(a.evaluation.train_score, b.evaluation.train_score);
    assert_eq!(a.report.tiles, b.report.tiles);
    assert_eq!(a.report.confusion.to_vega_lite(), b.report.confusion.to_vega_lite());
}

#[test]
fn test_worker_count_does_not_change_model() {
    let bytes = create_spotify_csv(300, 4);
    let run = |n_jobs: i32| {
        let config = PipelineConfig::default().with_forest(ForestParams::default().with_n_jobs(n_jobs));
        Pipeline::new(config)
            .run(PipelineInput::new(Some(&bytes), true))
            .unwrap()
            .training
            .unwrap()
    };

    let single = run(1);
    let all = run(-1);
    let x_test = {
        let output = Pipeline::default().run(PipelineInput::new(Some(&bytes), false)).unwrap();
        output.split_data.x_test
    };
    assert_eq!(single.model.predict_proba(&x_test).unwrap(), all.model.predict_proba(&x_test).unwrap());
    assert_eq!(single.evaluation.confusion, all.evaluation.confusion);
}

#[test]
fn test_missing_input_halts() {
    let err = Pipeline::default().run(PipelineInput::new(None, true)).unwrap_err();
    assert!(matches!(err, MlError::MissingInput));
}

#[test]
fn test_missing_column_is_fatal() {
    let text = String::from_utf8(create_spotify_csv(20, 5)).unwrap().replace("speechiness_%", "speech");
    let err = Pipeline::default()
        .run(PipelineInput::new(Some(text.as_bytes()), true))
        .unwrap_err();
    assert!(matches!(err, MlError::MissingColumn(ref c) if c == "speechiness"));
}

#[test]
fn test_invalid_config_is_rejected_before_training() {
    let bytes = create_spotify_csv(60, 6);
    let config = PipelineConfig::default().with_forest(ForestParams::default().with_n_jobs(0));
    let err = Pipeline::new(config).run(PipelineInput::new(Some(&bytes), true)).unwrap_err();
    assert!(matches!(err, MlError::InvalidParameter { .. }));
}

#[test]
fn test_session_memoises_prepared_data() {
    let bytes = create_spotify_csv(200, 7);
    let other = create_spotify_csv(200, 8);
    let pipeline = Pipeline::default();
    let mut session = Session::new();

    session.run(&pipeline, PipelineInput::new(Some(&bytes), false)).unwrap();
    assert_eq!(session.training_runs(), 0);

    session.run(&pipeline, PipelineInput::new(Some(&bytes), true)).unwrap();
    session.run(&pipeline, PipelineInput::new(Some(&bytes), true)).unwrap();
    assert_eq!(session.cached_datasets(), 1);
    assert_eq!(session.training_runs(), 2);

    session.run(&pipeline, PipelineInput::new(Some(&other), false)).unwrap();
    assert_eq!(session.cached_datasets(), 2);

    session.clear_cache();
    assert_eq!(session.cached_datasets(), 0);
}

#[test]
fn test_report_json_document() {
    let bytes = create_spotify_csv(300, 9);
    let training = Pipeline::default()
        .run(PipelineInput::new(Some(&bytes), true))
        .unwrap()
        .training
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&training.report.to_json_string().unwrap()).unwrap();
    assert_eq!(json["confusion_matrix"]["title"], "Confusion Matrix");
    assert_eq!(json["roc_curve"]["mark"], "line");
    assert_eq!(json["tiles"][1]["label"], "Test Score");
    assert!(json["tiles"][1]["delta"].is_string());
}
