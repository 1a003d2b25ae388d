use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array1, Array2};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use spotify_ml::evaluation::RocCurve;
use spotify_ml::training::{ForestParams, RandomForest};

fn create_classification_data(n_rows: usize, n_features: usize) -> (Array2<f64>, Array1<bool>) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let x = Array2::from_shape_fn((n_rows, n_features), |_| rng.gen::<f64>() * 100.0);
    // Label depends on the first two features plus noise
    let y = x
        .rows()
        .into_iter()
        .map(|row| row[0] + row[1] + rng.gen::<f64>() * 20.0 > 110.0)
        .collect();
    (x, y)
}

fn bench_forest_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_fit");
    group.sample_size(10);

    // 953 rows is the size of the real dataset; 18 features after one-hot expansion
    for n_rows in [953, 5000].iter() {
        let (x, y) = create_classification_data(*n_rows, 18);

        group.bench_with_input(BenchmarkId::new("default_params", n_rows), &(x, y), |b, (x, y)| {
            b.iter(|| {
                let mut forest = RandomForest::from_params(&ForestParams::default());
                forest.fit(black_box(x), black_box(y)).unwrap();
                forest.n_trees()
            })
        });
    }

    group.finish();
}

fn bench_predict_and_roc(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluation");

    let (x, y) = create_classification_data(5000, 18);
    let mut forest = RandomForest::from_params(&ForestParams::default());
    forest.fit(&x, &y).unwrap();

    group.bench_function("predict_proba", |b| b.iter(|| forest.predict_proba(black_box(&x)).unwrap()));

    let scores = forest.predict_proba(&x).unwrap();
    group.bench_function("roc_auc", |b| {
        b.iter(|| RocCurve::from_scores(black_box(&y), black_box(&scores)).unwrap().auc().unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_forest_fit, bench_predict_and_roc);
criterion_main!(benches);
