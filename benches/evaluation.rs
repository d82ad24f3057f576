use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kolosal_eval::data::{iris, Dataset};
use kolosal_eval::evaluation::{confusion_matrix, cross_validate, EvaluationHarness, HarnessConfig};
use kolosal_eval::training::{AdaBoostConfig, CrossValidator, Trainer};
use ndarray::Array2;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

fn create_classification_data(n_rows: usize, n_features: usize, n_classes: usize) -> Dataset {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let labels: Vec<usize> = (0..n_rows).map(|_| rng.gen_range(0..n_classes)).collect();
    // Class-dependent shift plus noise
    let features = Array2::from_shape_fn((n_rows, n_features), |(r, c)| {
        labels[r] as f64 * (c + 1) as f64 + rng.gen::<f64>() * 2.0
    });

    Dataset::new(features, labels).unwrap()
}

fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("adaboost_fit");
    group.sample_size(10);

    for n_rows in [500, 2000, 5000].iter() {
        let ds = create_classification_data(*n_rows, 8, 3);

        group.bench_with_input(BenchmarkId::new("fit", n_rows), &ds, |b, ds| {
            b.iter(|| AdaBoostConfig::default().train_on(black_box(ds)).unwrap())
        });
    }

    group.finish();
}

fn bench_cross_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("cross_validate");
    group.sample_size(10);

    let ds = iris().unwrap();
    for folds in [3, 5, 10].iter() {
        let cv = CrossValidator::k_fold(*folds).with_random_state(0);
        group.bench_with_input(BenchmarkId::new("iris", folds), &cv, |b, cv| {
            b.iter(|| cross_validate(&AdaBoostConfig::default(), ds.features(), ds.labels(), black_box(cv)).unwrap())
        });
    }

    group.finish();
}

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics");
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for n in [1_000, 100_000].iter() {
        let truth: Vec<usize> = (0..*n).map(|_| rng.gen_range(0..10)).collect();
        let pred: Vec<usize> = truth
            .iter()
            .map(|&t| if rng.gen_bool(0.9) { t } else { rng.gen_range(0..10) })
            .collect();

        group.bench_with_input(BenchmarkId::new("confusion_matrix", n), &(truth, pred), |b, (t, p)| {
            b.iter(|| confusion_matrix(black_box(t), black_box(p), 10).unwrap())
        });
    }

    group.finish();
}

fn bench_harness(c: &mut Criterion) {
    let ds = iris().unwrap();
    let harness = EvaluationHarness::new(HarnessConfig::default());

    c.bench_function("harness_iris_adaboost", |b| {
        b.iter(|| harness.run(&AdaBoostConfig::default(), black_box(&ds)).unwrap())
    });
}

criterion_group!(benches, bench_training, bench_cross_validation, bench_metrics, bench_harness);
criterion_main!(benches);
