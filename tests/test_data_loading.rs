//! Integration test: Data loading and partitioning

use kolosal_eval::data::{dataset_from_frame, iris, load_csv, train_test_split, SplitConfig};
use kolosal_eval::evaluation::{EvaluationHarness, HarnessConfig};
use kolosal_eval::training::DecisionTreeConfig;
use kolosal_eval::EvalError;
use polars::prelude::*;
use std::io::Write;

fn write_csv(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("{}_{}.csv", name, std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

fn blobs_csv() -> String {
    let mut csv = String::from("x,y,label\n");
    for i in 0..20 {
        let offset = i as f64 * 0.1;
        csv.push_str(&format!("{},{},low\n", offset, 1.0 + offset));
        csv.push_str(&format!("{},{},high\n", 10.0 + offset, 11.0 + offset));
    }
    csv
}

#[test]
fn test_load_csv_and_evaluate() {
    let path = write_csv("kolosal_eval_blobs", &blobs_csv());
    let ds = load_csv(&path, "label");
    std::fs::remove_file(&path).ok();
    let ds = ds.unwrap();

    assert_eq!(ds.n_samples(), 40);
    assert_eq!(ds.n_features(), 2);
    assert_eq!(ds.class_names(), &["high".to_string(), "low".to_string()]);
    assert_eq!(ds.feature_names(), &["x".to_string(), "y".to_string()]);

    let config = HarnessConfig::default().with_cv_folds(3);
    let report = EvaluationHarness::new(config)
        .run(&DecisionTreeConfig::stump(), &ds)
        .unwrap();
    assert_eq!(report.n_test, 10);
    assert_eq!(report.test_accuracy, 1.0);
    assert_eq!(report.cross_validation.unwrap().scores.len(), 3);
}

#[test]
fn test_missing_target_column() {
    let path = write_csv("kolosal_eval_no_target", &blobs_csv());
    let result = load_csv(&path, "species");
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(EvalError::DataError(_))));
}

#[test]
fn test_missing_file() {
    let result = load_csv("/nonexistent/kolosal_eval.csv", "label");
    assert!(matches!(result, Err(EvalError::IoError(_))));
}

#[test]
fn test_numeric_target_from_frame() {
    let df = df!(
        "a" => &[1.0, 2.0, 3.0, 4.0],
        "target" => &[2i64, 0, 2, 1]
    )
    .unwrap();
    let ds = dataset_from_frame(&df, "target").unwrap();
    assert_eq!(ds.labels(), &[2, 0, 2, 1]);
    assert_eq!(ds.n_classes(), 3);
}

#[test]
fn test_iris_split_is_reproducible() {
    let ds = iris().unwrap();
    let a = train_test_split(&ds, &SplitConfig::default().with_random_state(42)).unwrap();
    let b = train_test_split(&ds, &SplitConfig::default().with_random_state(42)).unwrap();
    assert_eq!(a.test_indices, b.test_indices);
    assert_eq!((a.train.n_samples(), a.test.n_samples()), (112, 38));
}

#[test]
fn test_stratified_split_keeps_proportions() {
    let ds = iris().unwrap();
    let split = train_test_split(&ds, &SplitConfig::new(0.2).with_stratify(true)).unwrap();
    assert_eq!(split.test.class_counts(), vec![10, 10, 10]);
    assert_eq!(split.train.class_counts(), vec![40, 40, 40]);
}
