//! CSV loading into a labeled [`Dataset`]

use super::Dataset;
use crate::error::{EvalError, Result};
use ndarray::Array2;
use polars::prelude::*;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Load a CSV file with a header row.
///
/// Every column except `target_column` becomes a numeric feature. Target values are
/// label-encoded in sorted order and the distinct values become the class names.
pub fn load_csv(path: impl AsRef<Path>, target_column: &str) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .into_reader_with_file_handle(file)
        .finish()?;

    info!(path = %path.display(), rows = df.height(), cols = df.width(), "loaded csv");
    dataset_from_frame(&df, target_column)
}

/// Convert a DataFrame into a dataset, encoding the target column as class labels
pub fn dataset_from_frame(df: &DataFrame, target_column: &str) -> Result<Dataset> {
    let feature_cols: Vec<String> = df
        .get_column_names()
        .into_iter()
        .filter(|name| name.as_str() != target_column)
        .map(|s| s.to_string())
        .collect();

    if feature_cols.is_empty() {
        return Err(EvalError::InvalidInput(
            "no feature columns besides the target".to_string(),
        ));
    }

    let target = df
        .column(target_column)
        .map_err(|_| EvalError::DataError(format!("target column '{}' not found", target_column)))?;
    let (labels, class_names) = if target.dtype().is_primitive_numeric() {
        encode_numeric_target(target)?
    } else {
        encode_text_target(target)?
    };
    debug!(classes = ?class_names, "encoded target column");

    let features = columns_to_array2(df, &feature_cols)?;

    Dataset::new(features, labels)?
        .with_feature_names(feature_cols)?
        .with_class_names(class_names)
}

fn missing_target(row: usize) -> EvalError {
    EvalError::InvalidInput(format!("missing target value in row {}", row))
}

/// Distinct values in numeric order; class names are the values as written
fn encode_numeric_target(target: &Column) -> Result<(Vec<usize>, Vec<String>)> {
    let raw: Vec<f64> = target
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| v.ok_or_else(|| missing_target(row)))
        .collect::<Result<_>>()?;

    let mut classes = raw.clone();
    classes.sort_by(|a, b| a.total_cmp(b));
    classes.dedup_by(|a, b| a.total_cmp(b).is_eq());

    let labels = raw
        .iter()
        .map(|v| classes.binary_search_by(|c| c.total_cmp(v)).unwrap_or_default())
        .collect();
    Ok((labels, classes.iter().map(|c| c.to_string()).collect()))
}

/// Distinct trimmed strings in lexical order
fn encode_text_target(target: &Column) -> Result<(Vec<usize>, Vec<String>)> {
    let raw: Vec<String> = target
        .cast(&DataType::String)?
        .str()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| v.map(|s| s.trim().to_string()).ok_or_else(|| missing_target(row)))
        .collect::<Result<_>>()?;

    let classes: Vec<String> = raw.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect();
    let labels = raw
        .iter()
        .map(|v| classes.binary_search(v).unwrap_or_default())
        .collect();
    Ok((labels, classes))
}

/// Extract named columns into a row-major matrix; missing values are rejected
fn columns_to_array2(df: &DataFrame, col_names: &[String]) -> Result<Array2<f64>> {
    let n_rows = df.height();
    let n_cols = col_names.len();

    let col_data: Vec<Vec<f64>> = col_names
        .iter()
        .map(|col_name| {
            let column = df.column(col_name)?.cast(&DataType::Float64)?;
            column
                .f64()?
                .into_iter()
                .enumerate()
                .map(|(row, v)| {
                    v.ok_or_else(|| {
                        EvalError::InvalidInput(format!(
                            "missing or non-numeric value in column '{}' row {}",
                            col_name, row
                        ))
                    })
                })
                .collect::<Result<Vec<f64>>>()
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    Ok(Array2::from_shape_fn((n_rows, n_cols), |(r, c)| col_data[c][r]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_to_dataset() {
        let df = df!(
            "a" => &[1.0, 2.0, 3.0, 4.0],
            "b" => &[0.5, 0.5, 1.5, 1.5],
            "species" => &["virginica", "setosa", "setosa", "versicolor"]
        )
        .unwrap();

        let ds = dataset_from_frame(&df, "species").unwrap();
        assert_eq!(ds.n_samples(), 4);
        assert_eq!(ds.n_features(), 2);
        assert_eq!(ds.class_names(), &["setosa", "versicolor", "virginica"]);
        assert_eq!(ds.labels(), &[2, 0, 0, 1]);
        assert_eq!(ds.features()[[2, 1]], 1.5);
        assert_eq!(ds.feature_names(), &["a", "b"]);
    }

    #[test]
    fn test_numeric_target() {
        let df = df!(
            "x" => &[1.0, 2.0, 3.0],
            "y" => &[1i64, 0, 1]
        )
        .unwrap();
        let ds = dataset_from_frame(&df, "y").unwrap();
        assert_eq!(ds.labels(), &[1, 0, 1]);
        assert_eq!(ds.n_classes(), 2);
    }

    #[test]
    fn test_numeric_target_sorts_by_value() {
        let x: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let y: Vec<i64> = (0..12).rev().collect();
        let df = df!("x" => &x, "y" => &y).unwrap();
        let ds = dataset_from_frame(&df, "y").unwrap();

        let expected: Vec<usize> = (0..12).rev().collect();
        assert_eq!(ds.labels(), expected.as_slice());
        assert_eq!(ds.class_names()[2], "2");
        assert_eq!(ds.class_names()[10], "10");
        assert_eq!(ds.n_classes(), 12);
    }

    #[test]
    fn test_fractional_numeric_target() {
        let df = df!("x" => &[1.0, 2.0, 3.0], "y" => &[2.5, -1.0, 2.5]).unwrap();
        let ds = dataset_from_frame(&df, "y").unwrap();
        assert_eq!(ds.labels(), &[1, 0, 1]);
        assert_eq!(ds.class_names(), &["-1", "2.5"]);
    }

    #[test]
    fn test_missing_target_column() {
        let df = df!("x" => &[1.0, 2.0]).unwrap();
        assert!(dataset_from_frame(&df, "label").is_err());
    }

    #[test]
    fn test_load_csv_file() {
        let path = std::env::temp_dir().join(format!("kolosal_eval_loader_{}.csv", std::process::id()));
        std::fs::write(&path, "f1,f2,label\n1.0,2.0,a\n3.0,4.0,b\n5.0,6.0,a\n").unwrap();
        let ds = load_csv(&path, "label").unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(ds.n_samples(), 3);
        assert_eq!(ds.labels(), &[0, 1, 0]);
    }
}
