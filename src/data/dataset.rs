//! Labeled dataset container

use crate::error::{EvalError, Result};
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Feature matrix paired row-for-row with integer class labels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    features: Array2<f64>,
    labels: Vec<usize>,
    feature_names: Vec<String>,
    class_names: Vec<String>,
}

impl Dataset {
    /// Create a dataset, checking that every row has a label
    pub fn new(features: Array2<f64>, labels: Vec<usize>) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(EvalError::InvalidInput(format!(
                "feature rows ({}) and labels ({}) differ in length",
                features.nrows(),
                labels.len()
            )));
        }
        if labels.is_empty() {
            return Err(EvalError::InvalidInput("dataset is empty".to_string()));
        }

        let feature_names = (0..features.ncols()).map(|i| format!("feature_{}", i)).collect();
        Ok(Self {
            features,
            labels,
            feature_names,
            class_names: Vec::new(),
        })
    }

    /// Build a dataset from row vectors
    pub fn from_rows(rows: &[Vec<f64>], labels: Vec<usize>) -> Result<Self> {
        let n_cols = rows.first().map_or(0, |r| r.len());
        if let Some(bad) = rows.iter().position(|r| r.len() != n_cols) {
            return Err(EvalError::InvalidInput(format!(
                "row {} has {} features, expected {}",
                bad,
                rows[bad].len(),
                n_cols
            )));
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let features = Array2::from_shape_vec((rows.len(), n_cols), flat)?;
        Self::new(features, labels)
    }

    /// Attach column names
    pub fn with_feature_names(mut self, names: Vec<String>) -> Result<Self> {
        if names.len() != self.features.ncols() {
            return Err(EvalError::InvalidInput(format!(
                "got {} feature names for {} columns",
                names.len(),
                self.features.ncols()
            )));
        }
        self.feature_names = names;
        Ok(self)
    }

    /// Attach class names; every label must index into them
    pub fn with_class_names(mut self, names: Vec<String>) -> Result<Self> {
        if let Some(&label) = self.labels.iter().find(|&&l| l >= names.len()) {
            return Err(EvalError::InvalidInput(format!(
                "label {} outside class range 0..{}",
                label,
                names.len()
            )));
        }
        self.class_names = names;
        Ok(self)
    }

    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    pub fn n_samples(&self) -> usize {
        self.labels.len()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Number of classes: named classes if present, otherwise the largest label plus one
    pub fn n_classes(&self) -> usize {
        if !self.class_names.is_empty() {
            return self.class_names.len();
        }
        self.labels.iter().max().map_or(0, |&m| m + 1)
    }

    /// Number of examples per class
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes()];
        for &label in &self.labels {
            counts[label] += 1;
        }
        counts
    }

    pub fn sample(&self, idx: usize) -> ArrayView1<'_, f64> {
        self.features.row(idx)
    }

    /// Ordered subset of rows; names carry over
    pub fn select(&self, indices: &[usize]) -> Result<Self> {
        if indices.is_empty() {
            return Err(EvalError::InvalidInput("cannot select an empty subset".to_string()));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.n_samples()) {
            return Err(EvalError::InvalidInput(format!(
                "index {} out of bounds for {} samples",
                bad,
                self.n_samples()
            )));
        }
        Ok(Self {
            features: self.features.select(Axis(0), indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            feature_names: self.feature_names.clone(),
            class_names: self.class_names.clone(),
        })
    }

    /// Display name for a label
    pub fn class_name(&self, label: usize) -> String {
        self.class_names
            .get(label)
            .cloned()
            .unwrap_or_else(|| label.to_string())
    }
}
