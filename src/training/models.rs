//! Model capability traits consumed by the evaluator

use crate::data::Dataset;
use crate::error::Result;
use ndarray::{Array2, ArrayView1};

/// A trained classifier. Immutable once built.
pub trait Classifier: Send + Sync {
    /// Predict the class label of a single feature vector
    fn predict_one(&self, sample: ArrayView1<'_, f64>) -> usize;

    /// Predict labels for every row of `x`, in row order
    fn predict(&self, x: &Array2<f64>) -> Vec<usize> {
        x.rows().into_iter().map(|row| self.predict_one(row)).collect()
    }

    /// Fraction of rows predicted correctly
    fn score(&self, x: &Array2<f64>, y: &[usize]) -> Result<f64> {
        crate::evaluation::accuracy(self, x, y)
    }
}

/// Builds a fresh, independent [`Classifier`] from labeled data.
///
/// Cross-validation calls `train` once per fold, so implementations must not share
/// fitted state between calls.
pub trait Trainer: Sync {
    type Model: Classifier;

    fn train(&self, x: &Array2<f64>, y: &[usize]) -> Result<Self::Model>;

    fn train_on(&self, dataset: &Dataset) -> Result<Self::Model> {
        self.train(dataset.features(), dataset.labels())
    }
}

/// Sorted distinct labels and a lookup from label to position
pub(crate) fn class_index(y: &[usize]) -> (Vec<usize>, Vec<Option<usize>>) {
    let mut classes: Vec<usize> = y.to_vec();
    classes.sort_unstable();
    classes.dedup();

    let max_label = classes.last().copied().unwrap_or(0);
    let mut position = vec![None; max_label + 1];
    for (pos, &class) in classes.iter().enumerate() {
        position[class] = Some(pos);
    }
    (classes, position)
}
