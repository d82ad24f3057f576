//! Confusion matrix

use super::metrics::check_paired;
use crate::error::{EvalError, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// N x N grid: cell (i, j) counts examples of true class i predicted as j
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    counts: Array2<usize>,
}

/// Build the confusion matrix for classes `0..n_classes`
pub fn confusion_matrix(y_true: &[usize], y_pred: &[usize], n_classes: usize) -> Result<ConfusionMatrix> {
    check_paired(y_true, y_pred)?;
    if n_classes == 0 {
        return Err(EvalError::InvalidInput("class set is empty".to_string()));
    }

    let mut counts = Array2::<usize>::zeros((n_classes, n_classes));
    for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
        if t >= n_classes || p >= n_classes {
            return Err(EvalError::InvalidInput(format!(
                "label pair ({}, {}) outside class range 0..{}",
                t, p, n_classes
            )));
        }
        counts[[t, p]] += 1;
    }
    Ok(ConfusionMatrix { counts })
}

impl ConfusionMatrix {
    pub fn n_classes(&self) -> usize {
        self.counts.nrows()
    }

    pub fn get(&self, truth: usize, predicted: usize) -> usize {
        self.counts[[truth, predicted]]
    }

    pub fn counts(&self) -> &Array2<usize> {
        &self.counts
    }

    /// One row per true class
    pub fn rows(&self) -> Vec<Vec<usize>> {
        self.counts.rows().into_iter().map(|r| r.to_vec()).collect()
    }

    /// Sum of all cells: the number of examples
    pub fn total(&self) -> usize {
        self.counts.sum()
    }

    /// Sum of the diagonal: correct predictions
    pub fn correct(&self) -> usize {
        self.counts.diag().sum()
    }

    pub fn misclassified(&self) -> usize {
        self.total() - self.correct()
    }

    /// Diagonal over total; zero for an empty matrix
    pub fn accuracy(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.correct() as f64 / total as f64,
        }
    }

    /// Examples whose true class is `class`
    pub fn support(&self, class: usize) -> usize {
        self.counts.row(class).sum()
    }

    /// Of the examples predicted as `class`, the fraction that are `class`
    pub fn precision(&self, class: usize) -> f64 {
        let predicted = self.counts.column(class).sum();
        if predicted == 0 {
            0.0
        } else {
            self.get(class, class) as f64 / predicted as f64
        }
    }

    /// Of the examples of `class`, the fraction predicted as `class`
    pub fn recall(&self, class: usize) -> f64 {
        let support = self.support(class);
        if support == 0 {
            0.0
        } else {
            self.get(class, class) as f64 / support as f64
        }
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .counts
            .iter()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1);
        let n = self.n_classes();
        for (i, row) in self.counts.rows().into_iter().enumerate() {
            let open = if i == 0 { "[[" } else { " [" };
            let close = if i + 1 == n { "]]" } else { "]" };
            let cells: Vec<String> = row.iter().map(|c| format!("{:>width$}", c, width = width)).collect();
            write!(f, "{}{}{}", open, cells.join(" "), close)?;
            if i + 1 < n {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_class_example() {
        let cm = confusion_matrix(&[0, 0, 1, 1, 2, 2], &[0, 0, 1, 1, 1, 2], 3).unwrap();
        assert_eq!(cm.rows(), vec![vec![2, 0, 0], vec![0, 2, 0], vec![0, 1, 1]]);
        assert_eq!(cm.total(), 6);
        assert_eq!(cm.correct(), 5);
        assert_eq!(cm.misclassified(), 1);
    }

    #[test]
    fn test_precision_recall() {
        let cm = confusion_matrix(&[0, 0, 1, 1, 2, 2], &[0, 0, 1, 1, 1, 2], 3).unwrap();
        assert!((cm.precision(1) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(cm.recall(1), 1.0);
        assert_eq!(cm.recall(2), 0.5);
        assert_eq!(cm.support(2), 2);
    }

    #[test]
    fn test_label_out_of_range() {
        let err = confusion_matrix(&[0, 3], &[0, 1], 3).unwrap_err();
        assert!(matches!(err, EvalError::InvalidInput(_)));
        let err = confusion_matrix(&[0, 1], &[0, 5], 3).unwrap_err();
        assert!(matches!(err, EvalError::InvalidInput(_)));
    }

    #[test]
    fn test_length_mismatch() {
        assert!(confusion_matrix(&[0, 1, 2], &[0, 1], 3).is_err());
    }

    #[test]
    fn test_display_row_major() {
        let cm = confusion_matrix(&[0, 0, 1, 1, 2, 2], &[0, 0, 1, 1, 1, 2], 3).unwrap();
        assert_eq!(cm.to_string(), "[[2 0 0]\n [0 2 0]\n [0 1 1]]");
    }

    #[test]
    fn test_display_pads_wide_counts() {
        let truth = vec![0; 12];
        let cm = confusion_matrix(&truth, &truth, 2).unwrap();
        assert_eq!(cm.to_string(), "[[12  0]\n [ 0  0]]");
    }
}
