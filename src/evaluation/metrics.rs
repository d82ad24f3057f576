//! Accuracy metrics

use crate::error::{EvalError, Result};
use crate::training::Classifier;
use ndarray::Array2;

pub(crate) fn check_paired(y_true: &[usize], y_pred: &[usize]) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(EvalError::InvalidInput(format!(
            "true labels ({}) and predictions ({}) differ in length",
            y_true.len(),
            y_pred.len()
        )));
    }
    Ok(())
}

/// Fraction of rows of `x` the model labels correctly
pub fn accuracy<M: Classifier + ?Sized>(model: &M, x: &Array2<f64>, y: &[usize]) -> Result<f64> {
    if x.nrows() != y.len() {
        return Err(EvalError::InvalidInput(format!(
            "feature rows ({}) and labels ({}) differ in length",
            x.nrows(),
            y.len()
        )));
    }
    accuracy_score(y, &model.predict(x))
}

/// Fraction of positions where prediction equals truth
pub fn accuracy_score(y_true: &[usize], y_pred: &[usize]) -> Result<f64> {
    check_paired(y_true, y_pred)?;
    if y_true.is_empty() {
        return Err(EvalError::InvalidInput(
            "accuracy of an empty set is undefined".to_string(),
        ));
    }
    let correct = y_true.len() - misclassified_count(y_true, y_pred)?;
    Ok(correct as f64 / y_true.len() as f64)
}

/// Number of positions where prediction differs from truth
pub fn misclassified_count(y_true: &[usize], y_pred: &[usize]) -> Result<usize> {
    check_paired(y_true, y_pred)?;
    Ok(y_true.iter().zip(y_pred.iter()).filter(|(t, p)| t != p).count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, ArrayView1};

    struct Constant(usize);

    impl Classifier for Constant {
        fn predict_one(&self, _sample: ArrayView1<'_, f64>) -> usize {
            self.0
        }
    }

    #[test]
    fn test_accuracy_score() {
        let acc = accuracy_score(&[0, 1, 2, 2], &[0, 1, 1, 2]).unwrap();
        assert_eq!(acc, 0.75);
    }

    #[test]
    fn test_thirty_four_of_thirty_eight() {
        let truth = vec![0; 38];
        let mut pred = vec![0; 38];
        pred[..4].fill(1);
        let acc = accuracy_score(&truth, &pred).unwrap();
        assert_eq!(format!("{:.4}", acc), "0.8947");
        assert_eq!(misclassified_count(&truth, &pred).unwrap(), 4);
    }

    #[test]
    fn test_accuracy_with_model() {
        let x = array![[0.0], [1.0], [2.0]];
        assert!((accuracy(&Constant(1), &x, &[1, 0, 1]).unwrap() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_length_mismatch() {
        let x = array![[0.0], [1.0]];
        assert!(matches!(accuracy(&Constant(0), &x, &[0]), Err(EvalError::InvalidInput(_))));
        assert!(matches!(accuracy_score(&[0, 1], &[0]), Err(EvalError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_is_rejected() {
        assert!(matches!(accuracy_score(&[], &[]), Err(EvalError::InvalidInput(_))));
    }
}
