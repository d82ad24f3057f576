//! K-fold cross-validated accuracy

use super::metrics::accuracy;
use crate::error::{EvalError, Result};
use crate::training::{CrossValidator, Trainer};
use ndarray::{Array2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Per-fold accuracy scores, in fold order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidationResult {
    /// Scores for each fold
    pub scores: Vec<f64>,
    /// Mean score across folds
    pub mean_score: f64,
    /// Population standard deviation of scores
    pub std_score: f64,
    /// Number of folds
    pub n_folds: usize,
}

impl CrossValidationResult {
    /// Create CV results from fold scores
    pub fn from_scores(scores: Vec<f64>) -> Self {
        let n_folds = scores.len();
        if n_folds == 0 {
            return Self {
                scores,
                mean_score: 0.0,
                std_score: 0.0,
                n_folds,
            };
        }
        let mean_score = scores.iter().sum::<f64>() / n_folds as f64;
        let variance = scores.iter().map(|s| (s - mean_score).powi(2)).sum::<f64>() / n_folds as f64;

        Self {
            scores,
            mean_score,
            std_score: variance.sqrt(),
            n_folds,
        }
    }
}

/// Train a fresh model per fold on the other folds and score it on the held-out fold.
///
/// Folds run in parallel; scores come back in fold order.
pub fn cross_validate<T: Trainer>(
    trainer: &T,
    x: &Array2<f64>,
    y: &[usize],
    cv: &CrossValidator,
) -> Result<CrossValidationResult> {
    if x.nrows() != y.len() {
        return Err(EvalError::InvalidInput(format!(
            "feature rows ({}) and labels ({}) differ in length",
            x.nrows(),
            y.len()
        )));
    }
    let splits = cv.split(y)?;
    info!(folds = splits.len(), samples = y.len(), "cross-validating");

    let scores = splits
        .par_iter()
        .map(|split| {
            let x_train = x.select(Axis(0), &split.train_indices);
            let y_train: Vec<usize> = split.train_indices.iter().map(|&i| y[i]).collect();
            let x_test = x.select(Axis(0), &split.test_indices);
            let y_test: Vec<usize> = split.test_indices.iter().map(|&i| y[i]).collect();

            let model = trainer.train(&x_train, &y_train)?;
            let score = accuracy(&model, &x_test, &y_test)?;
            debug!(fold = split.fold_idx, score, "fold scored");
            Ok(score)
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(CrossValidationResult::from_scores(scores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::iris;
    use crate::training::{CVStrategy, Classifier, DecisionTreeConfig};
    use ndarray::ArrayView1;

    /// Predicts the majority label of its training data
    struct Majority;

    struct Fixed(usize);

    impl Classifier for Fixed {
        fn predict_one(&self, _sample: ArrayView1<'_, f64>) -> usize {
            self.0
        }
    }

    impl Trainer for Majority {
        type Model = Fixed;

        fn train(&self, _x: &Array2<f64>, y: &[usize]) -> Result<Fixed> {
            let mut counts = vec![0usize; y.iter().max().map_or(1, |m| m + 1)];
            y.iter().for_each(|&l| counts[l] += 1);
            let best = (0..counts.len()).max_by_key(|&i| (counts[i], std::cmp::Reverse(i))).unwrap_or(0);
            Ok(Fixed(best))
        }
    }

    #[test]
    fn test_k_scores_and_mean() {
        let ds = iris().unwrap();
        let result = cross_validate(&DecisionTreeConfig::default(), ds.features(), ds.labels(), &CrossValidator::new(CVStrategy::KFold { n_splits: 5, shuffle: true }).with_random_state(0)).unwrap();
        assert_eq!(result.scores.len(), 5);
        assert_eq!(result.n_folds, 5);
        assert!(result.scores.iter().all(|s| (0.0..=1.0).contains(s)));
        let mean = result.scores.iter().sum::<f64>() / 5.0;
        assert!((result.mean_score - mean).abs() < 1e-12);
        assert!(result.mean_score > 0.85);
    }

    #[test]
    fn test_contiguous_folds_on_sorted_labels() {
        // Unshuffled folds of class-sorted iris hold out whole blocks of one class
        let ds = iris().unwrap();
        let result = cross_validate(&Majority, ds.features(), ds.labels(), &CrossValidator::k_fold(3)).unwrap();
        assert_eq!(result.scores, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_fold_order_preserved() {
        let x = Array2::zeros((6, 1));
        let y = vec![0, 0, 0, 0, 1, 1];
        // Fold 0 holds out [0,1]; the rest has majority 0. Fold 2 holds out [4,5]; majority 0.
        let result = cross_validate(&Majority, &x, &y, &CrossValidator::k_fold(3)).unwrap();
        assert_eq!(result.scores, vec![1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_single_fold_rejected() {
        let ds = iris().unwrap();
        let err = cross_validate(&Majority, ds.features(), ds.labels(), &CrossValidator::k_fold(1)).unwrap_err();
        assert!(matches!(err, EvalError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_too_many_folds_rejected() {
        let x = Array2::zeros((3, 1));
        let err = cross_validate(&Majority, &x, &[0, 1, 0], &CrossValidator::k_fold(4)).unwrap_err();
        assert!(matches!(err, EvalError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_std_score() {
        let result = CrossValidationResult::from_scores(vec![0.5, 1.0]);
        assert_eq!(result.mean_score, 0.75);
        assert_eq!(result.std_score, 0.25);
    }
}
