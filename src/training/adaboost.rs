//! AdaBoost (Adaptive Boosting) over decision trees
//!
//! Multi-class SAMME: each round fits a shallow tree to the current sample weights,
//! then up-weights the samples it got wrong. Predictions are an alpha-weighted vote.

use super::decision_tree::{DecisionTreeClassifier, DecisionTreeConfig};
use super::models::{class_index, Classifier, Trainer};
use crate::error::{EvalError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Boosting hyperparameters; also acts as the AdaBoost [`Trainer`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaBoostConfig {
    /// Maximum number of boosting rounds
    pub n_estimators: usize,
    /// Shrinks each estimator's weight
    pub learning_rate: f64,
    /// Base learner
    pub base: DecisionTreeConfig,
}

impl Default for AdaBoostConfig {
    fn default() -> Self {
        Self {
            n_estimators: 50,
            learning_rate: 1.0,
            base: DecisionTreeConfig::stump(),
        }
    }
}

impl AdaBoostConfig {
    pub fn new(n_estimators: usize, learning_rate: f64) -> Self {
        Self {
            n_estimators,
            learning_rate,
            ..Default::default()
        }
    }

    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    /// Depth of each base tree
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.base = self.base.with_max_depth(depth);
        self
    }

    pub fn with_base(mut self, base: DecisionTreeConfig) -> Self {
        self.base = base;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(EvalError::InvalidConfiguration(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if !(self.learning_rate > 0.0) || !self.learning_rate.is_finite() {
            return Err(EvalError::InvalidConfiguration(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

impl Trainer for AdaBoostConfig {
    type Model = AdaBoostClassifier;

    fn train(&self, x: &Array2<f64>, y: &[usize]) -> Result<AdaBoostClassifier> {
        self.validate()?;

        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(EvalError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(EvalError::InvalidInput("cannot boost on zero samples".to_string()));
        }

        let (classes, _) = class_index(y);
        let n_classes = classes.len() as f64;
        let mut weights = vec![1.0 / n_samples as f64; n_samples];

        let mut estimators = Vec::with_capacity(self.n_estimators);
        let mut alphas = Vec::with_capacity(self.n_estimators);
        let mut errors = Vec::with_capacity(self.n_estimators);

        for round in 0..self.n_estimators {
            let tree = self.base.fit_weighted(x, y, &weights)?;
            let incorrect: Vec<bool> = tree
                .predict(x)
                .iter()
                .zip(y.iter())
                .map(|(p, t)| p != t)
                .collect();

            let w_sum: f64 = weights.iter().sum();
            let error = incorrect
                .iter()
                .zip(weights.iter())
                .filter(|(&miss, _)| miss)
                .map(|(_, &w)| w)
                .sum::<f64>()
                / w_sum;

            // Perfect fit: keep it with unit weight and stop
            if error <= 0.0 {
                debug!(round, "estimator fits perfectly, stopping early");
                estimators.push(tree);
                alphas.push(1.0);
                errors.push(0.0);
                break;
            }

            // No better than chance: discard and stop
            if error >= 1.0 - 1.0 / n_classes {
                if estimators.is_empty() {
                    return Err(EvalError::TrainingError(format!(
                        "first base estimator is no better than chance (error {:.4})",
                        error
                    )));
                }
                debug!(round, error, "estimator no better than chance, stopping");
                break;
            }

            let alpha = self.learning_rate * (((1.0 - error) / error).ln() + (n_classes - 1.0).ln());

            if round + 1 < self.n_estimators {
                let boost = alpha.exp();
                for (w, &miss) in weights.iter_mut().zip(incorrect.iter()) {
                    if miss {
                        *w *= boost;
                    }
                }
                let total: f64 = weights.iter().sum();
                weights.iter_mut().for_each(|w| *w /= total);
            }

            estimators.push(tree);
            alphas.push(alpha);
            errors.push(error);
        }

        debug!(n_estimators = estimators.len(), "boosting finished");
        Ok(AdaBoostClassifier {
            estimators,
            alphas,
            errors,
            classes,
            n_features: x.ncols(),
        })
    }
}

/// Fitted AdaBoost ensemble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaBoostClassifier {
    estimators: Vec<DecisionTreeClassifier>,
    alphas: Vec<f64>,
    errors: Vec<f64>,
    classes: Vec<usize>,
    n_features: usize,
}

impl AdaBoostClassifier {
    /// Number of trees kept after early stopping
    pub fn n_estimators(&self) -> usize {
        self.estimators.len()
    }

    pub fn estimator_weights(&self) -> &[f64] {
        &self.alphas
    }

    /// Weighted training error of each kept tree
    pub fn estimator_errors(&self) -> &[f64] {
        &self.errors
    }

    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    /// Alpha-weighted vote per class, in [`classes`](Self::classes) order
    pub fn decision_scores(&self, sample: ArrayView1<'_, f64>) -> Vec<f64> {
        let mut scores = vec![0.0; self.classes.len()];
        for (tree, &alpha) in self.estimators.iter().zip(self.alphas.iter()) {
            let pred = tree.predict_one(sample);
            if let Ok(pos) = self.classes.binary_search(&pred) {
                scores[pos] += alpha;
            }
        }
        scores
    }

    /// Alpha-weighted mean of the trees' feature importances
    pub fn feature_importances(&self) -> Array1<f64> {
        let mut importances = Array1::zeros(self.n_features);
        let alpha_sum: f64 = self.alphas.iter().sum();
        if alpha_sum <= 0.0 {
            return importances;
        }
        for (tree, &alpha) in self.estimators.iter().zip(self.alphas.iter()) {
            importances.scaled_add(alpha / alpha_sum, tree.feature_importances());
        }
        importances
    }
}

impl Classifier for AdaBoostClassifier {
    fn predict_one(&self, sample: ArrayView1<'_, f64>) -> usize {
        let scores = self.decision_scores(sample);
        let best = scores
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |(bi, bv), (i, &v)| if v > bv { (i, v) } else { (bi, bv) })
            .0;
        self.classes[best]
    }
}
