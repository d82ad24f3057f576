//! Textual and JSON rendering of an evaluation run

use super::compare::PredictionRow;
use super::confusion::ConfusionMatrix;
use super::cross_validate::CrossValidationResult;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every metric produced by one harness run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Free-form learner description
    pub model: Option<String>,
    pub n_train: usize,
    pub n_test: usize,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
    /// Wrong predictions on the test set
    pub misclassified: usize,
    pub confusion_matrix: ConfusionMatrix,
    /// One row per test example, in test-set order
    pub predictions: Vec<PredictionRow>,
    /// Source dataset row of each test example
    pub test_indices: Vec<usize>,
    pub class_names: Vec<String>,
    /// Cross-validation on the training subset, if requested
    pub cross_validation: Option<CrossValidationResult>,
}

impl EvaluationReport {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Misclassified count as a float, the way it is printed
    pub fn misclassified_as_float(&self) -> f64 {
        self.misclassified as f64
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn class_label(&self, class: usize) -> String {
        self.class_names
            .get(class)
            .cloned()
            .unwrap_or_else(|| class.to_string())
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(model) = &self.model {
            writeln!(f, "Model:          {}", model)?;
        }
        writeln!(f, "Samples:        {} train / {} test", self.n_train, self.n_test)?;
        writeln!(f, "Train accuracy: {:.4}", self.train_accuracy)?;
        writeln!(f, "Test accuracy:  {:.4}", self.test_accuracy)?;
        writeln!(f, "Misclassified:  {:.1}", self.misclassified_as_float())?;
        writeln!(f)?;

        writeln!(f, "Confusion matrix (rows = truth, columns = prediction):")?;
        writeln!(f, "{}", self.confusion_matrix)?;
        writeln!(f)?;

        let width = self
            .class_names
            .iter()
            .map(|n| n.len())
            .max()
            .unwrap_or(0)
            .max("prediction".len());
        writeln!(
            f,
            "{:>5}  {:<width$}  {:<width$}  correct",
            "row",
            "truth",
            "prediction",
            width = width
        )?;
        for (row, PredictionRow { truth, predicted, correct }) in
            self.test_indices.iter().zip(self.predictions.iter())
        {
            writeln!(
                f,
                "{:>5}  {:<width$}  {:<width$}  {}",
                row,
                self.class_label(*truth),
                self.class_label(*predicted),
                correct,
                width = width
            )?;
        }

        if let Some(cv) = &self.cross_validation {
            writeln!(f)?;
            let scores: Vec<String> = cv.scores.iter().map(|s| format!("{:.4}", s)).collect();
            writeln!(f, "Cross-validation scores ({} folds): [{}]", cv.n_folds, scores.join(", "))?;
            writeln!(f, "Cross-validation mean:   {:.4} (std {:.4})", cv.mean_score, cv.std_score)?;
        }
        Ok(())
    }
}
