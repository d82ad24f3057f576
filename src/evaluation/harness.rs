//! End-to-end evaluation: split, train, score, cross-validate

use super::compare::compare;
use super::confusion::confusion_matrix;
use super::cross_validate::cross_validate;
use super::metrics::accuracy_score;
use super::report::EvaluationReport;
use crate::data::{train_test_split, Dataset, SplitConfig};
use crate::error::Result;
use crate::training::{CVStrategy, Classifier, CrossValidator, Trainer};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Harness configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Train/test split
    pub split: SplitConfig,
    /// Cross-validation on the training subset (`None` skips it)
    pub cv: Option<CVStrategy>,
    /// Seed for shuffled folds
    pub cv_random_state: Option<u64>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            split: SplitConfig::default(),
            cv: Some(CVStrategy::default()),
            cv_random_state: Some(0),
        }
    }
}

impl HarnessConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn with_split(mut self, split: SplitConfig) -> Self {
        self.split = split;
        self
    }

    pub fn with_cv(mut self, strategy: CVStrategy) -> Self {
        self.cv = Some(strategy);
        self
    }

    /// Contiguous K-Fold with `folds` groups
    pub fn with_cv_folds(self, folds: usize) -> Self {
        self.with_cv(CVStrategy::KFold { n_splits: folds, shuffle: false })
    }

    pub fn without_cv(mut self) -> Self {
        self.cv = None;
        self
    }

    pub fn cross_validator(&self) -> Option<CrossValidator> {
        self.cv.clone().map(|strategy| {
            let cv = CrossValidator::new(strategy);
            match self.cv_random_state {
                Some(seed) => cv.with_random_state(seed),
                None => cv,
            }
        })
    }

    /// Check split fraction and fold count for a dataset of `n_samples`
    pub fn validate(&self, n_samples: usize) -> Result<()> {
        let (n_train, _) = self.split.sizes(n_samples)?;
        if let Some(cv) = self.cross_validator() {
            cv.validate(n_train)?;
        }
        Ok(())
    }
}

/// Runs the full evaluation sequence against any [`Trainer`]
#[derive(Debug, Clone, Default)]
pub struct EvaluationHarness {
    config: HarnessConfig,
}

impl EvaluationHarness {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Evaluate `trainer` on `dataset`. Either every metric is produced or an error is
    /// returned; configuration is checked before any training.
    pub fn run<T: Trainer>(&self, trainer: &T, dataset: &Dataset) -> Result<EvaluationReport> {
        let start = Instant::now();
        self.config.validate(dataset.n_samples())?;

        let split = train_test_split(dataset, &self.config.split)?;
        info!(
            train = split.train.n_samples(),
            test = split.test.n_samples(),
            "split dataset"
        );

        let model = trainer.train_on(&split.train)?;
        let train_pred = model.predict(split.train.features());
        let test_pred = model.predict(split.test.features());

        let train_accuracy = accuracy_score(split.train.labels(), &train_pred)?;
        let test_accuracy = accuracy_score(split.test.labels(), &test_pred)?;
        let confusion = confusion_matrix(split.test.labels(), &test_pred, dataset.n_classes())?;
        let predictions = compare(split.test.labels(), &test_pred)?.iter().collect();
        info!(train_accuracy, test_accuracy, misclassified = confusion.misclassified(), "scored model");

        let cross_validation = match self.config.cross_validator() {
            Some(cv) => Some(cross_validate(
                trainer,
                split.train.features(),
                split.train.labels(),
                &cv,
            )?),
            None => None,
        };
        if let Some(cv) = &cross_validation {
            info!(mean = cv.mean_score, std = cv.std_score, "cross-validation done");
        }

        info!(elapsed_secs = start.elapsed().as_secs_f64(), "evaluation completed");
        Ok(EvaluationReport {
            model: None,
            n_train: split.train.n_samples(),
            n_test: split.test.n_samples(),
            train_accuracy,
            test_accuracy,
            misclassified: confusion.misclassified(),
            confusion_matrix: confusion,
            predictions,
            test_indices: split.test_indices,
            class_names: dataset.class_names().to_vec(),
            cross_validation,
        })
    }
}
