//! Kolosal Eval - evaluation harness for tree-based classifiers
//!
//! This crate measures how well a trained classifier performs on labeled data:
//! - Accuracy on arbitrary feature/label sets
//! - Confusion matrices and per-example truth/prediction comparison
//! - K-fold cross-validated accuracy for any learner
//! - An end-to-end harness: split, train, score, cross-validate
//!
//! # Modules
//!
//! - [`data`] - Datasets, the built-in Iris set, CSV loading, train/test splitting
//! - [`training`] - The `Classifier`/`Trainer` seams, decision trees, AdaBoost, fold splitters
//! - [`evaluation`] - Metrics, cross-validation, the harness and its report
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Data and learners
pub mod data;
pub mod training;

// Metrics and harness
pub mod evaluation;

// Services
pub mod cli;

pub use error::{EvalError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{EvalError, Result};

    // Data
    pub use crate::data::{iris, load_csv, train_test_split, Dataset, Split, SplitConfig};

    // Training
    pub use crate::training::{
        AdaBoostConfig, CVStrategy, Classifier, CrossValidator, DecisionTreeConfig, ModelType, Trainer,
    };

    // Evaluation
    pub use crate::evaluation::{
        accuracy, accuracy_score, compare, confusion_matrix, cross_validate, scan_split_fractions,
        ConfusionMatrix, CrossValidationResult, EvaluationHarness, EvaluationReport, HarnessConfig,
        PredictionRow,
    };
}
