//! Evaluation of trained classifiers
//!
//! Metrics over paired truth/prediction sequences, cross-validation over any
//! [`Trainer`](crate::training::Trainer), and the end-to-end harness that ties
//! them together.

mod compare;
mod confusion;
mod cross_validate;
mod harness;
mod metrics;
mod report;
mod scan;

pub use compare::{compare, Comparison, ComparisonIter, PredictionRow};
pub use confusion::{confusion_matrix, ConfusionMatrix};
pub use cross_validate::{cross_validate, CrossValidationResult};
pub use harness::{EvaluationHarness, HarnessConfig};
pub use metrics::{accuracy, accuracy_score, misclassified_count};
pub use report::EvaluationReport;
pub use scan::{scan_split_fractions, SplitScanPoint, DEFAULT_SCAN_FRACTIONS};
