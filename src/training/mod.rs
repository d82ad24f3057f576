//! Model training module
//!
//! The evaluator only sees the [`Classifier`] and [`Trainer`] traits. This module
//! provides the learners behind them:
//! - Decision trees (CART with sample weights)
//! - AdaBoost (multi-class SAMME over decision trees)
//! - K-Fold and stratified K-Fold splitters for cross-validation

mod config;
mod models;
pub mod adaboost;
pub mod cross_validation;
pub mod decision_tree;

pub use config::ModelType;
pub use models::{Classifier, Trainer};
pub use adaboost::{AdaBoostClassifier, AdaBoostConfig};
pub use cross_validation::{CrossValidator, CVStrategy, CVSplit};
pub use decision_tree::{Criterion, DecisionTreeClassifier, DecisionTreeConfig, TreeNode};
