//! Learner selection

use crate::error::EvalError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type of model to train
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    /// AdaBoost over shallow decision trees
    AdaBoost,
    /// Single decision tree
    DecisionTree,
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::AdaBoost
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelType::AdaBoost => write!(f, "adaboost"),
            ModelType::DecisionTree => write!(f, "decision_tree"),
        }
    }
}

impl FromStr for ModelType {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "adaboost" | "ada_boost" => Ok(ModelType::AdaBoost),
            "decision_tree" | "tree" => Ok(ModelType::DecisionTree),
            other => Err(EvalError::InvalidConfiguration(format!(
                "unknown model type '{}' (expected adaboost or decision_tree)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_type() {
        assert_eq!("AdaBoost".parse::<ModelType>().unwrap(), ModelType::AdaBoost);
        assert_eq!("decision-tree".parse::<ModelType>().unwrap(), ModelType::DecisionTree);
        assert!("svm".parse::<ModelType>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for model in [ModelType::AdaBoost, ModelType::DecisionTree] {
            assert_eq!(model.to_string().parse::<ModelType>().unwrap(), model);
        }
    }
}
