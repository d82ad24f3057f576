//! Error types for the evaluation harness

use thiserror::Error;

/// Result type alias for evaluation operations
pub type Result<T> = std::result::Result<T, EvalError>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum EvalError {
    /// Mismatched sequence lengths, empty datasets, labels outside the class range
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Fold counts or split fractions outside their valid range
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },
}

impl From<polars::error::PolarsError> for EvalError {
    fn from(err: polars::error::PolarsError) -> Self {
        EvalError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for EvalError {
    fn from(err: serde_json::Error) -> Self {
        EvalError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for EvalError {
    fn from(err: ndarray::ShapeError) -> Self {
        EvalError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
