//! Error types for the cytology KNN experiment

use thiserror::Error;

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, CytologyError>;

/// Main error type for loading, training and evaluation
#[derive(Error, Debug)]
pub enum CytologyError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<polars::error::PolarsError> for CytologyError {
    fn from(err: polars::error::PolarsError) -> Self {
        CytologyError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for CytologyError {
    fn from(err: serde_json::Error) -> Self {
        CytologyError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for CytologyError {
    fn from(err: ndarray::ShapeError) -> Self {
        CytologyError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
