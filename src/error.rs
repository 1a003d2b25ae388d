//! Error types for the Spotify ML pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, MlError>;

/// Main error type for the pipeline
///
/// Nothing is retried: every variant aborts the current run and its message is
/// surfaced to the user as-is.
#[derive(Error, Debug)]
pub enum MlError {
    #[error("No input file supplied")]
    MissingInput,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

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

impl MlError {
    pub(crate) fn invalid_parameter(
        name: &str,
        value: impl ToString,
        reason: &str,
    ) -> Self {
        MlError::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<polars::error::PolarsError> for MlError {
    fn from(err: polars::error::PolarsError) -> Self {
        MlError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for MlError {
    fn from(err: serde_json::Error) -> Self {
        MlError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for MlError {
    fn from(err: ndarray::ShapeError) -> Self {
        MlError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
