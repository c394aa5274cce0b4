//! Error types for the draft-prep pipeline

use crate::runner::{Dataset, Stage};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for draft-prep operations
pub type Result<T> = std::result::Result<T, DraftError>;

/// Main error type for the pipeline and its model collaborators
#[derive(Error, Debug)]
pub enum DraftError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Format error in {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    #[error("Schema error: column '{column}' {reason}")]
    Schema { column: String, reason: String },

    #[error("Insufficient data: class {class} has {found} samples, need at least {required}")]
    InsufficientData {
        class: i64,
        found: usize,
        required: usize,
    },

    #[error("Numeric error: column '{column}' {reason}")]
    Numeric { column: String, reason: String },

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Model files not found in {}: {missing}. Please train models first.", dir.display())]
    ModelNotFound { dir: PathBuf, missing: String },

    #[error("stage '{stage}' failed on {dataset} data")]
    Stage {
        stage: Stage,
        dataset: Dataset,
        #[source]
        source: Box<DraftError>,
    },
}

impl DraftError {
    /// IO failure tied to a file
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        DraftError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Malformed tabular input
    pub fn format(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        DraftError::Format {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn schema(column: impl Into<String>, reason: impl Into<String>) -> Self {
        DraftError::Schema {
            column: column.into(),
            reason: reason.into(),
        }
    }

    pub fn numeric(column: impl Into<String>, reason: impl Into<String>) -> Self {
        DraftError::Numeric {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Attach the failing stage and dataset to an error
    pub fn in_stage(self, stage: Stage, dataset: Dataset) -> Self {
        DraftError::Stage {
            stage,
            dataset,
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping stage wrappers
    pub fn root(&self) -> &DraftError {
        match self {
            DraftError::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<polars::error::PolarsError> for DraftError {
    fn from(err: polars::error::PolarsError) -> Self {
        DraftError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for DraftError {
    fn from(err: serde_json::Error) -> Self {
        DraftError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for DraftError {
    fn from(err: ndarray::ShapeError) -> Self {
        DraftError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
