//! Error types for the feature-transformation pipeline.
//!
//! Every variant is a distinct, matchable failure so that callers (the
//! interactive session in particular) can decide whether to re-prompt,
//! retrain or abort.

use thiserror::Error;

/// Errors raised while fitting or replaying the feature transformation.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A persisted artifact needed for inference is absent (model not trained yet).
    #[error("training artifact '{name}' not found - retrain the model first")]
    ArtifactsMissing { name: String },

    /// A blob lookup in the artifact store found nothing under this name.
    #[error("no artifact stored under '{name}'")]
    NotFound { name: String },

    /// A required column is absent from the input table or record.
    #[error("missing required column: '{0}'")]
    MissingColumn(String),

    /// A learned-index categorical received a value outside its training vocabulary.
    #[error("unknown category '{value}' for column '{column}'")]
    UnknownCategory { column: String, value: String },

    /// A numeric column received a value that does not parse as a number.
    #[error("value '{value}' for column '{column}' is not a valid number")]
    InvalidNumber { column: String, value: String },

    /// The target column holds something other than a binary 0/1 label.
    #[error("target column '{column}' must contain only 0/1 labels, found '{value}'")]
    InvalidTarget { column: String, value: String },

    /// No rows survived cleaning.
    #[error("dataset is empty after removing duplicate and incomplete rows")]
    EmptyDataset,

    /// A matrix or vector does not have the width recorded at training time.
    #[error("expected {expected} feature column(s), got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("artifact storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

/// Convenience alias used throughout the pipeline.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
