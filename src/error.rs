//! Error taxonomy for the scoring pipeline.
//!
//! Every request-level failure is one of four kinds. None of them touch
//! process-wide state, so a failed request never affects the next one.

use std::path::PathBuf;
use thiserror::Error;

/// A required field is missing or cannot be parsed into its type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("field '{field}' must be an integer, got '{value}'")]
    NotInteger { field: &'static str, value: String },

    #[error("field '{field}' must be numeric, got '{value}'")]
    NotNumeric { field: &'static str, value: String },

    #[error("field '{field}' must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
}

/// A categorical value that was never seen at training time.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("column '{column}' has unknown category '{value}'")]
pub struct EncodingError {
    pub column: String,
    pub value: String,
}

/// The encoded record does not line up with the feature schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("schema column '{column}' is missing from the record")]
    MissingColumn { column: String },

    #[error("schema column '{column}' is not numeric after encoding")]
    NotEncoded { column: String },
}

/// Failure inside the scaler or classifier.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("{stage} expects {expected} features, got {actual}")]
    Dimension {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{stage} produced a non-finite value")]
    NonFinite { stage: &'static str },

    #[error("classifier returned probability {0} outside [0, 1]")]
    OutOfRange(f64),

    #[error("classifier backend failed: {0}")]
    Backend(String),
}

/// Any failure of a single scoring request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

impl PipelineError {
    /// Stable tag used by the JSON API and the metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "validation",
            PipelineError::Encoding(_) => "encoding",
            PipelineError::Schema(_) => "schema",
            PipelineError::Scoring(_) => "scoring",
        }
    }

    /// Text shown to the person who submitted the form.
    pub fn display_message(&self) -> String {
        format!("Error: {}", self)
    }
}

/// Problems with the artifact bundle, detected once at startup.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact '{}' not found", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read artifact '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed artifact '{}': {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("inconsistent artifacts: {0}")]
    Inconsistent(String),

    #[error("classifier could not be loaded: {0}")]
    Classifier(String),
}
