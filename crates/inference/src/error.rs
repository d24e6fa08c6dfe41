//! Error types for the inference crate.

use std::path::PathBuf;
use thiserror::Error;

/// Ways a feature record or matrix can disagree with what an artifact expects
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaMismatch {
    #[error("feature '{name}' is missing from the record")]
    MissingField { name: String },

    #[error("feature '{name}' was not seen when the preprocessor was fitted")]
    UnexpectedField { name: String },

    #[error("expected feature '{expected}' at position {position}, found '{found}'")]
    FieldOrder {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("expected {expected} input columns, got {found}")]
    Width { expected: usize, found: usize },
}

/// Errors that can occur while loading artifacts or running a prediction
#[derive(Error, Debug)]
pub enum InferenceError {
    /// Record or matrix shape disagrees with the artifact
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(#[from] SchemaMismatch),

    /// A required artifact file does not exist
    #[error("Artifact not found: {}", path.display())]
    ArtifactMissing { path: PathBuf },

    /// An artifact exists but could not be read or parsed
    #[error("Failed to load artifact {}: {reason}", path.display())]
    ArtifactLoad { path: PathBuf, reason: String },

    /// Artifacts loaded fine but do not fit together or with the schema
    #[error("Incompatible artifacts: {0}")]
    ArtifactIncompatible(String),

    /// The model returned something other than one value per row
    #[error("Expected {expected} prediction(s), model returned {found}")]
    UnexpectedOutputLength { expected: usize, found: usize },

    /// A stage of the de-transform chain produced inf or NaN
    #[error("Non-finite value {value} after {stage}")]
    NonFinite { stage: &'static str, value: f64 },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, InferenceError>;
