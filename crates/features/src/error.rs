//! Error types for the features crate.
//!
//! These errors belong to the input-collection layer: the encoder itself
//! never fails, it trusts that the attributes it receives already passed
//! `MovieAttributes::validate`.

use thiserror::Error;

/// Errors that can occur while collecting raw movie attributes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatureError {
    /// A numeric input fell outside the bounds the form allows
    #[error("{field} must be between {min} and {max}, got {value}")]
    PreconditionViolation {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    /// Genre label that is not part of the fixed vocabulary
    #[error("Unknown genre: {0}")]
    UnknownGenre(String),

    /// A categorical input was not one of the offered choices
    #[error("Invalid choice for {field}: {value}")]
    InvalidChoice { field: &'static str, value: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, FeatureError>;
