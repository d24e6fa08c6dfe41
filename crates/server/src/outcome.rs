//! Typed result of one prediction request.
//!
//! The service never panics or bubbles an error out of a prediction; it
//! returns a `PredictionOutcome` and leaves presentation to the caller.

use features::FeatureError;
use inference::InferenceError;
use serde::Serialize;

/// Successful prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Predicted revenue in dollars
    pub revenue: f64,
    /// Whether a target scaler was inverted
    pub inverse_scaled: bool,
}

/// Why a prediction failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Raw input outside the allowed ranges or choices
    InvalidInput,
    /// Record shape disagrees with the artifacts
    SchemaMismatch,
    /// An artifact could not be found or loaded
    ArtifactMissing,
    /// The model produced something unusable
    InvalidOutput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionFailure {
    pub reason: FailureReason,
    pub message: String,
}

impl From<InferenceError> for PredictionFailure {
    fn from(err: InferenceError) -> Self {
        let reason = match &err {
            InferenceError::SchemaMismatch(_) | InferenceError::ArtifactIncompatible(_) => {
                FailureReason::SchemaMismatch
            }
            InferenceError::ArtifactMissing { .. } | InferenceError::ArtifactLoad { .. } => {
                FailureReason::ArtifactMissing
            }
            InferenceError::UnexpectedOutputLength { .. } | InferenceError::NonFinite { .. } => {
                FailureReason::InvalidOutput
            }
        };
        Self {
            reason,
            message: err.to_string(),
        }
    }
}

impl From<FeatureError> for PredictionFailure {
    fn from(err: FeatureError) -> Self {
        Self {
            reason: FailureReason::InvalidInput,
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PredictionOutcome {
    Success(PredictionResult),
    Failure(PredictionFailure),
}

impl PredictionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PredictionOutcome::Success(_))
    }

    pub fn revenue(&self) -> Option<f64> {
        match self {
            PredictionOutcome::Success(result) => Some(result.revenue),
            PredictionOutcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&PredictionFailure> {
        match self {
            PredictionOutcome::Success(_) => None,
            PredictionOutcome::Failure(failure) => Some(failure),
        }
    }
}
