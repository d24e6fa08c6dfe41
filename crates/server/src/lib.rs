//! Server crate for the box office revenue predictor.
//!
//! This crate contains the prediction service that ties the encoder and the
//! loaded artifacts together, the typed outcome it returns, and the helpers
//! that turn an outcome into the line a user sees.

pub mod config;
pub mod outcome;
pub mod render;
pub mod service;

pub use config::ArtifactPaths;
pub use outcome::{FailureReason, PredictionFailure, PredictionOutcome, PredictionResult};
pub use render::{format_currency, render};
pub use service::PredictionService;
