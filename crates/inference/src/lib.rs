//! Inference for box office revenue prediction.
//!
//! This crate provides:
//! - Traits describing the externally trained artifacts (Preprocessor,
//!   Regressor, TargetScaler)
//! - JSON artifact formats and their async loaders
//! - InferenceAdapter, which runs transform → predict → expm1 → optional
//!   inverse target scaling
//!
//! ## Architecture
//! Artifacts are loaded once at startup and shared read-only. Each
//! prediction then runs synchronously:
//! 1. The preprocessor turns a FeatureRecord into a single-row matrix
//! 2. The model predicts one value in log1p space
//! 3. The adapter undoes the log transform and, if a target scaler was
//!    loaded, its scaling
//!
//! ## Example Usage
//! ```ignore
//! use inference::{artifacts, InferenceAdapter};
//! use std::sync::Arc;
//!
//! let preprocessor = artifacts::load_preprocessor(Path::new("preprocessor.json")).await?;
//! let model = artifacts::load_model(Path::new("model.json")).await?;
//!
//! let adapter = InferenceAdapter::new(Arc::new(preprocessor), Arc::new(model));
//! adapter.check_compatibility(&FeatureSchema::CURRENT)?;
//!
//! let revenue = adapter.predict(&record)?;
//! ```

pub mod error;
pub mod matrix;
pub mod traits;
pub mod artifacts;
pub mod adapter;

// Re-export main types
pub use error::{InferenceError, Result, SchemaMismatch};
pub use matrix::FeatureMatrix;
pub use traits::{Preprocessor, Regressor, TargetScaler};
pub use adapter::{InferenceAdapter, invert_log_target};
