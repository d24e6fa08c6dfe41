//! Core traits for the inference chain.
//!
//! The preprocessor, model and target scaler are trained elsewhere and
//! handed to us as artifacts. These traits are the only things the adapter
//! knows about them, so tests can swap in hand-written stand-ins.
//!
//! ## Design Note
//! - `Send + Sync` because loaded artifacts are shared read-only behind `Arc`
//! - Nothing here takes `&mut self`: artifacts are never mutated after load

use crate::error::Result;
use crate::matrix::FeatureMatrix;
use features::FeatureRecord;

/// Maps a feature record to a model-ready matrix.
pub trait Preprocessor: Send + Sync {
    /// Returns the name of this preprocessor (for logging/debugging)
    fn name(&self) -> &str;

    /// Schema version the preprocessor was fitted against
    fn schema_version(&self) -> u32;

    /// Feature names the preprocessor expects, in order
    fn input_columns(&self) -> Vec<&str>;

    /// Number of columns in the transformed matrix
    fn output_width(&self) -> usize;

    /// Transform one record into a single-row matrix.
    ///
    /// # Returns
    /// * `Ok(FeatureMatrix)` - One row, `output_width()` columns
    /// * `Err(SchemaMismatch)` - Missing, unexpected or reordered fields
    fn transform(&self, record: &FeatureRecord) -> Result<FeatureMatrix>;
}

/// A fitted regression model.
pub trait Regressor: Send + Sync {
    fn name(&self) -> &str;

    /// Input width the model was trained on
    fn n_features(&self) -> usize;

    /// One raw prediction per matrix row
    fn predict(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>>;

    /// Internal consistency of the fitted parameters, checked at startup.
    ///
    /// Returns a human-readable reason on failure.
    fn check_structure(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// A fitted scaler that was applied to the training target.
pub trait TargetScaler: Send + Sync {
    fn name(&self) -> &str;

    /// Map scaled values back to original units
    fn inverse_transform(&self, values: &[f64]) -> Vec<f64>;
}
