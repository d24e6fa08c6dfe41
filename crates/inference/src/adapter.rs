//! The inference adapter.
//!
//! Runs one feature record through the loaded artifacts:
//! 1. `transform` the record into a single-row matrix
//! 2. `predict` one value in log1p space
//! 3. `expm1` to undo the log transform used in training
//! 4. inverse target scaling, only if a scaler was loaded at startup
//! 5. return the single value

use crate::error::{InferenceError, Result};
use crate::traits::{Preprocessor, Regressor, TargetScaler};
use features::{FeatureRecord, FeatureSchema};
use std::sync::Arc;
use tracing::debug;

/// Undo the `log1p` applied to the training target.
pub fn invert_log_target(raw: &[f64]) -> Vec<f64> {
    raw.iter().map(|v| v.exp_m1()).collect()
}

fn ensure_finite(stage: &'static str, values: &[f64]) -> Result<()> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(InferenceError::NonFinite { stage, value }),
        None => Ok(()),
    }
}

/// Holds the loaded artifacts and runs predictions against them.
///
/// Cloning is cheap: artifacts are shared behind `Arc` and never mutated.
#[derive(Clone)]
pub struct InferenceAdapter {
    preprocessor: Arc<dyn Preprocessor>,
    regressor: Arc<dyn Regressor>,
    target_scaler: Option<Arc<dyn TargetScaler>>,
}

impl InferenceAdapter {
    /// Create an adapter without target scaling.
    pub fn new(preprocessor: Arc<dyn Preprocessor>, regressor: Arc<dyn Regressor>) -> Self {
        Self {
            preprocessor,
            regressor,
            target_scaler: None,
        }
    }

    /// Add a target scaler (builder pattern).
    pub fn with_target_scaler(mut self, scaler: Arc<dyn TargetScaler>) -> Self {
        self.target_scaler = Some(scaler);
        self
    }

    /// Whether predictions are inverse-scaled. Decided once, at construction.
    pub fn has_target_scaler(&self) -> bool {
        self.target_scaler.is_some()
    }

    /// Startup check that the artifacts agree with the declared schema and
    /// with each other.
    ///
    /// Catches vocabulary or field-order drift before the first request
    /// instead of surfacing it as a shape error at prediction time.
    pub fn check_compatibility(&self, schema: &FeatureSchema) -> Result<()> {
        let pre = &self.preprocessor;

        self.regressor.check_structure().map_err(|reason| {
            InferenceError::ArtifactIncompatible(format!("{}: {}", self.regressor.name(), reason))
        })?;

        if pre.schema_version() != schema.version() {
            return Err(InferenceError::ArtifactIncompatible(format!(
                "{} was fitted on feature schema v{}, encoder produces v{}",
                pre.name(),
                pre.schema_version(),
                schema.version()
            )));
        }

        let columns = pre.input_columns();
        if columns.len() != schema.len() {
            return Err(InferenceError::ArtifactIncompatible(format!(
                "{} expects {} input columns, feature schema declares {}",
                pre.name(),
                columns.len(),
                schema.len()
            )));
        }
        if let Some((position, (column, field))) = columns
            .iter()
            .zip(schema.names())
            .enumerate()
            .find(|(_, (column, field))| *column != field)
        {
            return Err(InferenceError::ArtifactIncompatible(format!(
                "{} expects '{}' at position {}, feature schema declares '{}'",
                pre.name(),
                column,
                position,
                field
            )));
        }

        if pre.output_width() != self.regressor.n_features() {
            return Err(InferenceError::ArtifactIncompatible(format!(
                "{} produces {} columns, {} expects {}",
                pre.name(),
                pre.output_width(),
                self.regressor.name(),
                self.regressor.n_features()
            )));
        }

        debug!(
            "Artifacts match feature schema v{} ({} fields)",
            schema.version(),
            schema.len()
        );
        Ok(())
    }

    /// Predict revenue for one record.
    ///
    /// # Returns
    /// * `Ok(f64)` - Revenue in original currency units
    /// * `Err` - Schema mismatch, unexpected model output or non-finite result
    pub fn predict(&self, record: &FeatureRecord) -> Result<f64> {
        let matrix = self.preprocessor.transform(record)?;
        debug!(
            "{} produced a {}x{} matrix",
            self.preprocessor.name(),
            matrix.n_rows(),
            matrix.n_cols()
        );

        let raw = self.regressor.predict(&matrix)?;
        if raw.len() != 1 {
            return Err(InferenceError::UnexpectedOutputLength {
                expected: 1,
                found: raw.len(),
            });
        }
        ensure_finite("predict", &raw)?;
        debug!("{} raw prediction (log1p space): {}", self.regressor.name(), raw[0]);

        let mut values = invert_log_target(&raw);
        ensure_finite("expm1", &values)?;

        if let Some(scaler) = &self.target_scaler {
            values = scaler.inverse_transform(&values);
            ensure_finite("inverse target scaling", &values)?;
            debug!("Applied {} inverse transform", scaler.name());
        }

        values
            .first()
            .copied()
            .ok_or(InferenceError::UnexpectedOutputLength {
                expected: 1,
                found: 0,
            })
    }
}

impl std::fmt::Debug for InferenceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceAdapter")
            .field("preprocessor", &self.preprocessor.name())
            .field("regressor", &self.regressor.name())
            .field(
                "target_scaler",
                &self.target_scaler.as_ref().map(|s| s.name().to_string()),
            )
            .finish()
    }
}
