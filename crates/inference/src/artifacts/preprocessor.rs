//! Column-wise preprocessor exported from the training pipeline.
//!
//! Each fitted column carries its own transform. Names and order are checked
//! strictly against the incoming record, the same way the fitted transform
//! refuses frames whose feature names differ from the ones it saw at fit
//! time.

use crate::error::{Result, SchemaMismatch};
use crate::matrix::FeatureMatrix;
use crate::traits::Preprocessor;
use features::FeatureRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How a single fitted column maps its raw value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnTransform {
    Passthrough,
    /// `(x - mean) / scale`
    Standard { mean: f64, scale: f64 },
    /// `(x - min) / (max - min)`
    MinMax { min: f64, max: f64 },
    /// `(ln(1 + x) - mean) / scale`
    Log1pStandard { mean: f64, scale: f64 },
}

impl ColumnTransform {
    pub fn apply(&self, x: f64) -> f64 {
        match *self {
            ColumnTransform::Passthrough => x,
            ColumnTransform::Standard { mean, scale } => (x - mean) / non_zero(scale),
            ColumnTransform::MinMax { min, max } => (x - min) / non_zero(max - min),
            ColumnTransform::Log1pStandard { mean, scale } => (x.ln_1p() - mean) / non_zero(scale),
        }
    }

    fn parameters(&self) -> Vec<f64> {
        match *self {
            ColumnTransform::Passthrough => vec![],
            ColumnTransform::Standard { mean, scale } => vec![mean, scale],
            ColumnTransform::MinMax { min, max } => vec![min, max],
            ColumnTransform::Log1pStandard { mean, scale } => vec![mean, scale],
        }
    }
}

/// Constant columns are fitted with a zero spread; treat it as 1
fn non_zero(spread: f64) -> f64 {
    if spread == 0.0 { 1.0 } else { spread }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub transform: ColumnTransform,
}

/// The `preprocessor.json` artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnPreprocessor {
    pub schema_version: u32,
    pub columns: Vec<Column>,
}

impl ColumnPreprocessor {
    /// Structural checks run once at load time.
    ///
    /// Returns a human-readable reason on failure.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.columns.is_empty() {
            return Err("preprocessor declares no columns".to_string());
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(format!("column '{}' is declared twice", column.name));
            }
            if column.transform.parameters().iter().any(|p| !p.is_finite()) {
                return Err(format!("column '{}' has non-finite parameters", column.name));
            }
        }
        Ok(())
    }

    /// Compare record field names against the fitted columns.
    fn check_names(&self, record: &FeatureRecord) -> std::result::Result<(), SchemaMismatch> {
        if let Some(column) = self.columns.iter().find(|c| !record.contains(&c.name)) {
            return Err(SchemaMismatch::MissingField {
                name: column.name.clone(),
            });
        }

        let known: HashSet<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        if let Some(name) = record.names().find(|name| !known.contains(name)) {
            return Err(SchemaMismatch::UnexpectedField {
                name: name.to_string(),
            });
        }

        // Same set of names, but possibly shuffled or duplicated
        if record.len() != self.columns.len() {
            return Err(SchemaMismatch::Width {
                expected: self.columns.len(),
                found: record.len(),
            });
        }
        for (position, (column, found)) in self.columns.iter().zip(record.names()).enumerate() {
            if column.name != found {
                return Err(SchemaMismatch::FieldOrder {
                    position,
                    expected: column.name.clone(),
                    found: found.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Preprocessor for ColumnPreprocessor {
    fn name(&self) -> &str {
        "ColumnPreprocessor"
    }

    fn schema_version(&self) -> u32 {
        self.schema_version
    }

    fn input_columns(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    fn output_width(&self) -> usize {
        self.columns.len()
    }

    fn transform(&self, record: &FeatureRecord) -> Result<FeatureMatrix> {
        self.check_names(record)?;

        let row = self
            .columns
            .iter()
            .zip(record.iter())
            .map(|(column, feature)| column.transform.apply(feature.value))
            .collect();

        Ok(FeatureMatrix::single_row(row))
    }
}
