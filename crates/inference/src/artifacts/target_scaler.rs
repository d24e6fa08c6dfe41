//! Optional scaler that was fitted on the training target.

use crate::traits::TargetScaler;
use serde::{Deserialize, Serialize};

fn unit_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// The `target_scaler.json` artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FittedTargetScaler {
    /// Forward: `(y - mean) / scale`
    Standard { mean: f64, scale: f64 },
    /// Forward: `(y - data_min) / (data_max - data_min) * (b - a) + a`
    MinMax {
        data_min: f64,
        data_max: f64,
        #[serde(default = "unit_range")]
        feature_range: (f64, f64),
    },
}

impl FittedTargetScaler {
    pub fn inverse(&self, x: f64) -> f64 {
        match *self {
            FittedTargetScaler::Standard { mean, scale } => x * scale + mean,
            FittedTargetScaler::MinMax {
                data_min,
                data_max,
                feature_range: (a, b),
            } => (x - a) / (b - a) * (data_max - data_min) + data_min,
        }
    }

    /// Structural checks run once at load time.
    pub fn validate(&self) -> std::result::Result<(), String> {
        match *self {
            FittedTargetScaler::Standard { mean, scale } => {
                if !mean.is_finite() || !scale.is_finite() {
                    return Err("standard scaler has non-finite parameters".to_string());
                }
            }
            FittedTargetScaler::MinMax {
                data_min,
                data_max,
                feature_range: (a, b),
            } => {
                if ![data_min, data_max, a, b].iter().all(|p| p.is_finite()) {
                    return Err("min-max scaler has non-finite parameters".to_string());
                }
                if a >= b {
                    return Err(format!("min-max feature range ({a}, {b}) is empty"));
                }
            }
        }
        Ok(())
    }
}

impl TargetScaler for FittedTargetScaler {
    fn name(&self) -> &str {
        match self {
            FittedTargetScaler::Standard { .. } => "StandardScaler",
            FittedTargetScaler::MinMax { .. } => "MinMaxScaler",
        }
    }

    fn inverse_transform(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&x| self.inverse(x)).collect()
    }
}
