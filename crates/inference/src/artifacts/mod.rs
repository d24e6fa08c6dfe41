//! Artifact formats and loaders.
//!
//! Artifacts are JSON documents exported by the training pipeline. Each
//! loader reads the file once, parses it and runs the artifact's structural
//! checks, so anything that comes back `Ok` is ready to serve.

pub mod preprocessor;
pub mod regressor;
pub mod target_scaler;

pub use preprocessor::{Column, ColumnPreprocessor, ColumnTransform};
pub use regressor::{Aggregation, LinearModel, Node, RegressionModel, Tree, TreeEnsemble};
pub use target_scaler::FittedTargetScaler;

use crate::error::{InferenceError, Result};
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// Read and parse a JSON artifact.
async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            InferenceError::ArtifactMissing {
                path: path.to_path_buf(),
            }
        } else {
            InferenceError::ArtifactLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        }
    })?;
    debug!("Read {} bytes from {}", text.len(), path.display());

    serde_json::from_str(&text).map_err(|e| InferenceError::ArtifactLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn invalid(path: &Path, reason: String) -> InferenceError {
    InferenceError::ArtifactLoad {
        path: path.to_path_buf(),
        reason,
    }
}

/// Load the preprocessor artifact. A missing file is an error.
pub async fn load_preprocessor(path: &Path) -> Result<ColumnPreprocessor> {
    let preprocessor: ColumnPreprocessor = read_json(path).await?;
    preprocessor.validate().map_err(|reason| invalid(path, reason))?;
    info!(
        "Loaded preprocessor from {} ({} columns, schema v{})",
        path.display(),
        preprocessor.columns.len(),
        preprocessor.schema_version
    );
    Ok(preprocessor)
}

/// Load the model artifact. A missing file is an error.
pub async fn load_model(path: &Path) -> Result<RegressionModel> {
    let model: RegressionModel = read_json(path).await?;
    model.validate().map_err(|reason| invalid(path, reason))?;
    info!("Loaded model from {}", path.display());
    Ok(model)
}

/// Load the optional target scaler.
///
/// Returns `Ok(None)` when the file does not exist. A file that exists but
/// cannot be parsed is still an error.
pub async fn load_target_scaler(path: &Path) -> Result<Option<FittedTargetScaler>> {
    match read_json::<FittedTargetScaler>(path).await {
        Ok(scaler) => {
            scaler.validate().map_err(|reason| invalid(path, reason))?;
            info!("Loaded target scaler from {}", path.display());
            Ok(Some(scaler))
        }
        Err(InferenceError::ArtifactMissing { .. }) => {
            info!(
                "No target scaler at {}, predictions will not be inverse-scaled",
                path.display()
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
