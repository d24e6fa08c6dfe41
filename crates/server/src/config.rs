//! Where the service finds its artifacts.

use std::path::PathBuf;

pub const DEFAULT_MODEL_FILE: &str = "model.json";
pub const DEFAULT_PREPROCESSOR_FILE: &str = "preprocessor.json";
pub const DEFAULT_TARGET_SCALER_FILE: &str = "target_scaler.json";

/// Artifact locations.
///
/// File names are resolved against `dir`; an absolute file name wins over
/// the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    pub model: PathBuf,
    pub preprocessor: PathBuf,
    pub target_scaler: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(&self.model)
    }

    pub fn preprocessor_path(&self) -> PathBuf {
        self.dir.join(&self.preprocessor)
    }

    pub fn target_scaler_path(&self) -> PathBuf {
        self.dir.join(&self.target_scaler)
    }
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            model: PathBuf::from(DEFAULT_MODEL_FILE),
            preprocessor: PathBuf::from(DEFAULT_PREPROCESSOR_FILE),
            target_scaler: PathBuf::from(DEFAULT_TARGET_SCALER_FILE),
        }
    }
}
