//! # Prediction Service
//!
//! This module coordinates one prediction request end to end:
//! 1. Validate the raw form input
//! 2. Encode it into a FeatureRecord
//! 3. Run the inference adapter (transform → predict → expm1 → inverse scale)
//! 4. Wrap the result or failure in a PredictionOutcome
//!
//! Artifacts are loaded once by `PredictionService::load` and shared
//! read-only afterwards. Whether a target scaler is applied is decided at
//! load time, never re-checked per request.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use features::{FeatureEncoder, FeatureRecord, FeatureSchema, MovieAttributes};
use inference::{InferenceAdapter, artifacts};

use crate::config::ArtifactPaths;
use crate::outcome::{PredictionFailure, PredictionOutcome, PredictionResult};

/// Loaded artifacts plus the encoder, ready to serve predictions.
#[derive(Clone, Debug)]
pub struct PredictionService {
    encoder: FeatureEncoder,
    adapter: InferenceAdapter,
}

impl PredictionService {
    /// Load every artifact and check that they fit the feature schema.
    ///
    /// # Arguments
    /// * `paths` - Where to find the model, preprocessor and optional target scaler
    ///
    /// # Returns
    /// A service ready for predictions, or an error naming the artifact that
    /// is missing, unreadable or incompatible
    pub async fn load(paths: &ArtifactPaths) -> Result<Self> {
        let start = Instant::now();
        let preprocessor_path = paths.preprocessor_path();
        let model_path = paths.model_path();
        let scaler_path = paths.target_scaler_path();

        info!("Loading artifacts from {}", paths.dir.display());

        let (preprocessor, model, scaler) = tokio::join!(
            artifacts::load_preprocessor(&preprocessor_path),
            artifacts::load_model(&model_path),
            artifacts::load_target_scaler(&scaler_path),
        );
        let preprocessor = preprocessor.context("Failed to load preprocessor")?;
        let model = model.context("Failed to load model")?;
        let scaler = scaler.context("Failed to load target scaler")?;

        let mut adapter = InferenceAdapter::new(Arc::new(preprocessor), Arc::new(model));
        if let Some(scaler) = scaler {
            adapter = adapter.with_target_scaler(Arc::new(scaler));
        }

        let service = Self::from_adapter(adapter)?;
        info!(
            "Artifacts ready in {:.2?} (target scaler: {})",
            start.elapsed(),
            if service.has_target_scaler() { "yes" } else { "no" }
        );
        Ok(service)
    }

    /// Wrap an already-built adapter, running the startup schema check.
    pub fn from_adapter(adapter: InferenceAdapter) -> Result<Self> {
        adapter
            .check_compatibility(&FeatureSchema::CURRENT)
            .context("Artifacts do not match the feature schema")?;

        Ok(Self {
            encoder: FeatureEncoder::new(),
            adapter,
        })
    }

    pub fn has_target_scaler(&self) -> bool {
        self.adapter.has_target_scaler()
    }

    /// Handle one press of the predict trigger.
    ///
    /// Validates the input first, so this is the entry point for input that
    /// has not been range-checked already.
    pub fn submit(&self, attrs: &MovieAttributes) -> PredictionOutcome {
        if let Err(e) = attrs.validate() {
            warn!("Rejected input: {}", e);
            return PredictionOutcome::Failure(PredictionFailure::from(e));
        }
        self.predict(attrs)
    }

    /// Encode and predict input that the caller already validated.
    pub fn predict(&self, attrs: &MovieAttributes) -> PredictionOutcome {
        let record = self.encoder.encode(attrs);
        debug!("Encoded {} features", record.len());
        self.predict_record(&record)
    }

    /// Run a prebuilt record through the adapter.
    pub fn predict_record(&self, record: &FeatureRecord) -> PredictionOutcome {
        let start = Instant::now();
        match self.adapter.predict(record) {
            Ok(revenue) => {
                info!("Predicted revenue {:.2} in {:.2?}", revenue, start.elapsed());
                PredictionOutcome::Success(PredictionResult {
                    revenue,
                    inverse_scaled: self.has_target_scaler(),
                })
            }
            Err(e) => {
                warn!("Prediction failed: {}", e);
                PredictionOutcome::Failure(PredictionFailure::from(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::FailureReason;
    use features::{Genre, YesNo};
    use inference::artifacts::{
        Aggregation, Column, ColumnPreprocessor, ColumnTransform, LinearModel, Node, RegressionModel,
        Tree, TreeEnsemble,
    };

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    /// Preprocessor that passes every schema column through
    fn passthrough_preprocessor() -> ColumnPreprocessor {
        ColumnPreprocessor {
            schema_version: FeatureSchema::CURRENT.version(),
            columns: FeatureSchema::CURRENT
                .names()
                .map(|name| Column {
                    name: name.to_string(),
                    transform: ColumnTransform::Passthrough,
                })
                .collect(),
        }
    }

    /// log1p(revenue) = 10 + 1 * HasSequel
    fn sequel_model() -> RegressionModel {
        let mut coefficients = vec![0.0; FeatureSchema::CURRENT.len()];
        coefficients[FeatureSchema::CURRENT.position("Has Sequel").unwrap()] = 1.0;
        RegressionModel::Linear(LinearModel {
            coefficients,
            intercept: 10.0,
        })
    }

    fn build_test_service() -> PredictionService {
        let adapter = InferenceAdapter::new(
            Arc::new(passthrough_preprocessor()),
            Arc::new(sequel_model()),
        );
        PredictionService::from_adapter(adapter).expect("Failed to build service")
    }

    // ============================================================================
    // Unit Tests
    // ============================================================================

    #[test]
    fn test_predict_success() {
        let service = build_test_service();
        let attrs = MovieAttributes {
            has_sequel: YesNo::No,
            ..Default::default()
        };

        let outcome = service.predict(&attrs);
        assert_eq!(outcome.revenue(), Some(10f64.exp_m1()));
    }

    #[test]
    fn test_sequel_indicator_reaches_the_model() {
        let service = build_test_service();
        let attrs = MovieAttributes {
            has_sequel: YesNo::Yes,
            genres: vec![Genre::Horror],
            ..Default::default()
        };

        let outcome = service.predict(&attrs);
        assert_eq!(outcome.revenue(), Some(11f64.exp_m1()));
    }

    #[test]
    fn test_submit_rejects_out_of_range_input() {
        let service = build_test_service();
        let attrs = MovieAttributes {
            running_time: 30,
            ..Default::default()
        };

        let outcome = service.submit(&attrs);
        let failure = outcome.failure().expect("Should fail validation");
        assert_eq!(failure.reason, FailureReason::InvalidInput);
        assert!(failure.message.contains("Running Time"));
    }

    #[test]
    fn test_truncated_record_is_a_failure_not_a_panic() {
        let service = build_test_service();
        let full = FeatureEncoder::new().encode(&MovieAttributes::default());
        let truncated = FeatureRecord::from_pairs(
            full.iter()
                .skip(1)
                .map(|f| (f.name.clone(), f.value)),
        );

        let outcome = service.predict_record(&truncated);
        assert!(!outcome.is_success());
        assert_eq!(outcome.failure().unwrap().reason, FailureReason::SchemaMismatch);

        // The service is still usable afterwards
        assert!(service.predict(&MovieAttributes::default()).is_success());
    }

    #[test]
    fn test_incompatible_adapter_is_rejected_at_construction() {
        let mut preprocessor = passthrough_preprocessor();
        preprocessor.columns.pop();
        let adapter = InferenceAdapter::new(Arc::new(preprocessor), Arc::new(sequel_model()));

        let err = PredictionService::from_adapter(adapter).unwrap_err();
        assert!(format!("{:#}", err).contains("feature schema declares 30"));
    }

    #[test]
    fn test_malformed_tree_model_is_rejected_at_construction() {
        let model = RegressionModel::TreeEnsemble(TreeEnsemble {
            n_features: FeatureSchema::CURRENT.len(),
            base_score: 0.0,
            learning_rate: 1.0,
            aggregation: Aggregation::Sum,
            trees: vec![Tree {
                nodes: vec![
                    Node::Split {
                        feature: 99,
                        threshold: 0.0,
                        left: 1,
                        right: 2,
                    },
                    Node::Leaf { value: 1.0 },
                    Node::Leaf { value: 2.0 },
                ],
            }],
        });
        let adapter = InferenceAdapter::new(Arc::new(passthrough_preprocessor()), Arc::new(model));

        let err = PredictionService::from_adapter(adapter.clone()).unwrap_err();
        assert!(format!("{:#}", err).contains("splits on feature 99"));

        // Driving the adapter directly fails the request instead of panicking
        let record = FeatureEncoder::new().encode(&MovieAttributes::default());
        assert!(adapter.predict(&record).is_err());
    }
}
