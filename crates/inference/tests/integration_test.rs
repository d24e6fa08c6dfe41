//! Integration tests for the inference chain.
//!
//! These tests run real encoder output through JSON-defined artifacts, the
//! same way the service does at runtime.

use features::{FeatureEncoder, FeatureRecord, FeatureSchema, Genre, MovieAttributes, YesNo};
use inference::artifacts::{
    Column, ColumnPreprocessor, ColumnTransform, FittedTargetScaler, LinearModel, RegressionModel,
};
use inference::{InferenceAdapter, InferenceError, Preprocessor, SchemaMismatch};
use std::sync::Arc;

/// Log-scales the budget, passes everything else through
fn build_preprocessor() -> ColumnPreprocessor {
    let columns = FeatureSchema::CURRENT
        .names()
        .map(|name| Column {
            name: name.to_string(),
            transform: if name == "Budget" {
                ColumnTransform::Log1pStandard {
                    mean: 0.0,
                    scale: 1.0,
                }
            } else {
                ColumnTransform::Passthrough
            },
        })
        .collect();

    ColumnPreprocessor {
        schema_version: FeatureSchema::CURRENT.version(),
        columns,
    }
}

/// log1p(revenue) = log1p(budget) + 0.5 * franchise + 0.25 * comedy
fn build_model() -> RegressionModel {
    let schema = FeatureSchema::CURRENT;
    let mut coefficients = vec![0.0; schema.len()];
    coefficients[schema.position("Budget").unwrap()] = 1.0;
    coefficients[schema.position("Franchise").unwrap()] = 0.5;
    coefficients[schema.position("Comedy").unwrap()] = 0.25;

    RegressionModel::Linear(LinearModel {
        coefficients,
        intercept: 0.0,
    })
}

fn build_adapter() -> InferenceAdapter {
    InferenceAdapter::new(Arc::new(build_preprocessor()), Arc::new(build_model()))
}

fn scenario() -> MovieAttributes {
    MovieAttributes {
        budget: 50_000_000,
        running_time: 150,
        release_month: 6,
        release_year: 2025,
        director_popularity: 50_000_000,
        lead_actor_popularity: 50_000_000,
        holiday_season: YesNo::No,
        has_sequel: YesNo::No,
        franchise: "None".to_string(),
        genres: vec![],
    }
}

fn assert_close(actual: f64, expected: f64) {
    let tolerance = expected.abs() * 1e-9;
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_artifacts_match_declared_schema() {
    let adapter = build_adapter();
    assert!(adapter.check_compatibility(&FeatureSchema::CURRENT).is_ok());
}

#[test]
fn test_default_scenario_recovers_budget() {
    let record = FeatureEncoder::new().encode(&scenario());
    let revenue = build_adapter().predict(&record).unwrap();

    assert_close(revenue, 50_000_000.0);
}

#[test]
fn test_franchise_and_genre_shift_prediction() {
    let attrs = MovieAttributes {
        franchise: "Avengers".to_string(),
        genres: vec![Genre::Comedy],
        ..scenario()
    };
    let record = FeatureEncoder::new().encode(&attrs);
    let revenue = build_adapter().predict(&record).unwrap();

    let expected = (50_000_000f64.ln_1p() + 0.75).exp_m1();
    assert_close(revenue, expected);
}

#[test]
fn test_target_scaler_is_inverted_after_expm1() {
    let scaler = FittedTargetScaler::Standard {
        mean: 1_000.0,
        scale: 2.0,
    };
    let adapter = build_adapter().with_target_scaler(Arc::new(scaler));
    let record = FeatureEncoder::new().encode(&scenario());

    let revenue = adapter.predict(&record).unwrap();
    assert_close(revenue, 50_000_000.0 * 2.0 + 1_000.0);
}

#[test]
fn test_record_missing_a_field_is_rejected_by_transform() {
    let encoded = FeatureEncoder::new().encode(&scenario());
    let truncated = FeatureRecord::from_pairs(
        encoded
            .iter()
            .filter(|f| f.name != "War")
            .map(|f| (f.name.clone(), f.value)),
    );

    let err = build_preprocessor().transform(&truncated).unwrap_err();
    assert!(matches!(
        err,
        InferenceError::SchemaMismatch(SchemaMismatch::MissingField { ref name }) if name == "War"
    ));

    // Same failure through the adapter, without panicking
    assert!(build_adapter().predict(&truncated).is_err());
}

#[test]
fn test_stale_preprocessor_version_is_incompatible() {
    let mut preprocessor = build_preprocessor();
    preprocessor.schema_version = 0;
    let adapter = InferenceAdapter::new(Arc::new(preprocessor), Arc::new(build_model()));

    let err = adapter
        .check_compatibility(&FeatureSchema::CURRENT)
        .unwrap_err();
    assert!(matches!(err, InferenceError::ArtifactIncompatible(_)));
}
