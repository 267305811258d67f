//! Handle around the pre-fitted scoring artifact.
//!
//! The artifact is a serialized encode-and-regress pipeline: per-column
//! categorical encodings, numeric standardization stats, and linear weights,
//! all fitted elsewhere at training time. This module only loads and
//! evaluates it; none of the feature engineering is defined here.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::error::AppError;
use crate::schema::{FeatureRecord, FieldValue, FEATURE_SCHEMA};

/// Internal scoring failures. Logged for operators; callers report all of
/// these to the user as one generic prediction error.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("column set mismatch: record has {got} fields, pipeline expects {expected}")]
    ColumnSet { got: usize, expected: usize },
    #[error("unseen category '{value}' for column '{field}'")]
    UnseenCategory { field: String, value: String },
    #[error("artifact has no encoder for column '{field}'")]
    MissingEncoder { field: String },
    #[error("prediction is not finite")]
    NonFinite,
}

#[derive(Debug, Deserialize, Clone, Copy)]
struct NumericStats {
    mean: f64,
    std: f64,
}

#[derive(Debug, Deserialize)]
struct Artifact {
    /// Training-time column order, recorded by the fitting side.
    feature_schema: Vec<String>,
    /// Per categorical column: category -> learned numeric code.
    encoders: HashMap<String, HashMap<String, f64>>,
    /// Per numeric column: standardization stats.
    numeric_stats: HashMap<String, NumericStats>,
    weights: Vec<f64>,
    intercept: f64,
}

#[derive(Debug)]
pub struct ScoringPipeline {
    artifact: Artifact,
}

impl ScoringPipeline {
    /// Deserialize the artifact and check its recorded column order against
    /// the crate's schema descriptor. Any disagreement would silently
    /// mis-align every prediction, so it fails the load instead.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::ModelUnavailable(format!("failed to read {}: {e}", path.display()))
        })?;
        let artifact: Artifact = serde_json::from_str(&raw).map_err(|e| {
            AppError::ModelUnavailable(format!("failed to parse {}: {e}", path.display()))
        })?;

        let expected: Vec<&str> = FEATURE_SCHEMA.iter().map(|f| f.name).collect();
        let recorded: Vec<&str> = artifact.feature_schema.iter().map(String::as_str).collect();
        if recorded != expected {
            return Err(AppError::ModelUnavailable(format!(
                "artifact feature schema {recorded:?} does not match expected {expected:?}"
            )));
        }
        if artifact.weights.len() != expected.len() {
            return Err(AppError::ModelUnavailable(format!(
                "artifact has {} weights for {} columns",
                artifact.weights.len(),
                expected.len()
            )));
        }

        info!(features = expected.len(), "scoring pipeline loaded");
        Ok(Self { artifact })
    }

    /// Synchronous single-record inference.
    pub fn predict(&self, record: &FeatureRecord) -> Result<f64, PipelineError> {
        if record.len() != self.artifact.feature_schema.len() {
            return Err(PipelineError::ColumnSet {
                got: record.len(),
                expected: self.artifact.feature_schema.len(),
            });
        }

        let mut price = self.artifact.intercept;
        for ((name, value), weight) in record.fields().zip(&self.artifact.weights) {
            price += weight * self.encode(name, value)?;
        }
        if !price.is_finite() {
            return Err(PipelineError::NonFinite);
        }
        Ok(price)
    }

    fn encode(&self, field: &str, value: &FieldValue) -> Result<f64, PipelineError> {
        match value {
            FieldValue::Text(category) => {
                let table = self.artifact.encoders.get(field).ok_or_else(|| {
                    PipelineError::MissingEncoder {
                        field: field.to_string(),
                    }
                })?;
                table
                    .get(category)
                    .copied()
                    .ok_or_else(|| PipelineError::UnseenCategory {
                        field: field.to_string(),
                        value: category.clone(),
                    })
            }
            FieldValue::Int(n) => Ok(self.standardize(field, *n as f64)),
            FieldValue::Float(v) => Ok(self.standardize(field, *v)),
        }
    }

    fn standardize(&self, field: &str, x: f64) -> f64 {
        match self.artifact.numeric_stats.get(field) {
            Some(stats) if stats.std > 0.0 => (x - stats.mean) / stats.std,
            Some(stats) => x - stats.mean,
            None => x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Selection;
    use std::io::Write;

    fn test_artifact_json(weights: Vec<f64>, intercept: f64) -> serde_json::Value {
        let columns: Vec<&str> = FEATURE_SCHEMA.iter().map(|f| f.name).collect();
        serde_json::json!({
            "feature_schema": columns,
            "encoders": {
                "Fuel type": { "Petrol": 1.0, "Diesel": 2.0 },
                "body type": { "Hatchback": 1.0, "SUV": 2.0 },
                "transmission": { "Manual": 0.0, "Automatic": 1.0 },
                "Brand": { "Maruti": 1.0 },
                "model": { "Swift": 1.0, "Brezza": 2.0 },
                "Insurance Type": { "Comprehensive": 1.0 },
                "Color": { "White": 1.0 },
                "City": { "Chennai": 1.0 }
            },
            "numeric_stats": {
                "ownerNo": { "mean": 1.0, "std": 1.0 },
                "modelYear": { "mean": 2015.0, "std": 5.0 },
                "Kms Driven": { "mean": 50000.0, "std": 25000.0 },
                "Mileage": { "mean": 18.0, "std": 4.0 },
                "Seats": { "mean": 5.0, "std": 1.0 }
            },
            "weights": weights,
            "intercept": intercept
        })
    }

    fn write_artifact(value: &serde_json::Value) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(value.to_string().as_bytes()).unwrap();
        file
    }

    fn swift_selection() -> Selection {
        Selection {
            brand: "Maruti".into(),
            fuel_type: "Petrol".into(),
            body_type: "Hatchback".into(),
            model: "Swift".into(),
            transmission: "Manual".into(),
            seats: 5,
            insurance_type: "Comprehensive".into(),
            color: "White".into(),
            city: "Chennai".into(),
            model_year: 2020,
            mileage: 22.0,
            owner_no: 1,
            kms_driven: 50_000,
        }
    }

    fn swift_record() -> FeatureRecord {
        swift_selection().assemble().unwrap()
    }

    #[test]
    fn predicts_intercept_with_zero_weights() {
        let file = write_artifact(&test_artifact_json(vec![0.0; 13], 500_000.0));
        let pipeline = ScoringPipeline::load(file.path()).unwrap();
        let price = pipeline.predict(&swift_record()).unwrap();
        assert_eq!(price, 500_000.0);
    }

    #[test]
    fn numeric_fields_are_standardized() {
        // only modelYear (index 6) carries weight: (2020 - 2015) / 5 = 1.0
        let mut weights = vec![0.0; 13];
        weights[6] = 10_000.0;
        let file = write_artifact(&test_artifact_json(weights, 400_000.0));
        let pipeline = ScoringPipeline::load(file.path()).unwrap();
        let price = pipeline.predict(&swift_record()).unwrap();
        assert_eq!(price, 410_000.0);
    }

    #[test]
    fn unseen_category_is_a_typed_error() {
        let file = write_artifact(&test_artifact_json(vec![0.0; 13], 500_000.0));
        let pipeline = ScoringPipeline::load(file.path()).unwrap();
        let mut selection = swift_selection();
        selection.color = "Magenta".into();
        let record = selection.assemble().unwrap();
        let err = pipeline.predict(&record).unwrap_err();
        assert!(matches!(err, PipelineError::UnseenCategory { .. }));
    }

    #[test]
    fn missing_artifact_is_model_unavailable() {
        let err = ScoringPipeline::load("/nonexistent/pipeline_model.json").unwrap_err();
        assert!(matches!(err, AppError::ModelUnavailable(_)));
    }

    #[test]
    fn schema_drift_fails_the_load() {
        let mut value = test_artifact_json(vec![0.0; 13], 500_000.0);
        // simulate a renamed column on the fitting side
        value["feature_schema"][0] = serde_json::json!("fuel_type");
        let file = write_artifact(&value);
        let err = ScoringPipeline::load(file.path()).unwrap_err();
        assert!(matches!(err, AppError::ModelUnavailable(_)));
    }

    #[test]
    fn weight_count_mismatch_fails_the_load() {
        let file = write_artifact(&test_artifact_json(vec![0.0; 12], 500_000.0));
        let err = ScoringPipeline::load(file.path()).unwrap_err();
        assert!(matches!(err, AppError::ModelUnavailable(_)));
    }
}
