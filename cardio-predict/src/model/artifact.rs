//! Loading and checking the exported model artifacts
//!
//! Three files make up one artifact set, all written by the offline
//! training step:
//! - `columns.json`: feature names in training order
//! - `dtypes.json`: per-column storage type (`int64` or `float64`)
//! - `pipeline.json`: fitted scaler and classifier parameters
//!
//! The set is loaded once at startup, checked for internal consistency, and
//! shared read-only with every request handler for the process lifetime.

use crate::model::pipeline::Pipeline;
use cardio_common::{Error, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Storage type recorded for a column at training time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Dtype {
    #[serde(rename = "int64")]
    Int64,
    #[serde(rename = "float64")]
    Float64,
}

/// The loaded artifact set: column order, dtype map, fitted pipeline.
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    pub columns: Vec<String>,
    pub dtypes: HashMap<String, Dtype>,
    pub pipeline: Pipeline,
}

impl ModelArtifact {
    /// Load and check the artifact set from a directory.
    ///
    /// Any inconsistency (mismatched vector lengths, a column without a
    /// dtype, a zero scale, non-binary classes) fails startup rather than
    /// surfacing later as a scoring fault.
    pub fn load(dir: &Path) -> Result<Self> {
        let columns: Vec<String> = read_json(&dir.join("columns.json"))?;
        let dtypes: HashMap<String, Dtype> = read_json(&dir.join("dtypes.json"))?;
        let pipeline: Pipeline = read_json(&dir.join("pipeline.json"))?;

        let artifact = Self {
            columns,
            dtypes,
            pipeline,
        };
        artifact.check()?;

        info!(
            "Loaded model artifacts from {} ({} features)",
            dir.display(),
            artifact.columns.len()
        );
        Ok(artifact)
    }

    fn check(&self) -> Result<()> {
        let n = self.columns.len();
        if n == 0 {
            return Err(Error::Artifact("columns.json lists no columns".into()));
        }
        for (name, len) in [
            ("scaler mean", self.pipeline.scaler.mean.len()),
            ("scaler scale", self.pipeline.scaler.scale.len()),
            ("classifier coef", self.pipeline.classifier.coef.len()),
        ] {
            if len != n {
                return Err(Error::Artifact(format!(
                    "{} has {} entries, expected {} (one per column)",
                    name, len, n
                )));
            }
        }
        for column in &self.columns {
            if !self.dtypes.contains_key(column) {
                return Err(Error::Artifact(format!(
                    "dtypes.json has no entry for column {}",
                    column
                )));
            }
        }
        if self.pipeline.scaler.scale.iter().any(|&s| s == 0.0) {
            return Err(Error::Artifact("scaler scale contains a zero entry".into()));
        }
        if self.pipeline.classifier.classes != [0, 1] {
            return Err(Error::Artifact(format!(
                "classifier classes are {:?}, expected [0, 1]",
                self.pipeline.classifier.classes
            )));
        }
        Ok(())
    }

    /// Score one observation: reorder into column order, coerce per dtype,
    /// and evaluate the pipeline. Returns (predicted label, probability).
    pub fn score(&self, observation: &Map<String, Value>) -> Result<(bool, f64)> {
        let features = self.feature_vector(observation)?;
        let probability = self.pipeline.predict_proba(&features);
        let prediction = self.pipeline.predict(&features);
        Ok((prediction, probability))
    }

    /// Build the feature vector in training column order, coercing each
    /// value to its recorded dtype (`int64` truncates toward zero).
    fn feature_vector(&self, observation: &Map<String, Value>) -> Result<Vec<f64>> {
        self.columns
            .iter()
            .map(|column| {
                let value = observation
                    .get(column)
                    .and_then(Value::as_f64)
                    .ok_or_else(|| {
                        Error::Inference(format!("observation has no numeric value for {}", column))
                    })?;
                Ok(match self.dtypes[column] {
                    Dtype::Int64 => value.trunc(),
                    Dtype::Float64 => value,
                })
            })
            .collect()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Artifact(format!("read {} failed: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| Error::Artifact(format!("parse {} failed: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::pipeline::{LogisticRegression, StandardScaler};
    use serde_json::json;

    fn toy_artifact() -> ModelArtifact {
        ModelArtifact {
            columns: vec!["age".to_string(), "oldpeak".to_string()],
            dtypes: HashMap::from([
                ("age".to_string(), Dtype::Int64),
                ("oldpeak".to_string(), Dtype::Float64),
            ]),
            pipeline: Pipeline {
                scaler: StandardScaler {
                    mean: vec![50.0, 1.0],
                    scale: vec![10.0, 2.0],
                },
                classifier: LogisticRegression {
                    coef: vec![1.0, -0.5],
                    intercept: 0.2,
                    classes: vec![0, 1],
                },
            },
        }
    }

    fn write_artifact_files(dir: &Path, columns: &str, dtypes: &str, pipeline: &str) {
        std::fs::write(dir.join("columns.json"), columns).unwrap();
        std::fs::write(dir.join("dtypes.json"), dtypes).unwrap();
        std::fs::write(dir.join("pipeline.json"), pipeline).unwrap();
    }

    const TOY_COLUMNS: &str = r#"["age", "oldpeak"]"#;
    const TOY_DTYPES: &str = r#"{"age": "int64", "oldpeak": "float64"}"#;
    const TOY_PIPELINE: &str = r#"{
        "scaler": {"mean": [50.0, 1.0], "scale": [10.0, 2.0]},
        "classifier": {"coef": [1.0, -0.5], "intercept": 0.2, "classes": [0, 1]}
    }"#;

    #[test]
    fn loads_consistent_artifact_set() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact_files(dir.path(), TOY_COLUMNS, TOY_DTYPES, TOY_PIPELINE);

        let artifact = ModelArtifact::load(dir.path()).unwrap();
        assert_eq!(artifact.columns, vec!["age", "oldpeak"]);
        assert_eq!(artifact.dtypes["age"], Dtype::Int64);
    }

    #[test]
    fn missing_file_is_an_artifact_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ModelArtifact::load(dir.path());
        assert!(matches!(result, Err(Error::Artifact(_))));
    }

    #[test]
    fn mismatched_vector_length_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let short = r#"{
            "scaler": {"mean": [50.0], "scale": [10.0, 2.0]},
            "classifier": {"coef": [1.0, -0.5], "intercept": 0.2, "classes": [0, 1]}
        }"#;
        write_artifact_files(dir.path(), TOY_COLUMNS, TOY_DTYPES, short);

        let result = ModelArtifact::load(dir.path());
        assert!(matches!(result, Err(Error::Artifact(_))));
    }

    #[test]
    fn missing_dtype_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact_files(dir.path(), TOY_COLUMNS, r#"{"age": "int64"}"#, TOY_PIPELINE);

        let result = ModelArtifact::load(dir.path());
        assert!(matches!(result, Err(Error::Artifact(_))));
    }

    #[test]
    fn zero_scale_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let degenerate = r#"{
            "scaler": {"mean": [50.0, 1.0], "scale": [10.0, 0.0]},
            "classifier": {"coef": [1.0, -0.5], "intercept": 0.2, "classes": [0, 1]}
        }"#;
        write_artifact_files(dir.path(), TOY_COLUMNS, TOY_DTYPES, degenerate);

        let result = ModelArtifact::load(dir.path());
        assert!(matches!(result, Err(Error::Artifact(_))));
    }

    #[test]
    fn non_binary_classes_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let multiclass = r#"{
            "scaler": {"mean": [50.0, 1.0], "scale": [10.0, 2.0]},
            "classifier": {"coef": [1.0, -0.5], "intercept": 0.2, "classes": [0, 1, 2]}
        }"#;
        write_artifact_files(dir.path(), TOY_COLUMNS, TOY_DTYPES, multiclass);

        let result = ModelArtifact::load(dir.path());
        assert!(matches!(result, Err(Error::Artifact(_))));
    }

    #[test]
    fn features_follow_column_order_not_key_order() {
        let artifact = toy_artifact();
        let observation = json!({"oldpeak": 3.0, "age": 60})
            .as_object()
            .cloned()
            .unwrap();

        // age: (60 - 50) / 10 = 1; oldpeak: (3 - 1) / 2 = 1
        // logit = 0.2 + 1.0 * 1 - 0.5 * 1 = 0.7
        let features = artifact.feature_vector(&observation).unwrap();
        assert_eq!(features, vec![60.0, 3.0]);

        let (prediction, probability) = artifact.score(&observation).unwrap();
        assert!(prediction);
        let expected = 1.0 / (1.0 + (-0.7_f64).exp());
        assert!((probability - expected).abs() < 1e-12);
    }

    #[test]
    fn int64_coercion_truncates_toward_zero() {
        let artifact = toy_artifact();
        let observation = json!({"age": 59.9, "oldpeak": 1.0})
            .as_object()
            .cloned()
            .unwrap();

        let features = artifact.feature_vector(&observation).unwrap();
        assert_eq!(features[0], 59.0);
        assert_eq!(features[1], 1.0);
    }

    #[test]
    fn missing_column_is_an_inference_error() {
        let artifact = toy_artifact();
        let observation = json!({"age": 60}).as_object().cloned().unwrap();

        let result = artifact.score(&observation);
        assert!(matches!(result, Err(Error::Inference(_))));
    }

    #[test]
    fn non_numeric_value_is_an_inference_error() {
        let artifact = toy_artifact();
        let observation = json!({"age": 60, "oldpeak": "high"})
            .as_object()
            .cloned()
            .unwrap();

        let result = artifact.score(&observation);
        assert!(matches!(result, Err(Error::Inference(_))));
    }
}
