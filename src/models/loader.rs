//! Artifact bundle loading and consistency checks

use crate::config::{ArtifactsConfig, ModelFormat};
use crate::error::ArtifactError;
use crate::models::classifier::{ChurnClassifier, LogisticClassifier};
use crate::models::scaler::FeatureScaler;
use crate::types::customer::CustomerRecord;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// The four training artifacts, immutable once loaded.
pub struct ArtifactBundle {
    classifier: Box<dyn ChurnClassifier>,
    scaler: FeatureScaler,
    feature_schema: Vec<String>,
    categorical_columns: Vec<String>,
}

impl std::fmt::Debug for ArtifactBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactBundle")
            .field("classifier", &self.classifier.name())
            .field("scaler", &self.scaler)
            .field("feature_schema", &self.feature_schema)
            .field("categorical_columns", &self.categorical_columns)
            .finish()
    }
}

impl ArtifactBundle {
    /// Assemble a bundle, rejecting artifacts that do not belong together.
    pub fn new(
        classifier: Box<dyn ChurnClassifier>,
        scaler: FeatureScaler,
        feature_schema: Vec<String>,
        categorical_columns: Vec<String>,
    ) -> Result<Self, ArtifactError> {
        let bundle = Self {
            classifier,
            scaler,
            feature_schema,
            categorical_columns,
        };
        bundle.check_consistency()?;
        Ok(bundle)
    }

    fn check_consistency(&self) -> Result<(), ArtifactError> {
        let inconsistent = |msg: String| Err(ArtifactError::Inconsistent(msg));

        if self.feature_schema.is_empty() {
            return inconsistent("feature schema is empty".to_string());
        }

        let mut seen = HashSet::new();
        for column in &self.feature_schema {
            if !seen.insert(column.as_str()) {
                return inconsistent(format!("feature schema lists '{column}' twice"));
            }
            if !CustomerRecord::is_known_column(column) {
                return inconsistent(format!(
                    "feature schema references unknown column '{column}'"
                ));
            }
        }

        for column in &self.categorical_columns {
            if !seen.contains(column.as_str()) {
                return inconsistent(format!(
                    "categorical column '{column}' is not in the feature schema"
                ));
            }
        }

        for column in &self.feature_schema {
            if CustomerRecord::is_text_column(column)
                && !self.categorical_columns.iter().any(|c| c == column)
            {
                return inconsistent(format!(
                    "text column '{column}' is in the schema but not marked categorical"
                ));
            }
        }

        self.scaler.validate().map_err(ArtifactError::Inconsistent)?;
        if self.scaler.n_features() != self.feature_schema.len() {
            return inconsistent(format!(
                "scaler was fit on {} features, schema has {}",
                self.scaler.n_features(),
                self.feature_schema.len()
            ));
        }
        if let Some(names) = self.scaler.feature_names() {
            if names != self.feature_schema.as_slice() {
                return inconsistent(
                    "scaler feature names differ from the feature schema order".to_string(),
                );
            }
        }

        if let Some(width) = self.classifier.n_features() {
            if width != self.feature_schema.len() {
                return inconsistent(format!(
                    "classifier expects {} features, schema has {}",
                    width,
                    self.feature_schema.len()
                ));
            }
        }

        Ok(())
    }

    pub fn classifier(&self) -> &dyn ChurnClassifier {
        self.classifier.as_ref()
    }

    pub fn scaler(&self) -> &FeatureScaler {
        &self.scaler
    }

    pub fn feature_schema(&self) -> &[String] {
        &self.feature_schema
    }

    pub fn categorical_columns(&self) -> &[String] {
        &self.categorical_columns
    }
}

/// Reads the artifact bundle from disk.
pub struct ArtifactLoader {
    config: ArtifactsConfig,
}

impl ArtifactLoader {
    pub fn new(config: &ArtifactsConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Load and cross-check every artifact.
    pub fn load(&self) -> Result<ArtifactBundle, ArtifactError> {
        info!(dir = %self.config.dir, format = ?self.config.model_format, "Loading artifacts");

        let feature_schema: Vec<String> = read_json(&self.config.features_path())?;
        let categorical_columns: Vec<String> = read_json(&self.config.categorical_columns_path())?;
        let scaler: FeatureScaler = read_json(&self.config.scaler_path())?;
        let classifier = self.load_classifier()?;

        let bundle = ArtifactBundle::new(classifier, scaler, feature_schema, categorical_columns)?;

        info!(
            model = %bundle.classifier().name(),
            features = bundle.feature_schema().len(),
            categorical = bundle.categorical_columns().len(),
            "Artifacts loaded successfully"
        );
        Ok(bundle)
    }

    fn load_classifier(&self) -> Result<Box<dyn ChurnClassifier>, ArtifactError> {
        let path = self.config.model_path();
        match self.config.model_format {
            ModelFormat::Logistic => {
                let model: LogisticClassifier = read_json(&path)?;
                model.validate().map_err(ArtifactError::Classifier)?;
                Ok(Box::new(model))
            }
            ModelFormat::Onnx => load_onnx(&path, self.config.onnx_threads),
        }
    }
}

#[cfg(feature = "onnx")]
fn load_onnx(path: &Path, onnx_threads: usize) -> Result<Box<dyn ChurnClassifier>, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::Missing {
            path: path.to_path_buf(),
        });
    }
    let model = crate::models::onnx::OnnxClassifier::load(path, onnx_threads)?;
    Ok(Box::new(model))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(path: &Path, _onnx_threads: usize) -> Result<Box<dyn ChurnClassifier>, ArtifactError> {
    Err(ArtifactError::Classifier(format!(
        "{} is an ONNX model but the crate was built without the `onnx` feature",
        path.display()
    )))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}
