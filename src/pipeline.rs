//! End-to-end churn scoring: normalize, encode, assemble, score, tier.

use crate::config::ArtifactsConfig;
use crate::error::PipelineError;
use crate::features::{CategoricalEncoder, FeatureAssembler};
use crate::models::{ArtifactBundle, ArtifactLoader, Scorer};
use crate::normalizer::RecordNormalizer;
use crate::types::customer::CustomerRecord;
use crate::types::prediction::PredictionResult;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// The scoring pipeline, built once from the artifact bundle and shared
/// read-only by every request.
#[derive(Debug, Clone)]
pub struct ChurnPipeline {
    artifacts: Arc<ArtifactBundle>,
    normalizer: RecordNormalizer,
    encoder: CategoricalEncoder,
    assembler: FeatureAssembler,
    scorer: Scorer,
}

impl ChurnPipeline {
    pub fn new(artifacts: Arc<ArtifactBundle>) -> Self {
        Self {
            normalizer: RecordNormalizer::new(),
            encoder: CategoricalEncoder::new(artifacts.categorical_columns()),
            assembler: FeatureAssembler::new(artifacts.feature_schema()),
            scorer: Scorer::new(artifacts.clone()),
            artifacts,
        }
    }

    /// Load artifacts from disk and build the pipeline.
    pub fn from_config(config: &ArtifactsConfig) -> Result<Self> {
        let bundle = ArtifactLoader::new(config)
            .load()
            .with_context(|| format!("Failed to load artifacts from '{}'", config.dir))?;
        Ok(Self::new(Arc::new(bundle)))
    }

    pub fn artifacts(&self) -> &ArtifactBundle {
        &self.artifacts
    }

    pub fn model_name(&self) -> &str {
        self.scorer.model_name()
    }

    pub fn feature_count(&self) -> usize {
        self.assembler.feature_count()
    }

    /// Score one raw form submission.
    pub fn score(&self, raw: &HashMap<String, String>) -> Result<PredictionResult, PipelineError> {
        let record = self.normalizer.normalize(raw)?;
        self.score_record(&record)
    }

    /// Score an already normalized record.
    pub fn score_record(&self, record: &CustomerRecord) -> Result<PredictionResult, PipelineError> {
        let features = self.feature_vector(record)?;
        let probability = self.scorer.score(&features)?;
        let result = PredictionResult::new(probability);

        debug!(
            prediction_id = %result.prediction_id,
            probability = probability,
            risk_tier = result.risk_tier.as_str(),
            "Customer scored"
        );
        Ok(result)
    }

    /// Unscaled feature vector in schema order.
    pub fn feature_vector(&self, record: &CustomerRecord) -> Result<Vec<f64>, PipelineError> {
        let encoded = self.encoder.encode(record)?;
        Ok(self.assembler.assemble(&encoded)?)
    }
}
