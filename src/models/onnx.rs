//! ONNX Runtime classifier backend

use crate::error::{ArtifactError, ScoringError};
use crate::models::classifier::{check_probability, positive_class_probability, ChurnClassifier};
use anyhow::{Context, Result};
use ort::memory::Allocator;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, Tensor};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Classifier exported to ONNX (e.g. with skl2onnx).
pub struct OnnxClassifier {
    name: String,
    /// Running a session needs exclusive access
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl OnnxClassifier {
    /// Load a model from file.
    pub fn load<P: AsRef<Path>>(path: P, onnx_threads: usize) -> Result<Self, ArtifactError> {
        Self::build(path.as_ref(), onnx_threads)
            .map_err(|e| ArtifactError::Classifier(format!("{e:#}")))
    }

    fn build(path: &Path, onnx_threads: usize) -> Result<Self> {
        info!(path = %path.display(), threads = onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        // skl2onnx names the outputs output_label / output_probability
        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "output_probability".to_string());

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "onnx".to_string());

        info!(
            model = %name,
            input = %input_name,
            output = %output_name,
            "Model loaded successfully"
        );

        Ok(Self {
            name,
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }

    fn run(&self, features: &[f64]) -> Result<f64> {
        let input: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let shape = vec![1_i64, input.len() as i64];
        let input_tensor =
            Tensor::from_array((shape, input)).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        let outputs = session.run(ort::inputs![&self.input_name => input_tensor])?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| anyhow::anyhow!("model has no output '{}'", self.output_name))?;

        // Plain probability tensor
        if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
            let dims: Vec<i64> = shape.iter().copied().collect();
            let prob = positive_class_probability(&dims, data)
                .ok_or_else(|| anyhow::anyhow!("unexpected probability shape {:?}", dims))?;
            debug!(model = %self.name, prob = prob, "Extracted from tensor");
            return Ok(prob);
        }

        // ZipMap output: seq(map(int64, float))
        let dtype = output.dtype();
        if DynSequenceValueType::can_downcast(&dtype) {
            let allocator = Allocator::default();
            let sequence = output
                .downcast_ref::<DynSequenceValueType>()
                .map_err(|e| anyhow::anyhow!("Failed to downcast to sequence: {}", e))?;
            let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;
            let map_value = maps
                .first()
                .ok_or_else(|| anyhow::anyhow!("Empty sequence"))?;
            let kv_pairs = map_value.try_extract_key_values::<i64, f32>()?;

            let prob = kv_pairs
                .iter()
                .find(|(class_id, _)| *class_id == 1)
                .map(|(_, prob)| *prob as f64)
                .ok_or_else(|| anyhow::anyhow!("No probability for class 1 in map"))?;
            debug!(model = %self.name, prob = prob, "Extracted from seq(map)");
            return Ok(prob);
        }

        anyhow::bail!("output '{}' is neither a tensor nor seq(map)", self.output_name)
    }
}

impl ChurnClassifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn n_features(&self) -> Option<usize> {
        None
    }

    fn predict_proba(&self, features: &[f64]) -> Result<f64, ScoringError> {
        let prob = self
            .run(features)
            .map_err(|e| ScoringError::Backend(format!("{e:#}")))?;
        check_probability(prob)
    }
}
