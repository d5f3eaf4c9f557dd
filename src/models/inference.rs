//! Scaling and classification of assembled feature vectors

use crate::error::ScoringError;
use crate::models::loader::ArtifactBundle;
use std::sync::Arc;
use tracing::debug;

/// Applies the fitted scaler and the classifier to one feature vector.
#[derive(Debug, Clone)]
pub struct Scorer {
    artifacts: Arc<ArtifactBundle>,
}

impl Scorer {
    pub fn new(artifacts: Arc<ArtifactBundle>) -> Self {
        Self { artifacts }
    }

    /// Churn probability for a vector laid out in feature schema order.
    pub fn score(&self, features: &[f64]) -> Result<f64, ScoringError> {
        let scaled = self.artifacts.scaler().transform(features)?;
        let probability = self.artifacts.classifier().predict_proba(&scaled)?;

        debug!(
            model = %self.artifacts.classifier().name(),
            probability = probability,
            "Inference complete"
        );
        Ok(probability)
    }

    pub fn model_name(&self) -> &str {
        self.artifacts.classifier().name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classifier::LogisticClassifier;
    use crate::models::scaler::FeatureScaler;

    fn scorer() -> Scorer {
        let bundle = ArtifactBundle::new(
            Box::new(LogisticClassifier::new(vec![1.0, -2.0], 0.5)),
            FeatureScaler::Standard {
                mean: vec![10.0, 50.0],
                scale: vec![5.0, 25.0],
                feature_names: None,
            },
            vec!["tenure".to_string(), "MonthlyCharges".to_string()],
            vec![],
        )
        .unwrap();
        Scorer::new(Arc::new(bundle))
    }

    #[test]
    fn test_scales_before_classifying() {
        // scaled = [1.0, 1.0]; logit = 1 - 2 + 0.5 = -0.5
        let p = scorer().score(&[15.0, 75.0]).unwrap();
        let expected = 1.0 / (1.0 + 0.5f64.exp());
        assert!((p - expected).abs() < 1e-12);
    }

    #[test]
    fn test_deterministic() {
        let scorer = scorer();
        let a = scorer.score(&[3.0, 20.0]).unwrap();
        let b = scorer.score(&[3.0, 20.0]).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = scorer().score(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, ScoringError::Dimension { stage: "scaler", .. }));
    }
}
