//! Classifier contract and the logistic regression backend

use crate::error::ScoringError;
use serde::{Deserialize, Serialize};

/// A trained binary churn classifier.
///
/// Implementations receive an already scaled feature vector and return the
/// probability mass of the positive ("churns") class.
pub trait ChurnClassifier: Send + Sync {
    /// Name used in logs and the health endpoint.
    fn name(&self) -> &str;

    /// Input width, when the backend knows it before being called.
    fn n_features(&self) -> Option<usize>;

    fn predict_proba(&self, features: &[f64]) -> Result<f64, ScoringError>;
}

/// Reject anything that is not a probability.
pub(crate) fn check_probability(probability: f64) -> Result<f64, ScoringError> {
    if !probability.is_finite() {
        return Err(ScoringError::NonFinite {
            stage: "classifier",
        });
    }
    if !(0.0..=1.0).contains(&probability) {
        return Err(ScoringError::OutOfRange(probability));
    }
    Ok(probability)
}

/// Positive class probability from a probability tensor.
///
/// Accepts `[batch, classes]` or `[classes]` layouts for a batch of one.
/// A single column is taken as the positive class probability itself.
pub fn positive_class_probability(dims: &[i64], data: &[f32]) -> Option<f64> {
    let num_classes = match dims {
        [1, classes] | [classes] => *classes,
        _ => return None,
    };
    let index = match num_classes {
        1 => 0,
        n if n >= 2 => 1,
        _ => return None,
    };
    data.get(index).map(|&p| p as f64)
}

/// Logistic regression exported as coefficients and an intercept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticClassifier {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticClassifier {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("logistic model has no coefficients".to_string());
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("logistic model parameters must be finite".to_string());
        }
        Ok(())
    }
}

impl ChurnClassifier for LogisticClassifier {
    fn name(&self) -> &str {
        "logistic_regression"
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn predict_proba(&self, features: &[f64]) -> Result<f64, ScoringError> {
        if features.len() != self.coefficients.len() {
            return Err(ScoringError::Dimension {
                stage: "classifier",
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }

        let logit: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;

        check_probability(1.0 / (1.0 + (-logit).exp()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logistic_probability() {
        let model = LogisticClassifier::new(vec![1.0, -1.0], 0.0);
        assert!((model.predict_proba(&[0.0, 0.0]).unwrap() - 0.5).abs() < 1e-12);

        let p = model.predict_proba(&[2.0, 0.0]).unwrap();
        assert!((p - 0.880_797_077_977_882_4).abs() < 1e-12);
    }

    #[test]
    fn test_logistic_saturates_within_range() {
        let model = LogisticClassifier::new(vec![1.0], 0.0);
        assert_eq!(model.predict_proba(&[1000.0]).unwrap(), 1.0);
        assert_eq!(model.predict_proba(&[-1000.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_logistic_dimension_mismatch() {
        let model = LogisticClassifier::new(vec![1.0, 2.0, 3.0], 0.5);
        let err = model.predict_proba(&[1.0]).unwrap_err();
        assert_eq!(
            err,
            ScoringError::Dimension {
                stage: "classifier",
                expected: 3,
                actual: 1
            }
        );
    }

    #[test]
    fn test_logistic_nan_input() {
        let model = LogisticClassifier::new(vec![1.0], 0.0);
        let err = model.predict_proba(&[f64::NAN]).unwrap_err();
        assert_eq!(err, ScoringError::NonFinite { stage: "classifier" });
    }

    #[test]
    fn test_validate() {
        assert!(LogisticClassifier::new(vec![], 0.0).validate().is_err());
        assert!(LogisticClassifier::new(vec![f64::NAN], 0.0).validate().is_err());
        assert!(LogisticClassifier::new(vec![0.3], -1.0).validate().is_ok());
    }

    #[test]
    fn test_positive_class_from_tensor() {
        assert_eq!(positive_class_probability(&[1, 2], &[0.25, 0.75]), Some(0.75));
        assert_eq!(positive_class_probability(&[2], &[0.25, 0.75]), Some(0.75));
        assert_eq!(positive_class_probability(&[1, 1], &[0.4]), Some(0.4f32 as f64));
        assert_eq!(positive_class_probability(&[3, 2], &[0.1; 6]), None);
        assert_eq!(positive_class_probability(&[1, 2], &[0.1]), None);
    }

    #[test]
    fn test_check_probability() {
        assert_eq!(check_probability(0.3), Ok(0.3));
        assert_eq!(check_probability(1.5), Err(ScoringError::OutOfRange(1.5)));
    }
}
