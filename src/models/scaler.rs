//! Fitted feature scaler exported from the training pipeline

use crate::error::ScoringError;
use serde::{Deserialize, Serialize};

/// Scaler parameters, tagged by scaler kind.
///
/// `standard` computes `(x - mean) / scale`; `min_max` computes `x * scale + min`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureScaler {
    Standard {
        mean: Vec<f64>,
        scale: Vec<f64>,
        /// Columns the scaler was fit on, when exported
        #[serde(default)]
        feature_names: Option<Vec<String>>,
    },
    MinMax {
        min: Vec<f64>,
        scale: Vec<f64>,
        #[serde(default)]
        feature_names: Option<Vec<String>>,
    },
}

impl FeatureScaler {
    /// Number of features the scaler was fit on.
    pub fn n_features(&self) -> usize {
        match self {
            FeatureScaler::Standard { mean, .. } => mean.len(),
            FeatureScaler::MinMax { min, .. } => min.len(),
        }
    }

    pub fn feature_names(&self) -> Option<&[String]> {
        match self {
            FeatureScaler::Standard { feature_names, .. }
            | FeatureScaler::MinMax { feature_names, .. } => feature_names.as_deref(),
        }
    }

    /// Check that the parameters are internally consistent.
    pub fn validate(&self) -> Result<(), String> {
        let (offsets, scale) = match self {
            FeatureScaler::Standard { mean, scale, .. } => (mean, scale),
            FeatureScaler::MinMax { min, scale, .. } => (min, scale),
        };
        if offsets.len() != scale.len() {
            return Err(format!(
                "scaler has {} offsets but {} scale factors",
                offsets.len(),
                scale.len()
            ));
        }
        if offsets.iter().chain(scale.iter()).any(|v| !v.is_finite()) {
            return Err("scaler parameters must be finite".to_string());
        }
        if let Some(names) = self.feature_names() {
            if names.len() != offsets.len() {
                return Err(format!(
                    "scaler lists {} feature names for {} features",
                    names.len(),
                    offsets.len()
                ));
            }
        }
        Ok(())
    }

    /// Apply the forward transform to one feature vector.
    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ScoringError> {
        let expected = self.n_features();
        if features.len() != expected {
            return Err(ScoringError::Dimension {
                stage: "scaler",
                expected,
                actual: features.len(),
            });
        }

        let scaled: Vec<f64> = match self {
            FeatureScaler::Standard { mean, scale, .. } => features
                .iter()
                .zip(mean.iter().zip(scale.iter()))
                .map(|(&x, (&m, &s))| {
                    // zero variance columns are left centred but unscaled
                    let s = if s == 0.0 { 1.0 } else { s };
                    (x - m) / s
                })
                .collect(),
            FeatureScaler::MinMax { min, scale, .. } => features
                .iter()
                .zip(min.iter().zip(scale.iter()))
                .map(|(&x, (&m, &s))| x * s + m)
                .collect(),
        };

        if scaled.iter().any(|v| !v.is_finite()) {
            return Err(ScoringError::NonFinite { stage: "scaler" });
        }
        Ok(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> FeatureScaler {
        FeatureScaler::Standard {
            mean: vec![10.0, 2.0, 0.0],
            scale: vec![2.0, 0.5, 0.0],
            feature_names: None,
        }
    }

    #[test]
    fn test_standard_transform() {
        let scaled = standard().transform(&[14.0, 1.0, 3.0]).unwrap();
        assert_eq!(scaled, vec![2.0, -2.0, 3.0]);
    }

    #[test]
    fn test_min_max_transform() {
        let scaler = FeatureScaler::MinMax {
            min: vec![0.0, -1.0],
            scale: vec![0.1, 0.5],
            feature_names: None,
        };
        let scaled = scaler.transform(&[5.0, 4.0]).unwrap();
        assert!((scaled[0] - 0.5).abs() < 1e-12);
        assert!((scaled[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = standard().transform(&[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            ScoringError::Dimension {
                stage: "scaler",
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let err = standard().transform(&[f64::INFINITY, 1.0, 1.0]).unwrap_err();
        assert_eq!(err, ScoringError::NonFinite { stage: "scaler" });
    }

    #[test]
    fn test_validate() {
        assert!(standard().validate().is_ok());

        let uneven = FeatureScaler::Standard {
            mean: vec![1.0, 2.0],
            scale: vec![1.0],
            feature_names: None,
        };
        assert!(uneven.validate().is_err());

        let nan = FeatureScaler::Standard {
            mean: vec![f64::NAN],
            scale: vec![1.0],
            feature_names: None,
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_deserialize_tagged() {
        let json =
            r#"{"kind": "standard", "mean": [1.0], "scale": [2.0], "feature_names": ["tenure"]}"#;
        let scaler: FeatureScaler = serde_json::from_str(json).unwrap();
        assert_eq!(scaler.n_features(), 1);
        assert_eq!(scaler.feature_names(), Some(&["tenure".to_string()][..]));

        let json = r#"{"kind": "min_max", "min": [0.0, 0.0], "scale": [1.0, 1.0]}"#;
        let scaler: FeatureScaler = serde_json::from_str(json).unwrap();
        assert_eq!(scaler.n_features(), 2);
        assert!(scaler.feature_names().is_none());
    }
}
