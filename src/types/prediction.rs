//! Prediction result data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lower bound of the HIGH tier (inclusive).
pub const HIGH_RISK_THRESHOLD: f64 = 0.70;
/// Lower bound of the MEDIUM tier (inclusive).
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.40;

/// Risk tier classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Map a churn probability to its tier.
    ///
    /// Intervals are closed on the lower bound: `[0, 0.4)`, `[0.4, 0.7)`, `[0.7, 1]`.
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_RISK_THRESHOLD {
            RiskTier::High
        } else if probability >= MEDIUM_RISK_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    /// Human readable label shown with the prediction.
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::High => "HIGH RISK — Immediate intervention needed",
            RiskTier::Medium => "MEDIUM RISK — Monitor closely",
            RiskTier::Low => "LOW RISK — Standard engagement",
        }
    }

    /// Tag used for styling the result.
    pub fn css_class(&self) -> &'static str {
        match self {
            RiskTier::High => "high",
            RiskTier::Medium => "medium",
            RiskTier::Low => "low",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::High => "HIGH",
            RiskTier::Medium => "MEDIUM",
            RiskTier::Low => "LOW",
        }
    }
}

/// Outcome of scoring one customer. Lives for a single request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Unique prediction identifier
    pub prediction_id: String,

    /// Probability of the "churns" class (0.0 - 1.0)
    pub probability: f64,

    /// Risk tier classification
    pub risk_tier: RiskTier,

    /// Display label for the tier
    pub label: String,

    /// Scoring timestamp
    pub scored_at: DateTime<Utc>,
}

impl PredictionResult {
    /// Create a result from a classifier probability.
    pub fn new(probability: f64) -> Self {
        let risk_tier = RiskTier::from_probability(probability);
        Self {
            prediction_id: uuid::Uuid::new_v4().to_string(),
            probability,
            risk_tier,
            label: risk_tier.label().to_string(),
            scored_at: Utc::now(),
        }
    }

    /// Probability as a percentage with one decimal, e.g. "73.2%".
    pub fn probability_display(&self) -> String {
        format!("{:.1}%", self.probability * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(RiskTier::from_probability(0.70), RiskTier::High);
        assert_eq!(RiskTier::from_probability(0.6999), RiskTier::Medium);
        assert_eq!(RiskTier::from_probability(0.40), RiskTier::Medium);
        assert_eq!(RiskTier::from_probability(0.3999), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(1.0), RiskTier::High);
        assert_eq!(RiskTier::from_probability(0.0), RiskTier::Low);
    }

    #[test]
    fn test_tiers_are_ordered() {
        assert!(RiskTier::Low < RiskTier::Medium);
        assert!(RiskTier::Medium < RiskTier::High);
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            RiskTier::High.label(),
            "HIGH RISK — Immediate intervention needed"
        );
        assert_eq!(RiskTier::Medium.label(), "MEDIUM RISK — Monitor closely");
        assert_eq!(RiskTier::Low.label(), "LOW RISK — Standard engagement");
    }

    #[test]
    fn test_probability_display() {
        let result = PredictionResult::new(0.7321);
        assert_eq!(result.probability_display(), "73.2%");
        assert_eq!(result.risk_tier, RiskTier::High);
        assert_eq!(result.label, RiskTier::High.label());

        assert_eq!(PredictionResult::new(0.0).probability_display(), "0.0%");
        assert_eq!(PredictionResult::new(1.0).probability_display(), "100.0%");
    }

    #[test]
    fn test_prediction_serialization() {
        let result = PredictionResult::new(0.45);
        let json = serde_json::to_string(&result).unwrap();
        let deserialized: PredictionResult = serde_json::from_str(&json).unwrap();

        assert!(json.contains("\"MEDIUM\""));
        assert_eq!(result.prediction_id, deserialized.prediction_id);
        assert_eq!(result.probability, deserialized.probability);
        assert_eq!(result.risk_tier, deserialized.risk_tier);
    }
}
