//! Customer Churn Risk Scoring Library
//!
//! Scores a telecom customer's churn risk from form input using a trained
//! classifier and the preprocessing artifacts it was trained with.

pub mod config;
pub mod error;
pub mod features;
pub mod metrics;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod types;
pub mod web;

pub use config::AppConfig;
pub use error::{
    ArtifactError, EncodingError, PipelineError, SchemaError, ScoringError, ValidationError,
};
pub use features::{CategoricalEncoder, FeatureAssembler};
pub use models::{ArtifactBundle, ArtifactLoader, Scorer};
pub use normalizer::RecordNormalizer;
pub use pipeline::ChurnPipeline;
pub use types::{CustomerRecord, PredictionResult, RiskTier};
