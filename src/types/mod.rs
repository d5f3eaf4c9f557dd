//! Type definitions for the churn scoring pipeline

pub mod customer;
pub mod prediction;

pub use customer::{CustomerRecord, FieldValue, CUSTOMER_COLUMNS};
pub use prediction::{PredictionResult, RiskTier};
