//! Feature vector assembly in training column order.

use crate::error::SchemaError;
use crate::features::encoder::{EncodedRecord, EncodedValue};

/// Lays out an encoded record in the exact column order of the feature schema.
///
/// The schema is authoritative: columns outside it are dropped, and position
/// in the output depends on nothing but the schema.
#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    schema: Vec<String>,
}

impl FeatureAssembler {
    pub fn new(schema: &[String]) -> Self {
        Self {
            schema: schema.to_vec(),
        }
    }

    /// Number of features produced.
    pub fn feature_count(&self) -> usize {
        self.schema.len()
    }

    /// Feature names in model order.
    pub fn feature_names(&self) -> &[String] {
        &self.schema
    }

    /// Build the feature vector for one record.
    pub fn assemble(&self, record: &EncodedRecord) -> Result<Vec<f64>, SchemaError> {
        self.schema
            .iter()
            .map(|column| match record.get(column) {
                Some(EncodedValue::Number(value)) => Ok(*value),
                Some(EncodedValue::Text(_)) => Err(SchemaError::NotEncoded {
                    column: column.clone(),
                }),
                None => Err(SchemaError::MissingColumn {
                    column: column.clone(),
                }),
            })
            .collect()
    }
}
