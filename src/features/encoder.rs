//! Categorical encoding with the shared training-time vocabulary.
//!
//! The model was trained with a single label space for every categorical
//! column: each label's code is its position in the sorted vocabulary, so
//! "Yes" encodes the same way in `Partner` as in `PaperlessBilling`.

use crate::error::EncodingError;
use crate::types::customer::{CustomerRecord, FieldValue};
use std::collections::BTreeMap;

/// Category labels in the order the training pipeline listed them.
pub const TRAINING_LABELS: [&str; 15] = [
    "No",
    "Yes",
    "Male",
    "Female",
    "No phone service",
    "DSL",
    "Fiber optic",
    "No internet service",
    "Month-to-month",
    "One year",
    "Two year",
    "Bank transfer (automatic)",
    "Credit card (automatic)",
    "Electronic check",
    "Mailed check",
];

/// Sorted label table. A label's code is its index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    labels: Vec<&'static str>,
}

impl Vocabulary {
    /// Fit on a label list. Input order does not matter.
    pub fn fit(labels: &[&'static str]) -> Self {
        let mut labels = labels.to_vec();
        labels.sort_unstable();
        labels.dedup();
        Self { labels }
    }

    /// The vocabulary the churn model was trained against.
    pub fn telco() -> Self {
        Self::fit(&TRAINING_LABELS)
    }

    /// Ordinal code of `label`, if it is part of the vocabulary.
    pub fn code(&self, label: &str) -> Option<u32> {
        self.labels
            .binary_search_by(|entry| (*entry).cmp(label))
            .ok()
            .map(|index| index as u32)
    }

    pub fn labels(&self) -> &[&'static str] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// A column value after encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedValue {
    Number(f64),
    /// Text column that was not in the categorical set
    Text(String),
}

/// Customer record with categorical columns replaced by their codes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedRecord {
    values: BTreeMap<String, EncodedValue>,
}

impl EncodedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: EncodedValue) {
        self.values.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&EncodedValue> {
        self.values.get(column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, EncodedValue)> for EncodedRecord {
    fn from_iter<I: IntoIterator<Item = (K, EncodedValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Replaces categorical labels with vocabulary codes.
#[derive(Debug, Clone)]
pub struct CategoricalEncoder {
    vocabulary: Vocabulary,
    categorical_columns: Vec<String>,
}

impl CategoricalEncoder {
    /// Build the encoder once at startup for the given categorical columns.
    pub fn new(categorical_columns: &[String]) -> Self {
        Self::with_vocabulary(Vocabulary::telco(), categorical_columns)
    }

    pub fn with_vocabulary(vocabulary: Vocabulary, categorical_columns: &[String]) -> Self {
        Self {
            vocabulary,
            categorical_columns: categorical_columns.to_vec(),
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn categorical_columns(&self) -> &[String] {
        &self.categorical_columns
    }

    fn is_categorical(&self, column: &str) -> bool {
        self.categorical_columns.iter().any(|c| c == column)
    }

    /// Encode one label of one column.
    pub fn encode_value(&self, column: &str, label: &str) -> Result<u32, EncodingError> {
        self.vocabulary.code(label).ok_or_else(|| EncodingError {
            column: column.to_string(),
            value: label.to_string(),
        })
    }

    /// Produce an encoded copy of `record`.
    ///
    /// Categorical columns are looked up in the vocabulary by their string
    /// form; numbers in a categorical column are never in the vocabulary and
    /// are rejected like any other unknown label.
    pub fn encode(&self, record: &CustomerRecord) -> Result<EncodedRecord, EncodingError> {
        let mut encoded = EncodedRecord::new();

        for (column, value) in record.columns() {
            let value = if self.is_categorical(column) {
                let label = match value {
                    FieldValue::Text(text) => text.to_string(),
                    FieldValue::Int(number) => number.to_string(),
                    FieldValue::Float(number) => number.to_string(),
                };
                EncodedValue::Number(self.encode_value(column, &label)? as f64)
            } else {
                match value {
                    FieldValue::Int(number) => EncodedValue::Number(number as f64),
                    FieldValue::Float(number) => EncodedValue::Number(number),
                    FieldValue::Text(text) => EncodedValue::Text(text.to_string()),
                }
            };
            encoded.insert(column, value);
        }

        Ok(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::customer::TEXT_COLUMNS;

    fn all_text_columns() -> Vec<String> {
        TEXT_COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    fn record() -> CustomerRecord {
        CustomerRecord {
            gender: "Male".to_string(),
            senior_citizen: 1,
            partner: "Yes".to_string(),
            dependents: "Yes".to_string(),
            tenure: 34,
            phone_service: "Yes".to_string(),
            multiple_lines: "No".to_string(),
            internet_service: "Fiber optic".to_string(),
            online_security: "No internet service".to_string(),
            online_backup: "No".to_string(),
            device_protection: "Yes".to_string(),
            tech_support: "No".to_string(),
            streaming_tv: "Yes".to_string(),
            streaming_movies: "Yes".to_string(),
            contract: "One year".to_string(),
            paperless_billing: "No".to_string(),
            payment_method: "Mailed check".to_string(),
            monthly_charges: 56.95,
            total_charges: 1889.5,
        }
    }

    #[test]
    fn test_vocabulary_codes_follow_sorted_order() {
        let vocab = Vocabulary::telco();
        assert_eq!(vocab.len(), 15);
        let expected = [
            "Bank transfer (automatic)",
            "Credit card (automatic)",
            "DSL",
            "Electronic check",
            "Female",
            "Fiber optic",
            "Mailed check",
            "Male",
            "Month-to-month",
            "No",
            "No internet service",
            "No phone service",
            "One year",
            "Two year",
            "Yes",
        ];
        for (code, label) in expected.iter().enumerate() {
            assert_eq!(vocab.code(label), Some(code as u32), "{label}");
        }
    }

    #[test]
    fn test_vocabulary_independent_of_input_order() {
        let mut reversed = TRAINING_LABELS;
        reversed.reverse();
        assert_eq!(Vocabulary::fit(&reversed), Vocabulary::telco());
    }

    #[test]
    fn test_vocabulary_is_case_sensitive() {
        let vocab = Vocabulary::telco();
        assert_eq!(vocab.code("yes"), None);
        assert_eq!(vocab.code("Yes "), None);
    }

    #[test]
    fn test_same_label_same_code_in_every_column() {
        let encoder = CategoricalEncoder::new(&all_text_columns());
        let codes: Vec<u32> = TEXT_COLUMNS
            .iter()
            .map(|column| encoder.encode_value(column, "Yes").unwrap())
            .collect();
        assert!(codes.iter().all(|&code| code == 14));
    }

    #[test]
    fn test_encode_replaces_categorical_columns() {
        let encoder = CategoricalEncoder::new(&all_text_columns());
        let encoded = encoder.encode(&record()).unwrap();

        assert_eq!(encoded.len(), 19);
        assert_eq!(encoded.get("gender"), Some(&EncodedValue::Number(7.0)));
        assert_eq!(encoded.get("InternetService"), Some(&EncodedValue::Number(5.0)));
        assert_eq!(encoded.get("Contract"), Some(&EncodedValue::Number(12.0)));
        assert_eq!(encoded.get("PaymentMethod"), Some(&EncodedValue::Number(6.0)));
        assert_eq!(encoded.get("tenure"), Some(&EncodedValue::Number(34.0)));
        assert_eq!(encoded.get("TotalCharges"), Some(&EncodedValue::Number(1889.5)));
    }

    #[test]
    fn test_non_categorical_text_left_untouched() {
        let encoder = CategoricalEncoder::new(&["gender".to_string()]);
        let encoded = encoder.encode(&record()).unwrap();
        assert_eq!(encoded.get("gender"), Some(&EncodedValue::Number(7.0)));
        assert_eq!(
            encoded.get("Partner"),
            Some(&EncodedValue::Text("Yes".to_string()))
        );
    }

    #[test]
    fn test_unknown_category_rejected() {
        let encoder = CategoricalEncoder::new(&all_text_columns());
        let mut customer = record();
        customer.contract = "Unknown".to_string();

        let err = encoder.encode(&customer).unwrap_err();
        assert_eq!(err.column, "Contract");
        assert_eq!(err.value, "Unknown");
    }

    #[test]
    fn test_numeric_column_marked_categorical_rejected() {
        let encoder = CategoricalEncoder::new(&["SeniorCitizen".to_string()]);
        let err = encoder.encode(&record()).unwrap_err();
        assert_eq!(err.column, "SeniorCitizen");
        assert_eq!(err.value, "1");
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let first = CategoricalEncoder::new(&all_text_columns());
        let second = CategoricalEncoder::new(&all_text_columns());
        let a = first.encode(&record()).unwrap();
        let b = first.encode(&record()).unwrap();
        let c = second.encode(&record()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }
}
