//! Customer account data structures for churn scoring

use serde::Serialize;

/// Every column a customer record can supply, in the telco dataset order.
pub const CUSTOMER_COLUMNS: [&str; 19] = [
    "gender",
    "SeniorCitizen",
    "Partner",
    "Dependents",
    "tenure",
    "PhoneService",
    "MultipleLines",
    "InternetService",
    "OnlineSecurity",
    "OnlineBackup",
    "DeviceProtection",
    "TechSupport",
    "StreamingTV",
    "StreamingMovies",
    "Contract",
    "PaperlessBilling",
    "PaymentMethod",
    "MonthlyCharges",
    "TotalCharges",
];

/// Columns carried as category labels rather than numbers.
pub const TEXT_COLUMNS: [&str; 15] = [
    "gender",
    "Partner",
    "Dependents",
    "PhoneService",
    "MultipleLines",
    "InternetService",
    "OnlineSecurity",
    "OnlineBackup",
    "DeviceProtection",
    "TechSupport",
    "StreamingTV",
    "StreamingMovies",
    "Contract",
    "PaperlessBilling",
    "PaymentMethod",
];

/// Borrowed view of one typed column value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Int(i64),
    Float(f64),
    Text(&'a str),
}

/// One customer's account attributes after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRecord {
    pub gender: String,

    /// 0/1 flag
    #[serde(rename = "SeniorCitizen")]
    pub senior_citizen: i64,

    #[serde(rename = "Partner")]
    pub partner: String,

    #[serde(rename = "Dependents")]
    pub dependents: String,

    /// Months with the company
    pub tenure: i64,

    #[serde(rename = "PhoneService")]
    pub phone_service: String,

    #[serde(rename = "MultipleLines")]
    pub multiple_lines: String,

    #[serde(rename = "InternetService")]
    pub internet_service: String,

    #[serde(rename = "OnlineSecurity")]
    pub online_security: String,

    #[serde(rename = "OnlineBackup")]
    pub online_backup: String,

    #[serde(rename = "DeviceProtection")]
    pub device_protection: String,

    #[serde(rename = "TechSupport")]
    pub tech_support: String,

    #[serde(rename = "StreamingTV")]
    pub streaming_tv: String,

    #[serde(rename = "StreamingMovies")]
    pub streaming_movies: String,

    /// Month-to-month, One year or Two year
    #[serde(rename = "Contract")]
    pub contract: String,

    #[serde(rename = "PaperlessBilling")]
    pub paperless_billing: String,

    #[serde(rename = "PaymentMethod")]
    pub payment_method: String,

    #[serde(rename = "MonthlyCharges")]
    pub monthly_charges: f64,

    /// Cumulative billing, derived from tenure when not supplied
    #[serde(rename = "TotalCharges")]
    pub total_charges: f64,
}

impl CustomerRecord {
    /// Look up a column by its dataset name.
    pub fn get(&self, column: &str) -> Option<FieldValue<'_>> {
        let value = match column {
            "gender" => FieldValue::Text(&self.gender),
            "SeniorCitizen" => FieldValue::Int(self.senior_citizen),
            "Partner" => FieldValue::Text(&self.partner),
            "Dependents" => FieldValue::Text(&self.dependents),
            "tenure" => FieldValue::Int(self.tenure),
            "PhoneService" => FieldValue::Text(&self.phone_service),
            "MultipleLines" => FieldValue::Text(&self.multiple_lines),
            "InternetService" => FieldValue::Text(&self.internet_service),
            "OnlineSecurity" => FieldValue::Text(&self.online_security),
            "OnlineBackup" => FieldValue::Text(&self.online_backup),
            "DeviceProtection" => FieldValue::Text(&self.device_protection),
            "TechSupport" => FieldValue::Text(&self.tech_support),
            "StreamingTV" => FieldValue::Text(&self.streaming_tv),
            "StreamingMovies" => FieldValue::Text(&self.streaming_movies),
            "Contract" => FieldValue::Text(&self.contract),
            "PaperlessBilling" => FieldValue::Text(&self.paperless_billing),
            "PaymentMethod" => FieldValue::Text(&self.payment_method),
            "MonthlyCharges" => FieldValue::Float(self.monthly_charges),
            "TotalCharges" => FieldValue::Float(self.total_charges),
            _ => return None,
        };
        Some(value)
    }

    /// Iterate over all columns in dataset order.
    pub fn columns(&self) -> impl Iterator<Item = (&'static str, FieldValue<'_>)> + '_ {
        CUSTOMER_COLUMNS
            .into_iter()
            .filter_map(move |name| self.get(name).map(|value| (name, value)))
    }

    /// Whether the named column is a known customer attribute.
    pub fn is_known_column(column: &str) -> bool {
        CUSTOMER_COLUMNS.contains(&column)
    }

    /// Whether the named column carries a category label.
    pub fn is_text_column(column: &str) -> bool {
        TEXT_COLUMNS.contains(&column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CustomerRecord {
        CustomerRecord {
            gender: "Female".to_string(),
            senior_citizen: 0,
            partner: "Yes".to_string(),
            dependents: "No".to_string(),
            tenure: 1,
            phone_service: "No".to_string(),
            multiple_lines: "No phone service".to_string(),
            internet_service: "DSL".to_string(),
            online_security: "No".to_string(),
            online_backup: "Yes".to_string(),
            device_protection: "No".to_string(),
            tech_support: "No".to_string(),
            streaming_tv: "No".to_string(),
            streaming_movies: "No".to_string(),
            contract: "Month-to-month".to_string(),
            paperless_billing: "Yes".to_string(),
            payment_method: "Electronic check".to_string(),
            monthly_charges: 29.85,
            total_charges: 29.85,
        }
    }

    #[test]
    fn test_every_column_resolves() {
        let record = sample();
        for column in CUSTOMER_COLUMNS {
            assert!(record.get(column).is_some(), "{column} should resolve");
        }
        assert_eq!(record.columns().count(), 19);
        assert!(record.get("customerID").is_none());
    }

    #[test]
    fn test_text_columns_hold_text() {
        let record = sample();
        for column in CUSTOMER_COLUMNS {
            let is_text = matches!(record.get(column), Some(FieldValue::Text(_)));
            assert_eq!(is_text, CustomerRecord::is_text_column(column), "{column}");
        }
    }

    #[test]
    fn test_serialization_uses_dataset_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["SeniorCitizen"], 0);
        assert_eq!(json["PaymentMethod"], "Electronic check");
        assert_eq!(json["gender"], "Female");
    }
}
