//! Turns raw form fields into a typed [`CustomerRecord`].

use crate::error::ValidationError;
use crate::types::customer::CustomerRecord;
use std::collections::HashMap;

/// Converts loosely typed form input into a customer record.
///
/// Pure: no I/O, no shared state.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordNormalizer;

impl RecordNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parse a raw field map into a [`CustomerRecord`].
    ///
    /// `TotalCharges` is recomputed as `tenure * MonthlyCharges` when it is
    /// absent, blank, NaN or exactly zero.
    pub fn normalize(
        &self,
        raw: &HashMap<String, String>,
    ) -> Result<CustomerRecord, ValidationError> {
        let tenure = parse_int(raw, "tenure")?;
        let monthly_charges = parse_float(raw, "MonthlyCharges")?;
        if tenure < 0 {
            return Err(ValidationError::Negative {
                field: "tenure",
                value: tenure as f64,
            });
        }
        if monthly_charges < 0.0 {
            return Err(ValidationError::Negative {
                field: "MonthlyCharges",
                value: monthly_charges,
            });
        }

        let total_charges = match optional_float(raw, "TotalCharges")? {
            Some(value) if value.is_infinite() => {
                return Err(ValidationError::NotNumeric {
                    field: "TotalCharges",
                    value: value.to_string(),
                })
            }
            Some(value) if !value.is_nan() && value != 0.0 => value,
            _ => tenure as f64 * monthly_charges,
        };
        if total_charges < 0.0 {
            return Err(ValidationError::Negative {
                field: "TotalCharges",
                value: total_charges,
            });
        }

        Ok(CustomerRecord {
            gender: text(raw, "gender")?,
            senior_citizen: parse_int(raw, "SeniorCitizen")?,
            partner: text(raw, "Partner")?,
            dependents: text(raw, "Dependents")?,
            tenure,
            phone_service: text(raw, "PhoneService")?,
            multiple_lines: text(raw, "MultipleLines")?,
            internet_service: text(raw, "InternetService")?,
            online_security: text(raw, "OnlineSecurity")?,
            online_backup: text(raw, "OnlineBackup")?,
            device_protection: text(raw, "DeviceProtection")?,
            tech_support: text(raw, "TechSupport")?,
            streaming_tv: text(raw, "StreamingTV")?,
            streaming_movies: text(raw, "StreamingMovies")?,
            contract: text(raw, "Contract")?,
            paperless_billing: text(raw, "PaperlessBilling")?,
            payment_method: text(raw, "PaymentMethod")?,
            monthly_charges,
            total_charges,
        })
    }
}

fn required<'a>(
    raw: &'a HashMap<String, String>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    raw.get(field)
        .map(String::as_str)
        .ok_or(ValidationError::MissingField { field })
}

/// Category labels pass through unchanged, surrounding whitespace included.
fn text(raw: &HashMap<String, String>, field: &'static str) -> Result<String, ValidationError> {
    required(raw, field).map(str::to_string)
}

fn parse_int(raw: &HashMap<String, String>, field: &'static str) -> Result<i64, ValidationError> {
    let value = required(raw, field)?;
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::NotInteger {
            field,
            value: value.to_string(),
        })
}

fn parse_float(raw: &HashMap<String, String>, field: &'static str) -> Result<f64, ValidationError> {
    let value = required(raw, field)?;
    match optional_float(raw, field)? {
        Some(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(ValidationError::NotNumeric {
            field,
            value: value.to_string(),
        }),
    }
}

/// A blank or absent value is `None`; anything else must parse.
fn optional_float(
    raw: &HashMap<String, String>,
    field: &'static str,
) -> Result<Option<f64>, ValidationError> {
    let Some(value) = raw.get(field) else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ValidationError::NotNumeric {
            field,
            value: value.clone(),
        })
}
