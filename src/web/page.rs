//! HTML rendering for the prediction form.

use minijinja::{context, AutoEscape, Environment};
use serde::Serialize;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

/// What the result panel shows below the form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPanel {
    pub message: String,
    pub probability: Option<String>,
    /// Styling tag: high, medium, low or error
    pub css_class: &'static str,
}

#[derive(Debug, Serialize)]
struct SelectField {
    name: &'static str,
    label: &'static str,
    options: &'static [&'static str],
}

#[derive(Debug, Serialize)]
struct NumberField {
    name: &'static str,
    label: &'static str,
    step: &'static str,
}

const YES_NO: &[&str] = &["Yes", "No"];
const INTERNET_ADDON: &[&str] = &["Yes", "No", "No internet service"];

/// Select inputs and their options, in form order.
const SELECT_FIELDS: [SelectField; 16] = [
    SelectField {
        name: "gender",
        label: "Gender",
        options: &["Female", "Male"],
    },
    SelectField {
        name: "SeniorCitizen",
        label: "Senior citizen",
        options: &["0", "1"],
    },
    SelectField {
        name: "Partner",
        label: "Partner",
        options: YES_NO,
    },
    SelectField {
        name: "Dependents",
        label: "Dependents",
        options: YES_NO,
    },
    SelectField {
        name: "PhoneService",
        label: "Phone service",
        options: YES_NO,
    },
    SelectField {
        name: "MultipleLines",
        label: "Multiple lines",
        options: &["Yes", "No", "No phone service"],
    },
    SelectField {
        name: "InternetService",
        label: "Internet service",
        options: &["DSL", "Fiber optic", "No"],
    },
    SelectField {
        name: "OnlineSecurity",
        label: "Online security",
        options: INTERNET_ADDON,
    },
    SelectField {
        name: "OnlineBackup",
        label: "Online backup",
        options: INTERNET_ADDON,
    },
    SelectField {
        name: "DeviceProtection",
        label: "Device protection",
        options: INTERNET_ADDON,
    },
    SelectField {
        name: "TechSupport",
        label: "Tech support",
        options: INTERNET_ADDON,
    },
    SelectField {
        name: "StreamingTV",
        label: "Streaming TV",
        options: INTERNET_ADDON,
    },
    SelectField {
        name: "StreamingMovies",
        label: "Streaming movies",
        options: INTERNET_ADDON,
    },
    SelectField {
        name: "Contract",
        label: "Contract",
        options: &["Month-to-month", "One year", "Two year"],
    },
    SelectField {
        name: "PaperlessBilling",
        label: "Paperless billing",
        options: YES_NO,
    },
    SelectField {
        name: "PaymentMethod",
        label: "Payment method",
        options: &[
            "Electronic check",
            "Mailed check",
            "Bank transfer (automatic)",
            "Credit card (automatic)",
        ],
    },
];

const NUMBER_FIELDS: [NumberField; 3] = [
    NumberField {
        name: "tenure",
        label: "Tenure (months)",
        step: "1",
    },
    NumberField {
        name: "MonthlyCharges",
        label: "Monthly charges",
        step: "0.01",
    },
    NumberField {
        name: "TotalCharges",
        label: "Total charges",
        step: "0.01",
    },
];

/// The compiled form page. Every value is HTML-escaped on output.
pub struct IndexPage {
    env: Environment<'static>,
}

impl IndexPage {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.add_template("index.html", INDEX_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Render the full page, optionally with a result panel.
    pub fn render(&self, result: Option<&ResultPanel>) -> Result<String, minijinja::Error> {
        self.env.get_template("index.html")?.render(context! {
            select_fields => SELECT_FIELDS,
            number_fields => NUMBER_FIELDS,
            result => result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> IndexPage {
        IndexPage::new().unwrap()
    }

    #[test]
    fn test_form_has_every_field() {
        let html = page().render(None).unwrap();
        for column in crate::types::customer::CUSTOMER_COLUMNS {
            assert!(html.contains(&format!("name=\"{column}\"")), "{column}");
        }
        assert!(html.contains("<option value=\"Bank transfer (automatic)\">"));
        assert!(!html.contains("class=\"result"));
    }

    #[test]
    fn test_result_panel() {
        let panel = ResultPanel {
            message: "MEDIUM RISK — Monitor closely".to_string(),
            probability: Some("55.0%".to_string()),
            css_class: "medium",
        };
        let html = page().render(Some(&panel)).unwrap();
        assert!(html.contains("class=\"result medium\""));
        assert!(html.contains("MEDIUM RISK — Monitor closely"));
        assert!(html.contains("<strong>55.0%</strong>"));
    }

    #[test]
    fn test_error_panel_is_escaped() {
        let panel = ResultPanel {
            message: "Error: column 'Contract' has unknown category '<script>'".to_string(),
            probability: None,
            css_class: "error",
        };
        let html = page().render(Some(&panel)).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("class=\"result error\""));
        assert!(!html.contains("Churn probability"));
    }
}
