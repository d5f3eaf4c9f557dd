//! HTTP handlers for the form, the JSON API and health checks.

use crate::error::PipelineError;
use crate::types::prediction::PredictionResult;
use crate::web::page::ResultPanel;
use crate::web::AppState;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{error, info, warn};

/// JSON body returned by the prediction API
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction_id: String,
    pub probability: f64,
    pub probability_display: String,
    pub risk_tier: &'static str,
    pub label: String,
    pub css_class: &'static str,
    pub scored_at: chrono::DateTime<chrono::Utc>,
}

impl From<PredictionResult> for PredictionResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            probability_display: result.probability_display(),
            risk_tier: result.risk_tier.as_str(),
            css_class: result.risk_tier.css_class(),
            prediction_id: result.prediction_id,
            probability: result.probability,
            label: result.label,
            scored_at: result.scored_at,
        }
    }
}

/// Run one request through the pipeline and record its outcome.
fn run_prediction(
    state: &AppState,
    raw: &HashMap<String, String>,
) -> Result<PredictionResult, PipelineError> {
    let start = Instant::now();

    match state.pipeline.score(raw) {
        Ok(result) => {
            let latency = start.elapsed();
            state.metrics.record_prediction(latency, &result);
            info!(
                prediction_id = %result.prediction_id,
                risk_tier = result.risk_tier.as_str(),
                probability = result.probability,
                latency_us = latency.as_micros() as u64,
                "Prediction served"
            );
            Ok(result)
        }
        Err(e) => {
            let latency = start.elapsed();
            state.metrics.record_failure(latency, e.kind());
            warn!(
                error_kind = e.kind(),
                error = %e,
                latency_us = latency.as_micros() as u64,
                "Prediction failed"
            );
            Err(e)
        }
    }
}

fn render_page(
    state: &AppState,
    panel: Option<&ResultPanel>,
) -> Result<Html<String>, (StatusCode, String)> {
    state.page.render(panel).map(Html).map_err(|e| {
        error!(error = %e, "Failed to render page");
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page".to_string())
    })
}

/// `GET /`
pub async fn index(
    State(state): State<AppState>,
) -> Result<Html<String>, (StatusCode, String)> {
    render_page(&state, None)
}

/// `POST /predict`: form submission rendered back as HTML.
pub async fn predict_form(
    State(state): State<AppState>,
    Form(raw): Form<HashMap<String, String>>,
) -> Result<Html<String>, (StatusCode, String)> {
    let panel = match run_prediction(&state, &raw) {
        Ok(result) => ResultPanel {
            probability: Some(result.probability_display()),
            css_class: result.risk_tier.css_class(),
            message: result.label,
        },
        Err(e) => ResultPanel {
            message: e.display_message(),
            probability: None,
            css_class: "error",
        },
    };
    render_page(&state, Some(&panel))
}

/// `POST /api/predict`: JSON object of fields, structured errors.
pub async fn predict_json(
    State(state): State<AppState>,
    Json(body): Json<HashMap<String, Value>>,
) -> Result<Json<PredictionResponse>, (StatusCode, Json<Value>)> {
    let raw = stringify_fields(body);

    run_prediction(&state, &raw)
        .map(|result| Json(result.into()))
        .map_err(|e| {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": e.display_message(), "kind": e.kind() })),
            )
        })
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model": state.pipeline.model_name(),
        "features": state.pipeline.feature_count(),
        "metrics": state.metrics.snapshot(),
    }))
}

/// JSON callers may send numbers; the pipeline takes every field as text.
fn stringify_fields(body: HashMap<String, Value>) -> HashMap<String, String> {
    body.into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect()
}
