//! HTTP surface: the prediction form and a JSON API over the same pipeline.

pub mod handlers;
pub mod page;

use crate::metrics::ScoringMetrics;
use crate::pipeline::ChurnPipeline;
use crate::web::page::IndexPage;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

/// Shared, read-only server state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ChurnPipeline>,
    pub metrics: Arc<ScoringMetrics>,
    pub page: Arc<IndexPage>,
}

impl AppState {
    /// Compiles the page template; fails if it does not parse.
    pub fn new(
        pipeline: Arc<ChurnPipeline>,
        metrics: Arc<ScoringMetrics>,
    ) -> Result<Self, minijinja::Error> {
        Ok(Self {
            pipeline,
            metrics,
            page: Arc::new(IndexPage::new()?),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/predict", post(handlers::predict_form))
        .route("/api/predict", post(handlers::predict_json))
        .route("/health", get(handlers::health))
        .with_state(state)
}
