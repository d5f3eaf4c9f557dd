//! Churn Risk Scoring Service - Main Entry Point
//!
//! Loads the trained artifacts once, then serves the prediction form and
//! JSON API over HTTP.

use anyhow::{Context, Result};
use churn_risk_scoring::{
    config::{AppConfig, LoggingConfig},
    metrics::{MetricsReporter, ScoringMetrics},
    pipeline::ChurnPipeline,
    web::{self, AppState},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(config: &LoggingConfig) -> Result<()> {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(format!("churn_risk_scoring={}", config.level))
    })?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("Starting Churn Risk Scoring Service");
    info!(
        artifacts_dir = %config.artifacts.dir,
        model_format = ?config.artifacts.model_format,
        "Configuration loaded successfully"
    );

    // Artifacts are loaded once and shared read-only afterwards
    let pipeline = Arc::new(ChurnPipeline::from_config(&config.artifacts)?);
    info!(
        model = %pipeline.model_name(),
        features = pipeline.feature_count(),
        "Scoring pipeline initialized"
    );

    let metrics = Arc::new(ScoringMetrics::new());
    if config.metrics.report_interval_secs > 0 {
        let reporter = MetricsReporter::new(metrics.clone(), config.metrics.report_interval_secs);
        tokio::spawn(reporter.start());
    }

    let state =
        AppState::new(pipeline, metrics.clone()).context("Failed to compile page template")?;
    let app = web::router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Service shutting down...");
    metrics.print_summary();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
