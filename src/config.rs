//! Configuration management for the churn scoring service

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "CHURN_CONFIG";

/// Serialization format of the trained classifier
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// Coefficients and intercept as JSON
    #[default]
    Logistic,
    /// ONNX graph run through ONNX Runtime
    Onnx,
}

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Location and format of the trained artifacts
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsConfig {
    /// Directory containing all artifact files
    pub dir: String,
    #[serde(default)]
    pub model_format: ModelFormat,
    /// Classifier file name; defaults depend on `model_format`
    #[serde(default)]
    pub model_file: Option<String>,
    #[serde(default = "default_scaler_file")]
    pub scaler_file: String,
    #[serde(default = "default_features_file")]
    pub features_file: String,
    #[serde(default = "default_categorical_file")]
    pub categorical_columns_file: String,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_scaler_file() -> String {
    "feature_scaler.json".to_string()
}

fn default_features_file() -> String {
    "model_features.json".to_string()
}

fn default_categorical_file() -> String {
    "categorical_columns.json".to_string()
}

fn default_onnx_threads() -> usize {
    1
}

impl ArtifactsConfig {
    /// Artifacts rooted at `dir` with default file names.
    pub fn in_dir<P: AsRef<Path>>(dir: P, model_format: ModelFormat) -> Self {
        Self {
            dir: dir.as_ref().to_string_lossy().into_owned(),
            model_format,
            ..Self::default()
        }
    }

    pub fn model_path(&self) -> PathBuf {
        let file = self.model_file.clone().unwrap_or_else(|| match self.model_format {
            ModelFormat::Logistic => "churn_prediction_model.json".to_string(),
            ModelFormat::Onnx => "churn_prediction_model.onnx".to_string(),
        });
        Path::new(&self.dir).join(file)
    }

    pub fn scaler_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.scaler_file)
    }

    pub fn features_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.features_file)
    }

    pub fn categorical_columns_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.categorical_columns_file)
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: "churn_model_artifacts".to_string(),
            model_format: ModelFormat::Logistic,
            model_file: None,
            scaler_file: default_scaler_file(),
            features_file: default_features_file(),
            categorical_columns_file: default_categorical_file(),
            onnx_threads: default_onnx_threads(),
        }
    }
}

/// Metrics reporting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Seconds between logged summaries; 0 disables the reporter
    pub report_interval_secs: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            report_interval_secs: 300,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `$CHURN_CONFIG` or `config/config.toml`
    pub fn load() -> Result<Self> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config/config.toml".to_string());
        Self::load_from_path(path)
    }

    /// Load configuration from a specific path, with `CHURN__*` overrides
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix("CHURN").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Socket address string for the HTTP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
