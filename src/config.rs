//! Configuration management for the fraud scoring service

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub nats: NatsConfig,
    pub artifacts: ArtifactsConfig,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
}

/// NATS connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    /// NATS server URL
    pub url: String,
    /// Subject for incoming transactions to score
    pub transaction_subject: String,
    /// Subject for outgoing verdicts
    pub verdict_subject: String,
    /// Subject for inference failures
    pub failure_subject: String,
}

/// Fitted artifacts and lookup tables
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsConfig {
    /// ONNX anomaly model
    pub model_path: String,
    /// Standard-scaler parameters (JSON)
    pub scaler_path: String,
    /// Device → linked-account-count table (JSON)
    pub device_lookup_path: String,
    /// IP → linked-account-count table (JSON)
    pub ip_lookup_path: String,
    /// Occupation → balance statistics table (JSON)
    pub occupation_lookup_path: String,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_onnx_threads() -> usize {
    1
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Number of concurrently processed transactions
    pub workers: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from the default file location
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nats: NatsConfig {
                url: "nats://localhost:4222".to_string(),
                transaction_subject: "transactions".to_string(),
                verdict_subject: "fraud.verdicts".to_string(),
                failure_subject: "fraud.failures".to_string(),
            },
            artifacts: ArtifactsConfig {
                model_path: "artifacts/model.onnx".to_string(),
                scaler_path: "artifacts/scaler.json".to_string(),
                device_lookup_path: "artifacts/device_lookup.json".to_string(),
                ip_lookup_path: "artifacts/ip_lookup.json".to_string(),
                occupation_lookup_path: "artifacts/occupation_lookup.json".to_string(),
                onnx_threads: 1,
            },
            pipeline: PipelineConfig { workers: 4 },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.nats.url, "nats://localhost:4222");
        assert_eq!(config.nats.verdict_subject, "fraud.verdicts");
        assert_eq!(config.artifacts.onnx_threads, 1);
        assert_eq!(config.pipeline.workers, 4);
    }
}
