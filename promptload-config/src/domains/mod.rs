//! Domain-specific configuration modules

pub mod benchmark;
pub mod database;
pub mod endpoint;
pub mod logging;
pub mod monitoring;
pub mod server;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main Promptload configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptloadConfig {
    /// Benchmark run configuration
    #[serde(default)]
    pub benchmark: benchmark::BenchmarkConfig,

    /// Inference endpoint configuration
    #[serde(default)]
    pub endpoint: endpoint::EndpointConfig,

    /// Metrics database configuration
    #[serde(default)]
    pub database: database::DatabaseConfig,

    /// Host resource monitoring configuration
    #[serde(default)]
    pub monitoring: monitoring::MonitoringConfig,

    /// Dashboard server configuration
    #[serde(default)]
    pub server: server::ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,
}

impl PromptloadConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.benchmark.validate()?;
        self.endpoint.validate()?;
        self.database.validate()?;
        self.monitoring.validate()?;
        self.server.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_fails_validation() {
        // Required fields (dataset path, endpoint URLs) default to empty,
        // so an unconfigured run must be rejected at startup.
        let config = PromptloadConfig::default();
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_minimal_config_validates() {
        let mut config = PromptloadConfig::default();
        config.benchmark.dataset_path = "data/datasets.json".into();
        config.benchmark.output_file_path = "output/results".into();
        config.endpoint.vllm_endpoint = "http://localhost:8000/generate".into();
        config.endpoint.vllm_metrics_endpoint = "http://localhost:8000/metrics".into();
        config.database.database_url = "sqlite://data/promptload.db".into();
        assert!(config.validate_all().is_ok());
    }
}
