//! Configuration loading and environment variable handling

use crate::domains::PromptloadConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "PROMPTLOAD".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    ///
    /// Validation is deferred to the caller so command-line overrides can
    /// still be applied on top of the loaded values.
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<PromptloadConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: PromptloadConfig = serde_yaml::from_str(&content)?;

        self.apply_env_overrides(&mut config)?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<PromptloadConfig> {
        let mut config = PromptloadConfig::default();
        self.apply_env_overrides(&mut config)?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<PromptloadConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut PromptloadConfig) -> ConfigResult<()> {
        self.apply_benchmark_overrides(&mut config.benchmark)?;
        self.apply_endpoint_overrides(&mut config.endpoint)?;
        self.apply_database_overrides(&mut config.database)?;
        self.apply_monitoring_overrides(&mut config.monitoring)?;
        self.apply_server_overrides(&mut config.server)?;
        self.apply_logging_overrides(&mut config.logging)?;
        Ok(())
    }

    /// Apply benchmark config overrides
    fn apply_benchmark_overrides(
        &self,
        config: &mut crate::domains::benchmark::BenchmarkConfig,
    ) -> ConfigResult<()> {
        if let Ok(path) = self.get_env_var("DATASET_PATH") {
            config.dataset_path = path;
        }

        if let Ok(path) = self.get_env_var("OUTPUT_FILE_PATH") {
            config.output_file_path = path;
        }

        if let Ok(model) = self.get_env_var("MODEL_NAME") {
            config.model_name = model;
        }

        if let Ok(max) = self.get_env_var("MAX_CONCURRENT_REQUESTS") {
            config.max_concurrent_requests = max.parse().map_err(|e| {
                ConfigError::EnvError(format!("Invalid MAX_CONCURRENT_REQUESTS: {}", e))
            })?;
        }

        Ok(())
    }

    /// Apply endpoint config overrides
    fn apply_endpoint_overrides(
        &self,
        config: &mut crate::domains::endpoint::EndpointConfig,
    ) -> ConfigResult<()> {
        if let Ok(url) = self.get_env_var("VLLM_ENDPOINT") {
            config.vllm_endpoint = url;
        }

        if let Ok(url) = self.get_env_var("VLLM_METRICS_ENDPOINT") {
            config.vllm_metrics_endpoint = url;
        }

        if let Ok(key) = self.get_env_var("API_KEY") {
            config.api_key = Some(key);
        }

        if let Ok(timeout) = self.get_env_var("REQUEST_TIMEOUT") {
            let seconds: u64 = timeout
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid REQUEST_TIMEOUT: {}", e)))?;
            config.timeout = std::time::Duration::from_secs(seconds);
        }

        if let Ok(retries) = self.get_env_var("MAX_RETRIES") {
            config.max_retries = retries
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid MAX_RETRIES: {}", e)))?;
        }

        Ok(())
    }

    /// Apply database config overrides
    fn apply_database_overrides(
        &self,
        config: &mut crate::domains::database::DatabaseConfig,
    ) -> ConfigResult<()> {
        if let Ok(url) = self.get_env_var("DATABASE_URL") {
            config.database_url = url;
        }

        Ok(())
    }

    /// Apply monitoring config overrides
    fn apply_monitoring_overrides(
        &self,
        config: &mut crate::domains::monitoring::MonitoringConfig,
    ) -> ConfigResult<()> {
        if let Ok(interval) = self.get_env_var("MONITORING_INTERVAL") {
            let seconds: u64 = interval.parse().map_err(|e| {
                ConfigError::EnvError(format!("Invalid MONITORING_INTERVAL: {}", e))
            })?;
            config.monitoring_interval = std::time::Duration::from_secs(seconds);
        }

        if let Ok(enabled) = self.get_env_var("MONITORING_ENABLED") {
            config.enabled = enabled
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid MONITORING_ENABLED: {}", e)))?;
        }

        Ok(())
    }

    /// Apply server config overrides
    fn apply_server_overrides(
        &self,
        config: &mut crate::domains::server::ServerConfig,
    ) -> ConfigResult<()> {
        if let Ok(bind) = self.get_env_var("SERVER_BIND_ADDRESS") {
            config.bind_address = bind;
        }

        if let Ok(port) = self.get_env_var("SERVER_PORT") {
            config.port = port
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid SERVER_PORT: {}", e)))?;
        }

        Ok(())
    }

    /// Apply logging config overrides
    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        use std::str::FromStr;

        if let Ok(level) = self.get_env_var("LOG_LEVEL") {
            config.level = crate::domains::logging::LogLevel::from_str(&level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL_YAML: &str = r#"
benchmark:
  dataset_path: data/datasets.json
  output_file_path: output/results
  max_concurrent_requests: 8
endpoint:
  vllm_endpoint: http://localhost:8000/generate
  vllm_metrics_endpoint: http://localhost:8000/metrics
  timeout: 30
database:
  database_url: sqlite://data/promptload.db
monitoring:
  monitoring_interval: 2
"#;

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL_YAML.as_bytes()).unwrap();

        let config = ConfigLoader::new().from_file(file.path()).unwrap();
        assert_eq!(config.benchmark.max_concurrent_requests, 8);
        assert_eq!(config.endpoint.timeout, std::time::Duration::from_secs(30));
        assert_eq!(
            config.monitoring.monitoring_interval,
            std::time::Duration::from_secs(2)
        );
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_env_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL_YAML.as_bytes()).unwrap();

        // Unique prefix keeps this test independent of the process environment.
        std::env::set_var("PLTEST_MAX_CONCURRENT_REQUESTS", "3");
        std::env::set_var("PLTEST_MODEL_NAME", "llama-3-8b");

        let config = ConfigLoader::with_prefix("PLTEST")
            .from_file(file.path())
            .unwrap();
        assert_eq!(config.benchmark.max_concurrent_requests, 3);
        assert_eq!(config.benchmark.model_name, "llama-3-8b");

        std::env::remove_var("PLTEST_MAX_CONCURRENT_REQUESTS");
        std::env::remove_var("PLTEST_MODEL_NAME");
    }

    #[test]
    fn test_invalid_env_value() {
        std::env::set_var("PLBAD_MAX_CONCURRENT_REQUESTS", "lots");

        let result = ConfigLoader::with_prefix("PLBAD").from_env();
        assert!(matches!(result, Err(ConfigError::EnvError(_))));

        std::env::remove_var("PLBAD_MAX_CONCURRENT_REQUESTS");
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"benchmark: [not, a, mapping").unwrap();

        let result = ConfigLoader::new().from_file(file.path());
        assert!(matches!(result, Err(ConfigError::YamlError(_))));
    }
}
