//! Inference endpoint configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_url, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inference endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Completion endpoint URL (receives POST {"prompt": ...})
    pub vllm_endpoint: String,

    /// Endpoint self-reported metrics URL (receives GET)
    pub vllm_metrics_endpoint: String,

    /// Optional bearer token sent with completion requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-attempt request timeout
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_timeout"
    )]
    pub timeout: Duration,

    /// Maximum attempts before degrading to a simulated response
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            vllm_endpoint: String::new(),
            vllm_metrics_endpoint: String::new(),
            api_key: None,
            timeout: default_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl Validatable for EndpointConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url(&self.vllm_endpoint, "vllm_endpoint", self.domain_name())?;
        validate_url(
            &self.vllm_metrics_endpoint,
            "vllm_metrics_endpoint",
            self.domain_name(),
        )?;
        validate_positive(
            self.max_retries as i64,
            "max_retries",
            self.domain_name(),
        )?;
        if self.timeout.is_zero() {
            return Err(self.validation_error("timeout must be greater than 0"));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "endpoint"
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(900)
}

fn default_max_retries() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EndpointConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(900));
        assert_eq!(config.max_retries, 3);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let config = EndpointConfig {
            vllm_endpoint: "not a url".into(),
            vllm_metrics_endpoint: "http://localhost:8000/metrics".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
