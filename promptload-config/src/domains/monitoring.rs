//! Host resource monitoring configuration

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Host resource monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Interval between resource samples
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_monitoring_interval"
    )]
    pub monitoring_interval: Duration,

    /// Whether the resource sampling loop runs at all
    #[serde(default = "crate::domains::utils::default_true")]
    pub enabled: bool,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            monitoring_interval: default_monitoring_interval(),
            enabled: true,
        }
    }
}

impl Validatable for MonitoringConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.enabled && self.monitoring_interval.is_zero() {
            return Err(self.validation_error("monitoring_interval must be greater than 0"));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "monitoring"
    }
}

fn default_monitoring_interval() -> Duration {
    Duration::from_secs(5)
}
