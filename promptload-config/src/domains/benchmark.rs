//! Benchmark run configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};

/// Benchmark run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Path to the JSON dataset document
    pub dataset_path: String,

    /// Base path for per-dataset result files
    pub output_file_path: String,

    /// Model identifier attached to logged benchmark results
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Maximum number of requests in flight at once within a dataset
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            dataset_path: String::new(),
            output_file_path: String::new(),
            model_name: default_model_name(),
            max_concurrent_requests: default_max_concurrent_requests(),
        }
    }
}

impl Validatable for BenchmarkConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.dataset_path, "dataset_path", self.domain_name())?;
        validate_required_string(&self.output_file_path, "output_file_path", self.domain_name())?;
        validate_required_string(&self.model_name, "model_name", self.domain_name())?;
        validate_positive(
            self.max_concurrent_requests as i64,
            "max_concurrent_requests",
            self.domain_name(),
        )?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "benchmark"
    }
}

fn default_model_name() -> String {
    "unknown-model".to_string()
}

fn default_max_concurrent_requests() -> usize {
    5
}
