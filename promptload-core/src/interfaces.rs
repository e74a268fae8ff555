//! Boundary traits the benchmark engine depends on
//!
//! Concrete clients live in promptload-http and concrete sinks in
//! promptload-storage; the engine only sees these contracts, which is also
//! what makes it testable with in-memory fakes.

use crate::metrics::{BenchmarkMetrics, EndpointMetrics};
use crate::outcome::RequestOutcome;
use crate::resource::ResourceSample;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Durable-storage write failure
///
/// Sink failures are correctness issues, not transient conditions: they
/// propagate to the caller of the dataset run instead of being swallowed.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(String),
}

/// Delivers one prompt to the inference endpoint, degrading gracefully
///
/// Never fails: retry exhaustion yields a simulated payload marked
/// `simulated: true`.
#[async_trait]
pub trait PromptClient: Send + Sync {
    async fn send(&self, prompt: &str) -> JsonValue;
}

/// Polls the endpoint's self-reported operational metrics
///
/// Same degradation contract as [`PromptClient`]: exhausted retries yield
/// a simulated mapping.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn collect(&self) -> EndpointMetrics;
}

/// Durable writer for a dataset's raw result set
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Persist the full result set keyed by dataset name. Overwrite
    /// semantics are acceptable.
    async fn store_results(
        &self,
        dataset_name: &str,
        outcomes: &[RequestOutcome],
    ) -> Result<(), SinkError>;
}

/// Durable writer for aggregated metrics
#[async_trait]
pub trait MetricsSink: Send + Sync {
    /// Persist each named metric as an individual record. Writes for one
    /// call are atomic: a failure leaves no partial rows behind.
    async fn store_metrics(
        &self,
        dataset_name: &str,
        endpoint_metrics: &EndpointMetrics,
        benchmark_metrics: &BenchmarkMetrics,
    ) -> Result<(), SinkError>;
}

/// Durable writer for host resource samples
#[async_trait]
pub trait ResourceSink: Send + Sync {
    async fn store_resource_sample(&self, sample: &ResourceSample) -> Result<(), SinkError>;
}

/// Durable log of completed benchmark runs, read back by the dashboard
#[async_trait]
pub trait ResultLog: Send + Sync {
    async fn record_result(&self, event: &crate::events::BenchmarkResultEvent)
        -> Result<(), SinkError>;
}
