//! Core domain model for Promptload
//!
//! Datasets and cases, per-request outcomes, aggregate benchmark metrics,
//! endpoint metric passthrough, resource samples, the boundary traits the
//! engine depends on, and the broadcast-based live notifier.

pub mod dataset;
pub mod events;
pub mod interfaces;
pub mod metrics;
pub mod outcome;
pub mod resource;

pub use dataset::{load_datasets, Case, Dataset, DatasetError};
pub use events::{BenchmarkResultEvent, EventBroadcaster};
pub use interfaces::{
    MetricsSink, MetricsSource, PromptClient, ResourceSink, ResultLog, ResultSink, SinkError,
};
pub use metrics::{BenchmarkMetrics, EndpointMetrics};
pub use outcome::RequestOutcome;
pub use resource::ResourceSample;
