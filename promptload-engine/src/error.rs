//! Engine error types

use promptload_core::SinkError;
use thiserror::Error;

/// Errors that abort a dataset's pipeline
#[derive(Debug, Error)]
pub enum EngineError {
    /// A durable-storage write failed
    #[error("Sink write failed: {0}")]
    Sink(#[from] SinkError),

    /// A benchmark worker task panicked
    #[error("Benchmark worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
