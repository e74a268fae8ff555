//! HTTP error types

use promptload_resilience::Retryable;
use thiserror::Error;

/// Errors raised by a single request attempt
#[derive(Debug, Error)]
pub enum HttpError {
    /// Transport-level failure, including per-attempt timeouts
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Endpoint answered with a non-2xx status
    #[error("Endpoint returned status {status}")]
    Status { status: u16 },
}

impl Retryable for HttpError {
    fn is_retryable(&self) -> bool {
        // Endpoint instability is transient by assumption: transport
        // failures, timeouts and non-2xx statuses are all retried until
        // the attempt budget runs out.
        true
    }
}
