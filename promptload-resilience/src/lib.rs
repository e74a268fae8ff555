//! Resilience patterns for Promptload
//!
//! One retrying-operation abstraction shared by every component that talks
//! to the inference endpoint: a retry policy, pluggable backoff, and an
//! executor that can degrade to a caller-supplied fallback value once
//! attempts are exhausted.

pub mod backoff;
pub mod retry;

pub use backoff::{BackoffCalculator, BackoffStrategy};
pub use retry::{RetryError, RetryExecutor, RetryPolicy, Retryable};
