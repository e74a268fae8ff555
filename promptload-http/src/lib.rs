//! HTTP components for Promptload
//!
//! The inference client and the endpoint metrics collector share one
//! contract: retry with exponential backoff against a real endpoint, and
//! degrade to a clearly marked simulated payload once attempts are
//! exhausted. Neither ever surfaces a per-request error to its caller.

pub mod client;
pub mod collector;
pub mod errors;

pub use client::InferenceClient;
pub use collector::MetricsCollector;
pub use errors::HttpError;
