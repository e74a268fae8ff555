//! Concurrent benchmark execution engine
//!
//! Datasets are processed strictly in sequence; within a dataset, cases are
//! dispatched through a bounded in-flight window. Per-request failures are
//! absorbed by the inference client and only ever appear here as simulated
//! outcomes; sink write failures propagate because losing a metrics write
//! is a correctness issue.

mod engine;
mod error;

pub use engine::Benchmarker;
pub use error::EngineError;
