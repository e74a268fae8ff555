//! Durable storage for Promptload
//!
//! Two sinks: a flat-file store for per-dataset raw result sets and a
//! SQLite database for per-metric rows plus the benchmark/resource history
//! the dashboard reads.

pub mod database;
pub mod error;
pub mod file_store;

pub use database::{Database, MetricsTable};
pub use error::StorageError;
pub use file_store::FileResultStore;
