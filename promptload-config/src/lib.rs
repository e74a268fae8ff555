//! Domain-driven configuration management for Promptload
//!
//! Configuration is split by functional domain (benchmark, endpoint,
//! database, monitoring, server, logging), with validation, defaults, and
//! environment variable support.

pub mod domains;
pub mod error;
pub mod loader;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

pub use domains::{
    benchmark::BenchmarkConfig, database::DatabaseConfig, endpoint::EndpointConfig,
    logging::{LogFormat, LogLevel, LoggingConfig},
    monitoring::MonitoringConfig,
    server::ServerConfig,
    PromptloadConfig,
};

pub use domains::utils::serde_duration;
