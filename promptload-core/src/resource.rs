//! Host resource samples

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One periodic sample of host resource usage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSample {
    /// Global CPU utilization, percent
    pub cpu_percent: f64,

    /// Memory utilization, percent of total
    pub memory_percent: f64,

    /// GPU utilization, percent. Always 0 until a GPU telemetry source
    /// is wired in.
    pub gpu_percent: f64,

    /// Sample time
    pub timestamp: DateTime<Utc>,
}
