//! Aggregate benchmark metrics and endpoint metric passthrough

use crate::outcome::RequestOutcome;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::time::Duration;

/// Aggregate statistics computed once per dataset run
///
/// Immutable once computed. All latency-derived statistics are zero for an
/// empty result set; throughput is zero when the run took no measurable
/// time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkMetrics {
    /// Number of outcomes in the result set
    pub total_requests: u64,

    /// Wall-clock span of the whole dataset run, seconds
    pub total_time: f64,

    /// Mean per-request latency, seconds
    pub avg_latency: f64,

    /// Smallest per-request latency, seconds
    pub min_latency: f64,

    /// Largest per-request latency, seconds
    pub max_latency: f64,

    /// total_requests / total_time, requests per second
    pub throughput: f64,
}

impl BenchmarkMetrics {
    /// Compute aggregates over an unordered result set
    pub fn from_outcomes(outcomes: &[RequestOutcome], total_time: Duration) -> Self {
        let total_time = total_time.as_secs_f64();
        let total_requests = outcomes.len() as u64;

        let (avg_latency, min_latency, max_latency) = if outcomes.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            let sum: f64 = outcomes.iter().map(|o| o.latency).sum();
            let min = outcomes.iter().map(|o| o.latency).fold(f64::INFINITY, f64::min);
            let max = outcomes.iter().map(|o| o.latency).fold(0.0, f64::max);
            (sum / outcomes.len() as f64, min, max)
        };

        let throughput = if total_time > 0.0 {
            total_requests as f64 / total_time
        } else {
            0.0
        };

        Self {
            total_requests,
            total_time,
            avg_latency,
            min_latency,
            max_latency,
            throughput,
        }
    }

    /// Fraction of outcomes that were simulated, in [0, 1]
    pub fn error_rate(outcomes: &[RequestOutcome]) -> f64 {
        if outcomes.is_empty() {
            return 0.0;
        }
        let simulated = outcomes.iter().filter(|o| o.is_simulated()).count();
        simulated as f64 / outcomes.len() as f64
    }

    /// Metric rows for per-metric persistence
    pub fn rows(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("total_requests", self.total_requests as f64),
            ("total_time", self.total_time),
            ("avg_latency", self.avg_latency),
            ("min_latency", self.min_latency),
            ("max_latency", self.max_latency),
            ("throughput", self.throughput),
        ]
    }
}

/// Opaque mapping of metric name to value reported by the endpoint itself
///
/// Treated as passthrough data: no schema validation, non-numeric fields
/// dropped at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointMetrics {
    /// Metric name to numeric value
    pub values: BTreeMap<String, f64>,

    /// Whether the mapping was synthesized after retry exhaustion
    pub simulated: bool,
}

impl EndpointMetrics {
    /// Extract numeric metrics from an endpoint response body
    pub fn from_json(body: &JsonValue) -> Self {
        let mut values = BTreeMap::new();
        let mut simulated = false;

        if let Some(object) = body.as_object() {
            for (name, value) in object {
                if name == crate::outcome::SIMULATED_KEY {
                    simulated = value.as_bool().unwrap_or(false);
                } else if let Some(number) = value.as_f64() {
                    values.insert(name.clone(), number);
                }
            }
        }

        Self { values, simulated }
    }

    /// Build an explicitly simulated mapping
    pub fn simulated(values: BTreeMap<String, f64>) -> Self {
        Self {
            values,
            simulated: true,
        }
    }

    /// Metric rows for per-metric persistence, simulated flag included
    /// as a 0/1 row
    pub fn rows(&self) -> Vec<(String, f64)> {
        let mut rows: Vec<(String, f64)> = self
            .values
            .iter()
            .map(|(name, value)| (name.clone(), *value))
            .collect();
        rows.push((
            crate::outcome::SIMULATED_KEY.to_string(),
            if self.simulated { 1.0 } else { 0.0 },
        ));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn outcome(latency: f64, simulated: bool) -> RequestOutcome {
        let output = if simulated {
            json!({"generated_text": "Simulated", "simulated": true})
        } else {
            json!({"generated_text": "ok"})
        };
        RequestOutcome {
            input: "prompt".into(),
            output,
            latency,
        }
    }

    #[test]
    fn test_empty_result_set_is_all_zero() {
        let metrics = BenchmarkMetrics::from_outcomes(&[], Duration::from_secs(1));
        assert_eq!(metrics.total_requests, 0);
        assert_eq!(metrics.avg_latency, 0.0);
        assert_eq!(metrics.min_latency, 0.0);
        assert_eq!(metrics.max_latency, 0.0);
        assert_eq!(metrics.throughput, 0.0);
    }

    #[test]
    fn test_zero_total_time_yields_zero_throughput() {
        let outcomes = vec![outcome(0.1, false)];
        let metrics = BenchmarkMetrics::from_outcomes(&outcomes, Duration::ZERO);
        assert_eq!(metrics.throughput, 0.0);
        assert_eq!(metrics.total_requests, 1);
    }

    #[test]
    fn test_latency_stats_exact() {
        let outcomes = vec![outcome(0.1, false), outcome(0.3, false), outcome(0.2, true)];
        let metrics = BenchmarkMetrics::from_outcomes(&outcomes, Duration::from_secs(2));

        assert_eq!(metrics.total_requests, 3);
        assert!((metrics.avg_latency - 0.2).abs() < 1e-12);
        assert_eq!(metrics.min_latency, 0.1);
        assert_eq!(metrics.max_latency, 0.3);
        assert_eq!(metrics.throughput, 1.5);
    }

    #[test]
    fn test_error_rate_is_simulated_fraction() {
        let outcomes = vec![outcome(0.1, false), outcome(0.2, true), outcome(0.3, true), outcome(0.4, true)];
        assert_eq!(BenchmarkMetrics::error_rate(&outcomes), 0.75);
        assert_eq!(BenchmarkMetrics::error_rate(&[]), 0.0);
    }

    #[test]
    fn test_endpoint_metrics_from_json() {
        let body = json!({
            "requests_per_second": 25.0,
            "average_latency": 0.2,
            "status": "healthy",
            "simulated": true
        });

        let metrics = EndpointMetrics::from_json(&body);
        assert!(metrics.simulated);
        assert_eq!(metrics.values.len(), 2);
        assert_eq!(metrics.values["requests_per_second"], 25.0);
        // Non-numeric fields are dropped.
        assert!(!metrics.values.contains_key("status"));
    }

    #[test]
    fn test_endpoint_metric_rows_include_simulated_flag() {
        let body = json!({"error_rate": 0.01});
        let rows = EndpointMetrics::from_json(&body).rows();
        assert!(rows.contains(&("error_rate".to_string(), 0.01)));
        assert!(rows.contains(&("simulated".to_string(), 0.0)));
    }
}
