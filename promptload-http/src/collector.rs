//! Endpoint operational metrics collector

use crate::errors::HttpError;
use async_trait::async_trait;
use promptload_config::EndpointConfig;
use promptload_core::{EndpointMetrics, MetricsSource};
use promptload_resilience::{RetryExecutor, RetryPolicy};
use rand::Rng;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Collector polling the endpoint's self-reported metrics
///
/// Structurally the same degradation contract as the inference client:
/// retry with backoff, then synthesize a plausible mapping flagged
/// `simulated`. Polled once per dataset run, not once per request.
pub struct MetricsCollector {
    client: reqwest::Client,
    config: EndpointConfig,
    executor: RetryExecutor,
}

impl MetricsCollector {
    /// Create a collector from endpoint configuration
    pub fn new(config: EndpointConfig) -> Result<Self, HttpError> {
        let policy = RetryPolicy::endpoint(config.max_retries);
        Self::with_policy(config, policy)
    }

    /// Create a collector with an explicit retry policy
    pub fn with_policy(config: EndpointConfig, policy: RetryPolicy) -> Result<Self, HttpError> {
        debug!(
            "Creating metrics collector for {}",
            config.vllm_metrics_endpoint
        );

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            config,
            executor: RetryExecutor::new(policy),
        })
    }

    /// One poll attempt against the metrics endpoint
    async fn attempt(&self) -> Result<EndpointMetrics, HttpError> {
        let response = self
            .client
            .get(&self.config.vllm_metrics_endpoint)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                status: status.as_u16(),
            });
        }

        let body: JsonValue = response.json().await?;
        Ok(EndpointMetrics::from_json(&body))
    }

    /// Synthesize a plausible metrics mapping after retry exhaustion
    fn simulate_metrics() -> EndpointMetrics {
        warn!("Max retries reached. Simulating metrics.");

        let mut rng = rand::thread_rng();
        let mut values = BTreeMap::new();
        values.insert(
            "requests_per_second".to_string(),
            rng.gen_range(10.0..50.0),
        );
        values.insert("average_latency".to_string(), rng.gen_range(0.1..0.5));
        values.insert("error_rate".to_string(), rng.gen_range(0.0..0.05));

        EndpointMetrics::simulated(values)
    }
}

#[async_trait]
impl MetricsSource for MetricsCollector {
    async fn collect(&self) -> EndpointMetrics {
        self.executor
            .execute_with_fallback(
                || self.attempt(),
                || async { Self::simulate_metrics() },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Json, Router};
    use promptload_resilience::BackoffStrategy;
    use serde_json::json;
    use std::time::Duration;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
            backoff_strategy: BackoffStrategy::Fixed,
            jitter: false,
        }
    }

    fn config_for(metrics_endpoint: String) -> EndpointConfig {
        EndpointConfig {
            vllm_endpoint: "http://127.0.0.1:1/generate".into(),
            vllm_metrics_endpoint: metrics_endpoint,
            api_key: None,
            timeout: Duration::from_secs(5),
            max_retries: 3,
        }
    }

    #[tokio::test]
    async fn test_collect_parses_numeric_metrics() {
        let router = Router::new().route(
            "/metrics",
            get(|| async {
                Json(json!({
                    "requests_per_second": 33.0,
                    "average_latency": 0.25,
                    "build": "v0.5.1"
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let collector = MetricsCollector::with_policy(
            config_for(format!("http://{}/metrics", addr)),
            fast_policy(3),
        )
        .unwrap();

        let metrics = collector.collect().await;
        assert!(!metrics.simulated);
        assert_eq!(metrics.values["requests_per_second"], 33.0);
        assert!(!metrics.values.contains_key("build"));
    }

    #[tokio::test]
    async fn test_exhausted_retries_degrade_to_simulated_metrics() {
        let collector = MetricsCollector::with_policy(
            config_for("http://127.0.0.1:1/metrics".into()),
            fast_policy(2),
        )
        .unwrap();

        let metrics = collector.collect().await;
        assert!(metrics.simulated);

        let rps = metrics.values["requests_per_second"];
        assert!((10.0..50.0).contains(&rps));
        let latency = metrics.values["average_latency"];
        assert!((0.1..0.5).contains(&latency));
        let error_rate = metrics.values["error_rate"];
        assert!((0.0..0.05).contains(&error_rate));
    }
}
