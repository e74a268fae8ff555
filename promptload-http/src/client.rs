//! Inference endpoint client

use crate::errors::HttpError;
use async_trait::async_trait;
use promptload_config::EndpointConfig;
use promptload_core::PromptClient;
use promptload_resilience::{RetryExecutor, RetryPolicy};
use rand::Rng;
use serde_json::{json, Value as JsonValue};
use std::time::Duration;
use tracing::{debug, warn};

/// Number of prompt characters echoed into a simulated payload
const SIMULATED_PREFIX_CHARS: usize = 30;

/// Client delivering one prompt at a time to the inference endpoint
///
/// `send` never fails: transient endpoint failures are retried with
/// exponential backoff, and exhausted retries degrade to a synthesized
/// payload carrying `simulated: true`.
pub struct InferenceClient {
    client: reqwest::Client,
    config: EndpointConfig,
    executor: RetryExecutor,
}

impl InferenceClient {
    /// Create a client from endpoint configuration
    pub fn new(config: EndpointConfig) -> Result<Self, HttpError> {
        let policy = RetryPolicy::endpoint(config.max_retries);
        Self::with_policy(config, policy)
    }

    /// Create a client with an explicit retry policy
    pub fn with_policy(config: EndpointConfig, policy: RetryPolicy) -> Result<Self, HttpError> {
        debug!(
            "Creating inference client for {} with {}s timeout",
            config.vllm_endpoint,
            config.timeout.as_secs()
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

    /// One request attempt against the endpoint
    async fn attempt(&self, prompt: &str) -> Result<JsonValue, HttpError> {
        let mut request = self
            .client
            .post(&self.config.vllm_endpoint)
            .json(&json!({ "prompt": prompt }));

        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }

    /// Synthesize a stand-in payload after retry exhaustion
    async fn simulate_response(&self, prompt: &str) -> JsonValue {
        warn!("Max retries reached. Simulating response.");

        // Artificial delay standing in for the absent endpoint latency.
        let delay_secs = {
            let mut rng = rand::thread_rng();
            rng.gen_range(0.5..=2.0)
        };
        tokio::time::sleep(Duration::from_secs_f64(delay_secs)).await;

        let prefix: String = prompt.chars().take(SIMULATED_PREFIX_CHARS).collect();
        json!({
            "generated_text": format!("Simulated response for: {}...", prefix),
            "simulated": true
        })
    }
}

#[async_trait]
impl PromptClient for InferenceClient {
    async fn send(&self, prompt: &str) -> JsonValue {
        self.executor
            .execute_with_fallback(|| self.attempt(prompt), || self.simulate_response(prompt))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
            backoff_strategy: promptload_resilience::BackoffStrategy::Fixed,
            jitter: false,
        }
    }

    fn config_for(endpoint: String) -> EndpointConfig {
        EndpointConfig {
            vllm_endpoint: endpoint,
            vllm_metrics_endpoint: "http://127.0.0.1:1/metrics".into(),
            api_key: None,
            timeout: Duration::from_secs(5),
            max_retries: 3,
        }
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/generate", addr)
    }

    #[tokio::test]
    async fn test_send_returns_endpoint_payload() {
        let router = Router::new().route(
            "/generate",
            post(|Json(body): Json<JsonValue>| async move {
                let prompt = body["prompt"].as_str().unwrap_or_default().to_string();
                Json(json!({ "generated_text": format!("echo: {}", prompt) }))
            }),
        );
        let endpoint = serve(router).await;

        let client =
            InferenceClient::with_policy(config_for(endpoint), fast_policy(3)).unwrap();
        let output = client.send("hello").await;

        assert_eq!(output["generated_text"], "echo: hello");
        assert!(output.get("simulated").is_none());
    }

    #[tokio::test]
    async fn test_send_retries_transient_failures() {
        let hits = Arc::new(AtomicU32::new(0));
        let hits_clone = hits.clone();

        let router = Router::new().route(
            "/generate",
            post(move || {
                let hits = hits_clone.clone();
                async move {
                    if hits.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
                    } else {
                        Ok(Json(json!({ "generated_text": "recovered" })))
                    }
                }
            }),
        );
        let endpoint = serve(router).await;

        let client =
            InferenceClient::with_policy(config_for(endpoint), fast_policy(3)).unwrap();
        let output = client.send("hello").await;

        assert_eq!(output["generated_text"], "recovered");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_exhausted_retries_degrade_to_simulated_payload() {
        // Nothing listens on port 1; every attempt fails at the transport.
        let config = config_for("http://127.0.0.1:1/generate".into());
        let client = InferenceClient::with_policy(config, fast_policy(2)).unwrap();

        let prompt = "a prompt that is longer than thirty characters in total";
        let output = client.send(prompt).await;

        assert_eq!(output["simulated"], true);
        let text = output["generated_text"].as_str().unwrap();
        assert!(text.starts_with("Simulated response for: "));
        // Only a truncated prefix of the prompt is echoed back.
        assert!(text.contains("a prompt that is longer than t"));
        assert!(!text.contains("in total"));
    }
}
