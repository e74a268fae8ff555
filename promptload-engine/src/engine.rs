//! Benchmark orchestration

use crate::error::EngineError;
use chrono::Utc;
use promptload_core::{
    BenchmarkMetrics, BenchmarkResultEvent, Case, Dataset, EventBroadcaster, MetricsSink,
    MetricsSource, PromptClient, RequestOutcome, ResultLog, ResultSink,
};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info};

/// Orchestrates benchmark runs across datasets
///
/// Holds only boundary trait objects: the concrete client, collector and
/// sinks are wired in at startup.
pub struct Benchmarker {
    model_name: String,
    max_concurrent: usize,
    client: Arc<dyn PromptClient>,
    metrics_source: Arc<dyn MetricsSource>,
    result_sink: Arc<dyn ResultSink>,
    metrics_sink: Arc<dyn MetricsSink>,
    result_log: Arc<dyn ResultLog>,
    broadcaster: EventBroadcaster,
}

impl Benchmarker {
    /// Create a new benchmarker
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        model_name: impl Into<String>,
        max_concurrent: usize,
        client: Arc<dyn PromptClient>,
        metrics_source: Arc<dyn MetricsSource>,
        result_sink: Arc<dyn ResultSink>,
        metrics_sink: Arc<dyn MetricsSink>,
        result_log: Arc<dyn ResultLog>,
        broadcaster: EventBroadcaster,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            max_concurrent: max_concurrent.max(1),
            client,
            metrics_source,
            result_sink,
            metrics_sink,
            result_log,
            broadcaster,
        }
    }

    /// Run every dataset to completion, strictly in sequence
    ///
    /// Dataset N+1 never starts before dataset N's full pipeline (dispatch,
    /// collect, aggregate, persist, notify) has finished.
    pub async fn run_all(&self, datasets: &[Dataset]) -> Result<(), EngineError> {
        for dataset in datasets {
            self.run_dataset(&dataset.name, &dataset.data).await?;
        }
        Ok(())
    }

    /// Run one dataset's full pipeline
    pub async fn run_dataset(
        &self,
        dataset_name: &str,
        cases: &[Case],
    ) -> Result<BenchmarkMetrics, EngineError> {
        info!("Benchmarking dataset: {}", dataset_name);

        let start = Instant::now();
        let outcomes = self.dispatch(cases).await?;
        let total_time = start.elapsed();

        self.result_sink
            .store_results(dataset_name, &outcomes)
            .await?;

        // One poll per dataset run, not one per request.
        let endpoint_metrics = self.metrics_source.collect().await;
        let benchmark_metrics = BenchmarkMetrics::from_outcomes(&outcomes, total_time);

        self.metrics_sink
            .store_metrics(dataset_name, &endpoint_metrics, &benchmark_metrics)
            .await?;

        let event = BenchmarkResultEvent {
            model_name: self.model_name.clone(),
            dataset_name: dataset_name.to_string(),
            avg_latency: benchmark_metrics.avg_latency,
            throughput: benchmark_metrics.throughput,
            error_rate: BenchmarkMetrics::error_rate(&outcomes),
            timestamp: Utc::now(),
        };
        self.result_log.record_result(&event).await?;
        self.broadcaster.broadcast_result(event);

        info!("Benchmark for dataset '{}' completed.", dataset_name);
        info!("Total time: {:.2} seconds", benchmark_metrics.total_time);
        info!(
            "Average latency: {:.2} seconds",
            benchmark_metrics.avg_latency
        );
        info!(
            "Throughput: {:.2} requests/second",
            benchmark_metrics.throughput
        );
        if outcomes.iter().any(|o| o.is_simulated()) {
            info!("Note: Some or all responses were simulated due to endpoint errors.");
        }

        Ok(benchmark_metrics)
    }

    /// Dispatch every case through a bounded in-flight window and collect
    /// exactly one outcome per case
    ///
    /// One task is spawned per case; the shared semaphore caps how many are
    /// past dispatch at once, and a freed permit immediately admits the
    /// next pending case. Completion order is arbitrary and only affects
    /// the order outcomes are appended, never the aggregates.
    async fn dispatch(&self, cases: &[Case]) -> Result<Vec<RequestOutcome>, EngineError> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut workers = JoinSet::new();

        for case in cases {
            let semaphore = semaphore.clone();
            let client = self.client.clone();
            let prompt = case.input.clone();

            workers.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("request semaphore never closed");

                let dispatched = Instant::now();
                let output = client.send(&prompt).await;
                let latency = dispatched.elapsed().as_secs_f64();

                debug!("Request completed in {:.3}s", latency);
                RequestOutcome {
                    input: prompt,
                    output,
                    latency,
                }
            });
        }

        let mut outcomes = Vec::with_capacity(cases.len());
        while let Some(joined) = workers.join_next().await {
            outcomes.push(joined?);
        }

        Ok(outcomes)
    }
}
