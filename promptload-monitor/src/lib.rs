//! Host resource monitoring
//!
//! An independent periodic loop sampling CPU and memory utilization,
//! uncoupled from benchmark execution: the two share only the sinks and
//! the notifier. The loop observes its stop signal between samples, so an
//! in-progress sample always completes.

use chrono::Utc;
use promptload_core::{EventBroadcaster, ResourceSample, ResourceSink};
use std::sync::Arc;
use std::time::Duration;
use sysinfo::System;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Periodic host resource sampler
pub struct ResourceMonitor {
    interval: Duration,
    sink: Arc<dyn ResourceSink>,
    broadcaster: EventBroadcaster,
}

/// Handle to a running monitor loop
pub struct MonitorHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Signal the loop to stop and wait for it to finish
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.task.await;
    }
}

impl ResourceMonitor {
    /// Create a monitor sampling at the given interval
    pub fn new(
        interval: Duration,
        sink: Arc<dyn ResourceSink>,
        broadcaster: EventBroadcaster,
    ) -> Self {
        Self {
            interval,
            sink,
            broadcaster,
        }
    }

    /// Spawn the sampling loop as an independent background task
    pub fn spawn(self) -> MonitorHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(stop_rx));

        MonitorHandle { stop_tx, task }
    }

    async fn run(self, mut stop_rx: watch::Receiver<bool>) {
        info!(
            "Resource monitor started with {}s interval",
            self.interval.as_secs()
        );

        let mut system = System::new();

        loop {
            let sample = Self::sample(&mut system);
            debug!(
                "Resource sample: cpu {:.1}%, memory {:.1}%",
                sample.cpu_percent, sample.memory_percent
            );

            // A lost sample is not a correctness issue; the loop keeps going.
            if let Err(error) = self.sink.store_resource_sample(&sample).await {
                warn!("Failed to store resource sample: {}", error);
            }
            self.broadcaster.broadcast_resource(sample);

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = stop_rx.changed() => {
                    if *stop_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Resource monitor stopped");
    }

    fn sample(system: &mut System) -> ResourceSample {
        system.refresh_cpu_usage();
        system.refresh_memory();

        let memory_percent = if system.total_memory() > 0 {
            system.used_memory() as f64 / system.total_memory() as f64 * 100.0
        } else {
            0.0
        };

        ResourceSample {
            cpu_percent: system.global_cpu_usage() as f64,
            memory_percent,
            // GPU telemetry is not wired in; the column is kept so the
            // dashboard schema does not change when it is.
            gpu_percent: 0.0,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use promptload_core::SinkError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSink {
        samples: AtomicUsize,
    }

    #[async_trait]
    impl ResourceSink for CountingSink {
        async fn store_resource_sample(&self, sample: &ResourceSample) -> Result<(), SinkError> {
            assert!(sample.cpu_percent >= 0.0);
            assert!(sample.memory_percent >= 0.0);
            assert_eq!(sample.gpu_percent, 0.0);
            self.samples.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl ResourceSink for FailingSink {
        async fn store_resource_sample(&self, _sample: &ResourceSample) -> Result<(), SinkError> {
            Err(SinkError::Database("down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_samples_flow_to_sink_and_broadcaster() {
        let sink = Arc::new(CountingSink::default());
        let broadcaster = EventBroadcaster::new();
        let mut events = broadcaster.subscribe_resources();

        let monitor =
            ResourceMonitor::new(Duration::from_millis(20), sink.clone(), broadcaster);
        let handle = monitor.spawn();

        let event = events.recv().await.unwrap();
        assert_eq!(event.gpu_percent, 0.0);

        tokio::time::sleep(Duration::from_millis(70)).await;
        handle.stop().await;

        // First sample is immediate, then one per interval.
        assert!(sink.samples.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_stop_is_observed_between_samples() {
        let sink = Arc::new(CountingSink::default());
        let monitor = ResourceMonitor::new(
            Duration::from_secs(3600),
            sink.clone(),
            EventBroadcaster::new(),
        );
        let handle = monitor.spawn();

        tokio::time::sleep(Duration::from_millis(30)).await;
        let before = sink.samples.load(Ordering::SeqCst);

        // Stop returns promptly even though the interval is an hour.
        tokio::time::timeout(Duration::from_secs(1), handle.stop())
            .await
            .expect("monitor did not observe stop signal");

        assert_eq!(sink.samples.load(Ordering::SeqCst), before);
    }

    #[tokio::test]
    async fn test_sink_failure_does_not_kill_the_loop() {
        let broadcaster = EventBroadcaster::new();
        let mut events = broadcaster.subscribe_resources();

        let monitor =
            ResourceMonitor::new(Duration::from_millis(10), Arc::new(FailingSink), broadcaster);
        let handle = monitor.spawn();

        // Events keep arriving even though every store fails.
        events.recv().await.unwrap();
        events.recv().await.unwrap();

        handle.stop().await;
    }
}
