//! Live-update event fan-out
//!
//! Broadcasting is best-effort from the producer's perspective: events are
//! pushed to zero or more connected dashboard sessions and a missing
//! audience is not an error.

use crate::resource::ResourceSample;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// Maximum number of events buffered per subscription topic
const EVENT_BUFFER_SIZE: usize = 1000;

/// Pushed once per completed dataset run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResultEvent {
    /// Model identifier from configuration
    pub model_name: String,

    /// Dataset the run covered
    pub dataset_name: String,

    /// Mean per-request latency, seconds
    pub avg_latency: f64,

    /// Requests per second over the whole run
    pub throughput: f64,

    /// Fraction of simulated outcomes in the result set
    pub error_rate: f64,

    /// Completion time
    pub timestamp: DateTime<Utc>,
}

/// Event broadcaster feeding connected dashboard sessions
#[derive(Clone)]
pub struct EventBroadcaster {
    result_tx: broadcast::Sender<BenchmarkResultEvent>,
    resource_tx: broadcast::Sender<ResourceSample>,
}

impl EventBroadcaster {
    /// Create a new event broadcaster
    pub fn new() -> Self {
        let (result_tx, _) = broadcast::channel(EVENT_BUFFER_SIZE);
        let (resource_tx, _) = broadcast::channel(EVENT_BUFFER_SIZE);

        Self {
            result_tx,
            resource_tx,
        }
    }

    /// Broadcast a completed benchmark result
    pub fn broadcast_result(&self, event: BenchmarkResultEvent) {
        match self.result_tx.send(event) {
            Ok(subscriber_count) => {
                debug!(
                    "Broadcasted benchmark result to {} subscribers",
                    subscriber_count
                );
            }
            Err(_) => {
                debug!("No subscribers for benchmark result events");
            }
        }
    }

    /// Broadcast a host resource sample
    pub fn broadcast_resource(&self, sample: ResourceSample) {
        match self.resource_tx.send(sample) {
            Ok(subscriber_count) => {
                debug!(
                    "Broadcasted resource sample to {} subscribers",
                    subscriber_count
                );
            }
            Err(_) => {
                debug!("No subscribers for resource sample events");
            }
        }
    }

    /// Subscribe to benchmark result events
    pub fn subscribe_results(&self) -> broadcast::Receiver<BenchmarkResultEvent> {
        self.result_tx.subscribe()
    }

    /// Subscribe to resource sample events
    pub fn subscribe_resources(&self) -> broadcast::Receiver<ResourceSample> {
        self.resource_tx.subscribe()
    }

    /// Number of live benchmark result subscribers
    pub fn result_subscriber_count(&self) -> usize {
        self.result_tx.receiver_count()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
