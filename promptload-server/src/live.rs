//! Server-sent-events stream for connected dashboard sessions

use crate::app::AppState;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::{self, Stream, StreamExt};
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tracing::debug;

/// Multiplex both broadcast topics onto one SSE connection, tagged by
/// event name so the page can route them to the right chart.
pub(crate) async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    debug!("Dashboard session subscribed to live events");

    let results = BroadcastStream::new(state.broadcaster.subscribe_results())
        // A lagged subscriber just misses events; the stream keeps going.
        .filter_map(|received| async move { received.ok() })
        .map(|event| Event::default().event("benchmark_result").json_data(&event));

    let resources = BroadcastStream::new(state.broadcaster.subscribe_resources())
        .filter_map(|received| async move { received.ok() })
        .map(|sample| Event::default().event("resource_usage").json_data(&sample));

    Sse::new(stream::select(results, resources))
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
