//! Router, state, and JSON history endpoints

use crate::error::ApiError;
use crate::live::event_stream;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use promptload_config::ServerConfig;
use promptload_core::{BenchmarkResultEvent, EventBroadcaster, ResourceSample};
use promptload_storage::Database;
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

const DASHBOARD_HTML: &str = include_str!("dashboard.html");

/// History endpoints return this many rows unless the caller asks otherwise
const DEFAULT_HISTORY_LIMIT: u32 = 50;

/// Shared state behind every dashboard route
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub broadcaster: EventBroadcaster,
}

/// Build the dashboard router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/api/results", get(recent_results))
        .route("/api/resources", get(recent_resources))
        .route("/events", get(event_stream))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve the dashboard until the process exits
pub async fn serve(config: &ServerConfig, state: AppState) -> std::io::Result<()> {
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Dashboard available at http://{}", addr);

    axum::serve(listener, router(state)).await
}

async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<u32>,
}

async fn recent_results(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<BenchmarkResultEvent>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let results = state.database.recent_benchmark_results(limit).await?;
    Ok(Json(results))
}

async fn recent_resources(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ResourceSample>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let samples = state.database.recent_resource_samples(limit).await?;
    Ok(Json(samples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use promptload_config::DatabaseConfig;
    use promptload_core::ResourceSink;
    use tower::ServiceExt;

    async fn test_state() -> AppState {
        let config = DatabaseConfig {
            database_url: "sqlite://:memory:".to_string(),
            max_connections: 1,
        };
        AppState {
            database: Database::connect(&config).await.unwrap(),
            broadcaster: EventBroadcaster::new(),
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_dashboard_page_is_served() {
        let app = router(test_state().await);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("Promptload"));
        assert!(page.contains("EventSource"));
    }

    #[tokio::test]
    async fn test_results_endpoint_returns_history() {
        let state = test_state().await;
        state
            .database
            .insert_benchmark_result(&BenchmarkResultEvent {
                model_name: "test-model".into(),
                dataset_name: "greetings".into(),
                avg_latency: 0.25,
                throughput: 8.0,
                error_rate: 0.0,
                timestamp: Utc::now(),
            })
            .await
            .unwrap();

        let app = router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/results")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let rows = body_json(response).await;
        assert_eq!(rows.as_array().unwrap().len(), 1);
        assert_eq!(rows[0]["dataset_name"], "greetings");
        assert_eq!(rows[0]["throughput"], 8.0);
    }

    #[tokio::test]
    async fn test_resources_endpoint_honors_limit() {
        let state = test_state().await;
        for cpu in [10.0, 20.0, 30.0] {
            state
                .database
                .store_resource_sample(&ResourceSample {
                    cpu_percent: cpu,
                    memory_percent: 50.0,
                    gpu_percent: 0.0,
                    timestamp: Utc::now(),
                })
                .await
                .unwrap();
        }

        let app = router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/resources?limit=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let rows = body_json(response).await;
        let rows = rows.as_array().unwrap();
        // Newest two, oldest first.
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["cpu_percent"], 20.0);
        assert_eq!(rows[1]["cpu_percent"], 30.0);
    }

    #[tokio::test]
    async fn test_events_endpoint_is_an_sse_stream() {
        let app = router(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/events")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "text/event-stream"
        );
    }
}
