//! SQLite metrics database
//!
//! Holds per-metric rows for each dataset run plus the benchmark-result and
//! resource-usage history the dashboard reads. Schema is created
//! idempotently on connect.

use crate::error::StorageError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use promptload_config::DatabaseConfig;
use promptload_core::{
    BenchmarkMetrics, BenchmarkResultEvent, EndpointMetrics, MetricsSink, ResourceSample,
    ResourceSink, ResultLog, SinkError,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

/// SQLite-backed metrics storage
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and ensure the schema exists
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StorageError> {
        // File-backed URLs need their parent directory to exist before
        // SQLite can create the file.
        if let Some(path) = config.database_url.strip_prefix("sqlite://") {
            if path != ":memory:" {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
            }
        }

        let options =
            SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        let database = Self { pool };
        database.create_tables().await?;

        info!("Connected to metrics database at {}", config.database_url);
        Ok(database)
    }

    async fn create_tables(&self) -> Result<(), StorageError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS endpoint_metrics (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                dataset_name TEXT NOT NULL,
                metric_name TEXT NOT NULL,
                metric_value REAL NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS benchmark_metrics (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                dataset_name TEXT NOT NULL,
                metric_name TEXT NOT NULL,
                metric_value REAL NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS benchmark_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                model_name TEXT NOT NULL,
                dataset_name TEXT NOT NULL,
                avg_latency REAL NOT NULL,
                throughput REAL NOT NULL,
                error_rate REAL NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS resource_usage (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                cpu_percent REAL NOT NULL,
                memory_percent REAL NOT NULL,
                gpu_percent REAL NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert one benchmark-result history row
    pub async fn insert_benchmark_result(
        &self,
        event: &BenchmarkResultEvent,
    ) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO benchmark_results
                (timestamp, model_name, dataset_name, avg_latency, throughput, error_rate)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(event.timestamp)
        .bind(&event.model_name)
        .bind(&event.dataset_name)
        .bind(event.avg_latency)
        .bind(event.throughput)
        .bind(event.error_rate)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Most recent benchmark-result rows, oldest first
    pub async fn recent_benchmark_results(
        &self,
        limit: u32,
    ) -> Result<Vec<BenchmarkResultEvent>, StorageError> {
        let rows = sqlx::query(
            "SELECT timestamp, model_name, dataset_name, avg_latency, throughput, error_rate
             FROM benchmark_results ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut results: Vec<BenchmarkResultEvent> = rows
            .into_iter()
            .map(|row| BenchmarkResultEvent {
                timestamp: row.get::<DateTime<Utc>, _>("timestamp"),
                model_name: row.get("model_name"),
                dataset_name: row.get("dataset_name"),
                avg_latency: row.get("avg_latency"),
                throughput: row.get("throughput"),
                error_rate: row.get("error_rate"),
            })
            .collect();
        results.reverse();
        Ok(results)
    }

    /// Most recent resource-usage rows, oldest first
    pub async fn recent_resource_samples(
        &self,
        limit: u32,
    ) -> Result<Vec<ResourceSample>, StorageError> {
        let rows = sqlx::query(
            "SELECT timestamp, cpu_percent, memory_percent, gpu_percent
             FROM resource_usage ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut samples: Vec<ResourceSample> = rows
            .into_iter()
            .map(|row| ResourceSample {
                timestamp: row.get::<DateTime<Utc>, _>("timestamp"),
                cpu_percent: row.get("cpu_percent"),
                memory_percent: row.get("memory_percent"),
                gpu_percent: row.get("gpu_percent"),
            })
            .collect();
        samples.reverse();
        Ok(samples)
    }

    /// Per-metric rows for one dataset from either metrics table
    pub async fn metric_rows(
        &self,
        table: MetricsTable,
        dataset_name: &str,
    ) -> Result<Vec<(String, f64)>, StorageError> {
        let query = match table {
            MetricsTable::Endpoint => {
                "SELECT metric_name, metric_value FROM endpoint_metrics
                 WHERE dataset_name = ? ORDER BY id"
            }
            MetricsTable::Benchmark => {
                "SELECT metric_name, metric_value FROM benchmark_metrics
                 WHERE dataset_name = ? ORDER BY id"
            }
        };

        let rows = sqlx::query(query)
            .bind(dataset_name)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.get("metric_name"), row.get("metric_value")))
            .collect())
    }

    async fn store_metric_rows(
        &self,
        dataset_name: &str,
        endpoint_metrics: &EndpointMetrics,
        benchmark_metrics: &BenchmarkMetrics,
    ) -> Result<(), StorageError> {
        // Both metric sets commit together or not at all.
        let mut tx = self.pool.begin().await?;

        for (name, value) in endpoint_metrics.rows() {
            sqlx::query(
                "INSERT INTO endpoint_metrics (dataset_name, metric_name, metric_value)
                 VALUES (?, ?, ?)",
            )
            .bind(dataset_name)
            .bind(&name)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }

        for (name, value) in benchmark_metrics.rows() {
            sqlx::query(
                "INSERT INTO benchmark_metrics (dataset_name, metric_name, metric_value)
                 VALUES (?, ?, ?)",
            )
            .bind(dataset_name)
            .bind(name)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!("Stored metric rows for dataset '{}'", dataset_name);
        Ok(())
    }
}

/// Which per-metric table to read
#[derive(Debug, Clone, Copy)]
pub enum MetricsTable {
    Endpoint,
    Benchmark,
}

#[async_trait]
impl MetricsSink for Database {
    async fn store_metrics(
        &self,
        dataset_name: &str,
        endpoint_metrics: &EndpointMetrics,
        benchmark_metrics: &BenchmarkMetrics,
    ) -> Result<(), SinkError> {
        self.store_metric_rows(dataset_name, endpoint_metrics, benchmark_metrics)
            .await
            .map_err(Into::into)
    }
}

#[async_trait]
impl ResultLog for Database {
    async fn record_result(&self, event: &BenchmarkResultEvent) -> Result<(), SinkError> {
        self.insert_benchmark_result(event)
            .await
            .map_err(Into::into)
    }
}

#[async_trait]
impl ResourceSink for Database {
    async fn store_resource_sample(&self, sample: &ResourceSample) -> Result<(), SinkError> {
        sqlx::query(
            "INSERT INTO resource_usage (timestamp, cpu_percent, memory_percent, gpu_percent)
             VALUES (?, ?, ?, ?)",
        )
        .bind(sample.timestamp)
        .bind(sample.cpu_percent)
        .bind(sample.memory_percent)
        .bind(sample.gpu_percent)
        .execute(&self.pool)
        .await
        .map_err(|e| SinkError::Database(e.to_string()))?;

        Ok(())
    }
}
