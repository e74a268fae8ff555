//! promptload binary entry point

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use promptload_config::{ConfigLoader, LogFormat, LoggingConfig, PromptloadConfig};
use promptload_core::{load_datasets, EventBroadcaster};
use promptload_engine::Benchmarker;
use promptload_http::{InferenceClient, MetricsCollector};
use promptload_monitor::ResourceMonitor;
use promptload_server::AppState;
use promptload_storage::{Database, FileResultStore};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod cli;
use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loader = ConfigLoader::new();
    let mut config = loader
        .load(cli.config.as_ref())
        .context("Failed to load configuration")?;
    apply_overrides(&mut config, &cli)?;

    init_tracing(&config.logging);

    if cli.print_config {
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    config.validate_all().context("Invalid configuration")?;

    let datasets = load_datasets(&config.benchmark.dataset_path).with_context(|| {
        format!(
            "Failed to load datasets from {}",
            config.benchmark.dataset_path
        )
    })?;
    info!(
        "Loaded {} dataset(s) from {}",
        datasets.len(),
        config.benchmark.dataset_path
    );

    let database = Database::connect(&config.database)
        .await
        .context("Failed to connect to metrics database")?;
    let broadcaster = EventBroadcaster::new();

    let client = Arc::new(
        InferenceClient::new(config.endpoint.clone())
            .context("Failed to build inference client")?,
    );
    let collector = Arc::new(
        MetricsCollector::new(config.endpoint.clone())
            .context("Failed to build metrics collector")?,
    );
    let file_store = Arc::new(FileResultStore::new(&config.benchmark.output_file_path));

    let benchmarker = Benchmarker::new(
        config.benchmark.model_name.clone(),
        config.benchmark.max_concurrent_requests,
        client,
        collector,
        file_store,
        Arc::new(database.clone()),
        Arc::new(database.clone()),
        broadcaster.clone(),
    );

    let monitor_handle = if config.monitoring.enabled {
        let monitor = ResourceMonitor::new(
            config.monitoring.monitoring_interval,
            Arc::new(database.clone()),
            broadcaster.clone(),
        );
        Some(monitor.spawn())
    } else {
        None
    };

    let benchmark = tokio::spawn(async move { benchmarker.run_all(&datasets).await });

    if cli.headless {
        let run = benchmark.await.context("Benchmark task panicked")?;
        if let Some(handle) = monitor_handle {
            handle.stop().await;
        }
        run.context("Benchmark run failed")?;
        info!("Benchmark complete");
    } else {
        // The dashboard outlives the benchmark so finished runs stay
        // inspectable; surface a failed run in the logs without tearing
        // the server down.
        tokio::spawn(async move {
            match benchmark.await {
                Ok(Ok(())) => info!("Benchmark complete"),
                Ok(Err(e)) => error!("Benchmark run failed: {}", e),
                Err(e) => error!("Benchmark task panicked: {}", e),
            }
        });

        let state = AppState {
            database,
            broadcaster,
        };
        promptload_server::serve(&config.server, state)
            .await
            .context("Dashboard server failed")?;
    }

    Ok(())
}

fn apply_overrides(config: &mut PromptloadConfig, cli: &Cli) -> Result<()> {
    if let Some(dataset) = &cli.dataset {
        config.benchmark.dataset_path = dataset.clone();
    }
    if let Some(database_url) = &cli.database_url {
        config.database.database_url = database_url.clone();
    }
    if let Some(bind) = &cli.bind {
        let (address, port) = bind
            .rsplit_once(':')
            .ok_or_else(|| anyhow!("--bind expects host:port, got '{}'", bind))?;
        config.server.bind_address = address.to_string();
        config.server.port = port
            .parse()
            .with_context(|| format!("Invalid port in --bind '{}'", bind))?;
    }
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_filter()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match logging.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
