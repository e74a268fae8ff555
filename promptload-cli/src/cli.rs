//! Command-line argument definitions

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "promptload",
    version,
    about = "Concurrent load benchmark for vLLM inference endpoints"
)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Dataset document to replay, overriding the configured path
    #[arg(long, value_name = "FILE")]
    pub dataset: Option<String>,

    /// Metrics database URL, overriding the configured one
    #[arg(long, value_name = "URL")]
    pub database_url: Option<String>,

    /// Dashboard bind address as host:port
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Run the benchmark without the dashboard and exit when it completes
    #[arg(long)]
    pub headless: bool,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    pub print_config: bool,
}
