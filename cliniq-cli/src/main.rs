//! ClinIQ CLI
//!
//! Command-line interface for the ClinIQ document-processing service.

mod commands;
mod config;
mod id_resolver;
mod types;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cliniq")]
#[command(about = "ClinIQ clinical document to FHIR CLI", long_about = None)]
struct Cli {
    /// ClinIQ service URL
    #[arg(long, env = "CLINIQ_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Delay between job status requests, in milliseconds
    #[arg(long, env = "CLINIQ_POLL_INTERVAL_MS", default_value_t = 2000)]
    poll_interval_ms: u64,

    /// Number of job status requests before giving up
    #[arg(long, env = "CLINIQ_MAX_ATTEMPTS", default_value_t = 60)]
    max_attempts: u32,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never mix with command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cliniq=warn,cliniq_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        api_url: cli.api_url,
        poll_interval: Duration::from_millis(cli.poll_interval_ms),
        max_attempts: cli.max_attempts,
    };
    config.validate()?;

    tracing::debug!("Using ClinIQ service at {}", config.api_url);

    handle_command(cli.command, &config).await
}
