//! SmartSupport CLI
//!
//! Command-line interface for submitting tickets to the SmartSupport
//! classification API and waiting for their results.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use smartsupport_client::ClientConfig;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "smartsupport")]
#[command(about = "SmartSupport ticket classification CLI", long_about = None)]
struct Cli {
    /// API URL [env: SMARTSUPPORT_API_URL] [default: http://localhost:8000]
    #[arg(long)]
    api_url: Option<String>,

    /// API key sent with every request [env: SMARTSUPPORT_API_KEY]
    #[arg(long)]
    api_key: Option<String>,

    /// Per-request timeout in seconds [env: SMARTSUPPORT_TIMEOUT_SECS] [default: 30]
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smartsupport_cli=info,smartsupport_poller=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Environment first, flags on top
    let config = Config::new(
        ClientConfig::from_env(),
        cli.api_url,
        cli.api_key,
        cli.timeout_secs,
    );
    debug!(
        "Using API at {} (timeout: {:?})",
        config.client.base_url, config.client.timeout
    );

    handle_command(cli.command, &config).await
}
