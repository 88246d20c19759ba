//! Pipedef CLI
//!
//! Command-line interface for provisioning and inspecting pipeline
//! definitions.

mod commands;
mod loader;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use pipedef_provision::Config;
use pipedef_provision::config::DEFAULT_ENDPOINT;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pipedef")]
#[command(about = "Pipeline definition provisioning CLI", long_about = None)]
struct Cli {
    /// Data pipeline service endpoint
    #[arg(long, env = "PIPEDEF_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pipedef=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    config.endpoint = cli.endpoint;
    config.validate()?;

    handle_command(cli.command, config).await
}
