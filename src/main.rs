//! jobstash - file-backed job result store
//!
//! Main entry point for the jobstash CLI and server.

mod cli;
mod server;

use clap::Parser;
use tracing::warn;

use jobstash_config::{ConfigLoader, ConfigValidator};

use crate::cli::Cli;
use crate::server::{init_tracing, run_server, run_sweep};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_default();

    let mut config = ConfigLoader::load_or_default(&cli.config)?;
    command.apply_overrides(&mut config);

    init_tracing(&config.logging)?;

    for warning in ConfigValidator::validate(&config).into_result()? {
        warn!("Config {}: {}", warning.path, warning.message);
    }

    match command {
        cli::Commands::Run { .. } => run_server(config).await,
        cli::Commands::Sweep { .. } => {
            let report = run_sweep(&config).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}
