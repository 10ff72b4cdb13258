//! CLI definitions for jobstash.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jobstash_config::Config;

/// jobstash CLI.
#[derive(Parser)]
#[command(name = "jobstash")]
#[command(about = "File-backed job result store with age-based retention")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Run the HTTP server in foreground (default)
    Run {
        /// Server host
        #[arg(long)]
        host: Option<String>,

        /// Server port
        #[arg(long)]
        port: Option<u16>,

        /// Directory holding the stored records
        #[arg(long)]
        storage_dir: Option<PathBuf>,
    },

    /// Run one retention sweep over the storage directory and exit
    Sweep {
        /// Override the configured maximum age in days
        #[arg(long)]
        max_age_days: Option<f64>,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Run {
            host: None,
            port: None,
            storage_dir: None,
        }
    }
}

impl Commands {
    /// Apply command-line overrides on top of the loaded configuration.
    pub(crate) fn apply_overrides(&self, config: &mut Config) {
        match self {
            Commands::Run {
                host,
                port,
                storage_dir,
            } => {
                if let Some(host) = host {
                    config.server.host = host.clone();
                }
                if let Some(port) = port {
                    config.server.port = *port;
                }
                if let Some(dir) = storage_dir {
                    config.storage.path = dir.clone();
                }
            }
            Commands::Sweep { max_age_days } => {
                if let Some(days) = max_age_days {
                    config.retention.max_age_days = *days;
                }
            }
        }
    }
}
