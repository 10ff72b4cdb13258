//! Server initialization and startup logic for jobstash.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use jobstash_api::{AppState, InterfaceConfig, InterfaceServer, spawn_periodic_sweep};
use jobstash_config::{Config, ConfigError, LoggingConfig};
use jobstash_store::{RetentionSweeper, SweepReport, SystemClock};

static GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize tracing with console output and, when `logging.dir` is set,
/// a daily-rotated log file.
///
/// `RUST_LOG` takes precedence over `logging.level`.
pub(crate) fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level).map_err(|e| ConfigError::InvalidValue {
            field: "logging.level".to_string(),
            message: e.to_string(),
        })?,
    };

    let file_layer = match &logging.dir {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir)?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("jobstash")
                .filename_suffix("log")
                .max_log_files(logging.max_files)
                .build(log_dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            // Dropping the guard stops the writer thread
            let _ = GUARD.set(guard);
            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        // Console layer on stderr so `sweep` output stays clean on stdout
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(())
}

/// Run the server in foreground until Ctrl-C.
pub(crate) async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting jobstash v{}", env!("CARGO_PKG_VERSION"));

    let state = Arc::new(AppState::from_config(&config, Arc::new(SystemClock))?);
    info!(
        "Record store at {} (extension {}, max age {} days, sweep on submit: {})",
        state.store.dir().display(),
        state.store.extension(),
        state.retention.max_age_days,
        state.retention.sweep_on_submit
    );

    let periodic = (config.retention.interval_seconds > 0).then(|| {
        spawn_periodic_sweep(
            state.sweeper.clone(),
            config.retention.max_age_days,
            Duration::from_secs(config.retention.interval_seconds),
        )
    });

    let server = InterfaceServer::new(
        InterfaceConfig::new(config.server.host.clone(), config.server.port),
        state,
    );
    let result = server.run(shutdown_signal()).await;

    if let Some(handle) = periodic {
        handle.abort();
    }

    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Sweep the configured storage directory once.
pub(crate) async fn run_sweep(config: &Config) -> Result<SweepReport, Box<dyn std::error::Error>> {
    let sweeper = RetentionSweeper::new(&config.storage.path, Arc::new(SystemClock));
    let max_age_days = config.retention.max_age_days;

    let report = tokio::task::spawn_blocking(move || sweeper.sweep(max_age_days)).await?;
    Ok(report)
}
