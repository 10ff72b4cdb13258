//! Application state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use jobstash_config::{Config, RetentionConfig};
use jobstash_store::{Clock, FileRecordStore, RetentionSweeper, StoreError};

/// Retention behaviour the handlers need at request time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetentionSettings {
    pub max_age_days: f64,
    pub sweep_on_submit: bool,
}

impl Default for RetentionSettings {
    fn default() -> Self {
        Self::from(&RetentionConfig::default())
    }
}

impl From<&RetentionConfig> for RetentionSettings {
    fn from(config: &RetentionConfig) -> Self {
        Self {
            max_age_days: config.max_age_days,
            sweep_on_submit: config.sweep_on_submit,
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub store: Arc<FileRecordStore>,
    pub sweeper: Arc<RetentionSweeper>,
    pub retention: RetentionSettings,
    start_time: Instant,
    request_count: AtomicU64,
}

impl AppState {
    pub fn new(
        store: Arc<FileRecordStore>,
        sweeper: Arc<RetentionSweeper>,
        retention: RetentionSettings,
    ) -> Self {
        Self {
            store,
            sweeper,
            retention,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    /// Open the configured store and build a sweeper over the same directory.
    ///
    /// Both share `clock`.
    pub fn from_config(config: &Config, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        let store = FileRecordStore::open(
            &config.storage.path,
            &config.storage.extension,
            clock.clone(),
        )?;
        let sweeper = RetentionSweeper::new(store.dir(), clock);

        Ok(Self::new(
            Arc::new(store),
            Arc::new(sweeper),
            RetentionSettings::from(&config.retention),
        ))
    }

    /// Get uptime.
    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    /// Get request count.
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Increment request count.
    pub fn increment_requests(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }
}
