//! Background retention sweeps.

use std::sync::Arc;
use std::time::Duration;

use jobstash_store::RetentionSweeper;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{info, warn};

/// Sweep every `period` until the returned handle is aborted.
///
/// The first sweep runs one full period after spawning.
pub fn spawn_periodic_sweep(
    sweeper: Arc<RetentionSweeper>,
    max_age_days: f64,
    period: Duration,
) -> JoinHandle<()> {
    info!(
        "Periodic retention sweep every {:?} (max age {} days)",
        period, max_age_days
    );

    tokio::spawn(async move {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let sweeper = sweeper.clone();
            let result = tokio::task::spawn_blocking(move || sweeper.sweep(max_age_days)).await;
            match result {
                Ok(report) if !report.is_clean() => {
                    warn!("Periodic sweep left {} file(s) in place", report.failed);
                }
                Ok(_) => {}
                Err(e) => warn!("Periodic sweep task failed: {}", e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobstash_store::SystemClock;
    use std::fs::{self, File};
    use std::time::SystemTime;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_periodic_sweep_removes_old_files() {
        let dir = TempDir::new().unwrap();
        let old = dir.path().join("old.json");
        let fresh = dir.path().join("fresh.json");
        fs::write(&old, "{}").unwrap();
        fs::write(&fresh, "{}").unwrap();
        File::options()
            .write(true)
            .open(&old)
            .unwrap()
            .set_modified(SystemTime::now() - Duration::from_secs(3 * 86_400))
            .unwrap();

        let sweeper = Arc::new(RetentionSweeper::new(dir.path(), Arc::new(SystemClock)));
        let handle = spawn_periodic_sweep(sweeper, 2.0, Duration::from_millis(20));

        for _ in 0..100 {
            if !old.exists() {
                break;
            }
            time::sleep(Duration::from_millis(20)).await;
        }
        handle.abort();

        assert!(!old.exists());
        assert!(fresh.exists());
    }

    #[tokio::test]
    async fn test_periodic_sweep_waits_one_period() {
        let dir = TempDir::new().unwrap();
        let old = dir.path().join("old.json");
        fs::write(&old, "{}").unwrap();
        File::options()
            .write(true)
            .open(&old)
            .unwrap()
            .set_modified(SystemTime::now() - Duration::from_secs(3 * 86_400))
            .unwrap();

        let sweeper = Arc::new(RetentionSweeper::new(dir.path(), Arc::new(SystemClock)));
        let handle = spawn_periodic_sweep(sweeper, 2.0, Duration::from_secs(3600));
        time::sleep(Duration::from_millis(50)).await;
        handle.abort();

        assert!(old.exists());
    }
}
