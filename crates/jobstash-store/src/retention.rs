//! Age-based retention sweep.
//!
//! A file's age is `now - mtime`. The sweep never looks inside files, so it
//! evicts anything under the storage directory once it is old enough,
//! including leftovers that are not records at all.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::clock::Clock;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// What a sweep did with one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepOutcome {
    /// Older than the threshold and deleted.
    Removed,
    /// Not older than the threshold.
    Retained,
    /// Gone before it could be examined or deleted.
    Vanished,
    /// Could not be examined or deleted. Retried on the next sweep.
    Failed,
}

/// Summary of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub scanned: usize,
    pub removed: usize,
    pub retained: usize,
    pub vanished: usize,
    pub failed: usize,
    pub removed_files: Vec<PathBuf>,
}

impl SweepReport {
    fn record(&mut self, path: &Path, outcome: SweepOutcome) {
        self.scanned += 1;
        match outcome {
            SweepOutcome::Removed => {
                self.removed += 1;
                self.removed_files.push(path.to_path_buf());
            }
            SweepOutcome::Retained => self.retained += 1,
            SweepOutcome::Vanished => self.vanished += 1,
            SweepOutcome::Failed => self.failed += 1,
        }
    }

    /// No file failed to be examined or deleted.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Deletes files under a directory once they exceed a maximum age.
pub struct RetentionSweeper {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl RetentionSweeper {
    pub fn new(dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            dir: dir.into(),
            clock,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Delete every regular file under the directory whose age is strictly
    /// greater than `max_age_days`.
    ///
    /// Best effort: per-file problems are logged and counted, never returned.
    pub fn sweep(&self, max_age_days: f64) -> SweepReport {
        let mut report = SweepReport::default();

        let Ok(max_age) = Duration::try_from_secs_f64(max_age_days * SECONDS_PER_DAY) else {
            warn!("Skipping retention sweep: invalid max age of {} days", max_age_days);
            return report;
        };

        let now = self.clock.now();

        for entry in WalkDir::new(&self.dir).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    if e.io_error().is_some_and(|io| io.kind() == io::ErrorKind::NotFound) {
                        debug!("Entry vanished during retention walk: {}", e);
                    } else {
                        warn!("Failed to walk {:?}: {}", self.dir, e);
                    }
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let outcome = self.sweep_file(entry.path(), now, max_age);
            report.record(entry.path(), outcome);
        }

        info!(
            "Retention sweep of {:?} (max age {} days): {} scanned, {} removed, {} retained, {} vanished, {} failed",
            self.dir,
            max_age_days,
            report.scanned,
            report.removed,
            report.retained,
            report.vanished,
            report.failed
        );

        report
    }

    fn sweep_file(&self, path: &Path, now: DateTime<Utc>, max_age: Duration) -> SweepOutcome {
        let age = match age_of(path, now) {
            Ok(age) => age,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("File {:?} vanished before its age could be read", path);
                return SweepOutcome::Vanished;
            }
            Err(e) => {
                warn!("Failed to read modification time of {:?}: {}", path, e);
                return SweepOutcome::Failed;
            }
        };

        if age <= max_age {
            return SweepOutcome::Retained;
        }

        match fs::remove_file(path) {
            Ok(()) => {
                debug!("Removed {:?} (age {:.2} days)", path, age.as_secs_f64() / SECONDS_PER_DAY);
                SweepOutcome::Removed
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("File {:?} already removed", path);
                SweepOutcome::Vanished
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                warn!("Permission denied removing {:?}: {}", path, e);
                SweepOutcome::Failed
            }
            Err(e) => {
                warn!("Failed to remove {:?}: {}", path, e);
                SweepOutcome::Failed
            }
        }
    }
}

/// Age of the file at `path` relative to `now`.
///
/// `None` if the file is gone or its metadata cannot be read. A modification
/// time in the future counts as age zero.
pub fn file_age(path: &Path, now: DateTime<Utc>) -> Option<Duration> {
    match age_of(path, now) {
        Ok(age) => Some(age),
        Err(e) => {
            debug!("No age for {:?}: {}", path, e);
            None
        }
    }
}

fn age_of(path: &Path, now: DateTime<Utc>) -> io::Result<Duration> {
    let modified: DateTime<Utc> = fs::symlink_metadata(path)?.modified()?.into();
    Ok((now - modified).to_std().unwrap_or(Duration::ZERO))
}

#[cfg(test)]
#[path = "retention_tests.rs"]
mod tests;
