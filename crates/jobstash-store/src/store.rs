//! Record storage.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::clock::Clock;
use crate::error::StoreError;
use crate::id::{IdGenerator, StoredId};
use crate::record::Record;

/// File system based record store.
///
/// Every record lives in its own file directly under the storage directory:
/// ```text
/// {dir}/
/// ├── 20240301120000000001-9f3c2a1b.json
/// ├── 20240301120000000417-04be77d0.json
/// └── ...
/// ```
///
/// There is no index. Every read scans the whole directory, so each query
/// costs O(number of stored files).
pub struct FileRecordStore {
    dir: PathBuf,
    /// Extension including the leading dot.
    extension: String,
    clock: Arc<dyn Clock>,
    ids: IdGenerator,
}

impl FileRecordStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// `extension` may be given with or without its leading dot.
    pub fn open(
        dir: impl Into<PathBuf>,
        extension: &str,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StoreError> {
        let dir = dir.into();
        let extension = Self::normalize_extension(extension)?;

        fs::create_dir_all(&dir)?;

        debug!("FileRecordStore initialized at {:?} (extension {})", dir, extension);

        Ok(Self {
            dir,
            extension,
            clock,
            ids: IdGenerator::new(),
        })
    }

    /// Storage directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Record file extension, with its leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Turn `json` or `.json` into `.json`.
    fn normalize_extension(extension: &str) -> Result<String, StoreError> {
        let trimmed = extension.trim().trim_start_matches('.');
        if trimmed.is_empty()
            || trimmed.contains(['/', '\\'])
            || trimmed.chars().any(char::is_whitespace)
        {
            return Err(StoreError::InvalidExtension(extension.to_string()));
        }
        Ok(format!(".{}", trimmed))
    }

    /// Persist `record` as a new file and return its stored id.
    ///
    /// The content is written to a hidden temp file and renamed into place,
    /// so a concurrent scan never sees a partial record. Failures are
    /// returned as-is and never retried.
    pub fn put(&self, record: &Record) -> Result<StoredId, StoreError> {
        let content = serde_json::to_string_pretty(record)?;

        let id = self.ids.next(self.clock.now(), &self.extension);
        let path = self.dir.join(id.as_str());
        let tmp_path = self.dir.join(format!(".{}.tmp", id));

        if let Err(e) = write_then_rename(&tmp_path, &path, content.as_bytes()) {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    warn!("Failed to remove temp file {:?}: {}", tmp_path, cleanup);
                }
            }
            return Err(e.into());
        }

        debug!("Saved record for job '{}' to {:?}", record.job_id, path);
        Ok(id)
    }

    /// Lazily scan every stored record.
    ///
    /// Each call starts a fresh pass over the directory. Files that cannot be
    /// read or parsed are skipped with a warning; the scan itself never fails.
    /// Order is whatever the file system enumerates.
    pub fn scan_all(&self) -> impl Iterator<Item = Record> + use<> {
        self.scan_entries().map(|(_, record)| record)
    }

    /// Like [`scan_all`](Self::scan_all), paired with each record's stored id.
    pub fn scan_entries(&self) -> RecordScan {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => Some(entries),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Storage directory {:?} does not exist, nothing to scan", self.dir);
                None
            }
            Err(e) => {
                warn!("Failed to read storage directory {:?}: {}", self.dir, e);
                None
            }
        };

        RecordScan {
            entries,
            extension: self.extension.clone(),
        }
    }

    /// First record whose `job_id` matches, in scan order.
    pub fn get_by_id(&self, job_id: &str) -> Option<Record> {
        self.scan_all().find(|record| record.job_id == job_id)
    }

    /// Every record whose `job_id` matches. Duplicate submissions coexist.
    pub fn get_all_by_id(&self, job_id: &str) -> Vec<Record> {
        self.scan_all()
            .filter(|record| record.job_id == job_id)
            .collect()
    }
}

fn write_then_rename(tmp_path: &Path, path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = File::create(tmp_path)?;
    file.write_all(content)?;
    file.sync_all()?;
    drop(file);
    fs::rename(tmp_path, path)
}

/// Single-pass iterator over the records in a storage directory.
pub struct RecordScan {
    entries: Option<fs::ReadDir>,
    extension: String,
}

impl RecordScan {
    fn load(&self, entry: fs::DirEntry) -> Option<(StoredId, Record)> {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            debug!("Skipping non UTF-8 file name {:?}", file_name);
            return None;
        };

        if name.starts_with('.') || !name.ends_with(&self.extension) {
            return None;
        }

        let path = entry.path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Record file {:?} vanished before it could be read", path);
                return None;
            }
            Err(e) => {
                // Directories named like records land here as well.
                warn!("Failed to read record file {:?}: {}", path, e);
                return None;
            }
        };

        match serde_json::from_str::<Record>(&content) {
            Ok(record) => Some((StoredId::from_file_name(name), record)),
            Err(e) => {
                warn!("Failed to deserialize record from {:?}: {}", path, e);
                None
            }
        }
    }
}

impl Iterator for RecordScan {
    type Item = (StoredId, Record);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.as_mut()?.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to read directory entry: {}", e);
                    continue;
                }
            };

            if let Some(loaded) = self.load(entry) {
                return Some(loaded);
            }
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
