//! Stored record identifiers.
//!
//! A stored id is the record's file name:
//!
//! ```text
//! {YYYYMMDDHHMMSSffffff}-{8 hex}.{ext}
//! 20240301120000123456-9f3c2a1b.json
//! ```
//!
//! The timestamp prefix keeps names sortable in creation order. Within a
//! process the prefix never repeats; the random suffix covers writers in
//! other processes.

use std::fmt;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%6f";
const SUFFIX_LEN: usize = 8;

/// File name assigned to a record by a successful put.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredId(String);

impl StoredId {
    pub(crate) fn from_file_name(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The file name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoredId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StoredId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Allocates stored ids with a strictly increasing microsecond tick.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last_tick: Mutex<Option<i64>>,
}

impl IdGenerator {
    /// Create a generator with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id for a record created at `now`.
    ///
    /// `extension` includes its leading dot.
    pub fn next(&self, now: DateTime<Utc>, extension: &str) -> StoredId {
        let tick = self.next_tick(now.timestamp_micros());
        let stamp = DateTime::<Utc>::from_timestamp_micros(tick)
            .unwrap_or(now)
            .format(TIMESTAMP_FORMAT);
        let token = Uuid::new_v4().simple().to_string();

        StoredId(format!("{}-{}{}", stamp, &token[..SUFFIX_LEN], extension))
    }

    fn next_tick(&self, micros: i64) -> i64 {
        let mut last = self.last_tick.lock();
        let tick = match *last {
            Some(prev) if micros <= prev => prev + 1,
            _ => micros,
        };
        *last = Some(tick);
        tick
    }
}
