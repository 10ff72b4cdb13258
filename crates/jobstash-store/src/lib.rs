//! # jobstash Store
//!
//! File-backed persistence for submitted job results.
//!
//! ## Features
//!
//! - One JSON file per accepted record, published atomically
//! - Collision-resistant, chronologically sortable file names
//! - Linear-scan queries that tolerate corrupt or vanishing files
//! - Age-based retention sweep driven by file modification time

pub mod clock;
pub mod error;
pub mod id;
pub mod query;
pub mod record;
pub mod retention;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::StoreError;
pub use id::{IdGenerator, StoredId};
pub use query::{RecordFilter, get_one, list_external_refs, list_ids, list_records};
pub use record::Record;
pub use retention::{RetentionSweeper, SweepOutcome, SweepReport, file_age};
pub use store::{FileRecordStore, RecordScan};
