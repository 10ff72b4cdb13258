//! Read-side projections over a full store scan.
//!
//! Nothing here is cached: every call walks the storage directory again.

use serde::Deserialize;

use crate::record::Record;
use crate::store::FileRecordStore;

/// Job ids of every stored record, in scan order.
pub fn list_ids(store: &FileRecordStore) -> Vec<String> {
    store.scan_all().map(|record| record.job_id).collect()
}

/// Resource URL of every stored record, in scan order. `None` where a record
/// has no URL.
pub fn list_external_refs(store: &FileRecordStore) -> Vec<Option<String>> {
    store.scan_all().map(|record| record.url).collect()
}

/// Look up one record by job id.
pub fn get_one(store: &FileRecordStore, job_id: &str) -> Option<Record> {
    store.get_by_id(job_id)
}

/// Criteria for [`list_records`]. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecordFilter {
    pub status: Option<String>,
    pub label: Option<String>,
}

impl RecordFilter {
    pub fn matches(&self, record: &Record) -> bool {
        let status_ok = self
            .status
            .as_deref()
            .is_none_or(|status| record.status.as_deref() == Some(status));
        let label_ok = self
            .label
            .as_deref()
            .is_none_or(|label| record.has_label(label));
        status_ok && label_ok
    }
}

/// Every stored record matching `filter`, in scan order.
pub fn list_records(store: &FileRecordStore, filter: &RecordFilter) -> Vec<Record> {
    store
        .scan_all()
        .filter(|record| filter.matches(record))
        .collect()
}
