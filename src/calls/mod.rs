//! Call history of business routes.
//!
//! # Responsibilities
//! - Append one record per answered business-route request
//! - Answer `/calls`, `/calls/count` and `/calls/reset`
//!
//! # Design Decisions
//! - Process memory only; cleared by `/calls/reset` or restart
//! - Appends are serialized by a mutex; readers get a copy

pub mod filter;
pub mod record;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use filter::{CallFilter, FilterPath};
pub use record::CallRecord;

use crate::observability::metrics;

/// Append-only log of recorded calls, shared between request handlers.
#[derive(Debug, Default)]
pub struct CallLog {
    records: Mutex<Vec<CallRecord>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, Vec<CallRecord>> {
        // Poisoning is ignored; pushes and clears leave the Vec consistent.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn append(&self, record: CallRecord) {
        let mut records = self.records();
        records.push(record);
        metrics::record_calls_recorded(records.len());
    }

    /// Copy of every record, oldest first.
    pub fn all(&self) -> Vec<CallRecord> {
        self.records().clone()
    }

    pub fn count(&self) -> usize {
        self.records().len()
    }

    pub fn reset(&self) {
        self.records().clear();
        metrics::record_calls_recorded(0);
    }

    /// Records matching `filter`, oldest first.
    pub fn query(&self, filter: &CallFilter) -> Vec<CallRecord> {
        self.records()
            .iter()
            .filter(|record| {
                serde_json::to_value(record)
                    .map(|value| filter.matches(&value))
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }
}
