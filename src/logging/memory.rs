//! In-memory log engine.

use std::sync::{PoisonError, RwLock};

use super::engine::LogEngine;
use super::record::LogRecord;

/// Buffering engine that keeps every record in memory.
///
/// This is the engine a task creates for itself when logging is enabled.
/// It is also handy in tests and UIs that render a task's log after the
/// fact: [`records`](MemoryEngine::records) returns a snapshot.
///
/// # Example
/// ```
/// use taskpulse::{LogEngine, LogRecord, MemoryEngine, Severity};
///
/// let engine = MemoryEngine::new();
/// engine.log(&LogRecord::new("import", Severity::Info, "row 1 done"));
/// engine.log(&LogRecord::new("import", Severity::Warning, "row 2 skipped"));
///
/// assert_eq!(engine.len(), 2);
/// assert_eq!(engine.records()[1].severity, Severity::Warning);
///
/// engine.clear();
/// assert!(engine.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemoryEngine {
    records: RwLock<Vec<LogRecord>>,
}

impl MemoryEngine {
    /// Creates an empty engine.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Returns a snapshot of all buffered records, oldest first.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the most recent record, if any.
    pub fn last(&self) -> Option<LogRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Number of buffered records.
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` when no records are buffered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogEngine for MemoryEngine {
    fn log(&self, record: &LogRecord) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
    }

    fn clear(&self) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
