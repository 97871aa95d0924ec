//! Engine that forwards records into the `tracing` facade.

use super::engine::LogEngine;
use super::record::LogRecord;
use super::severity::Severity;

/// Engine mapping each record onto the matching `tracing` level.
///
/// Attach it as a custom engine to surface task messages in an application's
/// existing `tracing` pipeline without writing a subscriber:
///
/// ```no_run
/// use std::sync::Arc;
/// use taskpulse::{Task, TaskConfig, TracingEngine};
///
/// let task = Task::new("import", TaskConfig::default());
/// task.set_custom_engine(Arc::new(TracingEngine), false);
/// ```
///
/// `clear` is a no-op: emitted spans and events cannot be taken back.
#[derive(Debug, Default)]
pub struct TracingEngine;

impl LogEngine for TracingEngine {
    fn log(&self, record: &LogRecord) {
        match record.severity {
            Severity::Debug => tracing::debug!(task = %record.task, "{}", record.message),
            Severity::Info => tracing::info!(task = %record.task, "{}", record.message),
            Severity::Warning => tracing::warn!(task = %record.task, "{}", record.message),
            Severity::Error => tracing::error!(task = %record.task, "{}", record.message),
        }
    }

    fn name(&self) -> &'static str {
        "tracing"
    }
}
