//! A single logged message as routed to engines.

use std::sync::Arc;
use std::time::SystemTime;

use super::severity::Severity;

/// One logged message, stamped with origin and severity.
///
/// Records are produced by [`Task::log`](crate::Task::log) and handed to
/// every [`LogEngine`](crate::LogEngine) on the routing path. `task` names
/// the task the message was originally logged on; a parent receiving a
/// forwarded record sees the child's name here.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Name of the task the message was logged on.
    pub task: Arc<str>,
    /// Message severity.
    pub severity: Severity,
    /// Message text.
    pub message: Arc<str>,
}

impl LogRecord {
    /// Creates a record stamped with the current time.
    pub fn new(
        task: impl Into<Arc<str>>,
        severity: Severity,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            at: SystemTime::now(),
            task: task.into(),
            severity,
            message: message.into(),
        }
    }
}
