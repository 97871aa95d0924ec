//! # Log engine contract
//!
//! `LogEngine` is the extension point for routing a task's messages into a
//! backend (an in-memory buffer, a file, a log widget, the `tracing` facade).
//! A task routes every record to its private engine and, when attached, to a
//! custom engine. Implementations never see busy-state or lifecycle
//! concerns, only records.
//!
//! ## Contract
//! - `log` is called synchronously from the thread that reported the message;
//!   implementations must not block for long and must not call back into the
//!   task that produced the record.
//! - `clear` is best-effort; engines without erasable storage ignore it.

use super::record::LogRecord;

/// Contract for log message sinks.
///
/// Implementations must be cheap to call and thread-safe; a single engine
/// instance may receive records from several tasks at once (for example a
/// shared custom engine attached to a whole task family).
pub trait LogEngine: Send + Sync + 'static {
    /// Consumes a single record.
    fn log(&self, record: &LogRecord);

    /// Discards buffered records, when the backend supports it.
    fn clear(&self) {}

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
