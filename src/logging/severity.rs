//! Message severity levels.
//!
//! Severities are totally ordered (`Debug < Info < Warning < Error`); the
//! ordering is what drives busy-state escalation in
//! [`BusyState::escalated`](crate::BusyState::escalated).

use std::fmt;

/// Severity of a logged message.
///
/// # Example
/// ```
/// use taskpulse::Severity;
///
/// assert!(Severity::Warning > Severity::Info);
/// assert!(Severity::Error > Severity::Warning);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Diagnostic detail, ignored by busy-state tracking.
    Debug,
    /// Routine progress information.
    #[default]
    Info,
    /// A recoverable problem; the run can still succeed.
    Warning,
    /// A failure; a derived result will report the run as failed.
    Error,
}

impl Severity {
    /// Returns a short stable label (lowercase) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
