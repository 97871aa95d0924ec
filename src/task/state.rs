//! # Lifecycle states, busy states and result derivation.
//!
//! Three small enums model everything observers can ask about a run:
//! - [`TaskState`] — where the task is in its lifecycle;
//! - [`BusyState`] — the worst message severity seen since the run started;
//! - [`TaskResult`] — how the last run ended.
//!
//! [`BusyState::escalated`] and [`Resolution::resolve`] are pure functions:
//! escalation and result derivation can be tested without a task.
//!
//! ## State machine
//! ```text
//!            start                 complete
//!  Idle ───────────► Busy ───────────────────► Completed / Stopped
//!   ▲                 │  ▲                            │
//!   │           pause │  │ resume                     │ start
//!   │                 ▼  │                            ▼
//!   └─ (created)     Paused ──── complete ──────► (restartable)
//! ```

use std::fmt;

use crate::logging::Severity;

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskState {
    /// Created, never started (or restarted yet).
    #[default]
    Idle,
    /// A run is in progress.
    Busy,
    /// A run is in progress but paused by the worker.
    Paused,
    /// The last run finished; see [`TaskResult`].
    Completed,
    /// The last run was ended by a stop.
    Stopped,
}

impl TaskState {
    /// `true` while a run is in progress (`Busy` or `Paused`).
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, TaskState::Busy | TaskState::Paused)
    }

    /// `true` for the restartable end states (`Completed` or `Stopped`).
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Stopped)
    }

    /// Returns a short stable label (lowercase) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskState::Idle => "idle",
            TaskState::Busy => "busy",
            TaskState::Paused => "paused",
            TaskState::Completed => "completed",
            TaskState::Stopped => "stopped",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Worst message severity observed since the current run began.
///
/// Ordered (`Clean < Warnings < Errors`) and monotonic within a run: logging
/// can only raise it, and `start` resets it to `Clean`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BusyState {
    /// No warnings or errors logged so far.
    #[default]
    Clean,
    /// At least one warning logged, no errors.
    Warnings,
    /// At least one error logged.
    Errors,
}

impl BusyState {
    /// Returns the busy state after observing a message of the given severity.
    ///
    /// Pure and monotonic: the result is never lower than `self`.
    ///
    /// # Example
    /// ```
    /// use taskpulse::{BusyState, Severity};
    ///
    /// let busy = BusyState::Clean.escalated(Severity::Warning);
    /// assert_eq!(busy, BusyState::Warnings);
    ///
    /// // A later info message cannot lower the level.
    /// assert_eq!(busy.escalated(Severity::Info), BusyState::Warnings);
    /// ```
    #[must_use]
    pub fn escalated(self, severity: Severity) -> BusyState {
        let observed = match severity {
            Severity::Error => BusyState::Errors,
            Severity::Warning => BusyState::Warnings,
            Severity::Debug | Severity::Info => BusyState::Clean,
        };
        self.max(observed)
    }

    /// Returns a short stable label (lowercase) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            BusyState::Clean => "clean",
            BusyState::Warnings => "warnings",
            BusyState::Errors => "errors",
        }
    }
}

impl fmt::Display for BusyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Outcome of the most recent run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskResult {
    /// No run has completed yet (or a new run is in progress).
    #[default]
    NoResult,
    /// The run finished without warnings or errors.
    Successful,
    /// The run finished, but warnings were logged.
    SuccessfulWithWarnings,
    /// The run was ended by a stop request.
    Stopped,
    /// The run failed.
    Failed,
}

impl TaskResult {
    /// `true` for `Successful` and `SuccessfulWithWarnings`.
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            TaskResult::Successful | TaskResult::SuccessfulWithWarnings
        )
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskResult::NoResult => "no_result",
            TaskResult::Successful => "successful",
            TaskResult::SuccessfulWithWarnings => "successful_with_warnings",
            TaskResult::Stopped => "stopped",
            TaskResult::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// How `Task::complete` obtains the final result.
///
/// The two derive sentinels map the busy state at completion time onto an
/// outcome; `Explicit` bypasses derivation entirely (including the
/// stop-request check, so an explicit result always wins).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Resolution {
    /// Derive from the busy state; any logged error fails the run.
    #[default]
    FailOnError,
    /// Derive from the busy state; logged errors downgrade to
    /// `SuccessfulWithWarnings` instead of failing the run.
    SuccessOnError,
    /// Use exactly this result. `Explicit(TaskResult::NoResult)` is stored
    /// as-is; lifetime policies never match it.
    Explicit(TaskResult),
}

impl Resolution {
    /// Resolves the final outcome for a completing run.
    ///
    /// For the derive sentinels, a stop request observed during the run takes
    /// precedence over the busy state:
    ///
    /// | busy state | stop requested | `FailOnError` | `SuccessOnError` |
    /// |------------|----------------|---------------|------------------|
    /// | any        | yes            | `Stopped`     | `Stopped`        |
    /// | `Clean`    | no             | `Successful`  | `Successful`     |
    /// | `Warnings` | no             | `SuccessfulWithWarnings` | `SuccessfulWithWarnings` |
    /// | `Errors`   | no             | `Failed`      | `SuccessfulWithWarnings` |
    #[must_use]
    pub fn resolve(self, busy: BusyState, stop_requested: bool) -> TaskResult {
        match self {
            Resolution::Explicit(result) => result,
            Resolution::FailOnError => {
                if stop_requested {
                    TaskResult::Stopped
                } else {
                    match busy {
                        BusyState::Clean => TaskResult::Successful,
                        BusyState::Warnings => TaskResult::SuccessfulWithWarnings,
                        BusyState::Errors => TaskResult::Failed,
                    }
                }
            }
            Resolution::SuccessOnError => {
                if stop_requested {
                    TaskResult::Stopped
                } else {
                    match busy {
                        BusyState::Clean => TaskResult::Successful,
                        BusyState::Warnings | BusyState::Errors => {
                            TaskResult::SuccessfulWithWarnings
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escalation_is_monotonic() {
        let severities = [
            Severity::Debug,
            Severity::Info,
            Severity::Warning,
            Severity::Error,
        ];
        let states = [BusyState::Clean, BusyState::Warnings, BusyState::Errors];

        for state in states {
            for severity in severities {
                let next = state.escalated(severity);
                assert!(
                    next >= state,
                    "escalating {state:?} with {severity:?} lowered it to {next:?}"
                );
            }
        }
    }

    #[test]
    fn test_escalation_levels() {
        assert_eq!(BusyState::Clean.escalated(Severity::Debug), BusyState::Clean);
        assert_eq!(BusyState::Clean.escalated(Severity::Info), BusyState::Clean);
        assert_eq!(
            BusyState::Clean.escalated(Severity::Warning),
            BusyState::Warnings
        );
        assert_eq!(
            BusyState::Clean.escalated(Severity::Error),
            BusyState::Errors
        );
        assert_eq!(
            BusyState::Warnings.escalated(Severity::Error),
            BusyState::Errors
        );
        assert_eq!(
            BusyState::Errors.escalated(Severity::Info),
            BusyState::Errors
        );
    }

    #[test]
    fn test_state_predicates() {
        assert!(TaskState::Busy.is_active());
        assert!(TaskState::Paused.is_active());
        assert!(!TaskState::Idle.is_active());
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Stopped.is_terminal());
        assert!(!TaskState::Busy.is_terminal());
    }

    #[test]
    fn test_derive_fail_on_error() {
        let r = Resolution::FailOnError;
        assert_eq!(r.resolve(BusyState::Clean, false), TaskResult::Successful);
        assert_eq!(
            r.resolve(BusyState::Warnings, false),
            TaskResult::SuccessfulWithWarnings
        );
        assert_eq!(r.resolve(BusyState::Errors, false), TaskResult::Failed);
    }

    #[test]
    fn test_derive_success_on_error() {
        let r = Resolution::SuccessOnError;
        assert_eq!(r.resolve(BusyState::Clean, false), TaskResult::Successful);
        assert_eq!(
            r.resolve(BusyState::Warnings, false),
            TaskResult::SuccessfulWithWarnings
        );
        assert_eq!(
            r.resolve(BusyState::Errors, false),
            TaskResult::SuccessfulWithWarnings
        );
    }

    #[test]
    fn test_stop_request_wins_over_busy_state() {
        for busy in [BusyState::Clean, BusyState::Warnings, BusyState::Errors] {
            assert_eq!(
                Resolution::FailOnError.resolve(busy, true),
                TaskResult::Stopped
            );
            assert_eq!(
                Resolution::SuccessOnError.resolve(busy, true),
                TaskResult::Stopped
            );
        }
    }

    #[test]
    fn test_explicit_overrides_everything() {
        assert_eq!(
            Resolution::Explicit(TaskResult::Failed).resolve(BusyState::Clean, true),
            TaskResult::Failed
        );
        assert_eq!(
            Resolution::Explicit(TaskResult::Successful).resolve(BusyState::Errors, false),
            TaskResult::Successful
        );
        assert_eq!(
            Resolution::Explicit(TaskResult::NoResult).resolve(BusyState::Errors, true),
            TaskResult::NoResult
        );
    }
}
