//! # Lifetime policy for completed tasks.
//!
//! [`LifetimePolicy`] selects which terminal outcomes make a task destroy
//! itself right after the completion notification. Each flag covers one
//! outcome; with no flag set the task lives until
//! [`Task::destroy`](crate::Task::destroy) is called explicitly.
//!
//! # Example
//! ```rust
//! use taskpulse::{LifetimePolicy, TaskResult};
//!
//! let policy = LifetimePolicy {
//!     on_successful: true,
//!     on_warnings: true,
//!     ..LifetimePolicy::manual()
//! };
//!
//! assert!(policy.should_destroy(TaskResult::Successful));
//! assert!(policy.should_destroy(TaskResult::SuccessfulWithWarnings));
//! assert!(!policy.should_destroy(TaskResult::Failed));
//! ```

use crate::task::TaskResult;

/// Per-outcome self-destruction flags.
///
/// Consulted by `Task::complete` after the `TaskCompleted` event: when the
/// flag matching the resolved outcome is set, the task destroys itself
/// immediately. [`TaskResult::NoResult`] never matches any flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LifetimePolicy {
    /// Destroy after a clean success.
    pub on_successful: bool,
    /// Destroy after a success that logged warnings.
    pub on_warnings: bool,
    /// Destroy after the run ended in `Stopped`.
    pub on_stopped: bool,
    /// Destroy after a failure.
    pub on_failed: bool,
}

impl LifetimePolicy {
    /// Manual lifetime: the task is never destroyed by a completion.
    ///
    /// Same as `LifetimePolicy::default()`.
    pub fn manual() -> Self {
        Self::default()
    }

    /// Destroy after every terminal outcome.
    pub fn always() -> Self {
        Self {
            on_successful: true,
            on_warnings: true,
            on_stopped: true,
            on_failed: true,
        }
    }

    /// Returns `true` when the given outcome matches a set flag.
    pub fn should_destroy(&self, result: TaskResult) -> bool {
        match result {
            TaskResult::Successful => self.on_successful,
            TaskResult::SuccessfulWithWarnings => self.on_warnings,
            TaskResult::Stopped => self.on_stopped,
            TaskResult::Failed => self.on_failed,
            TaskResult::NoResult => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_never_destroys() {
        let policy = LifetimePolicy::manual();
        for result in [
            TaskResult::NoResult,
            TaskResult::Successful,
            TaskResult::SuccessfulWithWarnings,
            TaskResult::Stopped,
            TaskResult::Failed,
        ] {
            assert!(
                !policy.should_destroy(result),
                "manual policy must not destroy on {result:?}"
            );
        }
    }

    #[test]
    fn test_each_flag_matches_its_outcome_only() {
        let policy = LifetimePolicy {
            on_stopped: true,
            ..LifetimePolicy::manual()
        };
        assert!(policy.should_destroy(TaskResult::Stopped));
        assert!(!policy.should_destroy(TaskResult::Successful));
        assert!(!policy.should_destroy(TaskResult::SuccessfulWithWarnings));
        assert!(!policy.should_destroy(TaskResult::Failed));
    }

    #[test]
    fn test_always_covers_every_outcome_except_no_result() {
        let policy = LifetimePolicy::always();
        assert!(policy.should_destroy(TaskResult::Successful));
        assert!(policy.should_destroy(TaskResult::SuccessfulWithWarnings));
        assert!(policy.should_destroy(TaskResult::Stopped));
        assert!(policy.should_destroy(TaskResult::Failed));
        assert!(!policy.should_destroy(TaskResult::NoResult));
    }
}
