//! Error types for task wiring.
//!
//! Almost every operation on a [`Task`](crate::Task) reports precondition
//! failures by returning `false` (a rejected report must never disturb task
//! state). The exception is parent-link management, which can fail in ways
//! the caller has to distinguish; those paths return [`TaskError`].

use thiserror::Error;

/// # Errors produced by task-link operations.
///
/// Returned by [`Task::set_parent`](crate::Task::set_parent); everything else
/// on a task communicates rejection through its `bool` result.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// The task (or the intended parent) has already been destroyed.
    #[error("task '{task}' has been destroyed")]
    Destroyed {
        /// Name of the destroyed task.
        task: String,
    },

    /// Linking would make the task its own ancestor.
    #[error("parent link from '{task}' to '{parent}' would form a cycle")]
    ParentCycle {
        /// Name of the task being linked.
        task: String,
        /// Name of the rejected parent.
        parent: String,
    },
}

impl TaskError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskpulse::TaskError;
    ///
    /// let err = TaskError::Destroyed { task: "import".into() };
    /// assert_eq!(err.as_label(), "task_destroyed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Destroyed { .. } => "task_destroyed",
            TaskError::ParentCycle { .. } => "parent_cycle",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Destroyed { task } => format!("destroyed: {task}"),
            TaskError::ParentCycle { task, parent } => {
                format!("cycle: {task} cannot adopt {parent} as parent")
            }
        }
    }
}
