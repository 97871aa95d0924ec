//! Operation metadata: how hosting applications should present a task.
//!
//! The hub only stores these values and notifies kind changes; interpreting
//! them (summary widgets, cleanup of finished tasks) is the host's job.

/// Visibility scope of a task in a hosting application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Shown only where the task itself is displayed.
    #[default]
    Local,
    /// Shown in application-wide task summaries as well.
    Global,
}

impl TaskKind {
    /// Returns a short stable label (lowercase) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskKind::Local => "local",
            TaskKind::Global => "global",
        }
    }
}

/// What a host should do with the task's presentation once it stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StopAction {
    /// Keep showing the task as-is.
    #[default]
    DoNothing,
    /// Hide the task from summaries.
    Hide,
    /// Remove the task entirely.
    Delete,
}

impl StopAction {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            StopAction::DoNothing => "do_nothing",
            StopAction::Hide => "hide",
            StopAction::Delete => "delete",
        }
    }
}

/// What a host should do when a user removes the task from a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RemoveAction {
    /// Hide the task but keep it around.
    #[default]
    Hide,
    /// Remove the task entirely.
    Delete,
}

impl RemoveAction {
    /// Returns a short stable label (lowercase) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RemoveAction::Hide => "hide",
            RemoveAction::Delete => "delete",
        }
    }
}
