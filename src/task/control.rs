//! Control requests delivered to the worker.

/// Intent message sent on a task's request channel.
///
/// Requests never mutate the task. The worker consumes them from
/// [`Task::requests`](crate::Task::requests) and reacts by calling the
/// matching report (`start`, `complete`, `pause`, `resume`); stop intent is
/// additionally visible on the per-run token from
/// [`Task::stop_signal`](crate::Task::stop_signal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlRequest {
    /// Begin a new run.
    Start,
    /// End the current run.
    Stop,
    /// Pause the current run.
    Pause,
    /// Resume the paused run.
    Resume,
}

impl ControlRequest {
    /// Returns a short stable label (lowercase) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ControlRequest::Start => "start",
            ControlRequest::Stop => "stop",
            ControlRequest::Pause => "pause",
            ControlRequest::Resume => "resume",
        }
    }
}
