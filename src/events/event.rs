//! # Notifications emitted by a task hub.
//!
//! The [`EventKind`] enum classifies notifications across four categories:
//! - **Request events**: controller intent (start/stop/pause/resume requested)
//! - **Lifecycle events**: report flow (about-to/after pairs around every mutation)
//! - **Change events**: observable field transitions (state, busy state, names)
//! - **Subscriber events**: fan-out diagnostics (overflow, panic)
//!
//! The [`TaskEvent`] struct carries the task name plus optional metadata such
//! as messages, severities, transitions and progress counters.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Events published around a state mutation are sequenced under
//! the task's state lock, so `seq` order equals mutation order: the about-to
//! event always sorts before the mutation's after-event.
//!
//! ## Example
//! ```rust
//! use taskpulse::{EventKind, Severity, TaskEvent, TaskState};
//!
//! let ev = TaskEvent::new(EventKind::StateChanged, "import")
//!     .with_state_change(TaskState::Idle, TaskState::Busy)
//!     .with_message("import begins")
//!     .with_severity(Severity::Info);
//!
//! assert_eq!(ev.kind, EventKind::StateChanged);
//! assert_eq!(ev.task.as_ref(), "import");
//! assert_eq!(ev.to_state, Some(TaskState::Busy));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::logging::Severity;
use crate::task::{BusyState, TaskResult, TaskState};

/// Global sequence counter for event ordering. Starts at 1 so that 0 can
/// serve as a "nothing seen yet" sentinel in stateful consumers.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(1);

/// Classification of task notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Request events (controller intent, no mutation) ===
    /// A controller asked the worker to start.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    StartRequested,

    /// A controller asked the worker to stop; the stop token is already
    /// cancelled when this event is observed.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    StopRequested,

    /// A controller asked the worker to pause.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    PauseRequested,

    /// A controller asked the worker to resume.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ResumeRequested,

    // === Lifecycle events (worker reports) ===
    /// A new run is about to begin; published before any reset or transition.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskAboutToStart,

    /// A new run began; busy state and progress are already reset.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `completed`: `0`
    /// - `expected`: subtask count, when determinate
    /// - `message`/`severity`: start message, when provided
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskStarted,

    /// The running task is about to pause.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskAboutToPause,

    /// The task paused.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskPaused,

    /// The paused task is about to resume.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskAboutToResume,

    /// The task resumed.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskResumed,

    /// The busy session is about to end; published before the result is
    /// recorded and the terminal transition happens.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskAboutToComplete,

    /// The busy session ended; the task is now `Completed` or `Stopped`.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `result`: final outcome
    /// - `completed`: subtasks completed during the run
    /// - `expected`: subtask count, when determinate
    /// - `message`/`severity`: completion message, when provided
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskCompleted,

    // === Progress events ===
    /// Subtask completions are about to be recorded.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SubTaskAboutToComplete,

    /// Subtask completions were recorded.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `completed`: new completed count (clamped to `expected`)
    /// - `expected`: subtask count, when determinate
    /// - `message`/`severity`: progress message, when provided
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SubTaskCompleted,

    // === Change events ===
    /// The lifecycle state changed.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `from_state` / `to_state`: the transition
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    StateChanged,

    /// The busy state changed (severity escalation, or the reset at start).
    ///
    /// Sets:
    /// - `task`: task name
    /// - `from_busy` / `to_busy`: the transition
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    BusyStateChanged,

    /// The user-facing display name changed.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `message`: the new display name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    DisplayNameChanged,

    /// The task kind (local/global) changed.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `message`: label of the new kind
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    KindChanged,

    // === Logging events ===
    /// A message was logged on (or forwarded to) this task.
    ///
    /// Sets:
    /// - `task`: task name (the hub that re-emits the message)
    /// - `origin`: originating task, when the record was forwarded from a child
    /// - `message`/`severity`: the logged message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    MessageLogged,

    // === Teardown ===
    /// The task destroyed itself (manually or through its lifetime policy);
    /// every later operation on it is rejected.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskDestroyed,

    // === Subscriber events ===
    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `message`: reason string (e.g., "full", "closed")
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `message`: panic info/message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SubscriberPanicked,
}

/// Task notification with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct TaskEvent {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the task (or subscriber, for subscriber events).
    pub task: Arc<str>,

    /// Logged or attached message text.
    pub message: Option<Arc<str>>,
    /// Severity of the attached message.
    pub severity: Option<Severity>,
    /// Task the message originated from, when forwarded along parent links.
    pub origin: Option<Arc<str>>,
    /// Previous lifecycle state (for `StateChanged`).
    pub from_state: Option<TaskState>,
    /// New lifecycle state (for `StateChanged`).
    pub to_state: Option<TaskState>,
    /// Previous busy state (for `BusyStateChanged`).
    pub from_busy: Option<BusyState>,
    /// New busy state (for `BusyStateChanged`).
    pub to_busy: Option<BusyState>,
    /// Final outcome (for `TaskCompleted`).
    pub result: Option<TaskResult>,
    /// Completed subtask count.
    pub completed: Option<u32>,
    /// Expected subtask count, when the run is determinate.
    pub expected: Option<u32>,
}

impl TaskEvent {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind, task: impl Into<Arc<str>>) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: task.into(),
            message: None,
            severity: None,
            origin: None,
            from_state: None,
            to_state: None,
            from_busy: None,
            to_busy: None,
            result: None,
            completed: None,
            expected: None,
        }
    }

    /// Attaches a message text.
    #[inline]
    pub fn with_message(mut self, message: impl Into<Arc<str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches a message severity.
    #[inline]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Marks the originating task of a forwarded message.
    #[inline]
    pub fn with_origin(mut self, origin: impl Into<Arc<str>>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Attaches a lifecycle state transition.
    #[inline]
    pub fn with_state_change(mut self, from: TaskState, to: TaskState) -> Self {
        self.from_state = Some(from);
        self.to_state = Some(to);
        self
    }

    /// Attaches a busy state transition.
    #[inline]
    pub fn with_busy_change(mut self, from: BusyState, to: BusyState) -> Self {
        self.from_busy = Some(from);
        self.to_busy = Some(to);
        self
    }

    /// Attaches a final outcome.
    #[inline]
    pub fn with_result(mut self, result: TaskResult) -> Self {
        self.result = Some(result);
        self
    }

    /// Attaches a completed subtask count.
    #[inline]
    pub fn with_completed(mut self, completed: u32) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Attaches an expected subtask count.
    #[inline]
    pub fn with_expected(mut self, expected: u32) -> Self {
        self.expected = Some(expected);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        TaskEvent::new(EventKind::SubscriberOverflow, subscriber)
            .with_message(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        TaskEvent::new(EventKind::SubscriberPanicked, subscriber).with_message(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }
}
