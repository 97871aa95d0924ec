//! # Stateful subscriber that mirrors task status from events.
//!
//! [`StateWatcher`] maintains an in-memory map of task statuses by listening
//! to lifecycle, busy-state and progress events. Dashboards and controllers
//! read snapshots instead of holding task handles.
//!
//! ## Architecture
//! ```text
//!  Task ── publish(TaskEvent) ──► Bus
//!                                  │
//!                        SubscriberSet worker
//!                                  │
//!                                  ▼
//!              StateWatcher (HashMap<String, TaskStatus> behind RwLock)
//!                    │                        │
//!     StateChanged ──┤          TaskDestroyed └── remove(name)
//!     BusyStateChanged, SubTaskCompleted, ... update(name)
//!
//! Later:
//!   watcher.status("import") ──► Option<TaskStatus>
//!   watcher.snapshot()       ──► Vec<(String, TaskStatus)>
//! ```
//!
//! ## Staleness
//! Events can be replayed to the watcher out of order when it is wired to
//! more than one source. Each entry remembers the `seq` of the last applied
//! event and rejects anything at or below it.
//!
//! ## Example
//! ```no_run
//! # use std::sync::Arc;
//! # use taskpulse::{StateWatcher, Task, TaskConfig};
//! # async fn demo() {
//! let task = Task::new("import", TaskConfig::default());
//! let watcher = Arc::new(StateWatcher::new());
//! let set = task.attach_subscribers(vec![watcher.clone()]);
//!
//! // Later, inspect mirrored status without touching the task
//! if let Some(status) = watcher.status("import") {
//!     println!("import: {:?} ({} done)", status.state, status.completed);
//! }
//! # set.shutdown().await;
//! # }
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::events::{EventKind, TaskEvent};
use crate::subscribers::Subscribe;
use crate::task::{BusyState, TaskResult, TaskState};

/// Mirrored status of one task, as reconstructed from its events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskStatus {
    /// Last observed lifecycle state.
    pub state: TaskState,
    /// Last observed busy state.
    pub busy: BusyState,
    /// Outcome of the most recent completed run.
    pub result: TaskResult,
    /// Completed subtask count of the current run.
    pub completed: u32,
    /// Expected subtask count; `None` for an indeterminate run.
    pub expected: Option<u32>,
    last_seq: u64,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self {
            state: TaskState::Idle,
            busy: BusyState::Clean,
            result: TaskResult::NoResult,
            completed: 0,
            expected: None,
            last_seq: 0,
        }
    }
}

impl TaskStatus {
    /// Sequence number of the last event applied to this entry.
    #[inline]
    pub fn last_seq(&self) -> u64 {
        self.last_seq
    }
}

/// Tracks task statuses reconstructed from events.
///
/// Thread-safe; usable both as a [`Subscribe`] implementation and directly
/// via [`update`](StateWatcher::update) from a hand-rolled receiver loop.
pub struct StateWatcher {
    inner: RwLock<HashMap<String, TaskStatus>>,
}

impl StateWatcher {
    /// Creates a new, empty watcher.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Applies one event to the mirror.
    ///
    /// Returns `false` when the event was ignored: subscriber diagnostics
    /// (they carry a subscriber name, not a task name) and events at or
    /// below the entry's last applied `seq`.
    pub fn update(&self, event: &TaskEvent) -> bool {
        if event.is_subscriber_overflow() || event.is_subscriber_panic() {
            return false;
        }
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        if event.kind == EventKind::TaskDestroyed {
            return map.remove(event.task.as_ref()).is_some();
        }

        let entry = map.entry(event.task.to_string()).or_default();
        if event.seq <= entry.last_seq {
            return false;
        }
        entry.last_seq = event.seq;

        match event.kind {
            EventKind::StateChanged => {
                if let Some(to) = event.to_state {
                    entry.state = to;
                }
            }
            EventKind::BusyStateChanged => {
                if let Some(to) = event.to_busy {
                    entry.busy = to;
                }
            }
            EventKind::TaskStarted => {
                entry.completed = 0;
                entry.expected = event.expected;
                entry.result = TaskResult::NoResult;
            }
            EventKind::SubTaskCompleted => {
                if let Some(completed) = event.completed {
                    entry.completed = completed;
                }
                entry.expected = event.expected;
            }
            EventKind::TaskCompleted => {
                if let Some(result) = event.result {
                    entry.result = result;
                }
                if let Some(completed) = event.completed {
                    entry.completed = completed;
                }
            }
            _ => {}
        }
        true
    }

    /// Mirrored status of one task, if any of its events were seen.
    pub fn status(&self, task: &str) -> Option<TaskStatus> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(task)
            .copied()
    }

    /// `true` while the mirrored state is busy or paused.
    pub fn is_active(&self, task: &str) -> bool {
        self.status(task).is_some_and(|s| s.state.is_active())
    }

    /// Snapshot of all tracked tasks, sorted by name.
    pub fn snapshot(&self) -> Vec<(String, TaskStatus)> {
        let mut entries: Vec<(String, TaskStatus)> = self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, status)| (name.clone(), *status))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl Default for StateWatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Subscribe for StateWatcher {
    async fn on_event(&self, event: &TaskEvent) {
        self.update(event);
    }

    fn name(&self) -> &'static str {
        "state_watcher"
    }
}
