//! # taskpulse
//!
//! **Taskpulse** is a task status, progress and logging hub for Rust.
//!
//! It provides a shared record of a long-running operation: where the work
//! itself runs somewhere else (worker thread, background process, plugin),
//! a [`Task`] holds its lifecycle state, busy state, subtask progress and
//! log, and broadcasts every change as an event. The crate is designed as a
//! building block for UIs, controllers and higher-level orchestrators.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!    ┌──────────────┐          ┌──────────────┐          ┌──────────────┐
//!    │  Controller  │          │      UI      │          │  StateWatcher│
//!    │ request_*()  │          │ subscribe()  │          │ (mirror)     │
//!    └──────┬───────┘          └──────▲───────┘          └──────▲───────┘
//!           │ intent                  │ events                  │ events
//!           ▼                         │                         │
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Task (status hub)                                                  │
//! │  - lifecycle state machine (idle ⇄ busy ⇄ paused → completed)       │
//! │  - busy state (worst severity this run)                             │
//! │  - progress (completed / expected subtasks)                         │
//! │  - log routing (engines + parent forwarding)                        │
//! │  - Bus (broadcast events)                                           │
//! │  - ControlRequest channel + per-run stop token                      │
//! └──────▲──────────────────────────────────────────────────────┬───────┘
//!        │ reports                                              │ forwards
//!        │                                                      ▼
//!    ┌───┴──────────┐                                   ┌──────────────┐
//!    │    Worker    │                                   │  parent Task │
//!    │ start()      │                                   │ (weak link)  │
//!    │ advance()    │                                   └──────────────┘
//!    │ log()        │
//!    │ complete()   │
//!    └──────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Controller               Task (hub)                        Worker
//!
//! request_start() ───► StartRequested event ────────────► requests() loop
//!                                                            │
//!                      TaskAboutToStart                      │
//!                      busy/progress reset          ◄──── start()
//!                      StateChanged{idle → busy}
//!                      TaskStarted
//!                                                            │ work...
//!                      SubTaskAboutToComplete       ◄──── advance(n)
//!                      SubTaskCompleted
//!                                                            │
//!                      MessageLogged                ◄──── log_warning(...)
//!                      BusyStateChanged{clean → warnings}
//!                                                            │
//! request_stop() ────► stop token cancelled ─────────────► stop_signal()
//!                      StopRequested event                   │ unwind...
//!                                                            │
//!                      TaskAboutToComplete          ◄──── complete(FailOnError)
//!                      StateChanged{busy → stopped}
//!                      TaskCompleted{result: stopped}
//!                      [TaskDestroyed]  (lifetime policy)
//! ```
//!
//! ## Features
//! | Area              | Description                                                            | Key types / traits                       |
//! |-------------------|------------------------------------------------------------------------|------------------------------------------|
//! | **Task hub**      | Lifecycle, busy state, progress and log of one operation.              | [`Task`], [`TaskRef`], [`TaskBuilder`]   |
//! | **Lifecycle**     | States, outcomes and how completion resolves them.                     | [`TaskState`], [`TaskResult`], [`Resolution`] |
//! | **Events**        | Broadcast of every change, in mutation order.                          | [`TaskEvent`], [`EventKind`], [`Bus`]    |
//! | **Subscriber API**| Hook into task events (logging, metrics, custom subscribers).          | [`Subscribe`], [`SubscriberSet`]         |
//! | **Logging**       | Pluggable sinks and message records with severities.                   | [`LogEngine`], [`LogRecord`], [`Severity`] |
//! | **Hierarchy**     | Weak parent links with upward log forwarding.                          | [`Task::set_parent`]                     |
//! | **Policies**      | Self-destruction on completion.                                        | [`LifetimePolicy`]                       |
//! | **Errors**        | Typed errors for link and lifetime misuse.                             | [`TaskError`]                            |
//! | **Configuration** | Per-task construction settings.                                        | [`TaskConfig`]                           |
//!
//! ## Optional features
//! - `logging` *(default)*: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use taskpulse::{EventKind, Resolution, Severity, Task, TaskConfig, TaskResult, TaskState};
//!
//! fn main() {
//!     let mut cfg = TaskConfig::default();
//!     cfg.can_start = true;
//!     cfg.can_stop = true;
//!
//!     let task = Task::new("import", cfg);
//!     let mut events = task.subscribe();
//!
//!     // Worker side: report the run.
//!     assert!(task.start(Some(2), Some("importing 2 files"), Severity::Info));
//!     assert!(task.advance(1, Some("file 1 done"), Severity::Info));
//!     task.log_warning("file 2 has odd encoding");
//!     assert!(task.advance(1, None, Severity::Info));
//!     assert!(task.complete(Resolution::FailOnError, Some("import finished"), Severity::Info));
//!
//!     // Observer side: status is readable at any time...
//!     assert_eq!(task.state(), TaskState::Completed);
//!     assert_eq!(task.result(), TaskResult::SuccessfulWithWarnings);
//!     assert_eq!(task.percent(), Some(100.0));
//!
//!     // ...and every change arrived as an event, in order.
//!     let first = events.try_recv().expect("events were published");
//!     assert_eq!(first.kind, EventKind::TaskAboutToStart);
//! }
//! ```
mod config;
mod error;
mod events;
mod logging;
mod policies;
mod subscribers;
mod task;

// ---- Public re-exports ----

pub use config::TaskConfig;
pub use error::TaskError;
pub use events::{Bus, EventKind, TaskEvent};
pub use logging::{LogEngine, LogRecord, MemoryEngine, Severity, TracingEngine};
pub use policies::LifetimePolicy;
pub use subscribers::{StateWatcher, Subscribe, SubscriberSet, TaskStatus};
pub use task::{
    BusyState, ControlRequest, Progress, RemoveAction, Resolution, StopAction, Task, TaskBuilder,
    TaskKind, TaskRef, TaskResult, TaskState,
};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enabled by default; opt out with `--no-default-features`.
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
