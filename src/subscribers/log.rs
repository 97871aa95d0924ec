//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [started] task=import completed=Some(0) expected=Some(3)
//! [subtask] task=import completed=Some(1) expected=Some(3)
//! [message] task=import severity=Some(Warning) origin=None text=Some("row 7 skipped")
//! [busy] task=import clean -> warnings
//! [state] task=import busy -> completed
//! [completed] task=import result=successful_with_warnings
//! [destroyed] task=import
//! ```
//!
//! ## Example
//! ```no_run
//! # use std::sync::Arc;
//! # use taskpulse::{LogWriter, Task, TaskConfig};
//! let task = Task::new("import", TaskConfig::default());
//! let _set = task.attach_subscribers(vec![Arc::new(LogWriter)]);
//! // LogWriter will print all events to stdout
//! ```

use async_trait::async_trait;

use crate::events::{EventKind, TaskEvent};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &TaskEvent) {
        match e.kind {
            EventKind::StartRequested
            | EventKind::StopRequested
            | EventKind::PauseRequested
            | EventKind::ResumeRequested => {
                println!("[request] task={} kind={:?}", e.task, e.kind);
            }
            EventKind::TaskStarted => {
                println!(
                    "[started] task={} completed={:?} expected={:?}",
                    e.task, e.completed, e.expected
                );
            }
            EventKind::SubTaskCompleted => {
                println!(
                    "[subtask] task={} completed={:?} expected={:?}",
                    e.task, e.completed, e.expected
                );
            }
            EventKind::StateChanged => {
                if let (Some(from), Some(to)) = (e.from_state, e.to_state) {
                    println!("[state] task={} {from} -> {to}", e.task);
                }
            }
            EventKind::BusyStateChanged => {
                if let (Some(from), Some(to)) = (e.from_busy, e.to_busy) {
                    println!("[busy] task={} {from} -> {to}", e.task);
                }
            }
            EventKind::MessageLogged => {
                println!(
                    "[message] task={} severity={:?} origin={:?} text={:?}",
                    e.task, e.severity, e.origin, e.message
                );
            }
            EventKind::TaskCompleted => {
                let result = e.result.map(|r| r.as_label()).unwrap_or("none");
                println!("[completed] task={} result={result}", e.task);
            }
            EventKind::TaskPaused => {
                println!("[paused] task={}", e.task);
            }
            EventKind::TaskResumed => {
                println!("[resumed] task={}", e.task);
            }
            EventKind::DisplayNameChanged => {
                println!("[renamed] task={} display_name={:?}", e.task, e.message);
            }
            EventKind::KindChanged => {
                println!("[rekinded] task={} kind={:?}", e.task, e.message);
            }
            EventKind::TaskDestroyed => {
                println!("[destroyed] task={}", e.task);
            }
            EventKind::SubscriberOverflow => {
                println!("[overflow] {:?}", e.message);
            }
            EventKind::SubscriberPanicked => {
                println!("[panic] subscriber={} info={:?}", e.task, e.message);
            }
            EventKind::TaskAboutToStart
            | EventKind::TaskAboutToPause
            | EventKind::TaskAboutToResume
            | EventKind::TaskAboutToComplete
            | EventKind::SubTaskAboutToComplete => {}
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
