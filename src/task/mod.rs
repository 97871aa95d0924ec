//! # Task model: lifecycle, progress, metadata and the hub itself.
//!
//! - [`Task`] is the hub workers report into and controllers observe.
//! - [`TaskBuilder`] constructs a configured [`TaskRef`].
//! - [`TaskState`], [`BusyState`], [`TaskResult`] and [`Resolution`] form
//!   the lifecycle vocabulary.
//! - [`Progress`] counts subtasks; [`ControlRequest`] is what the request
//!   channel carries; [`TaskKind`], [`StopAction`] and [`RemoveAction`] are
//!   presentation metadata.

mod builder;
mod control;
mod meta;
mod progress;
mod state;
mod task;

pub use builder::TaskBuilder;
pub use control::ControlRequest;
pub use meta::{RemoveAction, StopAction, TaskKind};
pub use progress::Progress;
pub use state::{BusyState, Resolution, TaskResult, TaskState};
pub use task::{Task, TaskRef};
