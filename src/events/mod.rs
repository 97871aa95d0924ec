//! Task notifications: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to notifications emitted by a task hub: requests,
//! lifecycle reports, progress, change events and subscriber diagnostics.
//!
//! ## Contents
//! - [`EventKind`], [`TaskEvent`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Task` report/request/log paths and `SubscriberSet`
//!   workers (overflow/panic).
//! - **Consumers**: receivers obtained from `Task::subscribe()`, and the
//!   `SubscriberSet` pump spawned by `Task::attach_subscribers()`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{EventKind, TaskEvent};
