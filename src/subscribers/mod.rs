//! # Event subscribers for task observation.
//!
//! This module provides the [`Subscribe`] trait and built-in implementations
//! for handling task events broadcast through the [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Task ── publish(TaskEvent) ──► Bus ──► pump ──► SubscriberSet
//!                                                       │
//!                                  ┌────────────────────┤ (bounded queue
//!                                  ▼                    ▼  per subscriber)
//!                            StateWatcher           LogWriter / custom
//!                        (mirrors task status)     (Subscribe::on_event)
//! ```
//!
//! ## Subscriber types
//! - **Passive subscribers** - observe and react to events (logging, metrics, alerts)
//! - **Stateful subscribers** - maintain state reconstructed from events ([`StateWatcher`])
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use taskpulse::{EventKind, Subscribe, TaskEvent};
//! use async_trait::async_trait;
//!
//! struct MetricsSubscriber;
//!
//! #[async_trait]
//! impl Subscribe for MetricsSubscriber {
//!     async fn on_event(&self, event: &TaskEvent) {
//!         match event.kind {
//!             EventKind::TaskCompleted => {
//!                 // increment completion counter
//!             }
//!             _ => {}
//!         }
//!     }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;
mod watch;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
pub use watch::{StateWatcher, TaskStatus};
