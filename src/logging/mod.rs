//! Message logging: severities, records and engines.
//!
//! This module groups the log **data model** and the **engine** contract a
//! task routes its messages through.
//!
//! ## Contents
//! - [`Severity`] ordered message levels driving busy-state escalation
//! - [`LogRecord`] one logged message with origin and timestamp
//! - [`LogEngine`] sink contract (private engine, custom engines)
//! - [`MemoryEngine`] buffering engine a task owns when logging is enabled
//! - [`TracingEngine`] bridge into the `tracing` facade
//!
//! ## Routing
//! ```text
//! Task::log(msg, severity)
//!     ├──► private engine (MemoryEngine, unless custom-only)
//!     ├──► custom engine (when attached)
//!     ├──► parent chain (same routing at each ancestor)
//!     └──► MessageLogged event on the task's bus
//! ```

mod engine;
mod memory;
mod record;
mod severity;
mod trace;

pub use engine::LogEngine;
pub use memory::MemoryEngine;
pub use record::LogRecord;
pub use severity::Severity;
pub use trace::TracingEngine;
