//! Task policies.
//!
//! This module groups the knobs that control what happens to a task **after**
//! a run reaches a terminal outcome.
//!
//! ## Contents
//! - [`LifetimePolicy`] which outcomes trigger self-destruction
//!
//! ## Quick wiring
//! ```text
//! TaskConfig { lifetime: LifetimePolicy, .. }
//!      └─► Task::complete resolves the outcome, then:
//!           - lifetime.should_destroy(result) → Task::destroy()
//! ```
//!
//! ## Defaults
//! - `LifetimePolicy::manual()` → destruction only via `Task::destroy()`.

mod lifetime;

pub use lifetime::LifetimePolicy;
