//! # Per-task configuration.
//!
//! [`TaskConfig`] defines a task's behavior at construction: logging,
//! channel capacities, capability flags, presentation metadata, and the
//! self-destruction policy.
//!
//! # Example
//! ```
//! use taskpulse::{LifetimePolicy, TaskConfig, TaskKind};
//!
//! let mut cfg = TaskConfig::default();
//! cfg.kind = TaskKind::Global;
//! cfg.can_start = true;
//! cfg.can_stop = true;
//! cfg.lifetime = LifetimePolicy::always();
//!
//! assert!(cfg.can_start);
//! ```

use crate::policies::LifetimePolicy;
use crate::task::{RemoveAction, StopAction, TaskKind};

/// Configuration applied to a task at construction.
///
/// Everything here except `logging` and the channel capacities can also be
/// changed later through setters on the task.
#[derive(Clone, Debug)]
pub struct TaskConfig {
    /// Whether the task owns a private log engine.
    pub logging: bool,
    /// Whether a new run purges the private engine first.
    pub clear_log_on_start: bool,
    /// Capacity of the event bus channel.
    pub bus_capacity: usize,
    /// Capacity of the control request channel.
    pub request_capacity: usize,
    /// Visibility scope of the task.
    pub kind: TaskKind,
    /// Presentation hint for when the task stops.
    pub stop_action: StopAction,
    /// Presentation hint for when the task is removed from a view.
    pub remove_action: RemoveAction,
    /// Self-destruction policy evaluated at completion.
    pub lifetime: LifetimePolicy,
    /// Whether the worker honors start requests.
    pub can_start: bool,
    /// Whether the worker honors stop requests.
    pub can_stop: bool,
    /// Whether the worker honors pause/resume requests.
    pub can_pause: bool,
}

impl Default for TaskConfig {
    /// Provides a default configuration:
    /// - `logging = true`, `clear_log_on_start = true`
    /// - `bus_capacity = 1024`, `request_capacity = 16`
    /// - `kind = TaskKind::Local`
    /// - `stop_action = StopAction::DoNothing`, `remove_action = RemoveAction::Hide`
    /// - `lifetime = LifetimePolicy::manual()`
    /// - all capabilities disabled
    fn default() -> Self {
        Self {
            logging: true,
            clear_log_on_start: true,
            bus_capacity: 1024,
            request_capacity: 16,
            kind: TaskKind::default(),
            stop_action: StopAction::default(),
            remove_action: RemoveAction::default(),
            lifetime: LifetimePolicy::manual(),
            can_start: false,
            can_stop: false,
            can_pause: false,
        }
    }
}

impl TaskConfig {
    /// Bus capacity clamped to at least 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Request channel capacity clamped to at least 1.
    #[inline]
    pub fn request_capacity_clamped(&self) -> usize {
        self.request_capacity.max(1)
    }
}
