//! # Fluent construction of configured tasks.
//!
//! [`TaskBuilder`] wraps [`TaskConfig`] for the common case of configuring a
//! single task inline. Every knob mirrors a config field; `build` hands back
//! a [`TaskRef`] ready to be wired to a worker.

use std::sync::Arc;

use crate::config::TaskConfig;
use crate::logging::LogEngine;
use crate::policies::LifetimePolicy;

use super::meta::{RemoveAction, StopAction, TaskKind};
use super::task::{Task, TaskRef};

/// Builder for a [`Task`].
///
/// ### Example
/// ```
/// use taskpulse::{LifetimePolicy, TaskBuilder, TaskKind};
///
/// let task = TaskBuilder::new("export")
///     .with_display_name("Export project")
///     .with_kind(TaskKind::Global)
///     .with_can_start(true)
///     .with_can_stop(true)
///     .with_lifetime(LifetimePolicy::always())
///     .build();
///
/// assert_eq!(task.name(), "export");
/// assert_eq!(&*task.display_name(), "Export project");
/// ```
pub struct TaskBuilder {
    name: Arc<str>,
    display_name: Option<Arc<str>>,
    config: TaskConfig,
    custom_engine: Option<(Arc<dyn LogEngine>, bool)>,
}

impl TaskBuilder {
    /// Starts a builder with the default [`TaskConfig`].
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            config: TaskConfig::default(),
            custom_engine: None,
        }
    }

    /// Replaces the whole configuration at once.
    #[inline]
    pub fn with_config(mut self, config: TaskConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets a user-facing display name distinct from the task name.
    #[inline]
    pub fn with_display_name(mut self, display_name: impl Into<Arc<str>>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Enables or disables the private log engine.
    #[inline]
    pub fn with_logging(mut self, logging: bool) -> Self {
        self.config.logging = logging;
        self
    }

    /// Controls purging of the private engine when a run starts.
    #[inline]
    pub fn with_clear_log_on_start(mut self, clear: bool) -> Self {
        self.config.clear_log_on_start = clear;
        self
    }

    /// Sets the visibility scope.
    #[inline]
    pub fn with_kind(mut self, kind: TaskKind) -> Self {
        self.config.kind = kind;
        self
    }

    /// Sets the stop presentation hint.
    #[inline]
    pub fn with_stop_action(mut self, action: StopAction) -> Self {
        self.config.stop_action = action;
        self
    }

    /// Sets the remove presentation hint.
    #[inline]
    pub fn with_remove_action(mut self, action: RemoveAction) -> Self {
        self.config.remove_action = action;
        self
    }

    /// Sets the self-destruction policy.
    #[inline]
    pub fn with_lifetime(mut self, lifetime: LifetimePolicy) -> Self {
        self.config.lifetime = lifetime;
        self
    }

    /// Advertises whether the worker honors start requests.
    #[inline]
    pub fn with_can_start(mut self, can_start: bool) -> Self {
        self.config.can_start = can_start;
        self
    }

    /// Advertises whether the worker honors stop requests.
    #[inline]
    pub fn with_can_stop(mut self, can_stop: bool) -> Self {
        self.config.can_stop = can_stop;
        self
    }

    /// Advertises whether the worker honors pause/resume requests.
    #[inline]
    pub fn with_can_pause(mut self, can_pause: bool) -> Self {
        self.config.can_pause = can_pause;
        self
    }

    /// Sets the event bus capacity (clamped to at least 1).
    #[inline]
    pub fn with_bus_capacity(mut self, capacity: usize) -> Self {
        self.config.bus_capacity = capacity;
        self
    }

    /// Sets the control request channel capacity (clamped to at least 1).
    #[inline]
    pub fn with_request_capacity(mut self, capacity: usize) -> Self {
        self.config.request_capacity = capacity;
        self
    }

    /// Attaches a shared custom engine from the start.
    ///
    /// With `only` set, the private engine is bypassed for records.
    #[inline]
    pub fn with_custom_engine(mut self, engine: Arc<dyn LogEngine>, only: bool) -> Self {
        self.custom_engine = Some((engine, only));
        self
    }

    /// Builds the task.
    pub fn build(self) -> TaskRef {
        Task::construct(self.name, self.display_name, self.config, self.custom_engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_applies_config() {
        let task = TaskBuilder::new("t")
            .with_kind(TaskKind::Global)
            .with_stop_action(StopAction::Delete)
            .with_remove_action(RemoveAction::Delete)
            .with_can_start(true)
            .with_can_pause(true)
            .with_clear_log_on_start(false)
            .build();

        assert_eq!(task.kind(), TaskKind::Global, "kind should come from the builder");
        assert_eq!(task.stop_action(), StopAction::Delete);
        assert_eq!(task.remove_action(), RemoveAction::Delete);
        assert!(task.can_start());
        assert!(!task.can_stop(), "untouched capabilities keep their default");
        assert!(task.can_pause());
        assert!(!task.clear_log_on_start());
    }

    #[test]
    fn test_display_name_defaults_to_name() {
        let task = TaskBuilder::new("sync").build();
        assert_eq!(&*task.display_name(), "sync");
    }

    #[test]
    fn test_logging_disabled_drops_engine() {
        let task = TaskBuilder::new("quiet").with_logging(false).build();
        assert!(!task.logging_enabled());
        assert!(task.logger_engine().is_none());
    }
}
