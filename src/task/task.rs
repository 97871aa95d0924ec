//! # The task hub: shared status record for one long-running operation.
//!
//! A [`Task`] does no work itself. The operation runs elsewhere (worker
//! thread, background process, plugin) and **reports** into the hub; UIs and
//! controllers **request** and **observe**. The hub keeps the two directions
//! strictly apart:
//!
//! ## Architecture
//! ```text
//!  Controller / UI                    Task (hub)                    Worker
//!  ───────────────                    ──────────                    ──────
//!  request_start() ──► ControlRequest channel ─────────────────► requests()
//!  request_stop()  ──► stop token cancelled ───────────────────► stop_signal()
//!                                        │
//!  subscribe() ◄── Bus ◄── events ◄──────┤ state machine        ◄─ start()
//!                                        │ busy state           ◄─ advance()
//!                                        │ progress             ◄─ complete()
//!                                        │ log routing          ◄─ log()
//!                                        ▼
//!                              parent chain (weak links)
//! ```
//!
//! ## Rules
//! - **Requests never mutate**: they publish intent and return whether the
//!   matching capability flag is set.
//! - **Reports are the sole mutators** and return `false` on precondition
//!   violations without touching state.
//! - **Event ordering**: events around a mutation are published under the
//!   state lock, so `seq` order equals mutation order and every about-to
//!   event precedes its after-event.
//! - **No foreign locks**: the hub never calls another task or an engine
//!   while holding its own state lock.

use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::config::TaskConfig;
use crate::error::TaskError;
use crate::events::{Bus, EventKind, TaskEvent};
use crate::logging::{LogEngine, LogRecord, MemoryEngine, Severity};
use crate::policies::LifetimePolicy;
use crate::subscribers::{Subscribe, SubscriberSet};

use super::control::ControlRequest;
use super::meta::{RemoveAction, StopAction, TaskKind};
use super::progress::Progress;
use super::state::{BusyState, Resolution, TaskResult, TaskState};

/// Shared handle to a task hub.
pub type TaskRef = Arc<Task>;

/// Mutable task state, guarded by one lock.
struct Shared {
    display_name: Arc<str>,
    state: TaskState,
    busy: BusyState,
    result: TaskResult,
    progress: Progress,
    kind: TaskKind,
    stop_action: StopAction,
    remove_action: RemoveAction,
    lifetime: LifetimePolicy,
    can_start: bool,
    can_stop: bool,
    can_pause: bool,
    clear_log_on_start: bool,
    engine: Option<Arc<dyn LogEngine>>,
    custom: Option<Arc<dyn LogEngine>>,
    custom_only: bool,
    parent: Weak<Task>,
    stop_token: CancellationToken,
}

/// Status, progress and logging hub for one long-running operation.
///
/// Workers report (`start`/`advance`/`complete`/`pause`/`resume`/`log`),
/// controllers request (`request_*`), observers subscribe. All operations are
/// synchronous and callable from any thread; none of them blocks beyond a
/// short critical section or panics.
///
/// ### Example
/// ```
/// use taskpulse::{Resolution, Severity, Task, TaskConfig, TaskResult, TaskState};
///
/// let task = Task::new("import", TaskConfig::default());
/// task.set_can_start(true);
///
/// assert!(task.start(Some(2), Some("import begins"), Severity::Info));
/// assert!(task.advance(1, None, Severity::Info));
/// task.log_warning("row 7 skipped");
/// assert!(task.advance(1, None, Severity::Info));
/// assert!(task.complete(Resolution::FailOnError, Some("done"), Severity::Info));
///
/// assert_eq!(task.state(), TaskState::Completed);
/// assert_eq!(task.result(), TaskResult::SuccessfulWithWarnings);
/// ```
pub struct Task {
    name: Arc<str>,
    bus: Bus,
    requests: broadcast::Sender<ControlRequest>,
    shared: RwLock<Shared>,
    children: Mutex<Vec<Weak<Task>>>,
    destroyed: AtomicBool,
    me: Weak<Task>,
}

impl Task {
    /// Creates a task hub with the given name and configuration.
    ///
    /// When `config.logging` is set, the task owns a private
    /// [`MemoryEngine`]; otherwise messages are only re-emitted as events
    /// (and routed to a custom engine, when one is attached later).
    pub fn new(name: impl Into<Arc<str>>, config: TaskConfig) -> TaskRef {
        Self::construct(name.into(), None, config, None)
    }

    pub(crate) fn construct(
        name: Arc<str>,
        display_name: Option<Arc<str>>,
        config: TaskConfig,
        custom: Option<(Arc<dyn LogEngine>, bool)>,
    ) -> TaskRef {
        let bus = Bus::new(config.bus_capacity_clamped());
        let (requests, _) = broadcast::channel(config.request_capacity_clamped());
        let engine: Option<Arc<dyn LogEngine>> = if config.logging {
            Some(Arc::new(MemoryEngine::new()))
        } else {
            None
        };
        let (custom, custom_only) = match custom {
            Some((engine, only)) => (Some(engine), only),
            None => (None, false),
        };

        Arc::new_cyclic(|me| Task {
            name: Arc::clone(&name),
            bus,
            requests,
            shared: RwLock::new(Shared {
                display_name: display_name.unwrap_or_else(|| Arc::clone(&name)),
                state: TaskState::Idle,
                busy: BusyState::Clean,
                result: TaskResult::NoResult,
                progress: Progress::indeterminate(),
                kind: config.kind,
                stop_action: config.stop_action,
                remove_action: config.remove_action,
                lifetime: config.lifetime,
                can_start: config.can_start,
                can_stop: config.can_stop,
                can_pause: config.can_pause,
                clear_log_on_start: config.clear_log_on_start,
                engine,
                custom,
                custom_only,
                parent: Weak::new(),
                stop_token: CancellationToken::new(),
            }),
            children: Mutex::new(Vec::new()),
            destroyed: AtomicBool::new(false),
            me: me.clone(),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, Shared> {
        self.shared.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Shared> {
        self.shared.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn event(&self, kind: EventKind) -> TaskEvent {
        TaskEvent::new(kind, Arc::clone(&self.name))
    }

    // === Read accessors ===

    /// Immutable task name, assigned at creation.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// User-facing display name.
    #[inline]
    pub fn display_name(&self) -> Arc<str> {
        Arc::clone(&self.read().display_name)
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> TaskState {
        self.read().state
    }

    /// Worst message severity observed since the current run began.
    #[inline]
    pub fn busy_state(&self) -> BusyState {
        self.read().busy
    }

    /// Outcome of the most recent run.
    #[inline]
    pub fn result(&self) -> TaskResult {
        self.read().result
    }

    /// `true` while a run is in progress (busy or paused).
    #[inline]
    pub fn is_active(&self) -> bool {
        self.read().state.is_active()
    }

    /// Progress counters of the current run.
    #[inline]
    pub fn progress(&self) -> Progress {
        self.read().progress
    }

    /// Completed subtask count of the current run.
    #[inline]
    pub fn completed_subtasks(&self) -> u32 {
        self.read().progress.completed()
    }

    /// Expected subtask count; `None` for an indeterminate run.
    #[inline]
    pub fn expected_subtasks(&self) -> Option<u32> {
        self.read().progress.expected()
    }

    /// Completion percentage; `None` for an indeterminate run.
    #[inline]
    pub fn percent(&self) -> Option<f64> {
        self.read().progress.percent()
    }

    /// Visibility scope of the task.
    #[inline]
    pub fn kind(&self) -> TaskKind {
        self.read().kind
    }

    /// Presentation hint for when the task stops.
    #[inline]
    pub fn stop_action(&self) -> StopAction {
        self.read().stop_action
    }

    /// Presentation hint for when the task is removed from a view.
    #[inline]
    pub fn remove_action(&self) -> RemoveAction {
        self.read().remove_action
    }

    /// Self-destruction policy evaluated at completion.
    #[inline]
    pub fn lifetime(&self) -> LifetimePolicy {
        self.read().lifetime
    }

    /// Whether `request_start` is honored.
    #[inline]
    pub fn can_start(&self) -> bool {
        self.read().can_start
    }

    /// Whether `request_stop` is honored.
    #[inline]
    pub fn can_stop(&self) -> bool {
        self.read().can_stop
    }

    /// Whether `request_pause`/`request_resume` are honored.
    #[inline]
    pub fn can_pause(&self) -> bool {
        self.read().can_pause
    }

    /// `true` once the task destroyed itself (or was destroyed).
    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(AtomicOrdering::SeqCst)
    }

    /// `true` when a stop was requested for the current run.
    #[inline]
    pub fn stop_requested(&self) -> bool {
        self.read().stop_token.is_cancelled()
    }

    /// Clone of the per-run stop token.
    ///
    /// Workers can `select!` on it for cooperative stops; `start` installs a
    /// fresh token, so a request from before the run does not poison it.
    #[inline]
    pub fn stop_signal(&self) -> CancellationToken {
        self.read().stop_token.clone()
    }

    // === Observation ===

    /// Creates a receiver observing every subsequent event of this task.
    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.bus.subscribe()
    }

    /// Creates a receiver for control requests (worker side).
    pub fn requests(&self) -> broadcast::Receiver<ControlRequest> {
        self.requests.subscribe()
    }

    /// Spawns a fan-out of this task's events to the given subscribers.
    ///
    /// Each subscriber gets a bounded queue and a dedicated worker (see
    /// [`SubscriberSet`]); a pump forwards the bus into the set until the set
    /// is shut down or the task is dropped. Requires a Tokio runtime.
    pub fn attach_subscribers(&self, subscribers: Vec<Arc<dyn Subscribe>>) -> Arc<SubscriberSet> {
        let set = Arc::new(SubscriberSet::new(subscribers, self.bus.clone()));
        let mut rx = self.bus.subscribe();
        let pump = Arc::clone(&set);
        let closed = set.closed_token();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = closed.cancelled() => break,
                    recv = rx.recv() => match recv {
                        Ok(ev) => pump.emit_arc(Arc::new(ev)),
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
        });
        set
    }

    // === Metadata setters ===

    /// Changes the user-facing display name; publishes `DisplayNameChanged`.
    pub fn set_display_name(&self, display_name: impl Into<Arc<str>>) {
        if self.is_destroyed() {
            return;
        }
        let display_name = display_name.into();
        let changed = {
            let mut shared = self.write();
            if shared.display_name == display_name {
                false
            } else {
                shared.display_name = Arc::clone(&display_name);
                true
            }
        };
        if changed {
            self.bus.publish(
                self.event(EventKind::DisplayNameChanged)
                    .with_message(display_name),
            );
        }
    }

    /// Changes the visibility scope; publishes `KindChanged`.
    pub fn set_kind(&self, kind: TaskKind) {
        if self.is_destroyed() {
            return;
        }
        let changed = {
            let mut shared = self.write();
            if shared.kind == kind {
                false
            } else {
                shared.kind = kind;
                true
            }
        };
        if changed {
            self.bus
                .publish(self.event(EventKind::KindChanged).with_message(kind.as_label()));
        }
    }

    /// Changes the stop presentation hint.
    pub fn set_stop_action(&self, action: StopAction) {
        if !self.is_destroyed() {
            self.write().stop_action = action;
        }
    }

    /// Changes the remove presentation hint.
    pub fn set_remove_action(&self, action: RemoveAction) {
        if !self.is_destroyed() {
            self.write().remove_action = action;
        }
    }

    /// Changes the self-destruction policy for future completions.
    pub fn set_lifetime(&self, lifetime: LifetimePolicy) {
        if !self.is_destroyed() {
            self.write().lifetime = lifetime;
        }
    }

    /// Advertises whether the worker honors start requests.
    pub fn set_can_start(&self, can_start: bool) {
        if !self.is_destroyed() {
            self.write().can_start = can_start;
        }
    }

    /// Advertises whether the worker honors stop requests.
    pub fn set_can_stop(&self, can_stop: bool) {
        if !self.is_destroyed() {
            self.write().can_stop = can_stop;
        }
    }

    /// Advertises whether the worker honors pause/resume requests.
    pub fn set_can_pause(&self, can_pause: bool) {
        if !self.is_destroyed() {
            self.write().can_pause = can_pause;
        }
    }

    // === Logging configuration ===

    /// `true` when the task owns a private engine.
    #[inline]
    pub fn logging_enabled(&self) -> bool {
        self.read().engine.is_some()
    }

    /// The private engine, when logging is enabled.
    pub fn logger_engine(&self) -> Option<Arc<dyn LogEngine>> {
        self.read().engine.clone()
    }

    /// Replaces the private engine. The task takes ownership of it.
    pub fn set_logger_engine(&self, engine: Arc<dyn LogEngine>) {
        if !self.is_destroyed() {
            self.write().engine = Some(engine);
        }
    }

    /// The attached custom engine, if any.
    pub fn custom_engine(&self) -> Option<Arc<dyn LogEngine>> {
        self.read().custom.clone()
    }

    /// Attaches a custom engine shared with its original owner.
    ///
    /// With `only` set, records bypass the private engine and go to the
    /// custom engine exclusively (forwarding and events are unaffected).
    pub fn set_custom_engine(&self, engine: Arc<dyn LogEngine>, only: bool) {
        if self.is_destroyed() {
            return;
        }
        let mut shared = self.write();
        shared.custom = Some(engine);
        shared.custom_only = only;
    }

    /// Detaches the custom engine.
    pub fn remove_custom_engine(&self) {
        if self.is_destroyed() {
            return;
        }
        let mut shared = self.write();
        shared.custom = None;
        shared.custom_only = false;
    }

    /// Whether `start` purges the private engine before a new run.
    #[inline]
    pub fn clear_log_on_start(&self) -> bool {
        self.read().clear_log_on_start
    }

    /// Controls purging of the private engine at `start`.
    pub fn set_clear_log_on_start(&self, clear: bool) {
        if !self.is_destroyed() {
            self.write().clear_log_on_start = clear;
        }
    }

    /// Purges the private engine now.
    pub fn clear_log(&self) {
        let engine = self.read().engine.clone();
        if let Some(engine) = engine {
            engine.clear();
        }
    }

    // === Logging ===

    /// Logs a message on this task.
    ///
    /// The record is routed to the private engine (unless a custom-only
    /// engine is attached), to the custom engine, re-emitted as a
    /// `MessageLogged` event, and forwarded along the parent chain. While a
    /// run is active, the severity escalates the busy state; a change
    /// publishes `BusyStateChanged` after the message event.
    pub fn log(&self, message: &str, severity: Severity) {
        if self.is_destroyed() {
            return;
        }
        let record = LogRecord::new(Arc::clone(&self.name), severity, message);
        self.ingest(&record);
        self.forward_to_ancestors(&record);
    }

    /// Logs an informational message.
    #[inline]
    pub fn log_message(&self, message: &str) {
        self.log(message, Severity::Info);
    }

    /// Logs a warning; escalates an active run to `BusyState::Warnings`.
    #[inline]
    pub fn log_warning(&self, message: &str) {
        self.log(message, Severity::Warning);
    }

    /// Logs an error; escalates an active run to `BusyState::Errors`.
    #[inline]
    pub fn log_error(&self, message: &str) {
        self.log(message, Severity::Error);
    }

    /// Routes one record into this task: engines, event, busy escalation.
    fn ingest(&self, record: &LogRecord) {
        if self.is_destroyed() {
            return;
        }
        let (own, custom) = {
            let mut shared = self.write();

            let mut ev = self
                .event(EventKind::MessageLogged)
                .with_message(Arc::clone(&record.message))
                .with_severity(record.severity);
            if record.task != self.name {
                ev = ev.with_origin(Arc::clone(&record.task));
            }
            self.bus.publish(ev);

            if shared.state.is_active() {
                let escalated = shared.busy.escalated(record.severity);
                if escalated != shared.busy {
                    let from = shared.busy;
                    shared.busy = escalated;
                    self.bus.publish(
                        self.event(EventKind::BusyStateChanged)
                            .with_busy_change(from, escalated),
                    );
                }
            }

            let own = if shared.custom.is_some() && shared.custom_only {
                None
            } else {
                shared.engine.clone()
            };
            (own, shared.custom.clone())
        };
        if let Some(engine) = own {
            engine.log(record);
        }
        if let Some(engine) = custom {
            engine.log(record);
        }
    }

    /// Hands the record to every ancestor, nearest first.
    ///
    /// The visited set keeps a racy parent cycle from looping; `set_parent`
    /// rejects cycles eagerly, so the guard should never trigger.
    fn forward_to_ancestors(&self, record: &LogRecord) {
        let mut visited: Vec<*const Task> = vec![self as *const Task];
        let mut next = self.parent();
        while let Some(ancestor) = next {
            let ptr = Arc::as_ptr(&ancestor);
            if visited.contains(&ptr) {
                break;
            }
            visited.push(ptr);
            ancestor.ingest(record);
            next = ancestor.parent();
        }
    }

    // === Controller-facing requests ===

    /// Asks the worker to start; `false` when `can_start` is unset.
    pub fn request_start(&self) -> bool {
        self.request(ControlRequest::Start)
    }

    /// Asks the worker to stop; `false` when `can_stop` is unset.
    ///
    /// On success the per-run stop token is cancelled before the
    /// `StopRequested` event is published, and a completion with a derive
    /// resolution will resolve to `TaskResult::Stopped`.
    pub fn request_stop(&self) -> bool {
        self.request(ControlRequest::Stop)
    }

    /// Asks the worker to pause; `false` when `can_pause` is unset.
    pub fn request_pause(&self) -> bool {
        self.request(ControlRequest::Pause)
    }

    /// Asks the worker to resume; `false` when `can_pause` is unset.
    pub fn request_resume(&self) -> bool {
        self.request(ControlRequest::Resume)
    }

    fn request(&self, request: ControlRequest) -> bool {
        if self.is_destroyed() {
            tracing::debug!(task = %self.name, request = request.as_label(), "request rejected: task destroyed");
            return false;
        }
        let (allowed, stop_token) = {
            let shared = self.read();
            let allowed = match request {
                ControlRequest::Start => shared.can_start,
                ControlRequest::Stop => shared.can_stop,
                ControlRequest::Pause | ControlRequest::Resume => shared.can_pause,
            };
            let token = if request == ControlRequest::Stop {
                Some(shared.stop_token.clone())
            } else {
                None
            };
            (allowed, token)
        };
        if !allowed {
            tracing::debug!(task = %self.name, request = request.as_label(), "request rejected: capability disabled");
            return false;
        }
        if let Some(token) = stop_token {
            token.cancel();
        }
        let kind = match request {
            ControlRequest::Start => EventKind::StartRequested,
            ControlRequest::Stop => EventKind::StopRequested,
            ControlRequest::Pause => EventKind::PauseRequested,
            ControlRequest::Resume => EventKind::ResumeRequested,
        };
        self.bus.publish(self.event(kind));
        let _ = self.requests.send(request);
        true
    }

    // === Worker-facing reports ===

    /// Reports that a new run began.
    ///
    /// `expected` is the subtask count (`None` for an indeterminate run).
    /// Fails without side effects when the task is destroyed, `can_start` is
    /// unset, or a run is already busy (a paused or terminal task restarts).
    ///
    /// On success: publishes `TaskAboutToStart`, resets busy state (with a
    /// `BusyStateChanged` when the value actually drops), progress and the
    /// stop token, transitions to `Busy`, publishes `StateChanged` and
    /// `TaskStarted`, purges the private engine when `clear_log_on_start` is
    /// set, then routes the optional message through [`log`](Task::log).
    pub fn start(&self, expected: Option<u32>, message: Option<&str>, severity: Severity) -> bool {
        if self.is_destroyed() {
            tracing::debug!(task = %self.name, "start rejected: task destroyed");
            return false;
        }
        let engine_to_clear = {
            let mut shared = self.write();
            if !shared.can_start {
                drop(shared);
                tracing::debug!(task = %self.name, "start rejected: capability disabled");
                return false;
            }
            if shared.state == TaskState::Busy {
                drop(shared);
                tracing::warn!(task = %self.name, "start rejected: already busy");
                return false;
            }

            self.bus.publish(self.event(EventKind::TaskAboutToStart));

            if shared.busy != BusyState::Clean {
                let from = shared.busy;
                shared.busy = BusyState::Clean;
                self.bus.publish(
                    self.event(EventKind::BusyStateChanged)
                        .with_busy_change(from, BusyState::Clean),
                );
            }
            shared.progress.reset(expected);
            shared.stop_token = CancellationToken::new();
            shared.result = TaskResult::NoResult;

            let from = shared.state;
            shared.state = TaskState::Busy;
            self.bus.publish(
                self.event(EventKind::StateChanged)
                    .with_state_change(from, TaskState::Busy),
            );

            let mut started = self.event(EventKind::TaskStarted).with_completed(0);
            if let Some(expected) = expected {
                started = started.with_expected(expected);
            }
            if let Some(message) = message {
                started = started.with_message(message).with_severity(severity);
            }
            self.bus.publish(started);

            if shared.clear_log_on_start {
                shared.engine.clone()
            } else {
                None
            }
        };
        if let Some(engine) = engine_to_clear {
            engine.clear();
        }
        if let Some(message) = message {
            self.log(message, severity);
        }
        true
    }

    /// Reports `n` completed subtasks.
    ///
    /// Only meaningful while `Busy`; returns `false` otherwise. The completed
    /// count is clamped to the expected count of a determinate run. Publishes
    /// `SubTaskAboutToComplete` and `SubTaskCompleted`, then routes the
    /// optional message.
    pub fn advance(&self, n: u32, message: Option<&str>, severity: Severity) -> bool {
        if self.is_destroyed() {
            tracing::debug!(task = %self.name, "advance rejected: task destroyed");
            return false;
        }
        {
            let mut shared = self.write();
            if shared.state != TaskState::Busy {
                drop(shared);
                tracing::debug!(task = %self.name, "advance rejected: task not busy");
                return false;
            }

            self.bus.publish(self.event(EventKind::SubTaskAboutToComplete));

            let completed = shared.progress.advance(n);
            let mut ev = self
                .event(EventKind::SubTaskCompleted)
                .with_completed(completed);
            if let Some(expected) = shared.progress.expected() {
                ev = ev.with_expected(expected);
            }
            if let Some(message) = message {
                ev = ev.with_message(message).with_severity(severity);
            }
            self.bus.publish(ev);
        }
        if let Some(message) = message {
            self.log(message, severity);
        }
        true
    }

    /// Reports the end of the current run.
    ///
    /// Only valid while `Busy` or `Paused`; returns `false` otherwise. The
    /// optional message is logged before the result is resolved, so its
    /// severity still counts toward the busy state the derive sentinels
    /// read. A resolved `TaskResult::Stopped` enters the `Stopped` state,
    /// everything else enters `Completed`. Publishes `TaskAboutToComplete`,
    /// `StateChanged` and `TaskCompleted`; when the lifetime policy matches
    /// the outcome, the task destroys itself immediately afterwards.
    pub fn complete(
        &self,
        resolution: Resolution,
        message: Option<&str>,
        severity: Severity,
    ) -> bool {
        if self.is_destroyed() {
            tracing::debug!(task = %self.name, "complete rejected: task destroyed");
            return false;
        }
        if !self.read().state.is_active() {
            tracing::debug!(task = %self.name, "complete rejected: no run in progress");
            return false;
        }
        if let Some(message) = message {
            self.log(message, severity);
        }
        let destroy = {
            let mut shared = self.write();
            if !shared.state.is_active() {
                return false;
            }
            let resolved = resolution.resolve(shared.busy, shared.stop_token.is_cancelled());

            self.bus.publish(self.event(EventKind::TaskAboutToComplete));

            let from = shared.state;
            shared.state = if resolved == TaskResult::Stopped {
                TaskState::Stopped
            } else {
                TaskState::Completed
            };
            shared.result = resolved;
            self.bus.publish(
                self.event(EventKind::StateChanged)
                    .with_state_change(from, shared.state),
            );

            let mut ev = self
                .event(EventKind::TaskCompleted)
                .with_result(resolved)
                .with_completed(shared.progress.completed());
            if let Some(expected) = shared.progress.expected() {
                ev = ev.with_expected(expected);
            }
            if let Some(message) = message {
                ev = ev.with_message(message).with_severity(severity);
            }
            self.bus.publish(ev);

            shared.lifetime.should_destroy(resolved)
        };
        if destroy {
            self.destroy();
        }
        true
    }

    /// Reports that the run paused. Only valid while `Busy`.
    pub fn pause(&self) -> bool {
        if self.is_destroyed() {
            tracing::debug!(task = %self.name, "pause rejected: task destroyed");
            return false;
        }
        let mut shared = self.write();
        if shared.state != TaskState::Busy {
            drop(shared);
            tracing::debug!(task = %self.name, "pause rejected: task not busy");
            return false;
        }
        self.bus.publish(self.event(EventKind::TaskAboutToPause));
        shared.state = TaskState::Paused;
        self.bus.publish(
            self.event(EventKind::StateChanged)
                .with_state_change(TaskState::Busy, TaskState::Paused),
        );
        self.bus.publish(self.event(EventKind::TaskPaused));
        true
    }

    /// Reports that the paused run resumed. Only valid while `Paused`.
    pub fn resume(&self) -> bool {
        if self.is_destroyed() {
            tracing::debug!(task = %self.name, "resume rejected: task destroyed");
            return false;
        }
        let mut shared = self.write();
        if shared.state != TaskState::Paused {
            drop(shared);
            tracing::debug!(task = %self.name, "resume rejected: task not paused");
            return false;
        }
        self.bus.publish(self.event(EventKind::TaskAboutToResume));
        shared.state = TaskState::Busy;
        self.bus.publish(
            self.event(EventKind::StateChanged)
                .with_state_change(TaskState::Paused, TaskState::Busy),
        );
        self.bus.publish(self.event(EventKind::TaskResumed));
        true
    }

    // === Parent links ===

    /// The current parent, when set and still alive.
    pub fn parent(&self) -> Option<TaskRef> {
        self.read().parent.upgrade()
    }

    /// Links this task under `parent` for log forwarding.
    ///
    /// The link is weak: neither side owns the other, and the parent clears
    /// it during its own teardown. Rejects destroyed endpoints and any link
    /// that would make this task its own ancestor.
    ///
    /// # Errors
    /// [`TaskError::Destroyed`] when either task is destroyed,
    /// [`TaskError::ParentCycle`] when the link would form a cycle.
    pub fn set_parent(&self, parent: &TaskRef) -> Result<(), TaskError> {
        if self.is_destroyed() {
            return Err(TaskError::Destroyed {
                task: self.name.to_string(),
            });
        }
        if parent.is_destroyed() {
            return Err(TaskError::Destroyed {
                task: parent.name.to_string(),
            });
        }
        let self_ptr = self as *const Task;
        if Arc::as_ptr(parent) == self_ptr {
            return Err(self.cycle_error(parent));
        }
        let mut visited: Vec<*const Task> = vec![Arc::as_ptr(parent)];
        let mut cursor = parent.parent();
        while let Some(ancestor) = cursor {
            let ptr = Arc::as_ptr(&ancestor);
            if ptr == self_ptr {
                return Err(self.cycle_error(parent));
            }
            if visited.contains(&ptr) {
                break;
            }
            visited.push(ptr);
            cursor = ancestor.parent();
        }

        let old = {
            let mut shared = self.write();
            std::mem::replace(&mut shared.parent, Arc::downgrade(parent))
        };
        if let Some(old) = old.upgrade() {
            if !Arc::ptr_eq(&old, parent) {
                old.unregister_child(self);
            }
        }
        parent.register_child(self.me.clone());
        Ok(())
    }

    /// Clears the parent link, if any. Silent on both sides.
    pub fn remove_parent(&self) {
        let old = {
            let mut shared = self.write();
            std::mem::replace(&mut shared.parent, Weak::new())
        };
        if let Some(parent) = old.upgrade() {
            parent.unregister_child(self);
        }
    }

    fn cycle_error(&self, parent: &Task) -> TaskError {
        TaskError::ParentCycle {
            task: self.name.to_string(),
            parent: parent.name.to_string(),
        }
    }

    fn register_child(&self, child: Weak<Task>) {
        let mut children = self.children.lock().unwrap_or_else(PoisonError::into_inner);
        children.retain(|w| w.strong_count() > 0);
        if !children.iter().any(|w| w.ptr_eq(&child)) {
            children.push(child);
        }
    }

    fn unregister_child(&self, child: &Task) {
        let ptr = child as *const Task;
        self.children
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|w| w.as_ptr() != ptr && w.strong_count() > 0);
    }

    /// Called by a destroyed parent; clears the link without notifying.
    fn on_parent_destroyed(&self, parent: &Task) {
        let mut shared = self.write();
        if shared.parent.as_ptr() == parent as *const Task {
            shared.parent = Weak::new();
        }
    }

    // === Teardown ===

    /// Destroys the task: at most once, idempotent.
    ///
    /// Detaches from the parent, silently clears the parent link of every
    /// registered child (their state is untouched), publishes
    /// `TaskDestroyed`, then releases both engines. Every later operation on
    /// this task is rejected.
    pub fn destroy(&self) {
        if self.destroyed.swap(true, AtomicOrdering::SeqCst) {
            return;
        }
        let parent = {
            let mut shared = self.write();
            std::mem::replace(&mut shared.parent, Weak::new()).upgrade()
        };
        if let Some(parent) = parent {
            parent.unregister_child(self);
        }
        let children = {
            let mut children = self.children.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *children)
        };
        for weak in children {
            if let Some(child) = weak.upgrade() {
                child.on_parent_destroyed(self);
            }
        }
        self.bus.publish(self.event(EventKind::TaskDestroyed));

        let mut shared = self.write();
        shared.engine = None;
        shared.custom = None;
        shared.custom_only = false;
    }
}
