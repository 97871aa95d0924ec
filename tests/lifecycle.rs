//! End-to-end lifecycle behavior: reports, derivation, event ordering.

use pretty_assertions::assert_eq;
use tokio::sync::broadcast;

use taskpulse::{
    EventKind, LifetimePolicy, Resolution, Severity, Task, TaskConfig, TaskEvent, TaskRef,
    TaskResult, TaskState,
};

fn startable(name: &str) -> TaskRef {
    let mut cfg = TaskConfig::default();
    cfg.can_start = true;
    Task::new(name, cfg)
}

fn drain(rx: &mut broadcast::Receiver<TaskEvent>) -> Vec<TaskEvent> {
    let mut events = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        events.push(ev);
    }
    events
}

fn kinds(events: &[TaskEvent]) -> Vec<EventKind> {
    events.iter().map(|e| e.kind).collect()
}

#[test]
fn import_scenario_publishes_events_in_mutation_order() {
    let task = startable("import");
    let mut rx = task.subscribe();

    assert!(task.start(Some(3), Some("starting import"), Severity::Info));
    assert!(task.advance(1, Some("file 1 done"), Severity::Info));
    task.log_warning("file 2 skipped");
    assert!(task.advance(2, None, Severity::Info));
    assert!(task.complete(Resolution::FailOnError, Some("import done"), Severity::Info));

    let events = drain(&mut rx);
    assert_eq!(
        kinds(&events),
        vec![
            EventKind::TaskAboutToStart,
            EventKind::StateChanged,
            EventKind::TaskStarted,
            EventKind::MessageLogged,
            EventKind::SubTaskAboutToComplete,
            EventKind::SubTaskCompleted,
            EventKind::MessageLogged,
            EventKind::MessageLogged,
            EventKind::BusyStateChanged,
            EventKind::SubTaskAboutToComplete,
            EventKind::SubTaskCompleted,
            EventKind::MessageLogged,
            EventKind::TaskAboutToComplete,
            EventKind::StateChanged,
            EventKind::TaskCompleted,
        ],
    );

    assert_eq!(task.state(), TaskState::Completed);
    assert_eq!(task.result(), TaskResult::SuccessfulWithWarnings);
    assert_eq!(task.completed_subtasks(), 3);
    assert_eq!(task.percent(), Some(100.0));

    let completed = events.last().expect("completion event present");
    assert_eq!(completed.result, Some(TaskResult::SuccessfulWithWarnings));
    assert_eq!(completed.completed, Some(3));
    assert_eq!(completed.expected, Some(3));
}

#[test]
fn event_seq_is_strictly_increasing() {
    let task = startable("seq");
    let mut rx = task.subscribe();

    task.start(Some(2), Some("go"), Severity::Info);
    task.advance(1, None, Severity::Info);
    task.log_error("bad row");
    task.complete(Resolution::SuccessOnError, None, Severity::Info);

    let events = drain(&mut rx);
    assert!(events.len() > 5, "scenario should publish several events");
    for pair in events.windows(2) {
        assert!(
            pair[0].seq < pair[1].seq,
            "seq must increase: {} then {}",
            pair[0].seq,
            pair[1].seq
        );
    }
}

#[test]
fn start_is_rejected_while_busy() {
    let task = startable("busy-guard");
    assert!(task.start(None, None, Severity::Info));

    let mut rx = task.subscribe();
    assert!(!task.start(None, None, Severity::Info), "second start must fail");
    assert!(drain(&mut rx).is_empty(), "rejected start publishes nothing");
    assert_eq!(task.state(), TaskState::Busy);
}

#[test]
fn start_is_rejected_without_capability() {
    let task = Task::new("incapable", TaskConfig::default());
    assert!(!task.start(None, None, Severity::Info));
    assert_eq!(task.state(), TaskState::Idle);

    task.set_can_start(true);
    assert!(task.start(None, None, Severity::Info));
}

#[test]
fn restart_resets_busy_progress_and_result() {
    let task = startable("restart");
    task.start(Some(2), None, Severity::Info);
    task.advance(2, None, Severity::Info);
    task.log_warning("wobbly");
    task.complete(Resolution::FailOnError, None, Severity::Info);
    assert_eq!(task.result(), TaskResult::SuccessfulWithWarnings);

    let mut rx = task.subscribe();
    assert!(task.start(Some(5), None, Severity::Info), "terminal states restart");

    assert_eq!(task.state(), TaskState::Busy);
    assert_eq!(task.busy_state(), taskpulse::BusyState::Clean);
    assert_eq!(task.result(), TaskResult::NoResult);
    assert_eq!(task.completed_subtasks(), 0);
    assert_eq!(task.expected_subtasks(), Some(5));

    let events = drain(&mut rx);
    assert_eq!(
        kinds(&events),
        vec![
            EventKind::TaskAboutToStart,
            EventKind::BusyStateChanged,
            EventKind::StateChanged,
            EventKind::TaskStarted,
        ],
        "the dirty busy state must reset with an event"
    );
}

#[test]
fn paused_task_can_be_restarted() {
    let task = startable("pause-restart");
    task.start(None, None, Severity::Info);
    assert!(task.pause());
    assert_eq!(task.state(), TaskState::Paused);

    assert!(task.start(None, None, Severity::Info), "paused tasks may restart");
    assert_eq!(task.state(), TaskState::Busy);
}

#[test]
fn busy_state_escalates_monotonically() {
    let task = startable("escalate");
    task.start(None, None, Severity::Info);

    task.log_error("broken");
    assert_eq!(task.busy_state(), taskpulse::BusyState::Errors);

    task.log_warning("minor");
    task.log_message("note");
    assert_eq!(
        task.busy_state(),
        taskpulse::BusyState::Errors,
        "lower severities must not de-escalate"
    );
}

#[test]
fn fail_on_error_derivation() {
    for (prepare, expected) in [
        (None, TaskResult::Successful),
        (Some(Severity::Warning), TaskResult::SuccessfulWithWarnings),
        (Some(Severity::Error), TaskResult::Failed),
    ] {
        let task = startable("derive");
        task.start(None, None, Severity::Info);
        if let Some(severity) = prepare {
            task.log("observed", severity);
        }
        task.complete(Resolution::FailOnError, None, Severity::Info);
        assert_eq!(task.result(), expected, "prepare={prepare:?}");
    }
}

#[test]
fn success_on_error_downgrades_errors_to_warnings() {
    let task = startable("lenient");
    task.start(None, None, Severity::Info);
    task.log_error("tolerated");
    task.complete(Resolution::SuccessOnError, None, Severity::Info);
    assert_eq!(task.result(), TaskResult::SuccessfulWithWarnings);
    assert_eq!(task.state(), TaskState::Completed);
}

#[test]
fn stop_request_wins_over_derivation() {
    let mut cfg = TaskConfig::default();
    cfg.can_start = true;
    cfg.can_stop = true;
    let task = Task::new("stoppable", cfg);

    task.start(None, None, Severity::Info);
    assert!(task.request_stop());
    assert!(task.stop_requested());

    task.complete(Resolution::FailOnError, Some("unwound"), Severity::Info);
    assert_eq!(task.result(), TaskResult::Stopped);
    assert_eq!(task.state(), TaskState::Stopped, "stopped runs get their own state");
}

#[test]
fn explicit_resolution_overrides_everything() {
    let mut cfg = TaskConfig::default();
    cfg.can_start = true;
    cfg.can_stop = true;
    let task = Task::new("explicit", cfg);

    task.start(None, None, Severity::Info);
    task.log_error("ignored by explicit result");
    task.request_stop();

    task.complete(
        Resolution::Explicit(TaskResult::Successful),
        None,
        Severity::Info,
    );
    assert_eq!(task.result(), TaskResult::Successful);
    assert_eq!(task.state(), TaskState::Completed);
}

#[test]
fn final_message_severity_feeds_the_derivation() {
    let task = startable("final-message");
    task.start(None, None, Severity::Info);

    // The completion message is logged before the result is resolved.
    task.complete(Resolution::FailOnError, Some("gave up"), Severity::Error);
    assert_eq!(task.result(), TaskResult::Failed);
}

#[test]
fn stop_token_is_fresh_per_run() {
    let mut cfg = TaskConfig::default();
    cfg.can_start = true;
    cfg.can_stop = true;
    let task = Task::new("token", cfg);

    task.start(None, None, Severity::Info);
    let first_run = task.stop_signal();
    task.request_stop();
    assert!(first_run.is_cancelled());
    task.complete(Resolution::FailOnError, None, Severity::Info);

    task.start(None, None, Severity::Info);
    assert!(!task.stop_requested(), "a new run gets a fresh stop token");
    assert!(first_run.is_cancelled(), "the old run's token stays cancelled");
}

#[test]
fn pause_and_resume_round_trip() {
    let task = startable("pausing");
    assert!(!task.pause(), "pause requires a busy task");

    task.start(None, None, Severity::Info);
    assert!(!task.resume(), "resume requires a paused task");

    let mut rx = task.subscribe();
    assert!(task.pause());
    assert!(!task.advance(1, None, Severity::Info), "paused tasks do not advance");
    assert!(task.resume());

    assert_eq!(
        kinds(&drain(&mut rx)),
        vec![
            EventKind::TaskAboutToPause,
            EventKind::StateChanged,
            EventKind::TaskPaused,
            EventKind::TaskAboutToResume,
            EventKind::StateChanged,
            EventKind::TaskResumed,
        ],
    );
}

#[test]
fn complete_works_from_paused() {
    let task = startable("paused-complete");
    task.start(None, None, Severity::Info);
    task.pause();

    assert!(task.complete(Resolution::FailOnError, None, Severity::Info));
    assert_eq!(task.state(), TaskState::Completed);
}

#[test]
fn advance_and_complete_require_an_active_run() {
    let task = startable("inactive");
    assert!(!task.advance(1, None, Severity::Info));
    assert!(!task.complete(Resolution::FailOnError, None, Severity::Info));
    assert_eq!(task.state(), TaskState::Idle);
    assert_eq!(task.result(), TaskResult::NoResult);
}

#[test]
fn requests_check_capabilities_and_publish_intent() {
    let task = Task::new("requests", TaskConfig::default());
    let mut rx = task.subscribe();
    let mut reqs = task.requests();

    assert!(!task.request_start());
    assert!(!task.request_stop());
    assert!(!task.request_pause());
    assert!(!task.request_resume());
    assert!(drain(&mut rx).is_empty(), "denied requests are silent");
    assert!(reqs.try_recv().is_err(), "denied requests send nothing");

    task.set_can_start(true);
    task.set_can_pause(true);
    assert!(task.request_start());
    assert!(task.request_pause());
    assert!(task.request_resume());

    assert_eq!(
        kinds(&drain(&mut rx)),
        vec![
            EventKind::StartRequested,
            EventKind::PauseRequested,
            EventKind::ResumeRequested,
        ],
    );
    assert_eq!(reqs.try_recv().ok(), Some(taskpulse::ControlRequest::Start));
    assert_eq!(reqs.try_recv().ok(), Some(taskpulse::ControlRequest::Pause));
    assert_eq!(reqs.try_recv().ok(), Some(taskpulse::ControlRequest::Resume));
}

#[test]
fn requests_never_mutate_state() {
    let mut cfg = TaskConfig::default();
    cfg.can_start = true;
    cfg.can_stop = true;
    cfg.can_pause = true;
    let task = Task::new("intent-only", cfg);

    task.request_start();
    assert_eq!(task.state(), TaskState::Idle, "request_start must not start");

    task.start(None, None, Severity::Info);
    task.request_pause();
    assert_eq!(task.state(), TaskState::Busy, "request_pause must not pause");
}

#[test]
fn lifetime_policy_destroys_after_completion() {
    let mut cfg = TaskConfig::default();
    cfg.can_start = true;
    cfg.lifetime = LifetimePolicy {
        on_successful: true,
        ..LifetimePolicy::manual()
    };
    let task = Task::new("ephemeral", cfg);
    let mut rx = task.subscribe();

    task.start(None, None, Severity::Info);
    task.complete(Resolution::FailOnError, None, Severity::Info);

    assert!(task.is_destroyed());
    let events = drain(&mut rx);
    let tail: Vec<EventKind> = kinds(&events).into_iter().rev().take(2).collect();
    assert_eq!(
        tail,
        vec![EventKind::TaskDestroyed, EventKind::TaskCompleted],
        "destruction must follow the completion event"
    );
}

#[test]
fn lifetime_policy_ignores_non_matching_outcomes() {
    let mut cfg = TaskConfig::default();
    cfg.can_start = true;
    cfg.lifetime = LifetimePolicy {
        on_failed: true,
        ..LifetimePolicy::manual()
    };
    let task = Task::new("sticky", cfg);

    task.start(None, None, Severity::Info);
    task.complete(Resolution::FailOnError, None, Severity::Info);
    assert_eq!(task.result(), TaskResult::Successful);
    assert!(!task.is_destroyed(), "successful run must not trigger on_failed");
}

#[test]
fn destroyed_task_rejects_every_operation() {
    let mut cfg = TaskConfig::default();
    cfg.can_start = true;
    cfg.can_stop = true;
    cfg.can_pause = true;
    let task = Task::new("gone", cfg);
    task.destroy();
    assert!(task.is_destroyed());

    let mut rx = task.subscribe();
    assert!(!task.start(None, None, Severity::Info));
    assert!(!task.advance(1, None, Severity::Info));
    assert!(!task.complete(Resolution::FailOnError, None, Severity::Info));
    assert!(!task.pause());
    assert!(!task.resume());
    assert!(!task.request_start());
    assert!(!task.request_stop());
    task.log_error("shouting into the void");
    assert!(drain(&mut rx).is_empty(), "destroyed tasks publish nothing");
}

#[test]
fn destroy_is_idempotent() {
    let task = Task::new("once", TaskConfig::default());
    let mut rx = task.subscribe();
    task.destroy();
    task.destroy();

    let destroyed = drain(&mut rx)
        .iter()
        .filter(|e| e.kind == EventKind::TaskDestroyed)
        .count();
    assert_eq!(destroyed, 1, "TaskDestroyed must be published exactly once");
}

#[test]
fn display_name_and_kind_changes_publish_once() {
    let task = Task::new("meta", TaskConfig::default());
    let mut rx = task.subscribe();

    task.set_display_name("Import (nightly)");
    task.set_display_name("Import (nightly)");
    task.set_kind(taskpulse::TaskKind::Global);
    task.set_kind(taskpulse::TaskKind::Global);

    let events = drain(&mut rx);
    assert_eq!(
        kinds(&events),
        vec![EventKind::DisplayNameChanged, EventKind::KindChanged],
        "unchanged values must not publish"
    );
    assert_eq!(events[0].message.as_deref(), Some("Import (nightly)"));
    assert_eq!(&*task.display_name(), "Import (nightly)");
    assert_eq!(task.kind(), taskpulse::TaskKind::Global);
}

#[test]
fn indeterminate_runs_have_no_percent() {
    let task = startable("indeterminate");
    task.start(None, None, Severity::Info);
    task.advance(7, None, Severity::Info);

    assert_eq!(task.percent(), None);
    assert_eq!(task.completed_subtasks(), 7);
    assert_eq!(task.expected_subtasks(), None);
}

#[test]
fn over_reporting_clamps_to_expected() {
    let task = startable("clamped");
    task.start(Some(3), None, Severity::Info);
    task.advance(5, None, Severity::Info);

    assert_eq!(task.completed_subtasks(), 3);
    assert_eq!(task.percent(), Some(100.0));
}
