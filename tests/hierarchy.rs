//! Parent links, log forwarding and engine routing.

use std::sync::Arc;

use tokio::sync::broadcast;

use taskpulse::{
    BusyState, EventKind, LifetimePolicy, MemoryEngine, Resolution, Severity, Task, TaskBuilder,
    TaskConfig, TaskError, TaskEvent, TaskRef, TaskState,
};

fn named(name: &str) -> TaskRef {
    Task::new(name, TaskConfig::default())
}

fn with_engine(name: &str) -> (TaskRef, Arc<MemoryEngine>) {
    let task = named(name);
    let engine = Arc::new(MemoryEngine::new());
    task.set_logger_engine(engine.clone());
    (task, engine)
}

fn drain(rx: &mut broadcast::Receiver<TaskEvent>) -> Vec<TaskEvent> {
    let mut events = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        events.push(ev);
    }
    events
}

#[test]
fn child_messages_forward_upward_through_the_chain() {
    let (root, root_engine) = with_engine("root");
    let (mid, mid_engine) = with_engine("mid");
    let (leaf, leaf_engine) = with_engine("leaf");

    mid.set_parent(&root).expect("link mid under root");
    leaf.set_parent(&mid).expect("link leaf under mid");

    leaf.log_warning("disk almost full");

    for (who, engine) in [
        ("leaf", &leaf_engine),
        ("mid", &mid_engine),
        ("root", &root_engine),
    ] {
        let records = engine.records();
        assert_eq!(records.len(), 1, "{who} should hold exactly one record");
        assert_eq!(records[0].task.as_ref(), "leaf", "{who} sees the origin name");
        assert_eq!(records[0].severity, Severity::Warning);
    }
}

#[test]
fn forwarded_messages_reemit_with_origin() {
    let parent = named("parent");
    let child = named("child");
    child.set_parent(&parent).expect("link child under parent");

    let mut parent_rx = parent.subscribe();
    let mut child_rx = child.subscribe();
    child.log_message("hello");

    let child_events = drain(&mut child_rx);
    assert_eq!(child_events.len(), 1);
    assert_eq!(child_events[0].kind, EventKind::MessageLogged);
    assert_eq!(child_events[0].origin, None, "own messages carry no origin");

    let parent_events = drain(&mut parent_rx);
    assert_eq!(parent_events.len(), 1, "each hop re-emits the message");
    assert_eq!(parent_events[0].kind, EventKind::MessageLogged);
    assert_eq!(parent_events[0].task.as_ref(), "parent");
    assert_eq!(parent_events[0].origin.as_deref(), Some("child"));
}

#[test]
fn forwarded_severity_escalates_only_active_ancestors() {
    let mut cfg = TaskConfig::default();
    cfg.can_start = true;
    let parent = Task::new("parent", cfg);
    let child = named("child");
    child.set_parent(&parent).expect("link child under parent");

    // Parent idle: the record is stored but the busy state stays put.
    child.log_error("early failure");
    assert_eq!(parent.busy_state(), BusyState::Clean);

    parent.start(None, None, Severity::Info);
    child.log_error("mid-run failure");
    assert_eq!(parent.busy_state(), BusyState::Errors);
    assert_eq!(
        child.busy_state(),
        BusyState::Clean,
        "the idle child itself must not escalate"
    );
}

#[test]
fn parent_destruction_clears_the_link_silently() {
    let parent = named("parent");
    let (child, child_engine) = with_engine("child");
    child.set_parent(&parent).expect("link child under parent");

    let mut child_rx = child.subscribe();
    parent.destroy();

    assert!(child.parent().is_none(), "the dangling link must be cleared");
    assert!(!child.is_destroyed(), "children are not destroyed with the parent");
    assert_eq!(child.state(), TaskState::Idle);
    assert!(
        drain(&mut child_rx).is_empty(),
        "losing a parent publishes nothing on the child"
    );

    // The child keeps working on its own.
    child.log_message("still here");
    assert_eq!(child_engine.len(), 1);
}

#[test]
fn destroy_detaches_from_the_parent_side_too() {
    let (parent, parent_engine) = with_engine("parent");
    let child = named("child");
    child.set_parent(&parent).expect("link child under parent");

    child.log_message("forwarded");
    assert_eq!(parent_engine.len(), 1);

    child.destroy();
    assert!(child.parent().is_none());

    // No further forwarding can happen; parent records are untouched.
    assert_eq!(parent_engine.len(), 1);
    assert!(!parent.is_destroyed());
}

#[test]
fn self_parenting_is_rejected() {
    let task = named("narcissus");
    let err = task.set_parent(&task).expect_err("self link must fail");
    assert!(matches!(err, TaskError::ParentCycle { .. }), "got {err:?}");
}

#[test]
fn direct_and_transitive_cycles_are_rejected() {
    let a = named("a");
    let b = named("b");
    let c = named("c");

    a.set_parent(&b).expect("a under b");
    let err = b.set_parent(&a).expect_err("direct cycle must fail");
    assert!(matches!(err, TaskError::ParentCycle { .. }), "got {err:?}");

    b.set_parent(&c).expect("b under c");
    let err = c.set_parent(&a).expect_err("transitive cycle must fail");
    assert!(matches!(err, TaskError::ParentCycle { .. }), "got {err:?}");

    // The rejected links must leave the chain intact: a -> b -> c.
    assert!(a.parent().is_some());
    assert!(b.parent().is_some());
    assert!(c.parent().is_none());
}

#[test]
fn destroyed_endpoints_cannot_be_linked() {
    let alive = named("alive");
    let gone = named("gone");
    gone.destroy();

    let err = gone.set_parent(&alive).expect_err("destroyed child must fail");
    assert!(matches!(err, TaskError::Destroyed { .. }), "got {err:?}");

    let err = alive.set_parent(&gone).expect_err("destroyed parent must fail");
    assert!(matches!(err, TaskError::Destroyed { .. }), "got {err:?}");
    assert!(alive.parent().is_none());
}

#[test]
fn remove_parent_stops_forwarding() {
    let (parent, parent_engine) = with_engine("parent");
    let child = named("child");
    child.set_parent(&parent).expect("link child under parent");

    child.log_message("one");
    child.remove_parent();
    child.log_message("two");

    assert_eq!(parent_engine.len(), 1, "only the linked-phase message forwards");
    assert!(child.parent().is_none());
}

#[test]
fn reparenting_moves_forwarding() {
    let (first, first_engine) = with_engine("first");
    let (second, second_engine) = with_engine("second");
    let child = named("child");

    child.set_parent(&first).expect("link child under first");
    child.log_message("to first");
    child.set_parent(&second).expect("relink child under second");
    child.log_message("to second");

    assert_eq!(first_engine.len(), 1);
    assert_eq!(second_engine.len(), 1);
    assert_eq!(second_engine.last().unwrap().message.as_ref(), "to second");
}

#[test]
fn custom_engine_routing_and_only_flag() {
    let (task, own) = with_engine("routed");
    let custom = Arc::new(MemoryEngine::new());

    task.set_custom_engine(custom.clone(), false);
    task.log_message("both sinks");
    assert_eq!(own.len(), 1);
    assert_eq!(custom.len(), 1);

    task.set_custom_engine(custom.clone(), true);
    task.log_message("custom only");
    assert_eq!(own.len(), 1, "the only flag bypasses the private engine");
    assert_eq!(custom.len(), 2);

    task.remove_custom_engine();
    task.log_message("own again");
    assert_eq!(own.len(), 2);
    assert_eq!(custom.len(), 2);
    assert!(task.custom_engine().is_none());
}

#[test]
fn custom_only_still_forwards_and_reemits() {
    let (parent, parent_engine) = with_engine("parent");
    let task = named("custom-only");
    task.set_parent(&parent).expect("link under parent");
    task.set_custom_engine(Arc::new(MemoryEngine::new()), true);

    let mut rx = task.subscribe();
    task.log_warning("routed around the private engine");

    assert_eq!(drain(&mut rx).len(), 1, "MessageLogged is still published");
    assert_eq!(parent_engine.len(), 1, "forwarding ignores the only flag");
}

#[test]
fn start_clears_the_private_engine_by_default() {
    let task = TaskBuilder::new("fresh-log").with_can_start(true).build();
    let engine = Arc::new(MemoryEngine::new());
    task.set_logger_engine(engine.clone());

    task.log_message("stale entry");
    assert_eq!(engine.len(), 1);

    task.start(None, Some("run begins"), Severity::Info);
    let records = engine.records();
    assert_eq!(records.len(), 1, "the old log must be purged at start");
    assert_eq!(records[0].message.as_ref(), "run begins");
}

#[test]
fn start_keeps_the_log_when_configured() {
    let task = TaskBuilder::new("keep-log")
        .with_can_start(true)
        .with_clear_log_on_start(false)
        .build();
    let engine = Arc::new(MemoryEngine::new());
    task.set_logger_engine(engine.clone());

    task.log_message("previous run");
    task.start(None, Some("next run"), Severity::Info);

    let messages: Vec<String> = engine
        .records()
        .iter()
        .map(|r| r.message.to_string())
        .collect();
    assert_eq!(messages, vec!["previous run".to_string(), "next run".to_string()]);
}

#[test]
fn clear_log_purges_only_the_private_engine() {
    let (task, own) = with_engine("manual-clear");
    let custom = Arc::new(MemoryEngine::new());
    task.set_custom_engine(custom.clone(), false);

    task.log_message("kept by custom");
    task.clear_log();

    assert!(own.is_empty());
    assert_eq!(custom.len(), 1, "shared engines are not the task's to clear");
}

#[test]
fn tasks_without_logging_still_forward_and_publish() {
    let (parent, parent_engine) = with_engine("parent");
    let quiet = TaskBuilder::new("quiet").with_logging(false).build();
    quiet.set_parent(&parent).expect("link under parent");

    let mut rx = quiet.subscribe();
    quiet.log_error("no private sink");

    assert!(quiet.logger_engine().is_none());
    assert_eq!(drain(&mut rx).len(), 1);
    assert_eq!(parent_engine.len(), 1);
}

#[test]
fn stop_request_with_lifetime_policy_destroys_after_the_run() {
    let mut cfg = TaskConfig::default();
    cfg.can_start = true;
    cfg.can_stop = true;
    cfg.lifetime = LifetimePolicy {
        on_stopped: true,
        ..LifetimePolicy::manual()
    };
    let task = Task::new("one-shot", cfg);
    let mut rx = task.subscribe();
    let mut reqs = task.requests();

    assert!(task.start(Some(10), None, Severity::Info));
    let stop = task.stop_signal();

    assert!(task.request_stop());
    assert_eq!(reqs.try_recv().ok(), Some(taskpulse::ControlRequest::Stop));
    assert!(stop.is_cancelled(), "the worker-side token observes the request");

    // The worker unwinds and reports completion; the derive sees the stop.
    assert!(task.complete(Resolution::FailOnError, Some("unwound"), Severity::Info));
    assert_eq!(task.state(), TaskState::Stopped);
    assert!(task.is_destroyed(), "on_stopped lifetime must self-destruct");

    let events = drain(&mut rx);
    assert_eq!(
        events.last().map(|e| e.kind),
        Some(EventKind::TaskDestroyed),
        "destruction is the final event"
    );

    assert!(!task.start(None, None, Severity::Info));
    assert!(!task.request_start());
}

#[test]
fn engines_are_released_on_destroy() {
    let (task, own) = with_engine("released");
    task.log_message("last words");
    assert_eq!(own.len(), 1);

    task.destroy();
    task.log_message("ignored");
    assert_eq!(own.len(), 1, "destroyed tasks must not touch engines");
    assert!(task.logger_engine().is_none());
}
