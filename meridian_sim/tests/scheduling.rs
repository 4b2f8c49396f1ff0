// meridian_sim/tests/scheduling.rs

//! Executor contract tests: ordering, rates, lifecycle and the shutdown
//! guarantee.

use std::cell::RefCell;
use std::rc::Rc;

use meridian_core::obstacle::ObstacleField;
use meridian_sim::blackboard::{topics, Message, Termination};
use meridian_sim::clock::SimClock;
use meridian_sim::config::track::build_world;
use meridian_sim::config::TrackConfig;
use meridian_sim::context::SimContext;
use meridian_sim::error::{NodeError, SimError};
use meridian_sim::executor::{ExecState, Executor};
use meridian_sim::node::{Node, NodeStatus};

#[derive(Clone, Default)]
struct EventLog(Rc<RefCell<Vec<String>>>);

impl EventLog {
    fn push(&self, event: impl Into<String>) {
        self.0.borrow_mut().push(event.into());
    }

    fn events(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    fn count_of(&self, prefix: &str) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .count()
    }
}

/// A configurable probe node for exercising the executor.
struct ProbeNode {
    name: &'static str,
    rate_hz: f64,
    priority: i32,
    log: EventLog,
    fail_init: bool,
    fatal_at: Option<f64>,
    raise_at: Option<(f64, Termination)>,
}

impl ProbeNode {
    fn new(name: &'static str, rate_hz: f64, priority: i32, log: EventLog) -> Self {
        Self {
            name,
            rate_hz,
            priority,
            log,
            fail_init: false,
            fatal_at: None,
            raise_at: None,
        }
    }
}

impl Node for ProbeNode {
    fn name(&self) -> &str {
        self.name
    }

    fn rate_hz(&self) -> f64 {
        self.rate_hz
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn on_init(&mut self, _ctx: &mut SimContext) -> Result<(), NodeError> {
        self.log.push(format!("init:{}", self.name));
        if self.fail_init {
            return Err(NodeError::Other("probe init failure".to_owned()));
        }
        Ok(())
    }

    fn on_run(&mut self, now: f64, ctx: &mut SimContext) -> Result<NodeStatus, NodeError> {
        self.log.push(format!("run:{}", self.name));
        if let Some(t) = self.fatal_at {
            if now >= t - 1e-9 {
                return Err(NodeError::Other("probe fatal".to_owned()));
            }
        }
        if let Some((t, cause)) = self.raise_at {
            if now >= t - 1e-9 {
                ctx.frame.raise_termination(cause);
            }
        }
        Ok(NodeStatus::Ok)
    }

    fn on_shutdown(&mut self, _ctx: &mut SimContext) {
        self.log.push(format!("shutdown:{}", self.name));
    }
}

fn test_context() -> SimContext {
    let track = TrackConfig {
        points: vec![[0.0, 0.0], [100.0, 0.0]],
        half_width: 3.5,
        off_track_margin: 0.5,
        checkpoint_spacing: 50.0,
    };
    let geometry = build_world(&track).unwrap();
    SimContext::new(
        meridian_sim::world::WorldState::new(geometry, ObstacleField::new(Vec::new())),
        0,
    )
}

fn executor_at_100hz() -> Executor {
    Executor::new(SimClock::new(100.0), test_context())
}

#[test]
fn priority_orders_execution_and_ties_keep_registration_order() {
    let log = EventLog::default();
    let mut executor = executor_at_100hz();
    executor
        .add_node(Box::new(ProbeNode::new("a", 100.0, 2, log.clone())))
        .unwrap();
    executor
        .add_node(Box::new(ProbeNode::new("b", 100.0, 1, log.clone())))
        .unwrap();
    executor
        .add_node(Box::new(ProbeNode::new("c", 100.0, 2, log.clone())))
        .unwrap();

    // One tick only.
    executor.run(0.01).unwrap();

    assert_eq!(
        log.events(),
        vec![
            "init:b", "init:a", "init:c", "run:b", "run:a", "run:c", "shutdown:c", "shutdown:a",
            "shutdown:b",
        ]
    );
}

#[test]
fn invocation_counts_match_declared_rates() {
    let log = EventLog::default();
    let mut executor = executor_at_100hz();
    for (name, rate) in [("full", 100.0), ("half", 50.0), ("ten", 10.0), ("seven", 7.0)] {
        executor
            .add_node(Box::new(ProbeNode::new(name, rate, 0, log.clone())))
            .unwrap();
    }

    let duration = 2.0;
    executor.run(duration).unwrap();

    for (name, rate) in [("full", 100.0), ("half", 50.0), ("ten", 10.0), ("seven", 7.0)] {
        let count = log.count_of(&format!("run:{name}")) as i64;
        let expected = (duration * rate).floor() as i64;
        assert!(
            (count - expected).abs() <= 1,
            "{name}: {count} invocations, expected {expected} +- 1"
        );
    }
}

#[test]
fn rejects_non_positive_rates_at_registration() {
    let log = EventLog::default();
    let mut executor = executor_at_100hz();
    let err = executor
        .add_node(Box::new(ProbeNode::new("bad", 0.0, 0, log)))
        .unwrap_err();
    assert!(err.to_string().contains("must be positive"));
}

#[test]
fn every_exit_path_runs_the_shutdown_sweep_exactly_once() {
    // Timeout path.
    let log = EventLog::default();
    let mut executor = executor_at_100hz();
    executor
        .add_node(Box::new(ProbeNode::new("a", 100.0, 0, log.clone())))
        .unwrap();
    executor
        .add_node(Box::new(ProbeNode::new("b", 100.0, 1, log.clone())))
        .unwrap();
    executor.run(0.1).unwrap();
    assert_eq!(log.count_of("shutdown:a"), 1);
    assert_eq!(log.count_of("shutdown:b"), 1);

    // Termination-signal path.
    let log = EventLog::default();
    let mut executor = executor_at_100hz();
    let mut raiser = ProbeNode::new("raiser", 100.0, 0, log.clone());
    raiser.raise_at = Some((0.05, Termination::Collision));
    executor.add_node(Box::new(raiser)).unwrap();
    executor
        .add_node(Box::new(ProbeNode::new("other", 100.0, 1, log.clone())))
        .unwrap();
    let outcome = executor.run(10.0).unwrap();
    assert_eq!(
        outcome.status,
        meridian_sim::episode::EpisodeStatus::Collision
    );
    assert_eq!(log.count_of("shutdown:raiser"), 1);
    assert_eq!(log.count_of("shutdown:other"), 1);
    // The episode stopped long before the cap.
    assert!(outcome.metrics.duration_sim < 1.0);

    // Stop-predicate path.
    let log = EventLog::default();
    let mut executor = executor_at_100hz();
    executor
        .add_node(Box::new(ProbeNode::new("a", 100.0, 0, log.clone())))
        .unwrap();
    executor.set_stop_condition(Box::new(|ctx| ctx.frame.get("halt").is_some()));
    executor
        .context_mut()
        .frame
        .publish("halt", Message::Progress(Default::default()));
    let outcome = executor.run(10.0).unwrap();
    assert_eq!(outcome.status, meridian_sim::episode::EpisodeStatus::Timeout);
    assert_eq!(log.count_of("run:a"), 0);
    assert_eq!(log.count_of("shutdown:a"), 1);

    // Fatal-error path: shutdown still reaches every initialised node.
    let log = EventLog::default();
    let mut executor = executor_at_100hz();
    let mut fatal = ProbeNode::new("fatal", 100.0, 1, log.clone());
    fatal.fatal_at = Some(0.05);
    executor
        .add_node(Box::new(ProbeNode::new("a", 100.0, 0, log.clone())))
        .unwrap();
    executor.add_node(Box::new(fatal)).unwrap();
    let outcome = executor.run(10.0).unwrap();
    assert_eq!(
        outcome.status,
        meridian_sim::episode::EpisodeStatus::Error {
            node: "fatal".to_owned()
        }
    );
    assert_eq!(log.count_of("shutdown:a"), 1);
    assert_eq!(log.count_of("shutdown:fatal"), 1);
}

#[test]
fn init_failure_unwinds_only_initialised_nodes() {
    let log = EventLog::default();
    let mut executor = executor_at_100hz();
    executor
        .add_node(Box::new(ProbeNode::new("first", 100.0, 0, log.clone())))
        .unwrap();
    let mut failing = ProbeNode::new("failing", 100.0, 1, log.clone());
    failing.fail_init = true;
    executor.add_node(Box::new(failing)).unwrap();
    executor
        .add_node(Box::new(ProbeNode::new("last", 100.0, 2, log.clone())))
        .unwrap();

    let err = executor.run(1.0).unwrap_err();
    assert!(matches!(err, SimError::Node { ref node, .. } if node == "failing"));
    assert_eq!(
        log.events(),
        vec!["init:first", "init:failing", "shutdown:first"]
    );
    assert_eq!(executor.state(), ExecState::Stopped);
}

#[test]
fn executor_is_single_shot() {
    let mut executor = executor_at_100hz();
    executor.run(0.01).unwrap();
    let err = executor.run(0.01).unwrap_err();
    assert!(matches!(err, SimError::InvalidState(ExecState::Stopped)));
}

/// Writer/reader pair on the same tick: the lower-priority reader must see
/// the value written by the higher-priority writer of the same tick.
struct WriterNode;
struct ReaderNode {
    log: EventLog,
}

impl Node for WriterNode {
    fn name(&self) -> &str {
        "writer"
    }

    fn rate_hz(&self) -> f64 {
        100.0
    }

    fn priority(&self) -> i32 {
        0
    }

    fn on_run(&mut self, now: f64, ctx: &mut SimContext) -> Result<NodeStatus, NodeError> {
        ctx.frame.publish(
            topics::CONTROL_CMD,
            Message::Control(meridian_core::messages::ControlCommand {
                steer: 0.0,
                accel: 0.0,
                timestamp: now,
            }),
        );
        Ok(NodeStatus::Ok)
    }
}

impl Node for ReaderNode {
    fn name(&self) -> &str {
        "reader"
    }

    fn rate_hz(&self) -> f64 {
        100.0
    }

    fn priority(&self) -> i32 {
        1
    }

    fn on_run(&mut self, now: f64, ctx: &mut SimContext) -> Result<NodeStatus, NodeError> {
        let command = ctx.frame.control_command().expect("writer ran first");
        assert_eq!(command.timestamp, now);
        self.log.push("saw-current-tick");
        Ok(NodeStatus::Ok)
    }
}

#[test]
fn readers_observe_same_tick_writes_of_higher_priority_nodes() {
    let log = EventLog::default();
    let mut executor = executor_at_100hz();
    executor.add_node(Box::new(WriterNode)).unwrap();
    executor
        .add_node(Box::new(ReaderNode { log: log.clone() }))
        .unwrap();
    executor.run(0.05).unwrap();
    assert_eq!(log.count_of("saw-current-tick"), 5);
}
