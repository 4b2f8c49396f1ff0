// meridian_sim/src/executor.rs

//! Cooperative rate scheduler.
//!
//! The executor owns the node list, the clock and the simulation context.
//! A tick is atomic: every eligible node runs to completion in priority
//! order, then the clock advances. Rescheduling is relative to the
//! observed time, which bounds phase drift to one clock period per node
//! and avoids catch-up bursts after a slow tick.

use tracing::{debug, error, info, warn};

use crate::clock::SimClock;
use crate::context::SimContext;
use crate::episode::{EpisodeMetrics, EpisodeOutcome, EpisodeStatus, NodeRunStats};
use crate::error::{ConfigError, NodeError, SimError};
use crate::node::{Node, NodeStatus};

/// Slack for the floating-point eligibility comparison.
const SCHEDULE_EPS: f64 = 1e-9;

/// Lifecycle of the executor. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecState {
    Created,
    Initialized,
    Running,
    Stopped,
}

/// Optional external stop predicate, checked at the top of each tick.
pub type StopCondition = Box<dyn FnMut(&SimContext) -> bool>;

struct ScheduledNode {
    node: Box<dyn Node>,
    period: f64,
    /// Next eligible time; zero so every node is eligible at t = 0.
    next_time: f64,
    initialized: bool,
    runs: u64,
    skipped: u64,
    failed: u64,
}

/// Drives one episode to completion.
pub struct Executor {
    nodes: Vec<ScheduledNode>,
    clock: SimClock,
    ctx: SimContext,
    state: ExecState,
    stop_condition: Option<StopCondition>,
}

impl Executor {
    pub fn new(clock: SimClock, ctx: SimContext) -> Self {
        Self {
            nodes: Vec::new(),
            clock,
            ctx,
            state: ExecState::Created,
            stop_condition: None,
        }
    }

    /// Registers a node. Nodes run in ascending priority order; ties keep
    /// registration order.
    pub fn add_node(&mut self, node: Box<dyn Node>) -> Result<(), ConfigError> {
        let rate = node.rate_hz();
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ConfigError::InvalidRate {
                node: node.name().to_owned(),
                rate,
            });
        }
        self.nodes.push(ScheduledNode {
            period: 1.0 / rate,
            next_time: 0.0,
            initialized: false,
            runs: 0,
            skipped: 0,
            failed: 0,
            node,
        });
        Ok(())
    }

    pub fn set_stop_condition(&mut self, condition: StopCondition) {
        self.stop_condition = Some(condition);
    }

    pub fn state(&self) -> ExecState {
        self.state
    }

    pub fn context(&self) -> &SimContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut SimContext {
        &mut self.ctx
    }

    /// Runs the episode until the duration elapses, the stop predicate
    /// fires, a termination cause is latched, or a node raises a fatal
    /// error. Every initialised node receives exactly one `on_shutdown`
    /// call on every one of those paths.
    pub fn run(&mut self, duration: f64) -> Result<EpisodeOutcome, SimError> {
        if self.state != ExecState::Created {
            return Err(SimError::InvalidState(self.state));
        }

        // Stable sort: ascending priority, ties keep registration order.
        self.nodes.sort_by_key(|scheduled| scheduled.node.priority());

        // Init sweep in priority order. A failure here still unwinds the
        // nodes that were already initialised.
        for i in 0..self.nodes.len() {
            match self.nodes[i].node.on_init(&mut self.ctx) {
                Ok(()) => self.nodes[i].initialized = true,
                Err(source) => {
                    let node = self.nodes[i].node.name().to_owned();
                    error!(node = %node, error = %source, "node failed to initialise");
                    self.shutdown_sweep();
                    self.state = ExecState::Stopped;
                    return Err(SimError::Node { node, source });
                }
            }
        }
        self.state = ExecState::Initialized;
        debug!(nodes = self.nodes.len(), "all nodes initialised");

        self.state = ExecState::Running;
        let mut fatal: Option<(String, NodeError)> = None;

        'episode: while self.clock.now() + SCHEDULE_EPS < duration {
            if let Some(condition) = self.stop_condition.as_mut() {
                if condition(&self.ctx) {
                    debug!(t = self.clock.now(), "stop condition fired");
                    break;
                }
            }
            if self.ctx.frame.termination_signal() {
                break;
            }

            let now = self.clock.now();
            for scheduled in &mut self.nodes {
                if now + SCHEDULE_EPS < scheduled.next_time {
                    continue;
                }
                match scheduled.node.on_run(now, &mut self.ctx) {
                    Ok(NodeStatus::Ok) => scheduled.runs += 1,
                    Ok(NodeStatus::Skipped) => {
                        scheduled.runs += 1;
                        scheduled.skipped += 1;
                    }
                    Ok(NodeStatus::Failed) => {
                        scheduled.runs += 1;
                        scheduled.failed += 1;
                        debug!(node = scheduled.node.name(), t = now, "node reported Failed");
                    }
                    Err(source) => {
                        fatal = Some((scheduled.node.name().to_owned(), source));
                        break 'episode;
                    }
                }
                scheduled.next_time = now + scheduled.period;
            }

            self.clock.tick();
        }

        // The shutdown sweep runs on every exit path, fatal included.
        self.shutdown_sweep();
        self.state = ExecState::Stopped;

        let status = match fatal {
            Some((node, source)) => {
                error!(node = %node, error = %source, "episode aborted by fatal node error");
                EpisodeStatus::Error { node }
            }
            None => match self.ctx.frame.termination() {
                Some(cause) => cause.into(),
                None => EpisodeStatus::Timeout,
            },
        };

        let outcome = EpisodeOutcome {
            status,
            metrics: self.collect_metrics(),
            node_stats: self.collect_node_stats(),
        };
        info!(status = ?outcome.status, t = self.clock.now(), "episode finished");
        Ok(outcome)
    }

    fn shutdown_sweep(&mut self) {
        for scheduled in self.nodes.iter_mut().rev() {
            if scheduled.initialized {
                scheduled.node.on_shutdown(&mut self.ctx);
                scheduled.initialized = false;
            }
        }
    }

    fn collect_metrics(&self) -> EpisodeMetrics {
        let progress = self.ctx.frame.progress().copied().unwrap_or_default();
        EpisodeMetrics {
            distance_travelled: progress.distance_travelled,
            checkpoints_passed: progress.checkpoints_passed,
            max_lateral_deviation: progress.max_lateral_deviation,
            duration_sim: self.clock.now(),
        }
    }

    fn collect_node_stats(&self) -> Vec<NodeRunStats> {
        self.nodes
            .iter()
            .map(|scheduled| {
                let stats = NodeRunStats {
                    name: scheduled.node.name().to_owned(),
                    runs: scheduled.runs,
                    skipped: scheduled.skipped,
                    failed: scheduled.failed,
                };
                if stats.skipped > 0 || stats.failed > 0 {
                    warn!(
                        node = %stats.name,
                        skipped = stats.skipped,
                        failed = stats.failed,
                        "node reported non-fatal misses"
                    );
                }
                stats
            })
            .collect()
    }
}
