// meridian_sim/src/node.rs

//! The schedulable unit contract.

use crate::context::SimContext;
use crate::error::NodeError;

/// Outcome of one node invocation. `Skipped` and `Failed` are recorded by
/// the executor but are not fatal; a node signals a fatal condition by
/// returning `Err(NodeError)` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    Ok,
    Skipped,
    Failed,
}

/// A unit scheduled by the executor at a declared rate and priority.
///
/// Lifecycle: `on_init` once before the first tick (in priority order),
/// `on_run` whenever the node is eligible, `on_shutdown` exactly once on
/// every exit path (in reverse priority order). Eligibility bookkeeping
/// (`next_time` and the epsilon comparison) is owned by the executor, not
/// the node.
pub trait Node {
    fn name(&self) -> &str;

    /// Execution rate in Hz. Must be positive; validated at registration.
    fn rate_hz(&self) -> f64;

    /// Lower priorities run earlier within a tick. Ties keep registration
    /// order.
    fn priority(&self) -> i32;

    fn on_init(&mut self, _ctx: &mut SimContext) -> Result<(), NodeError> {
        Ok(())
    }

    fn on_run(&mut self, now: f64, ctx: &mut SimContext) -> Result<NodeStatus, NodeError>;

    fn on_shutdown(&mut self, _ctx: &mut SimContext) {}
}
