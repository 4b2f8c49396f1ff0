// meridian_sim/src/nodes/follower.rs

//! In-tree planner/controller nodes.
//!
//! External (learned) controllers plug in through the same blackboard
//! contract; these two cover scenario driving and open-loop experiments.

use meridian_core::messages::ControlCommand;
use meridian_core::models::bicycle::VehicleParams;

use crate::blackboard::{topics, Message};
use crate::context::SimContext;
use crate::error::NodeError;
use crate::node::{Node, NodeStatus};

/// Pure-pursuit steering on the centreline with proportional speed
/// control toward a target speed.
pub struct CenterlineFollowerNode {
    rate_hz: f64,
    priority: i32,
    wheelbase: f64,
    max_steer: f64,
    lookahead: f64,
    target_speed: f64,
    speed_gain: f64,
}

impl CenterlineFollowerNode {
    pub fn new(
        params: &VehicleParams,
        lookahead: f64,
        target_speed: f64,
        speed_gain: f64,
        rate_hz: f64,
        priority: i32,
    ) -> Self {
        Self {
            rate_hz,
            priority,
            wheelbase: params.wheelbase,
            max_steer: params.max_steer,
            lookahead,
            target_speed,
            speed_gain,
        }
    }
}

impl Node for CenterlineFollowerNode {
    fn name(&self) -> &str {
        "follower"
    }

    fn rate_hz(&self) -> f64 {
        self.rate_hz
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn on_run(&mut self, now: f64, ctx: &mut SimContext) -> Result<NodeStatus, NodeError> {
        let Some(state) = ctx.frame.vehicle_state().copied() else {
            return Ok(NodeStatus::Skipped);
        };
        let centerline = &ctx.world.geometry.centerline;

        let frenet = centerline.project(state.pose().position());
        let target = centerline.sample(frenet.s + self.lookahead);
        let local = state.pose().inverse_transform_point(target.position());

        // Pure pursuit: curvature through the lookahead point.
        let alpha = local.y.atan2(local.x);
        let steer = (2.0 * self.wheelbase * alpha.sin() / self.lookahead)
            .atan()
            .clamp(-self.max_steer, self.max_steer);
        let accel = self.speed_gain * (self.target_speed - state.vx);

        ctx.frame.publish(
            topics::CONTROL_CMD,
            Message::Control(ControlCommand {
                steer,
                accel,
                timestamp: now,
            }),
        );
        Ok(NodeStatus::Ok)
    }
}

/// Publishes a fixed command every invocation. Used by open-loop
/// experiments such as step-response runs.
pub struct ScriptedCommandNode {
    rate_hz: f64,
    priority: i32,
    steer: f64,
    accel: f64,
}

impl ScriptedCommandNode {
    pub fn new(steer: f64, accel: f64, rate_hz: f64, priority: i32) -> Self {
        Self {
            rate_hz,
            priority,
            steer,
            accel,
        }
    }
}

impl Node for ScriptedCommandNode {
    fn name(&self) -> &str {
        "scripted_command"
    }

    fn rate_hz(&self) -> f64 {
        self.rate_hz
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn on_run(&mut self, now: f64, ctx: &mut SimContext) -> Result<NodeStatus, NodeError> {
        ctx.frame.publish(
            topics::CONTROL_CMD,
            Message::Control(ControlCommand {
                steer: self.steer,
                accel: self.accel,
                timestamp: now,
            }),
        );
        Ok(NodeStatus::Ok)
    }
}
