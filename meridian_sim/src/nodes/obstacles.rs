// meridian_sim/src/nodes/obstacles.rs

//! Obstacle manager node.
//!
//! Refreshes every obstacle's pose and collision polygon for the current
//! tick (in place, into the world model's cached buffers) and publishes
//! the poses for telemetry.

use meridian_core::messages::ObstaclePose;

use crate::blackboard::{topics, Message};
use crate::context::SimContext;
use crate::error::NodeError;
use crate::node::{Node, NodeStatus};

pub struct ObstacleManagerNode {
    rate_hz: f64,
    priority: i32,
    scratch: Vec<ObstaclePose>,
}

impl ObstacleManagerNode {
    pub fn new(rate_hz: f64, priority: i32) -> Self {
        Self {
            rate_hz,
            priority,
            scratch: Vec::new(),
        }
    }
}

impl Node for ObstacleManagerNode {
    fn name(&self) -> &str {
        "obstacles"
    }

    fn rate_hz(&self) -> f64 {
        self.rate_hz
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn on_run(&mut self, now: f64, ctx: &mut SimContext) -> Result<NodeStatus, NodeError> {
        ctx.world.obstacles.update(now);
        if ctx.world.obstacles.is_empty() {
            return Ok(NodeStatus::Ok);
        }

        self.scratch.clear();
        self.scratch
            .extend(
                ctx.world
                    .obstacles
                    .poses()
                    .iter()
                    .enumerate()
                    .map(|(index, &pose)| ObstaclePose {
                        index,
                        pose,
                        timestamp: now,
                    }),
            );
        let message = Message::ObstaclePoses(std::mem::take(&mut self.scratch));
        if let Some(Message::ObstaclePoses(old)) = ctx.frame.publish(topics::OBSTACLE_POSES, message)
        {
            self.scratch = old;
        }
        Ok(NodeStatus::Ok)
    }
}
