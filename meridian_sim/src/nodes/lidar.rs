// meridian_sim/src/nodes/lidar.rs

//! 2D LiDAR sensor node.
//!
//! Wraps the core scan model: transforms the body-frame mount pose by the
//! current ego pose, sweeps the beam fan against the world boundary and
//! obstacle polygons, and publishes the resulting scan. The previous
//! scan's range buffer is reclaimed on publish so the steady state
//! allocates nothing.

use meridian_core::messages::LidarScan;
use meridian_core::models::perception::lidar_2d::Lidar2dModel;
use meridian_core::types::{Point2d, Pose2};

use crate::blackboard::{topics, Message};
use crate::context::SimContext;
use crate::error::NodeError;
use crate::node::{Node, NodeStatus};

pub struct LidarNode {
    rate_hz: f64,
    priority: i32,
    model: Lidar2dModel,
    /// Sensor mount pose in the vehicle body frame.
    mount: Pose2,
    scratch: Vec<f64>,
}

impl LidarNode {
    pub fn new(model: Lidar2dModel, mount: Pose2, rate_hz: f64, priority: i32) -> Self {
        let beams = model.beam_count();
        Self {
            rate_hz,
            priority,
            model,
            mount,
            scratch: Vec::with_capacity(beams),
        }
    }
}

impl Node for LidarNode {
    fn name(&self) -> &str {
        "lidar"
    }

    fn rate_hz(&self) -> f64 {
        self.rate_hz
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn on_run(&mut self, now: f64, ctx: &mut SimContext) -> Result<NodeStatus, NodeError> {
        let SimContext { frame, world, rng } = ctx;

        let Some(state) = frame.vehicle_state() else {
            return Ok(NodeStatus::Skipped);
        };
        let ego = state.pose();
        let origin = ego.transform_point(Point2d::new(self.mount.x, self.mount.y));
        let heading = ego.yaw + self.mount.yaw;

        self.model.scan_into(
            origin,
            heading,
            &world.geometry.segments,
            world.obstacles.polygons(),
            rng,
            &mut self.scratch,
        );

        let scan = LidarScan {
            timestamp: now,
            origin_x: origin.x,
            origin_y: origin.y,
            angle_min: heading + self.model.angle_min(),
            angle_increment: self.model.angle_increment(),
            ranges: std::mem::take(&mut self.scratch),
        };
        // Reclaim the buffer of the scan we just replaced.
        if let Some(Message::LidarScan(old)) = frame.publish(topics::LIDAR_SCAN, Message::LidarScan(scan))
        {
            self.scratch = old.ranges;
        }
        Ok(NodeStatus::Ok)
    }
}
