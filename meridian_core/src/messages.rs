// meridian_core/src/messages.rs

//! Message types exchanged between simulation nodes via the blackboard.

use serde::{Deserialize, Serialize};

use crate::types::{Point2d, Pose2};

/// Ground-truth vehicle state in the world frame.
///
/// `steer_eff` is the internal state of the steering actuator, not the
/// commanded angle; `steer_cmd_last` is the most recent command seen by the
/// dynamics step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleState {
    pub x: f64,
    pub y: f64,
    /// Heading in radians, normalised to `(-pi, pi]`.
    pub yaw: f64,
    /// Longitudinal speed in m/s; non-negative unless reverse is enabled.
    pub vx: f64,
    pub steer_eff: f64,
    pub steer_cmd_last: f64,
    pub timestamp: f64,
}

impl VehicleState {
    pub fn pose(&self) -> Pose2 {
        Pose2::new(self.x, self.y, self.yaw)
    }
}

/// A control command published by a planner/controller node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlCommand {
    /// Commanded steering angle in radians.
    pub steer: f64,
    /// Commanded longitudinal acceleration in m/s^2.
    pub accel: f64,
    pub timestamp: f64,
}

/// A single 2D LiDAR sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LidarScan {
    pub timestamp: f64,
    /// Sensor origin in the world frame.
    pub origin_x: f64,
    pub origin_y: f64,
    /// World-frame angle of beam 0.
    pub angle_min: f64,
    pub angle_increment: f64,
    /// One range per beam; unreached beams carry the sensor's `range_max`.
    pub ranges: Vec<f64>,
}

impl LidarScan {
    pub fn beam_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn origin(&self) -> Point2d {
        Point2d::new(self.origin_x, self.origin_y)
    }
}

/// Current pose of one obstacle, published for telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePose {
    pub index: usize,
    pub pose: Pose2,
    pub timestamp: f64,
}

/// Per-tick episode progress published by the safety node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Integrated distance travelled by the ego vehicle in metres.
    pub distance_travelled: f64,
    /// Checkpoints passed so far along the centreline.
    pub checkpoints_passed: u32,
    /// Largest unsigned lateral deviation seen so far.
    pub max_lateral_deviation: f64,
    /// Lateral deviation at this tick (signed, positive left).
    pub lateral_deviation: f64,
    /// Current arc length along the centreline.
    pub arc_length: f64,
}
