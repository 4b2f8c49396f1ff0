// meridian_core/src/prelude.rs

//! Convenience re-exports of the most commonly used core types.

pub use crate::centerline::{Centerline, CenterlineError, FrenetCoord};
pub use crate::geometry::{
    normalize_angle, polygons_overlap, shortest_arc, write_circle, write_rectangle,
    ConvexPolygon, Segment, CIRCLE_VERTEX_COUNT,
};
pub use crate::messages::{
    ControlCommand, LidarScan, ObstaclePose, ProgressReport, VehicleState,
};
pub use crate::models::bicycle::{step_bicycle, VehicleParams};
pub use crate::models::longitudinal::LongitudinalModel;
pub use crate::models::perception::lidar_2d::{Lidar2dModel, LidarError};
pub use crate::models::steering::SteeringActuator;
pub use crate::obstacle::{
    Obstacle, ObstacleError, ObstacleField, ObstacleShape, Trajectory, Waypoint,
};
pub use crate::types::{Point2d, Pose2, Vector2d};
