// meridian_sim/src/world.rs

//! Shared world model.
//!
//! Hot geometry lives here rather than on the blackboard: the boundary
//! segments are a contiguous array built once at episode start, and the
//! obstacle polygons are rebuilt in place each tick by the obstacle
//! manager node. The LiDAR and safety nodes read these arrays directly.

use meridian_core::centerline::Centerline;
use meridian_core::geometry::Segment;
use meridian_core::obstacle::ObstacleField;

/// Static geometry of the drivable world.
#[derive(Debug)]
pub struct WorldGeometry {
    /// Drivable-area boundary segments.
    pub segments: Vec<Segment>,
    /// Reference centreline parameterised by arc length.
    pub centerline: Centerline,
    /// Ordered checkpoint arc lengths; the last one is the goal.
    pub checkpoints: Vec<f64>,
    /// Half of the road width in metres.
    pub half_width: f64,
    /// Extra lateral margin before the episode counts as off-track.
    pub off_track_margin: f64,
}

/// The world as the nodes see it: static geometry plus the per-tick
/// obstacle state.
#[derive(Debug)]
pub struct WorldState {
    pub geometry: WorldGeometry,
    pub obstacles: ObstacleField,
}

impl WorldState {
    pub fn new(geometry: WorldGeometry, obstacles: ObstacleField) -> Self {
        Self {
            geometry,
            obstacles,
        }
    }
}
