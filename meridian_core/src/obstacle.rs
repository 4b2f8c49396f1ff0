// meridian_core/src/obstacle.rs

//! Static and time-parameterised obstacles.
//!
//! Dynamic obstacles follow a waypoint trajectory whose times are held in
//! a contiguous array for binary search; poses interpolate linearly with
//! shortest-arc yaw, and the trajectory repeats cyclically. Collision
//! polygons are rebuilt in place each tick from cached vertex buffers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{
    normalize_angle, polygons_overlap, shortest_arc, write_circle, write_rectangle,
    ConvexPolygon, CIRCLE_VERTEX_COUNT,
};
use crate::types::{Point2d, Pose2};

#[derive(Debug, Error, PartialEq)]
pub enum ObstacleError {
    #[error("trajectory needs at least one waypoint")]
    EmptyTrajectory,
    #[error("trajectory must start at time 0, got {0}")]
    NonZeroStart(f64),
    #[error("trajectory times must be strictly increasing (waypoint {0})")]
    NonMonotonicTime(usize),
    #[error("obstacle dimension must be positive and finite, got {0}")]
    InvalidDimension(f64),
}

/// Footprint shape of an obstacle. The set of recognised shapes is closed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObstacleShape {
    Rectangle { width: f64, length: f64 },
    Circle { radius: f64 },
}

impl ObstacleShape {
    fn validate(&self) -> Result<(), ObstacleError> {
        let dims: &[f64] = match self {
            ObstacleShape::Rectangle { width, length } => &[*width, *length],
            ObstacleShape::Circle { radius } => &[*radius],
        };
        for &d in dims {
            if !d.is_finite() || d <= 0.0 {
                return Err(ObstacleError::InvalidDimension(d));
            }
        }
        Ok(())
    }

    /// Vertex count of the synthesised collision polygon.
    fn vertex_count(&self) -> usize {
        match self {
            ObstacleShape::Rectangle { .. } => 4,
            ObstacleShape::Circle { .. } => CIRCLE_VERTEX_COUNT,
        }
    }
}

/// A timed pose sample of a dynamic obstacle's trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Waypoint {
    pub time: f64,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub yaw: f64,
}

/// A time-sorted waypoint trajectory stored as contiguous arrays.
#[derive(Debug, Clone)]
pub struct Trajectory {
    times: Vec<f64>,
    xs: Vec<f64>,
    ys: Vec<f64>,
    yaws: Vec<f64>,
}

impl Trajectory {
    pub fn new(waypoints: &[Waypoint]) -> Result<Self, ObstacleError> {
        let first = waypoints.first().ok_or(ObstacleError::EmptyTrajectory)?;
        if first.time != 0.0 {
            return Err(ObstacleError::NonZeroStart(first.time));
        }
        for (i, pair) in waypoints.windows(2).enumerate() {
            if pair[1].time <= pair[0].time {
                return Err(ObstacleError::NonMonotonicTime(i + 1));
            }
        }
        Ok(Self {
            times: waypoints.iter().map(|w| w.time).collect(),
            xs: waypoints.iter().map(|w| w.x).collect(),
            ys: waypoints.iter().map(|w| w.y).collect(),
            yaws: waypoints.iter().map(|w| normalize_angle(w.yaw)).collect(),
        })
    }

    /// Duration of one trajectory cycle.
    pub fn period(&self) -> f64 {
        *self.times.last().expect("trajectory is non-empty")
    }

    /// Pose at simulation time `t`; the trajectory repeats with its
    /// period, so `t = period` samples the same pose as `t = 0`.
    pub fn pose_at(&self, t: f64) -> Pose2 {
        let period = self.period();
        if period <= 0.0 {
            // Single waypoint at t = 0.
            return Pose2::new(self.xs[0], self.ys[0], self.yaws[0]);
        }
        let t = t.rem_euclid(period);

        // First index with times[i] > t; the containing interval starts
        // one before it.
        let idx = self.times.partition_point(|&v| v <= t);
        let i = idx.saturating_sub(1).min(self.times.len() - 2);
        let span = self.times[i + 1] - self.times[i];
        let alpha = (t - self.times[i]) / span;

        Pose2::new(
            self.xs[i] + alpha * (self.xs[i + 1] - self.xs[i]),
            self.ys[i] + alpha * (self.ys[i + 1] - self.ys[i]),
            normalize_angle(self.yaws[i] + alpha * shortest_arc(self.yaws[i], self.yaws[i + 1])),
        )
    }
}

/// How an obstacle moves over the episode.
#[derive(Debug, Clone)]
pub enum ObstacleMotion {
    Static(Pose2),
    Waypoints(Trajectory),
}

/// One obstacle: a footprint shape with a motion law.
#[derive(Debug, Clone)]
pub struct Obstacle {
    shape: ObstacleShape,
    motion: ObstacleMotion,
}

impl Obstacle {
    pub fn new_static(shape: ObstacleShape, pose: Pose2) -> Result<Self, ObstacleError> {
        shape.validate()?;
        Ok(Self {
            shape,
            motion: ObstacleMotion::Static(pose),
        })
    }

    pub fn new_dynamic(shape: ObstacleShape, waypoints: &[Waypoint]) -> Result<Self, ObstacleError> {
        shape.validate()?;
        Ok(Self {
            shape,
            motion: ObstacleMotion::Waypoints(Trajectory::new(waypoints)?),
        })
    }

    pub fn shape(&self) -> ObstacleShape {
        self.shape
    }

    pub fn pose_at(&self, t: f64) -> Pose2 {
        match &self.motion {
            ObstacleMotion::Static(pose) => *pose,
            ObstacleMotion::Waypoints(trajectory) => trajectory.pose_at(t),
        }
    }

    /// Writes the collision polygon for the given pose into `out`.
    pub fn write_polygon(&self, pose: &Pose2, out: &mut ConvexPolygon) {
        match self.shape {
            ObstacleShape::Rectangle { width, length } => {
                write_rectangle(pose, length, width, out);
            }
            ObstacleShape::Circle { radius } => {
                write_circle(Point2d::new(pose.x, pose.y), radius, out);
            }
        }
    }
}

/// The full obstacle set with per-tick pose and polygon caches.
#[derive(Debug, Clone, Default)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    poses: Vec<Pose2>,
    polygons: Vec<ConvexPolygon>,
}

impl ObstacleField {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        let poses = obstacles.iter().map(|o| o.pose_at(0.0)).collect();
        let polygons = obstacles
            .iter()
            .map(|o| ConvexPolygon::with_capacity(o.shape().vertex_count()))
            .collect();
        let mut field = Self {
            obstacles,
            poses,
            polygons,
        };
        field.update(0.0);
        field
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Refreshes the cached poses and polygons for time `t`, in place.
    pub fn update(&mut self, t: f64) {
        for (i, obstacle) in self.obstacles.iter().enumerate() {
            let pose = obstacle.pose_at(t);
            self.poses[i] = pose;
            obstacle.write_polygon(&pose, &mut self.polygons[i]);
        }
    }

    pub fn poses(&self) -> &[Pose2] {
        &self.poses
    }

    pub fn polygons(&self) -> &[ConvexPolygon] {
        &self.polygons
    }

    /// True if any cached obstacle polygon overlaps `footprint`.
    pub fn collides_with(&self, footprint: &ConvexPolygon) -> bool {
        self.polygons
            .iter()
            .any(|poly| polygons_overlap(footprint, poly))
    }
}
