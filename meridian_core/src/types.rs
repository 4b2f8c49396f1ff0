// meridian_core/src/types.rs

use nalgebra::{Isometry2, Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::geometry::normalize_angle;

/// A 2D point in metres.
pub type Point2d = Point2<f64>;

/// A 2D vector in metres.
pub type Vector2d = Vector2<f64>;

/// A planar pose: position in the world frame plus heading.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2 {
    pub x: f64,
    pub y: f64,
    /// Heading in radians, normalised to `(-pi, pi]`.
    #[serde(default)]
    pub yaw: f64,
}

impl Pose2 {
    pub fn new(x: f64, y: f64, yaw: f64) -> Self {
        Self {
            x,
            y,
            yaw: normalize_angle(yaw),
        }
    }

    pub fn position(&self) -> Point2d {
        Point2d::new(self.x, self.y)
    }

    pub fn to_isometry(&self) -> Isometry2<f64> {
        Isometry2::new(Vector2d::new(self.x, self.y), self.yaw)
    }

    /// Transforms a body-frame point into the world frame.
    pub fn transform_point(&self, local: Point2d) -> Point2d {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Point2d::new(
            self.x + local.x * cos_yaw - local.y * sin_yaw,
            self.y + local.x * sin_yaw + local.y * cos_yaw,
        )
    }

    /// Transforms a world-frame point into the body frame.
    pub fn inverse_transform_point(&self, world: Point2d) -> Point2d {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let dx = world.x - self.x;
        let dy = world.y - self.y;
        Point2d::new(dx * cos_yaw + dy * sin_yaw, -dx * sin_yaw + dy * cos_yaw)
    }
}
