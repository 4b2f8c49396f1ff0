// meridian_core/src/centerline.rs

//! Arc-length parameterised centreline with Frenet projection.
//!
//! The centreline is stored as contiguous arrays of `(s, x, y, yaw)`
//! samples, built once at episode start and queried every tick by the
//! safety node and the centreline follower.

use thiserror::Error;

use crate::geometry::{normalize_angle, shortest_arc};
use crate::types::{Point2d, Pose2};

#[derive(Debug, Error, PartialEq)]
pub enum CenterlineError {
    #[error("centreline needs at least two points, got {0}")]
    TooFewPoints(usize),
    #[error("centreline contains consecutive duplicate points at index {0}")]
    DuplicatePoint(usize),
}

/// Position of a point relative to the centreline: arc length `s` along it
/// and signed lateral offset `l` (positive to the left of travel).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrenetCoord {
    pub s: f64,
    pub l: f64,
}

/// A polyline centreline parameterised by arc length.
#[derive(Debug, Clone, PartialEq)]
pub struct Centerline {
    s: Vec<f64>,
    x: Vec<f64>,
    y: Vec<f64>,
    yaw: Vec<f64>,
}

impl Centerline {
    /// Builds a centreline from `(x, y)` points, deriving per-sample
    /// reference yaw from the segment directions.
    pub fn from_points(points: &[(f64, f64)]) -> Result<Self, CenterlineError> {
        if points.len() < 2 {
            return Err(CenterlineError::TooFewPoints(points.len()));
        }

        let n = points.len();
        let mut s = Vec::with_capacity(n);
        let mut x = Vec::with_capacity(n);
        let mut y = Vec::with_capacity(n);
        let mut yaw = Vec::with_capacity(n);

        let mut arc = 0.0;
        for (i, &(px, py)) in points.iter().enumerate() {
            if i > 0 {
                let (qx, qy) = points[i - 1];
                let step = (px - qx).hypot(py - qy);
                if step < 1e-9 {
                    return Err(CenterlineError::DuplicatePoint(i));
                }
                arc += step;
            }
            s.push(arc);
            x.push(px);
            y.push(py);
        }

        // Reference yaw: direction of the outgoing segment, with the last
        // sample inheriting the final segment's direction.
        for i in 0..n {
            let j = if i + 1 < n { i } else { i - 1 };
            yaw.push((y[j + 1] - y[j]).atan2(x[j + 1] - x[j]));
        }

        Ok(Self { s, x, y, yaw })
    }

    pub fn total_length(&self) -> f64 {
        *self.s.last().expect("centreline has at least two samples")
    }

    pub fn sample_count(&self) -> usize {
        self.s.len()
    }

    /// Samples the pose at arc length `s`, clamped to `[0, s_max]`.
    pub fn sample(&self, s: f64) -> Pose2 {
        let s = s.clamp(0.0, self.total_length());
        // partition_point returns the first index with s[i] > s, so the
        // containing segment starts at index - 1.
        let idx = self.s.partition_point(|&v| v <= s).min(self.s.len() - 1);
        let i = idx.saturating_sub(1);
        let span = self.s[i + 1] - self.s[i];
        let alpha = if span > 0.0 { (s - self.s[i]) / span } else { 0.0 };
        Pose2::new(
            self.x[i] + alpha * (self.x[i + 1] - self.x[i]),
            self.y[i] + alpha * (self.y[i + 1] - self.y[i]),
            normalize_angle(self.yaw[i] + alpha * shortest_arc(self.yaw[i], self.yaw[i + 1])),
        )
    }

    /// Projects a world point onto the centreline.
    ///
    /// Scans every segment for the closest clamped projection; the
    /// centreline is short enough that the linear scan is not a hot path.
    pub fn project(&self, point: Point2d) -> FrenetCoord {
        let mut best = FrenetCoord::default();
        let mut best_dist2 = f64::INFINITY;

        for i in 0..self.s.len() - 1 {
            let ax = self.x[i];
            let ay = self.y[i];
            let ex = self.x[i + 1] - ax;
            let ey = self.y[i + 1] - ay;
            let len2 = ex * ex + ey * ey;
            let t = (((point.x - ax) * ex + (point.y - ay) * ey) / len2).clamp(0.0, 1.0);
            let px = ax + t * ex;
            let py = ay + t * ey;
            let dx = point.x - px;
            let dy = point.y - py;
            let dist2 = dx * dx + dy * dy;
            if dist2 < best_dist2 {
                best_dist2 = dist2;
                let len = len2.sqrt();
                // Signed lateral offset: positive on the left of travel.
                let cross = ex * dy - ey * dx;
                best = FrenetCoord {
                    s: self.s[i] + t * len,
                    l: cross.signum() * dist2.sqrt(),
                };
            }
        }
        best
    }

    /// Maps Frenet coordinates back to a world point.
    pub fn frenet_to_cartesian(&self, coord: FrenetCoord) -> Point2d {
        let pose = self.sample(coord.s);
        let (sin_yaw, cos_yaw) = pose.yaw.sin_cos();
        Point2d::new(pose.x - coord.l * sin_yaw, pose.y + coord.l * cos_yaw)
    }
}
