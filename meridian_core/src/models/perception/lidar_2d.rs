// meridian_core/src/models/perception/lidar_2d.rs

//! Single-plane 2D LiDAR model.
//!
//! The scan pattern is a uniform fan of beams; each beam is resolved
//! independently against the world boundary segments and the edges of the
//! currently active obstacle polygons by solving the 2x2 ray/segment
//! system. This sweep is the simulator's hot path: the beam table is
//! precomputed, every input is a contiguous array, and the per-beam loop
//! performs no allocation.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use thiserror::Error;

use crate::geometry::{ConvexPolygon, Segment};
use crate::types::Point2d;

/// Segments closer to parallel than this (by cross product with the beam
/// direction) are skipped rather than resolved.
const PARALLEL_EPS: f64 = 1e-12;

#[derive(Debug, Error, PartialEq)]
pub enum LidarError {
    #[error("beam count must be at least 1")]
    NoBeams,
    #[error("range bounds must satisfy 0 <= range_min < range_max, got [{0}, {1}]")]
    InvalidRange(f64, f64),
    #[error("range noise stddev must be finite and non-negative, got {0}")]
    InvalidNoise(f64),
}

/// A 2D LiDAR scan model with a precomputed beam table.
#[derive(Debug, Clone)]
pub struct Lidar2dModel {
    angle_min: f64,
    angle_increment: f64,
    range_min: f64,
    range_max: f64,
    /// Sensor-frame unit direction per beam.
    beams: Vec<(f64, f64)>,
    noise: Option<Normal<f64>>,
}

impl Lidar2dModel {
    /// Builds the model; the fan covers `[angle_min, angle_max]` in the
    /// sensor frame with a uniform angular step.
    pub fn new(
        angle_min: f64,
        angle_max: f64,
        beam_count: usize,
        range_min: f64,
        range_max: f64,
        noise_stddev: f64,
    ) -> Result<Self, LidarError> {
        if beam_count == 0 {
            return Err(LidarError::NoBeams);
        }
        if !(0.0..).contains(&range_min) || range_max <= range_min {
            return Err(LidarError::InvalidRange(range_min, range_max));
        }
        if !noise_stddev.is_finite() || noise_stddev < 0.0 {
            return Err(LidarError::InvalidNoise(noise_stddev));
        }

        let angle_increment = if beam_count > 1 {
            (angle_max - angle_min) / (beam_count - 1) as f64
        } else {
            0.0
        };
        let beams = (0..beam_count)
            .map(|i| {
                let angle = angle_min + i as f64 * angle_increment;
                (angle.cos(), angle.sin())
            })
            .collect();
        let noise = if noise_stddev > 0.0 {
            // stddev is validated above, so the distribution is well formed.
            Some(Normal::new(0.0, noise_stddev).expect("validated stddev"))
        } else {
            None
        };

        Ok(Self {
            angle_min,
            angle_increment,
            range_min,
            range_max,
            beams,
            noise,
        })
    }

    pub fn beam_count(&self) -> usize {
        self.beams.len()
    }

    pub fn angle_min(&self) -> f64 {
        self.angle_min
    }

    pub fn angle_increment(&self) -> f64 {
        self.angle_increment
    }

    pub fn range_min(&self) -> f64 {
        self.range_min
    }

    pub fn range_max(&self) -> f64 {
        self.range_max
    }

    /// Sweeps every beam from `origin` with the sensor heading `heading`,
    /// writing one range per beam into `ranges` (cleared first).
    ///
    /// Beams that reach nothing report `range_max`; hits are clamped into
    /// `[range_min, range_max]`, and Gaussian range noise (if configured)
    /// is applied afterwards, re-clamped so the range bounds always hold.
    pub fn scan_into<R: Rng>(
        &self,
        origin: Point2d,
        heading: f64,
        world_segments: &[Segment],
        obstacle_polygons: &[ConvexPolygon],
        rng: &mut R,
        ranges: &mut Vec<f64>,
    ) {
        ranges.clear();
        ranges.reserve(self.beams.len());
        let (sin_h, cos_h) = heading.sin_cos();

        for &(bc, bs) in &self.beams {
            let dx = bc * cos_h - bs * sin_h;
            let dy = bc * sin_h + bs * cos_h;

            let mut nearest = f64::INFINITY;
            for seg in world_segments {
                if let Some(t) = ray_segment_distance(origin, dx, dy, seg) {
                    nearest = nearest.min(t);
                }
            }
            for poly in obstacle_polygons {
                let verts = poly.vertices();
                let n = verts.len();
                for i in 0..n {
                    let seg = Segment::new(verts[i], verts[(i + 1) % n]);
                    if let Some(t) = ray_segment_distance(origin, dx, dy, &seg) {
                        nearest = nearest.min(t);
                    }
                }
            }

            let mut range = if nearest.is_finite() {
                nearest.clamp(self.range_min, self.range_max)
            } else {
                self.range_max
            };
            if let Some(noise) = &self.noise {
                range = (range + noise.sample(rng)).clamp(self.range_min, self.range_max);
            }
            ranges.push(range);
        }
    }
}

/// Distance along the ray `origin + t * (dx, dy)` to the segment, if the
/// ray reaches it. Solves `origin + t*d = p + u*(q - p)` for `t >= 0`,
/// `u` in `[0, 1]`; near-parallel segments are skipped.
#[inline]
fn ray_segment_distance(origin: Point2d, dx: f64, dy: f64, seg: &Segment) -> Option<f64> {
    let ex = seg.bx - seg.ax;
    let ey = seg.by - seg.ay;
    let denom = ex * dy - ey * dx;
    if denom.abs() < PARALLEL_EPS {
        return None;
    }
    let wx = seg.ax - origin.x;
    let wy = seg.ay - origin.y;
    let t = (ex * wy - ey * wx) / denom;
    let u = (dx * wy - dy * wx) / denom;
    if t >= 0.0 && (0.0..=1.0).contains(&u) {
        Some(t)
    } else {
        None
    }
}
