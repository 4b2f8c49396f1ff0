// meridian_sim/src/config/track.rs

//! World geometry construction from a track configuration.
//!
//! The map loader proper is an external collaborator; scenarios describe
//! their world through the abstract centreline interface, and the
//! drivable-area boundaries are synthesized by offsetting the centreline
//! by the half road width on both sides.

use meridian_core::centerline::Centerline;
use meridian_core::geometry::Segment;
use meridian_core::types::Point2d;

use crate::config::TrackConfig;
use crate::error::ConfigError;
use crate::world::WorldGeometry;

/// Builds the world geometry for a scenario track.
pub fn build_world(track: &TrackConfig) -> Result<WorldGeometry, ConfigError> {
    let points: Vec<(f64, f64)> = track.points.iter().map(|p| (p[0], p[1])).collect();
    let centerline = Centerline::from_points(&points)?;

    let segments = offset_boundaries(&centerline, track.half_width);
    let checkpoints = checkpoint_table(centerline.total_length(), track.checkpoint_spacing);

    Ok(WorldGeometry {
        segments,
        centerline,
        checkpoints,
        half_width: track.half_width,
        off_track_margin: track.off_track_margin,
    })
}

/// Left and right boundary polylines at a constant lateral offset,
/// flattened into one segment array for the LiDAR kernel.
fn offset_boundaries(centerline: &Centerline, half_width: f64) -> Vec<Segment> {
    let count = centerline.sample_count();
    let total = centerline.total_length();
    let mut left = Vec::with_capacity(count);
    let mut right = Vec::with_capacity(count);

    for i in 0..count {
        let s = total * i as f64 / (count - 1) as f64;
        let pose = centerline.sample(s);
        let (sin_yaw, cos_yaw) = pose.yaw.sin_cos();
        // Unit normal pointing left of travel.
        let (nx, ny) = (-sin_yaw, cos_yaw);
        left.push(Point2d::new(
            pose.x + half_width * nx,
            pose.y + half_width * ny,
        ));
        right.push(Point2d::new(
            pose.x - half_width * nx,
            pose.y - half_width * ny,
        ));
    }

    let mut segments = Vec::with_capacity(2 * (count - 1));
    for i in 0..count - 1 {
        segments.push(Segment::new(left[i], left[i + 1]));
        segments.push(Segment::new(right[i], right[i + 1]));
    }
    segments
}

/// Checkpoints every `spacing` metres, with the track end as the final
/// (goal) checkpoint.
fn checkpoint_table(total_length: f64, spacing: f64) -> Vec<f64> {
    let mut checkpoints = Vec::new();
    let mut s = spacing;
    while s < total_length {
        checkpoints.push(s);
        s += spacing;
    }
    checkpoints.push(total_length);
    checkpoints
}
