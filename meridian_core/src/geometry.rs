// meridian_core/src/geometry.rs

//! Planar geometry utilities: angle normalisation, line segments, polygon
//! synthesis for vehicle and obstacle footprints, and convex-polygon
//! overlap via the separating-axis theorem.

use crate::types::{Point2d, Pose2, Vector2d};

/// Number of vertices used when a circle is approximated by a polygon for
/// collision checks. Not used for rendering.
pub const CIRCLE_VERTEX_COUNT: usize = 16;

/// Normalises an angle to `(-pi, pi]`.
pub fn normalize_angle(angle: f64) -> f64 {
    use std::f64::consts::PI;
    let wrapped = (angle + PI).rem_euclid(2.0 * PI);
    if wrapped == 0.0 {
        PI
    } else {
        wrapped - PI
    }
}

/// Shortest-arc difference `to - from`, normalised to `(-pi, pi]`.
pub fn shortest_arc(from: f64, to: f64) -> f64 {
    normalize_angle(to - from)
}

/// A line segment with a flat field layout, suitable for tight kernels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub ax: f64,
    pub ay: f64,
    pub bx: f64,
    pub by: f64,
}

impl Segment {
    pub fn new(a: Point2d, b: Point2d) -> Self {
        Self {
            ax: a.x,
            ay: a.y,
            bx: b.x,
            by: b.y,
        }
    }

    pub fn start(&self) -> Point2d {
        Point2d::new(self.ax, self.ay)
    }

    pub fn end(&self) -> Point2d {
        Point2d::new(self.bx, self.by)
    }

    pub fn length(&self) -> f64 {
        (self.bx - self.ax).hypot(self.by - self.ay)
    }
}

/// A convex polygon with vertices in counter-clockwise order.
///
/// The vertex buffer is meant to be reused: obstacle and vehicle footprints
/// are rewritten in place every tick via [`ConvexPolygon::clear`] and the
/// synthesis helpers below, so steady-state operation performs no heap
/// allocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvexPolygon {
    vertices: Vec<Point2d>,
}

impl ConvexPolygon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity),
        }
    }

    pub fn from_vertices(vertices: Vec<Point2d>) -> Self {
        Self { vertices }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn push(&mut self, vertex: Point2d) {
        self.vertices.push(vertex);
    }

    pub fn vertices(&self) -> &[Point2d] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Signed area via the shoelace formula (positive for CCW winding).
    pub fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }
        let mut acc = 0.0;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            acc += a.x * b.y - b.x * a.y;
        }
        0.5 * acc
    }

    /// A polygon with fewer than three vertices or (numerically) zero area
    /// cannot collide with anything.
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 3 || self.signed_area().abs() < 1e-12
    }

    /// Iterates over the polygon's edges as segments.
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| Segment::new(self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Projects all vertices onto `axis`, returning the (min, max) interval.
    fn project(&self, axis: Vector2d) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in &self.vertices {
            let d = v.x * axis.x + v.y * axis.y;
            min = min.min(d);
            max = max.max(d);
        }
        (min, max)
    }
}

/// Separating-axis overlap test for two convex polygons.
///
/// The candidate axes are the edge normals of both polygons; the polygons
/// are disjoint iff some axis yields non-overlapping projections.
/// Degenerate polygons never overlap anything.
pub fn polygons_overlap(a: &ConvexPolygon, b: &ConvexPolygon) -> bool {
    if a.is_degenerate() || b.is_degenerate() {
        return false;
    }
    !has_separating_axis(a, b) && !has_separating_axis(b, a)
}

fn has_separating_axis(axes_of: &ConvexPolygon, other: &ConvexPolygon) -> bool {
    let verts = axes_of.vertices();
    let n = verts.len();
    for i in 0..n {
        let a = verts[i];
        let b = verts[(i + 1) % n];
        // Edge normal; normalisation is unnecessary for an interval
        // overlap comparison.
        let axis = Vector2d::new(a.y - b.y, b.x - a.x);
        let (min_a, max_a) = axes_of.project(axis);
        let (min_b, max_b) = other.project(axis);
        if max_a < min_b || max_b < min_a {
            return true;
        }
    }
    false
}

/// Writes the four corners of an oriented rectangle into `out`.
///
/// The rectangle is centred on `pose` with its length axis along the pose
/// heading; corners are emitted counter-clockwise starting front-left.
pub fn write_rectangle(pose: &Pose2, length: f64, width: f64, out: &mut ConvexPolygon) {
    let half_len = 0.5 * length;
    let half_wid = 0.5 * width;
    out.clear();
    out.push(pose.transform_point(Point2d::new(half_len, half_wid)));
    out.push(pose.transform_point(Point2d::new(-half_len, half_wid)));
    out.push(pose.transform_point(Point2d::new(-half_len, -half_wid)));
    out.push(pose.transform_point(Point2d::new(half_len, -half_wid)));
}

/// Writes a [`CIRCLE_VERTEX_COUNT`]-gon inscribed in the given circle into
/// `out`, counter-clockwise.
pub fn write_circle(center: Point2d, radius: f64, out: &mut ConvexPolygon) {
    use std::f64::consts::TAU;
    out.clear();
    for i in 0..CIRCLE_VERTEX_COUNT {
        let theta = TAU * i as f64 / CIRCLE_VERTEX_COUNT as f64;
        out.push(Point2d::new(
            center.x + radius * theta.cos(),
            center.y + radius * theta.sin(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn rect(pose: Pose2, length: f64, width: f64) -> ConvexPolygon {
        let mut p = ConvexPolygon::new();
        write_rectangle(&pose, length, width, &mut p);
        p
    }

    #[test]
    fn normalize_angle_maps_into_half_open_interval() {
        assert_abs_diff_eq!(normalize_angle(PI), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(-PI), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(3.0 * PI), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(2.5 * PI), 0.5 * PI, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(-0.5 * PI), -0.5 * PI, epsilon = 1e-12);
    }

    #[test]
    fn shortest_arc_wraps_across_pi() {
        let d = shortest_arc(0.9 * PI, -0.9 * PI);
        assert_abs_diff_eq!(d, 0.2 * PI, epsilon = 1e-12);
    }

    #[test]
    fn rectangle_round_trips_through_body_frame() {
        let pose = Pose2::new(4.0, -1.0, FRAC_PI_4);
        let poly = rect(pose, 4.2, 1.8);
        let expected = [
            (2.1, 0.9),
            (-2.1, 0.9),
            (-2.1, -0.9),
            (2.1, -0.9),
        ];
        for (vertex, (lx, ly)) in poly.vertices().iter().zip(expected) {
            let local = pose.inverse_transform_point(*vertex);
            assert_abs_diff_eq!(local.x, lx, epsilon = 1e-9);
            assert_abs_diff_eq!(local.y, ly, epsilon = 1e-9);
        }
    }

    #[test]
    fn rectangle_winding_is_counter_clockwise() {
        let poly = rect(Pose2::new(0.0, 0.0, 0.3), 2.0, 1.0);
        assert!(poly.signed_area() > 0.0);
        assert_abs_diff_eq!(poly.signed_area(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn overlapping_rectangles_are_detected() {
        let a = rect(Pose2::new(0.0, 0.0, 0.0), 4.0, 2.0);
        let b = rect(Pose2::new(3.0, 0.5, FRAC_PI_2), 4.0, 2.0);
        assert!(polygons_overlap(&a, &b));
    }

    #[test]
    fn disjoint_rectangles_are_rejected() {
        let a = rect(Pose2::new(0.0, 0.0, 0.0), 4.0, 2.0);
        let b = rect(Pose2::new(10.0, 0.0, 0.7), 4.0, 2.0);
        assert!(!polygons_overlap(&a, &b));
    }

    #[test]
    fn rotated_near_miss_requires_both_axis_sets() {
        // Axis-aligned bounding boxes overlap here; only the rotated
        // polygon's own normals separate the pair.
        let a = rect(Pose2::new(0.0, 0.0, 0.0), 2.0, 2.0);
        let b = rect(Pose2::new(2.4, 2.4, FRAC_PI_4), 2.0, 2.0);
        assert!(!polygons_overlap(&a, &b));
    }

    #[test]
    fn degenerate_polygon_never_collides() {
        let a = rect(Pose2::new(0.0, 0.0, 0.0), 4.0, 2.0);
        let flat = rect(Pose2::new(0.0, 0.0, 0.0), 4.0, 0.0);
        assert!(!polygons_overlap(&a, &flat));
        assert!(!polygons_overlap(&flat, &a));
    }

    #[test]
    fn circle_polygon_vertices_lie_on_the_circle() {
        let mut poly = ConvexPolygon::new();
        write_circle(Point2d::new(1.0, 2.0), 3.0, &mut poly);
        assert_eq!(poly.len(), CIRCLE_VERTEX_COUNT);
        for v in poly.vertices() {
            let r = (v.x - 1.0).hypot(v.y - 2.0);
            assert_abs_diff_eq!(r, 3.0, epsilon = 1e-12);
        }
    }
}
