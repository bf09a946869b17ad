//! Geometry primitives for collision detection
//!
//! Screen space: x grows right, y grows down. Angles are in degrees and a
//! positive angle rotates clockwise on screen.
//!
//! Shapes keep their outline fixed and only their pose changes: segments own
//! world-space endpoints, circles a world-space center, and polygons keep
//! local vertices around a world-space center.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::normalize_degrees;

/// Rotate `point` about `pivot` by `angle_deg` (clockwise on screen)
pub fn rotate_point(point: Vec2, angle_deg: f32, pivot: Vec2) -> Vec2 {
    // Whole turns collapse to 0 so they are exact identities
    let angle = normalize_degrees(angle_deg);
    if angle == 0.0 {
        return point;
    }
    let (sin, cos) = angle.to_radians().sin_cos();
    let d = point - pivot;
    pivot + Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// Scale `point` away from (or toward) `pivot` by `factor`
#[inline]
pub fn scale_point(point: Vec2, factor: f32, pivot: Vec2) -> Vec2 {
    pivot + (point - pivot) * factor
}

/// Axis-aligned bounding rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Smallest rectangle containing every point. Panics on an empty iterator.
    pub fn enclosing(points: impl IntoIterator<Item = Vec2>) -> Self {
        let mut points = points.into_iter();
        let first = points
            .next()
            .unwrap_or_else(|| panic!("bounding rectangle of an empty point set"));
        points.fold(Self { min: first, max: first }, |rect, p| Self {
            min: rect.min.min(p),
            max: rect.max.max(p),
        })
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Half width and half height
    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Overlap test, touching edges count as overlapping
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// A line segment between two world-space points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        (self.start + self.end) * 0.5
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }

    pub fn rotate(&mut self, angle_deg: f32, pivot: Vec2) {
        self.start = rotate_point(self.start, angle_deg, pivot);
        self.end = rotate_point(self.end, angle_deg, pivot);
    }

    /// Spin the segment about its own midpoint
    pub fn spin(&mut self, angle_deg: f32) {
        let pivot = self.midpoint();
        self.rotate(angle_deg, pivot);
    }

    /// Builder-style scale, used when laying out a hull
    pub fn scaled(mut self, factor: f32, pivot: Vec2) -> Self {
        self.start = scale_point(self.start, factor, pivot);
        self.end = scale_point(self.end, factor, pivot);
        self
    }

    pub fn bounds(&self) -> Rect {
        Rect::enclosing([self.start, self.end])
    }

    /// Shortest distance from `p` to any point on the segment
    pub fn distance_to_point(&self, p: Vec2) -> f32 {
        let line = self.end - self.start;
        let len_sq = line.length_squared();
        if len_sq <= f32::EPSILON {
            return p.distance(self.start);
        }
        let t = ((p - self.start).dot(line) / len_sq).clamp(0.0, 1.0);
        p.distance(self.start + line * t)
    }

    /// True if the two segments share at least one point
    pub fn intersects_segment(&self, other: &Segment) -> bool {
        let d1 = orientation(other.start, other.end, self.start);
        let d2 = orientation(other.start, other.end, self.end);
        let d3 = orientation(self.start, self.end, other.start);
        let d4 = orientation(self.start, self.end, other.end);

        if straddles(d1, d2) && straddles(d3, d4) {
            return true;
        }

        // Collinear touching cases
        (d1 == 0.0 && within_box(other.start, other.end, self.start))
            || (d2 == 0.0 && within_box(other.start, other.end, self.end))
            || (d3 == 0.0 && within_box(self.start, self.end, other.start))
            || (d4 == 0.0 && within_box(self.start, self.end, other.end))
    }

    /// Crosses an edge of the polygon or has an endpoint inside it
    pub fn intersects_polygon(&self, polygon: &Polygon) -> bool {
        if !self.bounds().overlaps(&polygon.bounds()) {
            return false;
        }
        polygon.edges().any(|edge| self.intersects_segment(&edge))
            || polygon.contains_point(self.start)
            || polygon.contains_point(self.end)
    }
}

/// Signed area of the triangle (a, b, p); zero when collinear
#[inline]
fn orientation(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b - a).perp_dot(p - a)
}

#[inline]
fn straddles(a: f32, b: f32) -> bool {
    (a > 0.0 && b < 0.0) || (a < 0.0 && b > 0.0)
}

#[inline]
fn within_box(a: Vec2, b: Vec2, p: Vec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// A circle in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }

    pub fn bounds(&self) -> Rect {
        let r = Vec2::splat(self.radius);
        Rect {
            min: self.center - r,
            max: self.center + r,
        }
    }

    /// Center inside the polygon, or within `radius` of one of its edges
    pub fn intersects_polygon(&self, polygon: &Polygon) -> bool {
        if !self.bounds().overlaps(&polygon.bounds()) {
            return false;
        }
        polygon.contains_point(self.center)
            || polygon
                .edges()
                .any(|edge| edge.distance_to_point(self.center) <= self.radius)
    }
}

/// A closed polygon: local vertices (in winding order) around a world center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<Vec2>,
    pub center: Vec2,
}

impl Polygon {
    /// Panics if fewer than 3 vertices are given
    pub fn new(vertices: Vec<Vec2>, center: Vec2) -> Self {
        assert!(
            vertices.len() >= 3,
            "polygon needs at least 3 vertices, got {}",
            vertices.len()
        );
        Self { vertices, center }
    }

    /// Build from an outline drawn in its own coordinate box. The outline is
    /// re-centered on its bounding rectangle, so `center` starts at the origin.
    pub fn from_outline(outline: &[[f32; 2]]) -> Self {
        let points: Vec<Vec2> = outline.iter().map(|&p| Vec2::from(p)).collect();
        assert!(
            points.len() >= 3,
            "polygon needs at least 3 vertices, got {}",
            points.len()
        );
        let mid = Rect::enclosing(points.iter().copied()).center();
        Self::new(points.into_iter().map(|p| p - mid).collect(), Vec2::ZERO)
    }

    /// Vertices relative to `center`
    pub fn local_vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn world_vertices(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.vertices.iter().map(move |&v| self.center + v)
    }

    /// Edges in winding order, closing back to the first vertex
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| {
            Segment::new(
                self.center + self.vertices[i],
                self.center + self.vertices[(i + 1) % n],
            )
        })
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }

    /// Scale the silhouette about the polygon's own center
    pub fn scale(&mut self, factor: f32) {
        for v in &mut self.vertices {
            *v = scale_point(*v, factor, Vec2::ZERO);
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::enclosing(self.world_vertices())
    }

    /// Even-odd crossing test against world-space vertices
    pub fn contains_point(&self, p: Vec2) -> bool {
        let mut inside = false;
        for edge in self.edges() {
            let (a, b) = (edge.start, edge.end);
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }
}
