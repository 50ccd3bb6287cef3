//! Primitive collision geometry and intersection algorithms
//!
//! Line segments, bounded rays and the projection helpers shared by the
//! narrow-phase routines. All coordinates are world space.

use crate::foundation::math::{approx_zero, cross, is_finite, perpendicular, try_normalize, Vec2, EPSILON};
use crate::spatial::BoundingArea;

/// A finite line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// First endpoint
    pub start: Vec2,
    /// Second endpoint
    pub end: Vec2,
}

impl LineSegment {
    /// Creates a new segment
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Vector from `start` to `end`
    pub fn delta(&self) -> Vec2 {
        self.end - self.start
    }

    /// Length of the segment
    pub fn length(&self) -> f32 {
        self.delta().magnitude()
    }

    /// Check for zero length or non-finite endpoints
    pub fn is_degenerate(&self) -> bool {
        !is_finite(self.start) || !is_finite(self.end) || self.delta().magnitude_squared() < EPSILON * EPSILON
    }

    /// Midpoint of the segment
    pub fn midpoint(&self) -> Vec2 {
        (self.start + self.end) * 0.5
    }

    /// Point at parameter `t` (0 = start, 1 = end)
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.start + self.delta() * t
    }

    /// Unit normal (counter-clockwise perpendicular of the direction)
    pub fn normal(&self) -> Vec2 {
        try_normalize(perpendicular(self.delta())).unwrap_or_else(Vec2::y)
    }

    /// Axis-aligned bounds of the segment
    pub fn bounding_area(&self) -> BoundingArea {
        if self.is_degenerate() {
            return BoundingArea::empty();
        }
        BoundingArea::from_corners(self.start, self.end)
    }

    /// Closest point on the segment to `point`, with its parameter
    pub fn closest_point(&self, point: Vec2) -> (Vec2, f32) {
        let delta = self.delta();
        let length_sq = delta.magnitude_squared();
        if length_sq < EPSILON * EPSILON {
            return (self.start, 0.0);
        }
        let t = ((point - self.start).dot(&delta) / length_sq).clamp(0.0, 1.0);
        (self.point_at(t), t)
    }

    /// Distance from `point` to the segment
    pub fn distance_to(&self, point: Vec2) -> f32 {
        (point - self.closest_point(point).0).magnitude()
    }

    /// Intersection with another segment
    ///
    /// Returns the intersection nearest to `self.start` as `(point, t, u)`
    /// where `t` parameterizes `self` and `u` parameterizes `other`. Collinear
    /// overlapping segments report the start of the shared stretch.
    pub fn intersect_segment(&self, other: &LineSegment) -> Option<(Vec2, f32, f32)> {
        let d1 = self.delta();
        let d2 = other.delta();
        let start_delta = other.start - self.start;
        let denominator = cross(d1, d2);

        if approx_zero(denominator) {
            return self.intersect_collinear(other);
        }

        let t = cross(start_delta, d2) / denominator;
        let u = cross(start_delta, d1) / denominator;
        if (-EPSILON..=1.0 + EPSILON).contains(&t) && (-EPSILON..=1.0 + EPSILON).contains(&u) {
            let t = t.clamp(0.0, 1.0);
            Some((self.point_at(t), t, u.clamp(0.0, 1.0)))
        } else {
            None
        }
    }

    fn intersect_collinear(&self, other: &LineSegment) -> Option<(Vec2, f32, f32)> {
        let d1 = self.delta();
        let length_sq = d1.magnitude_squared();
        if length_sq < EPSILON * EPSILON || !approx_zero(cross(other.start - self.start, d1) / length_sq.sqrt()) {
            return None;
        }

        let t0 = (other.start - self.start).dot(&d1) / length_sq;
        let t1 = (other.end - self.start).dot(&d1) / length_sq;
        let low = t0.min(t1).max(0.0);
        let high = t0.max(t1).min(1.0);
        if low > high {
            return None;
        }

        let point = self.point_at(low);
        let u = if other.is_degenerate() { 0.0 } else { other.closest_point(point).1 };
        Some((point, low, u))
    }
}

/// A bounded ray used by raycast queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec2,
    /// Unit direction of the ray
    pub direction: Vec2,
    /// Maximum travel distance
    pub distance: f32,
}

impl Ray {
    /// Creates a ray, or `None` when the direction has no length or the
    /// distance is not a positive finite number
    pub fn new(origin: Vec2, direction: Vec2, distance: f32) -> Option<Self> {
        if !is_finite(origin) || !distance.is_finite() || distance <= 0.0 {
            return None;
        }
        let direction = try_normalize(direction)?;
        Some(Self {
            origin,
            direction,
            distance,
        })
    }

    /// Get a point along the ray at distance `t`
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.origin + self.direction * t
    }

    /// The ray as a segment from the origin to its far end
    pub fn segment(&self) -> LineSegment {
        LineSegment::new(self.origin, self.point_at(self.distance))
    }

    /// Bounds of the swept segment (the broad-phase query area)
    pub fn bounding_area(&self) -> BoundingArea {
        BoundingArea::from_corners(self.origin, self.point_at(self.distance))
    }
}

/// Where a segment first enters a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    /// Contact point in world space
    pub point: Vec2,
    /// Parameter along the probing segment (0 = start, 1 = end)
    pub t: f32,
    /// Surface normal at the contact, facing the segment start
    pub normal: Vec2,
}

/// Project points onto an axis, returning `(min, max)`
pub fn project_points(points: &[Vec2], axis: Vec2) -> (f32, f32) {
    points.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), point| {
        let projection = point.dot(&axis);
        (min.min(projection), max.max(projection))
    })
}

/// Signed area of a polygon (positive for counter-clockwise winding)
pub fn signed_area(points: &[Vec2]) -> f32 {
    edges(points).map(|(a, b)| cross(a, b)).sum::<f32>() * 0.5
}

/// Arithmetic mean of the points
pub fn centroid(points: &[Vec2]) -> Vec2 {
    if points.is_empty() {
        return Vec2::zeros();
    }
    points.iter().sum::<Vec2>() / points.len() as f32
}

/// Iterate over the closed polygon's edges as `(from, to)` pairs
pub fn edges(points: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let count = points.len();
    (0..count).map(move |i| (points[i], points[(i + 1) % count]))
}
