//! Collider shape definitions
//!
//! [`ColliderShape`] is stored in body-local space; [`WorldShape`] is the
//! temporary world-space form produced on demand for collision tests.

use super::primitives::{centroid, edges, signed_area, LineSegment, SegmentHit};
use crate::foundation::math::{cross, is_finite, perpendicular, try_normalize, Transform2D, Vec2, EPSILON};
use crate::spatial::BoundingArea;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the validating shape constructors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// Polygon has fewer than three points
    #[error("Polygon needs at least 3 points, got {0}")]
    TooFewPoints(usize),

    /// A coordinate or size is NaN or infinite
    #[error("Shape parameters must be finite")]
    NonFinite,

    /// Polygon points do not describe a convex outline
    #[error("Polygon is not convex")]
    NotConvex,

    /// Radius, extent or length is zero or negative
    #[error("Shape size must be positive, got {0}")]
    NonPositiveSize(f32),
}

/// Which transform scale component scales a circle's radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScaleAxis {
    /// Horizontal scale
    X,
    /// Vertical scale
    Y,
    /// Larger of the two
    #[default]
    Max,
    /// Smaller of the two
    Min,
}

impl ScaleAxis {
    fn pick(self, scale: Vec2) -> f32 {
        let scale = scale.abs();
        match self {
            Self::X => scale.x,
            Self::Y => scale.y,
            Self::Max => scale.x.max(scale.y),
            Self::Min => scale.x.min(scale.y),
        }
    }
}

/// Collider shape types (stored in BODY-LOCAL space, relative to the
/// collider offset)
///
/// Deserialized shapes go through the validating constructors, so a shape
/// file cannot produce a concave or inverted polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ShapeDef")]
pub enum ColliderShape {
    /// A one-sided line (ground, thin platforms); never resolves a translation
    Line {
        /// First endpoint
        start: Vec2,
        /// Second endpoint
        end: Vec2,
    },
    /// A rectangle centered on the collider offset
    Rectangle {
        /// Half width and half height
        half_extents: Vec2,
    },
    /// A circle centered on the collider offset
    Circle {
        /// Unscaled radius
        radius: f32,
        /// Scale component applied to the radius
        scale_axis: ScaleAxis,
    },
    /// A convex polygon, counter-clockwise
    Polygon {
        /// Ordered outline points
        points: Vec<Vec2>,
    },
}

/// Unchecked on-disk form of [`ColliderShape`]
#[derive(Deserialize)]
enum ShapeDef {
    Line { start: Vec2, end: Vec2 },
    Rectangle { half_extents: Vec2 },
    Circle {
        radius: f32,
        #[serde(default)]
        scale_axis: ScaleAxis,
    },
    Polygon { points: Vec<Vec2> },
}

impl TryFrom<ShapeDef> for ColliderShape {
    type Error = ShapeError;

    fn try_from(def: ShapeDef) -> Result<Self, Self::Error> {
        match def {
            ShapeDef::Line { start, end } => Self::line(start, end),
            ShapeDef::Rectangle { half_extents } => Self::rectangle(half_extents.x * 2.0, half_extents.y * 2.0),
            ShapeDef::Circle { radius, scale_axis } => Self::circle_with_axis(radius, scale_axis),
            ShapeDef::Polygon { points } => Self::polygon(points),
        }
    }
}

impl ColliderShape {
    /// Line shape between two local points
    pub fn line(start: Vec2, end: Vec2) -> Result<Self, ShapeError> {
        if !is_finite(start) || !is_finite(end) {
            return Err(ShapeError::NonFinite);
        }
        let length = (end - start).magnitude();
        if length < EPSILON {
            return Err(ShapeError::NonPositiveSize(length));
        }
        Ok(Self::Line { start, end })
    }

    /// Rectangle shape from its full width and height
    pub fn rectangle(width: f32, height: f32) -> Result<Self, ShapeError> {
        for size in [width, height] {
            if !size.is_finite() {
                return Err(ShapeError::NonFinite);
            }
            if size <= 0.0 {
                return Err(ShapeError::NonPositiveSize(size));
            }
        }
        Ok(Self::Rectangle {
            half_extents: Vec2::new(width, height) * 0.5,
        })
    }

    /// Circle shape scaled by the larger transform axis
    pub fn circle(radius: f32) -> Result<Self, ShapeError> {
        Self::circle_with_axis(radius, ScaleAxis::Max)
    }

    /// Circle shape scaled by the given transform axis
    pub fn circle_with_axis(radius: f32, scale_axis: ScaleAxis) -> Result<Self, ShapeError> {
        if !radius.is_finite() {
            return Err(ShapeError::NonFinite);
        }
        if radius <= 0.0 {
            return Err(ShapeError::NonPositiveSize(radius));
        }
        Ok(Self::Circle { radius, scale_axis })
    }

    /// Convex polygon shape; clockwise input is reversed to counter-clockwise
    pub fn polygon(points: Vec<Vec2>) -> Result<Self, ShapeError> {
        if points.len() < 3 {
            return Err(ShapeError::TooFewPoints(points.len()));
        }
        if !points.iter().all(|point| is_finite(*point)) {
            return Err(ShapeError::NonFinite);
        }

        let mut points = points;
        let area = signed_area(&points);
        if area.abs() < EPSILON {
            return Err(ShapeError::NonPositiveSize(area.abs()));
        }
        if area < 0.0 {
            points.reverse();
        }
        if !is_convex_ccw(&points) {
            return Err(ShapeError::NotConvex);
        }
        Ok(Self::Polygon { points })
    }

    /// Transform this shape to world space
    ///
    /// `offset` is the collider's body-local offset; the result is a
    /// temporary shape for collision testing.
    pub fn to_world_space(&self, transform: &Transform2D, offset: Vec2) -> WorldShape {
        match self {
            Self::Line { start, end } => WorldShape::Segment(LineSegment::new(
                transform.transform_point(offset + start),
                transform.transform_point(offset + end),
            )),
            Self::Rectangle { half_extents } => {
                let h = half_extents.abs();
                let corners = [
                    Vec2::new(-h.x, -h.y),
                    Vec2::new(h.x, -h.y),
                    Vec2::new(h.x, h.y),
                    Vec2::new(-h.x, h.y),
                ];
                WorldShape::polygon(corners.iter().map(|corner| transform.transform_point(offset + corner)).collect())
            }
            Self::Circle { radius, scale_axis } => WorldShape::Circle {
                center: transform.transform_point(offset),
                radius: radius * scale_axis.pick(transform.scale),
            },
            Self::Polygon { points } => {
                WorldShape::polygon(points.iter().map(|point| transform.transform_point(offset + point)).collect())
            }
        }
    }
}

fn is_convex_ccw(points: &[Vec2]) -> bool {
    let count = points.len();
    (0..count).all(|i| {
        let a = points[i];
        let b = points[(i + 1) % count];
        let c = points[(i + 2) % count];
        cross(b - a, c - b) >= -EPSILON
    })
}

/// World-space collision shape (temporary, for testing only)
#[derive(Debug, Clone, PartialEq)]
pub enum WorldShape {
    /// World-space segment
    Segment(LineSegment),
    /// World-space circle
    Circle {
        /// Center position
        center: Vec2,
        /// Scaled radius
        radius: f32,
    },
    /// World-space convex polygon, counter-clockwise
    Polygon(Vec<Vec2>),
}

impl WorldShape {
    /// Build a polygon, fixing the winding to counter-clockwise
    pub fn polygon(mut points: Vec<Vec2>) -> Self {
        if signed_area(&points) < 0.0 {
            points.reverse();
        }
        Self::Polygon(points)
    }

    /// Check whether the shape has no collision footprint
    pub fn is_degenerate(&self) -> bool {
        match self {
            Self::Segment(segment) => segment.is_degenerate(),
            Self::Circle { center, radius } => !is_finite(*center) || !radius.is_finite() || *radius <= 0.0,
            Self::Polygon(points) => {
                points.len() < 3
                    || !points.iter().all(|point| is_finite(*point))
                    || signed_area(points).abs() < EPSILON
            }
        }
    }

    /// Axis-aligned world bounds (empty for degenerate shapes)
    pub fn bounding_area(&self) -> BoundingArea {
        if self.is_degenerate() {
            return BoundingArea::empty();
        }
        match self {
            Self::Segment(segment) => segment.bounding_area(),
            Self::Circle { center, radius } => BoundingArea::from_center_extents(*center, Vec2::repeat(*radius)),
            Self::Polygon(points) => BoundingArea::from_points(points.iter().copied()),
        }
    }

    /// Representative center point
    pub fn center(&self) -> Vec2 {
        match self {
            Self::Segment(segment) => segment.midpoint(),
            Self::Circle { center, .. } => *center,
            Self::Polygon(points) => centroid(points),
        }
    }

    /// Exact point-in-shape test (boundary inclusive)
    ///
    /// Segments have no area; points within a small tolerance of the line
    /// count as contained.
    pub fn contains_point(&self, point: Vec2) -> bool {
        if self.is_degenerate() {
            return false;
        }
        match self {
            Self::Segment(segment) => segment.distance_to(point) <= EPSILON * 10.0,
            Self::Circle { center, radius } => (point - center).magnitude_squared() <= radius * radius,
            Self::Polygon(points) => polygon_contains_point(points, point),
        }
    }

    /// Check whether `other` lies entirely inside this shape
    pub fn contains_shape(&self, other: &WorldShape) -> bool {
        match (self, other) {
            (Self::Segment(_), _) => false,
            (_, Self::Segment(segment)) => self.contains_point(segment.start) && self.contains_point(segment.end),
            (Self::Circle { center, radius }, Self::Circle { center: inner, radius: inner_radius }) => {
                (inner - center).magnitude() + inner_radius <= *radius
            }
            (Self::Circle { .. } | Self::Polygon(_), Self::Polygon(points)) => {
                points.iter().all(|point| self.contains_point(*point))
            }
            (Self::Polygon(points), Self::Circle { center, radius }) => {
                polygon_contains_point(points, *center)
                    && edges(points).all(|(a, b)| {
                        try_normalize(b - a).map_or(true, |edge| cross(edge, center - a) >= *radius)
                    })
            }
        }
    }

    /// First point where `probe` (from its start) enters this shape
    ///
    /// A probe starting inside the shape hits at its start.
    pub fn intersect_segment(&self, probe: &LineSegment) -> Option<SegmentHit> {
        if self.is_degenerate() || probe.is_degenerate() {
            return None;
        }
        let backwards = try_normalize(-probe.delta()).unwrap_or_else(Vec2::y);

        match self {
            Self::Segment(segment) => probe.intersect_segment(segment).map(|(point, t, _)| {
                let normal = segment.normal();
                let normal = if normal.dot(&probe.delta()) > 0.0 { -normal } else { normal };
                SegmentHit { point, t, normal }
            }),
            Self::Circle { center, radius } => {
                let delta = probe.delta();
                let to_start = probe.start - center;
                let c = to_start.magnitude_squared() - radius * radius;
                if c <= 0.0 {
                    return Some(SegmentHit {
                        point: probe.start,
                        t: 0.0,
                        normal: backwards,
                    });
                }

                let a = delta.magnitude_squared();
                let b = 2.0 * to_start.dot(&delta);
                let discriminant = b * b - 4.0 * a * c;
                if discriminant < 0.0 {
                    return None;
                }

                let t = (-b - discriminant.sqrt()) / (2.0 * a);
                if !(0.0..=1.0).contains(&t) {
                    return None;
                }
                let point = probe.point_at(t);
                Some(SegmentHit {
                    point,
                    t,
                    normal: try_normalize(point - center).unwrap_or(backwards),
                })
            }
            Self::Polygon(points) => {
                if polygon_contains_point(points, probe.start) {
                    return Some(SegmentHit {
                        point: probe.start,
                        t: 0.0,
                        normal: backwards,
                    });
                }

                edges(points)
                    .filter_map(|(a, b)| {
                        let edge = LineSegment::new(a, b);
                        probe.intersect_segment(&edge).map(|(point, t, _)| SegmentHit {
                            point,
                            t,
                            normal: -edge.normal(),
                        })
                    })
                    .min_by(|x, y| x.t.total_cmp(&y.t))
            }
        }
    }
}

/// Point-in-convex-polygon test for counter-clockwise outlines
pub fn polygon_contains_point(points: &[Vec2], point: Vec2) -> bool {
    points.len() >= 3 && edges(points).all(|(a, b)| cross(b - a, point - a) >= -EPSILON)
}

/// Outward unit normals of a counter-clockwise polygon, in edge order
pub fn outward_normals(points: &[Vec2]) -> impl Iterator<Item = Vec2> + '_ {
    edges(points).filter_map(|(a, b)| try_normalize(-perpendicular(b - a)))
}
