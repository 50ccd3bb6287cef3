//! Narrow-phase intersection tests (Separating Axis Theorem)
//!
//! Every routine reports a [`Contact`] whose normal points from the second
//! shape towards the first, so `normal * depth` is the minimum translation
//! that moves the first shape out of the second. Touching shapes collide
//! with zero depth.

use super::primitives::{centroid, edges, project_points, LineSegment};
use super::shape::{outward_normals, polygon_contains_point, WorldShape};
use crate::foundation::math::{try_normalize, Vec2, EPSILON};

/// Result of a narrow-phase test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit separation normal, pointing from the second shape to the first
    pub normal: Vec2,
    /// Penetration depth along `normal` (0 for touching shapes and lines)
    pub depth: f32,
    /// The first shape fully encloses the second
    pub first_contains_second: bool,
    /// The second shape fully encloses the first
    pub second_contains_first: bool,
}

impl Contact {
    /// Translation that separates the first shape from the second
    pub fn minimum_translation_vector(&self) -> Vec2 {
        self.normal * self.depth
    }

    /// The same contact seen from the other shape
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            depth: self.depth,
            first_contains_second: self.second_contains_first,
            second_contains_first: self.first_contains_second,
        }
    }
}

/// Test two world shapes for intersection
pub fn collide(first: &WorldShape, second: &WorldShape) -> Option<Contact> {
    if first.is_degenerate() || second.is_degenerate() {
        return None;
    }

    let (normal, depth) = match (first, second) {
        (WorldShape::Segment(_), _) | (_, WorldShape::Segment(_)) => segment_contact(first, second)?,
        (WorldShape::Polygon(a), WorldShape::Polygon(b)) => polygon_polygon(a, b)?,
        (WorldShape::Circle { center: a, radius: ra }, WorldShape::Circle { center: b, radius: rb }) => {
            circle_circle(*a, *ra, *b, *rb)?
        }
        (WorldShape::Circle { center, radius }, WorldShape::Polygon(points)) => {
            circle_polygon(*center, *radius, points)?
        }
        (WorldShape::Polygon(points), WorldShape::Circle { center, radius }) => {
            let (normal, depth) = circle_polygon(*center, *radius, points)?;
            (-normal, depth)
        }
    };

    Some(Contact {
        normal,
        depth,
        first_contains_second: first.contains_shape(second),
        second_contains_first: second.contains_shape(first),
    })
}

/// Overlap of two projections on `axis`
///
/// Returns the direction the first interval must move along (as a signed
/// axis) and how far, or `None` when the intervals are disjoint.
fn axis_overlap(first: (f32, f32), second: (f32, f32), axis: Vec2, center_delta: Vec2) -> Option<(Vec2, f32)> {
    let (first_min, first_max) = first;
    let (second_min, second_max) = second;
    if first_max < second_min || second_max < first_min {
        return None;
    }

    let push_positive = second_max - first_min;
    let push_negative = first_max - second_min;

    if push_positive < push_negative {
        Some((axis, push_positive))
    } else if push_negative < push_positive {
        Some((-axis, push_negative))
    } else if center_delta.dot(&axis) < 0.0 {
        Some((-axis, push_negative))
    } else {
        Some((axis, push_positive))
    }
}

fn min_overlap<I>(axes: I, mut project: impl FnMut(Vec2) -> ((f32, f32), (f32, f32)), center_delta: Vec2) -> Option<(Vec2, f32)>
where
    I: IntoIterator<Item = Vec2>,
{
    let mut best: Option<(Vec2, f32)> = None;
    for axis in axes {
        let (first, second) = project(axis);
        let (normal, depth) = axis_overlap(first, second, axis, center_delta)?;
        if best.map_or(true, |(_, best_depth)| depth < best_depth) {
            best = Some((normal, depth));
        }
    }
    best
}

/// Polygon vs polygon; axes are the first polygon's edge normals followed by
/// the second's
fn polygon_polygon(a: &[Vec2], b: &[Vec2]) -> Option<(Vec2, f32)> {
    let center_delta = centroid(a) - centroid(b);
    min_overlap(
        outward_normals(a).chain(outward_normals(b)),
        |axis| (project_points(a, axis), project_points(b, axis)),
        center_delta,
    )
}

fn circle_circle(a: Vec2, ra: f32, b: Vec2, rb: f32) -> Option<(Vec2, f32)> {
    let delta = a - b;
    let distance = delta.magnitude();
    let reach = ra + rb;
    if distance > reach {
        return None;
    }

    let normal = if distance < EPSILON { Vec2::y() } else { delta / distance };
    Some((normal, reach - distance))
}

/// Circle (first) vs polygon (second)
///
/// Axes are the polygon's edge normals plus the axis from the polygon vertex
/// closest to the circle center.
fn circle_polygon(center: Vec2, radius: f32, points: &[Vec2]) -> Option<(Vec2, f32)> {
    let closest_vertex = points
        .iter()
        .copied()
        .min_by(|a, b| (a - center).magnitude_squared().total_cmp(&(b - center).magnitude_squared()))?;
    let vertex_axis = try_normalize(center - closest_vertex);
    let center_delta = center - centroid(points);

    min_overlap(
        outward_normals(points).chain(vertex_axis),
        |axis| {
            let projected = center.dot(&axis);
            ((projected - radius, projected + radius), project_points(points, axis))
        },
        center_delta,
    )
}

/// Any pairing that involves a line
///
/// Lines never resolve a translation: the contact has zero depth and the
/// line's normal, turned to face the first shape.
fn segment_contact(first: &WorldShape, second: &WorldShape) -> Option<(Vec2, f32)> {
    let (line, other) = match (first, second) {
        (_, WorldShape::Segment(segment)) => (segment, first),
        (WorldShape::Segment(segment), _) => (segment, second),
        _ => return None,
    };
    if !segment_touches(line, other) {
        return None;
    }

    let normal = line.normal();
    let facing = first.center() - second.center();
    let normal = if normal.dot(&facing) < 0.0 { -normal } else { normal };
    Some((normal, 0.0))
}

fn segment_touches(segment: &LineSegment, other: &WorldShape) -> bool {
    match other {
        WorldShape::Segment(other) => segment.intersect_segment(other).is_some(),
        WorldShape::Circle { center, radius } => segment.distance_to(*center) <= *radius,
        WorldShape::Polygon(points) => {
            polygon_contains_point(points, segment.start)
                || polygon_contains_point(points, segment.end)
                || edges(points)
                    .any(|(a, b)| segment.intersect_segment(&LineSegment::new(a, b)).is_some())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform2D;
    use crate::physics::collision::ColliderShape;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_4;

    fn rect(center: Vec2, half: Vec2) -> WorldShape {
        ColliderShape::rectangle(half.x * 2.0, half.y * 2.0)
            .unwrap()
            .to_world_space(&Transform2D::from_position(center), Vec2::zeros())
    }

    fn circle(center: Vec2, radius: f32) -> WorldShape {
        WorldShape::Circle { center, radius }
    }

    fn triangle(points: [Vec2; 3]) -> WorldShape {
        ColliderShape::polygon(points.to_vec())
            .unwrap()
            .to_world_space(&Transform2D::identity(), Vec2::zeros())
    }

    fn line(start: Vec2, end: Vec2) -> WorldShape {
        WorldShape::Segment(LineSegment::new(start, end))
    }

    #[test]
    fn test_rectangle_mtv_uses_shallowest_axis() {
        let a = rect(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0));
        let b = rect(Vec2::new(3.0, 1.0), Vec2::new(2.0, 2.0));

        let contact = collide(&a, &b).unwrap();
        assert_relative_eq!(contact.minimum_translation_vector(), Vec2::new(-1.0, 0.0), epsilon = 1e-5);
        assert!(!contact.first_contains_second);
        assert!(!contact.second_contains_first);
    }

    #[test]
    fn test_mtv_separates_shapes() {
        let a = rect(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0));
        let b = rect(Vec2::new(1.0, 3.0), Vec2::new(2.0, 2.0));

        let contact = collide(&a, &b).unwrap();
        let mtv = contact.minimum_translation_vector();
        assert_relative_eq!(mtv, Vec2::new(0.0, -1.0), epsilon = 1e-5);

        let moved = rect(Vec2::new(0.0, 0.0) + mtv * 1.01, Vec2::new(2.0, 2.0));
        assert!(collide(&moved, &b).is_none());
    }

    #[test]
    fn test_reversed_pair_flips_normal() {
        let a = rect(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0));
        let b = rect(Vec2::new(3.0, 1.0), Vec2::new(2.0, 2.0));

        let forward = collide(&a, &b).unwrap();
        let backward = collide(&b, &a).unwrap();
        assert_relative_eq!(forward.normal, -backward.normal, epsilon = 1e-5);
        assert_relative_eq!(forward.depth, backward.depth, epsilon = 1e-5);

        let flipped = forward.flipped();
        assert_relative_eq!(flipped.normal, backward.normal, epsilon = 1e-5);
        assert_eq!(flipped.first_contains_second, backward.first_contains_second);
    }

    #[test]
    fn test_separated_rectangles_miss() {
        let a = rect(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let b = rect(Vec2::new(3.0, 0.0), Vec2::new(1.0, 1.0));
        assert!(collide(&a, &b).is_none());
    }

    #[test]
    fn test_touching_rectangles_collide_with_zero_depth() {
        let a = rect(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let b = rect(Vec2::new(2.0, 0.0), Vec2::new(1.0, 1.0));

        let contact = collide(&a, &b).unwrap();
        assert_relative_eq!(contact.depth, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_containment_flags() {
        let outer = rect(Vec2::zeros(), Vec2::new(5.0, 5.0));
        let inner = rect(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0));

        let contact = collide(&outer, &inner).unwrap();
        assert!(contact.first_contains_second);
        assert!(!contact.second_contains_first);

        let contact = collide(&inner, &outer).unwrap();
        assert!(!contact.first_contains_second);
        assert!(contact.second_contains_first);
    }

    #[test]
    fn test_contained_rectangle_pushed_out_shortest_way() {
        let outer = rect(Vec2::zeros(), Vec2::new(5.0, 5.0));
        let inner = rect(Vec2::new(3.5, 0.0), Vec2::new(1.0, 1.0));

        let contact = collide(&inner, &outer).unwrap();
        assert_relative_eq!(contact.minimum_translation_vector(), Vec2::new(2.5, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_circle_circle() {
        let a = circle(Vec2::new(1.5, 0.0), 1.0);
        let b = circle(Vec2::zeros(), 1.0);

        let contact = collide(&a, &b).unwrap();
        assert_relative_eq!(contact.normal, Vec2::new(1.0, 0.0));
        assert_relative_eq!(contact.depth, 0.5, epsilon = 1e-5);

        assert!(collide(&circle(Vec2::new(2.5, 0.0), 1.0), &b).is_none());
    }

    #[test]
    fn test_concentric_circles_use_up_normal() {
        let contact = collide(&circle(Vec2::zeros(), 1.0), &circle(Vec2::zeros(), 2.0)).unwrap();
        assert_relative_eq!(contact.normal, Vec2::y());
        assert_relative_eq!(contact.depth, 3.0);
        assert!(contact.second_contains_first);
    }

    #[test]
    fn test_circle_against_rectangle_face() {
        let ball = circle(Vec2::new(0.0, 1.5), 1.0);
        let floor = rect(Vec2::zeros(), Vec2::new(4.0, 1.0));

        let contact = collide(&ball, &floor).unwrap();
        assert_relative_eq!(contact.minimum_translation_vector(), Vec2::new(0.0, 0.5), epsilon = 1e-5);

        let contact = collide(&floor, &ball).unwrap();
        assert_relative_eq!(contact.minimum_translation_vector(), Vec2::new(0.0, -0.5), epsilon = 1e-5);
    }

    #[test]
    fn test_circle_near_rectangle_corner_misses() {
        let ball = circle(Vec2::new(1.8, 1.8), 1.0);
        let square = rect(Vec2::zeros(), Vec2::new(1.0, 1.0));
        assert!(collide(&ball, &square).is_none());
    }

    #[test]
    fn test_rotated_square_against_triangle() {
        let diamond = ColliderShape::rectangle(2.0, 2.0)
            .unwrap()
            .to_world_space(&Transform2D::from_position_rotation(Vec2::zeros(), FRAC_PI_4), Vec2::zeros());
        let wedge = triangle([Vec2::new(1.2, -2.0), Vec2::new(4.0, 0.0), Vec2::new(1.2, 2.0)]);

        let contact = collide(&diamond, &wedge).unwrap();
        assert_relative_eq!(contact.depth, 2.0_f32.sqrt() - 1.2, epsilon = 1e-5);
        assert_relative_eq!(contact.normal, Vec2::new(-1.0, 0.0), epsilon = 1e-5);

        let pushed = ColliderShape::rectangle(2.0, 2.0).unwrap().to_world_space(
            &Transform2D::from_position_rotation(contact.minimum_translation_vector() * 1.01, FRAC_PI_4),
            Vec2::zeros(),
        );
        assert!(collide(&pushed, &wedge).is_none());
    }

    #[test]
    fn test_circle_against_triangle_vertex() {
        let ball = circle(Vec2::new(2.5, -0.3), 0.6);
        let wedge = triangle([Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(0.0, 2.0)]);

        let contact = collide(&ball, &wedge).unwrap();
        let to_center = Vec2::new(0.5, -0.3);
        assert_relative_eq!(contact.depth, 0.6 - to_center.magnitude(), epsilon = 1e-5);
        assert_relative_eq!(contact.normal, to_center.normalize(), epsilon = 1e-5);

        let reversed = collide(&wedge, &ball).unwrap();
        assert_relative_eq!(reversed.normal, -contact.normal, epsilon = 1e-5);
    }

    #[test]
    fn test_equal_overlap_keeps_first_axis() {
        // Overlap is 0.5 on both the bottom (first) and right (second) edge normals
        let a = rect(Vec2::zeros(), Vec2::new(1.0, 1.0));
        let b = rect(Vec2::new(1.5, 1.5), Vec2::new(1.0, 1.0));

        let contact = collide(&a, &b).unwrap();
        assert_relative_eq!(contact.depth, 0.5, epsilon = 1e-6);
        assert_relative_eq!(contact.normal, Vec2::new(0.0, -1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_line_contact_has_zero_depth() {
        let ground = line(Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0));
        let ball = circle(Vec2::new(0.0, 0.5), 1.0);

        let contact = collide(&ball, &ground).unwrap();
        assert_relative_eq!(contact.depth, 0.0);
        assert_relative_eq!(contact.normal, Vec2::y());
        assert_relative_eq!(contact.minimum_translation_vector(), Vec2::zeros());

        let contact = collide(&ground, &ball).unwrap();
        assert_relative_eq!(contact.normal, -Vec2::y());
    }

    #[test]
    fn test_line_against_polygon() {
        let square = rect(Vec2::zeros(), Vec2::new(1.0, 1.0));
        assert!(collide(&line(Vec2::new(-5.0, 0.0), Vec2::new(5.0, 0.0)), &square).is_some());
        assert!(collide(&line(Vec2::new(-0.5, 0.0), Vec2::new(0.5, 0.0)), &square).is_some());
        assert!(collide(&line(Vec2::new(-5.0, 3.0), Vec2::new(5.0, 3.0)), &square).is_none());
    }

    #[test]
    fn test_degenerate_shapes_never_collide() {
        let square = rect(Vec2::zeros(), Vec2::new(1.0, 1.0));
        assert!(collide(&circle(Vec2::zeros(), 0.0), &square).is_none());
    }
}
