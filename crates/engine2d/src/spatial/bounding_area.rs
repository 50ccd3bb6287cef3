//! Axis-aligned bounding area
//!
//! The leaf utility used by the quad tree, colliders and raycasts. Overlap is
//! inclusive: rectangles that only touch along an edge or a corner overlap.

use crate::foundation::math::{is_finite, Vec2};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in world space
///
/// `minimum <= maximum` on both axes for every non-empty area. The empty area
/// ([`BoundingArea::empty`]) is a sentinel with inverted infinite corners; it
/// overlaps nothing and contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingArea {
    /// Minimum corner
    pub minimum: Vec2,
    /// Maximum corner
    pub maximum: Vec2,
}

impl Default for BoundingArea {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingArea {
    /// The empty area
    pub fn empty() -> Self {
        Self {
            minimum: Vec2::repeat(f32::INFINITY),
            maximum: Vec2::repeat(f32::NEG_INFINITY),
        }
    }

    /// Create a new area from its minimum and maximum corners
    ///
    /// The corners are expected to be ordered. Debug builds assert it; release
    /// builds reorder them per axis.
    pub fn new(minimum: Vec2, maximum: Vec2) -> Self {
        debug_assert!(
            minimum.x <= maximum.x && minimum.y <= maximum.y,
            "inverted bounding area: min {minimum:?} max {maximum:?}"
        );
        Self::from_corners(minimum, maximum)
    }

    /// Create the smallest area covering two arbitrary corners
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        if !is_finite(a) || !is_finite(b) {
            return Self::empty();
        }
        Self {
            minimum: a.inf(&b),
            maximum: a.sup(&b),
        }
    }

    /// Create an area centered at a point with the given half-size
    pub fn from_center_extents(center: Vec2, extents: Vec2) -> Self {
        let extents = extents.abs();
        Self::from_corners(center - extents, center + extents)
    }

    /// Smallest area covering every point; empty for an empty iterator
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vec2>,
    {
        points
            .into_iter()
            .fold(Self::empty(), |area, point| area.union(&Self::from_corners(point, point)))
    }

    /// Check if this is the empty sentinel (or otherwise inverted)
    pub fn is_empty(&self) -> bool {
        !(self.minimum.x <= self.maximum.x && self.minimum.y <= self.maximum.y)
    }

    /// Width of the area (0 when empty)
    pub fn width(&self) -> f32 {
        if self.is_empty() { 0.0 } else { self.maximum.x - self.minimum.x }
    }

    /// Height of the area (0 when empty)
    pub fn height(&self) -> f32 {
        if self.is_empty() { 0.0 } else { self.maximum.y - self.minimum.y }
    }

    /// Get the center of the area
    pub fn center(&self) -> Vec2 {
        (self.minimum + self.maximum) * 0.5
    }

    /// Get the extents (half-size) of the area
    pub fn extents(&self) -> Vec2 {
        Vec2::new(self.width(), self.height()) * 0.5
    }

    /// Check if this area intersects another (edge-touching counts)
    pub fn overlaps(&self, other: &BoundingArea) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.minimum.x <= other.maximum.x
            && self.maximum.x >= other.minimum.x
            && self.minimum.y <= other.maximum.y
            && self.maximum.y >= other.minimum.y
    }

    /// Check if this area contains a point (boundary inclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.minimum.x
            && point.x <= self.maximum.x
            && point.y >= self.minimum.y
            && point.y <= self.maximum.y
    }

    /// Check if another area lies entirely inside this one
    pub fn contains_area(&self, other: &BoundingArea) -> bool {
        !other.is_empty() && self.contains(other.minimum) && self.contains(other.maximum)
    }

    /// Smallest area covering both
    #[must_use]
    pub fn union(&self, other: &BoundingArea) -> BoundingArea {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            minimum: self.minimum.inf(&other.minimum),
            maximum: self.maximum.sup(&other.maximum),
        }
    }

    /// Overlapping region of both; empty if they do not overlap
    #[must_use]
    pub fn intersect(&self, other: &BoundingArea) -> BoundingArea {
        if !self.overlaps(other) {
            return Self::empty();
        }
        Self {
            minimum: self.minimum.sup(&other.minimum),
            maximum: self.maximum.inf(&other.maximum),
        }
    }

    /// Grow the area by `margin` on every side
    #[must_use]
    pub fn expanded(&self, margin: f32) -> BoundingArea {
        if self.is_empty() {
            return *self;
        }
        let margin = Vec2::new(margin, margin);
        Self::from_corners(self.minimum - margin, self.maximum + margin)
    }

    /// The four equal quadrants of this area
    ///
    /// Order: south-west, south-east, north-west, north-east.
    pub fn quadrants(&self) -> [BoundingArea; 4] {
        let center = self.center();
        [
            Self::from_corners(self.minimum, center),
            Self::from_corners(Vec2::new(center.x, self.minimum.y), Vec2::new(self.maximum.x, center.y)),
            Self::from_corners(Vec2::new(self.minimum.x, center.y), Vec2::new(center.x, self.maximum.y)),
            Self::from_corners(center, self.maximum),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn area(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> BoundingArea {
        BoundingArea::new(Vec2::new(min_x, min_y), Vec2::new(max_x, max_y))
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let samples = [
            area(0.0, 0.0, 1.0, 1.0),
            area(1.0, 1.0, 2.0, 2.0),
            area(0.5, -3.0, 0.6, 3.0),
            area(5.0, 5.0, 6.0, 6.0),
            area(-10.0, -10.0, 10.0, 10.0),
            BoundingArea::empty(),
        ];

        for a in &samples {
            for b in &samples {
                assert_eq!(a.overlaps(b), b.overlaps(a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_edge_touching_overlaps() {
        assert!(area(0.0, 0.0, 1.0, 1.0).overlaps(&area(1.0, 0.0, 2.0, 1.0)));
        assert!(area(0.0, 0.0, 1.0, 1.0).overlaps(&area(1.0, 1.0, 2.0, 2.0)));
        assert!(!area(0.0, 0.0, 1.0, 1.0).overlaps(&area(1.01, 0.0, 2.0, 1.0)));
    }

    #[test]
    fn test_empty_matches_nothing() {
        let everything = area(-1e6, -1e6, 1e6, 1e6);
        assert!(BoundingArea::empty().is_empty());
        assert!(!everything.overlaps(&BoundingArea::empty()));
        assert!(!BoundingArea::empty().contains(Vec2::zeros()));
        assert!(!everything.contains_area(&BoundingArea::empty()));
    }

    #[test]
    fn test_from_corners_normalizes() {
        let normalized = BoundingArea::from_corners(Vec2::new(3.0, -1.0), Vec2::new(-2.0, 4.0));
        assert_eq!(normalized, area(-2.0, -1.0, 3.0, 4.0));
        assert_relative_eq!(normalized.width(), 5.0);
        assert_relative_eq!(normalized.height(), 5.0);
    }

    #[test]
    fn test_non_finite_corners_are_empty() {
        assert!(BoundingArea::from_corners(Vec2::new(f32::NAN, 0.0), Vec2::zeros()).is_empty());
    }

    #[test]
    fn test_union_and_intersect() {
        let a = area(0.0, 0.0, 2.0, 2.0);
        let b = area(1.0, 1.0, 3.0, 3.0);

        assert_eq!(a.union(&b), area(0.0, 0.0, 3.0, 3.0));
        assert_eq!(a.intersect(&b), area(1.0, 1.0, 2.0, 2.0));
        assert!(a.intersect(&area(5.0, 5.0, 6.0, 6.0)).is_empty());
        assert_eq!(BoundingArea::empty().union(&a), a);
    }

    #[test]
    fn test_quadrants_tile_parent() {
        let parent = area(-4.0, -4.0, 4.0, 4.0);
        let [sw, se, nw, ne] = parent.quadrants();

        assert_eq!(sw, area(-4.0, -4.0, 0.0, 0.0));
        assert_eq!(se, area(0.0, -4.0, 4.0, 0.0));
        assert_eq!(nw, area(-4.0, 0.0, 0.0, 4.0));
        assert_eq!(ne, area(0.0, 0.0, 4.0, 4.0));
    }

    #[test]
    fn test_from_points() {
        let bounds = BoundingArea::from_points([Vec2::new(1.0, 5.0), Vec2::new(-2.0, 3.0), Vec2::new(0.0, -1.0)]);
        assert_eq!(bounds, area(-2.0, -1.0, 1.0, 5.0));
        assert!(BoundingArea::from_points(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_expanded_grows_every_side() {
        assert_eq!(area(0.0, 0.0, 2.0, 2.0).expanded(1.0), area(-1.0, -1.0, 3.0, 3.0));
        assert!(BoundingArea::empty().expanded(5.0).is_empty());
    }
}
