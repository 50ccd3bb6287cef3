//! Colliders attached to physics bodies
//!
//! A collider pairs a body-local [`ColliderShape`] with its layer mask and
//! trigger flag. It keeps a copy of the owning body's transform and caches
//! the world-space bounding area behind a dirty flag: any change to the
//! transform, offset or shape invalidates the cache, and the next read
//! recomputes it.

use super::primitives::{LineSegment, SegmentHit};
use super::sat::{collide, Contact};
use super::shape::{ColliderShape, WorldShape};
use crate::foundation::math::{Transform2D, Vec2};
use crate::physics::collision_layers::CollisionLayers;
use crate::spatial::{Bounded, BoundingArea};
use std::cell::Cell;

/// A collision shape owned by one physics body
#[derive(Debug, Clone)]
pub struct Collider {
    shape: ColliderShape,
    offset: Vec2,
    layers: CollisionLayers,
    is_trigger: bool,
    transform: Transform2D,
    dirty: Cell<bool>,
    cached_bounds: Cell<BoundingArea>,
}

impl Collider {
    /// Create a collider on every layer with no offset
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            offset: Vec2::zeros(),
            layers: CollisionLayers::ALL,
            is_trigger: false,
            transform: Transform2D::identity(),
            dirty: Cell::new(true),
            cached_bounds: Cell::new(BoundingArea::empty()),
        }
    }

    /// Builder-style body-local offset
    #[must_use]
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.set_offset(offset);
        self
    }

    /// Builder-style layer mask
    #[must_use]
    pub fn with_layers(mut self, layers: CollisionLayers) -> Self {
        self.layers = layers;
        self
    }

    /// Builder-style trigger flag
    #[must_use]
    pub fn with_trigger(mut self, is_trigger: bool) -> Self {
        self.is_trigger = is_trigger;
        self
    }

    /// Builder-style owner transform
    #[must_use]
    pub fn with_transform(mut self, transform: Transform2D) -> Self {
        self.set_transform(transform);
        self
    }

    /// Body-local shape
    pub fn shape(&self) -> &ColliderShape {
        &self.shape
    }

    /// Body-local offset
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Layer mask
    pub fn layers(&self) -> CollisionLayers {
        self.layers
    }

    /// Whether this collider only reports overlaps
    pub fn is_trigger(&self) -> bool {
        self.is_trigger
    }

    /// Last transform received from the owning body
    pub fn transform(&self) -> &Transform2D {
        &self.transform
    }

    /// Replace the layer mask
    pub fn set_layers(&mut self, layers: CollisionLayers) {
        self.layers = layers;
    }

    /// Set the trigger flag
    pub fn set_trigger(&mut self, is_trigger: bool) {
        self.is_trigger = is_trigger;
    }

    /// Replace the shape and invalidate the cached bounds
    pub fn set_shape(&mut self, shape: ColliderShape) {
        self.shape = shape;
        self.dirty.set(true);
    }

    /// Move the shape within the body and invalidate the cached bounds
    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
        self.dirty.set(true);
    }

    /// Update the owning body's transform and invalidate the cached bounds
    pub fn set_transform(&mut self, transform: Transform2D) {
        if self.transform != transform {
            self.transform = transform;
            self.dirty.set(true);
        }
    }

    /// Check whether the cached bounds will be recomputed on next read
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// World-space axis-aligned bounds of the shape
    pub fn bounding_area(&self) -> BoundingArea {
        if self.dirty.get() {
            self.cached_bounds.set(self.world_shape().bounding_area());
            self.dirty.set(false);
        }
        self.cached_bounds.get()
    }

    /// The shape transformed into world space
    pub fn world_shape(&self) -> WorldShape {
        self.shape.to_world_space(&self.transform, self.offset)
    }

    /// Exact point-in-shape test
    pub fn contains(&self, point: Vec2) -> bool {
        self.bounding_area().contains(point) && self.world_shape().contains_point(point)
    }

    /// Narrow-phase test against another collider
    ///
    /// Colliders whose layer masks do not intersect are rejected before any
    /// geometry is computed. The contact is expressed from this collider's
    /// side: applying its MTV to `self` separates the pair.
    pub fn intersects(&self, other: &Collider) -> Option<Contact> {
        if !self.layers.interacts_with(other.layers) {
            return None;
        }
        if !self.bounding_area().overlaps(&other.bounding_area()) {
            return None;
        }
        collide(&self.world_shape(), &other.world_shape())
    }

    /// First point where `segment` enters this collider
    pub fn intersects_ray(&self, segment: &LineSegment) -> Option<SegmentHit> {
        if !self.bounding_area().overlaps(&segment.bounding_area()) {
            return None;
        }
        self.world_shape().intersect_segment(segment)
    }
}

impl Bounded for Collider {
    fn bounding_area(&self) -> BoundingArea {
        Collider::bounding_area(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(position: Vec2) -> Collider {
        Collider::new(ColliderShape::rectangle(2.0, 2.0).unwrap()).with_transform(Transform2D::from_position(position))
    }

    #[test]
    fn test_bounds_follow_transform() {
        let mut collider = square(Vec2::zeros());
        assert_eq!(
            collider.bounding_area(),
            BoundingArea::new(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0))
        );
        assert!(!collider.is_dirty());

        collider.set_transform(Transform2D::from_position(Vec2::new(10.0, 0.0)));
        assert!(collider.is_dirty());
        assert_eq!(
            collider.bounding_area(),
            BoundingArea::new(Vec2::new(9.0, -1.0), Vec2::new(11.0, 1.0))
        );
    }

    #[test]
    fn test_offset_and_shape_changes_invalidate() {
        let mut collider = square(Vec2::zeros());
        collider.bounding_area();

        collider.set_offset(Vec2::new(0.0, 5.0));
        assert_relative_eq!(collider.bounding_area().center(), Vec2::new(0.0, 5.0));

        collider.set_shape(ColliderShape::circle(3.0).unwrap());
        assert_relative_eq!(collider.bounding_area().width(), 6.0);
    }

    #[test]
    fn test_unchanged_transform_keeps_cache() {
        let mut collider = square(Vec2::zeros());
        collider.bounding_area();
        collider.set_transform(Transform2D::identity());
        assert!(!collider.is_dirty());
    }

    #[test]
    fn test_layer_filter_short_circuits() {
        let player = square(Vec2::zeros()).with_layers(CollisionLayers::PLAYER);
        let enemy = square(Vec2::new(0.5, 0.0)).with_layers(CollisionLayers::ENEMY);
        let wall = square(Vec2::new(0.5, 0.0)).with_layers(CollisionLayers::PLAYER | CollisionLayers::ENVIRONMENT);

        assert!(player.intersects(&enemy).is_none());
        assert!(player.intersects(&wall).is_some());
    }

    #[test]
    fn test_contains_point() {
        let collider = Collider::new(ColliderShape::circle(1.0).unwrap())
            .with_offset(Vec2::new(1.0, 0.0))
            .with_transform(Transform2D::from_position(Vec2::new(4.0, 0.0)));

        assert!(collider.contains(Vec2::new(5.5, 0.0)));
        assert!(!collider.contains(Vec2::new(4.1, 0.9)));
    }

    #[test]
    fn test_ray_hits_circle_entry() {
        let collider =
            Collider::new(ColliderShape::circle(1.0).unwrap()).with_transform(Transform2D::from_position(Vec2::new(5.0, 0.0)));

        let hit = collider
            .intersects_ray(&LineSegment::new(Vec2::zeros(), Vec2::new(10.0, 0.0)))
            .unwrap();
        assert_relative_eq!(hit.point, Vec2::new(4.0, 0.0), epsilon = 1e-5);
    }
}
