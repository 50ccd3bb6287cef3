//! Collision and raycast result types
//!
//! Values here live for one tick at most: the physics module builds them
//! from its snapshot and hands them to bodies and callers.

use crate::foundation::collections::BodyHandle;
use crate::foundation::math::Vec2;

/// Identifies one collider: the owning body plus the collider's index in
/// that body's collider list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId {
    /// Owning body
    pub body: BodyHandle,
    /// Position in the body's collider list
    pub index: usize,
}

impl ColliderId {
    /// Create a collider id
    pub fn new(body: BodyHandle, index: usize) -> Self {
        Self { body, index }
    }
}

/// A confirmed collision between two colliders
///
/// `normal` points from `second` towards `first`, and
/// `minimum_translation_vector` moves `first` out of `second`. Line
/// colliders report a zero translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEventArgs {
    /// The receiving body's collider
    pub first: ColliderId,
    /// The other collider
    pub second: ColliderId,
    /// Unit contact normal
    pub normal: Vec2,
    /// Displacement that separates `first` from `second`
    pub minimum_translation_vector: Vec2,
    /// `first` fully encloses `second`
    pub first_contains_second: bool,
    /// `second` fully encloses `first`
    pub second_contains_first: bool,
    /// Either collider (or either owning body) is a trigger; callers skip
    /// MTV resolution for these
    pub is_trigger: bool,
}

impl CollisionEventArgs {
    /// The same collision as seen by the other collider's body
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self {
            first: self.second,
            second: self.first,
            normal: -self.normal,
            minimum_translation_vector: -self.minimum_translation_vector,
            first_contains_second: self.second_contains_first,
            second_contains_first: self.first_contains_second,
            is_trigger: self.is_trigger,
        }
    }

    /// Order-independent key for this collision
    pub fn pair(&self) -> CollisionPair {
        CollisionPair::new(self.first, self.second)
    }
}

/// A raycast contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Contact point in world space
    pub point: Vec2,
    /// Distance from the ray origin to `point`
    pub distance: f32,
    /// Surface normal at the contact, facing the ray origin
    pub normal: Vec2,
    /// The collider struck
    pub collider: ColliderId,
}

/// Collision pair representing two colliders that are touching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    /// Smaller collider id
    pub collider_a: ColliderId,
    /// Larger collider id
    pub collider_b: ColliderId,
}

impl CollisionPair {
    /// Create a new collision pair (always stores the smaller id first for consistency)
    pub fn new(collider_a: ColliderId, collider_b: ColliderId) -> Self {
        if collider_a <= collider_b {
            Self { collider_a, collider_b }
        } else {
            Self {
                collider_a: collider_b,
                collider_b: collider_a,
            }
        }
    }

    /// Check whether either side belongs to `body`
    pub fn involves(&self, body: BodyHandle) -> bool {
        self.collider_a.body == body || self.collider_b.body == body
    }
}
