//! Physics bodies and the scene boundary
//!
//! The physics module never owns gameplay objects. It reads bodies through
//! [`PhysicsScene`] while rebuilding its snapshot and writes back only
//! through [`PhysicsBody::on_collision`].

use crate::foundation::collections::{BodyHandle, HandleMap};
use crate::foundation::math::{Transform2D, Vec2};
use crate::physics::collision::Collider;
use crate::physics::events::CollisionEventArgs;
use serde::{Deserialize, Serialize};

/// Surface properties used by collision response code
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsMaterial {
    /// Friction coefficient
    pub friction: f32,
    /// Restitution (0 = no bounce, 1 = perfectly elastic)
    pub bounciness: f32,
    /// Mass per unit area
    pub density: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            friction: 0.5,
            bounciness: 0.0,
            density: 1.0,
        }
    }
}

/// Anything that takes part in collision detection
pub trait PhysicsBody {
    /// Colliders attached to this body, in a stable order
    fn colliders(&self) -> &[Collider];

    /// Triggers report overlaps but are not pushed apart
    fn is_trigger(&self) -> bool {
        false
    }

    /// Surface properties
    fn material(&self) -> PhysicsMaterial {
        PhysicsMaterial::default()
    }

    /// Disabled bodies are skipped when the tree is rebuilt
    fn is_enabled(&self) -> bool {
        true
    }

    /// Bodies without colliders contribute nothing to the tree
    fn has_collider(&self) -> bool {
        !self.colliders().is_empty()
    }

    /// Receive a collision in which one of this body's colliders is `first`
    fn on_collision(&mut self, event: &CollisionEventArgs);
}

/// The set of bodies the physics module ticks over
pub trait PhysicsScene {
    /// Call `visitor` for every body, in a stable order
    fn visit_bodies(&self, visitor: &mut dyn FnMut(BodyHandle, &dyn PhysicsBody));

    /// Mutable access for event delivery
    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut dyn PhysicsBody>;
}

/// Slot-map backed body storage
#[derive(Debug, Clone)]
pub struct BodySet<B> {
    bodies: HandleMap<B>,
}

impl<B> Default for BodySet<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> BodySet<B> {
    /// Create an empty set
    pub fn new() -> Self {
        Self {
            bodies: HandleMap::with_key(),
        }
    }

    /// Add a body and return its handle
    pub fn insert(&mut self, body: B) -> BodyHandle {
        self.bodies.insert(body)
    }

    /// Remove a body; its handle becomes invalid
    pub fn remove(&mut self, handle: BodyHandle) -> Option<B> {
        self.bodies.remove(handle)
    }

    /// Shared access to a body
    pub fn get(&self, handle: BodyHandle) -> Option<&B> {
        self.bodies.get(handle)
    }

    /// Mutable access to a body
    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut B> {
        self.bodies.get_mut(handle)
    }

    /// Check whether a handle is still live
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains_key(handle)
    }

    /// Number of bodies
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Check if the set has no bodies
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Iterate over `(handle, body)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &B)> {
        self.bodies.iter()
    }

    /// Iterate mutably over `(handle, body)` pairs
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut B)> {
        self.bodies.iter_mut()
    }
}

impl<B: PhysicsBody> PhysicsScene for BodySet<B> {
    fn visit_bodies(&self, visitor: &mut dyn FnMut(BodyHandle, &dyn PhysicsBody)) {
        for (handle, body) in &self.bodies {
            visitor(handle, body);
        }
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut dyn PhysicsBody> {
        self.bodies.get_mut(handle).map(|body| body as &mut dyn PhysicsBody)
    }
}

/// A ready-made body: a transform, its colliders and a queue of received
/// collision events
#[derive(Debug, Clone, Default)]
pub struct CollisionBody {
    transform: Transform2D,
    colliders: Vec<Collider>,
    is_trigger: bool,
    disabled: bool,
    material: PhysicsMaterial,
    events: Vec<CollisionEventArgs>,
}

impl CollisionBody {
    /// Create a body with no colliders
    pub fn new(transform: Transform2D) -> Self {
        Self {
            transform,
            ..Default::default()
        }
    }

    /// Create a body positioned at `position`
    pub fn at(position: Vec2) -> Self {
        Self::new(Transform2D::from_position(position))
    }

    /// Builder-style collider attachment
    #[must_use]
    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.add_collider(collider);
        self
    }

    /// Builder-style trigger flag
    #[must_use]
    pub fn with_trigger(mut self, is_trigger: bool) -> Self {
        self.is_trigger = is_trigger;
        self
    }

    /// Builder-style material
    #[must_use]
    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material;
        self
    }

    /// Attach a collider, returning its index
    pub fn add_collider(&mut self, mut collider: Collider) -> usize {
        collider.set_transform(self.transform);
        self.colliders.push(collider);
        self.colliders.len() - 1
    }

    /// Mutable access to one collider (shape, offset, layers)
    pub fn collider_mut(&mut self, index: usize) -> Option<&mut Collider> {
        self.colliders.get_mut(index)
    }

    /// Current transform
    pub fn transform(&self) -> &Transform2D {
        &self.transform
    }

    /// World position
    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    /// Move the body; every collider's cached bounds become dirty
    pub fn set_transform(&mut self, transform: Transform2D) {
        self.transform = transform;
        for collider in &mut self.colliders {
            collider.set_transform(transform);
        }
    }

    /// Shift the body by `delta`
    pub fn translate(&mut self, delta: Vec2) {
        let mut transform = self.transform;
        transform.position += delta;
        self.set_transform(transform);
    }

    /// Set the body-wide trigger flag
    pub fn set_trigger(&mut self, is_trigger: bool) {
        self.is_trigger = is_trigger;
    }

    /// Enable or disable the body
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Replace the surface properties
    pub fn set_material(&mut self, material: PhysicsMaterial) {
        self.material = material;
    }

    /// Events received since the last drain
    pub fn events(&self) -> &[CollisionEventArgs] {
        &self.events
    }

    /// Take every received event
    pub fn drain_events(&mut self) -> Vec<CollisionEventArgs> {
        std::mem::take(&mut self.events)
    }
}

impl PhysicsBody for CollisionBody {
    fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    fn is_trigger(&self) -> bool {
        self.is_trigger
    }

    fn material(&self) -> PhysicsMaterial {
        self.material
    }

    fn is_enabled(&self) -> bool {
        !self.disabled
    }

    fn on_collision(&mut self, event: &CollisionEventArgs) {
        self.events.push(*event);
    }
}
