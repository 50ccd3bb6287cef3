//! Physics module for collision detection and queries
//!
//! Provides quad tree broad-phase and SAT narrow-phase collision detection
//! for 2D colliders, bounded raycasts, and the fixed-timestep orchestrator
//! that ties them to a scene of physics bodies.

pub mod body;
pub mod collision;
pub mod collision_layers;
pub mod events;
pub mod physics_module;

#[cfg(test)]
mod tests;

pub use body::{BodySet, CollisionBody, PhysicsBody, PhysicsMaterial, PhysicsScene};
pub use collision::{Collider, ColliderShape, Contact, LineSegment, Ray, ScaleAxis, ShapeError, WorldShape};
pub use collision_layers::CollisionLayers;
pub use events::{ColliderId, CollisionEventArgs, CollisionPair, RaycastHit};
pub use physics_module::{PhysicsConfig, PhysicsModule, PhysicsState, TickStats};
