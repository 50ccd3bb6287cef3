//! Scenario tests driving the physics module over small scenes

mod raycast_scenarios;

use crate::foundation::collections::BodyHandle;
use crate::foundation::math::Vec2;
use crate::physics::{BodySet, Collider, ColliderShape, CollisionBody, CollisionLayers};

/// Body with one axis-aligned box collider centered on `center`
fn box_body(center: Vec2, half_extents: Vec2, layers: CollisionLayers) -> CollisionBody {
    let shape = ColliderShape::rectangle(half_extents.x * 2.0, half_extents.y * 2.0).unwrap();
    CollisionBody::at(center).with_collider(Collider::new(shape).with_layers(layers))
}

/// Body with one circle collider centered on `center`
fn circle_body(center: Vec2, radius: f32, layers: CollisionLayers) -> CollisionBody {
    let shape = ColliderShape::circle(radius).unwrap();
    CollisionBody::at(center).with_collider(Collider::new(shape).with_layers(layers))
}

fn insert_all(bodies: impl IntoIterator<Item = CollisionBody>) -> (BodySet<CollisionBody>, Vec<BodyHandle>) {
    let mut set = BodySet::new();
    let handles = bodies.into_iter().map(|body| set.insert(body)).collect();
    (set, handles)
}
