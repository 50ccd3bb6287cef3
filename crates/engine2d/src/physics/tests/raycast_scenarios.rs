//! Raycasts against a rebuilt snapshot

use super::{box_body, circle_body, insert_all};
use crate::foundation::math::Vec2;
use crate::physics::{Collider, ColliderId, ColliderShape, CollisionBody, CollisionLayers, PhysicsModule};
use approx::assert_relative_eq;

#[test]
fn test_ray_enters_circle_at_near_side() {
    let (mut scene, handles) = insert_all([circle_body(Vec2::new(5.0, 0.0), 1.0, CollisionLayers::ALL)]);
    let mut module = PhysicsModule::default();
    module.fixed_update(&mut scene);

    let hit = module
        .try_raycast(Vec2::zeros(), Vec2::new(1.0, 0.0), 10.0, CollisionLayers::ALL)
        .unwrap();
    assert_relative_eq!(hit.point, Vec2::new(4.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(hit.distance, 4.0, epsilon = 1e-5);
    assert_eq!(hit.collider, ColliderId::new(handles[0], 0));
}

#[test]
fn test_nearest_hit_wins() {
    let (mut scene, handles) = insert_all([
        box_body(Vec2::new(8.0, 0.0), Vec2::new(1.0, 1.0), CollisionLayers::ALL),
        circle_body(Vec2::new(4.0, 0.0), 1.0, CollisionLayers::ALL),
    ]);
    let mut module = PhysicsModule::default();
    module.rebuild(&scene);

    let hits = module.raycast_all(Vec2::zeros(), Vec2::x(), 20.0, CollisionLayers::ALL);
    assert_eq!(hits.len(), 2);

    let nearest = module.try_raycast(Vec2::zeros(), Vec2::x(), 20.0, CollisionLayers::ALL).unwrap();
    assert_eq!(nearest.collider.body, handles[1]);
    assert_relative_eq!(nearest.point, Vec2::new(3.0, 0.0), epsilon = 1e-5);

    scene.remove(handles[1]);
    module.rebuild(&scene);
    let remaining = module.try_raycast(Vec2::zeros(), Vec2::x(), 20.0, CollisionLayers::ALL).unwrap();
    assert_relative_eq!(remaining.point, Vec2::new(7.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(remaining.normal, Vec2::new(-1.0, 0.0), epsilon = 1e-5);
}

#[test]
fn test_ray_too_short_misses() {
    let (scene, _) = insert_all([circle_body(Vec2::new(5.0, 0.0), 1.0, CollisionLayers::ALL)]);
    let mut module = PhysicsModule::default();
    module.rebuild(&scene);

    assert!(module.try_raycast(Vec2::zeros(), Vec2::x(), 3.5, CollisionLayers::ALL).is_none());
    assert!(module.try_raycast(Vec2::zeros(), -Vec2::x(), 10.0, CollisionLayers::ALL).is_none());
}

#[test]
fn test_degenerate_rays_return_nothing() {
    let (scene, _) = insert_all([circle_body(Vec2::new(5.0, 0.0), 1.0, CollisionLayers::ALL)]);
    let mut module = PhysicsModule::default();
    module.rebuild(&scene);

    assert!(module.raycast_all(Vec2::zeros(), Vec2::zeros(), 10.0, CollisionLayers::ALL).is_empty());
    assert!(module.raycast_all(Vec2::zeros(), Vec2::x(), 0.0, CollisionLayers::ALL).is_empty());
    assert!(module.raycast_all(Vec2::zeros(), Vec2::x(), 10.0, CollisionLayers::NONE).is_empty());
    assert!(module.raycast_all(Vec2::new(f32::NAN, 0.0), Vec2::x(), 10.0, CollisionLayers::ALL).is_empty());
}

#[test]
fn test_layer_mask_filters_hits() {
    let (scene, handles) = insert_all([
        circle_body(Vec2::new(3.0, 0.0), 1.0, CollisionLayers::ENEMY),
        circle_body(Vec2::new(6.0, 0.0), 1.0, CollisionLayers::ENVIRONMENT),
    ]);
    let mut module = PhysicsModule::default();
    module.rebuild(&scene);

    let hit = module
        .try_raycast(Vec2::zeros(), Vec2::x(), 10.0, CollisionLayers::ENVIRONMENT)
        .unwrap();
    assert_eq!(hit.collider.body, handles[1]);

    let hits = module.raycast_all(Vec2::zeros(), Vec2::x(), 10.0, CollisionLayers::PLAYER);
    assert!(hits.is_empty());
}

#[test]
fn test_ray_from_inside_hits_at_origin() {
    let (scene, _) = insert_all([box_body(Vec2::zeros(), Vec2::new(2.0, 2.0), CollisionLayers::ALL)]);
    let mut module = PhysicsModule::default();
    module.rebuild(&scene);

    let hit = module.try_raycast(Vec2::new(0.5, 0.5), Vec2::y(), 5.0, CollisionLayers::ALL).unwrap();
    assert_relative_eq!(hit.point, Vec2::new(0.5, 0.5));
    assert_relative_eq!(hit.distance, 0.0);
}

#[test]
fn test_equidistant_hits_resolve_to_smallest_id() {
    let wall = || {
        CollisionBody::at(Vec2::new(5.0, 0.0)).with_collider(Collider::new(ColliderShape::rectangle(2.0, 4.0).unwrap()))
    };
    let (scene, handles) = insert_all([wall(), wall(), wall()]);
    let mut module = PhysicsModule::default();
    module.rebuild(&scene);

    let hits = module.raycast_all(Vec2::zeros(), Vec2::x(), 10.0, CollisionLayers::ALL);
    assert_eq!(hits.len(), 3);

    let expected = handles.iter().map(|&handle| ColliderId::new(handle, 0)).min().unwrap();
    for _ in 0..5 {
        let hit = module.try_raycast(Vec2::zeros(), Vec2::x(), 10.0, CollisionLayers::ALL).unwrap();
        assert_eq!(hit.collider, expected);
    }
}

#[test]
fn test_ray_crosses_ground_line() {
    let ground = CollisionBody::at(Vec2::zeros()).with_collider(Collider::new(
        ColliderShape::line(Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0)).unwrap(),
    ));
    let (scene, _) = insert_all([ground]);
    let mut module = PhysicsModule::default();
    module.rebuild(&scene);

    let hit = module
        .try_raycast(Vec2::new(1.0, 5.0), -Vec2::y(), 10.0, CollisionLayers::ALL)
        .unwrap();
    assert_relative_eq!(hit.point, Vec2::new(1.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(hit.normal, Vec2::y(), epsilon = 1e-5);
}
