//! # Engine2D
//!
//! The collision core of a 2D game engine.
//!
//! ## Features
//!
//! - **Quad Tree Broad Phase**: Rebuilt every fixed tick from the scene's colliders
//! - **SAT Narrow Phase**: Lines, rectangles, circles and convex polygons with
//!   minimum translation vectors
//! - **Raycasts**: Bounded, layer-filtered and deterministic
//! - **Collision Layers**: Bitmask filtering ahead of any geometry
//! - **Fixed Timestep**: Catch-up loop decoupled from frame rate
//!
//! ## Quick Start
//!
//! ```rust
//! use engine2d::prelude::*;
//!
//! let mut scene = BodySet::new();
//! let ball = scene.insert(
//!     CollisionBody::at(Vec2::new(5.0, 0.0))
//!         .with_collider(Collider::new(ColliderShape::circle(1.0).unwrap())),
//! );
//!
//! let mut physics = PhysicsModule::new(PhysicsConfig::default());
//! physics.fixed_update(&mut scene);
//!
//! let hit = physics
//!     .try_raycast(Vec2::zeros(), Vec2::new(1.0, 0.0), 10.0, CollisionLayers::ALL)
//!     .unwrap();
//! assert_eq!(hit.collider.body, ball);
//! assert!((hit.point - Vec2::new(4.0, 0.0)).norm() < 1e-5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        foundation::{
            collections::BodyHandle,
            math::{Transform2D, Vec2},
            time::{FixedTimestep, Stopwatch},
        },
        physics::{
            BodySet, Collider, ColliderId, ColliderShape, CollisionBody, CollisionEventArgs, CollisionLayers,
            CollisionPair, LineSegment, PhysicsBody, PhysicsConfig, PhysicsMaterial, PhysicsModule, PhysicsScene,
            RaycastHit, ScaleAxis,
        },
        spatial::{BoundingArea, QuadTree, QuadTreeConfig},
    };
}
