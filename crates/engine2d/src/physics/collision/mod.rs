//! Collider shapes and narrow-phase collision detection
//!
//! # Architecture
//!
//! - **Body-Local Storage**: Collider shapes stored relative to the owning body
//! - **On-Demand Transformation**: Shapes transformed to world space only during tests
//! - **Cached Bounds**: World bounding areas recomputed only after a change
//!
//! # Module Organization
//!
//! - [`primitives`] - Segments, rays and projection helpers
//! - [`shape`] - Body-local and world-space shape definitions
//! - [`sat`] - Separating Axis Theorem tests and contact generation
//! - [`collider`] - Colliders owned by physics bodies
//!
//! # Key Types
//!
//! - [`ColliderShape`] - Body-local shape (Line, Rectangle, Circle, Polygon)
//! - [`WorldShape`] - Temporary world-space shape for collision testing
//! - [`Collider`] - Shape plus layer mask, trigger flag and cached bounds
//! - [`Contact`] - Narrow-phase result with normal and penetration depth

pub mod collider;
pub mod primitives;
pub mod sat;
pub mod shape;

// Re-export commonly used types
pub use collider::Collider;
pub use primitives::{LineSegment, Ray, SegmentHit};
pub use sat::{collide, Contact};
pub use shape::{ColliderShape, ScaleAxis, ShapeError, WorldShape};
