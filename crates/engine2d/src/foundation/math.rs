//! Math utilities and types
//!
//! Provides the 2D math types used by the collision core. Vectors come from
//! nalgebra; the small helpers below cover the 2D operations nalgebra spells
//! differently (scalar cross product, perpendiculars, rotation by angle).

use serde::{Deserialize, Serialize};

pub use nalgebra::{Matrix2, Rotation2, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// Tolerance used for degenerate-geometry checks
pub const EPSILON: f32 = 1e-6;

/// 2D scalar cross product (z component of the 3D cross product)
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Counter-clockwise perpendicular of a vector
#[inline]
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Rotate a vector counter-clockwise by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    if angle == 0.0 {
        return v;
    }
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Check whether a scalar is within [`EPSILON`] of zero
#[inline]
pub fn approx_zero(value: f32) -> bool {
    value.abs() < EPSILON
}

/// Check whether every component of a vector is finite
#[inline]
pub fn is_finite(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

/// Normalize a vector, returning `None` for zero-length or non-finite input
pub fn try_normalize(v: Vec2) -> Option<Vec2> {
    let length = v.magnitude();
    if !length.is_finite() || length < EPSILON {
        None
    } else {
        Some(v / length)
    }
}

/// 2D transform: position, rotation (radians) and per-axis scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    /// Position in world space
    pub position: Vec2,

    /// Counter-clockwise rotation in radians
    pub rotation: f32,

    /// Scale factors
    pub scale: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl Transform2D {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec2, rotation: f32) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Builder-style scale override
    #[must_use]
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Apply this transform to a body-local point
    pub fn transform_point(&self, local: Vec2) -> Vec2 {
        self.position + self.transform_vector(local)
    }

    /// Apply rotation and scale (no translation) to a body-local vector
    pub fn transform_vector(&self, local: Vec2) -> Vec2 {
        rotate(local.component_mul(&self.scale), self.rotation)
    }
}
