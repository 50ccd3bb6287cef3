//! Collision layer system for filtering collision detection
//!
//! Every collider carries a layer mask. Two colliders are eligible for a
//! narrow-phase test only when their masks share at least one bit; raycasts
//! filter candidates the same way against the query mask. The check happens
//! before any geometry is touched.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Collision layer bitmask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub struct CollisionLayers: u32 {
        // Standard game entity layers (bits 0-7)
        /// Player character layer
        const PLAYER = 1 << 0;
        /// Enemy character layer
        const ENEMY = 1 << 1;
        /// Projectiles (bullets, arrows, etc.)
        const PROJECTILE = 1 << 2;
        /// Static environment geometry
        const ENVIRONMENT = 1 << 3;
        /// Trigger volumes
        const TRIGGER = 1 << 4;
        /// Debris and small physics objects
        const DEBRIS = 1 << 5;
        /// One-sided platforms and ground lines
        const PLATFORM = 1 << 6;
        /// Pickups and collectibles
        const PICKUP = 1 << 7;

        // User-defined custom layers (bits 8-31)
        const _ = !0;
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::all()
    }
}

impl CollisionLayers {
    /// No collision layer
    pub const NONE: Self = Self::empty();

    /// Every layer, including the custom bits
    pub const ALL: Self = Self::from_bits_retain(u32::MAX);

    /// A single custom layer (`bit` in `8..32`)
    pub fn custom(bit: u32) -> Self {
        debug_assert!((8..32).contains(&bit), "custom layer bit {bit} out of range");
        Self::from_bits_retain(1u32.checked_shl(bit).unwrap_or(0))
    }

    /// Check if two masks may interact
    ///
    /// # Example
    /// ```
    /// use engine2d::physics::CollisionLayers;
    ///
    /// let player = CollisionLayers::PLAYER | CollisionLayers::ENVIRONMENT;
    /// let ground = CollisionLayers::ENVIRONMENT;
    /// assert!(player.interacts_with(ground));
    /// assert!(!CollisionLayers::ENEMY.interacts_with(ground));
    /// ```
    pub fn interacts_with(self, other: CollisionLayers) -> bool {
        self.intersects(other)
    }

    /// Helper to create a mask from multiple layers
    ///
    /// # Example
    /// ```
    /// use engine2d::physics::CollisionLayers;
    ///
    /// let mask = CollisionLayers::mask(&[
    ///     CollisionLayers::PLAYER,
    ///     CollisionLayers::ENEMY,
    /// ]);
    /// assert_eq!(mask, CollisionLayers::PLAYER | CollisionLayers::ENEMY);
    /// ```
    pub fn mask(layers: &[CollisionLayers]) -> CollisionLayers {
        layers.iter().fold(Self::NONE, |acc, &layer| acc | layer)
    }
}
