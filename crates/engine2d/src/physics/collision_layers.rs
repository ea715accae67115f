//! Collision layer system for filtering collision detection
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.8:
//! "Most games need to filter collisions... This is typically done via
//! collision layers or groups."
//!
//! Layers only filter frame-level pair detection. A direct overlap query on a
//! component always reports every geometric overlap.

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Collision layer bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CollisionLayers: u32 {
        /// Player character layer
        const PLAYER = 1 << 0;
        /// Enemy character layer
        const ENEMY = 1 << 1;
        /// Projectiles (bullets, missiles, etc.)
        const PROJECTILE = 1 << 2;
        /// Static level geometry
        const ENVIRONMENT = 1 << 3;
        /// Trigger volumes (no physical response)
        const TRIGGER = 1 << 4;
        /// Pickups and collectibles
        const PICKUP = 1 << 5;

        // User-defined custom layers keep the remaining bits
        const _ = !0;
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::all()
    }
}

impl CollisionLayers {
    /// Check if two components should collide based on their layers and masks
    ///
    /// A's layer must be in B's mask and B's layer must be in A's mask.
    ///
    /// # Example
    /// ```
    /// use engine2d::physics::CollisionLayers;
    ///
    /// let player = (CollisionLayers::PLAYER, CollisionLayers::ENEMY | CollisionLayers::ENVIRONMENT);
    /// let enemy = (CollisionLayers::ENEMY, CollisionLayers::PLAYER | CollisionLayers::PROJECTILE);
    ///
    /// assert!(CollisionLayers::should_collide(player.0, player.1, enemy.0, enemy.1));
    /// ```
    pub fn should_collide(
        layer_a: CollisionLayers,
        mask_a: CollisionLayers,
        layer_b: CollisionLayers,
        mask_b: CollisionLayers,
    ) -> bool {
        layer_a.intersects(mask_b) && layer_b.intersects(mask_a)
    }

    /// User-defined layer by bit index (6..32)
    pub fn custom(bit: u32) -> Option<Self> {
        (6..32).contains(&bit).then(|| Self::from_bits_retain(1 << bit))
    }
}
