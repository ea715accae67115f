//! Physics module for collision detection
//!
//! Provides broad-phase collision detection using a chunked spatial grid and
//! exact narrow-phase tests for circles and axis-aligned rectangles.

pub mod collision;
pub mod collision_layers;
pub mod collision_system;

pub use collision::{
    CircleShape,
    CollisionShape,
    RectScaling,
    RectShape,
    ShapeEvent,
    WorldCircle,
    WorldSpaceShape,
};
pub use collision_layers::CollisionLayers;
pub use collision_system::{
    ColliderComponent,
    ColliderDesc,
    CollisionError,
    CollisionPair,
    CollisionWorld,
};
