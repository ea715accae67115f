//! Collision shapes and narrow-phase detection
//!
//! # Architecture
//!
//! This module follows Game Engine Architecture 3rd Edition (GEA 13.3.4):
//! - **Model Space Storage**: Collision shapes stored in local coordinates
//! - **On-Demand Transformation**: Shapes placed in world space only during tests
//! - **Coordinate Decoupling**: Shape geometry separate from the actor transform
//!
//! # Module Organization
//!
//! - [`primitives`] - World-space primitives and the overlap predicate
//! - [`shape`] - Model-space shapes attached to collision components

pub mod primitives;
pub mod shape;

// Re-export commonly used types
pub use primitives::{circle_circle, circle_rect, rect_rect, WorldCircle, WorldSpaceShape};
pub use shape::{CircleShape, CollisionShape, RectScaling, RectShape, ShapeEvent};
