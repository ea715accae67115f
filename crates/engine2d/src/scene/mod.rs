//! Scene management system
//!
//! A [`Level`] owns its actors and the two spatial grids built over them:
//!
//! ```text
//! Level
//!  ├── actors      (SlotMap<ActorId, Actor>, transform provider)
//!  ├── collision   (CollisionWorld: colliders + broad-phase grid)
//!  └── clickables  (ClickableWorld: clickables + point-query grid)
//! ```
//!
//! Every handle is scoped to the level that created it. Dropping a level
//! drops both grids.

pub mod actor;
pub mod level;

#[cfg(test)]
mod tests;

pub use actor::{Actor, TransformProvider};
pub use level::Level;

use crate::config::ConfigError;
use crate::foundation::collections::{ActorId, ClickableId};
use crate::physics::CollisionError;

/// Errors returned by level operations
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// The actor handle is stale or belongs to another level
    #[error("unknown actor {0:?}")]
    UnknownActor(ActorId),

    /// The clickable handle is stale or belongs to another level
    #[error("unknown clickable {0:?}")]
    UnknownClickable(ClickableId),

    /// A collision component operation was rejected
    #[error("collision error: {0}")]
    Collision(#[from] CollisionError),

    /// The level configuration is invalid
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
