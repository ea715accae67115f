//! # engine2d
//!
//! Foundation layer of a 2D game engine: actors, circle and rectangle
//! collision components, and a chunked spatial grid that answers overlap
//! queries without testing every pair of components.
//!
//! ## Features
//!
//! - **Chunked Broad-Phase**: sparse, unbounded grid updated incrementally
//! - **Exact Narrow-Phase**: circle/circle, circle/rect and rect/rect tests
//! - **Per-Level Ownership**: each level owns its grids and handles
//! - **Clickables**: an independent grid for point hit testing
//! - **Frame Detection**: overlapping pairs with entered/exited sets
//!
//! ## Quick Start
//!
//! ```rust
//! use engine2d::prelude::*;
//!
//! let mut level = Level::new("arena", &ApplicationConfig::default())?;
//!
//! let a = level.spawn_actor(Transform2D::from_position(Vec2::new(0.0, 0.0)));
//! let b = level.spawn_actor(Transform2D::from_position(Vec2::new(8.0, 0.0)));
//! let circle_a = level.add_collider(a, ColliderDesc::circle(5.0))?;
//! let circle_b = level.add_collider(b, ColliderDesc::circle(4.0))?;
//!
//! assert_eq!(level.get_overlap(circle_a), vec![circle_b]);
//!
//! level.set_actor_position(b, Vec2::new(10.0, 0.0))?;
//! assert!(level.get_overlap(circle_a).is_empty());
//! # Ok::<(), SceneError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod config;
pub mod foundation;

// Subsystems
pub mod spatial;
pub mod physics;
pub mod input;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{ApplicationConfig, ClickableConfig, CollisionConfig, Config, EngineConfig},
        foundation::{
            collections::{ActorId, ClickableId, ColliderId},
            math::{Rect, Transform2D, Vec2},
        },
        physics::{
            ColliderDesc, CollisionError, CollisionLayers, CollisionPair, CollisionShape, RectScaling,
        },
        scene::{Actor, Level, SceneError},
        spatial::{ChunkCoord, ChunkRange},
    };
}
