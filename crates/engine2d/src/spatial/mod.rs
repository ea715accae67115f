//! Spatial partitioning data structures
//!
//! Provides the chunked 2D grid used for broad-phase collision detection and
//! for point queries against clickable components.

pub mod chunk;
mod grid;

pub use chunk::{chunk_of, chunk_range_for, touch_range_for, ChunkCoord, ChunkRange};
pub use grid::{ChunkOccupants, SpatialGrid};
