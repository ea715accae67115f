//! Chunk coordinates and chunk range math
//!
//! World space is divided into a uniform grid of chunks. A chunk `(x, y)`
//! covers the half-open region `[x * w, (x + 1) * w) × [y * h, (y + 1) * h)`
//! where `(w, h)` is the configured chunk size.

use std::fmt;

use crate::foundation::math::{Rect, Vec2};

/// Integer coordinate of one grid chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ChunkCoord {
    /// Chunk column
    pub x: i32,
    /// Chunk row
    pub y: i32,
}

impl ChunkCoord {
    /// Create a chunk coordinate
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// World-space region covered by this chunk
    pub fn bounds(&self, chunk_size: Vec2) -> Rect {
        #[allow(clippy::cast_precision_loss)]
        let origin = Vec2::new(self.x as f32 * chunk_size.x, self.y as f32 * chunk_size.y);
        Rect::new(origin, chunk_size)
    }

    /// Whether a half-open rectangle `[min, max)` touches the half-open
    /// region of this chunk.
    ///
    /// A zero extent on an axis is treated as a point on that axis. This is
    /// the reference definition of grid membership that [`chunk_range_for`]
    /// computes in closed form.
    pub fn region_overlaps(&self, rect: &Rect, chunk_size: Vec2) -> bool {
        let region = self.bounds(chunk_size);

        let axis = |min: f32, max: f32, lo: f32, hi: f32| {
            if max > min {
                min < hi && max > lo
            } else {
                min >= lo && min < hi
            }
        };

        axis(rect.left(), rect.right(), region.left(), region.right())
            && axis(rect.top(), rect.bottom(), region.top(), region.bottom())
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Inclusive rectangular range of chunk coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkRange {
    /// Chunk holding the minimum corner
    pub min: ChunkCoord,
    /// Chunk holding the maximum corner (inclusive)
    pub max: ChunkCoord,
}

impl ChunkRange {
    /// Create a range; `min` must not exceed `max` on either axis
    pub const fn new(min: ChunkCoord, max: ChunkCoord) -> Self {
        Self { min, max }
    }

    /// Range holding exactly one chunk
    pub const fn single(coord: ChunkCoord) -> Self {
        Self { min: coord, max: coord }
    }

    /// Whether the range contains a chunk
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        coord.x >= self.min.x && coord.x <= self.max.x && coord.y >= self.min.y && coord.y <= self.max.y
    }

    /// Number of chunks in the range
    pub fn len(&self) -> usize {
        let width = (i64::from(self.max.x) - i64::from(self.min.x) + 1).max(0);
        let height = (i64::from(self.max.y) - i64::from(self.min.y) + 1).max(0);
        usize::try_from(width * height).unwrap_or(usize::MAX)
    }

    /// Whether the range is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate every chunk in the range, row by row
    pub fn iter(&self) -> impl Iterator<Item = ChunkCoord> {
        let (min, max) = (self.min, self.max);
        (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| ChunkCoord::new(x, y)))
    }

    /// Chunks in this range that are not in `other`
    pub fn difference(&self, other: &ChunkRange) -> impl Iterator<Item = ChunkCoord> + '_ {
        let other = *other;
        self.iter().filter(move |coord| !other.contains(*coord))
    }
}

#[allow(clippy::cast_possible_truncation)]
fn floor_div(value: f32, size: f32) -> i32 {
    (value / size).floor() as i32
}

/// Last chunk index strictly below `value`. The step down is taken in float
/// so that coordinates past the `i32` range saturate instead of overflowing.
#[allow(clippy::cast_possible_truncation)]
fn chunk_below(value: f32, size: f32) -> i32 {
    ((value / size).ceil() - 1.0) as i32
}

/// Chunk containing a world-space point
pub fn chunk_of(point: Vec2, chunk_size: Vec2) -> ChunkCoord {
    ChunkCoord::new(floor_div(point.x, chunk_size.x), floor_div(point.y, chunk_size.y))
}

/// Chunks a bounding rectangle is registered into.
///
/// The range runs from the chunk holding the min corner to the chunk holding
/// the max corner. A max edge lying exactly on a chunk boundary belongs to the
/// lower chunk only, so a chunk-aligned rectangle does not spill into an
/// extra row or column.
pub fn chunk_range_for(rect: &Rect, chunk_size: Vec2) -> ChunkRange {
    let min = chunk_of(rect.position(), chunk_size);
    let corner = rect.corner_position();
    let max = ChunkCoord::new(
        chunk_below(corner.x, chunk_size.x).max(min.x),
        chunk_below(corner.y, chunk_size.y).max(min.y),
    );
    ChunkRange::new(min, max)
}

/// Chunks whose closed region touches a closed rectangle.
///
/// Superset of [`chunk_range_for`] used on the query side: it also reaches
/// the chunk just below an edge lying on a boundary, where a rectangle that
/// only touches this one is registered.
pub fn touch_range_for(rect: &Rect, chunk_size: Vec2) -> ChunkRange {
    let position = rect.position();
    let corner = rect.corner_position();
    ChunkRange::new(
        ChunkCoord::new(
            chunk_below(position.x, chunk_size.x),
            chunk_below(position.y, chunk_size.y),
        ),
        ChunkCoord::new(floor_div(corner.x, chunk_size.x), floor_div(corner.y, chunk_size.y)),
    )
}
