//! Sparse chunk grid used as the collision broad-phase
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.2:
//! "Spatial partitioning schemes... allow us to quickly cull out pairs of
//! objects that cannot possibly be colliding."
//!
//! Unlike a fixed-size bucket grid, this grid is unbounded: chunk entries are
//! created the first time something is stored in them and dropped again when
//! their last occupant leaves, so objects roaming far away do not leave an
//! ever-growing trail of empty chunks behind.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use crate::foundation::math::{Rect, Vec2};
use super::chunk::{chunk_range_for, touch_range_for, ChunkCoord, ChunkRange};

/// Occupants of a single chunk
pub type ChunkOccupants<K> = HashSet<K>;

/// Sparse 2D grid mapping chunk coordinates to the keys whose bounding
/// rectangle covers that chunk.
///
/// Invariant: `key` is listed in chunk `c` iff `c` is inside
/// `chunk_range_for(rect)` for the rectangle the key was last stored with.
pub struct SpatialGrid<K>
where
    K: Copy + Eq + Hash,
{
    chunk_size: Vec2,
    /// chunk x -> chunk y -> occupants
    columns: HashMap<i32, HashMap<i32, ChunkOccupants<K>>>,
    /// Registered range per key, used for removal and introspection
    ranges: HashMap<K, ChunkRange>,
}

impl<K> SpatialGrid<K>
where
    K: Copy + Eq + Hash,
{
    /// Create an empty grid; `chunk_size` must be positive on both axes
    pub fn new(chunk_size: Vec2) -> Self {
        debug_assert!(chunk_size.x > 0.0 && chunk_size.y > 0.0, "chunk size must be positive");

        Self {
            chunk_size,
            columns: HashMap::new(),
            ranges: HashMap::new(),
        }
    }

    /// World-space size of one chunk
    pub fn chunk_size(&self) -> Vec2 {
        self.chunk_size
    }

    /// Chunks a rectangle would be registered into
    pub fn range_for(&self, rect: &Rect) -> ChunkRange {
        chunk_range_for(rect, self.chunk_size)
    }

    /// Add a key to one chunk, creating the chunk entry if needed
    pub fn add(&mut self, key: K, coord: ChunkCoord) {
        self.columns
            .entry(coord.x)
            .or_default()
            .entry(coord.y)
            .or_default()
            .insert(key);
    }

    /// Remove a key from one chunk, dropping the chunk (and its column) when
    /// it becomes empty.
    ///
    /// Removing a key from a chunk it does not occupy does nothing.
    pub fn remove(&mut self, key: K, coord: ChunkCoord) {
        let Some(column) = self.columns.get_mut(&coord.x) else {
            return;
        };
        let Some(occupants) = column.get_mut(&coord.y) else {
            return;
        };

        occupants.remove(&key);

        if occupants.is_empty() {
            column.remove(&coord.y);
            if column.is_empty() {
                self.columns.remove(&coord.x);
            }
        }
    }

    /// Store a key in every chunk its bounding rectangle covers
    ///
    /// If the key is already stored, it is moved as if by [`Self::update`].
    pub fn insert(&mut self, key: K, rect: &Rect) {
        let range = self.range_for(rect);

        if let Some(old) = self.ranges.insert(key, range) {
            self.move_key(key, &old, &range);
            return;
        }

        for coord in range.iter() {
            self.add(key, coord);
        }
    }

    /// Move a key from the chunks of `old_rect` to the chunks of `new_rect`.
    ///
    /// Only chunks in exactly one of the two ranges are touched. Returns
    /// `false` without doing any range math when the rectangles are equal,
    /// and does nothing for a key that is not stored.
    pub fn update(&mut self, key: K, old_rect: &Rect, new_rect: &Rect) -> bool {
        if old_rect == new_rect {
            return false;
        }

        let old = self.range_for(old_rect);
        let new = self.range_for(new_rect);
        let Some(registered) = self.ranges.get_mut(&key) else {
            return false;
        };
        *registered = new;

        if old != new {
            self.move_key(key, &old, &new);
        }
        true
    }

    fn move_key(&mut self, key: K, old: &ChunkRange, new: &ChunkRange) {
        for coord in old.difference(new) {
            self.remove(key, coord);
        }
        for coord in new.difference(old) {
            self.add(key, coord);
        }
    }

    /// Remove a key from every chunk it occupies
    ///
    /// Returns the range the key was registered in, or `None` if the key was
    /// not stored.
    pub fn remove_all(&mut self, key: K) -> Option<ChunkRange> {
        let range = self.ranges.remove(&key)?;
        for coord in range.iter() {
            self.remove(key, coord);
        }
        Some(range)
    }

    /// Range a key is currently registered in
    pub fn range_of(&self, key: K) -> Option<ChunkRange> {
        self.ranges.get(&key).copied()
    }

    /// Occupants of a chunk, `None` if the chunk has no entry
    pub fn occupants(&self, coord: ChunkCoord) -> Option<&ChunkOccupants<K>> {
        self.columns.get(&coord.x)?.get(&coord.y)
    }

    /// Whether a key is listed in a chunk
    pub fn contains(&self, key: K, coord: ChunkCoord) -> bool {
        self.occupants(coord).is_some_and(|occupants| occupants.contains(&key))
    }

    /// Deduplicated union of the occupants of every chunk in a range
    pub fn collect_range(&self, range: &ChunkRange) -> HashSet<K> {
        let mut found = HashSet::new();
        for coord in range.iter() {
            if let Some(occupants) = self.occupants(coord) {
                found.extend(occupants.iter().copied());
            }
        }
        found
    }

    /// Every key stored in a chunk touched by a closed rectangle
    pub fn query_rect(&self, rect: &Rect) -> HashSet<K> {
        self.collect_range(&touch_range_for(rect, self.chunk_size))
    }

    /// Every key stored in a chunk touched by a point
    pub fn query_point(&self, point: Vec2) -> HashSet<K> {
        self.query_rect(&Rect::from_point(point))
    }

    /// Iterate all non-empty chunks
    pub fn chunks(&self) -> impl Iterator<Item = (ChunkCoord, &ChunkOccupants<K>)> {
        self.columns.iter().flat_map(|(&x, column)| {
            column
                .iter()
                .map(move |(&y, occupants)| (ChunkCoord::new(x, y), occupants))
        })
    }

    /// Number of chunk entries currently allocated
    pub fn chunk_count(&self) -> usize {
        self.columns.values().map(HashMap::len).sum()
    }

    /// Number of column maps currently allocated
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of keys stored
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Drop everything from the grid
    pub fn clear(&mut self) {
        self.columns.clear();
        self.ranges.clear();
    }

    /// Debug map of occupant counts per allocated chunk, sorted by coordinate
    pub fn occupancy(&self) -> Vec<(ChunkCoord, usize)> {
        let mut counts: Vec<_> = self.chunks().map(|(coord, occupants)| (coord, occupants.len())).collect();
        counts.sort_unstable_by_key(|(coord, _)| (coord.y, coord.x));
        counts
    }
}

impl<K> fmt::Display for SpatialGrid<K>
where
    K: Copy + Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let occupancy = self.occupancy();
        let (Some(min_x), Some(max_x)) = (
            occupancy.iter().map(|(c, _)| c.x).min(),
            occupancy.iter().map(|(c, _)| c.x).max(),
        ) else {
            return write!(f, "<empty grid>");
        };
        let min_y = occupancy.first().map_or(0, |(c, _)| c.y);
        let max_y = occupancy.last().map_or(0, |(c, _)| c.y);

        // Draw a grid of how many items are in the chunks
        for y in min_y..=max_y {
            writeln!(f)?;
            for x in min_x..=max_x {
                match self.occupants(ChunkCoord::new(x, y)) {
                    Some(occupants) => write!(f, "{:^3}", occupants.len())?,
                    None => write!(f, " . ")?,
                }
            }
        }

        Ok(())
    }
}

impl<K> fmt::Debug for SpatialGrid<K>
where
    K: Copy + Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialGrid")
            .field("chunk_size", &self.chunk_size)
            .field("chunks", &self.chunk_count())
            .field("keys", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> SpatialGrid<u32> {
        SpatialGrid::new(Vec2::new(100.0, 100.0))
    }

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_insert_and_remove_all_prunes() {
        let mut grid = grid();
        grid.insert(1, &rect(90.0, 90.0, 20.0, 20.0));

        assert_eq!(grid.chunk_count(), 4);
        for coord in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert!(grid.contains(1, ChunkCoord::new(coord.0, coord.1)));
        }

        let range = grid.remove_all(1).unwrap();
        assert_eq!(range.len(), 4);
        assert_eq!(grid.chunk_count(), 0);
        assert_eq!(grid.column_count(), 0);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_update_moves_only_changed_chunks() {
        let mut grid = grid();
        let old = rect(50.0, 10.0, 100.0, 10.0);
        let new = rect(150.0, 10.0, 100.0, 10.0);
        grid.insert(7, &old);
        grid.insert(8, &rect(120.0, 10.0, 1.0, 1.0));

        assert!(grid.update(7, &old, &new));

        assert!(!grid.contains(7, ChunkCoord::new(0, 0)));
        assert!(grid.contains(7, ChunkCoord::new(1, 0)));
        assert!(grid.contains(7, ChunkCoord::new(2, 0)));
        assert!(grid.contains(8, ChunkCoord::new(1, 0)));
        assert_eq!(grid.range_of(7), Some(grid.range_for(&new)));
        // Chunk (0, 0) had a single occupant and must be gone
        assert!(grid.occupants(ChunkCoord::new(0, 0)).is_none());
    }

    #[test]
    fn test_update_without_motion_is_noop() {
        let mut grid = grid();
        let r = rect(10.0, 10.0, 250.0, 10.0);
        grid.insert(1, &r);
        grid.insert(2, &r);
        let before = grid.occupancy();

        assert!(!grid.update(1, &r, &r));
        assert_eq!(grid.occupancy(), before);
    }

    #[test]
    fn test_remove_from_unoccupied_chunk_is_noop() {
        let mut grid = grid();
        grid.insert(1, &rect(0.0, 0.0, 10.0, 10.0));

        grid.remove(1, ChunkCoord::new(5, 5));
        grid.remove(2, ChunkCoord::new(0, 0));

        assert!(grid.contains(1, ChunkCoord::new(0, 0)));
        assert_eq!(grid.chunk_count(), 1);
        assert_eq!(grid.remove_all(3), None);
        assert!(!grid.update(3, &rect(0.0, 0.0, 1.0, 1.0), &rect(300.0, 0.0, 1.0, 1.0)));
        assert_eq!(grid.range_of(3), None);
        assert_eq!(grid.chunk_count(), 1);
    }

    #[test]
    fn test_collect_range_deduplicates() {
        let mut grid = grid();
        grid.insert(1, &rect(-50.0, -50.0, 200.0, 200.0));
        grid.insert(2, &rect(10.0, 10.0, 5.0, 5.0));

        let found = grid.query_rect(&rect(-50.0, -50.0, 200.0, 200.0));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_reinsert_moves_key() {
        let mut grid = grid();
        grid.insert(1, &rect(0.0, 0.0, 10.0, 10.0));
        grid.insert(1, &rect(500.0, 500.0, 10.0, 10.0));

        assert!(!grid.contains(1, ChunkCoord::new(0, 0)));
        assert!(grid.contains(1, ChunkCoord::new(5, 5)));
        assert_eq!(grid.chunk_count(), 1);
    }

    #[test]
    fn test_display() {
        let mut grid = grid();
        assert_eq!(grid.to_string(), "<empty grid>");

        grid.insert(1, &rect(0.0, 0.0, 150.0, 10.0));
        grid.insert(2, &rect(0.0, 0.0, 10.0, 10.0));
        assert_eq!(grid.to_string(), "\n 2  1 ");
    }
}
