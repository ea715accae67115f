//! Clickable components and point hit testing
//!
//! Clickables live in their own [`SpatialGrid`], independent of the collision
//! grid and sized by [`ClickableConfig::chunk_size`]. This is input system
//! responsibility: determining what the user clicked on.

use crate::core::config::ClickableConfig;
use crate::foundation::collections::{ActorId, ClickableId, SlotMap};
use crate::foundation::math::{Rect, Transform2D, Vec2};
use crate::physics::collision::{RectScaling, RectShape, ShapeEvent};
use crate::scene::TransformProvider;
use crate::spatial::SpatialGrid;

/// A clickable rectangle attached to an actor
#[derive(Debug, Clone)]
pub struct ClickableComponent {
    actor: ActorId,
    relative: Transform2D,
    area: RectShape,
    bounds: Rect,
}

impl ClickableComponent {
    /// Owning actor
    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// Transform relative to the actor
    pub fn relative(&self) -> &Transform2D {
        &self.relative
    }

    /// Unscaled size of the clickable area
    pub fn size(&self) -> Vec2 {
        self.area.size()
    }

    /// Cached world-space bounding rectangle
    pub fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// Clickable components of one level and their point-query grid
pub struct ClickableWorld {
    grid: SpatialGrid<ClickableId>,
    clickables: SlotMap<ClickableId, ClickableComponent>,
    rect_scaling: RectScaling,
}

impl ClickableWorld {
    /// Create an empty clickable world; the configuration must be valid
    pub fn new(config: &ClickableConfig, rect_scaling: RectScaling) -> Self {
        Self {
            grid: SpatialGrid::new(config.chunk_size),
            clickables: SlotMap::with_key(),
            rect_scaling,
        }
    }

    fn compute_bounds(
        &self,
        actor: ActorId,
        relative: &Transform2D,
        area: &RectShape,
        transforms: &impl TransformProvider,
    ) -> Option<Rect> {
        let world = transforms.actor_transform(actor)?.combine(relative);
        Some(area.boundary_rect(&world, self.rect_scaling))
    }

    /// Create and register a clickable area for an actor
    ///
    /// Returns `None` if the actor does not exist.
    pub fn register(
        &mut self,
        actor: ActorId,
        size: Vec2,
        relative: Transform2D,
        transforms: &impl TransformProvider,
    ) -> Option<ClickableId> {
        let area = RectShape::new(size);
        let bounds = self.compute_bounds(actor, &relative, &area, transforms)?;

        let id = self.clickables.insert(ClickableComponent {
            actor,
            relative,
            area,
            bounds,
        });
        self.grid.insert(id, &bounds);

        log::trace!("Registered clickable {:?} for actor {:?}", id, actor);
        Some(id)
    }

    /// Recompute a clickable's bounds after its actor moved
    ///
    /// Returns `true` if the bounding rectangle changed.
    pub fn refresh(&mut self, id: ClickableId, transforms: &impl TransformProvider) -> bool {
        let Some(clickable) = self.clickables.get(id) else {
            return false;
        };
        let Some(new_bounds) =
            self.compute_bounds(clickable.actor, &clickable.relative, &clickable.area, transforms)
        else {
            return false;
        };

        let old_bounds = std::mem::replace(&mut self.clickables[id].bounds, new_bounds);
        self.grid.update(id, &old_bounds, &new_bounds)
    }

    /// Change the size of a clickable area
    ///
    /// Returns `false` if the handle is unknown.
    pub fn set_size(&mut self, id: ClickableId, size: Vec2, transforms: &impl TransformProvider) -> bool {
        let Some(clickable) = self.clickables.get_mut(id) else {
            return false;
        };
        if clickable.area.set_size(size) == ShapeEvent::Resized {
            self.refresh(id, transforms);
        }
        true
    }

    /// Remove a clickable from every chunk it occupies
    pub fn unregister(&mut self, id: ClickableId) -> Option<ClickableComponent> {
        let removed = self.clickables.remove(id)?;
        self.grid.remove_all(id);
        Some(removed)
    }

    /// Remove every clickable of an actor
    pub fn unregister_actor(&mut self, actor: ActorId) -> Vec<ClickableId> {
        let ids: Vec<ClickableId> = self
            .clickables
            .iter()
            .filter(|(_, clickable)| clickable.actor == actor)
            .map(|(id, _)| id)
            .collect();

        for &id in &ids {
            self.unregister(id);
        }
        ids
    }

    /// Every clickable whose area contains the point, edges included
    pub fn clickables_at(&self, point: Vec2) -> Vec<ClickableId> {
        self.grid
            .query_point(point)
            .into_iter()
            .filter(|&id| {
                self.clickables
                    .get(id)
                    .is_some_and(|clickable| clickable.bounds.contains_point(point))
            })
            .collect()
    }

    /// Get a clickable component
    pub fn get(&self, id: ClickableId) -> Option<&ClickableComponent> {
        self.clickables.get(id)
    }

    /// Point-query grid, for inspection and debug output
    pub fn grid(&self) -> &SpatialGrid<ClickableId> {
        &self.grid
    }

    /// Number of registered clickables
    pub fn len(&self) -> usize {
        self.clickables.len()
    }

    /// Whether no clickable is registered
    pub fn is_empty(&self) -> bool {
        self.clickables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Actor;
    use crate::spatial::ChunkCoord;

    fn setup() -> (ClickableWorld, SlotMap<ActorId, Actor>) {
        let config = ClickableConfig::new().with_chunk_size(Vec2::new(10.0, 10.0));
        (ClickableWorld::new(&config, RectScaling::Legacy), SlotMap::with_key())
    }

    #[test]
    fn test_point_on_chunk_boundary() {
        let (mut world, mut actors) = setup();
        // Area (0, 0)..(10, 10) registers into chunk (0, 0) only
        let actor = actors.insert(Actor::new(Transform2D::from_position(Vec2::new(5.0, 5.0))));
        let id = world
            .register(actor, Vec2::new(10.0, 10.0), Transform2D::identity(), &actors)
            .unwrap();

        assert!(world.grid().contains(id, ChunkCoord::new(0, 0)));
        assert_eq!(world.grid().chunk_count(), 1);

        // The far edge lies in chunk (1, 1) but still hits the area
        assert_eq!(world.clickables_at(Vec2::new(10.0, 10.0)), vec![id]);
        assert_eq!(world.clickables_at(Vec2::new(0.0, 5.0)), vec![id]);
        assert!(world.clickables_at(Vec2::new(10.5, 5.0)).is_empty());
    }

    #[test]
    fn test_refresh_follows_actor() {
        let (mut world, mut actors) = setup();
        let actor = actors.insert(Actor::new(Transform2D::identity()));
        let offset = Transform2D::from_position(Vec2::new(1.0, 1.0));
        let id = world.register(actor, Vec2::new(2.0, 2.0), offset, &actors).unwrap();
        assert_eq!(world.clickables_at(Vec2::new(1.0, 1.0)), vec![id]);

        actors[actor].set_transform(Transform2D::from_position(Vec2::new(100.0, 0.0)));
        assert!(world.refresh(id, &actors));
        assert!(!world.refresh(id, &actors));

        assert!(world.clickables_at(Vec2::new(1.0, 1.0)).is_empty());
        assert_eq!(world.clickables_at(Vec2::new(101.0, 1.0)), vec![id]);
        assert!(world.grid().contains(id, ChunkCoord::new(10, 0)));
    }

    #[test]
    fn test_resize_and_unregister_actor() {
        let (mut world, mut actors) = setup();
        let actor = actors.insert(Actor::new(Transform2D::identity()));
        let small = world
            .register(actor, Vec2::new(2.0, 2.0), Transform2D::identity(), &actors)
            .unwrap();
        let other = world
            .register(actor, Vec2::new(2.0, 2.0), Transform2D::identity(), &actors)
            .unwrap();

        assert!(world.set_size(small, Vec2::new(30.0, 30.0), &actors));
        let hits = world.clickables_at(Vec2::new(0.5, 0.5));
        assert_eq!(hits.len(), 2);
        assert!(hits.contains(&small) && hits.contains(&other));
        assert_eq!(world.clickables_at(Vec2::new(14.0, 14.0)), vec![small]);

        assert_eq!(world.unregister_actor(actor).len(), 2);
        assert!(world.is_empty());
        assert!(world.grid().is_empty());
        assert!(!world.set_size(small, Vec2::new(1.0, 1.0), &actors));
    }

    #[test]
    fn test_register_for_missing_actor() {
        let (mut world, mut actors) = setup();
        let actor = actors.insert(Actor::default());
        actors.remove(actor);

        assert!(world.register(actor, Vec2::new(1.0, 1.0), Transform2D::identity(), &actors).is_none());
    }
}
