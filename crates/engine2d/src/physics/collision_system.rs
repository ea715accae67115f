//! Core collision detection system
//!
//! Based on Game Engine Architecture 3rd Edition, Chapter 13:
//! "The collision detection system is typically split into two phases:
//! broad-phase and narrow-phase."
//!
//! The broad-phase is a [`SpatialGrid`] of fixed-size chunks, updated
//! incrementally whenever a component's bounding rectangle changes. The
//! narrow-phase is [`WorldSpaceShape::intersects`].
//!
//! The system does not own actor transforms; every operation that needs one
//! receives a [`TransformProvider`].

use std::collections::HashSet;

use crate::core::config::CollisionConfig;
use crate::foundation::collections::{ActorId, ColliderId, SlotMap};
use crate::foundation::math::{Rect, Transform2D, Vec2};
use crate::physics::collision::{CollisionShape, RectScaling, ShapeEvent, WorldSpaceShape};
use crate::physics::collision_layers::CollisionLayers;
use crate::scene::TransformProvider;
use crate::spatial::{ChunkRange, SpatialGrid};

/// Errors raised by collision component operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CollisionError {
    /// The collider handle is stale or belongs to another level
    #[error("unknown collider {0:?}")]
    UnknownCollider(ColliderId),

    /// The actor handle is stale or belongs to another level
    #[error("unknown actor {0:?}")]
    UnknownActor(ActorId),

    /// A shape parameter was set on the wrong kind of shape
    #[error("collider {collider:?} is a {actual} shape, expected {expected}")]
    ShapeMismatch {
        /// Collider that was addressed
        collider: ColliderId,
        /// Shape kind the operation needs
        expected: &'static str,
        /// Shape kind the collider has
        actual: &'static str,
    },

    /// A parent collider must belong to the same actor as its child
    #[error("parent collider {parent:?} does not belong to actor {actor:?}")]
    ParentMismatch {
        /// Requested parent
        parent: ColliderId,
        /// Actor of the new collider
        actor: ActorId,
    },
}

/// Collision pair representing two components that are overlapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    /// Smaller handle of the pair
    pub collider_a: ColliderId,
    /// Larger handle of the pair
    pub collider_b: ColliderId,
}

impl CollisionPair {
    /// Create a new collision pair (always stores the smaller handle first for consistency)
    pub fn new(a: ColliderId, b: ColliderId) -> Self {
        if a < b {
            Self { collider_a: a, collider_b: b }
        } else {
            Self { collider_a: b, collider_b: a }
        }
    }
}

/// Description of a collision component to create
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderDesc {
    /// Model-space shape
    pub shape: CollisionShape,
    /// Parent collider of the same actor; `None` attaches to the actor root
    pub parent: Option<ColliderId>,
    /// Transform relative to the parent (or the actor)
    pub relative: Transform2D,
    /// Collision layer bitmask (what layer is this component on?)
    pub layer: CollisionLayers,
    /// Collision mask (what layers can this component collide with?)
    pub mask: CollisionLayers,
}

impl ColliderDesc {
    /// Root collider with the given shape and default layers
    pub fn new(shape: CollisionShape) -> Self {
        Self {
            shape,
            parent: None,
            relative: Transform2D::identity(),
            layer: CollisionLayers::all(),
            mask: CollisionLayers::all(),
        }
    }

    /// Root circle collider
    pub fn circle(radius: f32) -> Self {
        Self::new(CollisionShape::circle(radius))
    }

    /// Root rectangle collider
    pub fn rect(size: Vec2) -> Self {
        Self::new(CollisionShape::rect(size))
    }

    /// Attach to a parent collider
    pub fn with_parent(mut self, parent: ColliderId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the relative transform
    pub fn with_relative(mut self, relative: Transform2D) -> Self {
        self.relative = relative;
        self
    }

    /// Set layer and mask
    pub fn with_layers(mut self, layer: CollisionLayers, mask: CollisionLayers) -> Self {
        self.layer = layer;
        self.mask = mask;
        self
    }
}

/// A collision shape bound to an actor
#[derive(Debug, Clone)]
pub struct ColliderComponent {
    actor: ActorId,
    parent: Option<ColliderId>,
    relative: Transform2D,
    shape: CollisionShape,
    layer: CollisionLayers,
    mask: CollisionLayers,
    /// Cached world-space bounding rectangle, as registered in the grid
    bounds: Rect,
}

impl ColliderComponent {
    /// Owning actor
    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// Parent collider, `None` for actor-root components
    pub fn parent(&self) -> Option<ColliderId> {
        self.parent
    }

    /// Transform relative to the parent
    pub fn relative(&self) -> &Transform2D {
        &self.relative
    }

    /// Model-space shape
    pub fn shape(&self) -> &CollisionShape {
        &self.shape
    }

    /// Collision layer
    pub fn layer(&self) -> CollisionLayers {
        self.layer
    }

    /// Collision mask
    pub fn mask(&self) -> CollisionLayers {
        self.mask
    }

    /// Cached world-space bounding rectangle
    pub fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// Collision components of one level and their broad-phase grid
///
/// This system manages collision detection between components using a
/// two-phase approach: broad-phase (chunk grid) and narrow-phase (shape
/// intersection).
pub struct CollisionWorld {
    /// Spatial partitioning structure for broad-phase
    grid: SpatialGrid<ColliderId>,

    /// Collider data for each handle
    colliders: SlotMap<ColliderId, ColliderComponent>,

    rect_scaling: RectScaling,

    /// Collision pairs from the current frame
    current_pairs: HashSet<CollisionPair>,

    /// Collision pairs from the previous frame
    previous_pairs: HashSet<CollisionPair>,
}

impl CollisionWorld {
    /// Create an empty collision world; the configuration must be valid
    pub fn new(config: &CollisionConfig) -> Self {
        Self {
            grid: SpatialGrid::new(config.chunk_size),
            colliders: SlotMap::with_key(),
            rect_scaling: config.rect_scaling,
            current_pairs: HashSet::new(),
            previous_pairs: HashSet::new(),
        }
    }

    /// Create and register a collision component for an actor
    pub fn register(
        &mut self,
        actor: ActorId,
        desc: ColliderDesc,
        transforms: &impl TransformProvider,
    ) -> Result<ColliderId, CollisionError> {
        if transforms.actor_transform(actor).is_none() {
            return Err(CollisionError::UnknownActor(actor));
        }
        if let Some(parent) = desc.parent {
            let parent_actor = self
                .colliders
                .get(parent)
                .ok_or(CollisionError::UnknownCollider(parent))?
                .actor;
            if parent_actor != actor {
                return Err(CollisionError::ParentMismatch { parent, actor });
            }
        }

        let id = self.colliders.insert(ColliderComponent {
            actor,
            parent: desc.parent,
            relative: desc.relative,
            shape: desc.shape,
            layer: desc.layer,
            mask: desc.mask,
            bounds: Rect::default(),
        });

        let bounds = self.compute_bounds(id, transforms).unwrap_or_default();
        self.colliders[id].bounds = bounds;
        self.grid.insert(id, &bounds);

        log::trace!(
            "Registered {} collider {:?} for actor {:?} in chunks {:?}",
            desc.shape.kind(),
            id,
            actor,
            self.grid.range_of(id)
        );
        Ok(id)
    }

    /// Remove a collision component from every chunk it occupies
    ///
    /// Children of the removed component are re-attached to its parent with
    /// a relative transform that keeps their world placement unchanged.
    pub fn unregister(&mut self, id: ColliderId) -> Option<ColliderComponent> {
        let removed = self.colliders.remove(id)?;
        self.grid.remove_all(id);

        for child in self.colliders.values_mut().filter(|c| c.parent == Some(id)) {
            child.parent = removed.parent;
            child.relative = removed.relative.combine(&child.relative);
        }

        log::trace!("Unregistered collider {:?} of actor {:?}", id, removed.actor);
        Some(removed)
    }

    /// Remove every collision component of an actor
    pub fn unregister_actor(&mut self, actor: ActorId) -> Vec<ColliderId> {
        let ids: Vec<ColliderId> = self
            .colliders
            .iter()
            .filter(|(_, collider)| collider.actor == actor)
            .map(|(id, _)| id)
            .collect();

        for &id in &ids {
            self.colliders.remove(id);
            self.grid.remove_all(id);
        }
        ids
    }

    /// World transform of a component: its relative transform composed onto
    /// its parent chain and finally the actor transform
    pub fn world_transform(
        &self,
        id: ColliderId,
        transforms: &impl TransformProvider,
    ) -> Option<Transform2D> {
        let mut chain = Vec::new();
        let mut current = self.colliders.get(id)?;
        chain.push(current.relative);
        while let Some(parent) = current.parent {
            current = self.colliders.get(parent)?;
            chain.push(current.relative);
        }

        let root = transforms.actor_transform(current.actor)?;
        Some(chain.iter().rev().fold(root, |world, relative| world.combine(relative)))
    }

    fn compute_bounds(&self, id: ColliderId, transforms: &impl TransformProvider) -> Option<Rect> {
        let world = self.world_transform(id, transforms)?;
        Some(self.colliders.get(id)?.shape.boundary_rect(&world, self.rect_scaling))
    }

    /// Recompute a component's bounding rectangle and move it between chunks
    ///
    /// Returns `true` if the bounding rectangle changed.
    pub fn refresh(&mut self, id: ColliderId, transforms: &impl TransformProvider) -> bool {
        let Some(new_bounds) = self.compute_bounds(id, transforms) else {
            return false;
        };
        let Some(collider) = self.colliders.get_mut(id) else {
            return false;
        };

        let old_bounds = collider.bounds;
        collider.bounds = new_bounds;
        self.grid.update(id, &old_bounds, &new_bounds)
    }

    /// Refresh several components
    pub fn refresh_all(
        &mut self,
        ids: impl IntoIterator<Item = ColliderId>,
        transforms: &impl TransformProvider,
    ) -> usize {
        ids.into_iter().filter(|&id| self.refresh(id, transforms)).count()
    }

    /// Every component whose parent chain passes through `id`
    pub fn descendants(&self, id: ColliderId) -> Vec<ColliderId> {
        self.colliders
            .iter()
            .filter(|(candidate, _)| *candidate != id && self.has_ancestor(*candidate, id))
            .map(|(candidate, _)| candidate)
            .collect()
    }

    fn has_ancestor(&self, id: ColliderId, ancestor: ColliderId) -> bool {
        let mut current = self.colliders.get(id).and_then(|c| c.parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.colliders.get(parent).and_then(|c| c.parent);
        }
        false
    }

    /// Change the transform of a component relative to its parent and
    /// re-register it together with its descendants
    pub fn set_relative(
        &mut self,
        id: ColliderId,
        relative: Transform2D,
        transforms: &impl TransformProvider,
    ) -> Result<(), CollisionError> {
        self.colliders
            .get_mut(id)
            .ok_or(CollisionError::UnknownCollider(id))?
            .relative = relative;

        let mut affected = self.descendants(id);
        affected.push(id);
        self.refresh_all(affected, transforms);
        Ok(())
    }

    /// Change the radius of a circle component
    pub fn set_circle_radius(
        &mut self,
        id: ColliderId,
        radius: f32,
        transforms: &impl TransformProvider,
    ) -> Result<(), CollisionError> {
        let collider = self.colliders.get_mut(id).ok_or(CollisionError::UnknownCollider(id))?;
        let event = match &mut collider.shape {
            CollisionShape::Circle(circle) => circle.set_radius(radius),
            other => {
                return Err(CollisionError::ShapeMismatch {
                    collider: id,
                    expected: "circle",
                    actual: other.kind(),
                })
            }
        };
        self.on_shape_event(id, event, transforms);
        Ok(())
    }

    /// Change the size of a rectangle component
    pub fn set_rect_size(
        &mut self,
        id: ColliderId,
        size: Vec2,
        transforms: &impl TransformProvider,
    ) -> Result<(), CollisionError> {
        let collider = self.colliders.get_mut(id).ok_or(CollisionError::UnknownCollider(id))?;
        let event = match &mut collider.shape {
            CollisionShape::Rect(rect) => rect.set_size(size),
            other => {
                return Err(CollisionError::ShapeMismatch {
                    collider: id,
                    expected: "rect",
                    actual: other.kind(),
                })
            }
        };
        self.on_shape_event(id, event, transforms);
        Ok(())
    }

    fn on_shape_event(&mut self, id: ColliderId, event: ShapeEvent, transforms: &impl TransformProvider) {
        if event == ShapeEvent::Resized {
            self.refresh(id, transforms);
        }
    }

    /// World-space shape of a component for narrow-phase testing
    pub fn world_shape(
        &self,
        id: ColliderId,
        transforms: &impl TransformProvider,
    ) -> Option<WorldSpaceShape> {
        let world = self.world_transform(id, transforms)?;
        Some(self.colliders.get(id)?.shape.to_world_space(&world, self.rect_scaling))
    }

    /// Broad-phase: every other component sharing a chunk touched by this
    /// component's bounding rectangle, each listed once
    pub fn candidates(&self, id: ColliderId) -> HashSet<ColliderId> {
        let Some(collider) = self.colliders.get(id) else {
            return HashSet::new();
        };

        let mut found = self.grid.query_rect(&collider.bounds);
        found.remove(&id);
        found
    }

    /// Every other component whose exact geometry overlaps this one
    ///
    /// The result has no particular order. Candidates come from this
    /// component's bounding rectangle, so the result is symmetric only while
    /// the narrow phase stays within the bounds: two circles with different
    /// world scales can overlap by [`circle_circle`] without sharing a chunk,
    /// and then only the larger one reports the pair.
    ///
    /// [`circle_circle`]: crate::physics::collision::circle_circle
    pub fn get_overlap(&self, id: ColliderId, transforms: &impl TransformProvider) -> Vec<ColliderId> {
        let Some(shape) = self.world_shape(id, transforms) else {
            return Vec::new();
        };

        self.candidates(id)
            .into_iter()
            .filter(|&other| {
                self.world_shape(other, transforms)
                    .is_some_and(|other_shape| shape.intersects(&other_shape))
            })
            .collect()
    }

    /// Narrow-phase test between two components
    pub fn overlaps(&self, a: ColliderId, b: ColliderId, transforms: &impl TransformProvider) -> bool {
        match (self.world_shape(a, transforms), self.world_shape(b, transforms)) {
            (Some(shape_a), Some(shape_b)) => shape_a.intersects(&shape_b),
            _ => false,
        }
    }

    /// Perform collision detection for every component (broad-phase +
    /// narrow-phase) and return the overlapping pairs for this frame
    ///
    /// Pairs are filtered by collision layers.
    pub fn detect_collisions(&mut self, transforms: &impl TransformProvider) -> &HashSet<CollisionPair> {
        let mut pairs = HashSet::new();

        for (id, collider) in &self.colliders {
            let Some(shape) = self.world_shape(id, transforms) else {
                continue;
            };

            for other in self.candidates(id) {
                // Each unordered pair is tested from its smaller side only
                if other < id {
                    continue;
                }
                let other_collider = &self.colliders[other];
                if !CollisionLayers::should_collide(
                    collider.layer,
                    collider.mask,
                    other_collider.layer,
                    other_collider.mask,
                ) {
                    continue;
                }
                if self
                    .world_shape(other, transforms)
                    .is_some_and(|other_shape| shape.intersects(&other_shape))
                {
                    pairs.insert(CollisionPair::new(id, other));
                }
            }
        }

        self.previous_pairs = std::mem::replace(&mut self.current_pairs, pairs);
        &self.current_pairs
    }

    /// Pairs that started overlapping in the last detection pass
    pub fn collisions_entered(&self) -> Vec<CollisionPair> {
        self.current_pairs
            .difference(&self.previous_pairs)
            .copied()
            .collect()
    }

    /// Pairs that stopped overlapping in the last detection pass
    pub fn collisions_exited(&self) -> Vec<CollisionPair> {
        self.previous_pairs
            .difference(&self.current_pairs)
            .copied()
            .collect()
    }

    /// Pairs found by the last detection pass
    pub fn current_collisions(&self) -> &HashSet<CollisionPair> {
        &self.current_pairs
    }

    /// Get a collision component
    pub fn get(&self, id: ColliderId) -> Option<&ColliderComponent> {
        self.colliders.get(id)
    }

    /// Iterate all collision components
    pub fn iter(&self) -> impl Iterator<Item = (ColliderId, &ColliderComponent)> {
        self.colliders.iter()
    }

    /// Chunks a component is registered in
    pub fn occupied_chunks(&self, id: ColliderId) -> Option<ChunkRange> {
        self.grid.range_of(id)
    }

    /// Broad-phase grid, for inspection and debug output
    pub fn grid(&self) -> &SpatialGrid<ColliderId> {
        &self.grid
    }

    /// Rect scaling policy in effect
    pub fn rect_scaling(&self) -> RectScaling {
        self.rect_scaling
    }

    /// Number of registered components
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Whether no component is registered
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Actor;
    use crate::spatial::ChunkCoord;

    fn setup() -> (CollisionWorld, SlotMap<ActorId, Actor>) {
        let config = CollisionConfig::new().with_chunk_size(Vec2::new(100.0, 100.0));
        (CollisionWorld::new(&config), SlotMap::with_key())
    }

    fn spawn(actors: &mut SlotMap<ActorId, Actor>, x: f32, y: f32) -> ActorId {
        actors.insert(Actor::new(Transform2D::from_position(Vec2::new(x, y))))
    }

    #[test]
    fn test_circle_overlap_scenario() {
        let (mut world, mut actors) = setup();
        let a = spawn(&mut actors, 0.0, 0.0);
        let b = spawn(&mut actors, 8.0, 0.0);

        let circle_a = world.register(a, ColliderDesc::circle(5.0), &actors).unwrap();
        let circle_b = world.register(b, ColliderDesc::circle(4.0), &actors).unwrap();

        assert_eq!(world.get_overlap(circle_a, &actors), vec![circle_b]);
        assert!(world.overlaps(circle_b, circle_a, &actors));

        actors[b].set_transform(Transform2D::from_position(Vec2::new(10.0, 0.0)));
        world.refresh(circle_b, &actors);

        assert!(world.get_overlap(circle_a, &actors).is_empty());
        assert!(!world.overlaps(circle_a, circle_b, &actors));
    }

    #[test]
    fn test_register_rejects_bad_handles() {
        let (mut world, mut actors) = setup();
        let a = spawn(&mut actors, 0.0, 0.0);
        let b = spawn(&mut actors, 0.0, 0.0);
        let parent = world.register(a, ColliderDesc::circle(1.0), &actors).unwrap();

        let result = world.register(b, ColliderDesc::circle(1.0).with_parent(parent), &actors);
        assert_eq!(result, Err(CollisionError::ParentMismatch { parent, actor: b }));

        actors.remove(b);
        let result = world.register(b, ColliderDesc::circle(1.0), &actors);
        assert_eq!(result, Err(CollisionError::UnknownActor(b)));
    }

    #[test]
    fn test_nested_component_follows_parent_chain() {
        let (mut world, mut actors) = setup();
        let actor = actors.insert(Actor::new(Transform2D::new(
            Vec2::new(100.0, 100.0),
            Vec2::new(2.0, 2.0),
        )));

        let offset = Transform2D::from_position(Vec2::new(10.0, 0.0));
        let root = world
            .register(actor, ColliderDesc::circle(1.0).with_relative(offset), &actors)
            .unwrap();
        let child = world
            .register(
                actor,
                ColliderDesc::circle(1.0)
                    .with_parent(root)
                    .with_relative(Transform2D::from_position(Vec2::new(0.0, 5.0))),
                &actors,
            )
            .unwrap();

        let world_transform = world.world_transform(child, &actors).unwrap();
        assert_eq!(world_transform.position, Vec2::new(120.0, 110.0));
        assert_eq!(world_transform.scale, Vec2::new(2.0, 2.0));
        assert_eq!(world.descendants(root), vec![child]);

        // Moving the parent drags the child along
        world
            .set_relative(root, Transform2D::from_position(Vec2::new(-60.0, 0.0)), &actors)
            .unwrap();
        assert_eq!(world.get(child).unwrap().bounds().center(), Vec2::new(-20.0, 110.0));
        assert!(world.grid().contains(child, ChunkCoord::new(-1, 1)));
    }

    #[test]
    fn test_unregister_reparents_children_in_place() {
        let (mut world, mut actors) = setup();
        let actor = spawn(&mut actors, 0.0, 0.0);
        let root_offset = Transform2D::from_position(Vec2::new(10.0, 10.0));
        let root = world
            .register(actor, ColliderDesc::circle(1.0).with_relative(root_offset), &actors)
            .unwrap();
        let child_offset = Transform2D::from_position(Vec2::new(5.0, 0.0));
        let child = world
            .register(
                actor,
                ColliderDesc::circle(1.0).with_parent(root).with_relative(child_offset),
                &actors,
            )
            .unwrap();
        let before = world.world_transform(child, &actors).unwrap();

        assert!(world.unregister(root).is_some());

        let child_component = world.get(child).unwrap();
        assert_eq!(child_component.parent(), None);
        assert_eq!(world.world_transform(child, &actors).unwrap(), before);
        assert!(world.unregister(root).is_none());
    }

    #[test]
    fn test_resize_reregisters() {
        let (mut world, mut actors) = setup();
        let actor = spawn(&mut actors, 50.0, 50.0);
        let id = world.register(actor, ColliderDesc::circle(10.0), &actors).unwrap();
        assert_eq!(world.occupied_chunks(id).unwrap().len(), 1);

        // Bounds grow to (-50, -50)..(150, 150)
        world.set_circle_radius(id, 100.0, &actors).unwrap();
        assert_eq!(world.occupied_chunks(id).unwrap().len(), 9);
        assert!(world.grid().contains(id, ChunkCoord::new(-1, -1)));

        let err = world.set_rect_size(id, Vec2::new(1.0, 1.0), &actors).unwrap_err();
        assert!(matches!(err, CollisionError::ShapeMismatch { expected: "rect", actual: "circle", .. }));
    }

    #[test]
    fn test_detect_collisions_entered_exited_and_layers() {
        let (mut world, mut actors) = setup();
        let a = spawn(&mut actors, 0.0, 0.0);
        let b = spawn(&mut actors, 5.0, 0.0);
        let c = spawn(&mut actors, 0.0, 5.0);

        let player = ColliderDesc::circle(5.0)
            .with_layers(CollisionLayers::PLAYER, CollisionLayers::ENEMY);
        let enemy = ColliderDesc::circle(5.0)
            .with_layers(CollisionLayers::ENEMY, CollisionLayers::PLAYER);
        // Overlaps both but only collides with the environment
        let pickup = ColliderDesc::circle(5.0)
            .with_layers(CollisionLayers::PICKUP, CollisionLayers::ENVIRONMENT);

        let ca = world.register(a, player, &actors).unwrap();
        let cb = world.register(b, enemy, &actors).unwrap();
        world.register(c, pickup, &actors).unwrap();

        let pairs = world.detect_collisions(&actors).clone();
        assert_eq!(pairs.len(), 1);
        assert!(pairs.contains(&CollisionPair::new(cb, ca)));
        assert_eq!(world.collisions_entered(), vec![CollisionPair::new(ca, cb)]);

        actors[b].set_transform(Transform2D::from_position(Vec2::new(500.0, 0.0)));
        world.refresh(cb, &actors);
        world.detect_collisions(&actors);

        assert!(world.current_collisions().is_empty());
        assert_eq!(world.collisions_exited(), vec![CollisionPair::new(ca, cb)]);
    }
}
