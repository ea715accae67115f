//! Level: the owner of actors and their spatial grids
//!
//! Each level builds its own collision and clickable grids when it is
//! created and drops them with itself. Handles returned by a level are only
//! meaningful for that level.

use std::collections::HashSet;

use crate::core::config::ApplicationConfig;
use crate::foundation::collections::{ActorId, ClickableId, ColliderId, SlotMap};
use crate::foundation::math::{Rect, Transform2D, Vec2};
use crate::input::{ClickableComponent, ClickableWorld};
use crate::physics::{ColliderComponent, ColliderDesc, CollisionError, CollisionPair, CollisionWorld};
use crate::spatial::ChunkRange;
use super::{Actor, SceneError};

/// A level with its actors, collision components and clickables
pub struct Level {
    name: String,
    actors: SlotMap<ActorId, Actor>,
    collision: CollisionWorld,
    clickables: ClickableWorld,
    debug_mode: bool,
}

impl Level {
    /// Create an empty level
    ///
    /// Chunk sizes are fixed for the lifetime of the level.
    pub fn new(name: impl Into<String>, config: &ApplicationConfig) -> Result<Self, SceneError> {
        config.validate()?;

        let name = name.into();
        log::debug!(
            "Creating level '{}' (collision chunks {}x{}, clickable chunks {}x{}, {:?} rect scaling)",
            name,
            config.collision.chunk_size.x,
            config.collision.chunk_size.y,
            config.clickable.chunk_size.x,
            config.clickable.chunk_size.y,
            config.collision.rect_scaling
        );

        Ok(Self {
            name,
            actors: SlotMap::with_key(),
            collision: CollisionWorld::new(&config.collision),
            clickables: ClickableWorld::new(&config.clickable, config.collision.rect_scaling),
            debug_mode: config.engine.debug_mode,
        })
    }

    /// Level name
    pub fn name(&self) -> &str {
        &self.name
    }

    // Actors

    /// Spawn an actor with the given world transform
    pub fn spawn_actor(&mut self, transform: Transform2D) -> ActorId {
        self.actors.insert(Actor::new(transform))
    }

    /// Destroy an actor together with every component attached to it
    pub fn destroy_actor(&mut self, id: ActorId) -> Result<(), SceneError> {
        if self.actors.remove(id).is_none() {
            log::warn!("Level '{}': destroy of unknown actor {:?}", self.name, id);
            return Err(SceneError::UnknownActor(id));
        }

        let colliders = self.collision.unregister_actor(id);
        let clickables = self.clickables.unregister_actor(id);
        log::debug!(
            "Level '{}': destroyed actor {:?} ({} colliders, {} clickables)",
            self.name,
            id,
            colliders.len(),
            clickables.len()
        );
        Ok(())
    }

    /// Get an actor
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id)
    }

    /// Iterate all actors
    pub fn actors(&self) -> impl Iterator<Item = (ActorId, &Actor)> {
        self.actors.iter()
    }

    /// Replace an actor's world transform and re-register its components
    pub fn set_actor_transform(&mut self, id: ActorId, transform: Transform2D) -> Result<(), SceneError> {
        self.actors
            .get_mut(id)
            .ok_or(SceneError::UnknownActor(id))?
            .set_transform(transform);

        self.refresh_actor(id);
        Ok(())
    }

    /// Move an actor
    pub fn set_actor_position(&mut self, id: ActorId, position: Vec2) -> Result<(), SceneError> {
        let transform = self.actor_transform(id)?;
        self.set_actor_transform(id, Transform2D { position, ..transform })
    }

    /// Rescale an actor
    pub fn set_actor_scale(&mut self, id: ActorId, scale: Vec2) -> Result<(), SceneError> {
        let transform = self.actor_transform(id)?;
        self.set_actor_transform(id, transform.with_scale(scale))
    }

    fn actor_transform(&self, id: ActorId) -> Result<Transform2D, SceneError> {
        self.actors
            .get(id)
            .map(|actor| *actor.transform())
            .ok_or(SceneError::UnknownActor(id))
    }

    fn refresh_actor(&mut self, id: ActorId) {
        let Some(actor) = self.actors.get(id) else {
            return;
        };

        for &collider in actor.colliders() {
            self.collision.refresh(collider, &self.actors);
        }
        for &clickable in actor.clickables() {
            self.clickables.refresh(clickable, &self.actors);
        }
    }

    // Collision components

    /// Create a collision component on an actor
    pub fn add_collider(&mut self, actor: ActorId, desc: ColliderDesc) -> Result<ColliderId, SceneError> {
        let id = self.collision.register(actor, desc, &self.actors).map_err(|err| {
            log::warn!("Level '{}': rejected collider for {:?}: {}", self.name, actor, err);
            err
        })?;

        if let Some(owner) = self.actors.get_mut(actor) {
            owner.attach_collider(id);
        }
        Ok(id)
    }

    /// Destroy a collision component
    ///
    /// Its children are re-attached to its parent without moving in the world.
    pub fn destroy_collider(&mut self, id: ColliderId) -> Result<(), SceneError> {
        let removed = self
            .collision
            .unregister(id)
            .ok_or(CollisionError::UnknownCollider(id))?;

        if let Some(owner) = self.actors.get_mut(removed.actor()) {
            owner.detach_collider(id);
        }
        self.refresh_actor(removed.actor());
        Ok(())
    }

    /// Get a collision component
    pub fn collider(&self, id: ColliderId) -> Option<&ColliderComponent> {
        self.collision.get(id)
    }

    /// Change the radius of a circle component
    pub fn set_circle_radius(&mut self, id: ColliderId, radius: f32) -> Result<(), SceneError> {
        Ok(self.collision.set_circle_radius(id, radius, &self.actors)?)
    }

    /// Change the size of a rectangle component
    pub fn set_rect_size(&mut self, id: ColliderId, size: Vec2) -> Result<(), SceneError> {
        Ok(self.collision.set_rect_size(id, size, &self.actors)?)
    }

    /// Change a component's transform relative to its parent
    pub fn set_collider_relative(&mut self, id: ColliderId, relative: Transform2D) -> Result<(), SceneError> {
        Ok(self.collision.set_relative(id, relative, &self.actors)?)
    }

    /// Every other collision component overlapping this one, in no particular order
    ///
    /// Circles with unequal world scales may overlap one way only, see
    /// [`CollisionWorld::get_overlap`].
    pub fn get_overlap(&self, id: ColliderId) -> Vec<ColliderId> {
        self.collision.get_overlap(id, &self.actors)
    }

    /// Broad-phase candidates of a component
    pub fn candidates(&self, id: ColliderId) -> HashSet<ColliderId> {
        self.collision.candidates(id)
    }

    /// Whether two collision components overlap
    pub fn overlaps(&self, a: ColliderId, b: ColliderId) -> bool {
        self.collision.overlaps(a, b, &self.actors)
    }

    /// World-space bounding rectangle of a collision component
    pub fn bounding_rect(&self, id: ColliderId) -> Option<Rect> {
        self.collision.get(id).map(ColliderComponent::bounds)
    }

    /// Chunks a collision component is registered in
    pub fn occupied_chunks(&self, id: ColliderId) -> Option<ChunkRange> {
        self.collision.occupied_chunks(id)
    }

    /// Collision components and their grid
    pub fn collision(&self) -> &CollisionWorld {
        &self.collision
    }

    /// Find every overlapping pair for this frame
    pub fn detect_collisions(&mut self) -> &HashSet<CollisionPair> {
        self.collision.detect_collisions(&self.actors)
    }

    /// Pairs that started overlapping in the last [`Self::detect_collisions`]
    pub fn collisions_entered(&self) -> Vec<CollisionPair> {
        self.collision.collisions_entered()
    }

    /// Pairs that stopped overlapping in the last [`Self::detect_collisions`]
    pub fn collisions_exited(&self) -> Vec<CollisionPair> {
        self.collision.collisions_exited()
    }

    // Clickables

    /// Create a clickable area on an actor
    pub fn add_clickable(
        &mut self,
        actor: ActorId,
        size: Vec2,
        relative: Transform2D,
    ) -> Result<ClickableId, SceneError> {
        let id = self
            .clickables
            .register(actor, size, relative, &self.actors)
            .ok_or(SceneError::UnknownActor(actor))?;

        if let Some(owner) = self.actors.get_mut(actor) {
            owner.attach_clickable(id);
        }
        Ok(id)
    }

    /// Destroy a clickable area
    pub fn destroy_clickable(&mut self, id: ClickableId) -> Result<(), SceneError> {
        let removed = self
            .clickables
            .unregister(id)
            .ok_or(SceneError::UnknownClickable(id))?;

        if let Some(owner) = self.actors.get_mut(removed.actor()) {
            owner.detach_clickable(id);
        }
        Ok(())
    }

    /// Change the size of a clickable area
    pub fn set_clickable_size(&mut self, id: ClickableId, size: Vec2) -> Result<(), SceneError> {
        if self.clickables.set_size(id, size, &self.actors) {
            Ok(())
        } else {
            Err(SceneError::UnknownClickable(id))
        }
    }

    /// Get a clickable area
    pub fn clickable(&self, id: ClickableId) -> Option<&ClickableComponent> {
        self.clickables.get(id)
    }

    /// Every clickable area containing a world-space point
    pub fn clickables_at(&self, point: Vec2) -> Vec<ClickableId> {
        self.clickables.clickables_at(point)
    }

    /// Clickable areas and their grid
    pub fn clickable_world(&self) -> &ClickableWorld {
        &self.clickables
    }

    /// Log the occupancy of both grids when debug mode is enabled
    pub fn dump_grids(&self) {
        if !self.debug_mode {
            return;
        }

        log::debug!("Level '{}' collision grid:{}", self.name, self.collision.grid());
        log::debug!("Level '{}' clickable grid:{}", self.name, self.clickables.grid());
    }
}

impl Drop for Level {
    fn drop(&mut self) {
        log::debug!(
            "Dropping level '{}' ({} actors, {} colliders, {} clickables)",
            self.name,
            self.actors.len(),
            self.collision.len(),
            self.clickables.len()
        );
    }
}
