//! Actors: the transform owners collision components attach to

use crate::foundation::collections::{ActorId, ClickableId, ColliderId, SlotMap};
use crate::foundation::math::Transform2D;

/// Source of actor world transforms
///
/// Components never cache their actor's transform; they ask the provider
/// every time they need to recompute their bounds.
pub trait TransformProvider {
    /// World transform of an actor, `None` if the actor does not exist
    fn actor_transform(&self, actor: ActorId) -> Option<Transform2D>;
}

/// A game object placed in a level
///
/// The actor owns its transform. Collision and clickable components refer
/// back to it by [`ActorId`].
#[derive(Debug, Clone, Default)]
pub struct Actor {
    transform: Transform2D,
    colliders: Vec<ColliderId>,
    clickables: Vec<ClickableId>,
}

impl Actor {
    /// Create an actor with the given world transform
    pub fn new(transform: Transform2D) -> Self {
        Self {
            transform,
            colliders: Vec::new(),
            clickables: Vec::new(),
        }
    }

    /// World transform
    pub fn transform(&self) -> &Transform2D {
        &self.transform
    }

    pub(crate) fn set_transform(&mut self, transform: Transform2D) {
        self.transform = transform;
    }

    /// Collision components attached to this actor
    pub fn colliders(&self) -> &[ColliderId] {
        &self.colliders
    }

    /// Clickable components attached to this actor
    pub fn clickables(&self) -> &[ClickableId] {
        &self.clickables
    }

    pub(crate) fn attach_collider(&mut self, id: ColliderId) {
        self.colliders.push(id);
    }

    pub(crate) fn detach_collider(&mut self, id: ColliderId) {
        self.colliders.retain(|&other| other != id);
    }

    pub(crate) fn attach_clickable(&mut self, id: ClickableId) {
        self.clickables.push(id);
    }

    pub(crate) fn detach_clickable(&mut self, id: ClickableId) {
        self.clickables.retain(|&other| other != id);
    }
}

impl TransformProvider for SlotMap<ActorId, Actor> {
    fn actor_transform(&self, actor: ActorId) -> Option<Transform2D> {
        self.get(actor).map(|actor| actor.transform)
    }
}
