//! Specialized collection types
//!
//! Scene objects are stored in slot maps so components can hold stable,
//! generation-checked handles to each other instead of references.

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle to an actor in a level
    pub struct ActorId;

    /// Stable handle to a collision component in a level
    pub struct ColliderId;

    /// Stable handle to a clickable component in a level
    pub struct ClickableId;
}
