//! High-level collision shape abstractions
//!
//! Shapes store their geometry in model space and are placed in world space
//! on demand, from the world transform of the component that owns them.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Rect, Transform2D, Vec2};
use super::primitives::{WorldCircle, WorldSpaceShape};

/// Default circle radius in world units
pub const DEFAULT_CIRCLE_RADIUS: f32 = 50.0;

/// Default rectangle width and height in world units
pub const DEFAULT_RECT_SIZE: f32 = 100.0;

/// How a rectangle shape applies world scale to its bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RectScaling {
    /// The top-left corner is offset by the scaled half size but the extent
    /// stays the unscaled size. Matches the behaviour existing levels were
    /// authored against.
    #[default]
    Legacy,
    /// Both the offset and the extent are scaled
    Scaled,
}

/// Notification returned by shape parameter setters
///
/// The owner of the shape must re-register the component in the collision
/// grid when it receives [`ShapeEvent::Resized`].
#[must_use = "a resized shape must be re-registered in the collision grid"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeEvent {
    /// The parameter was set to the value it already had
    Unchanged,
    /// The shape's geometry changed
    Resized,
}

/// Circle shape, positioned at the component's world position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleShape {
    radius: f32,
}

impl CircleShape {
    /// Creates a circle with the given radius
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    /// Unscaled radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Change the radius
    pub fn set_radius(&mut self, radius: f32) -> ShapeEvent {
        if self.radius == radius {
            return ShapeEvent::Unchanged;
        }
        self.radius = radius;
        ShapeEvent::Resized
    }

    /// World-space bounding rectangle: centered on the world position with a
    /// half extent of `radius * scale` on each axis
    pub fn boundary_rect(&self, world: &Transform2D) -> Rect {
        Rect::from_center_half_extents(world.position, world.scale * self.radius)
    }

    /// World-space circle for narrow-phase tests
    pub fn to_world_space(&self, world: &Transform2D) -> WorldCircle {
        WorldCircle::new(world.position, world.scale, self.radius)
    }
}

impl Default for CircleShape {
    fn default() -> Self {
        Self::new(DEFAULT_CIRCLE_RADIUS)
    }
}

/// Axis-aligned rectangle shape, centered on the component's world position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectShape {
    size: Vec2,
}

impl RectShape {
    /// Creates a rectangle with the given width and height
    pub fn new(size: Vec2) -> Self {
        Self { size }
    }

    /// Unscaled size
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Change the size
    pub fn set_size(&mut self, size: Vec2) -> ShapeEvent {
        if self.size == size {
            return ShapeEvent::Unchanged;
        }
        self.size = size;
        ShapeEvent::Resized
    }

    /// World-space bounding rectangle
    ///
    /// The top-left corner is `position - size * scale / 2`. Under
    /// [`RectScaling::Legacy`] the extent is the unscaled `size`, so a scaled
    /// rectangle is not centered on its position.
    pub fn boundary_rect(&self, world: &Transform2D, scaling: RectScaling) -> Rect {
        let scaled = self.size.component_mul(&world.scale);
        let extent = match scaling {
            RectScaling::Legacy => self.size,
            RectScaling::Scaled => scaled,
        };
        Rect::new(world.position - scaled * 0.5, extent)
    }
}

impl Default for RectShape {
    fn default() -> Self {
        Self::new(Vec2::new(DEFAULT_RECT_SIZE, DEFAULT_RECT_SIZE))
    }
}

/// Collision shape types (stored in MODEL SPACE)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionShape {
    /// A circular collision shape
    Circle(CircleShape),
    /// An axis-aligned rectangular collision shape
    Rect(RectShape),
}

impl CollisionShape {
    /// Creates a circular collision shape with given radius
    pub fn circle(radius: f32) -> Self {
        Self::Circle(CircleShape::new(radius))
    }

    /// Creates a rectangular collision shape with given size
    pub fn rect(size: Vec2) -> Self {
        Self::Rect(RectShape::new(size))
    }

    /// Human readable shape kind, for logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Circle(_) => "circle",
            Self::Rect(_) => "rect",
        }
    }

    /// World-space bounding rectangle
    pub fn boundary_rect(&self, world: &Transform2D, scaling: RectScaling) -> Rect {
        match self {
            Self::Circle(circle) => circle.boundary_rect(world),
            Self::Rect(rect) => rect.boundary_rect(world, scaling),
        }
    }

    /// Transform this shape to world space
    /// Returns a temporary WorldSpaceShape for collision testing
    pub fn to_world_space(&self, world: &Transform2D, scaling: RectScaling) -> WorldSpaceShape {
        match self {
            Self::Circle(circle) => WorldSpaceShape::Circle(circle.to_world_space(world)),
            Self::Rect(rect) => WorldSpaceShape::Rect(rect.boundary_rect(world, scaling)),
        }
    }
}

impl Default for CollisionShape {
    fn default() -> Self {
        Self::Circle(CircleShape::default())
    }
}
