//! Math utilities and types
//!
//! Provides the 2D value types shared by every engine layer: vectors,
//! points, axis-aligned rectangles and position/scale transforms.

use serde::{Deserialize, Serialize};

pub use nalgebra::{Point2 as NaPoint2, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D point type
pub type Point2 = NaPoint2<f32>;

/// Axis-aligned rectangle in world coordinates.
///
/// The rectangle is always normalized: width and height are never negative.
/// Constructing one with a negative extent shifts the position so the same
/// region is described with a positive extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    position: Vec2,
    size: Vec2,
}

impl Rect {
    /// Create a rectangle from its top-left position and size
    pub fn new(position: Vec2, size: Vec2) -> Self {
        let mut rect = Self { position, size };
        rect.normalize();
        rect
    }

    /// Create a rectangle spanning two corners, in any order
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self::new(a, b - a)
    }

    /// Create a rectangle from its center and half extents
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self::new(center - half_extents, half_extents * 2.0)
    }

    /// Zero-sized rectangle at a point
    pub fn from_point(point: Vec2) -> Self {
        Self::new(point, Vec2::zeros())
    }

    fn normalize(&mut self) {
        if self.size.x < 0.0 {
            self.position.x += self.size.x;
            self.size.x = -self.size.x;
        }
        if self.size.y < 0.0 {
            self.position.y += self.size.y;
            self.size.y = -self.size.y;
        }
    }

    /// Top-left (minimum) corner
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Width and height, never negative
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Bottom-right (maximum) corner
    pub fn corner_position(&self) -> Vec2 {
        self.position + self.size
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Minimum x
    pub fn left(&self) -> f32 {
        self.position.x
    }

    /// Minimum y
    pub fn top(&self) -> f32 {
        self.position.y
    }

    /// Maximum x
    pub fn right(&self) -> f32 {
        self.position.x + self.size.x
    }

    /// Maximum y
    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y
    }

    /// The four corners: top-left, top-right, bottom-left, bottom-right
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.left(), self.top()),
            Vec2::new(self.right(), self.top()),
            Vec2::new(self.left(), self.bottom()),
            Vec2::new(self.right(), self.bottom()),
        ]
    }

    /// Closed overlap test, touching edges count as overlapping
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }

    /// Closed containment test for a point
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(Vec2::zeros(), Vec2::zeros())
    }
}

/// Transform representing position and scale in 2D space
///
/// Rotation is intentionally absent: every collision volume in the engine is
/// axis aligned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    /// Position in world (or parent) space
    pub position: Vec2,

    /// Per-axis scale factors
    pub scale: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl Transform2D {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform from position and scale
    pub fn new(position: Vec2, scale: Vec2) -> Self {
        Self { position, scale }
    }

    /// Builder pattern: Set scale (non-uniform)
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Combine this (parent) transform with a child transform expressed
    /// relative to it
    pub fn combine(&self, child: &Transform2D) -> Transform2D {
        Transform2D {
            position: self.position + self.scale.component_mul(&child.position),
            scale: self.scale.component_mul(&child.scale),
        }
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Point2) -> Point2 {
        Point2::from(self.position + self.scale.component_mul(&point.coords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_negative_size_is_normalized() {
        let rect = Rect::new(Vec2::new(10.0, 10.0), Vec2::new(-4.0, -6.0));

        assert_eq!(rect.position(), Vec2::new(6.0, 4.0));
        assert_eq!(rect.size(), Vec2::new(4.0, 6.0));
        assert_eq!(rect.corner_position(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_from_corners_any_order() {
        let a = Rect::from_corners(Vec2::new(5.0, 1.0), Vec2::new(1.0, 5.0));
        let b = Rect::from_corners(Vec2::new(1.0, 1.0), Vec2::new(5.0, 5.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_rect_overlap_touching_edges() {
        let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Rect::new(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        let c = Rect::new(Vec2::new(10.5, 0.0), Vec2::new(10.0, 10.0));

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_contains_point_is_closed() {
        let rect = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0));
        assert!(rect.contains_point(Vec2::new(2.0, 2.0)));
        assert!(rect.contains_point(Vec2::new(0.0, 1.0)));
        assert!(!rect.contains_point(Vec2::new(2.1, 1.0)));
    }

    #[test]
    fn test_transform_combine() {
        let parent = Transform2D::new(Vec2::new(10.0, 20.0), Vec2::new(2.0, 3.0));
        let child = Transform2D::new(Vec2::new(1.0, 1.0), Vec2::new(0.5, 2.0));
        let world = parent.combine(&child);

        assert_relative_eq!(world.position.x, 12.0);
        assert_relative_eq!(world.position.y, 23.0);
        assert_relative_eq!(world.scale.x, 1.0);
        assert_relative_eq!(world.scale.y, 6.0);

        let point = parent.transform_point(Point2::new(1.0, 1.0));
        assert_relative_eq!(point.x, 12.0);
        assert_relative_eq!(point.y, 23.0);
    }
}
