//! World-space collision primitives and the narrow-phase overlap predicate
//!
//! Shapes are stored in model space (see [`super::shape`]) and only turned
//! into one of these primitives for the duration of a test.

use crate::foundation::math::{Rect, Vec2};

/// A circle placed in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldCircle {
    /// World position of the center
    pub center: Vec2,
    /// World scale of the owning component
    pub scale: Vec2,
    /// Unscaled radius
    pub radius: f32,
}

impl WorldCircle {
    /// Creates a new world-space circle
    pub fn new(center: Vec2, scale: Vec2, radius: f32) -> Self {
        Self { center, scale, radius }
    }
}

/// World-space collision shape (temporary, for testing only)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldSpaceShape {
    /// World-space circle
    Circle(WorldCircle),
    /// World-space axis-aligned rectangle
    Rect(Rect),
}

impl WorldSpaceShape {
    /// Test if this shape intersects with another shape
    ///
    /// Every pair of shape kinds is matched explicitly, and mixed pairs run
    /// the same predicate whichever side they come from, so the test is
    /// symmetric.
    pub fn intersects(&self, other: &WorldSpaceShape) -> bool {
        match (self, other) {
            (Self::Circle(a), Self::Circle(b)) => circle_circle(a, b),
            (Self::Circle(circle), Self::Rect(rect)) => circle_rect(circle, rect),
            (Self::Rect(rect), Self::Circle(circle)) => circle_rect(circle, rect),
            (Self::Rect(a), Self::Rect(b)) => rect_rect(a, b),
        }
    }
}

/// Circle-circle overlap.
///
/// Each center is divided by its own world scale before the distance is
/// taken, and the result is compared against the sum of the unscaled radii.
/// With uniform unit scale this is the usual distance test; with other
/// scales it is not geometrically exact (a scaled-radius version is the
/// candidate replacement).
pub fn circle_circle(a: &WorldCircle, b: &WorldCircle) -> bool {
    let delta = a.center.component_div(&a.scale) - b.center.component_div(&b.scale);
    let radius_sum = a.radius + b.radius;
    delta.norm_squared() <= radius_sum * radius_sum
}

/// Circle-rectangle overlap.
///
/// Union of eight conditions: the center lies within the (per-axis scaled)
/// radius of one of the four corners, or inside one of the four bands formed
/// by pushing a single edge of the rectangle outward by the scaled radius.
/// The bands overlap each other and cover the rectangle's interior.
pub fn circle_rect(circle: &WorldCircle, rect: &Rect) -> bool {
    let c = circle.center;
    let radius_sq = circle.radius * circle.radius;
    let reach = circle.scale * circle.radius;

    let near_corner = rect.corners().iter().any(|corner| {
        let d = (c - corner).component_div(&circle.scale);
        d.norm_squared() <= radius_sq
    });
    if near_corner {
        return true;
    }

    let (left, top, right, bottom) = (rect.left(), rect.top(), rect.right(), rect.bottom());
    let within_x = c.x >= left && c.x <= right;
    let within_y = c.y >= top && c.y <= bottom;

    let left_band = within_y && c.x >= left - reach.x && c.x <= right;
    let right_band = within_y && c.x >= left && c.x <= right + reach.x;
    let top_band = within_x && c.y >= top - reach.y && c.y <= bottom;
    let bottom_band = within_x && c.y >= top && c.y <= bottom + reach.y;

    left_band || right_band || top_band || bottom_band
}

/// Rectangle-rectangle overlap, touching edges count
pub fn rect_rect(a: &Rect, b: &Rect) -> bool {
    a.overlaps(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_circle(x: f32, y: f32, radius: f32) -> WorldSpaceShape {
        WorldSpaceShape::Circle(WorldCircle::new(Vec2::new(x, y), Vec2::new(1.0, 1.0), radius))
    }

    fn rect(x: f32, y: f32, w: f32, h: f32) -> WorldSpaceShape {
        WorldSpaceShape::Rect(Rect::new(Vec2::new(x, y), Vec2::new(w, h)))
    }

    #[test]
    fn test_circle_circle_distance() {
        let a = unit_circle(0.0, 0.0, 5.0);
        assert!(a.intersects(&unit_circle(8.0, 0.0, 4.0)));
        assert!(a.intersects(&unit_circle(9.0, 0.0, 4.0)));
        assert!(!a.intersects(&unit_circle(10.0, 0.0, 4.0)));
    }

    #[test]
    fn test_circle_circle_divides_position_by_scale() {
        let a = WorldCircle::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), 1.0);
        // 20 units away at scale 10 normalizes to 2 units: exactly touching
        let b = WorldCircle::new(Vec2::new(20.0, 0.0), Vec2::new(10.0, 10.0), 1.0);
        assert!(circle_circle(&a, &b));

        let c = WorldCircle::new(Vec2::new(21.0, 0.0), Vec2::new(10.0, 10.0), 1.0);
        assert!(!circle_circle(&a, &c));
    }

    #[test]
    fn test_circle_rect_edges_and_corners() {
        let r = rect(0.0, 0.0, 10.0, 10.0);

        // Edge bands
        assert!(unit_circle(-3.0, 5.0, 3.0).intersects(&r));
        assert!(unit_circle(13.0, 5.0, 3.0).intersects(&r));
        assert!(unit_circle(5.0, -3.0, 3.0).intersects(&r));
        assert!(unit_circle(5.0, 13.0, 3.0).intersects(&r));
        assert!(!unit_circle(-3.1, 5.0, 3.0).intersects(&r));

        // Inside
        assert!(unit_circle(5.0, 5.0, 0.5).intersects(&r));

        // Corner regions
        assert!(unit_circle(12.0, 12.0, 3.0).intersects(&r));
        assert!(!unit_circle(13.0, 13.0, 3.0).intersects(&r));
        assert!(unit_circle(-2.0, -2.0, 3.0).intersects(&r));
    }

    #[test]
    fn test_circle_rect_uses_scaled_reach() {
        let r = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let wide = WorldCircle::new(Vec2::new(-5.0, 5.0), Vec2::new(2.0, 1.0), 3.0);
        let tall = WorldCircle::new(Vec2::new(-5.0, 5.0), Vec2::new(1.0, 2.0), 3.0);

        assert!(circle_rect(&wide, &r));
        assert!(!circle_rect(&tall, &r));
    }

    #[test]
    fn test_rect_rect_touching_edge() {
        assert!(rect(0.0, 0.0, 10.0, 10.0).intersects(&rect(10.0, 0.0, 10.0, 10.0)));
        assert!(rect(0.0, 0.0, 10.0, 10.0).intersects(&rect(10.0, 10.0, 1.0, 1.0)));
        assert!(!rect(0.0, 0.0, 10.0, 10.0).intersects(&rect(0.0, 10.5, 10.0, 10.0)));
    }

    #[test]
    fn test_symmetry_for_all_kind_pairs() {
        let shapes = [
            unit_circle(0.0, 0.0, 5.0),
            unit_circle(8.0, 1.0, 4.0),
            unit_circle(30.0, 30.0, 2.0),
            WorldSpaceShape::Circle(WorldCircle::new(Vec2::new(4.0, 4.0), Vec2::new(2.0, 0.5), 3.0)),
            rect(-2.0, -2.0, 4.0, 4.0),
            rect(6.0, -10.0, 3.0, 30.0),
            rect(28.0, 28.0, 1.0, 1.0),
        ];

        for a in &shapes {
            for b in &shapes {
                assert_eq!(a.intersects(b), b.intersects(a), "{a:?} vs {b:?}");
            }
        }
    }
}
