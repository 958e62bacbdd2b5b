//! Axis-aligned box overlap testing
//!
//! Everything that can collide in this game is an upright rectangle in
//! screen space, so a single center/extent box type covers all of it.

use glam::Vec2;

/// An axis-aligned box given by its center point and full width/height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    /// Square box helper
    pub fn square(center: Vec2, side: f32) -> Self {
        Self::new(center, Vec2::splat(side))
    }

    /// Overlap test with strict inequality: boxes that exactly touch
    /// along an edge do not count as colliding.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        (self.center.x - other.center.x).abs() < (self.size.x + other.size.x) / 2.0
            && (self.center.y - other.center.y).abs() < (self.size.y + other.size.y) / 2.0
    }
}
