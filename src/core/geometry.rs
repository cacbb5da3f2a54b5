//! Axis-aligned boxes and reflection for the arcade engines.
//!
//! Screen space: x grows to the right, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box of the given size with its top-left corner at `origin`.
    pub fn from_origin(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin, origin + size)
    }

    /// Box of the given size centered on `center`.
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Strict overlap: boxes that only touch along an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Penetration depth along each axis, or `None` when not overlapping.
    pub fn penetration(&self, other: &Aabb) -> Option<Vec2> {
        if !self.overlaps(other) {
            return None;
        }
        let x = (self.max.x - other.min.x).min(other.max.x - self.min.x);
        let y = (self.max.y - other.min.y).min(other.max.y - self.min.y);
        Some(Vec2::new(x, y))
    }

    /// Same box moved by `delta`.
    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.min + delta, self.max + delta)
    }
}

/// Reflect `velocity` off a surface with unit `normal`.
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let a = Aabb::from_origin(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Aabb::from_origin(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0));
        let c = Aabb::from_origin(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));

        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c)); // touching edges only
    }

    #[test]
    fn test_penetration() {
        let a = Aabb::from_origin(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Aabb::from_origin(Vec2::new(8.0, 2.0), Vec2::new(10.0, 10.0));
        assert_eq!(a.penetration(&b), Some(Vec2::new(2.0, 8.0)));
    }

    #[test]
    fn test_from_center() {
        let b = Aabb::from_center(Vec2::new(5.0, 5.0), Vec2::new(4.0, 2.0));
        assert_eq!(b.min, Vec2::new(3.0, 4.0));
        assert_eq!(b.center(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_reflect_horizontal_surface() {
        let v = Vec2::new(3.0, 3.0);
        assert_eq!(reflect(v, Vec2::new(0.0, -1.0)), Vec2::new(3.0, -3.0));
    }

    #[test]
    fn test_reflect_vertical_surface() {
        let v = Vec2::new(3.0, -2.0);
        assert_eq!(reflect(v, Vec2::new(1.0, 0.0)), Vec2::new(-3.0, -2.0));
    }
}
