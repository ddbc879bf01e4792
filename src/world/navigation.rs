//! Walkable ground used by the steering agents.
//!
//! The playable floor is an axis-aligned rectangle on the XZ plane at a fixed
//! height. Anything outside it counts as off the surface.

use bevy::prelude::*;

/// Rectangular walkable floor.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct WalkableArea {
    /// Minimum (x, z) corner
    pub min: Vec2,
    /// Maximum (x, z) corner
    pub max: Vec2,
    /// Floor height (y)
    pub height: f32,
}

impl Default for WalkableArea {
    fn default() -> Self {
        Self {
            min: Vec2::splat(-20.0),
            max: Vec2::splat(20.0),
            height: 0.0,
        }
    }
}

impl WalkableArea {
    pub fn new(min: Vec2, max: Vec2, height: f32) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
            height,
        }
    }

    /// Whether `point` lies over the floor rectangle.
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.z >= self.min.y
            && point.z <= self.max.y
    }

    /// Nearest floor point within `radius` of `point`, snapped to floor height.
    pub fn sample(&self, point: Vec3, radius: f32) -> Option<Vec3> {
        let clamped = Vec2::new(point.x, point.z).clamp(self.min, self.max);
        let on_floor = Vec3::new(clamped.x, self.height, clamped.y);
        (on_floor.distance_squared(point) <= radius * radius).then_some(on_floor)
    }

    pub fn center(&self) -> Vec3 {
        let mid = (self.min + self.max) * 0.5;
        Vec3::new(mid.x, self.height, mid.y)
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}
