//! Sea-plane helpers over `glam::Vec3`.
//!
//! The world is y-up with the water surface at `y = 0`; "horizontal" means the
//! x/z plane.

use glam::Vec3;

/// Extension methods for working on the sea plane.
pub trait SeaPlane {
    /// Returns the vector with its vertical component zeroed.
    fn flat(self) -> Vec3;

    /// Length of the x/z projection.
    fn horizontal_length(self) -> f32;

    /// Distance between two points projected on the x/z plane.
    fn horizontal_distance(self, other: Vec3) -> f32;

    /// Unit direction from `self` to `target`, or zero when they coincide.
    fn direction_to(self, target: Vec3) -> Vec3;
}

impl SeaPlane for Vec3 {
    fn flat(self) -> Vec3 {
        Vec3::new(self.x, 0.0, self.z)
    }

    fn horizontal_length(self) -> f32 {
        self.flat().length()
    }

    fn horizontal_distance(self, other: Vec3) -> f32 {
        (self - other).horizontal_length()
    }

    fn direction_to(self, target: Vec3) -> Vec3 {
        (target - self).normalize_or_zero()
    }
}

/// Point on a horizontal ring around `center`, at height `y`.
#[must_use]
pub fn ring_point(center: Vec3, angle: f32, radius: f32, y: f32) -> Vec3 {
    Vec3::new(
        center.x + angle.cos() * radius,
        y,
        center.z + angle.sin() * radius,
    )
}
