/// Ray: origin and direction used by picking queries.

use glam::Vec3;

/// Direction components below this magnitude are treated as parallel
/// to the corresponding slab.
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// A half-line starting at `origin`.
///
/// The direction is not required to be normalized; hit distances are
/// expressed in units of `direction`. Picking rays built with
/// [`Ray::from_points`] are normalized, so distances are world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point of the ray
    pub origin: Vec3,
    /// Direction of travel
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray from an origin and a direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a normalized ray from `start` towards `target`.
    ///
    /// A zero-length segment yields a zero direction, which only ever
    /// hits boxes containing `start`.
    pub fn from_points(start: Vec3, target: Vec3) -> Self {
        Self {
            origin: start,
            direction: (target - start).normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
#[path = "ray_tests.rs"]
mod tests;
