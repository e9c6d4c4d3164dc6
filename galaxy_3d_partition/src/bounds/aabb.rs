/// Axis-aligned bounding box in world space.
///
/// Stored as min/max corners. Degenerate (zero-extent) boxes are legal:
/// a point-sized primitive still has a valid bound.

use glam::{Mat4, Vec3};
use super::ray::{Ray, PARALLEL_EPSILON};

/// Axis-Aligned Bounding Box
///
/// Invariant: `min <= max` componentwise for every box produced by this
/// crate. `AABB::default()` is the zero box at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl AABB {
    /// Create a box from its two corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a box from a center point and a half size.
    pub fn from_center_extent(center: Vec3, extent: Vec3) -> Self {
        Self {
            min: center - extent,
            max: center + extent,
        }
    }

    /// Smallest box enclosing every point, or `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::new(first, first), |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        }))
    }

    /// Center point of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half size of the box along each axis.
    pub fn extent(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Full size of the box along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Whether `min <= max` on every axis and no coordinate is NaN or infinite.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min.cmple(self.max).all()
    }

    /// Componentwise union of two boxes.
    ///
    /// Commutative and associative, so bottom-up propagation gives the
    /// same result whatever order children are merged in.
    pub fn union(&self, other: &AABB) -> AABB {
        AABB {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Transform this box by a matrix, returning the enclosing world box.
    ///
    /// Uses the Arvo method: projects each matrix axis onto the box extents
    /// for a tight result without transforming all 8 corners.
    pub fn transformed(&self, matrix: &Mat4) -> AABB {
        let translation = matrix.col(3).truncate();
        let mut new_min = translation;
        let mut new_max = translation;

        for i in 0..3 {
            let axis = matrix.col(i).truncate();
            let a = axis * self.min[i];
            let b = axis * self.max[i];
            new_min += a.min(b);
            new_max += a.max(b);
        }

        AABB { min: new_min, max: new_max }
    }

    /// Test if this box fully contains another box.
    pub fn contains(&self, other: &AABB) -> bool {
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }

    /// Test if a point lies inside or on the boundary of this box.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.min.cmple(point).all() && self.max.cmpge(point).all()
    }

    /// Test if this box overlaps or touches another box.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Ray/box intersection using the slab method.
    ///
    /// Returns `(t_enter, t_exit)` along the ray, or `None` on a miss.
    /// An axis where the direction is below `PARALLEL_EPSILON` is handled
    /// as a containment test on the origin instead of a division.
    /// `t_enter` is clamped to 0, so a ray starting inside the box enters
    /// at distance 0.
    pub fn ray_intersect(&self, ray: &Ray) -> Option<(f32, f32)> {
        let mut t_min = f32::MIN;
        let mut t_max = f32::MAX;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            let slab_min = self.min[axis];
            let slab_max = self.max[axis];

            if direction.abs() < PARALLEL_EPSILON {
                if origin < slab_min || origin > slab_max {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let mut t1 = (slab_min - origin) * inv;
            let mut t2 = (slab_max - origin) * inv;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return None;
            }
        }

        // Box entirely behind the origin
        if t_max < 0.0 {
            return None;
        }

        Some((t_min.max(0.0), t_max))
    }

    /// The 8 corners, indexed with bit0 = X, bit1 = Y, bit2 = Z (0 = min, 1 = max).
    pub fn corners(&self) -> [Vec3; 8] {
        std::array::from_fn(|i| Vec3::new(
            if i & 1 == 0 { self.min.x } else { self.max.x },
            if i & 2 == 0 { self.min.y } else { self.max.y },
            if i & 4 == 0 { self.min.z } else { self.max.z },
        ))
    }
}

#[cfg(test)]
#[path = "aabb_tests.rs"]
mod tests;
