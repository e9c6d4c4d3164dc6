/// Frustum: six clipping planes for visibility culling.
///
/// Each plane is a Vec4 (A, B, C, D) where (A, B, C) is the unit normal
/// pointing INTO the visible volume and D the signed distance. A point P
/// is inside when `dot(N, P) + D >= 0` for all six planes.
///
/// Hosts that describe their planes with outward normals (the usual
/// "half-space to reject" convention) go through `from_outward_planes`.

use glam::{Mat4, Vec3, Vec4};
use crate::bounds::AABB;

/// Result of a 3-way frustum/AABB classification.
///
/// Drives hierarchical culling in the BVH:
/// - `Outside` → prune the subtree
/// - `Inside` → everything below is visible without further tests
/// - `Partial` → descend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrustumTest {
    /// AABB is entirely outside the frustum
    Outside,
    /// AABB is entirely inside the frustum
    Inside,
    /// AABB straddles at least one plane
    Partial,
}

/// Frustum plane indices
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// Six frustum planes, inward normals: left, right, bottom, top, near, far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub planes: [Vec4; 6],
}

impl Frustum {
    /// Build a frustum from six inward-facing planes.
    ///
    /// Planes are normalized so that distances are in world units.
    pub fn from_planes(planes: [Vec4; 6]) -> Self {
        Self { planes: planes.map(normalize_plane) }
    }

    /// Build a frustum from six outward-facing planes (normal pointing away
    /// from the visible volume, a point is inside when `dot(N, P) + D <= 0`).
    pub fn from_outward_planes(planes: [Vec4; 6]) -> Self {
        Self::from_planes(planes.map(|p| -p))
    }

    /// Frustum whose six planes are the faces of an axis-aligned box.
    ///
    /// Used for box selection and region queries through the same
    /// visibility path as camera frusta.
    pub fn from_box(aabb: &AABB) -> Self {
        Self::from_planes([
            Vec4::new(1.0, 0.0, 0.0, -aabb.min.x),
            Vec4::new(-1.0, 0.0, 0.0, aabb.max.x),
            Vec4::new(0.0, 1.0, 0.0, -aabb.min.y),
            Vec4::new(0.0, -1.0, 0.0, aabb.max.y),
            Vec4::new(0.0, 0.0, 1.0, -aabb.min.z),
            Vec4::new(0.0, 0.0, -1.0, aabb.max.z),
        ])
    }

    /// Extract frustum planes from a view-projection matrix.
    ///
    /// Gribb & Hartmann: each plane is a sum or difference of the fourth
    /// row with one of the first three. Works for perspective and
    /// orthographic projections with a [0, 1] or [-1, 1] depth range
    /// (the near plane is conservative for [0, 1]).
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let row = |i: usize| vp.row(i);
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));

        Self::from_planes([
            r3 + r0, // left
            r3 - r0, // right
            r3 + r1, // bottom
            r3 - r1, // top
            r3 + r2, // near
            r3 - r2, // far
        ])
    }

    /// Signed distance of a point to a plane (positive = visible side).
    #[inline]
    fn signed_distance(plane: &Vec4, point: Vec3) -> f32 {
        plane.truncate().dot(point) + plane.w
    }

    /// Test if a point is inside the frustum (boundary included).
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|plane| Self::signed_distance(plane, point) >= 0.0)
    }

    /// Test if an AABB intersects or lies inside this frustum.
    ///
    /// "Positive vertex" test: for each plane, take the corner furthest
    /// along the normal; if it is behind the plane the whole box is.
    /// Conservative: may report boxes near frustum corners as visible,
    /// never reports a visible box as culled.
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        self.planes.iter().all(|plane| {
            Self::signed_distance(plane, positive_vertex(plane, aabb)) >= 0.0
        })
    }

    /// Test if an AABB lies entirely inside the frustum.
    pub fn contains_aabb(&self, aabb: &AABB) -> bool {
        self.classify_aabb(aabb) == FrustumTest::Inside
    }

    /// Classify an AABB against the frustum (3-way test).
    ///
    /// - p-vertex outside any plane → `Outside` (early out)
    /// - n-vertex outside any plane → at least `Partial`
    /// - otherwise → `Inside`
    pub fn classify_aabb(&self, aabb: &AABB) -> FrustumTest {
        let mut all_inside = true;

        for plane in &self.planes {
            if Self::signed_distance(plane, positive_vertex(plane, aabb)) < 0.0 {
                return FrustumTest::Outside;
            }
            if Self::signed_distance(plane, negative_vertex(plane, aabb)) < 0.0 {
                all_inside = false;
            }
        }

        if all_inside { FrustumTest::Inside } else { FrustumTest::Partial }
    }
}

fn normalize_plane(plane: Vec4) -> Vec4 {
    let normal_len = plane.truncate().length();
    if normal_len > 0.0 { plane / normal_len } else { plane }
}

/// Corner of `aabb` furthest along the plane normal.
#[inline]
fn positive_vertex(plane: &Vec4, aabb: &AABB) -> Vec3 {
    Vec3::select(plane.truncate().cmpge(Vec3::ZERO), aabb.max, aabb.min)
}

/// Corner of `aabb` furthest against the plane normal.
#[inline]
fn negative_vertex(plane: &Vec4, aabb: &AABB) -> Vec3 {
    Vec3::select(plane.truncate().cmpge(Vec3::ZERO), aabb.min, aabb.max)
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
