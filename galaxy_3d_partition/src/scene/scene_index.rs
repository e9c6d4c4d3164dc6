/// Spatial acceleration structures for scene queries.
///
/// A SceneIndex indexes primitives by their world-space AABB for frustum
/// culling and ray picking. Insertions are deferred: they land in a
/// pending table and become queryable after `flush_rebuild`.
///
/// Ownership: the caller creates and owns the SceneIndex and passes it
/// by reference to whoever needs to query it.

use crate::bounds::{AABB, Ray};
use crate::camera::Frustum;
use super::primitive::PrimitiveKey;
use super::scene_graph::HitTester;

/// Closest primitive hit by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Primitive that was hit
    pub key: PrimitiveKey,
    /// Distance along the ray, in units of the ray direction
    pub distance: f32,
}

/// Trait for spatial indexing of scene primitives.
pub trait SceneIndex: Send + Sync {
    /// Insert or overwrite a primitive with its world-space AABB.
    fn insert(&mut self, key: PrimitiveKey, world_aabb: &AABB);

    /// Remove a primitive. Returns false if it was not indexed.
    fn remove(&mut self, key: PrimitiveKey) -> bool;

    /// Update a primitive's world-space AABB (e.g. after a transform change).
    fn update(&mut self, key: PrimitiveKey, world_aabb: &AABB);

    /// Materialize pending changes. Returns true if a rebuild ran.
    fn flush_rebuild(&mut self) -> bool;

    /// Query all primitives whose world AABB intersects the frustum.
    /// Results are appended to `results`.
    fn query_frustum(&self, frustum: &Frustum, results: &mut Vec<PrimitiveKey>);

    /// Closest primitive accepted by `tester` along `ray`.
    fn query_ray_closest(&self, ray: &Ray, tester: &dyn HitTester) -> Option<RayHit>;

    /// Remove all primitives from the index.
    fn clear(&mut self);

    /// Number of primitives in the pending table.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
