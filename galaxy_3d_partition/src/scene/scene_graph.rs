/// Collaborator traits between the partition and the host scene.
///
/// The partition never owns scene objects. It asks the scene graph for
/// fresh bounds when a dirty key is processed, and asks the hit tester
/// for exact distances when a ray reaches a leaf candidate.

use crate::bounds::{AABB, Ray};
use super::primitive::{ActorKey, PrimitiveKey};

/// Narrow-phase picking collaborator.
///
/// Invoked only on ray-query leaf candidates whose box was hit.
pub trait HitTester {
    /// Whether the primitive can be picked at all (owner alive, not hidden).
    fn is_pickable(&self, _key: PrimitiveKey) -> bool {
        true
    }

    /// Exact hit distance along `ray`, or `None` on a miss.
    fn hit_test(&self, key: PrimitiveKey, ray: &Ray) -> Option<f32>;
}

impl<F> HitTester for F
where
    F: Fn(PrimitiveKey, &Ray) -> Option<f32>,
{
    fn hit_test(&self, key: PrimitiveKey, ray: &Ray) -> Option<f32> {
        self(key, ray)
    }
}

/// Scene-graph / transform collaborator.
pub trait SceneGraph: HitTester {
    /// Current world-space bound of a primitive.
    ///
    /// Returns `None` for a stale or null key; the partition then drops
    /// the key instead of keeping a bound for a destroyed object.
    fn world_bound(&self, key: PrimitiveKey) -> Option<AABB>;

    /// Owning actor, `None` for a stale key.
    fn owner(&self, key: PrimitiveKey) -> Option<ActorKey>;

    /// Capability tag: only indexable primitives enter the partition.
    fn is_indexable(&self, key: PrimitiveKey) -> bool;

    /// Primitives of an actor (empty for a stale actor).
    fn actor_primitives(&self, actor: ActorKey) -> Vec<PrimitiveKey>;
}
