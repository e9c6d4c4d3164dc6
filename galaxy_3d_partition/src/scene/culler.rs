/// Frustum culling strategies.
///
/// A culler decides which primitives are visible for a frustum and
/// writes the result into the scene's visibility flags. Implementations
/// range from a linear scan to a spatial index query (BVH).

use crate::camera::Frustum;
use super::primitive::PrimitiveKey;
use super::scene::Scene;
use super::scene_index::SceneIndex;

/// Strategy for determining visible primitives from a frustum.
///
/// Called once per frame. Every primitive is reset to not visible, then
/// the returned keys are flagged visible.
///
/// `&mut self` allows stateful implementations (e.g. caching)
/// to maintain state across frames.
pub trait Culler: Send + Sync {
    /// Cull the scene against the frustum and return visible primitives.
    fn cull(
        &mut self,
        scene: &mut Scene,
        frustum: &Frustum,
        scene_index: Option<&dyn SceneIndex>,
    ) -> Vec<PrimitiveKey>;
}

/// Brute-force culler: tests every indexable primitive's world AABB.
///
/// O(n) per frame. Ignores the SceneIndex entirely, which makes it the
/// baseline the indexed path is checked against.
#[derive(Debug, Default)]
pub struct BruteForceCuller;

impl BruteForceCuller {
    pub fn new() -> Self {
        Self
    }
}

impl Culler for BruteForceCuller {
    fn cull(
        &mut self,
        scene: &mut Scene,
        frustum: &Frustum,
        _scene_index: Option<&dyn SceneIndex>,
    ) -> Vec<PrimitiveKey> {
        let visible = scan(scene, frustum);
        scene.reset_visibility();
        scene.apply_visibility(&visible);
        visible
    }
}

/// Frustum culler backed by a SceneIndex.
///
/// With a SceneIndex: hierarchical query, keys the scene no longer knows
/// are dropped. Without: same linear scan as BruteForceCuller.
#[derive(Debug, Default)]
pub struct FrustumCuller;

impl FrustumCuller {
    pub fn new() -> Self {
        Self
    }
}

impl Culler for FrustumCuller {
    fn cull(
        &mut self,
        scene: &mut Scene,
        frustum: &Frustum,
        scene_index: Option<&dyn SceneIndex>,
    ) -> Vec<PrimitiveKey> {
        let visible = match scene_index {
            Some(idx) => {
                let mut results = Vec::new();
                idx.query_frustum(frustum, &mut results);
                results.retain(|&key| scene.primitive(key).is_some());
                results
            }
            None => scan(scene, frustum),
        };

        scene.reset_visibility();
        scene.apply_visibility(&visible);
        visible
    }
}

fn scan(scene: &Scene, frustum: &Frustum) -> Vec<PrimitiveKey> {
    scene
        .primitives()
        .filter(|(_, prim)| prim.is_indexable())
        .filter_map(|(key, prim)| {
            frustum.intersects_aabb(&prim.world_bounds()).then_some(key)
        })
        .collect()
}

#[cfg(test)]
#[path = "culler_tests.rs"]
mod tests;
