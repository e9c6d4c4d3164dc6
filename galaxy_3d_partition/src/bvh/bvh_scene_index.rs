/// BvhSceneIndex: deferred-rebuild BVH implementing `SceneIndex`.
///
/// Two layers:
/// - a pending-bound table (`FxHashMap<PrimitiveKey, AABB>`), the set of
///   indexed objects, mutated immediately by insert/remove;
/// - a flat `BvhTree` built from a snapshot of that table, the only thing
///   queries look at.
///
/// Mutations raise a pending-rebuild flag; `flush_rebuild` (or `rebuild`)
/// materializes the table into a new tree and swaps it in.

use rustc_hash::FxHashMap;
use slotmap::Key;
use crate::bounds::{AABB, Ray};
use crate::camera::Frustum;
use crate::error::Result;
use crate::scene::{HitTester, PrimitiveKey, RayHit, SceneIndex};
use super::builder::BvhBuilder;
use super::config::BvhConfig;
use super::tree::{BvhStats, BvhTree, DebugLine, DebugVertex};

/// Rebuild-from-scratch bounding volume hierarchy.
#[derive(Debug, Clone)]
pub struct BvhSceneIndex {
    config: BvhConfig,
    /// Last known world bound of every indexed object
    pending: FxHashMap<PrimitiveKey, AABB>,
    tree: BvhTree,
    /// The pending table changed since the tree was last built
    rebuild_pending: bool,
}

impl BvhSceneIndex {
    /// Create an empty index. Fails if the configuration is invalid.
    pub fn new(config: BvhConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: BvhConfig) -> Self {
        Self {
            config,
            pending: FxHashMap::default(),
            tree: BvhTree::default(),
            rebuild_pending: false,
        }
    }

    pub fn config(&self) -> &BvhConfig {
        &self.config
    }

    // ===== PENDING TABLE =====

    /// Insert or overwrite the bound of `key`. Not queryable until the
    /// next rebuild. Null keys are ignored.
    pub fn insert(&mut self, key: PrimitiveKey, bounds: AABB) {
        if key.is_null() {
            return;
        }
        self.pending.insert(key, bounds);
        self.rebuild_pending = true;
    }

    /// Drop `key` from the pending table. Returns false if it was absent.
    ///
    /// The tree still contains the key until the next rebuild.
    pub fn remove(&mut self, key: PrimitiveKey) -> bool {
        if self.pending.remove(&key).is_none() {
            return false;
        }
        self.rebuild_pending = true;
        true
    }

    /// Upsert every item and rebuild once. Returns how many were inserted.
    pub fn bulk_insert<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = (PrimitiveKey, AABB)>,
    {
        let mut inserted = 0;
        for (key, bounds) in items {
            if key.is_null() {
                continue;
            }
            self.pending.insert(key, bounds);
            inserted += 1;
        }
        self.rebuild();
        inserted
    }

    /// Cached bound of `key`, if indexed.
    pub fn pending_bound(&self, key: PrimitiveKey) -> Option<&AABB> {
        self.pending.get(&key)
    }

    pub fn is_indexed(&self, key: PrimitiveKey) -> bool {
        self.pending.contains_key(&key)
    }

    /// Number of indexed objects (pending table size).
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    // ===== TREE =====

    /// Rebuild the tree from the pending table, unconditionally.
    pub fn rebuild(&mut self) {
        let builder = BvhBuilder::new(self.config.max_objects_per_leaf);
        self.tree = builder.build(self.pending.iter().map(|(&key, &bounds)| (key, bounds)));
        self.rebuild_pending = false;

        crate::engine_debug!(
            "galaxy3d::Bvh",
            "Rebuilt BVH: {} objects, {} nodes",
            self.tree.object_count(), self.tree.node_count(),
        );
    }

    /// Rebuild if the pending table changed. Returns true if a rebuild ran.
    pub fn flush_rebuild(&mut self) -> bool {
        if !self.rebuild_pending {
            return false;
        }
        self.rebuild();
        true
    }

    pub fn is_rebuild_pending(&self) -> bool {
        self.rebuild_pending
    }

    pub fn tree(&self) -> &BvhTree {
        &self.tree
    }

    pub fn node_count(&self) -> usize {
        self.tree.node_count()
    }

    /// Objects present in the current tree (may lag the pending table).
    pub fn tree_object_count(&self) -> usize {
        self.tree.object_count()
    }

    /// Global bound of the current tree.
    pub fn global_bounds(&self) -> &AABB {
        self.tree.bounds()
    }

    /// Whether `bounds` lies inside the global bound of a non-empty tree.
    pub fn contains(&self, bounds: &AABB) -> bool {
        !self.tree.is_empty() && self.tree.bounds().contains(bounds)
    }

    pub fn stats(&self) -> BvhStats {
        self.tree.stats()
    }

    pub fn debug_dump(&self) {
        self.tree.debug_dump();
    }

    pub fn debug_lines(&self) -> Vec<DebugLine> {
        self.tree.debug_lines()
    }

    pub fn debug_vertices(&self) -> Vec<DebugVertex> {
        self.tree.debug_vertices()
    }

    // ===== QUERIES =====

    pub fn query_frustum(&self, frustum: &Frustum, results: &mut Vec<PrimitiveKey>) {
        self.tree.query_frustum(frustum, results);
    }

    pub fn query_ray_closest(&self, ray: &Ray, tester: &dyn HitTester) -> Option<RayHit> {
        self.tree.query_ray_closest(
            ray, tester, self.config.ray_epsilon, self.config.ray_query_mode,
        )
    }

    /// Drop every object and the tree. Idempotent.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.tree = BvhTree::default();
        self.rebuild_pending = false;
    }
}

impl Default for BvhSceneIndex {
    fn default() -> Self {
        Self::with_valid_config(BvhConfig::default())
    }
}

impl SceneIndex for BvhSceneIndex {
    fn insert(&mut self, key: PrimitiveKey, world_aabb: &AABB) {
        BvhSceneIndex::insert(self, key, *world_aabb);
    }

    fn remove(&mut self, key: PrimitiveKey) -> bool {
        BvhSceneIndex::remove(self, key)
    }

    fn update(&mut self, key: PrimitiveKey, world_aabb: &AABB) {
        BvhSceneIndex::insert(self, key, *world_aabb);
    }

    fn flush_rebuild(&mut self) -> bool {
        BvhSceneIndex::flush_rebuild(self)
    }

    fn query_frustum(&self, frustum: &Frustum, results: &mut Vec<PrimitiveKey>) {
        BvhSceneIndex::query_frustum(self, frustum, results);
    }

    fn query_ray_closest(&self, ray: &Ray, tester: &dyn HitTester) -> Option<RayHit> {
        BvhSceneIndex::query_ray_closest(self, ray, tester)
    }

    fn clear(&mut self) {
        BvhSceneIndex::clear(self);
    }

    fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
#[path = "bvh_scene_index_tests.rs"]
mod tests;
