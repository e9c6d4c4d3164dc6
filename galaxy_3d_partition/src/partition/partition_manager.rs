/// PartitionManager: world-owned facade over the BVH scene index.
///
/// Lifecycle of an object:
/// - `register` puts its current bound in the pending table and queues it;
/// - `mark_dirty` queues it again after a transform change;
/// - `update` refreshes up to `budget` queued bounds from the scene graph
///   and rebuilds the tree once if anything was processed;
/// - `unregister` removes it and rebuilds immediately.
///
/// Queries only see the last built tree.

use slotmap::Key;
use crate::bounds::{AABB, Ray};
use crate::bvh::{BvhConfig, BvhSceneIndex, BvhStats, DebugLine, DebugVertex};
use crate::camera::Frustum;
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::scene::{ActorKey, HitTester, PrimitiveKey, RayHit, SceneGraph};
use super::dirty_tracker::DirtyTracker;

const LOG_SOURCE: &str = "galaxy3d::PartitionManager";

/// Default number of dirty keys processed per `update`.
pub const DEFAULT_UPDATE_BUDGET: usize = 256;

/// Configuration of a `PartitionManager`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionConfig {
    pub bvh: BvhConfig,
    /// Dirty keys processed by `update_default` (>= 1)
    pub update_budget: usize,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            bvh: BvhConfig::default(),
            update_budget: DEFAULT_UPDATE_BUDGET,
        }
    }
}

impl PartitionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.update_budget == 0 {
            return Err(Engine::log_and_return_error(
                "galaxy3d::Config",
                Error::InvalidConfig("update_budget must be at least 1".to_string()),
            ));
        }
        self.bvh.validate()
    }
}

/// Outcome of one `update` tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateStats {
    /// Keys popped from the dirty queue
    pub processed: usize,
    /// Processed keys whose primitive no longer exists
    pub dropped_stale: usize,
    /// Keys still queued after the tick
    pub remaining: usize,
    pub rebuilt: bool,
}

/// Spatial partition of one world.
#[derive(Debug, Clone, Default)]
pub struct PartitionManager {
    config: PartitionConfig,
    index: BvhSceneIndex,
    dirty: DirtyTracker,
}

impl PartitionManager {
    /// Create an empty partition. Fails if the configuration is invalid.
    pub fn new(config: PartitionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            index: BvhSceneIndex::new(config.bvh)?,
            dirty: DirtyTracker::new(),
        })
    }

    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    // ===== REGISTRATION =====

    /// Index a primitive at its current world bound and queue it.
    ///
    /// It becomes queryable after the next `update` that processes it or
    /// after `flush_rebuild`. Returns false for null, stale or
    /// non-indexable keys.
    pub fn register<S: SceneGraph + ?Sized>(&mut self, scene: &S, key: PrimitiveKey) -> bool {
        if key.is_null() || !scene.is_indexable(key) {
            return false;
        }
        let Some(bounds) = scene.world_bound(key) else {
            return false;
        };
        self.register_with_bound(key, bounds)
    }

    /// Index a key with an explicit bound, bypassing the scene graph.
    pub fn register_with_bound(&mut self, key: PrimitiveKey, bounds: AABB) -> bool {
        if key.is_null() {
            return false;
        }
        self.index.insert(key, bounds);
        self.dirty.mark(key);
        true
    }

    /// Register every indexable primitive of an actor. Returns how many.
    pub fn register_actor<S: SceneGraph + ?Sized>(&mut self, scene: &S, actor: ActorKey) -> usize {
        scene
            .actor_primitives(actor)
            .into_iter()
            .filter(|&key| self.register(scene, key))
            .count()
    }

    /// Index every indexable primitive of `actors` and rebuild at once.
    ///
    /// The registered keys leave the dirty queue: they are already in
    /// the tree when this returns.
    pub fn bulk_register<S: SceneGraph + ?Sized>(&mut self, scene: &S, actors: &[ActorKey]) -> usize {
        let mut items = Vec::new();
        for &actor in actors {
            for key in scene.actor_primitives(actor) {
                if key.is_null() || !scene.is_indexable(key) {
                    continue;
                }
                if let Some(bounds) = scene.world_bound(key) {
                    self.dirty.remove(key);
                    items.push((key, bounds));
                }
            }
        }

        let registered = self.index.bulk_insert(items);
        crate::engine_debug!(
            LOG_SOURCE,
            "Bulk registered {} primitives from {} actors",
            registered, actors.len(),
        );
        registered
    }

    /// Remove a primitive and rebuild synchronously.
    ///
    /// Returns false (and does not rebuild) if the key was not indexed.
    pub fn unregister(&mut self, key: PrimitiveKey) -> bool {
        if key.is_null() {
            return false;
        }
        self.dirty.remove(key);
        if !self.index.remove(key) {
            return false;
        }
        self.index.rebuild();
        true
    }

    /// Remove several primitives with a single rebuild. Returns how many
    /// were indexed.
    pub fn unregister_many(&mut self, keys: &[PrimitiveKey]) -> usize {
        let mut removed = 0;
        for &key in keys {
            self.dirty.remove(key);
            if self.index.remove(key) {
                removed += 1;
            }
        }
        if removed > 0 {
            self.index.rebuild();
        }
        removed
    }

    /// Remove every primitive of a live actor with a single rebuild.
    ///
    /// Call before removing the actor from the scene, or pass the keys
    /// returned by the removal to `unregister_many`.
    pub fn unregister_actor<S: SceneGraph + ?Sized>(&mut self, scene: &S, actor: ActorKey) -> usize {
        self.unregister_many(&scene.actor_primitives(actor))
    }

    // ===== DIRTY TRACKING =====

    /// Queue a primitive for a bound refresh on a later `update`.
    ///
    /// No-op for null, already queued or non-indexable keys.
    pub fn mark_dirty<S: SceneGraph + ?Sized>(&mut self, scene: &S, key: PrimitiveKey) -> bool {
        if key.is_null() || !scene.is_indexable(key) {
            return false;
        }
        self.dirty.mark(key)
    }

    /// Queue every primitive of an actor. Returns how many were newly queued.
    pub fn mark_actor_dirty<S: SceneGraph + ?Sized>(&mut self, scene: &S, actor: ActorKey) -> usize {
        scene
            .actor_primitives(actor)
            .into_iter()
            .filter(|&key| self.mark_dirty(scene, key))
            .count()
    }

    /// Process up to `budget` dirty keys, then rebuild once if any were.
    ///
    /// Each key gets its bound refreshed from the scene graph. A key whose
    /// primitive is gone is dropped from the index instead.
    pub fn update<S: SceneGraph + ?Sized>(&mut self, scene: &S, budget: usize) -> UpdateStats {
        let mut stats = UpdateStats::default();

        while stats.processed < budget {
            let Some(key) = self.dirty.pop() else {
                break;
            };
            stats.processed += 1;

            match scene.world_bound(key) {
                Some(bounds) => self.index.insert(key, bounds),
                None => {
                    self.index.remove(key);
                    stats.dropped_stale += 1;
                    crate::engine_warn!(LOG_SOURCE, "Dropped stale primitive {:?}", key);
                }
            }
        }

        if stats.processed > 0 {
            self.index.rebuild();
            stats.rebuilt = true;
        }
        stats.remaining = self.dirty.len();

        crate::engine_trace!(
            LOG_SOURCE,
            "Update: {} processed, {} stale, {} remaining",
            stats.processed, stats.dropped_stale, stats.remaining,
        );
        stats
    }

    /// `update` with the configured budget.
    pub fn update_default<S: SceneGraph + ?Sized>(&mut self, scene: &S) -> UpdateStats {
        self.update(scene, self.config.update_budget)
    }

    /// Rebuild now if the pending table changed. Queued keys stay queued.
    pub fn flush_rebuild(&mut self) -> bool {
        self.index.flush_rebuild()
    }

    // ===== QUERIES =====

    /// Append every indexed primitive intersecting the frustum.
    pub fn frustum_query(&self, frustum: &Frustum, results: &mut Vec<PrimitiveKey>) {
        self.index.query_frustum(frustum, results);
    }

    /// Closest primitive along `ray` accepted by `tester`.
    pub fn ray_query_closest(&self, ray: &Ray, tester: &dyn HitTester) -> Option<RayHit> {
        self.index.query_ray_closest(ray, tester)
    }

    /// Drop every indexed object, queued key and the tree. Idempotent.
    pub fn clear(&mut self) {
        self.index.clear();
        self.dirty.clear();
    }

    // ===== INTROSPECTION =====

    pub fn index(&self) -> &BvhSceneIndex {
        &self.index
    }

    pub fn node_count(&self) -> usize {
        self.index.node_count()
    }

    /// Number of indexed objects, including those not yet in the tree.
    pub fn object_count(&self) -> usize {
        self.index.pending_count()
    }

    pub fn tree_object_count(&self) -> usize {
        self.index.tree_object_count()
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    pub fn is_dirty(&self, key: PrimitiveKey) -> bool {
        self.dirty.contains(key)
    }

    pub fn is_registered(&self, key: PrimitiveKey) -> bool {
        self.index.is_indexed(key)
    }

    pub fn global_bounds(&self) -> &AABB {
        self.index.global_bounds()
    }

    pub fn stats(&self) -> BvhStats {
        self.index.stats()
    }

    pub fn debug_dump(&self) {
        self.index.debug_dump();
    }

    pub fn debug_lines(&self) -> Vec<DebugLine> {
        self.index.debug_lines()
    }

    pub fn debug_vertices(&self) -> Vec<DebugVertex> {
        self.index.debug_vertices()
    }
}

#[cfg(test)]
#[path = "partition_manager_tests.rs"]
mod tests;
