/// Scene: reference scene graph for the spatial partition.
///
/// Uses SlotMaps for O(1) insert/remove with stable generational keys.
/// Implements `SceneGraph` and `HitTester`, so it can drive a
/// `PartitionManager` directly; hosts with their own scene graph
/// implement those traits instead.

use glam::Mat4;
use slotmap::SlotMap;
use crate::bounds::{AABB, Ray};
use super::primitive::{
    Actor, ActorKey, HitShape, Primitive, PrimitiveFlags, PrimitiveKey,
};
use super::scene_graph::{HitTester, SceneGraph};

/// A collection of actors and their primitives.
#[derive(Debug, Default)]
pub struct Scene {
    actors: SlotMap<ActorKey, Actor>,
    primitives: SlotMap<PrimitiveKey, Primitive>,
}

impl Scene {
    /// Create a new empty scene
    pub fn new() -> Self {
        Self::default()
    }

    // ===== ACTORS =====

    /// Create an empty, visible actor.
    pub fn create_actor(&mut self, name: &str) -> ActorKey {
        self.actors.insert(Actor::new(name))
    }

    /// Remove an actor and all its primitives.
    ///
    /// Returns the removed primitive keys (empty if the actor was invalid)
    /// so the caller can unregister them from its partition.
    pub fn remove_actor(&mut self, key: ActorKey) -> Vec<PrimitiveKey> {
        let Some(actor) = self.actors.remove(key) else {
            return Vec::new();
        };
        for &prim in actor.primitives() {
            self.primitives.remove(prim);
        }
        actor.primitives().to_vec()
    }

    pub fn actor(&self, key: ActorKey) -> Option<&Actor> {
        self.actors.get(key)
    }

    /// Hide or show an actor. Returns false if the key is invalid.
    pub fn set_actor_hidden(&mut self, key: ActorKey, hidden: bool) -> bool {
        match self.actors.get_mut(key) {
            Some(actor) => {
                actor.set_hidden(hidden);
                true
            }
            None => false,
        }
    }

    /// Move every primitive of an actor. Returns the primitives touched.
    pub fn set_actor_world_matrix(&mut self, key: ActorKey, matrix: Mat4) -> Vec<PrimitiveKey> {
        let keys = self.actor_primitives(key);
        for &prim in &keys {
            self.set_world_matrix(prim, matrix);
        }
        keys
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    // ===== PRIMITIVES =====

    /// Create an indexable box-shaped primitive owned by `owner`.
    ///
    /// Returns `None` if the owner is invalid.
    pub fn create_primitive(
        &mut self,
        owner: ActorKey,
        local_bounds: AABB,
        world_matrix: Mat4,
    ) -> Option<PrimitiveKey> {
        self.create_primitive_with(
            owner, local_bounds, world_matrix, PrimitiveFlags::INDEXABLE, HitShape::Box,
        )
    }

    /// Create a primitive with explicit flags and hit shape.
    pub fn create_primitive_with(
        &mut self,
        owner: ActorKey,
        local_bounds: AABB,
        world_matrix: Mat4,
        flags: PrimitiveFlags,
        hit_shape: HitShape,
    ) -> Option<PrimitiveKey> {
        let actor = self.actors.get_mut(owner)?;
        let key = self.primitives.insert(Primitive::new(
            owner, local_bounds, world_matrix, flags, hit_shape,
        ));
        actor.primitives_mut().push(key);
        Some(key)
    }

    /// Remove a primitive. Returns false if the key is invalid.
    pub fn remove_primitive(&mut self, key: PrimitiveKey) -> bool {
        let Some(prim) = self.primitives.remove(key) else {
            return false;
        };
        if let Some(actor) = self.actors.get_mut(prim.owner()) {
            actor.primitives_mut().retain(|&k| k != key);
        }
        true
    }

    pub fn primitive(&self, key: PrimitiveKey) -> Option<&Primitive> {
        self.primitives.get(key)
    }

    /// Set the world matrix of a primitive. Returns false if key is invalid.
    pub fn set_world_matrix(&mut self, key: PrimitiveKey, matrix: Mat4) -> bool {
        match self.primitives.get_mut(key) {
            Some(prim) => {
                prim.set_world_matrix(matrix);
                true
            }
            None => false,
        }
    }

    /// Iterate over all primitive keys.
    pub fn primitive_keys(&self) -> impl Iterator<Item = PrimitiveKey> + '_ {
        self.primitives.keys()
    }

    /// Iterate over all primitives (key, primitive).
    pub fn primitives(&self) -> impl Iterator<Item = (PrimitiveKey, &Primitive)> {
        self.primitives.iter()
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    // ===== VISIBILITY =====

    /// Mark every primitive as culled. Called once per frame before culling.
    pub fn reset_visibility(&mut self) {
        for (_, prim) in self.primitives.iter_mut() {
            prim.flags_mut().remove(PrimitiveFlags::VISIBLE);
        }
    }

    /// Mark the given primitives visible. Stale keys are ignored.
    pub fn apply_visibility(&mut self, visible: &[PrimitiveKey]) {
        for &key in visible {
            if let Some(prim) = self.primitives.get_mut(key) {
                prim.flags_mut().insert(PrimitiveFlags::VISIBLE);
            }
        }
    }

    pub fn is_visible(&self, key: PrimitiveKey) -> bool {
        self.primitives.get(key).is_some_and(Primitive::is_visible)
    }

    /// Keys of primitives currently flagged visible.
    pub fn visible_primitives(&self) -> impl Iterator<Item = PrimitiveKey> + '_ {
        self.primitives
            .iter()
            .filter(|(_, prim)| prim.is_visible())
            .map(|(key, _)| key)
    }

    /// Remove all actors and primitives
    pub fn clear(&mut self) {
        self.primitives.clear();
        self.actors.clear();
    }
}

// ===== COLLABORATOR TRAITS =====

impl HitTester for Scene {
    fn is_pickable(&self, key: PrimitiveKey) -> bool {
        self.primitives
            .get(key)
            .and_then(|prim| self.actors.get(prim.owner()))
            .is_some_and(|actor| !actor.is_hidden())
    }

    fn hit_test(&self, key: PrimitiveKey, ray: &Ray) -> Option<f32> {
        let prim = self.primitives.get(key)?;
        prim.hit_shape().hit_distance(&prim.world_bounds(), ray)
    }
}

impl SceneGraph for Scene {
    fn world_bound(&self, key: PrimitiveKey) -> Option<AABB> {
        self.primitives.get(key).map(Primitive::world_bounds)
    }

    fn owner(&self, key: PrimitiveKey) -> Option<ActorKey> {
        self.primitives.get(key).map(Primitive::owner)
    }

    fn is_indexable(&self, key: PrimitiveKey) -> bool {
        self.primitives.get(key).is_some_and(Primitive::is_indexable)
    }

    fn actor_primitives(&self, actor: ActorKey) -> Vec<PrimitiveKey> {
        self.actors
            .get(actor)
            .map(|a| a.primitives().to_vec())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
