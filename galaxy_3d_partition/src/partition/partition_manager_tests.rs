//! Tests for PartitionManager
//!
//! Registration, the budgeted update protocol, synchronous removal and
//! queries against the reference Scene.

use super::*;
use glam::{Mat4, Vec3};
use crate::bvh::RayQueryMode;
use crate::scene::{HitShape, PrimitiveFlags, Scene};

// ============================================================================
// Helper Functions
// ============================================================================

fn unit_bounds() -> AABB {
    AABB::from_center_extent(Vec3::ZERO, Vec3::splat(0.5))
}

fn see_all() -> Frustum {
    Frustum::from_box(&AABB::new(Vec3::splat(-1000.0), Vec3::splat(1000.0)))
}

/// One actor per position, each with a single unit cube primitive.
fn scene_with_cubes(positions: &[Vec3]) -> (Scene, Vec<ActorKey>, Vec<PrimitiveKey>) {
    let mut scene = Scene::new();
    let mut actors = Vec::new();
    let mut prims = Vec::new();
    for (i, &pos) in positions.iter().enumerate() {
        let actor = scene.create_actor(&format!("cube_{}", i));
        let prim = scene
            .create_primitive(actor, unit_bounds(), Mat4::from_translation(pos))
            .unwrap();
        actors.push(actor);
        prims.push(prim);
    }
    (scene, actors, prims)
}

fn three_cubes() -> (Scene, Vec<ActorKey>, Vec<PrimitiveKey>) {
    scene_with_cubes(&[
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(10.0, 0.0, 0.0),
        Vec3::new(0.0, 10.0, 0.0),
    ])
}

fn visible(manager: &PartitionManager) -> Vec<PrimitiveKey> {
    let mut results = Vec::new();
    manager.frustum_query(&see_all(), &mut results);
    results.sort();
    results
}

fn sorted(mut keys: Vec<PrimitiveKey>) -> Vec<PrimitiveKey> {
    keys.sort();
    keys
}

fn single_object_leaves() -> PartitionManager {
    PartitionManager::new(PartitionConfig {
        bvh: BvhConfig { max_objects_per_leaf: 1, ..Default::default() },
        ..Default::default()
    })
    .unwrap()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_default_config() {
    let manager = PartitionManager::default();
    assert_eq!(manager.config().update_budget, 256);
    assert_eq!(manager.config().bvh.max_objects_per_leaf, 8);
    assert_eq!(manager.object_count(), 0);
    assert_eq!(manager.node_count(), 0);
}

#[test]
fn test_zero_budget_rejected() {
    let config = PartitionConfig { update_budget: 0, ..Default::default() };
    assert!(matches!(PartitionManager::new(config), Err(Error::InvalidConfig(_))));
}

#[test]
fn test_invalid_bvh_config_rejected() {
    let config = PartitionConfig {
        bvh: BvhConfig { ray_epsilon: -1.0, ..Default::default() },
        ..Default::default()
    };
    assert!(PartitionManager::new(config).is_err());
}

// ============================================================================
// Registration and deferred inclusion
// ============================================================================

#[test]
fn test_register_is_deferred_until_update() {
    let (scene, _, prims) = three_cubes();
    let mut manager = PartitionManager::default();

    for &prim in &prims {
        assert!(manager.register(&scene, prim));
    }
    assert_eq!(manager.object_count(), 3);
    assert_eq!(manager.dirty_count(), 3);
    assert!(visible(&manager).is_empty());

    let stats = manager.update_default(&scene);
    assert_eq!(stats, UpdateStats { processed: 3, dropped_stale: 0, remaining: 0, rebuilt: true });
    assert_eq!(visible(&manager), sorted(prims));
}

#[test]
fn test_register_then_flush_rebuild() {
    let (scene, _, prims) = three_cubes();
    let mut manager = PartitionManager::default();
    manager.register(&scene, prims[0]);

    assert!(manager.flush_rebuild());
    assert_eq!(visible(&manager), vec![prims[0]]);
    assert!(manager.is_dirty(prims[0]));
    assert!(!manager.flush_rebuild());
}

#[test]
fn test_register_rejects_null_stale_and_non_indexable() {
    let (mut scene, actors, prims) = three_cubes();
    let decal = scene
        .create_primitive_with(
            actors[0], unit_bounds(), Mat4::IDENTITY, PrimitiveFlags::empty(), HitShape::Box,
        )
        .unwrap();
    scene.remove_primitive(prims[2]);
    let mut manager = PartitionManager::default();

    assert!(!manager.register(&scene, PrimitiveKey::null()));
    assert!(!manager.register(&scene, decal));
    assert!(!manager.register(&scene, prims[2]));
    assert!(!manager.register_with_bound(PrimitiveKey::null(), unit_bounds()));
    assert_eq!(manager.object_count(), 0);
    assert_eq!(manager.dirty_count(), 0);
}

#[test]
fn test_scenario_single_leaf() {
    let (scene, _, prims) = three_cubes();
    let mut manager = PartitionManager::default();
    prims.iter().for_each(|&prim| {
        manager.register(&scene, prim);
    });
    manager.update(&scene, 256);

    assert_eq!(manager.node_count(), 1);
    let root = manager.index().tree().root().unwrap();
    assert!(root.is_leaf());
    assert_eq!(
        root.bounds,
        AABB::new(Vec3::new(-0.5, -0.5, -0.5), Vec3::new(10.5, 10.5, 0.5)),
    );
}

#[test]
fn test_scenario_ray_hits_origin_cube() {
    let (scene, _, prims) = three_cubes();
    let mut manager = single_object_leaves();
    prims.iter().for_each(|&prim| {
        manager.register(&scene, prim);
    });
    manager.update_default(&scene);

    let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
    let hit = manager.ray_query_closest(&ray, &scene).unwrap();
    assert_eq!(hit.key, prims[0]);
    assert!((hit.distance - 4.5).abs() < 1e-4);
}

#[test]
fn test_register_actor_and_bulk_register() {
    let (scene, actors, prims) = three_cubes();
    let mut manager = PartitionManager::default();

    assert_eq!(manager.register_actor(&scene, actors[0]), 1);
    assert_eq!(manager.dirty_count(), 1);

    assert_eq!(manager.bulk_register(&scene, &actors), 3);
    assert_eq!(manager.dirty_count(), 0);
    assert_eq!(manager.tree_object_count(), 3);
    assert_eq!(visible(&manager), sorted(prims));
}

#[test]
fn test_bulk_register_unknown_actor() {
    let (scene, _, _) = three_cubes();
    let mut manager = PartitionManager::default();
    assert_eq!(manager.bulk_register(&scene, &[ActorKey::null()]), 0);
    assert_eq!(manager.node_count(), 0);
}

// ============================================================================
// Budgeted update
// ============================================================================

#[test]
fn test_update_respects_budget() {
    let positions: Vec<Vec3> = (0..10).map(|i| Vec3::new(i as f32 * 2.0, 0.0, 0.0)).collect();
    let (scene, _, prims) = scene_with_cubes(&positions);
    let mut manager = PartitionManager::default();
    prims.iter().for_each(|&prim| {
        manager.register(&scene, prim);
    });

    let stats = manager.update(&scene, 4);
    assert_eq!(stats.processed, 4);
    assert_eq!(stats.remaining, 6);
    assert!(stats.rebuilt);

    // Every registered object is already in the pending table, so the
    // rebuild covers all of them
    assert_eq!(manager.tree_object_count(), 10);

    manager.update(&scene, 4);
    let stats = manager.update(&scene, 4);
    assert_eq!(stats.processed, 2);
    assert_eq!(stats.remaining, 0);

    let stats = manager.update(&scene, 4);
    assert_eq!(stats, UpdateStats::default());
}

#[test]
fn test_zero_budget_processes_nothing() {
    let (scene, _, prims) = three_cubes();
    let mut manager = PartitionManager::default();
    manager.register(&scene, prims[0]);

    let stats = manager.update(&scene, 0);
    assert_eq!(stats.processed, 0);
    assert!(!stats.rebuilt);
    assert_eq!(stats.remaining, 1);
    assert!(visible(&manager).is_empty());
}

#[test]
fn test_mark_dirty_refreshes_bound_on_update() {
    let (mut scene, _, prims) = three_cubes();
    let mut manager = PartitionManager::default();
    manager.bulk_register(&scene, &scene_actors(&scene, &prims));

    scene.set_world_matrix(prims[0], Mat4::from_translation(Vec3::new(0.0, 0.0, 50.0)));
    assert!(manager.mark_dirty(&scene, prims[0]));
    assert!(!manager.mark_dirty(&scene, prims[0]));

    // Tree still holds the old bound until the tick
    assert_eq!(manager.global_bounds().max.z, 0.5);

    manager.update_default(&scene);
    assert_eq!(manager.global_bounds().max.z, 50.5);
    assert_eq!(
        manager.index().pending_bound(prims[0]).copied(),
        Some(AABB::from_center_extent(Vec3::new(0.0, 0.0, 50.0), Vec3::splat(0.5))),
    );
}

fn scene_actors(scene: &Scene, prims: &[PrimitiveKey]) -> Vec<ActorKey> {
    prims.iter().filter_map(|&prim| scene.owner(prim)).collect()
}

#[test]
fn test_mark_actor_dirty() {
    let (mut scene, actors, _) = three_cubes();
    scene.create_primitive(actors[1], unit_bounds(), Mat4::IDENTITY).unwrap();
    let mut manager = PartitionManager::default();
    manager.bulk_register(&scene, &actors);

    assert_eq!(manager.mark_actor_dirty(&scene, actors[1]), 2);
    assert_eq!(manager.mark_actor_dirty(&scene, actors[1]), 0);
    assert_eq!(manager.dirty_count(), 2);
}

#[test]
fn test_update_drops_stale_keys() {
    let (mut scene, _, prims) = three_cubes();
    let mut manager = PartitionManager::default();
    prims.iter().for_each(|&prim| {
        manager.register(&scene, prim);
    });
    scene.remove_primitive(prims[1]);

    let stats = manager.update_default(&scene);
    assert_eq!(stats.processed, 3);
    assert_eq!(stats.dropped_stale, 1);
    assert_eq!(manager.object_count(), 2);
    assert!(!manager.is_registered(prims[1]));
    assert_eq!(visible(&manager), sorted(vec![prims[0], prims[2]]));
}

// ============================================================================
// Unregister
// ============================================================================

#[test]
fn test_unregister_is_synchronous() {
    let (scene, actors, prims) = three_cubes();
    let mut manager = PartitionManager::default();
    manager.bulk_register(&scene, &actors);

    assert!(manager.unregister(prims[1]));
    assert_eq!(manager.object_count(), 2);
    assert_eq!(manager.tree_object_count(), 2);
    assert!(!visible(&manager).contains(&prims[1]));
}

#[test]
fn test_unregister_absent_key_does_not_rebuild() {
    let (scene, actors, prims) = three_cubes();
    let mut manager = PartitionManager::default();
    manager.bulk_register(&scene, &actors[..1]);
    manager.register(&scene, prims[1]);

    assert!(!manager.unregister(prims[2]));
    assert!(!manager.unregister(PrimitiveKey::null()));
    // The pending registration was not materialized by the failed call
    assert_eq!(manager.tree_object_count(), 1);
}

#[test]
fn test_unregister_removes_queued_key() {
    let (scene, _, prims) = three_cubes();
    let mut manager = PartitionManager::default();
    manager.register(&scene, prims[0]);
    manager.register(&scene, prims[1]);

    assert!(manager.unregister(prims[0]));
    assert!(!manager.is_dirty(prims[0]));
    assert_eq!(manager.dirty_count(), 1);
    assert_eq!(visible(&manager), vec![prims[1]]);
}

#[test]
fn test_unregister_actor_and_removed_keys() {
    let (mut scene, actors, prims) = three_cubes();
    let extra = scene.create_primitive(actors[0], unit_bounds(), Mat4::IDENTITY).unwrap();
    let mut manager = PartitionManager::default();
    manager.bulk_register(&scene, &actors);
    assert_eq!(manager.object_count(), 4);

    assert_eq!(manager.unregister_actor(&scene, actors[0]), 2);
    assert!(!manager.is_registered(extra));

    let removed = scene.remove_actor(actors[1]);
    assert_eq!(manager.unregister_many(&removed), 1);
    assert_eq!(visible(&manager), vec![prims[2]]);
}

#[test]
fn test_unregister_many_on_large_queue_leaves_survivors_in_order() {
    let positions: Vec<Vec3> = (0..2000).map(|i| Vec3::new(i as f32 * 2.0, 0.0, 0.0)).collect();
    let (scene, _, prims) = scene_with_cubes(&positions);
    let mut manager = PartitionManager::default();
    for &prim in &prims {
        manager.register(&scene, prim);
    }
    assert_eq!(manager.dirty_count(), 2000);

    assert_eq!(manager.unregister_many(&prims[..1990]), 1990);
    assert_eq!(manager.dirty_count(), 10);
    assert!(!manager.is_dirty(prims[0]));
    assert!(manager.is_dirty(prims[1995]));

    let stats = manager.update(&scene, 4);
    assert_eq!(stats.processed, 4);
    assert_eq!(stats.remaining, 6);
    assert!(!manager.is_dirty(prims[1993]));
    assert!(manager.is_dirty(prims[1994]));
    assert_eq!(visible(&manager), sorted(prims[1990..].to_vec()));
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn test_ray_skips_hidden_actor() {
    let (mut scene, actors, prims) = scene_with_cubes(&[
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(5.0, 0.0, 0.0),
    ]);
    let mut manager = single_object_leaves();
    manager.bulk_register(&scene, &actors);
    scene.set_actor_hidden(actors[0], true);

    let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
    let hit = manager.ray_query_closest(&ray, &scene).unwrap();
    assert_eq!(hit.key, prims[1]);
}

#[test]
fn test_first_leaf_hit_mode_through_manager() {
    let (scene, actors, prims) = three_cubes();
    let mut manager = PartitionManager::new(PartitionConfig {
        bvh: BvhConfig {
            max_objects_per_leaf: 1,
            ray_query_mode: RayQueryMode::FirstLeafHit,
            ..Default::default()
        },
        ..Default::default()
    })
    .unwrap();
    manager.bulk_register(&scene, &actors);

    let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
    assert_eq!(manager.ray_query_closest(&ray, &scene).unwrap().key, prims[0]);
}

#[test]
fn test_ray_query_on_empty_manager() {
    let (scene, _, _) = three_cubes();
    let manager = PartitionManager::default();
    let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
    assert!(manager.ray_query_closest(&ray, &scene).is_none());
}

// ============================================================================
// Clear and introspection
// ============================================================================

#[test]
fn test_clear_is_total_and_idempotent() {
    let (scene, actors, prims) = three_cubes();
    let mut manager = PartitionManager::default();
    manager.bulk_register(&scene, &actors);
    manager.mark_dirty(&scene, prims[0]);

    manager.clear();
    assert_eq!(manager.object_count(), 0);
    assert_eq!(manager.node_count(), 0);
    assert_eq!(manager.dirty_count(), 0);
    assert!(visible(&manager).is_empty());

    manager.clear();
    assert_eq!(manager.object_count(), 0);
    assert_eq!(manager.update_default(&scene), UpdateStats::default());
}

#[test]
fn test_stats_and_debug_output() {
    let (scene, actors, _) = three_cubes();
    let mut manager = single_object_leaves();
    manager.bulk_register(&scene, &actors);

    let stats = manager.stats();
    assert_eq!(stats.object_count, 3);
    assert_eq!(stats.leaf_count, 3);
    assert_eq!(manager.debug_lines().len(), stats.node_count * 12);
    assert_eq!(manager.debug_vertices().len(), stats.node_count * 24);
    manager.debug_dump();
}
