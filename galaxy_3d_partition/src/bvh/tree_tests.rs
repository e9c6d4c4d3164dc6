use super::*;
use crate::bvh::BvhBuilder;
use slotmap::SlotMap;

fn make_keys(count: usize) -> Vec<PrimitiveKey> {
    let mut map = SlotMap::<PrimitiveKey, ()>::with_key();
    (0..count).map(|_| map.insert(())).collect()
}

fn row_of_cubes(count: usize, leaf_size: usize) -> BvhTree {
    let keys = make_keys(count);
    BvhBuilder::new(leaf_size).build(keys.into_iter().enumerate().map(|(i, key)| {
        (key, AABB::from_center_extent(Vec3::new(i as f32 * 2.0, 0.0, 0.0), Vec3::splat(0.5)))
    }))
}

#[test]
fn test_empty_tree() {
    let tree = BvhTree::default();
    assert!(tree.is_empty());
    assert!(tree.root().is_none());
    assert!(tree.debug_lines().is_empty());
    assert!(tree.debug_vertices().is_empty());
    assert_eq!(tree.stats().max_depth, 0);
}

#[test]
fn test_stats_single_leaf() {
    let tree = row_of_cubes(4, 8);
    assert_eq!(
        tree.stats(),
        BvhStats { node_count: 1, leaf_count: 1, object_count: 4, max_depth: 1 },
    );
}

#[test]
fn test_leaf_primitives_of_internal_node_is_empty() {
    let tree = row_of_cubes(4, 1);
    let root = tree.root().unwrap();
    assert!(!root.is_leaf());
    assert!(tree.leaf_primitives(root).is_empty());
}

#[test]
fn test_leaf_primitives_of_foreign_node_is_empty() {
    let large = row_of_cubes(16, 4);
    let small = row_of_cubes(2, 4);
    let last_leaf = large.nodes().iter().rev().find(|node| node.is_leaf()).unwrap();
    assert_eq!(large.leaf_primitives(last_leaf).len(), 4);
    assert!(small.leaf_primitives(last_leaf).is_empty());

    let bogus = BvhNode {
        bounds: AABB::default(),
        kind: BvhNodeKind::Leaf { first: usize::MAX, count: 2 },
    };
    assert!(large.leaf_primitives(&bogus).is_empty());
}

#[test]
fn test_debug_lines_twelve_edges_per_node() {
    let tree = row_of_cubes(4, 1);
    let lines = tree.debug_lines();
    assert_eq!(lines.len(), tree.node_count() * 12);

    // Root is internal, its wireframe comes first
    assert!(lines[..12].iter().all(|line| line.color == INTERNAL_COLOR));
    let leaf_lines = lines.iter().filter(|line| line.color == LEAF_COLOR).count();
    assert_eq!(leaf_lines, 4 * 12);
}

#[test]
fn test_debug_lines_are_axis_aligned_box_edges() {
    let tree = row_of_cubes(1, 8);
    let bounds = tree.root().unwrap().bounds;
    let size = bounds.size();

    for line in tree.debug_lines() {
        let delta = (line.end - line.start).abs();
        let changed = delta.cmpgt(Vec3::ZERO).bitmask().count_ones();
        assert_eq!(changed, 1);
        assert!(bounds.contains_point(line.start) && bounds.contains_point(line.end));
        assert!(delta == Vec3::new(size.x, 0.0, 0.0)
            || delta == Vec3::new(0.0, size.y, 0.0)
            || delta == Vec3::new(0.0, 0.0, size.z));
    }
}

#[test]
fn test_debug_vertices_are_line_pairs() {
    let tree = row_of_cubes(3, 1);
    let lines = tree.debug_lines();
    let vertices = tree.debug_vertices();

    assert_eq!(vertices.len(), lines.len() * 2);
    assert_eq!(vertices[0].position, lines[0].start.to_array());
    assert_eq!(vertices[1].position, lines[0].end.to_array());
    assert_eq!(vertices[1].color, lines[0].color.to_array());

    let bytes: &[u8] = bytemuck::cast_slice(&vertices);
    assert_eq!(bytes.len(), vertices.len() * std::mem::size_of::<DebugVertex>());
    assert_eq!(std::mem::size_of::<DebugVertex>(), 28);
}

#[test]
fn test_debug_dump_does_not_panic() {
    row_of_cubes(5, 2).debug_dump();
    BvhTree::default().debug_dump();
}
