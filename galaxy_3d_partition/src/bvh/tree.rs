/// Flat BVH storage.
///
/// Nodes live in a single `Vec`, node 0 is the root. Leaves reference a
/// contiguous range of the Morton-sorted primitive array. A tree value is
/// immutable once built; a rebuild produces a new one.

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};
use crate::bounds::AABB;
use crate::scene::PrimitiveKey;

/// Wireframe colour of leaf nodes.
pub const LEAF_COLOR: Vec4 = Vec4::new(1.0, 0.2, 0.0, 1.0);

/// Wireframe colour of internal nodes.
pub const INTERNAL_COLOR: Vec4 = Vec4::new(1.0, 0.8, 0.0, 1.0);

/// Corner pairs (bit0 = x, bit1 = y, bit2 = z) forming the 12 box edges.
const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1), (2, 3), (4, 5), (6, 7), // along x
    (0, 2), (1, 3), (4, 6), (5, 7), // along y
    (0, 4), (1, 5), (2, 6), (3, 7), // along z
];

/// Leaf range or child links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BvhNodeKind {
    /// `count > 0` primitives starting at `first` in the sorted array
    Leaf { first: usize, count: usize },
    /// Indices of both children in the node array
    Internal { left: usize, right: usize },
}

/// A single node of the flat tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhNode {
    /// Exact union of the children (internal) or of the primitives (leaf)
    pub bounds: AABB,
    pub kind: BvhNodeKind,
}

impl BvhNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, BvhNodeKind::Leaf { .. })
    }
}

/// A primitive key with the bound snapshot the tree was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhPrimitive {
    pub key: PrimitiveKey,
    pub bounds: AABB,
}

/// Shape summary of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BvhStats {
    pub node_count: usize,
    pub leaf_count: usize,
    pub object_count: usize,
    /// Nodes on the longest root-to-leaf path (0 for an empty tree)
    pub max_depth: usize,
}

/// One wireframe segment for debug rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub start: Vec3,
    pub end: Vec3,
    pub color: Vec4,
}

/// Line-list vertex, ready for a GPU vertex buffer upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DebugVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Flat bounding volume hierarchy.
#[derive(Debug, Clone, Default)]
pub struct BvhTree {
    pub(crate) nodes: Vec<BvhNode>,
    pub(crate) primitives: Vec<BvhPrimitive>,
    pub(crate) bounds: AABB,
}

impl BvhTree {
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// Primitives in Morton order.
    pub fn primitives(&self) -> &[BvhPrimitive] {
        &self.primitives
    }

    /// Global bound the tree was built against (zero box when empty).
    pub fn bounds(&self) -> &AABB {
        &self.bounds
    }

    pub fn root(&self) -> Option<&BvhNode> {
        self.nodes.first()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn object_count(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Primitives of a leaf.
    ///
    /// Empty for internal nodes and for ranges outside this tree, e.g. a
    /// node borrowed from another tree.
    pub fn leaf_primitives(&self, node: &BvhNode) -> &[BvhPrimitive] {
        match node.kind {
            BvhNodeKind::Leaf { first, count } => first
                .checked_add(count)
                .and_then(|end| self.primitives.get(first..end))
                .unwrap_or(&[]),
            BvhNodeKind::Internal { .. } => &[],
        }
    }

    pub fn stats(&self) -> BvhStats {
        let mut stats = BvhStats {
            node_count: self.nodes.len(),
            object_count: self.primitives.len(),
            ..Default::default()
        };
        if self.nodes.is_empty() {
            return stats;
        }

        let mut stack = vec![(0usize, 1usize)];
        while let Some((index, depth)) = stack.pop() {
            stats.max_depth = stats.max_depth.max(depth);
            match self.nodes[index].kind {
                BvhNodeKind::Leaf { .. } => stats.leaf_count += 1,
                BvhNodeKind::Internal { left, right } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        stats
    }

    /// Log every node at debug level: `[i] L R F C | bounds`.
    pub fn debug_dump(&self) {
        crate::engine_debug!(
            "galaxy3d::Bvh",
            "BVH dump: {} nodes, {} objects",
            self.nodes.len(), self.primitives.len(),
        );
        for (index, node) in self.nodes.iter().enumerate() {
            let (left, right, first, count) = match node.kind {
                BvhNodeKind::Leaf { first, count } => (-1, -1, first as i64, count as i64),
                BvhNodeKind::Internal { left, right } => (left as i64, right as i64, -1, 0),
            };
            crate::engine_debug!(
                "galaxy3d::Bvh",
                "[{}] L={} R={} F={} C={} | min=({:.3}, {:.3}, {:.3}) max=({:.3}, {:.3}, {:.3})",
                index, left, right, first, count,
                node.bounds.min.x, node.bounds.min.y, node.bounds.min.z,
                node.bounds.max.x, node.bounds.max.y, node.bounds.max.z,
            );
        }
    }

    /// Wireframe of every node bound, 12 lines per node.
    pub fn debug_lines(&self) -> Vec<DebugLine> {
        let mut lines = Vec::with_capacity(self.nodes.len() * BOX_EDGES.len());
        for node in &self.nodes {
            let color = if node.is_leaf() { LEAF_COLOR } else { INTERNAL_COLOR };
            let corners = node.bounds.corners();
            lines.extend(BOX_EDGES.iter().map(|&(a, b)| DebugLine {
                start: corners[a],
                end: corners[b],
                color,
            }));
        }
        lines
    }

    /// `debug_lines` flattened to a line-list vertex stream.
    pub fn debug_vertices(&self) -> Vec<DebugVertex> {
        self.debug_lines()
            .iter()
            .flat_map(|line| {
                let color = line.color.to_array();
                [
                    DebugVertex { position: line.start.to_array(), color },
                    DebugVertex { position: line.end.to_array(), color },
                ]
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
