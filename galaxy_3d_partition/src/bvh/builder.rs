/// Bulk BVH construction.
///
/// 1. Global bound of every primitive.
/// 2. 30-bit Morton key of each bound center, relative to the global bound.
/// 3. LSB radix sort on `(morton << 32) | slot_index`. The slot index of a
///    live key is unique, so the order is total and identical across
///    rebuilds of the same set.
/// 4. Recursive midpoint split by index; ranges of at most
///    `max_objects_per_leaf` primitives become leaves.

use rdst::{RadixKey, RadixSort};
use slotmap::Key;
use crate::bounds::{morton_code, AABB};
use crate::scene::PrimitiveKey;
use super::tree::{BvhNode, BvhNodeKind, BvhPrimitive, BvhTree};

/// Sort record: Morton key with tie-break in the low half, plus the
/// position of the primitive in the unsorted input.
#[derive(Debug, Clone, Copy)]
struct MortonEntry {
    sort_key: u64,
    index: u32,
}

impl RadixKey for MortonEntry {
    const LEVELS: usize = 8;

    #[inline]
    fn get_level(&self, level: usize) -> u8 {
        (self.sort_key >> (level * 8)) as u8
    }
}

/// Low 32 bits of the key's FFI form (the slot index).
#[inline]
fn slot_index(key: PrimitiveKey) -> u64 {
    key.data().as_ffi() & 0xFFFF_FFFF
}

/// Builds flat trees out of `(key, bound)` snapshots.
#[derive(Debug, Clone, Copy)]
pub struct BvhBuilder {
    max_objects_per_leaf: usize,
}

impl BvhBuilder {
    /// A leaf size of 0 is treated as 1.
    pub fn new(max_objects_per_leaf: usize) -> Self {
        Self {
            max_objects_per_leaf: max_objects_per_leaf.max(1),
        }
    }

    pub fn max_objects_per_leaf(&self) -> usize {
        self.max_objects_per_leaf
    }

    /// Build a tree over `items`. Null keys are skipped; no input
    /// produces an empty tree with a zero global bound.
    pub fn build<I>(&self, items: I) -> BvhTree
    where
        I: IntoIterator<Item = (PrimitiveKey, AABB)>,
    {
        let unsorted: Vec<BvhPrimitive> = items
            .into_iter()
            .filter(|(key, _)| !key.is_null())
            .map(|(key, bounds)| BvhPrimitive { key, bounds })
            .collect();

        let Some(first) = unsorted.first() else {
            return BvhTree::default();
        };
        let global = unsorted[1..]
            .iter()
            .fold(first.bounds, |acc, prim| acc.union(&prim.bounds));

        let mut entries: Vec<MortonEntry> = unsorted
            .iter()
            .enumerate()
            .map(|(index, prim)| MortonEntry {
                sort_key: (u64::from(morton_code(&global, prim.bounds.center())) << 32)
                    | slot_index(prim.key),
                index: index as u32,
            })
            .collect();
        entries.radix_sort_unstable();

        let primitives: Vec<BvhPrimitive> = entries
            .iter()
            .map(|entry| unsorted[entry.index as usize])
            .collect();

        let mut nodes = Vec::with_capacity(2 * primitives.len() / self.max_objects_per_leaf + 1);
        self.build_range(&mut nodes, &primitives, 0, primitives.len());

        BvhTree {
            nodes,
            primitives,
            bounds: global,
        }
    }

    /// Append the subtree over `primitives[start..end]` and return its root index.
    fn build_range(
        &self,
        nodes: &mut Vec<BvhNode>,
        primitives: &[BvhPrimitive],
        start: usize,
        end: usize,
    ) -> usize {
        let node_index = nodes.len();
        let count = end - start;

        if count <= self.max_objects_per_leaf {
            let range = &primitives[start..end];
            let bounds = range[1..]
                .iter()
                .fold(range[0].bounds, |acc, prim| acc.union(&prim.bounds));
            nodes.push(BvhNode {
                bounds,
                kind: BvhNodeKind::Leaf { first: start, count },
            });
            return node_index;
        }

        // Reserve the slot, children are filled depth-first after it
        nodes.push(BvhNode {
            bounds: AABB::default(),
            kind: BvhNodeKind::Internal { left: 0, right: 0 },
        });

        let mid = (start + end) / 2;
        let left = self.build_range(nodes, primitives, start, mid);
        let right = self.build_range(nodes, primitives, mid, end);

        nodes[node_index] = BvhNode {
            bounds: nodes[left].bounds.union(&nodes[right].bounds),
            kind: BvhNodeKind::Internal { left, right },
        };
        node_index
    }
}

impl Default for BvhBuilder {
    fn default() -> Self {
        Self::new(super::config::DEFAULT_MAX_OBJECTS_PER_LEAF)
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
