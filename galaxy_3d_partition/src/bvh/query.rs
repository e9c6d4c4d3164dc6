/// Frustum and nearest-ray traversals over a built tree.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use crate::bounds::Ray;
use crate::camera::{Frustum, FrustumTest};
use crate::scene::{HitTester, PrimitiveKey, RayHit};
use super::config::RayQueryMode;
use super::tree::{BvhNodeKind, BvhTree};

/// Total-ordered f32 for the best-first heap.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OrdF32(f32);

impl Eq for OrdF32 {}

impl PartialOrd for OrdF32 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrdF32 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl BvhTree {
    /// Append every primitive whose bound snapshot intersects the frustum.
    ///
    /// A root fully inside the frustum short-circuits to the whole
    /// primitive array.
    pub fn query_frustum(&self, frustum: &Frustum, results: &mut Vec<PrimitiveKey>) {
        let Some(root) = self.root() else {
            return;
        };

        match frustum.classify_aabb(&root.bounds) {
            FrustumTest::Outside => return,
            FrustumTest::Inside => {
                results.extend(self.primitives.iter().map(|prim| prim.key));
                return;
            }
            FrustumTest::Partial => {}
        }

        let mut stack = vec![0usize];
        while let Some(index) = stack.pop() {
            match self.nodes[index].kind {
                BvhNodeKind::Leaf { first, count } => {
                    results.extend(
                        self.primitives[first..first + count]
                            .iter()
                            .filter(|prim| frustum.intersects_aabb(&prim.bounds))
                            .map(|prim| prim.key),
                    );
                }
                BvhNodeKind::Internal { left, right } => {
                    for child in [right, left] {
                        if frustum.intersects_aabb(&self.nodes[child].bounds) {
                            stack.push(child);
                        }
                    }
                }
            }
        }
    }

    /// Closest pickable primitive along `ray`.
    ///
    /// Best-first search ordered by box entry distance. Nodes and
    /// primitive boxes entered farther than `best + epsilon` are pruned.
    /// Candidates whose box is hit go through `tester` for the exact
    /// distance.
    pub fn query_ray_closest(
        &self,
        ray: &Ray,
        tester: &dyn HitTester,
        epsilon: f32,
        mode: RayQueryMode,
    ) -> Option<RayHit> {
        let root = self.root()?;
        let (root_enter, _) = root.bounds.ray_intersect(ray)?;

        let mut heap = BinaryHeap::new();
        heap.push(Reverse((OrdF32(root_enter), 0usize)));
        let mut best: Option<RayHit> = None;

        while let Some(Reverse((OrdF32(t_enter), index))) = heap.pop() {
            let limit = best.map_or(f32::INFINITY, |hit| hit.distance + epsilon);
            if t_enter > limit {
                break;
            }

            match self.nodes[index].kind {
                BvhNodeKind::Leaf { first, count } => {
                    for prim in &self.primitives[first..first + count] {
                        let limit = best.map_or(f32::INFINITY, |hit| hit.distance + epsilon);
                        match prim.bounds.ray_intersect(ray) {
                            Some((t_box, _)) if t_box <= limit => {}
                            _ => continue,
                        }
                        if !tester.is_pickable(prim.key) {
                            continue;
                        }
                        if let Some(distance) = tester.hit_test(prim.key, ray) {
                            if best.map_or(true, |hit| distance < hit.distance) {
                                best = Some(RayHit { key: prim.key, distance });
                            }
                        }
                    }
                }
                BvhNodeKind::Internal { left, right } => {
                    if mode == RayQueryMode::FirstLeafHit && best.is_some() {
                        break;
                    }
                    for child in [left, right] {
                        if let Some((t_child, _)) = self.nodes[child].bounds.ray_intersect(ray) {
                            if t_child <= limit {
                                heap.push(Reverse((OrdF32(t_child), child)));
                            }
                        }
                    }
                }
            }
        }

        best
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
