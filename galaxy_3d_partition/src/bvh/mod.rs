//! Bounding volume hierarchy over primitive world bounds.
//!
//! The tree is rebuilt from scratch out of a pending-bound table:
//! Morton sort of the bound centers, then a count-balanced midpoint
//! split into a flat node array. Queries borrow the tree immutably.

mod config;
mod tree;
mod builder;
mod query;
mod bvh_scene_index;

pub use config::{
    BvhConfig, RayQueryMode, DEFAULT_MAX_OBJECTS_PER_LEAF, DEFAULT_RAY_EPSILON,
};
pub use tree::{
    BvhNode, BvhNodeKind, BvhPrimitive, BvhStats, BvhTree, DebugLine, DebugVertex,
    INTERNAL_COLOR, LEAF_COLOR,
};
pub use builder::BvhBuilder;
pub use bvh_scene_index::BvhSceneIndex;
