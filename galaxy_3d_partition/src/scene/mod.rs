//! Scene module
//!
//! Reference scene graph (actors and primitives), the collaborator traits
//! a spatial partition needs from its host, and culling strategies.

mod primitive;
mod scene;
mod scene_graph;
mod scene_index;
mod culler;

pub use primitive::{
    Actor, ActorKey, HitShape, Primitive, PrimitiveFlags, PrimitiveKey,
};
pub use scene::Scene;
pub use scene_graph::{HitTester, SceneGraph};
pub use scene_index::{RayHit, SceneIndex};
pub use culler::{BruteForceCuller, Culler, FrustumCuller};
