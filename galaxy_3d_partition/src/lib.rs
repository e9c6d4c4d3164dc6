/*!
# Galaxy 3D Partition

Scene spatial index for the Galaxy 3D engine.

A bounding volume hierarchy over the world-space bounds of scene
primitives, kept up to date incrementally and queried every frame for
frustum visibility and ray picking.

## Architecture

- **PartitionManager**: world-owned facade (register, mark dirty, budgeted update, queries)
- **BvhSceneIndex**: pending-bound table plus a flat tree rebuilt from it
- **BvhBuilder**: Morton sort and count-balanced midpoint split
- **SceneGraph / HitTester**: what the partition needs from the host scene
- **Scene**: reference scene graph (actors and primitives in slot maps)
- **Culler**: per-frame visibility strategies writing the scene's visibility flags

Hosts own their `PartitionManager` values; there is no global partition.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod bounds;
pub mod camera;
pub mod scene;
pub mod bvh;
pub mod partition;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging hub
    pub use crate::engine::Engine;

    // Partition facade
    pub use crate::partition::{PartitionConfig, PartitionManager, UpdateStats};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Bound arithmetic sub-module
    pub mod bounds {
        pub use crate::bounds::*;
    }

    // Camera sub-module (frustum)
    pub mod camera {
        pub use crate::camera::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // BVH sub-module
    pub mod bvh {
        pub use crate::bvh::*;
    }

    // Partition sub-module
    pub mod partition {
        pub use crate::partition::*;
    }
}

// Re-export math library at crate root
pub use glam;
