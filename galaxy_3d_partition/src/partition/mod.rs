//! World partition facade.
//!
//! `PartitionManager` ties a scene graph to a `BvhSceneIndex` through a
//! dirty queue processed under a per-tick budget.

mod dirty_tracker;
mod partition_manager;

pub use dirty_tracker::DirtyTracker;
pub use partition_manager::{
    PartitionConfig, PartitionManager, UpdateStats, DEFAULT_UPDATE_BUDGET,
};
