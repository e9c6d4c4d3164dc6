/// BVH configuration.

use crate::engine::Engine;
use crate::error::{Error, Result};

/// Default number of primitives a leaf may hold.
pub const DEFAULT_MAX_OBJECTS_PER_LEAF: usize = 8;

/// Default slack (in ray distance units) when pruning ray candidates.
pub const DEFAULT_RAY_EPSILON: f32 = 1e-3;

/// How far the nearest-ray search goes once a hit is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RayQueryMode {
    /// Keep popping nodes while their entry distance is within
    /// `best + epsilon`. Returns the true closest hit.
    #[default]
    Exhaustive,
    /// Stop at the first internal node popped after any leaf produced
    /// a hit. Cheaper, may miss a closer hit in a sibling subtree.
    FirstLeafHit,
}

/// Tuning parameters of a `BvhSceneIndex`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhConfig {
    /// A range of at most this many primitives becomes a leaf (>= 1)
    pub max_objects_per_leaf: usize,
    /// Pruning slack for ray queries (finite, >= 0)
    pub ray_epsilon: f32,
    pub ray_query_mode: RayQueryMode,
}

impl Default for BvhConfig {
    fn default() -> Self {
        Self {
            max_objects_per_leaf: DEFAULT_MAX_OBJECTS_PER_LEAF,
            ray_epsilon: DEFAULT_RAY_EPSILON,
            ray_query_mode: RayQueryMode::Exhaustive,
        }
    }
}

impl BvhConfig {
    /// Check the parameters, logging and returning the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.max_objects_per_leaf == 0 {
            return Err(Engine::log_and_return_error(
                "galaxy3d::Config",
                Error::InvalidConfig("max_objects_per_leaf must be at least 1".to_string()),
            ));
        }
        if !self.ray_epsilon.is_finite() || self.ray_epsilon < 0.0 {
            return Err(Engine::log_and_return_error(
                "galaxy3d::Config",
                Error::InvalidConfig(format!(
                    "ray_epsilon must be finite and non-negative, got {}",
                    self.ray_epsilon,
                )),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
