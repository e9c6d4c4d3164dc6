//! Camera module: view frustum used by visibility queries.
//!
//! The engine does NOT own cameras. The host computes a frustum once per
//! frame (typically from its view-projection matrix) and hands it to the
//! partition.

mod frustum;

pub use frustum::{
    Frustum, FrustumTest,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
};
