//! Bound arithmetic: axis-aligned boxes, rays and Morton keys.
//!
//! Pure value types and functions with no state. Everything the
//! hierarchy builder and the query engine compute on bounds lives here.

mod aabb;
mod ray;
pub(crate) mod morton;

pub use aabb::AABB;
pub use ray::{Ray, PARALLEL_EPSILON};
pub use morton::{morton_code, morton_interleave, MORTON_QUANTIZE_MAX};
