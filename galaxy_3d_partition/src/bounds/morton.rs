/// Morton (Z-order) keys for the BVH sort.
///
/// A point inside a global bound is normalized to [0, 1]^3, quantized to
/// 10 bits per axis and bit-interleaved into a 30-bit key. Points close
/// in space tend to get close keys, which makes a 1D sort a good proxy
/// for spatial partitioning.

use glam::Vec3;
use super::aabb::AABB;

/// Largest quantized coordinate (10 bits per axis).
pub const MORTON_QUANTIZE_MAX: f32 = 1023.0;

/// Spread the low 10 bits of `v` so that two zero bits separate each one.
#[inline]
fn expand_bits(v: u32) -> u32 {
    let mut v = v & 0x3FF;
    v = v.wrapping_mul(0x0001_0001) & 0xFF00_00FF;
    v = v.wrapping_mul(0x0000_0101) & 0x0F00_F00F;
    v = v.wrapping_mul(0x0000_0011) & 0xC30C_30C3;
    v = v.wrapping_mul(0x0000_0005) & 0x4924_9249;
    v
}

/// Interleave three 10-bit coordinates into a 30-bit key.
///
/// Bit layout of each triple, high to low: x, y, z.
#[inline]
pub fn morton_interleave(x: u32, y: u32, z: u32) -> u32 {
    (expand_bits(x) << 2) | (expand_bits(y) << 1) | expand_bits(z)
}

/// Position of `point` inside `global`, mapped to [0, 1] per axis.
///
/// An axis where the global bound has no extent maps to 0.5.
pub(crate) fn normalized_position(global: &AABB, point: Vec3) -> Vec3 {
    let extent = global.extent();
    let axis = |i: usize| {
        if extent[i] > 0.0 {
            ((point[i] - global.min[i]) / (extent[i] * 2.0)).clamp(0.0, 1.0)
        } else {
            0.5
        }
    };
    Vec3::new(axis(0), axis(1), axis(2))
}

/// Morton key of `point` relative to the global bound `global`.
pub fn morton_code(global: &AABB, point: Vec3) -> u32 {
    let n = normalized_position(global, point);
    let q = |v: f32| (v * MORTON_QUANTIZE_MAX) as u32;
    morton_interleave(q(n.x), q(n.y), q(n.z))
}

#[cfg(test)]
#[path = "morton_tests.rs"]
mod tests;
