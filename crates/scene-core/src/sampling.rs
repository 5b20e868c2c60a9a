//! Position samplers and easing shared by every population.
//!
//! Chaos poses are drawn uniformly from a solid ball; tree poses sit on the
//! lateral surface of an upright cone. Both samplers take the RNG by value
//! reference so populations can keep independent, reseedable streams.

use glam::Vec3;
use rand::Rng;

/// Dimensions of the target cone. Apex points up; the base sits at
/// `y_offset`, the apex at `y_offset + height`.
#[derive(Clone, Copy, Debug)]
pub struct TreeDims {
    pub height: f32,
    pub base_radius: f32,
    pub y_offset: f32,
}

impl Default for TreeDims {
    fn default() -> Self {
        Self {
            height: crate::constants::TREE_HEIGHT,
            base_radius: crate::constants::TREE_BASE_RADIUS,
            y_offset: crate::constants::TREE_Y_OFFSET,
        }
    }
}

/// Uniform sample inside a ball of the given radius.
///
/// Angles are drawn uniformly (with the arccos correction for the polar
/// angle) and the radius as `R * cbrt(u)` so density is uniform by volume.
pub fn chaos_position(rng: &mut impl Rng, radius: f32) -> Vec3 {
    let theta = rng.gen::<f32>() * std::f32::consts::TAU;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
    let r = rng.gen::<f32>().cbrt() * radius;
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Random point on the cone shell: uniform height, ring radius shrinking
/// linearly toward the apex, uniform azimuth on the ring.
pub fn tree_position(rng: &mut impl Rng, dims: TreeDims) -> Vec3 {
    let y = rng.gen::<f32>() * dims.height + dims.y_offset;
    let normalized = (y - dims.y_offset) / dims.height;
    let ring_radius = dims.base_radius * (1.0 - normalized);
    let theta = rng.gen::<f32>() * std::f32::consts::TAU;
    Vec3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin())
}

/// Uniform sample inside an axis-aligned cube of the given edge extent,
/// centred on the origin. Used for the face scene's ambient dust.
pub fn scatter_box(rng: &mut impl Rng, extent: f32) -> Vec3 {
    Vec3::new(
        (rng.gen::<f32>() - 0.5) * extent,
        (rng.gen::<f32>() - 0.5) * extent,
        (rng.gen::<f32>() - 0.5) * extent,
    )
}

/// Cubic ease-in-out. Exact at the endpoints and the midpoint.
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Derive a per-stream RNG seed from a base seed and a stream index.
#[inline]
pub fn mix_seed(base: u64, index: u64) -> u64 {
    base ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
