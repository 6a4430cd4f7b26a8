//! Numeric tolerances shared by all math types.
//!
//! The constants are not interchangeable: vector equality works on distances
//! in world units, while the quaternion thresholds work on dot products of
//! unit quaternions.

/// Distance under which two vectors compare equal, and the magnitude under
/// which a vector is considered too short to normalize.
pub const VECTOR_EPSILON: f32 = 1e-5;

/// Two unit quaternions whose dot product exceeds `1 - QUATERNION_EPSILON`
/// describe the same rotation.
pub const QUATERNION_EPSILON: f32 = 1e-6;

/// Guard for denominators that would otherwise blow up.
pub const NEAR_ZERO: f32 = f32::EPSILON;

/// Above this dot product, slerp degrades to a normalized lerp.
pub const SLERP_LINEAR_THRESHOLD: f32 = 0.9995;

pub const RAD_TO_DEG: f32 = 180.0 / std::f32::consts::PI;
pub const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;

/// Absolute-difference comparison of two scalars.
#[inline]
pub fn approx_eq(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}
