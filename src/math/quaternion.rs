//! Rotations as quaternions
//!
//! Quaternions are stored as `[x, y, z, w]`. Most operations assume unit
//! length but nothing enforces it: multiplying or converting non-unit
//! quaternions silently produces non-unit results.
//!
//! Multiplication is the Hamilton product, `lhs * rhs` applies `rhs` first.
//!
//! Euler angles use the Z-Y-X intrinsic Tait-Bryan convention, in degrees:
//! `x` is roll about the X axis, `y` pitch about Y and `z` yaw about Z. Roll is
//! applied first, yaw last.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;
use std::fmt;
use std::ops::{Index, IndexMut, Mul, Neg};

use super::tolerance::{
    DEG_TO_RAD, NEAR_ZERO, QUATERNION_EPSILON, RAD_TO_DEG, SLERP_LINEAR_THRESHOLD, VECTOR_EPSILON,
};
use super::{MathError, Vec3, check_index};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Quaternion([f32; 4]);

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Self = Self([0.0, 0.0, 0.0, 1.0]);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self([x, y, z, w])
    }

    pub const fn x(&self) -> f32 {
        self.0[0]
    }

    pub const fn y(&self) -> f32 {
        self.0[1]
    }

    pub const fn z(&self) -> f32 {
        self.0[2]
    }

    pub const fn w(&self) -> f32 {
        self.0[3]
    }

    pub fn set(&mut self, x: f32, y: f32, z: f32, w: f32) {
        self.0 = [x, y, z, w];
    }

    /// Component by index, `0..4` maps to `x, y, z, w`
    pub fn get(&self, index: usize) -> Result<f32, MathError> {
        check_index(index, 4).map(|i| self.0[i])
    }

    pub fn set_component(&mut self, index: usize, value: f32) -> Result<(), MathError> {
        let i = check_index(index, 4)?;
        self.0[i] = value;
        Ok(())
    }

    fn vector_part(self) -> Vec3 {
        Vec3::new(self.x(), self.y(), self.z())
    }

    pub fn dot(self, rhs: Self) -> f32 {
        self.x() * rhs.x() + self.y() * rhs.y() + self.z() * rhs.z() + self.w() * rhs.w()
    }

    pub fn magnitude(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit length copy, or [`Quaternion::IDENTITY`] when the magnitude is
    /// near zero
    pub fn normalized(self) -> Self {
        let magnitude = self.magnitude();
        if magnitude < NEAR_ZERO {
            return Self::IDENTITY;
        }
        let [x, y, z, w] = self.0;
        Self::new(x / magnitude, y / magnitude, z / magnitude, w / magnitude)
    }

    pub fn normalize(&mut self) {
        *self = self.normalized();
    }

    /// The conjugate. Only the inverse of the rotation for unit quaternions.
    pub fn inverse(self) -> Self {
        let [x, y, z, w] = self.0;
        Self::new(-x, -y, -z, w)
    }

    /// Rotation of `angle` degrees around `axis`. The axis is normalized first.
    pub fn angle_axis(angle: f32, axis: Vec3) -> Self {
        let (sin, cos) = (angle * DEG_TO_RAD * 0.5).sin_cos();
        let axis = axis.normalized();
        Self::new(axis.x * sin, axis.y * sin, axis.z * sin, cos)
    }

    /// Same as [`Quaternion::angle_axis`] with the arguments swapped
    pub fn axis_angle(axis: Vec3, angle: f32) -> Self {
        Self::angle_axis(angle, axis)
    }

    /// Splits the rotation into an angle in degrees and a unit axis.
    ///
    /// Rotations too small to have a meaningful axis report [`Vec3::RIGHT`].
    pub fn to_angle_axis(self) -> (f32, Vec3) {
        let q = self.normalized();
        let w = q.w().clamp(-1.0, 1.0);
        let angle = 2.0 * w.acos() * RAD_TO_DEG;
        let s = (1.0 - w * w).sqrt();
        if s < VECTOR_EPSILON {
            (angle, Vec3::RIGHT)
        } else {
            (angle, q.vector_part() / s)
        }
    }

    /// Rotation from Euler angles in degrees
    pub fn euler(x: f32, y: f32, z: f32) -> Self {
        let (sr, cr) = (x * DEG_TO_RAD * 0.5).sin_cos();
        let (sp, cp) = (y * DEG_TO_RAD * 0.5).sin_cos();
        let (sy, cy) = (z * DEG_TO_RAD * 0.5).sin_cos();
        Self::new(
            sr * cp * cy - cr * sp * sy,
            cr * sp * cy + sr * cp * sy,
            cr * cp * sy - sr * sp * cy,
            cr * cp * cy + sr * sp * sy,
        )
    }

    pub fn from_euler(angles: Vec3) -> Self {
        Self::euler(angles.x, angles.y, angles.z)
    }

    /// Euler angles in degrees, the inverse of [`Quaternion::euler`].
    ///
    /// Roll and yaw come back in `(-180, 180]`, pitch in `[-90, 90]`.
    pub fn euler_angles(self) -> Vec3 {
        let [x, y, z, w] = self.0;
        let roll = (2.0 * (w * x + y * z)).atan2(1.0 - 2.0 * (x * x + y * y));
        let sin_pitch = 2.0 * (w * y - z * x);
        let pitch = if sin_pitch.abs() >= 1.0 {
            FRAC_PI_2.copysign(sin_pitch)
        } else {
            sin_pitch.asin()
        };
        let yaw = (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (y * y + z * z));
        Vec3::new(roll, pitch, yaw) * RAD_TO_DEG
    }

    pub fn set_euler_angles(&mut self, angles: Vec3) {
        *self = Self::from_euler(angles);
    }

    /// Angle in degrees between two rotations
    pub fn angle(a: Self, b: Self) -> f32 {
        let dot = a.normalized().dot(b.normalized()).abs().min(1.0);
        if dot > 1.0 - QUATERNION_EPSILON {
            0.0
        } else {
            2.0 * dot.acos() * RAD_TO_DEG
        }
    }

    fn blend(a: Self, weight_a: f32, b: Self, weight_b: f32) -> Self {
        Self::new(
            a.x() * weight_a + b.x() * weight_b,
            a.y() * weight_a + b.y() * weight_b,
            a.z() * weight_a + b.z() * weight_b,
            a.w() * weight_a + b.w() * weight_b,
        )
    }

    /// Normalized linear interpolation along the shorter path, `t` clamped to `[0, 1]`
    pub fn lerp(a: Self, b: Self, t: f32) -> Self {
        Self::lerp_unclamped(a, b, t.clamp(0.0, 1.0))
    }

    pub fn lerp_unclamped(a: Self, b: Self, t: f32) -> Self {
        let b = if a.dot(b) < 0.0 { -b } else { b };
        Self::blend(a, 1.0 - t, b, t).normalized()
    }

    /// Spherical interpolation along the shorter arc, `t` clamped to `[0, 1]`
    pub fn slerp(a: Self, b: Self, t: f32) -> Self {
        Self::slerp_unclamped(a, b, t.clamp(0.0, 1.0))
    }

    pub fn slerp_unclamped(a: Self, b: Self, t: f32) -> Self {
        let mut b = b;
        let mut dot = a.dot(b);
        if dot < 0.0 {
            b = -b;
            dot = -dot;
        }
        // sin(theta) approaches zero, stay linear
        if dot > SLERP_LINEAR_THRESHOLD {
            return Self::lerp_unclamped(a, b, t);
        }
        let theta = dot.acos();
        let sin_theta = theta.sin();
        let weight_a = ((1.0 - t) * theta).sin() / sin_theta;
        let weight_b = (t * theta).sin() / sin_theta;
        Self::blend(a, weight_a, b, weight_b)
    }

    /// Rotation whose forward (+Z) axis points along `forward` with its up
    /// (+Y) axis as close to `upwards` as possible. Pass [`Vec3::UP`] for the
    /// usual upright orientation.
    pub fn look_rotation(forward: Vec3, upwards: Vec3) -> Self {
        let forward = forward.normalized();
        if forward == Vec3::ZERO {
            warn!("look rotation with a zero forward vector, using identity");
            return Self::IDENTITY;
        }
        let right = upwards.cross(forward).normalized();
        if right == Vec3::ZERO {
            debug!("look rotation with forward {forward} parallel to up {upwards}");
            return Self::from_to_rotation(Vec3::FORWARD, forward);
        }
        let up = forward.cross(right);
        Self::from_rotation_axes(right, up, forward)
    }

    /// Extracts the rotation of the orthonormal frame whose columns are
    /// `right`, `up` and `forward`.
    pub(crate) fn from_rotation_axes(right: Vec3, up: Vec3, forward: Vec3) -> Self {
        let (m00, m01, m02) = (right.x, up.x, forward.x);
        let (m10, m11, m12) = (right.y, up.y, forward.y);
        let (m20, m21, m22) = (right.z, up.z, forward.z);

        // pick the branch with the largest divisor
        let trace = m00 + m11 + m22;
        if trace > 0.0 {
            let s = 0.5 / (trace + 1.0).sqrt();
            Self::new((m21 - m12) * s, (m02 - m20) * s, (m10 - m01) * s, 0.25 / s)
        } else if m00 > m11 && m00 > m22 {
            let s = 2.0 * (1.0 + m00 - m11 - m22).sqrt();
            Self::new(0.25 * s, (m01 + m10) / s, (m02 + m20) / s, (m21 - m12) / s)
        } else if m11 > m22 {
            let s = 2.0 * (1.0 + m11 - m00 - m22).sqrt();
            Self::new((m01 + m10) / s, 0.25 * s, (m12 + m21) / s, (m02 - m20) / s)
        } else {
            let s = 2.0 * (1.0 + m22 - m00 - m11).sqrt();
            Self::new((m02 + m20) / s, (m12 + m21) / s, 0.25 * s, (m10 - m01) / s)
        }
    }

    /// Shortest-arc rotation taking direction `from` to direction `to`
    pub fn from_to_rotation(from: Vec3, to: Vec3) -> Self {
        let from = from.normalized();
        let to = to.normalized();
        let dot = from.dot(to);
        if dot >= 1.0 - QUATERNION_EPSILON {
            return Self::IDENTITY;
        }
        if dot <= -1.0 + QUATERNION_EPSILON {
            // opposite directions, any perpendicular axis will do
            let mut axis = Vec3::RIGHT.cross(from);
            if axis.sqr_magnitude() < NEAR_ZERO {
                axis = Vec3::UP.cross(from);
            }
            return Self::angle_axis(180.0, axis);
        }
        let axis = from.cross(to);
        Self::new(axis.x, axis.y, axis.z, 1.0 + dot).normalized()
    }

    /// Rotates `from` towards `to` by at most `max_degrees_delta` degrees
    pub fn rotate_towards(from: Self, to: Self, max_degrees_delta: f32) -> Self {
        let angle = Self::angle(from, to);
        if angle == 0.0 {
            return to;
        }
        Self::slerp_unclamped(from, to, (max_degrees_delta / angle).min(1.0))
    }
}

/// Approximate, same policy as [`Vec3`]: the squared componentwise distance
/// must be strictly below `VECTOR_EPSILON²`.
impl PartialEq for Quaternion {
    fn eq(&self, other: &Self) -> bool {
        let d = Self::blend(*self, 1.0, *other, -1.0);
        d.dot(d) < VECTOR_EPSILON * VECTOR_EPSILON
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z, w] = self.0;
        write!(f, "({x}, {y}, {z}, {w})")
    }
}

impl Index<usize> for Quaternion {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        match self.0.get(index) {
            Some(value) => value,
            None => panic!("{}", MathError::IndexOutOfRange { index, len: 4 }),
        }
    }
}

impl IndexMut<usize> for Quaternion {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        match self.0.get_mut(index) {
            Some(value) => value,
            None => panic!("{}", MathError::IndexOutOfRange { index, len: 4 }),
        }
    }
}

impl Neg for Quaternion {
    type Output = Self;
    fn neg(self) -> Self {
        let [x, y, z, w] = self.0;
        Self::new(-x, -y, -z, -w)
    }
}

/// Hamilton product, the result applies `rhs` first and then `self`
impl Mul for Quaternion {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let [lx, ly, lz, lw] = self.0;
        let [rx, ry, rz, rw] = rhs.0;
        Self::new(
            lw * rx + lx * rw + ly * rz - lz * ry,
            lw * ry + ly * rw + lz * rx - lx * rz,
            lw * rz + lz * rw + lx * ry - ly * rx,
            lw * rw - lx * rx - ly * ry - lz * rz,
        )
    }
}

/// Rotates a vector, expanded form of `q * v * q⁻¹`
impl Mul<Vec3> for Quaternion {
    type Output = Vec3;

    fn mul(self, point: Vec3) -> Vec3 {
        let [x, y, z, w] = self.0;
        let (x2, y2, z2) = (x * 2.0, y * 2.0, z * 2.0);
        let (xx, yy, zz) = (x * x2, y * y2, z * z2);
        let (xy, xz, yz) = (x * y2, x * z2, y * z2);
        let (wx, wy, wz) = (w * x2, w * y2, w * z2);

        Vec3::new(
            (1.0 - (yy + zz)) * point.x + (xy - wz) * point.y + (xz + wy) * point.z,
            (xy + wz) * point.x + (1.0 - (xx + zz)) * point.y + (yz - wx) * point.z,
            (xz - wy) * point.x + (yz + wx) * point.y + (1.0 - (xx + yy)) * point.z,
        )
    }
}
