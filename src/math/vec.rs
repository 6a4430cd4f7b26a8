//! Vector types for positions and directions
//!
//! [`Vec3`] is the workhorse of the library. [`Vec4`] shows up as matrix
//! rows and columns and as homogeneous coordinates, [`Vec2`] only exists at
//! the boundary with 2D consumers.
//!
//! Vectors compare approximately: two vectors are equal when the squared
//! distance between them is strictly below `VECTOR_EPSILON²`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use super::tolerance::{NEAR_ZERO, RAD_TO_DEG, VECTOR_EPSILON};

/// A 2D vector, used when handing positions to 2D consumers
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A 3D vector
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[cfg_attr(test, derive(fake::Dummy))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    pub const FORWARD: Self = Self::new(0.0, 0.0, 1.0);
    pub const BACK: Self = Self::new(0.0, 0.0, -1.0);
    pub const RIGHT: Self = Self::new(1.0, 0.0, 0.0);
    pub const LEFT: Self = Self::new(-1.0, 0.0, 0.0);
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);
    pub const DOWN: Self = Self::new(0.0, -1.0, 0.0);
    pub const POSITIVE_INFINITY: Self = Self::new(f32::INFINITY, f32::INFINITY, f32::INFINITY);
    pub const NEGATIVE_INFINITY: Self =
        Self::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Vector in the XY plane, z is zero
    pub const fn from_xy(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn from_vec2(v: Vec2) -> Self {
        Self::from_xy(v.x, v.y)
    }

    /// Drops the z component
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Plain `[x, y, z]` triple, the layout renderers and mesh exporters expect
    pub fn to_vec3(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn set(&mut self, x: f32, y: f32, z: f32) {
        self.x = x;
        self.y = y;
        self.z = z;
    }

    pub fn magnitude(self) -> f32 {
        self.sqr_magnitude().sqrt()
    }

    /// Squared length, cheaper than [`Vec3::magnitude`] for comparisons
    pub fn sqr_magnitude(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Unit vector in the same direction, or [`Vec3::ZERO`] when the vector is
    /// too short to normalize
    pub fn normalized(self) -> Self {
        let magnitude = self.magnitude();
        if magnitude > VECTOR_EPSILON {
            let inv_magnitude = 1.0 / magnitude;
            self * inv_magnitude
        } else {
            Self::ZERO
        }
    }

    pub fn normalize(&mut self) {
        *self = self.normalized();
    }

    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn cross(self, rhs: Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    pub fn distance(a: Self, b: Self) -> f32 {
        (a - b).magnitude()
    }

    /// Unsigned angle between two directions, in degrees
    pub fn angle(from: Self, to: Self) -> f32 {
        let dot = from.normalized().dot(to.normalized());
        dot.clamp(-1.0, 1.0).acos() * RAD_TO_DEG
    }

    /// Interpolates between `a` and `b`, `t` is clamped to `[0, 1]`
    pub fn lerp(a: Self, b: Self, t: f32) -> Self {
        Self::lerp_unclamped(a, b, t.clamp(0.0, 1.0))
    }

    /// Like [`Vec3::lerp`] but extrapolates for `t` outside `[0, 1]`
    pub fn lerp_unclamped(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }

    /// Copy of `vector` with its magnitude limited to `max_length`
    pub fn clamp_magnitude(vector: Self, max_length: f32) -> Self {
        let sqr_magnitude = vector.sqr_magnitude();
        if sqr_magnitude > max_length * max_length {
            let magnitude = sqr_magnitude.sqrt();
            vector / magnitude * max_length
        } else {
            vector
        }
    }

    /// Projects `vector` onto the line spanned by `on_normal`.
    ///
    /// `on_normal` does not need to be unit length. A near-zero `on_normal`
    /// yields [`Vec3::ZERO`].
    pub fn project(vector: Self, on_normal: Self) -> Self {
        let sqr_magnitude = on_normal.sqr_magnitude();
        if sqr_magnitude < NEAR_ZERO {
            return Self::ZERO;
        }
        on_normal * (vector.dot(on_normal) / sqr_magnitude)
    }

    /// Reflects `direction` off the surface with the given `normal`.
    ///
    /// `normal` must be unit length for the result to keep the magnitude of
    /// `direction`.
    pub fn reflect(direction: Self, normal: Self) -> Self {
        direction - 2.0 * direction.dot(normal) * normal
    }

    /// Componentwise product
    pub fn scaled(a: Self, b: Self) -> Self {
        Self::new(a.x * b.x, a.y * b.y, a.z * b.z)
    }

    pub fn scale(&mut self, scale: Self) {
        *self = Self::scaled(*self, scale);
    }

    pub fn min(a: Self, b: Self) -> Self {
        Self::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z))
    }

    pub fn max(a: Self, b: Self) -> Self {
        Self::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z))
    }
}

impl PartialEq for Vec3 {
    fn eq(&self, other: &Self) -> bool {
        (*self - *other).sqr_magnitude() < VECTOR_EPSILON * VECTOR_EPSILON
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        v.to_vec3()
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Vec3 {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, s: f32) -> Self {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }
}

impl Mul<Vec3> for f32 {
    type Output = Vec3;
    fn mul(self, v: Vec3) -> Vec3 {
        v * self
    }
}

/// Division by zero follows IEEE semantics and yields infinities or NaN
impl Div<f32> for Vec3 {
    type Output = Self;
    fn div(self, s: f32) -> Self {
        Vec3 {
            x: self.x / s,
            y: self.y / s,
            z: self.z / s,
        }
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl MulAssign<f32> for Vec3 {
    fn mul_assign(&mut self, s: f32) {
        *self = *self * s;
    }
}

impl DivAssign<f32> for Vec3 {
    fn div_assign(&mut self, s: f32) {
        *self = *self / s;
    }
}

/// A 4D vector: matrix rows and columns, homogeneous coordinates
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Homogeneous point, `w = 1`
    pub fn from_point(p: Vec3) -> Self {
        Self::new(p.x, p.y, p.z, 1.0)
    }

    /// Homogeneous direction, `w = 0`
    pub fn from_direction(d: Vec3) -> Self {
        Self::new(d.x, d.y, d.z, 0.0)
    }

    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z + self.w * rhs.w
    }

    pub fn sqr_magnitude(self) -> f32 {
        self.dot(self)
    }

    pub fn magnitude(self) -> f32 {
        self.sqr_magnitude().sqrt()
    }
}

impl PartialEq for Vec4 {
    fn eq(&self, other: &Self) -> bool {
        (*self - *other).sqr_magnitude() < VECTOR_EPSILON * VECTOR_EPSILON
    }
}

impl fmt::Display for Vec4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}

impl Add for Vec4 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Vec4::new(
            self.x + other.x,
            self.y + other.y,
            self.z + other.z,
            self.w + other.w,
        )
    }
}

impl Sub for Vec4 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Vec4::new(
            self.x - other.x,
            self.y - other.y,
            self.z - other.z,
            self.w - other.w,
        )
    }
}

impl Mul<f32> for Vec4 {
    type Output = Self;
    fn mul(self, s: f32) -> Self {
        Vec4::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tolerance::approx_eq;
    use fake::{Fake, Faker};
    use pretty_assertions::assert_eq;

    /// Faker fills floats from `[0, 1)`, spread that over `[-range, range)`
    fn fake_signed(range: f32) -> Vec3 {
        (Faker.fake::<Vec3>() * 2.0 - Vec3::ONE) * range
    }

    #[test]
    fn test_vec3_operations() {
        let v1 = Vec3::new(1.0, 2.0, 3.0);
        let v2 = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(v1 + v2, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(v1 - v2, Vec3::new(-3.0, -3.0, -3.0));
        assert_eq!(-v1, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(v1 * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(2.0 * v1, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(v2 / 2.0, Vec3::new(2.0, 2.5, 3.0));
        assert_eq!(v1.dot(v2), 32.0);
        assert_eq!(v1.cross(v2), Vec3::new(-3.0, 6.0, -3.0));
    }

    #[test]
    fn test_assign_operators() {
        let mut v = Vec3::ONE;
        v += Vec3::UP;
        v -= Vec3::RIGHT;
        v *= 3.0;
        v /= 2.0;
        assert_eq!(v, Vec3::new(0.0, 3.0, 1.5));
    }

    #[test]
    fn test_divide_by_zero_is_ieee() {
        let v = Vec3::new(1.0, -1.0, 0.0) / 0.0;
        assert_eq!(v.x, f32::INFINITY);
        assert_eq!(v.y, f32::NEG_INFINITY);
        assert!(v.z.is_nan());
    }

    #[test]
    fn test_magnitude() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        assert_eq!(v.magnitude(), 5.0);
        assert_eq!(v.sqr_magnitude(), 25.0);
        assert_eq!(Vec3::distance(Vec3::ZERO, v), 5.0);
    }

    #[test]
    fn test_magnitude_squared_matches_sqr_magnitude() {
        for _ in 0..100 {
            let v = fake_signed(10.0);
            let m = v.magnitude();
            let sqr = v.sqr_magnitude();
            assert!(approx_eq(m * m, sqr, 1e-5 * sqr.max(1.0)), "{v}");
        }
    }

    #[test]
    fn test_normalize() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let len = 14.0f32.sqrt();
        assert_eq!(v.normalized(), Vec3::new(1.0 / len, 2.0 / len, 3.0 / len));

        let mut m = v;
        m.normalize();
        assert_eq!(m, v.normalized());
        assert!(approx_eq(m.magnitude(), 1.0, 1e-6));
    }

    #[test]
    fn test_normalize_unit_vector_is_noop() {
        for unit in [Vec3::UP, Vec3::LEFT, Vec3::FORWARD, Vec3::ONE.normalized()] {
            assert_eq!(unit.normalized(), unit);
        }
    }

    #[test]
    fn test_normalize_tiny_vector_is_zero() {
        let tiny = Vec3::new(VECTOR_EPSILON / 2.0, 0.0, 0.0);
        assert_eq!(tiny.normalized(), Vec3::ZERO);
        let mut exact = Vec3::new(0.0, 0.0, 0.0);
        exact.normalize();
        assert_eq!(exact.x, 0.0);
        assert_eq!(exact.y, 0.0);
        assert_eq!(exact.z, 0.0);
    }

    #[test]
    fn test_equality_is_approximate_and_strict() {
        assert_eq!(Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 1.0, 1.0 + 1e-6));
        assert_ne!(Vec3::ZERO, Vec3::new(VECTOR_EPSILON, 0.0, 0.0));
        assert_ne!(Vec3::ZERO, Vec3::new(0.0, 2.0 * VECTOR_EPSILON, 0.0));
    }

    #[test]
    fn test_dot_symmetric_cross_antisymmetric() {
        for _ in 0..100 {
            let a = fake_signed(10.0);
            let b = fake_signed(10.0);
            assert_eq!(a.dot(b), b.dot(a));
            assert_eq!(a.cross(b), -b.cross(a));
        }
    }

    #[test]
    fn test_fake_signed_spans_both_signs() {
        let samples: Vec<Vec3> = (0..100).map(|_| fake_signed(10.0)).collect();
        assert!(samples.iter().any(|v| v.x < 0.0 && v.y < 0.0 && v.z < 0.0));
        assert!(samples.iter().any(|v| v.x > 0.0 && v.y > 0.0 && v.z > 0.0));
        assert!(
            samples
                .iter()
                .all(|v| v.x.abs() <= 10.0 && v.y.abs() <= 10.0 && v.z.abs() <= 10.0)
        );
    }

    #[test]
    fn test_cross_of_axes() {
        assert_eq!(Vec3::RIGHT.cross(Vec3::UP), Vec3::FORWARD);
        assert_eq!(Vec3::UP.cross(Vec3::FORWARD), Vec3::RIGHT);
        assert_eq!(Vec3::cross(Vec3::FORWARD, Vec3::RIGHT), Vec3::UP);
    }

    #[test]
    fn test_angle() {
        let angle = Vec3::angle(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        assert!(approx_eq(angle, 90.0, 1e-3), "got {angle}");
        assert!(approx_eq(Vec3::angle(Vec3::UP, Vec3::DOWN), 180.0, 1e-3));
        assert_eq!(Vec3::angle(Vec3::UP, Vec3::UP * 5.0), 0.0);
        // non unit inputs are normalized first
        let angle = Vec3::angle(Vec3::new(10.0, 0.0, 0.0), Vec3::new(3.0, 3.0, 0.0));
        assert!(approx_eq(angle, 45.0, 1e-3), "got {angle}");
    }

    #[test]
    fn test_lerp() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(2.0, 4.0, 6.0);
        assert_eq!(Vec3::lerp(a, b, 0.0), a);
        assert_eq!(Vec3::lerp(a, b, 1.0), b);
        assert_eq!(Vec3::lerp(a, b, 0.5), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(Vec3::lerp(a, b, 2.0), b);
        assert_eq!(Vec3::lerp(a, b, -1.0), a);
    }

    #[test]
    fn test_lerp_unclamped_extrapolates() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 0.0, 0.0);
        assert_eq!(Vec3::lerp_unclamped(a, b, 2.0), Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(Vec3::lerp_unclamped(a, b, -0.5), Vec3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_clamp_magnitude() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        assert_eq!(Vec3::clamp_magnitude(v, 2.0), Vec3::new(1.2, 1.6, 0.0));
        assert_eq!(Vec3::clamp_magnitude(v, 5.0), v);
        assert_eq!(Vec3::clamp_magnitude(v, 10.0), v);
        for _ in 0..100 {
            let v = fake_signed(10.0);
            assert!(Vec3::clamp_magnitude(v, 1.5).magnitude() <= 1.5 + 1e-5);
        }
    }

    #[test]
    fn test_project() {
        let v = Vec3::new(2.0, 3.0, 4.0);
        assert_eq!(Vec3::project(v, Vec3::UP * 10.0), Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(Vec3::project(v, Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_reflect() {
        let incoming = Vec3::new(1.0, -1.0, 0.0);
        assert_eq!(Vec3::reflect(incoming, Vec3::UP), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_scale_min_max_set() {
        let mut v = Vec3::new(1.0, -2.0, 3.0);
        v.scale(Vec3::new(2.0, 2.0, -1.0));
        assert_eq!(v, Vec3::new(2.0, -4.0, -3.0));
        assert_eq!(Vec3::min(v, Vec3::ZERO), Vec3::new(0.0, -4.0, -3.0));
        assert_eq!(Vec3::max(v, Vec3::ZERO), Vec3::new(2.0, 0.0, 0.0));
        v.set(7.0, 8.0, 9.0);
        assert_eq!(v, Vec3::new(7.0, 8.0, 9.0));
    }

    #[test]
    fn test_conversions() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.to_vec2(), Vec2::new(1.0, 2.0));
        assert_eq!(v.to_vec3(), [1.0, 2.0, 3.0]);
        assert_eq!(Vec3::from([1.0, 2.0, 3.0]), v);
        assert_eq!(Vec3::from_vec2(Vec2::new(1.0, 2.0)), Vec3::from_xy(1.0, 2.0));
        let array: [f32; 3] = v.into();
        assert_eq!(array, [1.0, 2.0, 3.0]);
        assert_eq!(Vec4::from_point(v).xyz(), v);
        assert_eq!(Vec4::from_direction(v).w, 0.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Vec3::new(1.0, 2.5, -3.0).to_string(), "(1, 2.5, -3)");
        assert_eq!(Vec2::new(0.5, 1.0).to_string(), "(0.5, 1)");
    }

    #[test]
    fn test_json() -> serde_json::Result<()> {
        let v = Vec3::new(1.5, -2.0, 0.25);
        let json = serde_json::to_string(&v)?;
        assert_eq!(json, r#"{"x":1.5,"y":-2.0,"z":0.25}"#);
        let back: Vec3 = serde_json::from_str(&json)?;
        assert_eq!(back, v);
        Ok(())
    }

    #[test]
    fn test_vec4() {
        let a = Vec4::new(1.0, 2.0, 2.0, 4.0);
        assert_eq!(a.magnitude(), 5.0);
        assert_eq!(a + a, a * 2.0);
        assert_eq!(a - a, Vec4::ZERO);
        assert_ne!(Vec4::ZERO, Vec4::new(0.0, 0.0, 0.0, VECTOR_EPSILON));
    }
}
