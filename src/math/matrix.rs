//! 4x4 transform matrices
//!
//! Matrices use column vectors: `(A * B) * v == A * (B * v)`, so in a product
//! the right-hand transformation is applied first.
//!
//! Storage is column-major, element `(row, col)` lives at `row + col * 4`:
//! ```text
//! [ m00 m01 m02 m03 ]   [ 0  4  8 12 ]
//! [ m10 m11 m12 m13 ] = [ 1  5  9 13 ]
//! [ m20 m21 m22 m23 ]   [ 2  6 10 14 ]
//! [ m30 m31 m32 m33 ]   [ 3  7 11 15 ]
//! ```
//!
//! For an affine transform the upper-left 3x3 block holds rotation and scale,
//! the last column holds the translation and the last row is `(0, 0, 0, 1)`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut, Mul};

use super::{MathError, Quaternion, Vec3, Vec4, check_index};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Matrix4x4([f32; 16]);

impl Default for Matrix4x4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4x4 {
    pub const ZERO: Self = Self([0.0; 16]);

    #[rustfmt::skip]
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]);

    /// Create a matrix from its 16 elements in column-major order
    pub const fn from_cols_array(m: [f32; 16]) -> Self {
        Self(m)
    }

    pub const fn to_cols_array(&self) -> [f32; 16] {
        self.0
    }

    pub fn from_columns(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        #[rustfmt::skip]
        let m = [
            c0.x, c0.y, c0.z, c0.w,
            c1.x, c1.y, c1.z, c1.w,
            c2.x, c2.y, c2.z, c2.w,
            c3.x, c3.y, c3.z, c3.w,
        ];
        Self(m)
    }

    #[inline]
    fn m(&self, row: usize, col: usize) -> f32 {
        self.0[row + col * 4]
    }

    #[inline]
    fn m_mut(&mut self, row: usize, col: usize) -> &mut f32 {
        &mut self.0[row + col * 4]
    }

    /// Element by flat index, `row + col * 4`
    pub fn get(&self, index: usize) -> Result<f32, MathError> {
        check_index(index, 16).map(|i| self.0[i])
    }

    pub fn set(&mut self, index: usize, value: f32) -> Result<(), MathError> {
        let i = check_index(index, 16)?;
        self.0[i] = value;
        Ok(())
    }

    pub fn get_at(&self, row: usize, col: usize) -> Result<f32, MathError> {
        check_index(row, 4)?;
        check_index(col, 4)?;
        Ok(self.m(row, col))
    }

    pub fn set_at(&mut self, row: usize, col: usize, value: f32) -> Result<(), MathError> {
        check_index(row, 4)?;
        check_index(col, 4)?;
        *self.m_mut(row, col) = value;
        Ok(())
    }

    pub fn get_column(&self, index: usize) -> Result<Vec4, MathError> {
        let c = check_index(index, 4)?;
        Ok(Vec4::new(
            self.m(0, c),
            self.m(1, c),
            self.m(2, c),
            self.m(3, c),
        ))
    }

    pub fn get_row(&self, index: usize) -> Result<Vec4, MathError> {
        let r = check_index(index, 4)?;
        Ok(Vec4::new(
            self.m(r, 0),
            self.m(r, 1),
            self.m(r, 2),
            self.m(r, 3),
        ))
    }

    pub fn set_column(&mut self, index: usize, column: Vec4) -> Result<(), MathError> {
        let c = check_index(index, 4)?;
        *self.m_mut(0, c) = column.x;
        *self.m_mut(1, c) = column.y;
        *self.m_mut(2, c) = column.z;
        *self.m_mut(3, c) = column.w;
        Ok(())
    }

    pub fn set_row(&mut self, index: usize, row: Vec4) -> Result<(), MathError> {
        let r = check_index(index, 4)?;
        *self.m_mut(r, 0) = row.x;
        *self.m_mut(r, 1) = row.y;
        *self.m_mut(r, 2) = row.z;
        *self.m_mut(r, 3) = row.w;
        Ok(())
    }

    /// Exact comparison against the identity matrix
    pub fn is_identity(&self) -> bool {
        self.0 == Self::IDENTITY.0
    }

    /// Create a non-uniform scale matrix
    pub fn scale(scale: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        *m.m_mut(0, 0) = scale.x;
        *m.m_mut(1, 1) = scale.y;
        *m.m_mut(2, 2) = scale.z;
        m
    }

    /// Create a translation matrix
    pub fn translate(translation: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        *m.m_mut(0, 3) = translation.x;
        *m.m_mut(1, 3) = translation.y;
        *m.m_mut(2, 3) = translation.z;
        m
    }

    /// Create a rotation matrix from a (unit) quaternion
    pub fn rotate(q: Quaternion) -> Self {
        let (x, y, z, w) = (q.x(), q.y(), q.z(), q.w());
        let (x2, y2, z2) = (x * 2.0, y * 2.0, z * 2.0);
        let (xx, yy, zz) = (x * x2, y * y2, z * z2);
        let (xy, xz, yz) = (x * y2, x * z2, y * z2);
        let (wx, wy, wz) = (w * x2, w * y2, w * z2);

        #[rustfmt::skip]
        let m = [
            1.0 - (yy + zz), xy + wz, xz - wy, 0.0,
            xy - wz, 1.0 - (xx + zz), yz + wx, 0.0,
            xz + wy, yz - wx, 1.0 - (xx + yy), 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        Self(m)
    }

    /// Translation * rotation * scale: scales first, then rotates, then translates
    pub fn trs(position: Vec3, rotation: Quaternion, scale: Vec3) -> Self {
        let mut m = Self::rotate(rotation);
        for (col, s) in [scale.x, scale.y, scale.z].into_iter().enumerate() {
            for row in 0..3 {
                *m.m_mut(row, col) *= s;
            }
        }
        *m.m_mut(0, 3) = position.x;
        *m.m_mut(1, 3) = position.y;
        *m.m_mut(2, 3) = position.z;
        m
    }

    pub fn set_trs(&mut self, position: Vec3, rotation: Quaternion, scale: Vec3) {
        *self = Self::trs(position, rotation, scale);
    }

    /// The translation column
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.m(0, 3), self.m(1, 3), self.m(2, 3))
    }

    /// Determinant of the 3x3 matrix left after removing `row` and `col`
    fn minor(&self, row: usize, col: usize) -> f32 {
        let mut n = [0.0f32; 9];
        let mut i = 0;
        for c in (0..4).filter(|&c| c != col) {
            for r in (0..4).filter(|&r| r != row) {
                n[i] = self.m(r, c);
                i += 1;
            }
        }
        // n is column-major 3x3
        n[0] * (n[4] * n[8] - n[7] * n[5]) - n[3] * (n[1] * n[8] - n[7] * n[2])
            + n[6] * (n[1] * n[5] - n[4] * n[2])
    }

    fn cofactor(&self, row: usize, col: usize) -> f32 {
        let minor = self.minor(row, col);
        if (row + col) % 2 == 0 { minor } else { -minor }
    }

    /// Cofactor expansion along the first column
    pub fn determinant(&self) -> f32 {
        (0..4).map(|r| self.m(r, 0) * self.cofactor(r, 0)).sum()
    }

    /// Whether the matrix can be inverted, i.e. its determinant is not zero
    pub fn valid_trs(&self) -> bool {
        self.determinant() != 0.0
    }

    /// Adjugate divided by the determinant
    pub fn inverse(&self) -> Result<Self, MathError> {
        let determinant = self.determinant();
        if determinant == 0.0 {
            return Err(MathError::NotInvertible { determinant });
        }
        let mut inverse = Self::ZERO;
        for row in 0..4 {
            for col in 0..4 {
                *inverse.m_mut(row, col) = self.cofactor(col, row) / determinant;
            }
        }
        Ok(inverse)
    }

    pub fn transpose(&self) -> Self {
        let mut result = Self::ZERO;
        for row in 0..4 {
            for col in 0..4 {
                *result.m_mut(row, col) = self.m(col, row);
            }
        }
        result
    }

    /// Transform a point with the full matrix, including the perspective divide
    pub fn multiply_point(&self, point: Vec3) -> Vec3 {
        let result = self.multiply_point3x4(point);
        let w = self.m(3, 0) * point.x
            + self.m(3, 1) * point.y
            + self.m(3, 2) * point.z
            + self.m(3, 3);
        result * (1.0 / w)
    }

    /// Transform a point by the affine part only: the last row is ignored
    pub fn multiply_point3x4(&self, point: Vec3) -> Vec3 {
        self.multiply_vector(point) + self.position()
    }

    /// Transform a direction: no translation, no perspective
    pub fn multiply_vector(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.m(0, 0) * v.x + self.m(0, 1) * v.y + self.m(0, 2) * v.z,
            self.m(1, 0) * v.x + self.m(1, 1) * v.y + self.m(1, 2) * v.z,
            self.m(2, 0) * v.x + self.m(2, 1) * v.y + self.m(2, 2) * v.z,
        )
    }

    /// Rotation part of a TRS matrix.
    ///
    /// Rebuilt from the forward and up columns, so shear and other non-TRS
    /// transforms do not decompose faithfully.
    pub fn rotation(&self) -> Quaternion {
        let forward = Vec3::new(self.m(0, 2), self.m(1, 2), self.m(2, 2)).normalized();
        let up = Vec3::new(self.m(0, 1), self.m(1, 1), self.m(2, 1)).normalized();
        Quaternion::look_rotation(forward, up)
    }

    /// Per-axis scale of a TRS matrix, the lengths of the first three columns.
    /// Negative scales come back positive.
    pub fn lossy_scale(&self) -> Vec3 {
        let column_length = |c: usize| {
            Vec4::new(self.m(0, c), self.m(1, c), self.m(2, c), self.m(3, c)).magnitude()
        };
        Vec3::new(column_length(0), column_length(1), column_length(2))
    }
}

/// Column by column, using the approximate [`Vec4`] equality
impl PartialEq for Matrix4x4 {
    fn eq(&self, other: &Self) -> bool {
        (0..4).all(|c| self.get_column(c).ok() == other.get_column(c).ok())
    }
}

impl fmt::Display for Matrix4x4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..4 {
            writeln!(
                f,
                "{:.5}\t{:.5}\t{:.5}\t{:.5}",
                self.m(row, 0),
                self.m(row, 1),
                self.m(row, 2),
                self.m(row, 3)
            )?;
        }
        Ok(())
    }
}

impl Index<usize> for Matrix4x4 {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        match self.0.get(index) {
            Some(value) => value,
            None => panic!("{}", MathError::IndexOutOfRange { index, len: 16 }),
        }
    }
}

impl IndexMut<usize> for Matrix4x4 {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        match self.0.get_mut(index) {
            Some(value) => value,
            None => panic!("{}", MathError::IndexOutOfRange { index, len: 16 }),
        }
    }
}

/// Element at `(row, col)`
impl Index<(usize, usize)> for Matrix4x4 {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        if let Err(e) = check_index(row, 4).and(check_index(col, 4)) {
            panic!("{e}");
        }
        &self.0[row + col * 4]
    }
}

impl IndexMut<(usize, usize)> for Matrix4x4 {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
        if let Err(e) = check_index(row, 4).and(check_index(col, 4)) {
            panic!("{e}");
        }
        self.m_mut(row, col)
    }
}

/// Matrix multiplication (`A * B` means B is applied first, then A)
impl Mul for Matrix4x4 {
    type Output = Matrix4x4;

    fn mul(self, rhs: Matrix4x4) -> Matrix4x4 {
        &self * &rhs
    }
}

impl Mul for &Matrix4x4 {
    type Output = Matrix4x4;

    fn mul(self, rhs: &Matrix4x4) -> Matrix4x4 {
        let mut result = Matrix4x4::ZERO;
        for row in 0..4 {
            for col in 0..4 {
                *result.m_mut(row, col) = (0..4).map(|k| self.m(row, k) * rhs.m(k, col)).sum();
            }
        }
        result
    }
}

impl Mul<Vec4> for Matrix4x4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Vec4 {
        let row = |r: usize| {
            self.m(r, 0) * v.x + self.m(r, 1) * v.y + self.m(r, 2) * v.z + self.m(r, 3) * v.w
        };
        Vec4::new(row(0), row(1), row(2), row(3))
    }
}
