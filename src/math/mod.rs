//! Math primitives
//!
//! This module provides the value types the rest of the crate is built on:
//! - Vectors (vec submodule)
//! - Rotations (quaternion submodule)
//! - Affine transforms (matrix submodule)
//! - Half-spaces (plane submodule)
//! - Shared numeric tolerances (tolerance submodule)

use std::error::Error;
use std::fmt::{Display, Formatter};

mod matrix;
mod plane;
mod quaternion;
pub mod tolerance;
mod vec;

pub use matrix::*;
pub use plane::*;
pub use quaternion::*;
pub use vec::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    /// Component, row or column access outside the valid range
    IndexOutOfRange { index: usize, len: usize },
    /// The matrix has a zero determinant
    NotInvertible { determinant: f32 },
}

impl Error for MathError {}

impl Display for MathError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MathError::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            MathError::NotInvertible { determinant } => {
                write!(f, "matrix is not invertible (determinant {determinant})")
            }
        }
    }
}

/// Bounds check shared by the indexed accessors
pub(crate) fn check_index(index: usize, len: usize) -> Result<usize, MathError> {
    if index < len {
        Ok(index)
    } else {
        Err(MathError::IndexOutOfRange { index, len })
    }
}
