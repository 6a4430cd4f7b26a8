//! Voxel-grid collision sampling
//!
//! A [`VoxelGrid`] is a fixed lattice of points. Sampling a [`TriangleMesh`]
//! classifies every lattice point as inside or outside the mesh with a ray
//! parity test, two meshes collide when at least one lattice point is inside
//! both of them.
//!
//! Sampling is brute force, every point against every triangle. With the
//! `parallel` feature the points are classified on the rayon thread pool.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use tracing::instrument;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::math::Vec3;

mod mesh;

pub use mesh::*;

/// Upper bound on the number of points in a [`VoxelGrid`]
pub const MAX_GRID_POINTS: usize = 1 << 27;

#[derive(Debug, Clone, PartialEq)]
pub enum SampleError {
    /// The spacing between grid points must be finite and strictly positive
    InvalidSpacing(f32),
    /// The grid size must be finite and not negative on every axis
    InvalidSize(Vec3),
    /// The grid center must be finite
    InvalidCenter(Vec3),
    /// The options describe more than [`MAX_GRID_POINTS`] points
    GridTooLarge { points: f64 },
    /// A triangle refers to a vertex that does not exist
    IndexOutOfBounds { index: usize, vertex_count: usize },
    /// The index list does not describe whole triangles
    IncompleteTriangle { index_count: usize },
}

impl Error for SampleError {}

impl Display for SampleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleError::InvalidSpacing(spacing) => {
                write!(f, "invalid grid spacing {spacing}, must be positive")
            }
            SampleError::InvalidSize(size) => {
                write!(f, "invalid grid size {size}, must not be negative")
            }
            SampleError::InvalidCenter(center) => write!(f, "invalid grid center {center}"),
            SampleError::GridTooLarge { points } => write!(
                f,
                "grid of {points} points exceeds the limit of {MAX_GRID_POINTS}"
            ),
            SampleError::IndexOutOfBounds {
                index,
                vertex_count,
            } => write!(
                f,
                "vertex index {index} out of bounds for {vertex_count} vertices"
            ),
            SampleError::IncompleteTriangle { index_count } => write!(
                f,
                "index count {index_count} is not a multiple of 3"
            ),
        }
    }
}

/// Configuration of a [`VoxelGrid`].
///
/// # Examples
///
/// ```
/// use tinymath::math::Vec3;
/// use tinymath::voxel::SamplerOptions;
///
/// // 10 x 10 x 10 units around the origin, a point every 0.1 units
/// let options = SamplerOptions::new();
///
/// let options = SamplerOptions::new()
///     .center(Vec3::new(0.0, 1.0, 0.0))
///     .size(Vec3::ONE * 2.0)
///     .spacing(0.25);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerOptions {
    center: Vec3,
    size: Vec3,
    spacing: f32,
}

impl SamplerOptions {
    /// Creates options with default settings.
    ///
    /// Defaults:
    /// - `center`: the origin
    /// - `size`: 10 units on every axis
    /// - `spacing`: 0.1
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the center of the sampled box.
    pub fn center(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }

    /// Sets the extent of the sampled box on each axis.
    pub fn size(mut self, size: Vec3) -> Self {
        self.size = size;
        self
    }

    /// Sets the distance between neighbouring grid points.
    pub fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn get_center(&self) -> Vec3 {
        self.center
    }

    pub fn get_size(&self) -> Vec3 {
        self.size
    }

    pub fn get_spacing(&self) -> f32 {
        self.spacing
    }

    pub fn validate(&self) -> Result<(), SampleError> {
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(SampleError::InvalidSpacing(self.spacing));
        }
        let size = [self.size.x, self.size.y, self.size.z];
        if size.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Err(SampleError::InvalidSize(self.size));
        }
        let center = [self.center.x, self.center.y, self.center.z];
        if center.iter().any(|c| !c.is_finite()) {
            return Err(SampleError::InvalidCenter(self.center));
        }
        let points: f64 = self.axis_counts().iter().product();
        if points > MAX_GRID_POINTS as f64 {
            return Err(SampleError::GridTooLarge { points });
        }
        Ok(())
    }

    /// Number of grid points along each axis, in f64 so huge grids can not overflow
    fn axis_counts(&self) -> [f64; 3] {
        let spacing = f64::from(self.spacing);
        [self.size.x, self.size.y, self.size.z].map(|s| (f64::from(s) / spacing).round() + 1.0)
    }

    /// Number of grid points along each axis, only meaningful for validated options
    fn counts(&self) -> [usize; 3] {
        self.axis_counts().map(|n| n as usize)
    }
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            size: Vec3::new(10.0, 10.0, 10.0),
            spacing: 0.1,
        }
    }
}

/// An immutable lattice of sample points
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    options: SamplerOptions,
    counts: [usize; 3],
    points: Vec<Vec3>,
}

impl VoxelGrid {
    /// Builds the lattice: `round(size / spacing) + 1` points per axis,
    /// starting at `center - size / 2`.
    ///
    /// Points are ordered with x varying slowest and z fastest.
    #[instrument]
    pub fn new(options: SamplerOptions) -> Result<Self, SampleError> {
        if let Err(e) = options.validate() {
            warn!("Rejecting voxel grid options: {e}");
            return Err(e);
        }
        let counts = options.counts();
        let start = options.center - options.size * 0.5;
        let spacing = options.spacing;

        let mut points = Vec::with_capacity(counts.iter().product());
        for i in 0..counts[0] {
            for j in 0..counts[1] {
                for k in 0..counts[2] {
                    points.push(start + Vec3::new(i as f32, j as f32, k as f32) * spacing);
                }
            }
        }
        debug!(
            "Voxel grid of {}x{}x{} = {} points",
            counts[0],
            counts[1],
            counts[2],
            points.len()
        );
        Ok(Self {
            options,
            counts,
            points,
        })
    }

    pub fn options(&self) -> &SamplerOptions {
        &self.options
    }

    /// Number of points along x, y and z
    pub fn dimensions(&self) -> [usize; 3] {
        self.counts
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at lattice coordinates `(i, j, k)`
    pub fn point(&self, i: usize, j: usize, k: usize) -> Option<Vec3> {
        let [nx, ny, nz] = self.counts;
        if i >= nx || j >= ny || k >= nz {
            return None;
        }
        self.points.get((i * ny + j) * nz + k).copied()
    }

    /// Grid points inside `mesh`, in grid order
    #[instrument(
        skip(self, mesh),
        fields(points = self.points.len(), triangles = mesh.triangle_count())
    )]
    pub fn sample(&self, mesh: &TriangleMesh) -> Vec<Vec3> {
        let triangles = mesh.world_triangles();
        self.filter_points(|p| contains_point(&triangles, p))
    }

    /// Grid points inside both meshes, in grid order
    #[instrument(skip(self, a, b), fields(points = self.points.len()))]
    pub fn overlap(&self, a: &TriangleMesh, b: &TriangleMesh) -> Vec<Vec3> {
        let triangles_a = a.world_triangles();
        let triangles_b = b.world_triangles();
        self.filter_points(|p| contains_point(&triangles_a, p) && contains_point(&triangles_b, p))
    }

    /// Whether any grid point lies inside both meshes
    pub fn collides(&self, a: &TriangleMesh, b: &TriangleMesh) -> bool {
        !self.overlap(a, b).is_empty()
    }

    fn filter_points<F>(&self, inside: F) -> Vec<Vec3>
    where
        F: Fn(Vec3) -> bool + Sync,
    {
        #[cfg(feature = "parallel")]
        let selected: Vec<Vec3> = self.points.par_iter().copied().filter(|p| inside(*p)).collect();

        #[cfg(not(feature = "parallel"))]
        let selected: Vec<Vec3> = self.points.iter().copied().filter(|p| inside(*p)).collect();

        selected
    }
}
