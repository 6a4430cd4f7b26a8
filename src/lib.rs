//!
//! Tinymath is a small 3D math library for games and tools.
//!
//! It provides the value types needed to place things in space: vectors, quaternions, 4x4 transform matrices and planes.
//!
//! On top of those, the voxel module implements a brute force collision sampler that classifies the points of a regular grid as inside or outside of triangle meshes.

pub mod math;

pub mod voxel;
