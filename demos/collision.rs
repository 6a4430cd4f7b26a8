//! Slides one box through another and reports on which steps they collide.
//!
//! Run with `RUST_LOG=debug` to see the grid setup.

use log::info;
use std::error::Error;
use tinymath::math::{Matrix4x4, Quaternion, Vec3};
use tinymath::voxel::{SamplerOptions, TriangleMesh, VoxelGrid};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = SamplerOptions::new()
        .size(Vec3::new(10.0, 4.0, 4.0))
        .spacing(0.1);
    let grid = VoxelGrid::new(options)?;
    info!("Sampling {} grid points", grid.len());

    let fixed = TriangleMesh::cube(Vec3::ZERO, 1.0);
    let mut moving = TriangleMesh::cube(Vec3::ZERO, 0.5);

    for step in 0..=10 {
        let x = -4.0 + step as f32 * 0.8;
        let rotation = Quaternion::euler(0.0, step as f32 * 9.0, 0.0);
        moving.set_transform(Matrix4x4::trs(Vec3::new(x, 0.3, 0.0), rotation, Vec3::ONE));

        let overlap = grid.overlap(&fixed, &moving);
        if overlap.is_empty() {
            println!("x = {x:>5.2}: apart");
        } else {
            println!("x = {x:>5.2}: colliding, {} shared points", overlap.len());
        }
    }
    Ok(())
}
