//! Meshes a torus and writes it to `torus.obj` (or the path given as the
//! first argument).
//!
//! ```text
//! RUST_LOG=debug cargo run --example torus -- torus.stl
//! ```

use isomesh::{MarchConfig, types::Point};
use nalgebra::Vector2;

fn sd_torus(p: Point, major: f32, minor: f32) -> f32 {
    let q = Vector2::new(Vector2::new(p.x, p.y).norm() - major, p.z);
    q.norm() - minor
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "torus.obj".into());
    let config = MarchConfig::default();

    isomesh::march_with(
        &config,
        [96, 96, 48],
        Point::new(-0.6, -0.6, -0.2),
        Point::new(0.6, 0.6, 0.2),
        &path,
        |p: Point| sd_torus(p, 0.37, 0.1),
    )?;

    log::info!("torus written to {path}");
    Ok(())
}
