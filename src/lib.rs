//! Isosurface polygonization of implicit scalar fields.
//!
//! A field maps a point to a signed value (negative inside a solid, positive
//! outside). [`march`] samples it over an axis-aligned box, runs Marching
//! Cubes over the sampled cells, welds shared edge crossings into an indexed
//! mesh and writes the result as a text geometry file.
//!
//! ```rust,no_run
//! use isomesh::types::Point;
//!
//! let sphere = |p: Point| p.coords.norm() - 1.0;
//! isomesh::march(
//!     [33, 33, 33],
//!     Point::new(-2.0, -2.0, -2.0),
//!     Point::new(2.0, 2.0, 2.0),
//!     "sphere.obj",
//!     sphere,
//! )?;
//! # Ok::<(), isomesh::error::MarchingCubesError>(())
//! ```

use std::path::Path;

pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod interp;
pub mod march;
pub mod mesh;
pub mod sampler;
pub mod tables;
pub mod types;
pub mod weld;

#[cfg(feature = "bevy")]
pub mod bevy_mesh;

pub use config::MarchConfig;
pub use error::{MarchingCubesError, Result};
pub use export::MeshFormat;
pub use grid::Grid;
pub use mesh::Mesh;
pub use types::{Value, Vector3Like};

/// Polygonizes `field` over the box `min..max` and writes the mesh to `path`.
///
/// `resolution` is the number of sample points per axis (at least 2 each).
/// Uses [`MarchConfig::default`]; the output format follows the path's
/// extension.
///
/// Fails with [`MarchingCubesError::InvalidGrid`] before sampling if the
/// resolution or bounds are bad, and with [`MarchingCubesError::Io`] if the
/// file cannot be written, in which case no file is left behind.
pub fn march<V, F>(
    resolution: [usize; 3],
    min: V,
    max: V,
    path: impl AsRef<Path>,
    field: F,
) -> Result<()>
where
    V: Vector3Like,
    F: Fn(V) -> Value + Sync,
{
    march_with(&MarchConfig::default(), resolution, min, max, path, field)
}

/// Like [`march`], with explicit configuration.
pub fn march_with<V, F>(
    config: &MarchConfig,
    resolution: [usize; 3],
    min: V,
    max: V,
    path: impl AsRef<Path>,
    field: F,
) -> Result<()>
where
    V: Vector3Like,
    F: Fn(V) -> Value + Sync,
{
    let path = path.as_ref();
    let grid = Grid::new(resolution, min, max)?;
    let mesh = march_mesh(config, &grid, &field)?;
    let format = config.format.unwrap_or_else(|| MeshFormat::from_path(path));
    export::save(&mesh, path, format)
}

/// Polygonizes `field` over `grid` without touching the filesystem.
pub fn march_mesh<V, F>(config: &MarchConfig, grid: &Grid<V>, field: &F) -> Result<Mesh<V>>
where
    V: Vector3Like,
    F: Fn(V) -> Value + Sync + ?Sized,
{
    let lattice = sampler::sample(grid, field, config)?;
    march::polygonize(grid, &lattice, config)
}
