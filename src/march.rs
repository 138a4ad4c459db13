use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info_span};

use crate::{
    classify::{CellCase, edge_corners},
    config::MarchConfig,
    error::Result,
    grid::Grid,
    interp::edge_crossing,
    mesh::Mesh,
    sampler::SampleLattice,
    types::{Value, Vector3Like},
    weld::{EdgeKey, VertexWelder},
};

/// An interpolated surface crossing on one lattice edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing<V> {
    pub key: EdgeKey,
    pub position: V,
}

/// Triangles of one z-slab of cells, as crossings not yet welded.
type Slab<V> = Vec<[Crossing<V>; 3]>;

/// Runs the marching cubes algorithm over a sampled lattice.
///
/// Cells are visited in row-major order (`x` fastest, then `y`, then `z`) and
/// vertices are numbered in the order their edge is first met, so the output
/// is stable for a given field, grid and iso level.
///
/// With [`MarchConfig::parallel`] each z-slab of cells is classified and
/// interpolated on Rayon's pool; the slabs are then welded in order, which
/// yields exactly the mesh the sequential pass produces.
///
/// ```text
/// Per cell:
/// 1. cell_corner_indices        →  8 lattice indices
/// 2. corner_values              →  8 scalar values
/// 3. CellCase::classify         →  256-entry case index + EDGE_TABLE mask
/// 4. CellCase::triangles        →  edge triples from TRI_TABLE
/// 5. crossing                   →  interpolated point per edge, keyed by lattice edge
/// 6. VertexWelder::weld         →  shared vertex index per edge
/// ```
pub fn polygonize<V: Vector3Like>(
    grid: &Grid<V>,
    lattice: &SampleLattice,
    config: &MarchConfig,
) -> Result<Mesh<V>> {
    let _span = info_span!("polygonize", cells = grid.cell_count()).entered();

    let [_, _, nz] = grid.resolution();
    let iso_level = config.iso_level;

    let mut mesh = Mesh::new_empty();
    let mut welder = VertexWelder::new();

    if config.parallel {
        let slabs: Vec<Slab<V>> = (0..nz - 1)
            .into_par_iter()
            .map(|z| march_slab(grid, lattice, z, iso_level))
            .collect();
        for slab in slabs {
            weld_slab(&mut mesh, &mut welder, slab)?;
        }
    } else {
        for z in 0..nz - 1 {
            weld_slab(&mut mesh, &mut welder, march_slab(grid, lattice, z, iso_level))?;
        }
    }

    debug!(
        vertices = mesh.vertices.len(),
        triangles = mesh.triangles.len(),
        "polygonized lattice"
    );
    Ok(mesh)
}

/// Classifies and interpolates every cell with lower z index `z`.
fn march_slab<V: Vector3Like>(
    grid: &Grid<V>,
    lattice: &SampleLattice,
    z: usize,
    iso_level: Value,
) -> Slab<V> {
    let [nx, ny, _] = grid.resolution();
    let mut local: Slab<V> = Vec::new();

    for y in 0..ny - 1 {
        for x in 0..nx - 1 {
            let corners = grid.cell_corner_indices(x, y, z);
            let case = CellCase::classify(&lattice.corner_values(&corners), iso_level);
            if case.is_uniform() {
                continue;
            }

            local.extend(case.triangles().map(|tri| {
                tri.map(|edge| {
                    let [a, b] = edge_corners(edge);
                    crossing(grid, lattice, EdgeKey::new(corners[a], corners[b]), iso_level)
                })
            }));
        }
    }

    local
}

/// Interpolates the crossing on lattice edge `key`.
///
/// Always walks the edge from its lower to its higher lattice index, so every
/// cell sharing the edge computes a bit-identical position.
#[inline]
pub fn crossing<V: Vector3Like>(
    grid: &Grid<V>,
    lattice: &SampleLattice,
    key: EdgeKey,
    iso_level: Value,
) -> Crossing<V> {
    let position = edge_crossing(
        grid.point_at_index(key.lo()),
        grid.point_at_index(key.hi()),
        lattice.value(key.lo()),
        lattice.value(key.hi()),
        iso_level,
    );
    Crossing { key, position }
}

fn weld_slab<V: Vector3Like>(
    mesh: &mut Mesh<V>,
    welder: &mut VertexWelder,
    slab: Slab<V>,
) -> Result<()> {
    for [a, b, c] in slab {
        let ia = welder.weld(a.key, mesh, || a.position)?;
        let ib = welder.weld(b.key, mesh, || b.position)?;
        let ic = welder.weld(c.key, mesh, || c.position)?;
        mesh.triangle_from_verts(ia, ib, ic)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{sampler::sample, types::Point};

    fn run(resolution: [usize; 3], field: impl Fn(Point) -> Value + Sync, parallel: bool) -> Mesh {
        let grid = Grid::new(
            resolution,
            Point::new(-1., -1., -1.),
            Point::new(1., 1., 1.),
        )
        .unwrap();
        let config = MarchConfig::default().with_parallel(parallel);
        let lattice = sample(&grid, &field, &config).unwrap();
        polygonize(&grid, &lattice, &config).unwrap()
    }

    #[test]
    fn plane_through_single_cell_is_one_quad() {
        let mesh = run([2, 2, 2], |p| p.y, false);

        assert_eq!(mesh.triangles.len(), 2);
        assert_eq!(mesh.vertices.len(), 4);
        for v in &mesh.vertices {
            assert_relative_eq!(v.y, 0.);
            assert_relative_eq!(v.x.abs(), 1.);
            assert_relative_eq!(v.z.abs(), 1.);
        }
        for tri in 0..mesh.triangles.len() {
            assert_relative_eq!(mesh.tri_normal(tri).y, 1.);
        }
    }

    #[test]
    fn uniform_fields_produce_nothing() {
        assert!(run([4, 4, 4], |_| 1., true).vertices.is_empty());
        assert!(run([4, 4, 4], |_| -1., true).vertices.is_empty());
    }

    #[test]
    fn parallel_matches_sequential() {
        let field = |p: Point| (p.x * 3.1).sin() + (p.y * 2.3).cos() * p.z - 0.2;
        let a = run([9, 7, 11], field, true);
        let b = run([9, 7, 11], field, false);
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn crossings_are_symmetric_in_the_edge() {
        let grid = Grid::new([3, 3, 3], Point::new(0., 0., 0.), Point::new(2., 2., 2.)).unwrap();
        let lattice = sample(&grid, &|p: Point| p.x - 0.3, &MarchConfig::default()).unwrap();
        let a = grid.lattice_index(0, 1, 1);
        let b = grid.lattice_index(1, 1, 1);

        let forward = crossing(&grid, &lattice, EdgeKey::new(a, b), 0.);
        let backward = crossing(&grid, &lattice, EdgeKey::new(b, a), 0.);
        assert_eq!(forward, backward);
        assert_relative_eq!(forward.position, Point::new(0.3, 1., 1.), epsilon = 1e-6);
    }

    #[test]
    fn nan_region_is_treated_as_outside() {
        let mesh = run([5, 5, 5], |p| if p.x > 0.2 { Value::NAN } else { -1. }, false);
        assert!(!mesh.is_empty());
        assert!(
            mesh.vertices
                .iter()
                .all(|v| v.x.is_finite() && v.y.is_finite() && v.z.is_finite())
        );
    }
}
