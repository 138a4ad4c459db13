use crate::{
    error::{GridError, Result},
    tables::CORNER_OFFSETS,
    types::{Point, Value, Vector3Like},
};

/// The sampling domain of one `march` invocation.
///
/// The grid has `resolution[0] × resolution[1] × resolution[2]` lattice points
/// and `(resolution[0] - 1) × (resolution[1] - 1) × (resolution[2] - 1)` cells.
/// Lattice point `(x, y, z)` sits at `min + (x, y, z) * cell_size` and has the
/// linear index `x + nx * (y + ny * z)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid<V = Point> {
    resolution: [usize; 3],
    min: V,
    max: V,
    cell_size: [Value; 3],
}

impl<V: Vector3Like> Grid<V> {
    /// Creates a grid, rejecting resolutions below 2 and bounds that are not
    /// strictly increasing on every axis.
    pub fn new(resolution: [usize; 3], min: V, max: V) -> Result<Self> {
        let mut cell_size = [0.; 3];
        for axis in 0..3 {
            let count = resolution[axis];
            if count < 2 {
                return Err(GridError::ResolutionTooSmall { axis, count }.into());
            }

            let (lo, hi) = (min.axis(axis), max.axis(axis));
            if !lo.is_finite() || !hi.is_finite() {
                return Err(GridError::NonFiniteBounds { axis }.into());
            }
            if hi <= lo {
                return Err(GridError::InvertedBounds {
                    axis,
                    min: lo,
                    max: hi,
                }
                .into());
            }

            cell_size[axis] = (hi - lo) / (count - 1) as Value;
        }

        Ok(Self {
            resolution,
            min,
            max,
            cell_size,
        })
    }

    /// Lattice points per axis.
    pub fn resolution(&self) -> [usize; 3] {
        self.resolution
    }

    pub fn min(&self) -> V {
        self.min
    }

    pub fn max(&self) -> V {
        self.max
    }

    /// World-space size of a cell along each axis.
    pub fn cell_size(&self) -> [Value; 3] {
        self.cell_size
    }

    /// Total number of lattice points.
    pub fn point_count(&self) -> usize {
        self.resolution.iter().product()
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.resolution.iter().map(|n| n - 1).product()
    }

    /// Number of lattice edges, which bounds the number of distinct crossings.
    pub fn lattice_edge_count(&self) -> usize {
        let [nx, ny, nz] = self.resolution;
        (nx - 1) * ny * nz + nx * (ny - 1) * nz + nx * ny * (nz - 1)
    }

    /// Linear index of lattice point `(x, y, z)`.
    #[inline]
    pub fn lattice_index(&self, x: usize, y: usize, z: usize) -> usize {
        let [nx, ny, _] = self.resolution;
        x + nx * (y + ny * z)
    }

    /// Inverse of [`lattice_index`](Grid::lattice_index).
    #[inline]
    pub fn lattice_coords(&self, index: usize) -> [usize; 3] {
        let [nx, ny, _] = self.resolution;
        [index % nx, (index / nx) % ny, index / (nx * ny)]
    }

    /// World-space position of lattice point `(x, y, z)`.
    ///
    /// The last point on each axis is pinned to `max` so the sampled box
    /// matches the requested bounds exactly.
    #[inline]
    pub fn point_at(&self, x: usize, y: usize, z: usize) -> V {
        let coord = |axis: usize, i: usize| {
            if i + 1 == self.resolution[axis] {
                self.max.axis(axis)
            } else {
                self.min.axis(axis) + i as Value * self.cell_size[axis]
            }
        };
        V::from_xyz(coord(0, x), coord(1, y), coord(2, z))
    }

    /// World-space position of the lattice point with linear index `index`.
    #[inline]
    pub fn point_at_index(&self, index: usize) -> V {
        let [x, y, z] = self.lattice_coords(index);
        self.point_at(x, y, z)
    }

    /// Returns the lattice indices of the 8 corners of cell `(x, y, z)`.
    ///
    /// Corners are ordered to match the standard marching cubes convention:
    ///
    /// ```text
    ///     7----6          Y
    ///    /|   /|          |
    ///   3----2 |          *-- X
    ///   | 4--|-5         /
    ///   |/   |/         Z
    ///   0----1
    ///
    ///  0 = (x,   y,   z  )    4 = (x,   y,   z+1)
    ///  1 = (x+1, y,   z  )    5 = (x+1, y,   z+1)
    ///  2 = (x+1, y+1, z  )    6 = (x+1, y+1, z+1)
    ///  3 = (x,   y+1, z  )    7 = (x,   y+1, z+1)
    /// ```
    #[inline]
    pub fn cell_corner_indices(&self, x: usize, y: usize, z: usize) -> [usize; 8] {
        CORNER_OFFSETS.map(|[dx, dy, dz]| self.lattice_index(x + dx, y + dy, z + dz))
    }
}
