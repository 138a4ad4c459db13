use std::collections::HashMap;

use crate::{error::Result, mesh::Mesh, types::Vector3Like};

/// Canonical identity of a lattice edge: the pair of lattice-point indices at
/// its ends, smallest first, so both cells sharing the edge build the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    lo: usize,
    hi: usize,
}

impl EdgeKey {
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    /// Endpoint with the smaller lattice index.
    #[inline]
    pub fn lo(&self) -> usize {
        self.lo
    }

    /// Endpoint with the larger lattice index.
    #[inline]
    pub fn hi(&self) -> usize {
        self.hi
    }
}

/// Merges edge crossings shared between neighbouring cells into single mesh
/// vertices.
///
/// The map lives for one polygonization. Its size is bounded by the number of
/// lattice edges (see [`Grid::lattice_edge_count`](crate::grid::Grid::lattice_edge_count));
/// callers needing bounded memory should size the grid accordingly.
#[derive(Debug, Default)]
pub struct VertexWelder {
    indices: HashMap<EdgeKey, u32>,
}

impl VertexWelder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the mesh vertex for `key`, appending `position()` to `mesh` the
    /// first time the edge is seen.
    #[inline]
    pub fn weld<V, F>(&mut self, key: EdgeKey, mesh: &mut Mesh<V>, position: F) -> Result<u32>
    where
        V: Vector3Like,
        F: FnOnce() -> V,
    {
        if let Some(&index) = self.indices.get(&key) {
            return Ok(index);
        }
        let index = mesh.push_vertex(position())?;
        self.indices.insert(key, index);
        Ok(index)
    }

    /// Vertex already assigned to `key`, if any.
    pub fn get(&self, key: &EdgeKey) -> Option<u32> {
        self.indices.get(key).copied()
    }

    /// Number of distinct edges welded so far.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    #[test]
    fn keys_are_order_independent() {
        assert_eq!(EdgeKey::new(3, 9), EdgeKey::new(9, 3));
        assert_eq!(EdgeKey::new(9, 3).lo(), 3);
        assert_eq!(EdgeKey::new(9, 3).hi(), 9);
        assert_ne!(EdgeKey::new(3, 9), EdgeKey::new(3, 10));
    }

    #[test]
    fn shared_edges_map_to_one_vertex() {
        let mut mesh = Mesh::new_empty();
        let mut welder = VertexWelder::new();
        assert!(welder.is_empty());

        let a = welder
            .weld(EdgeKey::new(0, 1), &mut mesh, || Point::new(0.5, 0., 0.))
            .unwrap();
        let b = welder
            .weld(EdgeKey::new(1, 0), &mut mesh, || panic!("edge already welded"))
            .unwrap();
        let c = welder
            .weld(EdgeKey::new(1, 2), &mut mesh, || Point::new(1., 0.5, 0.))
            .unwrap();

        assert_eq!(a, b);
        assert_eq!(c, 1);
        assert_eq!(mesh.vertices.len(), 2);
        assert_eq!(welder.len(), 2);
        assert_eq!(welder.get(&EdgeKey::new(2, 1)), Some(1));
    }
}
