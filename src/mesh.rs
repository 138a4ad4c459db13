use std::collections::HashMap;

use crate::{
    error::{MarchingCubesError, Result},
    types::{Point, Vector, Vector3Like, to_vector},
};

/// Indexed triangle mesh produced by the marching cubes algorithm.
///
/// Vertices are unique and kept in first-seen order. Each triangle is a triple
/// of indices into `vertices`, wound counter-clockwise when seen from the
/// outside (positive) side of the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh<V = Point> {
    /// Vertex positions.
    pub vertices: Vec<V>,

    /// Triangle index triples into `vertices`: `[[v0, v1, v2], ...]`
    pub triangles: Vec<[u32; 3]>,
}

impl<V> Default for Mesh<V> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
        }
    }
}

impl<V: Vector3Like> Mesh<V> {
    /// Creates an empty mesh with no vertices or triangles.
    pub fn new_empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Appends a vertex and returns its index.
    pub fn push_vertex(&mut self, vertex: V) -> Result<u32> {
        let index = u32::try_from(self.vertices.len()).map_err(|_| {
            MarchingCubesError::InvalidIndex {
                index: self.vertices.len(),
                len: u32::MAX as usize,
            }
        })?;
        self.vertices.push(vertex);
        Ok(index)
    }

    /// Adds a triangle defined by three vertex indices.
    ///
    /// Returns [`MarchingCubesError::InvalidIndex`] if any index is out of bounds.
    pub fn triangle_from_verts(&mut self, a: u32, b: u32, c: u32) -> Result<()> {
        let max = a.max(b.max(c)) as usize;
        if self.vertices.len() <= max {
            return Err(MarchingCubesError::InvalidIndex {
                index: max,
                len: self.vertices.len(),
            });
        }
        self.triangles.push([a, b, c]);
        Ok(())
    }

    /// Returns the three vertex positions of triangle `tri`.
    pub fn tri_coords(&self, tri: usize) -> [V; 3] {
        self.triangles[tri].map(|i| self.vertices[i as usize])
    }

    /// Computes the unit face normal for triangle `tri`.
    ///
    /// Returns the zero vector if the triangle is degenerate.
    pub fn tri_normal(&self, tri: usize) -> Vector {
        let normal = self.tri_area_normal(tri);
        let nrm = normal.norm();
        if nrm == 0.0 { Vector::zeros() } else { normal / nrm }
    }

    /// Face normal scaled by twice the triangle's area.
    fn tri_area_normal(&self, tri: usize) -> Vector {
        let [va, vb, vc] = self.tri_coords(tri).map(to_vector);
        (vb - va).cross(&(vc - va))
    }

    /// Per-vertex normals: the area-weighted sum of the adjacent face normals,
    /// normalised. Isolated or fully degenerate vertices get the zero vector.
    pub fn vertex_normals(&self) -> Vec<Vector> {
        let mut normals = vec![Vector::zeros(); self.vertices.len()];
        for tri in 0..self.triangles.len() {
            let n = self.tri_area_normal(tri);
            for &v in &self.triangles[tri] {
                normals[v as usize] += n;
            }
        }
        for n in normals.iter_mut() {
            let nrm = n.norm();
            if nrm > 0.0 {
                *n /= nrm;
            }
        }
        normals
    }

    /// Counts how many triangles use each undirected edge `(min, max)`.
    pub fn edge_use_counts(&self) -> HashMap<(u32, u32), usize> {
        let mut counts = HashMap::new();
        for &[a, b, c] in &self.triangles {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                *counts.entry((u.min(v), u.max(v))).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Edges used by exactly one triangle, i.e. holes or the cut made by the
    /// sampling box.
    pub fn boundary_edges(&self) -> Vec<(u32, u32)> {
        let mut edges: Vec<_> = self
            .edge_use_counts()
            .into_iter()
            .filter(|&(_, n)| n == 1)
            .map(|(e, _)| e)
            .collect();
        edges.sort_unstable();
        edges
    }

    /// `true` when every edge borders exactly two triangles that traverse it
    /// in opposite directions.
    pub fn is_closed(&self) -> bool {
        let mut directed = HashMap::new();
        for &[a, b, c] in &self.triangles {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                *directed.entry((u, v)).or_insert(0_usize) += 1;
            }
        }
        directed
            .iter()
            .all(|(&(u, v), &n)| n == 1 && directed.get(&(v, u)) == Some(&1))
    }
}
