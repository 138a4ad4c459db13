use bevy::{
    asset::RenderAssetUsages,
    mesh::{Indices, PrimitiveTopology},
    prelude::Mesh as BevyMesh,
};

use crate::{mesh::Mesh, types::Vector3Like};

impl<V: Vector3Like> Mesh<V> {
    /// Builds a Bevy triangle-list mesh with positions, area-weighted vertex
    /// normals and `u32` indices.
    pub fn to_bevy_mesh(&self) -> BevyMesh {
        let positions: Vec<[f32; 3]> = self.vertices.iter().map(|v| v.to_array()).collect();
        let normals: Vec<[f32; 3]> = self
            .vertex_normals()
            .iter()
            .map(|n| [n.x, n.y, n.z])
            .collect();
        let indices: Vec<u32> = self.triangles.iter().flatten().copied().collect();

        let mut bevy_mesh = BevyMesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::RENDER_WORLD,
        );
        bevy_mesh.insert_attribute(BevyMesh::ATTRIBUTE_POSITION, positions);
        bevy_mesh.insert_attribute(BevyMesh::ATTRIBUTE_NORMAL, normals);
        bevy_mesh.insert_indices(Indices::U32(indices));
        bevy_mesh
    }
}

#[cfg(test)]
mod tests {
    use bevy::math::Vec3;

    use crate::{Grid, MarchConfig, march_mesh};

    #[test]
    fn converts_a_marched_sphere() {
        let grid = Grid::new([9, 9, 9], Vec3::splat(-1.5), Vec3::splat(1.5)).unwrap();
        let mesh = march_mesh(&MarchConfig::default(), &grid, &|p: Vec3| p.length() - 1.).unwrap();
        let bevy_mesh = mesh.to_bevy_mesh();

        assert_eq!(bevy_mesh.count_vertices(), mesh.vertices.len());
        assert_eq!(
            bevy_mesh.indices().map(|i| i.len()),
            Some(mesh.triangles.len() * 3)
        );
    }
}
