//! Plain-text mesh writers.
//!
//! Both formats are written through any [`Write`]; [`save`] adds atomic file
//! replacement on top.

use std::{
    io::{self, BufWriter, Write},
    path::Path,
};

use tempfile::NamedTempFile;
use tracing::info_span;

use crate::{error::Result, mesh::Mesh, types::Vector3Like};

/// Text geometry formats the exporter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// Wavefront OBJ: `v x y z` lines then 1-based `f a b c` lines.
    Obj,
    /// ASCII STL with one facet per triangle.
    Stl,
}

impl MeshFormat {
    /// Picks a format from the path's extension: `.stl` (any case) is STL,
    /// everything else OBJ.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("stl") => MeshFormat::Stl,
            _ => MeshFormat::Obj,
        }
    }
}

/// Writes `mesh` as Wavefront OBJ.
pub fn write_obj<V: Vector3Like, W: Write>(mesh: &Mesh<V>, mut w: W) -> io::Result<()> {
    writeln!(
        w,
        "# {} vertices, {} triangles",
        mesh.vertices.len(),
        mesh.triangles.len()
    )?;
    for v in &mesh.vertices {
        let [x, y, z] = v.to_array();
        writeln!(w, "v {x} {y} {z}")?;
    }
    for [a, b, c] in &mesh.triangles {
        writeln!(w, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }
    Ok(())
}

/// Writes `mesh` as an ASCII STL solid called `name`.
pub fn write_ascii_stl<V: Vector3Like, W: Write>(
    mesh: &Mesh<V>,
    name: &str,
    mut w: W,
) -> io::Result<()> {
    writeln!(w, "solid {name}")?;
    for tri in 0..mesh.triangles.len() {
        let n = mesh.tri_normal(tri);
        writeln!(w, "  facet normal {} {} {}", n.x, n.y, n.z)?;
        writeln!(w, "    outer loop")?;
        for v in mesh.tri_coords(tri) {
            let [x, y, z] = v.to_array();
            writeln!(w, "      vertex {x} {y} {z}")?;
        }
        writeln!(w, "    endloop")?;
        writeln!(w, "  endfacet")?;
    }
    writeln!(w, "endsolid {name}")
}

/// Writes `mesh` to `path` in `format`.
///
/// The data goes to a temporary file in the destination directory which is
/// synced and then renamed over `path`, so either the whole file appears or
/// nothing does.
pub fn save<V: Vector3Like>(mesh: &Mesh<V>, path: &Path, format: MeshFormat) -> Result<()> {
    let _span = info_span!("export", path = %path.display(), ?format).entered();

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;

    {
        let mut w = BufWriter::new(file.as_file_mut());
        match format {
            MeshFormat::Obj => write_obj(mesh, &mut w)?,
            MeshFormat::Stl => {
                let name = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("mesh");
                write_ascii_stl(mesh, name, &mut w)?
            }
        }
        w.flush()?;
    }
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;

    // NamedTempFile is created owner-only; give the result the usual permissions.
    #[cfg(unix)]
    {
        use std::{fs, os::unix::fs::PermissionsExt};
        fs::set_permissions(path, fs::Permissions::from_mode(0o644))?;
    }

    log::info!(
        "wrote {} ({} vertices, {} triangles)",
        path.display(),
        mesh.vertices.len(),
        mesh.triangles.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::types::Point;

    fn simple_mesh() -> Mesh {
        Mesh {
            vertices: vec![
                Point::new(0.0, 0.0, 0.0),
                Point::new(1.0, 0.0, 0.0),
                Point::new(0.0, 1.0, 0.0),
            ],
            triangles: vec![[0, 1, 2]],
        }
    }

    #[test]
    fn obj_contains_vertices_and_one_based_faces() {
        let mut out = Vec::new();
        write_obj(&simple_mesh(), &mut out).unwrap();
        let obj = String::from_utf8(out).unwrap();
        assert_eq!(
            obj,
            "# 3 vertices, 1 triangles\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n"
        );
    }

    #[test]
    fn stl_contains_required_tokens() {
        let mut out = Vec::new();
        write_ascii_stl(&simple_mesh(), "tri", &mut out).unwrap();
        let stl = String::from_utf8(out).unwrap();
        assert!(stl.starts_with("solid tri\n"));
        assert!(stl.contains("facet normal 0 0 1"));
        assert!(stl.contains("      vertex 1 0 0\n"));
        assert!(stl.ends_with("endsolid tri\n"));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(MeshFormat::from_path(Path::new("a/b.STL")), MeshFormat::Stl);
        assert_eq!(MeshFormat::from_path(Path::new("a/b.obj")), MeshFormat::Obj);
        assert_eq!(MeshFormat::from_path(Path::new("mesh")), MeshFormat::Obj);
    }

    #[test]
    fn save_replaces_the_target() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tri.obj");
        fs::write(&path, "stale").unwrap();

        save(&simple_mesh(), &path, MeshFormat::Obj).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# 3 vertices"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_save_leaves_nothing_behind() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("missing").join("tri.obj");
        assert!(save(&simple_mesh(), &missing, MeshFormat::Obj).is_err());

        // Renaming onto an existing directory fails after the data is written.
        let target = dir.path().join("occupied");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();
        assert!(save(&simple_mesh(), &target, MeshFormat::Obj).is_err());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
