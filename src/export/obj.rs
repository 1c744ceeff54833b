//! Wavefront OBJ mesh export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::terrain::MeshDescriptor;

/// Errors that can occur during OBJ export.
#[derive(Error, Debug)]
pub enum ObjExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for OBJ export.
#[derive(Debug, Clone)]
pub struct ObjExportOptions {
    /// Write smooth vertex normals (`vn`) and reference them from faces.
    pub normals: bool,
    /// Append the wireframe edges as `l` line elements.
    pub wireframe: bool,
}

impl Default for ObjExportOptions {
    fn default() -> Self {
        Self {
            normals: true,
            wireframe: false,
        }
    }
}

/// Writes a mesh as OBJ text to any writer.
pub fn write_mesh_obj<W: Write>(
    mesh: &MeshDescriptor,
    writer: &mut W,
    options: &ObjExportOptions,
) -> Result<(), ObjExportError> {
    let grid = mesh.grid();
    writeln!(writer, "# heightfield {}x{} cells", grid.width, grid.height)?;
    writeln!(writer, "o terrain")?;

    for v in mesh.vertices() {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }

    if options.normals {
        for n in mesh.vertex_normals() {
            writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
        }
    }

    // OBJ indices are 1-based
    for &[a, b, c] in mesh.triangles() {
        let (a, b, c) = (a as u64 + 1, b as u64 + 1, c as u64 + 1);
        if options.normals {
            writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
        } else {
            writeln!(writer, "f {a} {b} {c}")?;
        }
    }

    if options.wireframe {
        writeln!(writer, "o wireframe")?;
        for &[a, b] in mesh.wireframe_edges() {
            writeln!(writer, "l {} {}", a as u64 + 1, b as u64 + 1)?;
        }
    }

    Ok(())
}

/// Exports a mesh to an OBJ file.
pub fn export_mesh_obj(
    mesh: &MeshDescriptor,
    path: &Path,
    options: &ObjExportOptions,
) -> Result<(), ObjExportError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_mesh_obj(mesh, &mut writer, options)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::Seed;
    use crate::terrain::{GridConfig, HeightfieldService};
    use tempfile::tempdir;

    fn count_prefix(text: &str, prefix: &str) -> usize {
        text.lines().filter(|l| l.starts_with(prefix)).count()
    }

    #[test]
    fn test_obj_element_counts() {
        let mesh = HeightfieldService::with_seed(Seed(9))
            .generate(GridConfig::new(4, 3))
            .unwrap();

        let mut buf = Vec::new();
        let options = ObjExportOptions {
            normals: true,
            wireframe: true,
        };
        write_mesh_obj(&mesh, &mut buf, &options).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(count_prefix(&text, "v "), 20);
        assert_eq!(count_prefix(&text, "vn "), 20);
        assert_eq!(count_prefix(&text, "f "), 24);
        assert_eq!(count_prefix(&text, "l "), mesh.edge_count());
    }

    #[test]
    fn test_obj_faces_are_one_based() {
        let mesh = HeightfieldService::with_seed(Seed(9))
            .generate(GridConfig::new(1, 1))
            .unwrap();

        let mut buf = Vec::new();
        let options = ObjExportOptions {
            normals: false,
            wireframe: false,
        };
        write_mesh_obj(&mesh, &mut buf, &options).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let faces: Vec<&str> = text.lines().filter(|l| l.starts_with("f ")).collect();
        assert_eq!(faces, vec!["f 1 3 2", "f 2 3 4"]);
        assert_eq!(count_prefix(&text, "vn "), 0);
    }

    #[test]
    fn test_export_mesh_obj_file() {
        let mesh = HeightfieldService::with_seed(Seed(9))
            .generate(GridConfig::new(6, 6))
            .unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("terrain.obj");

        export_mesh_obj(&mesh, &path, &ObjExportOptions::default()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(count_prefix(&text, "v "), 49);
        assert_eq!(count_prefix(&text, "l "), 0);
    }
}
