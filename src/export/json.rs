//! JSON mesh export for web renderers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::terrain::MeshDescriptor;

/// Errors that can occur during JSON export.
#[derive(Error, Debug)]
pub enum JsonExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct MeshDocument<'a> {
    width: u32,
    height: u32,
    extent: [f32; 2],
    positions: Vec<[f32; 3]>,
    triangles: &'a [[u32; 3]],
    edges: &'a [[u32; 2]],
}

impl<'a> From<&'a MeshDescriptor> for MeshDocument<'a> {
    fn from(mesh: &'a MeshDescriptor) -> Self {
        let grid = mesh.grid();
        Self {
            width: grid.width,
            height: grid.height,
            extent: mesh.extent().to_array(),
            positions: mesh.vertices().iter().map(|v| v.to_array()).collect(),
            triangles: mesh.triangles(),
            edges: mesh.wireframe_edges(),
        }
    }
}

/// Exports a mesh as a single JSON document with `positions`, `triangles`
/// and `edges` arrays.
pub fn export_mesh_json(mesh: &MeshDescriptor, path: &Path) -> Result<(), JsonExportError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &MeshDocument::from(mesh))?;
    writer.flush()?;
    Ok(())
}
