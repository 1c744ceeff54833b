//! RAW heightmap export for game engine compatibility.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::terrain::{GridConfig, MeshDescriptor};

/// Errors that can occur during RAW export.
#[derive(Error, Debug)]
pub enum RawExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid height range: min ({0}) >= max ({1})")]
    InvalidHeightRange(f32, f32),
}

/// RAW export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RawFormat {
    /// 16-bit unsigned integer, little-endian (Unity default).
    #[default]
    R16LittleEndian,
    /// 16-bit unsigned integer, big-endian.
    R16BigEndian,
    /// 32-bit float, little-endian (high precision).
    R32Float,
}

/// Exports mesh elevations as a RAW heightmap, one sample per vertex in
/// vertex order.
///
/// `min_height` and `max_height` define the normalization range for the
/// R16 formats and are ignored for R32.
pub fn export_mesh_raw(
    mesh: &MeshDescriptor,
    path: &Path,
    format: RawFormat,
    min_height: f32,
    max_height: f32,
) -> Result<(), RawExportError> {
    if format != RawFormat::R32Float && min_height >= max_height {
        return Err(RawExportError::InvalidHeightRange(min_height, max_height));
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let range = max_height - min_height;
    let quantize = |height: f32| {
        let normalized = ((height - min_height) / range).clamp(0.0, 1.0);
        (normalized * 65535.0) as u16
    };

    match format {
        RawFormat::R16LittleEndian => {
            for height in mesh.elevations() {
                writer.write_all(&quantize(height).to_le_bytes())?;
            }
        }
        RawFormat::R16BigEndian => {
            for height in mesh.elevations() {
                writer.write_all(&quantize(height).to_be_bytes())?;
            }
        }
        RawFormat::R32Float => {
            for height in mesh.elevations() {
                writer.write_all(&height.to_le_bytes())?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}

/// Returns the expected file size for a RAW export of `grid`.
pub fn expected_file_size(grid: GridConfig, format: RawFormat) -> u64 {
    let samples = grid.vertex_count();
    match format {
        RawFormat::R16LittleEndian | RawFormat::R16BigEndian => samples * 2,
        RawFormat::R32Float => samples * 4,
    }
}
