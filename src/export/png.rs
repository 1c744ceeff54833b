//! 16-bit grayscale PNG heightmap export.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Luma};
use thiserror::Error;

use crate::terrain::MeshDescriptor;

/// Errors that can occur during PNG export.
#[derive(Error, Debug)]
pub enum PngExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid height range: min ({0}) >= max ({1})")]
    InvalidHeightRange(f32, f32),
}

/// Options for PNG export.
#[derive(Debug, Clone)]
pub struct PngExportOptions {
    /// Elevation mapped to black.
    pub min_height: f32,
    /// Elevation mapped to white.
    pub max_height: f32,
    pub compression: CompressionType,
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            min_height: -1.0,
            max_height: 1.0,
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

impl PngExportOptions {
    /// Creates options spanning the mesh's elevation range.
    ///
    /// A perfectly flat mesh gets a tiny artificial range so it still exports.
    pub fn auto_range(mesh: &MeshDescriptor) -> Self {
        let (min, max) = mesh.elevation_range();
        let max = if max > min { max } else { min + 1e-6 };
        Self {
            min_height: min,
            max_height: max,
            ..Default::default()
        }
    }
}

/// Exports mesh elevations as a 16-bit PNG, one pixel per vertex.
///
/// The image is `columns x rows` with row 0 at the -z edge of the plane.
pub fn export_mesh_png(
    mesh: &MeshDescriptor,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), PngExportError> {
    let min = options.min_height;
    let max = options.max_height;

    if min >= max {
        return Err(PngExportError::InvalidHeightRange(min, max));
    }

    let grid = mesh.grid();
    let width = grid.width + 1;
    let height = grid.height + 1;
    let range = max - min;

    let mut img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(width, height);
    for (pixel, elevation) in img.pixels_mut().zip(mesh.elevations()) {
        let normalized = ((elevation - min) / range).clamp(0.0, 1.0);
        *pixel = Luma([(normalized * 65535.0) as u16]);
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);

    let byte_slice: &[u8] = bytemuck::cast_slice(img.as_raw());
    encoder.write_image(byte_slice, width, height, image::ExtendedColorType::L16)?;

    Ok(())
}
