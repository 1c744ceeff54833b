//! Grid and terrain configuration.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::TerrainError;
use crate::noise::{FbmConfig, Seed};

/// Errors that can occur while loading or saving a terrain configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] TerrainError),
}

/// Number of grid cells along each axis.
///
/// Vertices are shared between neighboring cells, so a grid of
/// `width x height` cells has `(width + 1) x (height + 1)` vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridConfig {
    /// Cells along x.
    pub width: u32,
    /// Cells along z.
    pub height: u32,
}

impl GridConfig {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Creates a grid from vertex counts per axis, i.e. `columns - 1` by
    /// `rows - 1` cells. A count below 2 yields an empty (invalid) axis.
    pub const fn from_vertex_counts(columns: u32, rows: u32) -> Self {
        Self {
            width: columns.saturating_sub(1),
            height: rows.saturating_sub(1),
        }
    }

    /// Vertices along x.
    pub const fn columns(&self) -> u64 {
        self.width as u64 + 1
    }

    /// Vertices along z.
    pub const fn rows(&self) -> u64 {
        self.height as u64 + 1
    }

    pub const fn vertex_count(&self) -> u64 {
        self.columns().saturating_mul(self.rows())
    }

    pub const fn triangle_count(&self) -> u64 {
        (self.width as u64 * self.height as u64).saturating_mul(2)
    }

    /// Unique edges of the triangulated grid: rows of horizontal edges,
    /// columns of vertical edges and one diagonal per cell.
    pub const fn edge_count(&self) -> u64 {
        let (w, h) = (self.width as u64, self.height as u64);
        (w * (h + 1))
            .saturating_add((w + 1) * h)
            .saturating_add(w * h)
    }

    /// Rejects empty grids and grids whose vertices can't be addressed
    /// with `u32` indices.
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.width == 0 || self.height == 0 {
            return Err(TerrainError::InvalidConfig {
                width: self.width,
                height: self.height,
            });
        }

        let vertices = self.vertex_count();
        if vertices > u32::MAX as u64 + 1 {
            return Err(TerrainError::TooLarge(vertices));
        }

        Ok(())
    }
}

/// Everything a [`HeightfieldService`](super::HeightfieldService) needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Seed for the noise permutation table.
    pub seed: Seed,
    /// Size of the plane along x and z before displacement.
    pub extent: [f32; 2],
    /// Octave table.
    pub fbm: FbmConfig,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self::reference(Seed(42))
    }
}

impl TerrainConfig {
    /// 256 x 256 plane with the reference octave table.
    pub fn reference(seed: Seed) -> Self {
        Self {
            seed,
            extent: [256.0, 256.0],
            fbm: FbmConfig::reference(),
        }
    }

    /// Returns the plane extent as a vector.
    pub fn extent(&self) -> Vec2 {
        Vec2::from_array(self.extent)
    }

    pub fn validate(&self) -> Result<(), TerrainError> {
        validate_extent(self.extent())?;
        self.fbm.validate()?;
        Ok(())
    }

    /// Loads a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn to_json_file(&self, path: &Path) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}

pub(crate) fn validate_extent(extent: Vec2) -> Result<(), TerrainError> {
    if !extent.is_finite() || extent.x <= 0.0 || extent.y <= 0.0 {
        return Err(TerrainError::InvalidExtent(extent.x, extent.y));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_grid_counts() {
        let grid = GridConfig::new(4, 3);
        assert_eq!(grid.vertex_count(), 20);
        assert_eq!(grid.triangle_count(), 24);
        assert_eq!(grid.edge_count(), 4 * 4 + 5 * 3 + 4 * 3);
    }

    #[test]
    fn test_from_vertex_counts() {
        let grid = GridConfig::from_vertex_counts(256, 256);
        assert_eq!(grid, GridConfig::new(255, 255));
        assert_eq!(grid.vertex_count(), 256 * 256);

        assert_eq!(GridConfig::from_vertex_counts(1, 8).width, 0);
        assert_eq!(GridConfig::from_vertex_counts(0, 8).width, 0);
    }

    #[test]
    fn test_validate_grid() {
        assert!(GridConfig::new(1, 1).validate().is_ok());
        assert!(matches!(
            GridConfig::new(0, 5).validate(),
            Err(TerrainError::InvalidConfig { width: 0, height: 5 })
        ));
        assert!(matches!(
            GridConfig::new(5, 0).validate(),
            Err(TerrainError::InvalidConfig { .. })
        ));
        assert!(matches!(
            GridConfig::new(u32::MAX, u32::MAX).validate(),
            Err(TerrainError::TooLarge(_))
        ));
        // 65536 x 65536 vertices is exactly the u32 index range
        assert!(GridConfig::new(65535, 65535).validate().is_ok());
        assert!(GridConfig::new(65536, 65535).validate().is_err());
    }

    #[test]
    fn test_validate_extent() {
        let mut config = TerrainConfig::default();
        assert!(config.validate().is_ok());

        config.extent = [0.0, 10.0];
        assert!(matches!(config.validate(), Err(TerrainError::InvalidExtent(_, _))));

        config.extent = [f32::INFINITY, 10.0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_noise_table() {
        let mut config = TerrainConfig::default();
        config.fbm.octaves.clear();
        assert!(matches!(config.validate(), Err(TerrainError::Noise(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("terrain.json");

        let config = TerrainConfig::reference(Seed(987654321));
        config.to_json_file(&path).unwrap();
        let loaded = TerrainConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{ "seed": 7, "extent": [128.0, 64.0] }"#).unwrap();

        let loaded = TerrainConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded.seed, Seed(7));
        assert_eq!(loaded.extent(), Vec2::new(128.0, 64.0));
        assert_eq!(loaded.fbm, FbmConfig::reference());
    }

    #[test]
    fn test_invalid_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "extent": [-1.0, 64.0] }"#).unwrap();
        assert!(matches!(
            TerrainConfig::from_json_file(&path),
            Err(ConfigError::Invalid(_))
        ));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            TerrainConfig::from_json_file(&path),
            Err(ConfigError::Json(_))
        ));

        assert!(matches!(
            TerrainConfig::from_json_file(&dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
