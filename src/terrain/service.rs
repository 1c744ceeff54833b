//! Heightfield service facade.

use tracing::{debug, warn};

use super::{GridConfig, GridMeshBuilder, MeshDescriptor, TerrainConfig, TerrainError};
use crate::noise::{FbmSampler, NoiseField, Seed};

/// Produces displaced terrain meshes from a fixed configuration.
///
/// The noise field and sampler are built once at construction and never
/// change afterwards. `generate` only borrows `self`, so one service can
/// serve concurrent requests for different grid sizes.
#[derive(Debug, Clone)]
pub struct HeightfieldService {
    config: TerrainConfig,
    sampler: FbmSampler,
    builder: GridMeshBuilder,
}

impl HeightfieldService {
    /// Creates a service from a full configuration.
    pub fn new(config: TerrainConfig) -> Result<Self, TerrainError> {
        config.validate()?;

        let field = NoiseField::new(config.seed);
        let sampler = FbmSampler::new(field, config.fbm.clone())?;
        let builder = GridMeshBuilder::new(config.extent())?;

        if sampler.amplitude_sum() == 0.0 {
            warn!("all octave amplitudes are zero, terrain will be flat");
        }
        debug!(
            seed = %config.seed,
            octaves = config.fbm.octaves.len(),
            "heightfield service ready"
        );

        Ok(Self {
            config,
            sampler,
            builder,
        })
    }

    /// Creates a service with the reference configuration and `seed`.
    pub fn with_seed(seed: Seed) -> Self {
        Self::new(TerrainConfig::reference(seed))
            .expect("reference terrain configuration is valid")
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn sampler(&self) -> &FbmSampler {
        &self.sampler
    }

    /// Elevation at normalized plane coordinates.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        self.sampler.sample(x, y)
    }

    /// Builds a fresh mesh for `grid`.
    pub fn generate(&self, grid: GridConfig) -> Result<MeshDescriptor, TerrainError> {
        self.builder.build(grid, &self.sampler)
    }
}
