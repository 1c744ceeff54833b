//! Multi-octave fractal Brownian motion (fBm) sampling.

use rayon::prelude::*;

use super::{FbmConfig, FbmConfigError, NoiseField};

/// Sums several octaves of a [`NoiseField`] into one elevation value.
///
/// Stateless apart from the immutable field and octave table, so a sampler
/// can be shared across threads and queried concurrently.
#[derive(Debug, Clone)]
pub struct FbmSampler {
    field: NoiseField,
    config: FbmConfig,
}

impl FbmSampler {
    /// Creates a sampler, validating the octave table.
    pub fn new(field: NoiseField, config: FbmConfig) -> Result<Self, FbmConfigError> {
        config.validate()?;
        Ok(Self { field, config })
    }

    /// Returns the underlying noise field.
    pub fn field(&self) -> &NoiseField {
        &self.field
    }

    /// Returns the octave configuration.
    pub fn config(&self) -> &FbmConfig {
        &self.config
    }

    /// Samples the fBm sum at `(x, y)`.
    ///
    /// Octave `i` is sampled at the running frequency and x cursor, then the
    /// frequency is multiplied and the cursor shifted by that octave's
    /// offset. The y coordinate is never shifted. A zero amplitude octave
    /// contributes nothing but still advances frequency and cursor.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let mut frequency = self.config.base_frequency;
        let mut cursor_x = x;
        let mut value = 0.0;

        for octave in &self.config.octaves {
            value += self.field.sample(cursor_x * frequency, y * frequency) * octave.amplitude;
            frequency *= octave.frequency_multiplier;
            cursor_x += octave.x_offset;
        }

        value * self.config.output_scale
    }

    /// Samples a batch of points in parallel.
    ///
    /// Results are identical to calling [`sample`](Self::sample) per point.
    pub fn sample_batch(&self, points: &[(f64, f64)]) -> Vec<f64> {
        points.par_iter().map(|&(x, y)| self.sample(x, y)).collect()
    }

    /// Sum of octave amplitudes, the bound on `|sample(x, y)|` before the
    /// output scale is applied, given the field's nominal [-1, 1] range.
    pub fn amplitude_sum(&self) -> f64 {
        self.config.amplitude_sum()
    }
}
