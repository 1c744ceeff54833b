//! Octave tables for fractal noise sampling.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from validating an [`FbmConfig`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FbmConfigError {
    #[error("Octave table is empty")]
    NoOctaves,
    #[error("Invalid base frequency: {0} (must be finite and > 0)")]
    InvalidBaseFrequency(f64),
    #[error("Invalid output scale: {0} (must be finite)")]
    InvalidOutputScale(f64),
    #[error("Invalid octave {index}: {reason}")]
    InvalidOctave { index: usize, reason: String },
}

/// One term of the fBm sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Octave {
    /// Weight of this octave's noise sample.
    pub amplitude: f64,
    /// Factor applied to the running frequency after this octave is sampled.
    pub frequency_multiplier: f64,
    /// Added to the running x coordinate after this octave is sampled.
    ///
    /// Offsets accumulate and only ever move the x axis, which keeps
    /// successive octaves from landing on the same lattice cells.
    pub x_offset: f64,
}

impl Octave {
    /// Creates an octave that doubles the frequency afterwards.
    pub const fn new(amplitude: f64, x_offset: f64) -> Self {
        Self {
            amplitude,
            frequency_multiplier: 2.0,
            x_offset,
        }
    }
}

/// Configuration for multi-octave fractal noise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FbmConfig {
    /// Frequency of the first octave.
    pub base_frequency: f64,
    /// Multiplier applied to the final sum.
    pub output_scale: f64,
    /// Octaves in sampling order.
    pub octaves: Vec<Octave>,
}

impl Default for FbmConfig {
    fn default() -> Self {
        Self::reference()
    }
}

impl FbmConfig {
    /// Five octave table tuned for a 256 unit wide terrain backdrop.
    pub fn reference() -> Self {
        Self {
            base_frequency: 32.0,
            output_scale: 2.5,
            octaves: vec![
                Octave::new(1.0, 32.0),
                Octave::new(0.5, 42.0),
                Octave::new(0.35, 9973.0),
                Octave::new(0.25, 824.0),
                Octave::new(0.065, 0.0),
            ],
        }
    }

    /// Classic geometric series: each octave is `persistence` times the
    /// previous amplitude at `lacunarity` times the frequency. No offsets.
    pub fn geometric(octaves: u8, frequency: f64, lacunarity: f64, persistence: f64) -> Self {
        let mut amplitude = 1.0;
        let table = (0..octaves)
            .map(|_| {
                let octave = Octave {
                    amplitude,
                    frequency_multiplier: lacunarity,
                    x_offset: 0.0,
                };
                amplitude *= persistence;
                octave
            })
            .collect();

        Self {
            base_frequency: frequency,
            output_scale: 1.0,
            octaves: table,
        }
    }

    /// Returns a copy with every amplitude zeroed except octave `index`.
    pub fn isolate(&self, index: usize) -> Self {
        let mut config = self.clone();
        for (i, octave) in config.octaves.iter_mut().enumerate() {
            if i != index {
                octave.amplitude = 0.0;
            }
        }
        config
    }

    /// Sum of octave amplitudes.
    pub fn amplitude_sum(&self) -> f64 {
        self.octaves.iter().map(|o| o.amplitude).sum()
    }

    /// Checks that every parameter is usable.
    pub fn validate(&self) -> Result<(), FbmConfigError> {
        if self.octaves.is_empty() {
            return Err(FbmConfigError::NoOctaves);
        }
        if !self.base_frequency.is_finite() || self.base_frequency <= 0.0 {
            return Err(FbmConfigError::InvalidBaseFrequency(self.base_frequency));
        }
        if !self.output_scale.is_finite() {
            return Err(FbmConfigError::InvalidOutputScale(self.output_scale));
        }

        for (index, octave) in self.octaves.iter().enumerate() {
            let multiplier = octave.frequency_multiplier;
            let reason = if !octave.amplitude.is_finite() || octave.amplitude < 0.0 {
                Some(format!("amplitude {} must be finite and >= 0", octave.amplitude))
            } else if !multiplier.is_finite() || multiplier <= 0.0 {
                Some(format!("frequency multiplier {} must be finite and > 0", multiplier))
            } else if !octave.x_offset.is_finite() {
                Some(format!("offset {} must be finite", octave.x_offset))
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(FbmConfigError::InvalidOctave { index, reason });
            }
        }

        Ok(())
    }
}
