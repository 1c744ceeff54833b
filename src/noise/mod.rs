//! Noise generation module for terrain synthesis.
//!
//! A seeded OpenSimplex field provides the coherent noise primitive, and
//! [`FbmSampler`] layers it into a fractal elevation function.

mod config;
mod fractal;
mod seed;
mod simplex;

pub use config::{FbmConfig, FbmConfigError, Octave};
pub use fractal::FbmSampler;
pub use seed::{Seed, SeedError};
pub use simplex::NoiseField;
