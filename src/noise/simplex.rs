//! Seeded 2D OpenSimplex coherent noise.

use noise::{NoiseFn, OpenSimplex};

use super::Seed;

/// Deterministic, seedable 2D coherent noise.
///
/// Wraps [`noise::OpenSimplex`], whose permutation table is built once from
/// the seed and never mutated, so a field can be shared freely between
/// threads.
#[derive(Debug, Clone)]
pub struct NoiseField {
    seed: Seed,
    simplex: OpenSimplex,
}

impl NoiseField {
    /// Creates a noise field from an explicit seed.
    ///
    /// The generator is seeded with [`Seed::folded`].
    pub fn new(seed: Seed) -> Self {
        Self {
            seed,
            simplex: OpenSimplex::new(seed.folded()),
        }
    }

    /// Returns the seed this field was built from.
    pub fn seed(&self) -> Seed {
        self.seed
    }

    /// Samples the field at `(x, y)`.
    ///
    /// Returns a value in approximately [-1, 1]. Negative and large inputs
    /// behave like any other.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        self.simplex.get([x, y])
    }
}
