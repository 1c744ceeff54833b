//! Seeds for noise fields.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while deriving a seed.
#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Seed source unavailable: {0}")]
    SourceUnavailable(String),
}

/// Seed for a [`NoiseField`](super::NoiseField).
///
/// The same seed always produces the same field, so every sample drawn
/// from a field built with it is reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(pub u64);

impl Seed {
    /// Derives a seed from the current wall-clock time.
    ///
    /// Not reproducible. Callers that want reproducible terrain should pass
    /// an explicit seed and only fall back to this when none was given.
    pub fn from_time() -> Result<Self, SeedError> {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| SeedError::SourceUnavailable(e.to_string()))?;
        Ok(Self(elapsed.as_nanos() as u64))
    }

    /// Returns the raw seed value.
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Folds the high and low 32-bit words together with XOR.
    ///
    /// The noise generator takes a `u32` seed. Folding keeps both halves of
    /// the value significant, so seeds that differ only above bit 31 still
    /// build different fields.
    pub const fn folded(self) -> u32 {
        (self.0 ^ (self.0 >> 32)) as u32
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
