//! Procedural terrain heightfield generator.
//!
//! This crate maps planar coordinates to elevations with multi-octave
//! OpenSimplex noise (fBm) and builds displaced, triangulated grid meshes
//! with a deduplicated wireframe overlay from that elevation function.

pub mod export;
pub mod noise;
pub mod terrain;

pub use crate::noise::{FbmConfig, FbmSampler, NoiseField, Octave, Seed};
pub use crate::terrain::{
    GridConfig, GridMeshBuilder, HeightfieldService, MeshDescriptor, TerrainConfig, TerrainError,
};
