//! Terrain generation module.
//!
//! Turns the fractal elevation function into displaced grid meshes and
//! exposes [`HeightfieldService`] as the single entry point for callers.

mod config;
mod mesh;
mod service;
mod wireframe;

pub use config::{ConfigError, GridConfig, TerrainConfig};
pub use mesh::{GridMeshBuilder, MeshDescriptor, TerrainError};
pub use service::HeightfieldService;
pub use wireframe::unique_edges;
