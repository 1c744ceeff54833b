//! Displaced grid mesh construction.

use std::time::Instant;

use glam::{Vec2, Vec3};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, trace};

use super::config::validate_extent;
use super::wireframe::unique_edges;
use super::GridConfig;
use crate::noise::{FbmConfigError, FbmSampler};

/// Errors that can occur while building a terrain mesh.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TerrainError {
    #[error("Invalid grid configuration: {width}x{height} cells (both dimensions must be > 0)")]
    InvalidConfig { width: u32, height: u32 },
    #[error("Invalid plane extent: ({0}, {1}) (must be finite and > 0)")]
    InvalidExtent(f32, f32),
    #[error("Grid of {0} vertices exceeds the u32 index range")]
    TooLarge(u64),
    #[error("Invalid noise configuration: {0}")]
    Noise(#[from] FbmConfigError),
}

/// Vertex, triangle and wireframe buffers of one displaced grid.
///
/// Vertices are stored row-major: rows run along z, columns along x, and
/// vertex `(col, row)` sits at index `row * columns + col`. Elevation is
/// the y component.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshDescriptor {
    grid: GridConfig,
    extent: Vec2,
    vertices: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    wireframe_edges: Vec<[u32; 2]>,
}

impl MeshDescriptor {
    pub fn grid(&self) -> GridConfig {
        self.grid
    }

    pub fn extent(&self) -> Vec2 {
        self.extent
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Triangles wound counter-clockwise when seen from +y.
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Unique mesh edges as `[low, high]` vertex index pairs.
    pub fn wireframe_edges(&self) -> &[[u32; 2]] {
        &self.wireframe_edges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn edge_count(&self) -> usize {
        self.wireframe_edges.len()
    }

    /// Index of the vertex at grid position `(col, row)`.
    pub fn vertex_index(&self, col: u32, row: u32) -> Option<u32> {
        if col > self.grid.width || row > self.grid.height {
            return None;
        }
        Some(row * (self.grid.width + 1) + col)
    }

    /// Elevation of the vertex at grid position `(col, row)`.
    pub fn elevation_at(&self, col: u32, row: u32) -> Option<f32> {
        self.vertex_index(col, row).map(|i| self.vertices[i as usize].y)
    }

    /// Elevations in vertex order.
    pub fn elevations(&self) -> impl Iterator<Item = f32> + '_ {
        self.vertices.iter().map(|v| v.y)
    }

    /// Computes the min and max elevation.
    pub fn elevation_range(&self) -> (f32, f32) {
        let mut min = f32::MAX;
        let mut max = f32::MIN;

        for h in self.elevations() {
            min = min.min(h);
            max = max.max(h);
        }

        (min, max)
    }

    /// Smooth per-vertex normals.
    ///
    /// Each vertex gets the normalized sum of its adjacent face normals,
    /// weighted by triangle area.
    pub fn vertex_normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];

        for &[a, b, c] in &self.triangles {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            let pa = self.vertices[a];
            let face = (self.vertices[b] - pa).cross(self.vertices[c] - pa);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }

        for n in &mut normals {
            *n = n.normalize_or(Vec3::Y);
        }

        normals
    }

    /// Vertex positions as tightly packed `f32` triples.
    pub fn positions_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Triangle indices as a flat `u32` buffer.
    pub fn indices_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }

    /// Wireframe edges as a flat `u32` line-list buffer.
    pub fn edge_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.wireframe_edges)
    }

    /// Consumes the descriptor, returning its buffers.
    pub fn into_parts(self) -> (Vec<Vec3>, Vec<[u32; 3]>, Vec<[u32; 2]>) {
        (self.vertices, self.triangles, self.wireframe_edges)
    }
}

/// Builds displaced grid meshes over a fixed plane extent.
#[derive(Debug, Clone, Copy)]
pub struct GridMeshBuilder {
    extent: Vec2,
}

impl GridMeshBuilder {
    /// Creates a builder for a plane of `extent.x` by `extent.y` units,
    /// centered on the origin in the x/z plane.
    pub fn new(extent: Vec2) -> Result<Self, TerrainError> {
        validate_extent(extent)?;
        Ok(Self { extent })
    }

    pub fn extent(&self) -> Vec2 {
        self.extent
    }

    /// Builds a mesh of `grid` cells, displacing each vertex by `sampler`.
    ///
    /// Every call allocates fresh buffers. Given the same grid and sampler
    /// the result is bit-identical, regardless of thread scheduling.
    pub fn build(
        &self,
        grid: GridConfig,
        sampler: &FbmSampler,
    ) -> Result<MeshDescriptor, TerrainError> {
        grid.validate()?;
        let vertex_count = buffer_len(grid.vertex_count(), grid)?;
        let triangle_count = buffer_len(grid.triangle_count(), grid)?;
        let start = Instant::now();

        let vertices = self.displaced_vertices(grid, vertex_count, sampler);
        trace!(count = vertices.len(), "sampled vertices");

        let triangles = triangulate(grid, triangle_count);
        let wireframe_edges = unique_edges(&triangles);

        debug!(
            width = grid.width,
            height = grid.height,
            vertices = vertices.len(),
            triangles = triangles.len(),
            edges = wireframe_edges.len(),
            elapsed = ?start.elapsed(),
            "built terrain mesh"
        );

        Ok(MeshDescriptor {
            grid,
            extent: self.extent,
            vertices,
            triangles,
            wireframe_edges,
        })
    }

    /// Planar position of grid vertex `(col, row)` in f64.
    fn planar_position(&self, grid: GridConfig, col: usize, row: usize) -> (f64, f64) {
        let ex = self.extent.x as f64;
        let ez = self.extent.y as f64;
        let px = (col as f64 / grid.width as f64 - 0.5) * ex;
        let pz = (row as f64 / grid.height as f64 - 0.5) * ez;
        (px, pz)
    }

    fn displaced_vertices(
        &self,
        grid: GridConfig,
        vertex_count: usize,
        sampler: &FbmSampler,
    ) -> Vec<Vec3> {
        let columns = grid.columns() as usize;
        let ex = self.extent.x as f64;
        let ez = self.extent.y as f64;

        (0..vertex_count)
            .into_par_iter()
            .map(|i| {
                let col = i % columns;
                let row = i / columns;
                let (px, pz) = self.planar_position(grid, col, row);
                let elevation = sampler.sample(px / ex, pz / ez);
                Vec3::new(px as f32, elevation as f32, pz as f32)
            })
            .collect()
    }
}

/// Converts a grid element count into a buffer length for this target.
fn buffer_len(count: u64, grid: GridConfig) -> Result<usize, TerrainError> {
    usize::try_from(count).map_err(|_| TerrainError::TooLarge(grid.vertex_count()))
}

/// Two triangles per cell, counter-clockwise from +y.
fn triangulate(grid: GridConfig, triangle_count: usize) -> Vec<[u32; 3]> {
    let columns = grid.width + 1;
    let mut triangles = Vec::with_capacity(triangle_count);

    for row in 0..grid.height {
        for col in 0..grid.width {
            let top_left = row * columns + col;
            let top_right = top_left + 1;
            let bottom_left = top_left + columns;
            let bottom_right = bottom_left + 1;

            triangles.push([top_left, bottom_left, top_right]);
            triangles.push([top_right, bottom_left, bottom_right]);
        }
    }

    triangles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{FbmConfig, NoiseField, Seed};
    use std::collections::HashSet;

    fn reference_sampler(seed: u64) -> FbmSampler {
        FbmSampler::new(NoiseField::new(Seed(seed)), FbmConfig::reference()).unwrap()
    }

    fn flat_sampler() -> FbmSampler {
        let mut config = FbmConfig::reference();
        for octave in &mut config.octaves {
            octave.amplitude = 0.0;
        }
        FbmSampler::new(NoiseField::new(Seed(0)), config).unwrap()
    }

    fn builder() -> GridMeshBuilder {
        GridMeshBuilder::new(Vec2::new(256.0, 256.0)).unwrap()
    }

    #[test]
    fn test_grid_topology() {
        let sampler = reference_sampler(42);
        for &(w, h) in &[(1, 1), (4, 3), (7, 11), (16, 16)] {
            let mesh = builder().build(GridConfig::new(w, h), &sampler).unwrap();
            let vertex_count = ((w + 1) * (h + 1)) as usize;

            assert_eq!(mesh.vertex_count(), vertex_count);
            assert_eq!(mesh.triangle_count(), (2 * w * h) as usize);
            for tri in mesh.triangles() {
                for &i in tri {
                    assert!((i as usize) < vertex_count, "Index {} out of range", i);
                }
            }
        }
    }

    #[test]
    fn test_triangles_are_non_degenerate() {
        let mesh = builder().build(GridConfig::new(5, 4), &flat_sampler()).unwrap();
        for &[a, b, c] in mesh.triangles() {
            assert!(a != b && b != c && a != c);
        }
    }

    #[test]
    fn test_winding_faces_up() {
        let mesh = builder().build(GridConfig::new(6, 5), &flat_sampler()).unwrap();
        let v = mesh.vertices();
        for &[a, b, c] in mesh.triangles() {
            let (a, b, c) = (v[a as usize], v[b as usize], v[c as usize]);
            let normal = (b - a).cross(c - a);
            assert!(normal.y > 0.0, "Triangle normal {:?} points down", normal);
        }
    }

    #[test]
    fn test_wireframe_has_no_duplicates() {
        let grid = GridConfig::new(9, 6);
        let mesh = builder().build(grid, &reference_sampler(1)).unwrap();

        let mut seen = HashSet::new();
        for &[a, b] in mesh.wireframe_edges() {
            assert!(a < b);
            assert!(seen.insert((a, b)), "Duplicate edge ({}, {})", a, b);
        }
        assert_eq!(mesh.edge_count() as u64, grid.edge_count());
    }

    #[test]
    fn test_wireframe_covers_every_triangle_edge() {
        let mesh = builder().build(GridConfig::new(3, 3), &flat_sampler()).unwrap();
        let edges: HashSet<[u32; 2]> = mesh.wireframe_edges().iter().copied().collect();

        for &[a, b, c] in mesh.triangles() {
            for (p, q) in [(a, b), (b, c), (c, a)] {
                assert!(edges.contains(&[p.min(q), p.max(q)]));
            }
        }
    }

    #[test]
    fn test_invalid_config() {
        let sampler = reference_sampler(1);
        assert_eq!(
            builder().build(GridConfig::new(0, 5), &sampler),
            Err(TerrainError::InvalidConfig { width: 0, height: 5 })
        );
        assert!(builder().build(GridConfig::new(5, 0), &sampler).is_err());
    }

    #[test]
    fn test_invalid_extent() {
        assert!(matches!(
            GridMeshBuilder::new(Vec2::new(0.0, 1.0)),
            Err(TerrainError::InvalidExtent(_, _))
        ));
        assert!(GridMeshBuilder::new(Vec2::new(1.0, f32::NAN)).is_err());
        assert!(GridMeshBuilder::new(Vec2::new(-4.0, 4.0)).is_err());
    }

    #[test]
    fn test_vertices_span_extent() {
        let builder = GridMeshBuilder::new(Vec2::new(100.0, 50.0)).unwrap();
        let mesh = builder.build(GridConfig::new(4, 2), &flat_sampler()).unwrap();
        let v = mesh.vertices();

        assert_eq!(v[0], Vec3::new(-50.0, 0.0, -25.0));
        assert_eq!(v[1], Vec3::new(-25.0, 0.0, -25.0));
        assert_eq!(v[4], Vec3::new(50.0, 0.0, -25.0));
        assert_eq!(v[5], Vec3::new(-50.0, 0.0, 0.0));
        assert_eq!(v[14], Vec3::new(50.0, 0.0, 25.0));
    }

    #[test]
    fn test_elevation_matches_sampler() {
        let sampler = reference_sampler(31337);
        let grid = GridConfig::new(8, 8);
        let mesh = builder().build(grid, &sampler).unwrap();

        for row in 0..=8u32 {
            for col in 0..=8u32 {
                let u = col as f64 / 8.0 - 0.5;
                let v = row as f64 / 8.0 - 0.5;
                let expected = sampler.sample(u, v) as f32;
                assert_eq!(mesh.elevation_at(col, row), Some(expected));
            }
        }
        assert_eq!(mesh.elevation_at(9, 0), None);
        assert_eq!(mesh.vertex_index(8, 8), Some(80));
    }

    #[test]
    fn test_reproducibility() {
        let grid = GridConfig::new(32, 24);
        let a = builder().build(grid, &reference_sampler(7)).unwrap();
        let b = builder().build(grid, &reference_sampler(7)).unwrap();

        for (va, vb) in a.vertices().iter().zip(b.vertices()) {
            assert_eq!(va.y.to_bits(), vb.y.to_bits());
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_builds_are_independent() {
        let sampler = reference_sampler(7);
        let small = builder().build(GridConfig::new(2, 2), &sampler).unwrap();
        let large = builder().build(GridConfig::new(20, 20), &sampler).unwrap();
        let again = builder().build(GridConfig::new(2, 2), &sampler).unwrap();

        assert_eq!(small, again);
        assert_ne!(small.vertex_count(), large.vertex_count());
    }

    #[test]
    fn test_flat_normals_point_up() {
        let mesh = builder().build(GridConfig::new(4, 4), &flat_sampler()).unwrap();
        let normals = mesh.vertex_normals();
        assert_eq!(normals.len(), mesh.vertex_count());
        for n in normals {
            assert!((n - Vec3::Y).length() < 1e-6);
        }
    }

    #[test]
    fn test_normals_are_unit_length() {
        let mesh = builder().build(GridConfig::new(10, 10), &reference_sampler(9)).unwrap();
        for n in mesh.vertex_normals() {
            assert!((n.length() - 1.0).abs() < 1e-4);
            assert!(n.y > 0.0);
        }
    }

    #[test]
    fn test_elevation_range() {
        let mesh = builder().build(GridConfig::new(16, 16), &reference_sampler(4)).unwrap();
        let (min, max) = mesh.elevation_range();
        assert!(min < max, "Should have height variation");
        assert!(mesh.elevations().all(|h| h >= min && h <= max));
    }

    #[test]
    fn test_byte_views() {
        let grid = GridConfig::new(3, 2);
        let mesh = builder().build(grid, &flat_sampler()).unwrap();
        assert_eq!(mesh.positions_bytes().len(), 12 * 12);
        assert_eq!(mesh.indices_bytes().len(), 12 * 3 * 4);
        assert_eq!(mesh.edge_bytes().len(), grid.edge_count() as usize * 8);
    }

    #[test]
    fn test_into_parts() {
        let mesh = builder().build(GridConfig::new(4, 3), &reference_sampler(6)).unwrap();
        let vertices = mesh.vertices().to_vec();
        let triangles = mesh.triangles().to_vec();
        let edges = mesh.wireframe_edges().to_vec();

        let (v, t, e) = mesh.into_parts();
        assert_eq!(v, vertices);
        assert_eq!(t, triangles);
        assert_eq!(e, edges);
    }

    #[test]
    fn test_buffer_len() {
        let grid = GridConfig::new(10, 10);
        assert_eq!(buffer_len(grid.vertex_count(), grid), Ok(121));

        // 2^32 vertices pass grid validation but do not fit a 32-bit usize
        let largest = GridConfig::new(65535, 65535);
        assert!(largest.validate().is_ok());
        let result = buffer_len(largest.vertex_count(), largest);
        if usize::BITS < 64 {
            assert_eq!(result, Err(TerrainError::TooLarge(1 << 32)));
        } else {
            assert_eq!(result.map(|len| len as u64), Ok(1 << 32));
        }
    }
}
