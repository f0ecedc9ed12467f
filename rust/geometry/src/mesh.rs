// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures
//!
//! Closed triangle meshes in f64 precision. Building models routinely sit
//! tens of kilometres from the origin, so positions stay in f64 all the way
//! through volume and centroid integration.

use crate::bounds::Aabb;
use nalgebra::{Matrix4, Point3, Vector3};

/// Triangle mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f64>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Add a vertex and return its index
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>) -> u32 {
        let index = self.vertex_count() as u32;
        self.positions.push(position.x);
        self.positions.push(position.y);
        self.positions.push(position.z);
        index
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Vertex position by index
    #[inline]
    pub fn vertex(&self, index: usize) -> Point3<f64> {
        Point3::new(
            self.positions[index * 3],
            self.positions[index * 3 + 1],
            self.positions[index * 3 + 2],
        )
    }

    /// Iterate over triangles as vertex triples
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f64>; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                self.vertex(tri[0] as usize),
                self.vertex(tri[1] as usize),
                self.vertex(tri[2] as usize),
            ]
        })
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty (no faces)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty() || self.positions.is_empty()
    }

    /// Check that every coordinate is finite and every index is in range
    pub fn is_valid(&self) -> bool {
        let count = self.vertex_count() as u32;
        self.positions.iter().all(|v| v.is_finite())
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| i < count)
    }

    /// Axis-aligned bounds, `None` for a mesh without vertices
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.positions.chunks_exact(3).map(|c| Point3::new(c[0], c[1], c[2])))
    }

    /// Signed enclosed volume (divergence theorem over the triangles)
    ///
    /// Positive for a closed mesh with outward-facing (counter-clockwise)
    /// winding. Tetrahedra are fanned from the first vertex rather than the
    /// origin so that georeferenced coordinates do not cancel catastrophically.
    pub fn signed_volume(&self) -> f64 {
        let Some(reference) = self.reference_point() else {
            return 0.0;
        };
        self.triangles()
            .map(|[a, b, c]| tetra_volume(&reference, &a, &b, &c))
            .sum()
    }

    /// Volume-weighted centroid of the enclosed solid
    ///
    /// Returns `None` when the enclosed volume is not positive (open or
    /// inverted meshes, zero-thickness slivers).
    pub fn volume_centroid(&self) -> Option<Point3<f64>> {
        let reference = self.reference_point()?;
        let mut total = 0.0;
        let mut weighted = Vector3::zeros();

        for [a, b, c] in self.triangles() {
            let v = tetra_volume(&reference, &a, &b, &c);
            let centre = (reference.coords + a.coords + b.coords + c.coords) / 4.0;
            weighted += centre * v;
            total += v;
        }

        if total <= f64::EPSILON || !total.is_finite() {
            return None;
        }
        let centroid = Point3::from(weighted / total);
        centroid.coords.iter().all(|v| v.is_finite()).then_some(centroid)
    }

    /// Return a copy of this mesh with `transform` applied to every vertex
    ///
    /// Mirroring transforms (negative determinant) flip triangle winding so
    /// the result keeps outward-facing orientation.
    pub fn transformed(&self, transform: &Matrix4<f64>) -> Mesh {
        let mut positions = Vec::with_capacity(self.positions.len());
        for chunk in self.positions.chunks_exact(3) {
            let p = transform.transform_point(&Point3::new(chunk[0], chunk[1], chunk[2]));
            positions.extend_from_slice(&[p.x, p.y, p.z]);
        }

        let mirrored = transform.fixed_view::<3, 3>(0, 0).clone_owned().determinant() < 0.0;
        let indices = if mirrored {
            self.indices
                .chunks_exact(3)
                .flat_map(|tri| [tri[0], tri[2], tri[1]])
                .collect()
        } else {
            self.indices.clone()
        };

        Mesh { positions, indices }
    }

    fn reference_point(&self) -> Option<Point3<f64>> {
        if self.is_empty() {
            return None;
        }
        Some(self.vertex(0))
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn tetra_volume(o: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    (a - o).dot(&(b - o).cross(&(c - o))) / 6.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::box_mesh;
    use approx::assert_relative_eq;

    #[test]
    fn test_mesh_creation() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh.bounds().is_none());
    }

    #[test]
    fn test_box_volume_and_centroid() {
        let mesh = box_mesh(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 3.0, 4.0));
        assert_relative_eq!(mesh.signed_volume(), 24.0, epsilon = 1e-9);

        let c = mesh.volume_centroid().unwrap();
        assert_relative_eq!(c.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(c.y, 1.5, epsilon = 1e-9);
        assert_relative_eq!(c.z, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_georeferenced_volume_keeps_precision() {
        // Swiss LV95 style coordinates in millimetres
        let min = Point3::new(2_679_012_000.0, 1_247_892_000.0, 432_000.0);
        let max = Point3::new(min.x + 100.0, min.y + 200.0, min.z + 300.0);
        let mesh = box_mesh(min, max);
        assert_relative_eq!(mesh.signed_volume(), 6_000_000.0, max_relative = 1e-9);
    }

    #[test]
    fn test_mirror_transform_keeps_outward_winding() {
        let mesh = box_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let mirror = Matrix4::new_nonuniform_scaling(&Vector3::new(-1.0, 1.0, 1.0));

        let mirrored = mesh.transformed(&mirror);
        assert_relative_eq!(mirrored.signed_volume(), 1.0, epsilon = 1e-9);
        assert!(mirrored.volume_centroid().unwrap().x < 0.0);
    }

    #[test]
    fn test_inverted_mesh_has_no_centroid() {
        let mut mesh = box_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        for tri in mesh.indices.chunks_exact_mut(3) {
            tri.swap(1, 2);
        }
        assert!(mesh.signed_volume() < 0.0);
        assert!(mesh.volume_centroid().is_none());
    }

    #[test]
    fn test_is_valid_rejects_nan_and_bad_indices() {
        let mut mesh = box_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        assert!(mesh.is_valid());
        mesh.indices.push(999);
        mesh.indices.push(0);
        mesh.indices.push(1);
        assert!(!mesh.is_valid());

        let mut nan = box_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        nan.positions[0] = f64::NAN;
        assert!(!nan.is_valid());
    }
}
