// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CSG (Constructive Solid Geometry) Operations
//!
//! Solid intersection through csgrs BSP booleans. Booleans on real-world
//! model geometry are not universally robust, so the seam reports failure
//! per pair as `None` instead of aborting the caller.

use crate::mesh::Mesh;
use crate::solid::Solid;
use crate::triangulation::{polygon_normal, project_to_2d, triangulate_polygon};
use nalgebra::Point3;
use std::panic::{self, AssertUnwindSafe};

/// Boolean kernel used by the intersection engine
pub trait SolidBoolean: Send + Sync {
    /// Volumetric intersection of two solids expressed in the same frame
    ///
    /// `None` means the boolean failed or produced nothing usable; it is an
    /// expected outcome, not an error.
    fn intersect(&self, a: &Solid, b: &Solid) -> Option<Solid>;
}

/// csgrs-backed boolean kernel
#[derive(Debug, Clone, Copy, Default)]
pub struct CsgBoolean;

impl CsgBoolean {
    pub fn new() -> Self {
        Self
    }

    /// Convert our Mesh format to csgrs Mesh format
    fn mesh_to_csgrs(mesh: &Mesh) -> csgrs::mesh::Mesh<()> {
        use csgrs::mesh::{polygon::Polygon, vertex::Vertex, Mesh as CSGMesh};

        let mut polygons = Vec::with_capacity(mesh.triangle_count());
        for [v0, v1, v2] in mesh.triangles() {
            // Skip degenerate (zero-area/collinear) triangles to avoid NaN propagation
            let face_normal = match (v1 - v0).cross(&(v2 - v0)).try_normalize(1e-12) {
                Some(n) => n,
                None => continue,
            };

            let vertices = vec![
                Vertex::new(v0, face_normal),
                Vertex::new(v1, face_normal),
                Vertex::new(v2, face_normal),
            ];
            polygons.push(Polygon::new(vertices, None));
        }

        CSGMesh::from_polygons(&polygons, None)
    }

    /// Convert csgrs Mesh format back to our Mesh format
    fn csgrs_to_mesh(csg_mesh: &csgrs::mesh::Mesh<()>) -> Mesh {
        let mut mesh = Mesh::new();

        for polygon in &csg_mesh.polygons {
            if polygon.vertices.len() < 3 {
                continue;
            }

            let points: Vec<Point3<f64>> = polygon
                .vertices
                .iter()
                .map(|v| Point3::new(v.pos[0], v.pos[1], v.pos[2]))
                .collect();

            // The polygon's own winding defines its outward side
            let Some(normal) = polygon_normal(&points) else {
                continue;
            };

            let base = mesh.vertex_count() as u32;
            for p in &points {
                mesh.add_vertex(*p);
            }

            // FAST PATH: Triangle - no triangulation needed
            if points.len() == 3 {
                mesh.add_triangle(base, base + 1, base + 2);
                continue;
            }

            let indices = match triangulate_polygon(&project_to_2d(&points, &normal)) {
                Ok(idx) => idx,
                Err(_) => continue,
            };

            for tri in indices.chunks_exact(3) {
                let (a, b, c) = (tri[0], tri[1], tri[2]);
                // earcut does not promise a winding; restore the polygon's
                let facing = (points[b] - points[a])
                    .cross(&(points[c] - points[a]))
                    .dot(&normal);
                let (b, c) = if facing < 0.0 { (c, b) } else { (b, c) };
                mesh.add_triangle(base + a as u32, base + b as u32, base + c as u32);
            }
        }

        mesh
    }
}

impl SolidBoolean for CsgBoolean {
    fn intersect(&self, a: &Solid, b: &Solid) -> Option<Solid> {
        use csgrs::traits::CSG;

        let a_csg = Self::mesh_to_csgrs(a.mesh());
        let b_csg = Self::mesh_to_csgrs(b.mesh());
        if a_csg.polygons.is_empty() || b_csg.polygons.is_empty() {
            return None;
        }

        // BSP splitting can panic on numerically degenerate input
        let result = panic::catch_unwind(AssertUnwindSafe(|| a_csg.intersection(&b_csg))).ok()?;

        let mesh = Self::csgrs_to_mesh(&result);
        if !mesh.is_valid() {
            return None;
        }
        Solid::new(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{box_mesh, cylinder_mesh};
    use approx::assert_relative_eq;

    fn cube(min: [f64; 3], max: [f64; 3]) -> Solid {
        Solid::new(box_mesh(Point3::from(min), Point3::from(max))).unwrap()
    }

    #[test]
    fn test_overlapping_boxes_intersect() {
        let a = cube([0.0, 0.0, 0.0], [10.0, 10.0, 10.0]);
        let b = cube([5.0, 5.0, 5.0], [15.0, 15.0, 15.0]);

        let result = CsgBoolean::new().intersect(&a, &b).unwrap();
        assert_relative_eq!(result.volume(), 125.0, max_relative = 1e-6);
        assert_relative_eq!(result.centroid().unwrap(), Point3::new(7.5, 7.5, 7.5), epsilon = 1e-6);
    }

    #[test]
    fn test_disjoint_boxes_yield_nothing() {
        let a = cube([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let b = cube([5.0, 5.0, 5.0], [6.0, 6.0, 6.0]);

        let result = CsgBoolean::new().intersect(&a, &b);
        assert!(result.map_or(true, |s| s.volume() <= 1e-6));
    }

    #[test]
    fn test_cylinder_through_slab() {
        let pipe = Solid::new(cylinder_mesh(
            Point3::new(0.0, 0.0, -500.0),
            Point3::new(0.0, 0.0, 500.0),
            50.0,
            24,
        ))
        .unwrap();
        let slab = cube([-1000.0, -1000.0, 0.0], [1000.0, 1000.0, 250.0]);

        let result = CsgBoolean::new().intersect(&pipe, &slab).unwrap();
        let bounds = result.bounds();
        assert_relative_eq!(bounds.min.z, 0.0, epsilon = 1e-6);
        assert_relative_eq!(bounds.max.z, 250.0, epsilon = 1e-6);
        assert_relative_eq!(result.volume(), pipe.volume() / 4.0, max_relative = 1e-6);
    }
}
