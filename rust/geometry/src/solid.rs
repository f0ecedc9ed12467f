// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Solid geometry: a closed mesh with its mass properties computed once.

use crate::bounds::Aabb;
use crate::mesh::Mesh;
use nalgebra::Point3;

/// A closed boundary-representation volume.
///
/// Bounds, volume and centroid are derived from the mesh on construction and
/// never change; transforming a solid produces a new one.
#[derive(Debug, Clone)]
pub struct Solid {
    mesh: Mesh,
    bounds: Aabb,
    volume: f64,
    centroid: Option<Point3<f64>>,
}

impl Solid {
    /// Build a solid from a closed triangle mesh.
    ///
    /// Returns `None` for a mesh with an empty face set or non-finite data.
    /// The volume may still be zero or negative; callers filter on it.
    pub fn new(mesh: Mesh) -> Option<Self> {
        if mesh.is_empty() || !mesh.is_valid() {
            return None;
        }
        let bounds = mesh.bounds()?;
        let volume = mesh.signed_volume();
        let centroid = mesh.volume_centroid();
        Some(Self {
            mesh,
            bounds,
            volume,
            centroid,
        })
    }

    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    #[inline]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        self.volume
    }

    #[inline]
    pub fn centroid(&self) -> Option<Point3<f64>> {
        self.centroid
    }

    /// Whether the enclosed volume exceeds `epsilon`
    #[inline]
    pub fn is_substantial(&self, epsilon: f64) -> bool {
        self.volume > epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::box_mesh;
    use approx::assert_relative_eq;

    #[test]
    fn test_solid_mass_properties() {
        let solid = Solid::new(box_mesh(Point3::origin(), Point3::new(10.0, 20.0, 30.0))).unwrap();
        assert_relative_eq!(solid.volume(), 6000.0, epsilon = 1e-9);
        assert_relative_eq!(
            solid.centroid().unwrap(),
            Point3::new(5.0, 10.0, 15.0),
            epsilon = 1e-9
        );
        assert!(solid.is_substantial(1e-6));
    }

    #[test]
    fn test_empty_mesh_is_not_a_solid() {
        assert!(Solid::new(Mesh::new()).is_none());
    }
}
