// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sleeve-Lite Geometry Kernel
//!
//! Solid geometry for penetration analysis: f64 meshes with volume and
//! centroid integration, nalgebra placements, csgrs booleans behind the
//! [`SolidBoolean`] seam, nested-instance solid extraction and the pairwise
//! intersection engine.

pub mod bounds;
pub mod csg;
pub mod error;
pub mod extract;
pub mod intersect;
pub mod mesh;
pub mod primitives;
pub mod solid;
pub mod transform;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point2, Point3, Vector3};

pub use bounds::Aabb;
pub use csg::{CsgBoolean, SolidBoolean};
pub use error::{Error, Result};
pub use extract::{extract_solids, GeometryNode, SolidExtractor, DEFAULT_VOLUME_EPSILON};
pub use intersect::{union_bounds, IntersectionEngine};
pub use mesh::Mesh;
pub use solid::Solid;
