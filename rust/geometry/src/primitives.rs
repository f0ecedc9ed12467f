// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closed primitive meshes used to model conduits and structural hosts.
//!
//! All primitives are built with outward-facing counter-clockwise winding so
//! that [`Mesh::signed_volume`](crate::Mesh::signed_volume) is positive.

use crate::mesh::Mesh;
use crate::transform::axis2_placement;
use nalgebra::{Point3, Vector3};
use std::f64::consts::TAU;

/// Default number of segments around a round conduit
pub const DEFAULT_SEGMENTS: usize = 32;

/// Create a box mesh from AABB min/max bounds
/// Returns a mesh with 8 shared vertices and 12 triangles (2 per face)
pub fn box_mesh(min: Point3<f64>, max: Point3<f64>) -> Mesh {
    let mut mesh = Mesh::with_capacity(8, 36);

    let v0 = mesh.add_vertex(Point3::new(min.x, min.y, min.z)); // front-bottom-left
    let v1 = mesh.add_vertex(Point3::new(max.x, min.y, min.z)); // front-bottom-right
    let v2 = mesh.add_vertex(Point3::new(max.x, max.y, min.z)); // front-top-right
    let v3 = mesh.add_vertex(Point3::new(min.x, max.y, min.z)); // front-top-left
    let v4 = mesh.add_vertex(Point3::new(min.x, min.y, max.z)); // back-bottom-left
    let v5 = mesh.add_vertex(Point3::new(max.x, min.y, max.z)); // back-bottom-right
    let v6 = mesh.add_vertex(Point3::new(max.x, max.y, max.z)); // back-top-right
    let v7 = mesh.add_vertex(Point3::new(min.x, max.y, max.z)); // back-top-left

    // -Z
    mesh.add_triangle(v0, v2, v1);
    mesh.add_triangle(v0, v3, v2);
    // +Z
    mesh.add_triangle(v4, v5, v6);
    mesh.add_triangle(v4, v6, v7);
    // -X
    mesh.add_triangle(v0, v4, v7);
    mesh.add_triangle(v0, v7, v3);
    // +X
    mesh.add_triangle(v1, v2, v6);
    mesh.add_triangle(v1, v6, v5);
    // -Y
    mesh.add_triangle(v0, v1, v5);
    mesh.add_triangle(v0, v5, v4);
    // +Y
    mesh.add_triangle(v3, v7, v6);
    mesh.add_triangle(v3, v6, v2);

    mesh
}

/// Round conduit between two axis points, approximated by an inscribed prism
///
/// Returns an empty mesh for a zero-length axis, a non-positive radius or
/// fewer than three segments.
pub fn cylinder_mesh(
    start: Point3<f64>,
    end: Point3<f64>,
    radius: f64,
    segments: usize,
) -> Mesh {
    let Some(axis) = (end - start).try_normalize(1e-12) else {
        return Mesh::new();
    };
    if radius <= 0.0 || segments < 3 {
        return Mesh::new();
    }

    // u, v, axis form a right-handed frame
    let u = perpendicular(&axis);
    let v = axis.cross(&u);

    let mut mesh = Mesh::with_capacity(segments * 2 + 2, segments * 12);
    let bottom_centre = mesh.add_vertex(start);
    let top_centre = mesh.add_vertex(end);

    let ring: Vec<(u32, u32)> = (0..segments)
        .map(|i| {
            let angle = TAU * i as f64 / segments as f64;
            let offset = (u * angle.cos() + v * angle.sin()) * radius;
            (mesh.add_vertex(start + offset), mesh.add_vertex(end + offset))
        })
        .collect();

    for i in 0..segments {
        let (b0, t0) = ring[i];
        let (b1, t1) = ring[(i + 1) % segments];
        mesh.add_triangle(bottom_centre, b1, b0);
        mesh.add_triangle(top_centre, t0, t1);
        mesh.add_triangle(b0, b1, t1);
        mesh.add_triangle(b0, t1, t0);
    }

    mesh
}

/// Rectangular conduit between two axis points
///
/// `height` is measured along `up` projected perpendicular to the axis;
/// `width` lies across both. When `up` is (nearly) parallel to the axis,
/// +Y is used instead so vertical ducts get a deterministic orientation.
pub fn prism_mesh(
    start: Point3<f64>,
    end: Point3<f64>,
    width: f64,
    height: f64,
    up: Vector3<f64>,
) -> Mesh {
    let length = (end - start).norm();
    if length <= 1e-12 || width <= 0.0 || height <= 0.0 {
        return Mesh::new();
    }
    let axis = (end - start) / length;

    let up = match up.try_normalize(1e-12) {
        Some(u) if u.dot(&axis).abs() < 0.99 => u,
        _ => Vector3::y(),
    };
    // Local frame: z along the axis, y towards `up`, x = y × z across the width
    let width_dir = up.cross(&axis);
    let placement = axis2_placement(start, Some(axis), Some(width_dir));

    let half_w = width / 2.0;
    let half_h = height / 2.0;
    box_mesh(
        Point3::new(-half_w, -half_h, 0.0),
        Point3::new(half_w, half_h, length),
    )
    .transformed(&placement)
}

/// A unit vector perpendicular to `axis`, built from the least parallel world axis
fn perpendicular(axis: &Vector3<f64>) -> Vector3<f64> {
    let reference = if axis.z.abs() < 0.9 {
        Vector3::z()
    } else {
        Vector3::x()
    };
    reference.cross(axis).normalize()
}
