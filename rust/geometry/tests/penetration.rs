// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extraction followed by intersection on nested host geometry.

use approx::assert_relative_eq;
use sleeve_lite_geometry::primitives::{box_mesh, cylinder_mesh};
use sleeve_lite_geometry::transform::axis2_placement;
use sleeve_lite_geometry::{
    extract_solids, union_bounds, CsgBoolean, GeometryNode, IntersectionEngine, Matrix4, Point3,
    Vector3,
};

fn pipe_along_x(z: f64) -> GeometryNode {
    GeometryNode::Solid(cylinder_mesh(
        Point3::new(0.0, 0.0, z),
        Point3::new(3000.0, 0.0, z),
        50.0,
        32,
    ))
}

#[test]
fn test_pipe_through_placed_wall_component() {
    // Wall authored at its own origin, placed by a component instance
    let wall = GeometryNode::instance(
        Matrix4::new_translation(&Vector3::new(1000.0, -1500.0, 0.0)),
        vec![GeometryNode::Solid(box_mesh(
            Point3::origin(),
            Point3::new(200.0, 3000.0, 3000.0),
        ))],
    );

    let conduit = extract_solids(&pipe_along_x(1500.0), &Matrix4::identity());
    let host = extract_solids(&wall, &Matrix4::identity());
    let pieces = IntersectionEngine::default().intersect(&conduit, &host, &CsgBoolean);

    assert_eq!(pieces.len(), 1);
    let bounds = union_bounds(&pieces).unwrap();
    assert_relative_eq!(bounds.min.x, 1000.0, epsilon = 1e-6);
    assert_relative_eq!(bounds.max.x, 1200.0, epsilon = 1e-6);
    assert_relative_eq!(
        pieces[0].volume(),
        conduit[0].volume() * 200.0 / 3000.0,
        max_relative = 1e-6
    );
    assert_relative_eq!(
        pieces[0].centroid().unwrap(),
        Point3::new(1100.0, 0.0, 1500.0),
        epsilon = 1e-6
    );
}

#[test]
fn test_host_in_rotated_frame() {
    // Component rotated so its local X runs along world Y; 200 thick in world X
    let frame = axis2_placement(
        Point3::new(1200.0, -1500.0, 0.0),
        None,
        Some(Vector3::y()),
    );
    let wall = GeometryNode::instance(
        frame,
        vec![GeometryNode::Solid(box_mesh(
            Point3::origin(),
            Point3::new(3000.0, 200.0, 3000.0),
        ))],
    );

    let host = extract_solids(&wall, &Matrix4::identity());
    let extents = host[0].bounds().extents();
    assert_relative_eq!(extents.x, 200.0, epsilon = 1e-9);
    assert_relative_eq!(extents.y, 3000.0, epsilon = 1e-9);

    let conduit = extract_solids(&pipe_along_x(1500.0), &Matrix4::identity());
    let pieces = IntersectionEngine::default().intersect(&conduit, &host, &CsgBoolean);
    assert_eq!(pieces.len(), 1);
    let bounds = union_bounds(&pieces).unwrap();
    assert_relative_eq!(bounds.extents().x, 200.0, epsilon = 1e-6);
}

#[test]
fn test_pipe_above_slab_segments() {
    // Two slab pieces in one group; the pipe passes above both
    let slab = GeometryNode::group(vec![
        GeometryNode::Solid(box_mesh(
            Point3::new(0.0, -500.0, 0.0),
            Point3::new(1500.0, 500.0, 250.0),
        )),
        GeometryNode::Solid(box_mesh(
            Point3::new(1500.0, -500.0, 0.0),
            Point3::new(3000.0, 500.0, 250.0),
        )),
    ]);
    let conduit = extract_solids(&pipe_along_x(1000.0), &Matrix4::identity());
    let host = extract_solids(&slab, &Matrix4::identity());
    assert_eq!(host.len(), 2);
    assert!(IntersectionEngine::default()
        .intersect(&conduit, &host, &CsgBoolean)
        .is_empty());
}
