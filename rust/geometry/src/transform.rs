// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared transform utilities
//!
//! Placement matrices follow the axis-placement convention used throughout
//! building models: a location, a Z axis and a reference X direction, with
//! the X axis made orthogonal to Z and Y completing a right-handed frame.

use crate::error::{Error, Result};
use nalgebra::{Matrix4, Point3, Rotation3, Vector3};

/// Tolerance used when deciding whether a matrix is the identity
const IDENTITY_EPSILON: f64 = 1e-12;

/// Build a local-to-parent placement matrix
///
/// `axis` defaults to +Z and `ref_direction` to +X when absent or degenerate.
pub fn axis2_placement(
    location: Point3<f64>,
    axis: Option<Vector3<f64>>,
    ref_direction: Option<Vector3<f64>>,
) -> Matrix4<f64> {
    let z_axis = axis
        .and_then(|a| a.try_normalize(1e-12))
        .unwrap_or_else(Vector3::z);
    let x_hint = ref_direction
        .and_then(|d| d.try_normalize(1e-12))
        .unwrap_or_else(Vector3::x);

    // Ensure X is orthogonal to Z (project X onto plane perpendicular to Z)
    let x_orthogonal = x_hint - z_axis * x_hint.dot(&z_axis);
    let x_axis = match x_orthogonal.try_normalize(1e-6) {
        Some(x) => x,
        // X and Z are parallel - use a default perpendicular direction
        None if z_axis.z.abs() < 0.9 => Vector3::z().cross(&z_axis).normalize(),
        None => Vector3::x().cross(&z_axis).normalize(),
    };

    // Right-hand rule: Y = Z × X
    let y_axis = z_axis.cross(&x_axis).normalize();

    Matrix4::new(
        x_axis.x, y_axis.x, z_axis.x, location.x,
        x_axis.y, y_axis.y, z_axis.y, location.y,
        x_axis.z, y_axis.z, z_axis.z, location.z,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Rotation by `angle` radians about the vertical line through `origin`
pub fn rotation_about_z(origin: &Point3<f64>, angle: f64) -> Matrix4<f64> {
    let to_origin = Matrix4::new_translation(&-origin.coords);
    let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), angle).to_homogeneous();
    let back = Matrix4::new_translation(&origin.coords);
    back * rotation * to_origin
}

/// Whether `m` is the identity within floating-point noise
pub fn is_identity(m: &Matrix4<f64>) -> bool {
    (m - Matrix4::identity()).iter().all(|v| v.abs() <= IDENTITY_EPSILON)
}

/// Inverse of an affine transform
pub fn try_inverse(m: &Matrix4<f64>) -> Result<Matrix4<f64>> {
    m.try_inverse()
        .ok_or_else(|| Error::InvalidTransform("matrix is singular".to_string()))
}

/// Column `index` of the linear part (the image of a local basis vector)
#[inline]
pub fn basis_vector(m: &Matrix4<f64>, index: usize) -> Vector3<f64> {
    Vector3::new(m[(0, index)], m[(1, index)], m[(2, index)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_default_placement_is_translation() {
        let m = axis2_placement(Point3::new(1.0, 2.0, 3.0), None, None);
        assert_relative_eq!(m, Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_ref_direction_orthogonalised() {
        // Reference direction leaning into Z is projected onto the XY plane
        let m = axis2_placement(Point3::origin(), None, Some(Vector3::new(0.0, 1.0, 1.0)));
        assert_relative_eq!(basis_vector(&m, 0), Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(basis_vector(&m, 1), -Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn test_parallel_axes_fall_back() {
        let m = axis2_placement(Point3::origin(), Some(Vector3::x()), Some(Vector3::x()));
        let x = basis_vector(&m, 0);
        assert_relative_eq!(x.dot(&Vector3::x()), 0.0, epsilon = 1e-12);
        assert_relative_eq!(x.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_about_z_keeps_pivot() {
        let pivot = Point3::new(10.0, 5.0, 2.0);
        let r = rotation_about_z(&pivot, FRAC_PI_2);
        assert_relative_eq!(r.transform_point(&pivot), pivot, epsilon = 1e-12);
        let p = r.transform_point(&Point3::new(11.0, 5.0, 7.0));
        assert_relative_eq!(p, Point3::new(10.0, 6.0, 7.0), epsilon = 1e-12);
    }

    #[test]
    fn test_identity_and_inverse() {
        assert!(is_identity(&Matrix4::identity()));
        let m = axis2_placement(Point3::new(5.0, 0.0, 0.0), Some(Vector3::y()), None);
        assert!(!is_identity(&m));
        let inv = try_inverse(&m).unwrap();
        assert!(is_identity(&(m * inv).map(|v| (v * 1e9).round() / 1e9)));
        assert!(try_inverse(&Matrix4::zeros()).is_err());
    }
}
