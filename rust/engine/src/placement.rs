// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement resolution: insertion point, opening depth and reference level
//! derived from the conduit/host intersection volumes.

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};
use sleeve_lite_geometry::{union_bounds, Aabb, Solid};
use sleeve_lite_model::{Centerline, Level};

/// Resolved insertion data for one opening
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Insertion point on the conduit axis
    pub point: Point3<f64>,
    /// Opening depth along the conduit's dominant axis (mm)
    pub depth: f64,
    pub level: Level,
}

/// Combine intersection volumes into one placement
///
/// `direction` is the conduit run direction if known; `host_bounds` is the
/// host's extent in the same frame, used when the intersections give no
/// usable depth.
pub fn resolve_placement(
    intersections: &[Solid],
    centerline: &Centerline,
    direction: Option<&Vector3<f64>>,
    host_bounds: Option<&Aabb>,
    levels: &[Level],
    config: &EngineConfig,
) -> Result<Placement> {
    let raw = placement_point(intersections).ok_or_else(|| {
        Error::Unexpected("intersection volumes have no centroid or bounds".into())
    })?;
    let point = project_onto_centerline(&raw, centerline);
    let depth = resolve_depth(intersections, direction, host_bounds, config);
    let level = nearest_level(levels, point.z)?.clone();

    tracing::debug!(
        raw = ?[raw.x, raw.y, raw.z],
        point = ?[point.x, point.y, point.z],
        depth,
        level = %level.name,
        "Resolved placement"
    );
    Ok(Placement {
        point,
        depth,
        level,
    })
}

/// Mean of the intersection centroids
///
/// Volumes without a centroid are left out of the mean. With no centroid at
/// all the center of the union bounding box is used.
pub fn placement_point(intersections: &[Solid]) -> Option<Point3<f64>> {
    let centroids: Vec<Point3<f64>> = intersections.iter().filter_map(Solid::centroid).collect();
    if centroids.is_empty() {
        return union_bounds(intersections).map(|b| b.center());
    }
    let sum = centroids
        .iter()
        .fold(Vector3::zeros(), |acc, c| acc + c.coords);
    Some(Point3::from(sum / centroids.len() as f64))
}

/// Orthogonal projection onto the segment `start..end`, clamped to its ends
///
/// A zero-length segment leaves the point unchanged.
pub fn project_onto_segment(
    point: &Point3<f64>,
    start: &Point3<f64>,
    end: &Point3<f64>,
) -> Point3<f64> {
    let axis = end - start;
    let length_sq = axis.norm_squared();
    if length_sq <= 1e-18 {
        return *point;
    }
    let t = ((point - start).dot(&axis) / length_sq).clamp(0.0, 1.0);
    start + axis * t
}

/// Closest point on the centerline polyline
///
/// Each segment is projected with [`project_onto_segment`]; the nearest
/// projection wins and ties go to the earlier segment. A two-point line
/// reduces to the plain endpoint projection.
pub fn project_onto_centerline(point: &Point3<f64>, centerline: &Centerline) -> Point3<f64> {
    centerline
        .points()
        .windows(2)
        .map(|w| project_onto_segment(point, &w[0], &w[1]))
        .fold(None, |best: Option<(f64, Point3<f64>)>, candidate| {
            let distance = (candidate - point).norm_squared();
            match best {
                Some((d, _)) if d <= distance => best,
                _ => Some((distance, candidate)),
            }
        })
        .map_or(*point, |(_, p)| p)
}

/// Extent of `bounds` along the dominant axis of `direction`
///
/// Near-vertical runs take the Z extent, runs mostly along X or Y take that
/// extent, and diagonal runs take the larger horizontal extent.
pub fn dominant_extent(bounds: &Aabb, direction: Option<&Vector3<f64>>, threshold: f64) -> f64 {
    let e = bounds.extents();
    let d = direction.copied().unwrap_or_else(Vector3::zeros);
    if d.z.abs() > threshold {
        e.z
    } else if d.x.abs() > threshold {
        e.x
    } else if d.y.abs() > threshold {
        e.y
    } else {
        e.x.max(e.y)
    }
}

/// Opening depth with fallbacks and the minimum floor applied
pub fn resolve_depth(
    intersections: &[Solid],
    direction: Option<&Vector3<f64>>,
    host_bounds: Option<&Aabb>,
    config: &EngineConfig,
) -> f64 {
    let usable = |d: f64| d.is_finite() && d > 0.0;
    let threshold = config.dominant_axis_threshold;

    let depth = union_bounds(intersections)
        .map(|b| dominant_extent(&b, direction, threshold))
        .filter(|d| usable(*d))
        .or_else(|| {
            host_bounds
                .map(|b| dominant_extent(b, direction, threshold))
                .filter(|d| usable(*d))
        })
        .unwrap_or(config.default_depth);

    depth.max(config.min_depth)
}

/// Level with elevation closest to `z`; ties go to the lower level
pub fn nearest_level(levels: &[Level], z: f64) -> Result<&Level> {
    levels
        .iter()
        .min_by(|a, b| {
            let da = (a.elevation - z).abs();
            let db = (b.elevation - z).abs();
            da.total_cmp(&db)
                .then_with(|| a.elevation.total_cmp(&b.elevation))
        })
        .ok_or(Error::NoReferenceLevel)
}
