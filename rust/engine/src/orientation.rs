// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Orientation of placed openings.
//!
//! Angles are about +Z, counter-clockwise positive: a conduit running along
//! +X seen from an opening facing +Y gives −90°.

use crate::error::Result;
use nalgebra::Vector3;
use sleeve_lite_model::{Conduit, EditScope, InstanceKey};
use std::cmp::Ordering;

/// Horizontal vectors shorter than this carry no direction
const DIRECTION_EPSILON: f64 = 1e-9;

/// Run direction of a conduit
///
/// Uses the two extreme ports ordered lexicographically by (x, y, z), so
/// the sign does not depend on port order in the model. Without usable
/// ports it falls back to the centerline chord, then its mid tangent.
pub fn conduit_direction(conduit: &Conduit) -> Option<Vector3<f64>> {
    if conduit.ports.len() >= 2 {
        let mut positions: Vec<_> = conduit.ports.iter().map(|p| p.position).collect();
        positions.sort_by(|a, b| {
            a.x.total_cmp(&b.x)
                .then_with(|| a.y.total_cmp(&b.y))
                .then_with(|| a.z.total_cmp(&b.z))
        });
        if let [first, .., last] = positions.as_slice() {
            if let Some(d) = (last - first).try_normalize(DIRECTION_EPSILON) {
                return Some(d);
            }
        }
    }
    conduit
        .centerline
        .chord_direction()
        .or_else(|| conduit.centerline.mid_tangent())
}

/// Signed angle from `from` to `to` about +Z, both projected horizontal
///
/// `None` when either projection is degenerate.
pub fn signed_angle_about_z(from: &Vector3<f64>, to: &Vector3<f64>) -> Option<f64> {
    let a = Vector3::new(from.x, from.y, 0.0).try_normalize(DIRECTION_EPSILON)?;
    let b = Vector3::new(to.x, to.y, 0.0).try_normalize(DIRECTION_EPSILON)?;
    let cross = a.cross(&b);
    let sign = match cross.dot(&Vector3::z()).partial_cmp(&0.0) {
        Some(Ordering::Less) => -1.0,
        _ => 1.0,
    };
    Some((sign * cross.norm()).atan2(a.dot(&b)))
}

/// Rotate a placed instance so its forward axis follows `direction`
///
/// Returns the applied rotation in radians, or `None` when alignment was
/// skipped because a direction was degenerate.
pub fn align_rotation(
    scope: &mut EditScope<'_>,
    key: InstanceKey,
    direction: Option<&Vector3<f64>>,
    angle_offset: f64,
) -> Result<Option<f64>> {
    let Some(direction) = direction else {
        tracing::debug!("No conduit direction, skipping alignment");
        return Ok(None);
    };
    let forward = scope
        .instance(key)
        .ok_or(sleeve_lite_model::Error::InstanceNotFound(key))?
        .forward_axis();

    let Some(angle) = signed_angle_about_z(&forward, direction) else {
        tracing::debug!("Degenerate horizontal direction, skipping alignment");
        return Ok(None);
    };
    let rotation = angle + angle_offset;
    scope.rotate_about_z(key, rotation)?;
    tracing::debug!(degrees = rotation.to_degrees(), "Aligned opening rotation");
    Ok(Some(rotation))
}
