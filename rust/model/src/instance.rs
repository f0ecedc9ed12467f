// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opening instances placed into the active document.

use crate::ids::{ElementId, LevelId, SymbolId};
use crate::reference::ElementReference;
use nalgebra::{Matrix4, Point3, Vector3};
use rustc_hash::FxHashMap;
use sleeve_lite_geometry::transform::{basis_vector, rotation_about_z};

/// Where and against what a new opening goes
#[derive(Debug, Clone, PartialEq)]
pub struct NewOpening {
    pub location: Point3<f64>,
    pub level: LevelId,
    pub conduit: ElementId,
    pub host: ElementReference,
}

/// A placed opening component
///
/// The placement is a translation to `location` followed by `rotation`
/// radians about +Z, counter-clockwise positive.
#[derive(Debug, Clone, PartialEq)]
pub struct OpeningInstance {
    pub symbol: SymbolId,
    pub location: Point3<f64>,
    pub level: LevelId,
    /// `location.z` above the level's elevation
    pub level_offset: f64,
    pub rotation: f64,
    pub conduit: ElementId,
    pub host: ElementReference,
    pub(crate) parameters: FxHashMap<String, f64>,
}

impl OpeningInstance {
    pub(crate) fn new(symbol: SymbolId, opening: NewOpening, level_elevation: f64) -> Self {
        Self {
            symbol,
            level_offset: opening.location.z - level_elevation,
            location: opening.location,
            level: opening.level,
            rotation: 0.0,
            conduit: opening.conduit,
            host: opening.host,
            parameters: FxHashMap::default(),
        }
    }

    /// Placement transform: local frame into the document frame
    pub fn placement(&self) -> Matrix4<f64> {
        rotation_about_z(&self.location, self.rotation)
            * Matrix4::new_translation(&self.location.coords)
    }

    /// Local +Y in the document frame; the opening's facing direction
    pub fn forward_axis(&self) -> Vector3<f64> {
        basis_vector(&self.placement(), 1)
    }

    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.parameters.get(name).copied()
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&str, f64)> {
        self.parameters.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
