// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building elements: conduit runs and the structural hosts they pass through.

use crate::conduit::{Conduit, ConduitKind, CrossSection};
use crate::ids::ElementId;
use nalgebra::Vector3;
use sleeve_lite_geometry::primitives::{box_mesh, cylinder_mesh, prism_mesh, DEFAULT_SEGMENTS};
use sleeve_lite_geometry::{GeometryNode, Mesh, Point3};

/// Structural category of a host element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostKind {
    Beam,
    Floor,
    Wall,
    Column,
    Generic,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Conduit(Conduit),
    Host(HostKind),
}

/// An element with its (possibly nested) solid geometry
#[derive(Debug, Clone)]
pub struct Element {
    pub id: ElementId,
    pub name: String,
    pub kind: ElementKind,
    pub geometry: GeometryNode,
}

impl Element {
    pub fn new(
        id: ElementId,
        name: impl Into<String>,
        kind: ElementKind,
        geometry: GeometryNode,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            geometry,
        }
    }

    /// Host element whose geometry is a single axis-aligned box
    pub fn host_box(
        id: ElementId,
        name: impl Into<String>,
        kind: HostKind,
        min: Point3<f64>,
        max: Point3<f64>,
    ) -> Self {
        let geometry = GeometryNode::Solid(box_mesh(min, max));
        Self::new(id, name, ElementKind::Host(kind), geometry)
    }

    /// Conduit element with geometry swept along its centerline
    pub fn conduit(id: ElementId, name: impl Into<String>, conduit: Conduit) -> Self {
        let geometry = GeometryNode::group(
            sweep_conduit(&conduit)
                .into_iter()
                .map(GeometryNode::Solid)
                .collect(),
        );
        Self::new(id, name, ElementKind::Conduit(conduit), geometry)
    }

    pub fn as_conduit(&self) -> Option<&Conduit> {
        match &self.kind {
            ElementKind::Conduit(c) => Some(c),
            ElementKind::Host(_) => None,
        }
    }

    pub fn host_kind(&self) -> Option<HostKind> {
        match self.kind {
            ElementKind::Host(k) => Some(k),
            ElementKind::Conduit(_) => None,
        }
    }

    /// Category label used in logs and reports
    pub fn category(&self) -> &'static str {
        match &self.kind {
            ElementKind::Conduit(c) => match c.kind {
                ConduitKind::Pipe => "Pipe",
                ConduitKind::Duct => "Duct",
            },
            ElementKind::Host(HostKind::Beam) => "Beam",
            ElementKind::Host(HostKind::Floor) => "Floor",
            ElementKind::Host(HostKind::Wall) => "Wall",
            ElementKind::Host(HostKind::Column) => "Column",
            ElementKind::Host(HostKind::Generic) => "Generic",
        }
    }
}

/// One solid per centerline segment. Unsupported profiles produce nothing.
fn sweep_conduit(conduit: &Conduit) -> Vec<Mesh> {
    conduit
        .centerline
        .points()
        .windows(2)
        .map(|w| match &conduit.section {
            CrossSection::Circular { diameter } => {
                cylinder_mesh(w[0], w[1], diameter / 2.0, DEFAULT_SEGMENTS)
            }
            CrossSection::Rectangular { width, height } | CrossSection::Oval { width, height } => {
                prism_mesh(w[0], w[1], *width, *height, Vector3::z())
            }
            CrossSection::Other(_) => Mesh::new(),
        })
        .filter(|m| !m.is_empty())
        .collect()
}
