// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON scenario format.
//!
//! A scenario describes a small project (levels, opening families, conduits,
//! hosts, linked models) and the conduit/host pairs to place openings for.
//! Lengths are millimetres.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use sleeve_lite_geometry::primitives::box_mesh;
use sleeve_lite_geometry::transform::axis2_placement;
use sleeve_lite_geometry::{GeometryNode, Matrix4, Point3, Vector3};
use sleeve_lite_model::{
    Centerline, Conduit, ConduitKind, ConduitPort, CrossSection, Document, Element, ElementId,
    ElementReference, FamilySymbol, HostKind, Level, LevelId, LinkInstance, LinkInstanceId,
    Project,
};
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub levels: Vec<LevelSpec>,
    #[serde(default)]
    pub families: Vec<FamilySpec>,
    #[serde(default)]
    pub conduits: Vec<ConduitSpec>,
    #[serde(default)]
    pub hosts: Vec<HostSpec>,
    #[serde(default)]
    pub links: Vec<LinkSpec>,
    #[serde(default)]
    pub linked_documents: Vec<LinkedDocumentSpec>,
    pub placements: Vec<PlacementSpec>,
}

fn default_name() -> String {
    "Scenario".into()
}

#[derive(Debug, Deserialize)]
pub struct LevelSpec {
    pub id: u32,
    pub name: String,
    pub elevation: f64,
}

#[derive(Debug, Deserialize)]
pub struct FamilySpec {
    pub family: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub parameters: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConduitKindSpec {
    Pipe,
    Duct,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum SectionSpec {
    Circular { diameter: f64 },
    Rectangular { width: f64, height: f64 },
    Oval { width: f64, height: f64 },
    Other { name: String },
}

#[derive(Debug, Deserialize)]
pub struct PortSpec {
    pub position: [f64; 3],
    #[serde(default)]
    pub connected: bool,
}

#[derive(Debug, Deserialize)]
pub struct ConduitSpec {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    pub kind: ConduitKindSpec,
    pub centerline: Vec<[f64; 3]>,
    pub section: SectionSpec,
    /// Explicit ports; ports at the centerline ends when omitted
    #[serde(default)]
    pub ports: Option<Vec<PortSpec>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostKindSpec {
    Beam,
    Floor,
    Wall,
    Column,
    Generic,
}

/// IFC-style axis placement: Z axis plus reference X direction
#[derive(Debug, Default, Deserialize)]
pub struct PlacementSpecFrame {
    #[serde(default)]
    pub location: [f64; 3],
    #[serde(default)]
    pub axis: Option<[f64; 3]>,
    #[serde(default)]
    pub ref_direction: Option<[f64; 3]>,
}

impl PlacementSpecFrame {
    fn matrix(&self) -> Matrix4<f64> {
        axis2_placement(
            Point3::from(self.location),
            self.axis.map(Vector3::from),
            self.ref_direction.map(Vector3::from),
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GeometrySpec {
    Box {
        min: [f64; 3],
        max: [f64; 3],
    },
    Instance {
        #[serde(default)]
        placement: PlacementSpecFrame,
        children: Vec<GeometrySpec>,
    },
}

impl GeometrySpec {
    fn to_node(&self) -> GeometryNode {
        match self {
            GeometrySpec::Box { min, max } => {
                GeometryNode::Solid(box_mesh(Point3::from(*min), Point3::from(*max)))
            }
            GeometrySpec::Instance {
                placement,
                children,
            } => GeometryNode::instance(
                placement.matrix(),
                children.iter().map(GeometrySpec::to_node).collect(),
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HostSpec {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    pub kind: HostKindSpec,
    pub geometry: GeometrySpec,
}

#[derive(Debug, Deserialize)]
pub struct LinkSpec {
    pub id: u32,
    pub name: String,
    pub document: String,
    #[serde(default)]
    pub placement: PlacementSpecFrame,
}

#[derive(Debug, Deserialize)]
pub struct LinkedDocumentSpec {
    pub name: String,
    #[serde(default)]
    pub hosts: Vec<HostSpec>,
}

#[derive(Debug, Deserialize)]
pub struct HostRefSpec {
    #[serde(default)]
    pub link: Option<u32>,
    pub element: u32,
}

#[derive(Debug, Deserialize)]
pub struct PlacementSpec {
    pub conduit: u32,
    pub host: HostRefSpec,
}

impl PlacementSpec {
    pub fn conduit(&self) -> ElementId {
        ElementId(self.conduit)
    }

    pub fn host(&self) -> ElementReference {
        match self.host.link {
            None => ElementReference::Local(ElementId(self.host.element)),
            Some(link) => ElementReference::Linked {
                link: LinkInstanceId(link),
                element: ElementId(self.host.element),
            },
        }
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Build the in-memory project the placements run against
    pub fn build_project(&self) -> Result<Project> {
        let mut active = Document::new(self.name.clone());
        for level in &self.levels {
            active.add_level(Level::new(LevelId(level.id), level.name.clone(), level.elevation));
        }
        for family in &self.families {
            active.catalog_mut().add(FamilySymbol::new(
                family.family.clone(),
                family.type_name.clone(),
                family.parameters.iter().cloned(),
            ));
        }
        for spec in &self.conduits {
            let element = build_conduit(spec)
                .with_context(|| format!("conduit {}", spec.id))?;
            insert_unique(&mut active, element)?;
        }
        for spec in &self.hosts {
            insert_unique(&mut active, build_host(spec))?;
        }
        for link in &self.links {
            active.add_link(LinkInstance::new(
                LinkInstanceId(link.id),
                link.name.clone(),
                link.document.clone(),
                link.placement.matrix(),
            ));
        }

        let mut project = Project::new(active);
        for linked in &self.linked_documents {
            let mut document = Document::new(linked.name.clone());
            for spec in &linked.hosts {
                insert_unique(&mut document, build_host(spec))?;
            }
            project.load_link_document(document);
        }
        Ok(project)
    }
}

fn insert_unique(document: &mut Document, element: Element) -> Result<()> {
    let id = element.id;
    if document.add_element(element).is_some() {
        bail!("duplicate element id {id} in document '{}'", document.name);
    }
    Ok(())
}

fn build_conduit(spec: &ConduitSpec) -> Result<Element> {
    let centerline = Centerline::new(spec.centerline.iter().copied().map(Point3::from).collect())?;
    let section = match &spec.section {
        SectionSpec::Circular { diameter } => CrossSection::Circular {
            diameter: *diameter,
        },
        SectionSpec::Rectangular { width, height } => CrossSection::Rectangular {
            width: *width,
            height: *height,
        },
        SectionSpec::Oval { width, height } => CrossSection::Oval {
            width: *width,
            height: *height,
        },
        SectionSpec::Other { name } => CrossSection::Other(name.clone()),
    };
    let kind = match spec.kind {
        ConduitKindSpec::Pipe => ConduitKind::Pipe,
        ConduitKindSpec::Duct => ConduitKind::Duct,
    };

    let conduit = Conduit::new(kind, centerline, section);
    let conduit = match &spec.ports {
        None => conduit.with_end_ports(),
        Some(ports) => conduit.with_ports(
            ports
                .iter()
                .map(|p| ConduitPort::new(Point3::from(p.position), p.connected)),
        ),
    };
    let name = spec
        .name
        .clone()
        .unwrap_or_else(|| format!("Conduit {}", spec.id));
    Ok(Element::conduit(ElementId(spec.id), name, conduit))
}

fn build_host(spec: &HostSpec) -> Element {
    let kind = match spec.kind {
        HostKindSpec::Beam => HostKind::Beam,
        HostKindSpec::Floor => HostKind::Floor,
        HostKindSpec::Wall => HostKind::Wall,
        HostKindSpec::Column => HostKind::Column,
        HostKindSpec::Generic => HostKind::Generic,
    };
    let name = spec
        .name
        .clone()
        .unwrap_or_else(|| format!("Host {}", spec.id));
    let id = ElementId(spec.id);
    match &spec.geometry {
        GeometrySpec::Box { min, max } => {
            Element::host_box(id, name, kind, Point3::from(*min), Point3::from(*max))
        }
        geometry => Element::new(
            id,
            name,
            sleeve_lite_model::ElementKind::Host(kind),
            geometry.to_node(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../scenarios/beam_and_slab.json");

    #[test]
    fn test_sample_scenario_builds() {
        let scenario = Scenario::from_json(SAMPLE).unwrap();
        let project = scenario.build_project().unwrap();

        assert_eq!(project.active().levels().len(), 2);
        assert!(project.active().catalog().find("Opening Round", "Sleeve").is_some());
        assert!(project.linked_document("Structure").is_some());
        assert!(scenario.placements.iter().any(|p| p.host().is_linked()));
    }

    #[test]
    fn test_nested_host_geometry() {
        let json = r#"{
            "hosts": [{
                "id": 5, "kind": "wall",
                "geometry": {
                    "type": "instance",
                    "placement": { "location": [1000, 0, 0] },
                    "children": [
                        { "type": "box", "min": [0, 0, 0], "max": [200, 3000, 3000] },
                        { "type": "instance", "children": [
                            { "type": "box", "min": [0, 3000, 0], "max": [200, 6000, 3000] }
                        ]}
                    ]
                }
            }],
            "placements": []
        }"#;
        let project = Scenario::from_json(json).unwrap().build_project().unwrap();
        let wall = project.active().element(ElementId(5)).unwrap();
        assert_eq!(wall.geometry.leaf_count(), 2);
        assert_eq!(wall.name, "Host 5");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"{
            "hosts": [
                { "id": 1, "kind": "beam", "geometry": { "type": "box", "min": [0,0,0], "max": [1,1,1] } },
                { "id": 1, "kind": "beam", "geometry": { "type": "box", "min": [0,0,0], "max": [1,1,1] } }
            ],
            "placements": []
        }"#;
        let err = Scenario::from_json(json).unwrap().build_project().unwrap_err();
        assert!(err.to_string().contains("duplicate element id #1"));
    }
}
