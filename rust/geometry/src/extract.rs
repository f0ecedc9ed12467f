// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Solid extraction from nested element geometry.
//!
//! Element geometry is a tree: component instances wrap their own geometry
//! in a local placement and may contain further instances. Extraction walks
//! the tree, composes placements on the way down and returns every leaf solid
//! expressed in a single target frame. The source tree is never mutated.

use crate::mesh::Mesh;
use crate::solid::Solid;
use crate::transform::is_identity;
use nalgebra::Matrix4;

/// Volume at or below which a solid is treated as numerical noise
pub const DEFAULT_VOLUME_EPSILON: f64 = 1e-6;

/// Immutable element geometry tree
#[derive(Debug, Clone)]
pub enum GeometryNode {
    /// Leaf solid in the frame of its enclosing node
    Solid(Mesh),
    /// Nested component instance: `transform` maps its children into the
    /// enclosing frame
    Instance {
        transform: Matrix4<f64>,
        children: Vec<GeometryNode>,
    },
}

impl GeometryNode {
    /// Convenience: an instance node wrapping the given children
    pub fn instance(transform: Matrix4<f64>, children: Vec<GeometryNode>) -> Self {
        GeometryNode::Instance {
            transform,
            children,
        }
    }

    /// Convenience: a group of nodes sharing the enclosing frame
    pub fn group(children: Vec<GeometryNode>) -> Self {
        GeometryNode::Instance {
            transform: Matrix4::identity(),
            children,
        }
    }

    /// Number of leaf solids anywhere under this node
    pub fn leaf_count(&self) -> usize {
        match self {
            GeometryNode::Solid(_) => 1,
            GeometryNode::Instance { children, .. } => {
                children.iter().map(GeometryNode::leaf_count).sum()
            }
        }
    }
}

/// Extracts solids from geometry trees into a target frame
#[derive(Debug, Clone, Copy)]
pub struct SolidExtractor {
    /// Solids with volume at or below this are skipped
    pub volume_epsilon: f64,
}

impl SolidExtractor {
    pub fn new(volume_epsilon: f64) -> Self {
        Self { volume_epsilon }
    }

    /// Flatten `root` into solids expressed in the frame implied by `base`
    ///
    /// `base` maps the root's frame into the target frame; pass the identity
    /// to stay in the element's own frame. The walk uses an explicit stack,
    /// so nesting depth is bounded only by the tree itself. Leaves come out
    /// in depth-first document order.
    pub fn extract(&self, root: &GeometryNode, base: &Matrix4<f64>) -> Vec<Solid> {
        let mut solids = Vec::new();
        let mut pending: Vec<(&GeometryNode, Matrix4<f64>)> = vec![(root, *base)];

        while let Some((node, accumulated)) = pending.pop() {
            match node {
                GeometryNode::Solid(mesh) => {
                    if let Some(solid) = self.leaf(mesh, &accumulated) {
                        solids.push(solid);
                    }
                }
                GeometryNode::Instance {
                    transform,
                    children,
                } => {
                    // Compose: parent * local
                    let composed = accumulated * transform;
                    pending.extend(children.iter().rev().map(|child| (child, composed)));
                }
            }
        }
        solids
    }

    fn leaf(&self, mesh: &Mesh, accumulated: &Matrix4<f64>) -> Option<Solid> {
        if mesh.is_empty() {
            return None;
        }
        let placed = if is_identity(accumulated) {
            mesh.clone()
        } else {
            mesh.transformed(accumulated)
        };
        let solid = Solid::new(placed)?;
        if !solid.is_substantial(self.volume_epsilon) {
            tracing::trace!(volume = solid.volume(), "Skipping negligible solid");
            return None;
        }
        Some(solid)
    }
}

impl Default for SolidExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME_EPSILON)
    }
}

/// Extract solids with the default volume threshold
pub fn extract_solids(root: &GeometryNode, base: &Matrix4<f64>) -> Vec<Solid> {
    SolidExtractor::default().extract(root, base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::box_mesh;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};

    fn unit_box() -> Mesh {
        box_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_flat_solid_identity() {
        let node = GeometryNode::Solid(unit_box());
        let solids = extract_solids(&node, &Matrix4::identity());
        assert_eq!(solids.len(), 1);
        assert_relative_eq!(solids[0].bounds().min, Point3::origin());
    }

    #[test]
    fn test_nested_transforms_compose_parent_first() {
        // Outer instance rotates 90° about Z, inner instance translates +10 X.
        // parent * local puts the box at +10 Y in the target frame.
        let rotate = Matrix4::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_2);
        let translate = Matrix4::new_translation(&Vector3::new(10.0, 0.0, 0.0));
        let tree = GeometryNode::instance(
            rotate,
            vec![GeometryNode::instance(translate, vec![GeometryNode::Solid(unit_box())])],
        );

        let solids = extract_solids(&tree, &Matrix4::identity());
        assert_eq!(solids.len(), 1);
        let c = solids[0].centroid().unwrap();
        assert_relative_eq!(c, Point3::new(-0.5, 10.5, 0.5), epsilon = 1e-9);
    }

    #[test]
    fn test_base_transform_applies_to_every_leaf() {
        let tree = GeometryNode::group(vec![
            GeometryNode::Solid(unit_box()),
            GeometryNode::instance(
                Matrix4::new_translation(&Vector3::new(0.0, 0.0, 5.0)),
                vec![GeometryNode::Solid(unit_box())],
            ),
        ]);
        let base = Matrix4::new_translation(&Vector3::new(100.0, 0.0, 0.0));

        let solids = extract_solids(&tree, &base);
        assert_eq!(solids.len(), 2);
        assert!(solids.iter().all(|s| s.bounds().min.x >= 100.0 - 1e-9));
        assert_relative_eq!(solids[1].bounds().min.z, 5.0);
    }

    #[test]
    fn test_skips_empty_and_flat_solids() {
        let flat = box_mesh(Point3::origin(), Point3::new(1.0, 1.0, 0.0));
        let tree = GeometryNode::group(vec![
            GeometryNode::Solid(Mesh::new()),
            GeometryNode::Solid(flat),
            GeometryNode::Solid(unit_box()),
        ]);
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(extract_solids(&tree, &Matrix4::identity()).len(), 1);
    }

    #[test]
    fn test_extraction_does_not_mutate_source() {
        let tree = GeometryNode::instance(
            Matrix4::new_translation(&Vector3::new(3.0, 0.0, 0.0)),
            vec![GeometryNode::Solid(unit_box())],
        );
        let first = extract_solids(&tree, &Matrix4::identity());
        let second = extract_solids(&tree, &Matrix4::identity());
        assert_relative_eq!(first[0].bounds().min, second[0].bounds().min);
        match &tree {
            GeometryNode::Instance { children, .. } => match &children[0] {
                GeometryNode::Solid(mesh) => assert_eq!(mesh, &unit_box()),
                _ => unreachable!(),
            },
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_deep_nesting_keeps_every_leaf() {
        // Each level shifts +1 Z and carries its own leaf
        let step = Matrix4::new_translation(&Vector3::new(0.0, 0.0, 1.0));
        let mut node = GeometryNode::Solid(unit_box());
        for _ in 0..1000 {
            node = GeometryNode::instance(step, vec![GeometryNode::Solid(unit_box()), node]);
        }
        assert_eq!(node.leaf_count(), 1001);

        let solids = extract_solids(&node, &Matrix4::identity());
        assert_eq!(solids.len(), 1001);
        assert_relative_eq!(solids[0].bounds().min.z, 1.0, epsilon = 1e-9);
        assert_relative_eq!(solids[1000].bounds().min.z, 1000.0, epsilon = 1e-9);
    }
}
