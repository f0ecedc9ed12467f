// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cross-model element resolution.
//!
//! A picked host may live in the active document or inside a linked model.
//! Resolution returns the element, the document that owns it and the
//! transform that maps its geometry into the active document's frame.

use crate::error::{Error, Result};
use nalgebra::Matrix4;
use sleeve_lite_model::{
    Conduit, Document, Element, ElementId, ElementReference, LinkInstance, Project,
};

/// A host element located and framed for the active document
#[derive(Debug, Clone, Copy)]
pub struct ResolvedHost<'p> {
    pub reference: ElementReference,
    pub element: &'p Element,
    /// Document the element belongs to
    pub document: &'p Document,
    /// Link instance the element was reached through, if any
    pub link: Option<&'p LinkInstance>,
    /// Host frame into the active frame; identity for local hosts
    pub transform: Matrix4<f64>,
}

impl ResolvedHost<'_> {
    pub fn is_linked(&self) -> bool {
        self.link.is_some()
    }
}

/// Resolve a picked host reference
pub fn resolve_host(project: &Project, reference: ElementReference) -> Result<ResolvedHost<'_>> {
    let resolved = match reference {
        ElementReference::Local(id) => ResolvedHost {
            reference,
            element: project
                .active()
                .element(id)
                .ok_or(Error::ElementNotFound(id))?,
            document: project.active(),
            link: None,
            transform: Matrix4::identity(),
        },
        ElementReference::Linked { link, element } => {
            let instance = project
                .active()
                .link(link)
                .ok_or(Error::LinkInstanceNotFound(link))?;
            let document = project
                .linked_document(&instance.document_name)
                .ok_or_else(|| Error::LinkDocumentNotLoaded(instance.document_name.clone()))?;
            let found = document
                .element(element)
                .ok_or_else(|| Error::LinkedElementNotFound {
                    document: document.name.clone(),
                    element,
                })?;
            ResolvedHost {
                reference,
                element: found,
                document,
                link: Some(instance),
                transform: instance.transform,
            }
        }
    };

    if resolved.element.host_kind().is_none() {
        return Err(Error::NotAHost(reference));
    }
    tracing::debug!(
        host = %reference,
        document = %resolved.document.name,
        linked = resolved.is_linked(),
        "Resolved host element"
    );
    Ok(resolved)
}

/// Resolve a conduit in the active document
pub fn resolve_conduit(project: &Project, id: ElementId) -> Result<(&Element, &Conduit)> {
    let element = project.active().require_element(id)?;
    let conduit = element.as_conduit().ok_or(Error::NotAConduit(id))?;
    Ok((element, conduit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};
    use sleeve_lite_model::{HostKind, LinkInstanceId};

    fn project() -> Project {
        let mut active = Document::new("MEP");
        active.add_element(Element::host_box(
            ElementId(1),
            "Local beam",
            HostKind::Beam,
            Point3::origin(),
            Point3::new(1.0, 1.0, 1.0),
        ));
        active.add_link(LinkInstance::new(
            LinkInstanceId(10),
            "STR link",
            "STR",
            Matrix4::new_translation(&Vector3::new(5000.0, 0.0, 0.0)),
        ));
        active.add_link(LinkInstance::new(
            LinkInstanceId(11),
            "ARC link",
            "ARC",
            Matrix4::identity(),
        ));

        let mut linked = Document::new("STR");
        linked.add_element(Element::host_box(
            ElementId(1),
            "Linked slab",
            HostKind::Floor,
            Point3::origin(),
            Point3::new(1.0, 1.0, 1.0),
        ));

        let mut project = Project::new(active);
        project.load_link_document(linked);
        project
    }

    #[test]
    fn test_local_host_has_identity_transform() {
        let project = project();
        let host = resolve_host(&project, ElementReference::Local(ElementId(1))).unwrap();
        assert!(!host.is_linked());
        assert_eq!(host.document.name, "MEP");
        assert_relative_eq!(host.transform, Matrix4::identity());
    }

    #[test]
    fn test_linked_host_uses_link_transform_and_document() {
        let project = project();
        let reference = ElementReference::Linked {
            link: LinkInstanceId(10),
            element: ElementId(1),
        };
        let host = resolve_host(&project, reference).unwrap();
        assert_eq!(host.document.name, "STR");
        assert_eq!(host.element.name, "Linked slab");
        assert_relative_eq!(host.transform[(0, 3)], 5000.0);
    }

    #[test]
    fn test_link_failures_are_distinct() {
        let project = project();
        let missing_link = ElementReference::Linked {
            link: LinkInstanceId(99),
            element: ElementId(1),
        };
        assert!(matches!(
            resolve_host(&project, missing_link),
            Err(Error::LinkInstanceNotFound(LinkInstanceId(99)))
        ));

        let unloaded = ElementReference::Linked {
            link: LinkInstanceId(11),
            element: ElementId(1),
        };
        assert!(matches!(
            resolve_host(&project, unloaded),
            Err(Error::LinkDocumentNotLoaded(name)) if name == "ARC"
        ));

        let missing_element = ElementReference::Linked {
            link: LinkInstanceId(10),
            element: ElementId(7),
        };
        assert!(matches!(
            resolve_host(&project, missing_element),
            Err(Error::LinkedElementNotFound { element: ElementId(7), .. })
        ));
    }

    #[test]
    fn test_conduit_resolution_checks_kind() {
        let project = project();
        assert!(matches!(
            resolve_conduit(&project, ElementId(1)),
            Err(Error::NotAConduit(ElementId(1)))
        ));
        assert!(matches!(
            resolve_conduit(&project, ElementId(2)),
            Err(Error::ElementNotFound(ElementId(2)))
        ));
    }
}
