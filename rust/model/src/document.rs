// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Documents, link instances and the project that owns them.

use crate::edit::EditScope;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::family::FamilyCatalog;
use crate::ids::{ElementId, InstanceKey, LevelId, LinkInstanceId};
use crate::instance::OpeningInstance;
use crate::level::Level;
use nalgebra::Matrix4;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

/// A linked model placed in the host document
#[derive(Debug, Clone, PartialEq)]
pub struct LinkInstance {
    pub id: LinkInstanceId,
    pub name: String,
    /// Name of the linked document in the project
    pub document_name: String,
    /// Total transform: link frame into the host document frame
    pub transform: Matrix4<f64>,
}

impl LinkInstance {
    pub fn new(
        id: LinkInstanceId,
        name: impl Into<String>,
        document_name: impl Into<String>,
        transform: Matrix4<f64>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            document_name: document_name.into(),
            transform,
        }
    }
}

/// One building model
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub name: String,
    elements: FxHashMap<ElementId, Element>,
    /// Sorted by elevation
    levels: Vec<Level>,
    links: FxHashMap<LinkInstanceId, LinkInstance>,
    pub(crate) catalog: FamilyCatalog,
    pub(crate) instances: SlotMap<InstanceKey, OpeningInstance>,
}

impl Document {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Insert an element, returning the one it replaced
    pub fn add_element(&mut self, element: Element) -> Option<Element> {
        self.elements.insert(element.id, element)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn require_element(&self, id: ElementId) -> Result<&Element> {
        self.element(id).ok_or(Error::ElementNotFound(id))
    }

    /// Elements in ascending id order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        let mut all: Vec<&Element> = self.elements.values().collect();
        all.sort_by_key(|e| e.id);
        all.into_iter()
    }

    pub fn add_level(&mut self, level: Level) {
        self.levels.retain(|l| l.id != level.id);
        let at = self
            .levels
            .partition_point(|l| l.elevation <= level.elevation);
        self.levels.insert(at, level);
    }

    /// Levels in ascending elevation
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn level(&self, id: LevelId) -> Option<&Level> {
        self.levels.iter().find(|l| l.id == id)
    }

    pub fn add_link(&mut self, link: LinkInstance) {
        self.links.insert(link.id, link);
    }

    pub fn link(&self, id: LinkInstanceId) -> Option<&LinkInstance> {
        self.links.get(&id)
    }

    pub fn catalog(&self) -> &FamilyCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut FamilyCatalog {
        &mut self.catalog
    }

    pub fn instance(&self, key: InstanceKey) -> Option<&OpeningInstance> {
        self.instances.get(key)
    }

    pub fn instances(&self) -> impl Iterator<Item = (InstanceKey, &OpeningInstance)> {
        self.instances.iter()
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Run `edit` inside an atomic edit scope
    ///
    /// Everything the closure does through the scope is kept only when it
    /// returns `Ok`. On `Err`, or if it panics, the document is restored to
    /// its state before the call.
    pub fn transact<T, E>(
        &mut self,
        edit: impl FnOnce(&mut EditScope<'_>) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E> {
        let mut scope = EditScope::open(self);
        let result = edit(&mut scope);
        if result.is_ok() {
            scope.commit();
        }
        result
    }
}

/// The active document plus every loaded linked document
#[derive(Debug, Clone, Default)]
pub struct Project {
    active: Document,
    linked: FxHashMap<String, Document>,
}

impl Project {
    pub fn new(active: Document) -> Self {
        Self {
            active,
            linked: FxHashMap::default(),
        }
    }

    pub fn active(&self) -> &Document {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut Document {
        &mut self.active
    }

    /// Load a linked document, keyed by its name
    pub fn load_link_document(&mut self, document: Document) {
        self.linked.insert(document.name.clone(), document);
    }

    pub fn linked_document(&self, name: &str) -> Option<&Document> {
        self.linked.get(name)
    }
}
