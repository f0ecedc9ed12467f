// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Atomic edit scope over a document.
//!
//! The scope journals every mutation it makes: created instances, the
//! pre-image of any existing instance it touches and symbols it activates.
//! Unless [`EditScope::commit`] runs, dropping the scope replays the journal
//! backwards. That covers both an `Err` from the edit closure and a panic
//! unwinding through it.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::ids::{InstanceKey, SymbolId};
use crate::instance::{NewOpening, OpeningInstance};
use rustc_hash::FxHashMap;
use std::f64::consts::{PI, TAU};

pub struct EditScope<'a> {
    document: &'a mut Document,
    created: Vec<InstanceKey>,
    originals: FxHashMap<InstanceKey, OpeningInstance>,
    activated: Vec<SymbolId>,
    committed: bool,
}

impl<'a> EditScope<'a> {
    pub(crate) fn open(document: &'a mut Document) -> Self {
        Self {
            document,
            created: Vec::new(),
            originals: FxHashMap::default(),
            activated: Vec::new(),
            committed: false,
        }
    }

    /// Read access to the document including staged edits
    pub fn document(&self) -> &Document {
        self.document
    }

    pub fn instance(&self, key: InstanceKey) -> Option<&OpeningInstance> {
        self.document.instances.get(key)
    }

    /// Activate a family type by name so instances can be placed
    pub fn activate_symbol(&mut self, family_name: &str, type_name: &str) -> Result<SymbolId> {
        let id = self.document.catalog.require(family_name, type_name)?;
        if self.document.catalog.activate(id) {
            self.activated.push(id);
        }
        Ok(id)
    }

    /// Place a new opening instance of `symbol`
    pub fn create_instance(
        &mut self,
        symbol: SymbolId,
        opening: NewOpening,
    ) -> Result<InstanceKey> {
        let family = self
            .document
            .catalog
            .get(symbol)
            .ok_or(Error::SymbolNotFound(symbol))?;
        if !family.active && self.document.catalog.activate(symbol) {
            self.activated.push(symbol);
        }
        let elevation = self
            .document
            .level(opening.level)
            .map(|l| l.elevation)
            .ok_or(Error::LevelNotFound(opening.level))?;

        let key = self
            .document
            .instances
            .insert(OpeningInstance::new(symbol, opening, elevation));
        self.created.push(key);
        tracing::trace!(?key, "Staged opening instance");
        Ok(key)
    }

    /// Write a numeric parameter
    ///
    /// Returns `Ok(false)` without writing when the instance's symbol does
    /// not declare `name`.
    pub fn set_parameter(&mut self, key: InstanceKey, name: &str, value: f64) -> Result<bool> {
        let symbol = self.instance(key).ok_or(Error::InstanceNotFound(key))?.symbol;
        let declared = self
            .document
            .catalog
            .get(symbol)
            .is_some_and(|s| s.declares(name));
        if !declared {
            tracing::debug!(parameter = name, "Parameter not declared by family type, skipped");
            return Ok(false);
        }
        self.instance_mut(key)?
            .parameters
            .insert(name.to_string(), value);
        Ok(true)
    }

    /// Rotate an instance about the vertical line through its own origin
    ///
    /// The stored rotation is kept in `(-π, π]`.
    pub fn rotate_about_z(&mut self, key: InstanceKey, angle: f64) -> Result<()> {
        let instance = self.instance_mut(key)?;
        instance.rotation = normalize_angle(instance.rotation + angle);
        Ok(())
    }

    /// Keep every staged edit
    pub fn commit(mut self) {
        self.committed = true;
        tracing::trace!(created = self.created.len(), "Edit scope committed");
    }

    fn instance_mut(&mut self, key: InstanceKey) -> Result<&mut OpeningInstance> {
        if !self.created.contains(&key) && !self.originals.contains_key(&key) {
            let original = self
                .document
                .instances
                .get(key)
                .ok_or(Error::InstanceNotFound(key))?
                .clone();
            self.originals.insert(key, original);
        }
        self.document
            .instances
            .get_mut(key)
            .ok_or(Error::InstanceNotFound(key))
    }

    fn rollback(&mut self) {
        for key in self.created.drain(..).rev() {
            self.document.instances.remove(key);
        }
        for (key, original) in self.originals.drain() {
            if let Some(slot) = self.document.instances.get_mut(key) {
                *slot = original;
            }
        }
        for id in self.activated.drain(..) {
            self.document.catalog.deactivate(id);
        }
    }
}

impl Drop for EditScope<'_> {
    fn drop(&mut self) {
        if !self.committed {
            tracing::debug!(created = self.created.len(), "Edit scope rolled back");
            self.rollback();
        }
    }
}

fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}
