// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Identifier types.
//!
//! Elements, levels and link instances carry the ids they were authored
//! with. Opening instances are created by this crate and live in a slot map,
//! so they get generational keys.

use slotmap::new_key_type;
use std::fmt;

/// Id of a building element within its own document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Id of a reference level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LevelId(pub u32);

/// Id of a linked-model instance placed in the active document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkInstanceId(pub u32);

/// Index of a family symbol in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub usize);

new_key_type! {
    /// Key for an opening instance created in a document.
    pub struct InstanceKey;
}
