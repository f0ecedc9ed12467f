// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placeable opening families.
//!
//! A catalog holds family symbols keyed by (family name, type name). Each
//! symbol declares the numeric parameters its instances expose; writes to
//! undeclared parameters are ignored by the edit scope.

use crate::error::{Error, Result};
use crate::ids::SymbolId;
use rustc_hash::FxHashMap;

/// A loadable family type
#[derive(Debug, Clone, PartialEq)]
pub struct FamilySymbol {
    pub family_name: String,
    pub type_name: String,
    /// Numeric parameter names declared by this type
    pub parameters: Vec<String>,
    /// Symbols must be activated before the first instance is placed
    pub active: bool,
}

impl FamilySymbol {
    pub fn new<S: Into<String>>(
        family_name: impl Into<String>,
        type_name: impl Into<String>,
        parameters: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            family_name: family_name.into(),
            type_name: type_name.into(),
            parameters: parameters.into_iter().map(Into::into).collect(),
            active: false,
        }
    }

    pub fn declares(&self, parameter: &str) -> bool {
        self.parameters.iter().any(|p| p == parameter)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FamilyCatalog {
    symbols: Vec<FamilySymbol>,
    /// family name -> type name -> symbol
    index: FxHashMap<String, FxHashMap<String, SymbolId>>,
}

impl FamilyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol, replacing any existing symbol with the same names
    pub fn add(&mut self, symbol: FamilySymbol) -> SymbolId {
        if let Some(id) = self.find(&symbol.family_name, &symbol.type_name) {
            self.symbols[id.0] = symbol;
            return id;
        }
        let id = SymbolId(self.symbols.len());
        self.index
            .entry(symbol.family_name.clone())
            .or_default()
            .insert(symbol.type_name.clone(), id);
        self.symbols.push(symbol);
        id
    }

    /// Look up a symbol by exact family and type name
    pub fn find(&self, family_name: &str, type_name: &str) -> Option<SymbolId> {
        self.index.get(family_name)?.get(type_name).copied()
    }

    /// Like [`find`](Self::find) but a missing type is an error
    pub fn require(&self, family_name: &str, type_name: &str) -> Result<SymbolId> {
        self.find(family_name, type_name)
            .ok_or_else(|| Error::FamilyTypeNotFound {
                family: family_name.to_string(),
                type_name: type_name.to_string(),
            })
    }

    pub fn get(&self, id: SymbolId) -> Option<&FamilySymbol> {
        self.symbols.get(id.0)
    }

    /// Mark a symbol active; returns whether it was inactive before
    pub(crate) fn activate(&mut self, id: SymbolId) -> bool {
        match self.symbols.get_mut(id.0) {
            Some(s) if !s.active => {
                s.active = true;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn deactivate(&mut self, id: SymbolId) {
        if let Some(s) = self.symbols.get_mut(id.0) {
            s.active = false;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FamilySymbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_by_both_names() {
        let mut catalog = FamilyCatalog::new();
        catalog.add(FamilySymbol::new("Opening Round", "Sleeve", ["Diameter", "Depth"]));
        catalog.add(FamilySymbol::new("Opening Round", "Core", ["Diameter"]));

        assert_eq!(catalog.find("Opening Round", "Core"), Some(SymbolId(1)));
        assert_eq!(catalog.find("Opening Round", "Sleeve"), Some(SymbolId(0)));
        assert!(catalog.find("Opening Rectangular", "Core").is_none());
        assert!(catalog.find("Opening Round", "Missing").is_none());
        assert!(matches!(
            catalog.require("Opening Rectangular", "Sleeve"),
            Err(Error::FamilyTypeNotFound { .. })
        ));
    }

    #[test]
    fn test_add_replaces_same_type() {
        let mut catalog = FamilyCatalog::new();
        let a = catalog.add(FamilySymbol::new("F", "T", ["Depth"]));
        let b = catalog.add(FamilySymbol::new("F", "T", ["Depth", "Width"]));
        assert_eq!(a, b);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find("F", "T"), Some(a));
        assert!(catalog.get(a).unwrap().declares("Width"));
    }

    #[test]
    fn test_activate_reports_transition() {
        let mut catalog = FamilyCatalog::new();
        let id = catalog.add(FamilySymbol::new("F", "T", Vec::<String>::new()));
        assert!(catalog.activate(id));
        assert!(!catalog.activate(id));
        catalog.deactivate(id);
        assert!(!catalog.get(id).unwrap().active);
    }
}
