// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sleeve-Lite Model
//!
//! In-memory building model consumed by the opening placement engine:
//!
//! - conduit runs (pipes, ducts) with centerlines, cross-sections and ports
//! - structural host elements with nested solid geometry
//! - reference levels, the placeable family catalog and linked models
//! - opening instances, created only through an atomic [`EditScope`]

pub mod conduit;
pub mod document;
pub mod edit;
pub mod element;
pub mod error;
pub mod family;
pub mod ids;
pub mod instance;
pub mod level;
pub mod reference;

pub use conduit::{Centerline, Conduit, ConduitKind, ConduitPort, CrossSection};
pub use document::{Document, LinkInstance, Project};
pub use edit::EditScope;
pub use element::{Element, ElementKind, HostKind};
pub use error::{Error, Result};
pub use family::{FamilyCatalog, FamilySymbol};
pub use ids::{ElementId, InstanceKey, LevelId, LinkInstanceId, SymbolId};
pub use instance::{NewOpening, OpeningInstance};
pub use level::Level;
pub use reference::ElementReference;
