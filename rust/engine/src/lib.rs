// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sleeve-Lite Engine
//!
//! Places opening components (sleeves, recesses) where a pipe or duct passes
//! through a beam, floor or wall, including hosts that live in linked
//! models.
//!
//! ```text
//! pick conduit + host
//!   -> resolve host frame (local or through a link transform)
//!   -> extract solids, host moved into the conduit's frame
//!   -> intersect every solid pair, drop slivers
//!   -> point on the conduit axis, depth, nearest level, nominal size
//!   -> one edit scope: create, set parameters, align rotation
//! ```
//!
//! # Example
//!
//! ```no_run
//! use sleeve_lite_engine::{EngineConfig, PlacementEngine};
//! use sleeve_lite_model::{Document, ElementId, ElementReference, Project};
//!
//! let engine = PlacementEngine::new(EngineConfig::from_env());
//! let mut project = Project::new(Document::new("MEP"));
//! match engine.place_opening(&mut project, ElementId(1), ElementReference::Local(ElementId(2))) {
//!     Ok(report) => println!("placed at {:?}", report.point),
//!     Err(err) => eprintln!("{err}"),
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod orientation;
pub mod placement;
pub mod resolver;
pub mod selection;
pub mod sizing;

pub use config::{parse_flag, EngineConfig, FamilyType, ParameterNames};
pub use engine::{PlacementEngine, PlacementPlan, PlacementReport};
pub use error::{Error, ErrorKind, Result, Role};
pub use orientation::{align_rotation, conduit_direction, signed_angle_about_z};
pub use placement::{nearest_level, resolve_placement, Placement};
pub use resolver::{resolve_conduit, resolve_host, ResolvedHost};
pub use selection::{
    CommandOutcome, PlaceOpeningCommand, PresetSelection, Selection, SelectionService,
};
pub use sizing::{opening_size, OpeningSize, SizeRange, SizeTable};
