// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Selection-driven placement command.
//!
//! The command asks a [`SelectionService`] for a conduit and a host, then
//! runs the engine. Cancelling either pick ends the command before any
//! geometry work and is reported as its own outcome, not as a failure.

use crate::engine::{PlacementEngine, PlacementReport};
use crate::error::ErrorKind;
use serde::Serialize;
use sleeve_lite_geometry::SolidBoolean;
use sleeve_lite_model::{ElementId, ElementReference, Project};

/// Result of one interactive pick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    Picked(T),
    Cancelled,
}

/// Source of user picks
pub trait SelectionService {
    fn pick_conduit(&mut self) -> Selection<ElementId>;
    fn pick_host(&mut self) -> Selection<ElementReference>;
}

/// Picks fixed in advance; a missing pick reads as a cancellation
#[derive(Debug, Clone, Default)]
pub struct PresetSelection {
    pub conduit: Option<ElementId>,
    pub host: Option<ElementReference>,
}

impl PresetSelection {
    pub fn new(conduit: ElementId, host: ElementReference) -> Self {
        Self {
            conduit: Some(conduit),
            host: Some(host),
        }
    }
}

impl SelectionService for PresetSelection {
    fn pick_conduit(&mut self) -> Selection<ElementId> {
        self.conduit.map_or(Selection::Cancelled, Selection::Picked)
    }

    fn pick_host(&mut self) -> Selection<ElementReference> {
        self.host.map_or(Selection::Cancelled, Selection::Picked)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandOutcome {
    Placed(PlacementReport),
    Cancelled,
    Failed {
        kind: ErrorKind,
        code: &'static str,
        message: String,
    },
}

impl CommandOutcome {
    /// Human-readable line for the invoking UI
    pub fn status_message(&self) -> String {
        match self {
            CommandOutcome::Placed(report) => {
                let size = match report.size {
                    crate::sizing::OpeningSize::Round { diameter } => format!("Ø{diameter}"),
                    crate::sizing::OpeningSize::Rectangular { width, height } => {
                        format!("{width}x{height}")
                    }
                };
                format!(
                    "Placed {} : {} {size} mm, depth {} mm on {} (offset {:.1} mm)",
                    report.family, report.type_name, report.depth, report.level, report.level_offset
                )
            }
            CommandOutcome::Cancelled => "Cancelled".to_string(),
            CommandOutcome::Failed { message, .. } => format!("Opening not placed: {message}"),
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self, CommandOutcome::Placed(_))
    }
}

pub struct PlaceOpeningCommand<'e, K: SolidBoolean> {
    engine: &'e PlacementEngine<K>,
}

impl<'e, K: SolidBoolean> PlaceOpeningCommand<'e, K> {
    pub fn new(engine: &'e PlacementEngine<K>) -> Self {
        Self { engine }
    }

    pub fn execute(
        &self,
        project: &mut Project,
        selection: &mut dyn SelectionService,
    ) -> CommandOutcome {
        let Selection::Picked(conduit) = selection.pick_conduit() else {
            tracing::debug!("Conduit pick cancelled");
            return CommandOutcome::Cancelled;
        };
        let Selection::Picked(host) = selection.pick_host() else {
            tracing::debug!("Host pick cancelled");
            return CommandOutcome::Cancelled;
        };

        match self.engine.place_opening(project, conduit, host) {
            Ok(report) => CommandOutcome::Placed(report),
            Err(err) => {
                tracing::warn!(code = err.code(), error = %err, "Place opening failed");
                CommandOutcome::Failed {
                    kind: err.kind(),
                    code: err.code(),
                    message: err.to_string(),
                }
            }
        }
    }
}
