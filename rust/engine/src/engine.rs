// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opening placement orchestration.
//!
//! One placement runs in two phases. Analysis is read-only: resolve the
//! host, extract solids, intersect, resolve point, depth, level and size.
//! Only when every precondition holds does the second phase open a single
//! edit scope to create, size and orient the opening.

use crate::config::{EngineConfig, FamilyType};
use crate::error::{Error, Result, Role};
use crate::orientation::{align_rotation, conduit_direction};
use crate::placement::{resolve_placement, Placement};
use crate::resolver::{resolve_conduit, resolve_host};
use crate::sizing::{opening_size, OpeningSize};
use nalgebra::{Matrix4, Vector3};
use serde::Serialize;
use sleeve_lite_geometry::transform::try_inverse;
use sleeve_lite_geometry::{
    union_bounds, CsgBoolean, IntersectionEngine, SolidBoolean, SolidExtractor,
};
use sleeve_lite_model::{ElementId, ElementReference, InstanceKey, NewOpening, Project};
use std::panic::{self, AssertUnwindSafe};
use tracing::instrument;

/// Everything needed to create one opening, computed without mutation
#[derive(Debug, Clone)]
pub struct PlacementPlan {
    pub conduit: ElementId,
    pub host: ElementReference,
    /// Host category label, e.g. "Beam"
    pub host_category: &'static str,
    /// Conduit cross-section shape name
    pub section: String,
    pub placement: Placement,
    pub size: OpeningSize,
    pub family: FamilyType,
    /// Conduit run direction in the active frame
    pub direction: Option<Vector3<f64>>,
    /// Active frame into a linked host's own frame
    pub to_host_frame: Option<Matrix4<f64>>,
    pub intersection_count: usize,
    /// Total intersection volume (mm³)
    pub intersection_volume: f64,
}

/// Outcome of a successful placement
#[derive(Debug, Clone, Serialize)]
pub struct PlacementReport {
    #[serde(skip)]
    pub instance: InstanceKey,
    pub conduit: u32,
    pub host: String,
    pub host_category: &'static str,
    pub section: String,
    pub family: String,
    pub type_name: String,
    pub point: [f64; 3],
    /// Insertion point in a linked host's own frame
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_frame_point: Option<[f64; 3]>,
    pub depth: f64,
    pub level: String,
    pub level_elevation: f64,
    pub level_offset: f64,
    pub size: OpeningSize,
    /// `None` when alignment was skipped
    pub rotation_degrees: Option<f64>,
    pub intersection_count: usize,
    pub intersection_volume: f64,
    /// Size parameters the family type does not declare
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_parameters: Vec<String>,
}

/// Places openings where conduits pass through hosts
pub struct PlacementEngine<K: SolidBoolean = CsgBoolean> {
    config: EngineConfig,
    kernel: K,
}

impl PlacementEngine<CsgBoolean> {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_kernel(config, CsgBoolean::new())
    }
}

impl Default for PlacementEngine<CsgBoolean> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<K: SolidBoolean> PlacementEngine<K> {
    pub fn with_kernel(config: EngineConfig, kernel: K) -> Self {
        Self { config, kernel }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read-only analysis of one conduit/host pair
    #[instrument(skip_all, fields(conduit = %conduit, host = %host))]
    pub fn analyze(
        &self,
        project: &Project,
        conduit: ElementId,
        host: ElementReference,
    ) -> Result<PlacementPlan> {
        let (conduit_element, run) = resolve_conduit(project, conduit)?;
        let size = opening_size(&run.section, &self.config.size_table)?;
        let family = match size {
            OpeningSize::Round { .. } => self.config.round_family.clone(),
            OpeningSize::Rectangular { .. } => self.config.rect_family.clone(),
        };
        let resolved = resolve_host(project, host)?;

        let extractor = SolidExtractor::new(self.config.volume_epsilon);
        let conduit_solids = extractor.extract(&conduit_element.geometry, &Matrix4::identity());
        if conduit_solids.is_empty() {
            return Err(Error::MissingSolids {
                role: Role::Conduit,
                element: ElementReference::Local(conduit),
            });
        }
        let host_solids = extractor.extract(&resolved.element.geometry, &resolved.transform);
        if host_solids.is_empty() {
            return Err(Error::MissingSolids {
                role: Role::Host,
                element: host,
            });
        }

        let intersections = IntersectionEngine::new(self.config.volume_epsilon)
            .with_parallel(self.config.parallel_intersections)
            .intersect(&conduit_solids, &host_solids, &self.kernel);
        if intersections.is_empty() {
            return Err(Error::NoIntersection { conduit, host });
        }

        let direction = conduit_direction(run);
        let placement = resolve_placement(
            &intersections,
            &run.centerline,
            direction.as_ref(),
            union_bounds(&host_solids).as_ref(),
            project.active().levels(),
            &self.config,
        )?;
        let intersection_volume: f64 = intersections.iter().map(|s| s.volume()).sum();
        let to_host_frame = match resolved.link {
            Some(_) => Some(try_inverse(&resolved.transform)?),
            None => None,
        };

        tracing::info!(
            section = run.section.shape_name(),
            host_category = resolved.element.category(),
            conduit_solids = conduit_solids.len(),
            host_solids = host_solids.len(),
            intersections = intersections.len(),
            depth = placement.depth,
            level = %placement.level.name,
            "Penetration analysed"
        );

        Ok(PlacementPlan {
            conduit,
            host,
            host_category: resolved.element.category(),
            section: run.section.shape_name().to_string(),
            placement,
            size,
            family,
            direction,
            to_host_frame,
            intersection_count: intersections.len(),
            intersection_volume,
        })
    }

    /// Analyse a pair and create the opening in one atomic edit
    ///
    /// On any error the project is left exactly as it was. A panic in
    /// either phase is reported as [`Error::Unexpected`]; the edit scope
    /// rolls back while unwinding.
    #[instrument(skip_all, fields(conduit = %conduit, host = %host))]
    pub fn place_opening(
        &self,
        project: &mut Project,
        conduit: ElementId,
        host: ElementReference,
    ) -> Result<PlacementReport> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> Result<PlacementReport> {
            let plan = self.analyze(project, conduit, host)?;
            project
                .active()
                .catalog()
                .require(&plan.family.family, &plan.family.type_name)?;
            project
                .active_mut()
                .transact(|scope| self.apply(scope, &plan))
        }));
        let report = match outcome {
            Ok(result) => result?,
            Err(_) => {
                return Err(Error::Unexpected(
                    "panic while placing opening, project left unchanged".into(),
                ))
            }
        };

        tracing::info!(
            size = ?report.size,
            depth = report.depth,
            level = %report.level,
            rotation = ?report.rotation_degrees,
            "Opening placed"
        );
        Ok(report)
    }

    /// Place one opening per host; each host gets its own edit scope
    pub fn place_all(
        &self,
        project: &mut Project,
        conduit: ElementId,
        hosts: &[ElementReference],
    ) -> Vec<(ElementReference, Result<PlacementReport>)> {
        hosts
            .iter()
            .map(|&host| {
                let result = self.place_opening(project, conduit, host);
                if let Err(err) = &result {
                    tracing::warn!(%conduit, %host, error = %err, "Placement failed");
                }
                (host, result)
            })
            .collect()
    }

    fn apply(
        &self,
        scope: &mut sleeve_lite_model::EditScope<'_>,
        plan: &PlacementPlan,
    ) -> Result<PlacementReport> {
        let names = &self.config.parameters;
        let symbol = scope.activate_symbol(&plan.family.family, &plan.family.type_name)?;
        let key = scope.create_instance(
            symbol,
            NewOpening {
                location: plan.placement.point,
                level: plan.placement.level.id,
                conduit: plan.conduit,
                host: plan.host,
            },
        )?;

        let writes: Vec<(&str, f64)> = match plan.size {
            OpeningSize::Round { diameter } => vec![(names.diameter.as_str(), diameter)],
            OpeningSize::Rectangular { width, height } => {
                vec![(names.width.as_str(), width), (names.height.as_str(), height)]
            }
        };
        let mut skipped_parameters = Vec::new();
        for (name, value) in writes
            .into_iter()
            .chain([(names.depth.as_str(), plan.placement.depth)])
        {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidDimension { what: "opening parameter", value });
            }
            if !scope.set_parameter(key, name, value)? {
                skipped_parameters.push(name.to_string());
            }
        }

        let rotation = align_rotation(
            scope,
            key,
            plan.direction.as_ref(),
            self.config.angle_offset(),
        )?;

        let instance = scope
            .instance(key)
            .ok_or(sleeve_lite_model::Error::InstanceNotFound(key))?;
        let point = instance.location;
        Ok(PlacementReport {
            instance: key,
            conduit: plan.conduit.0,
            host: plan.host.to_string(),
            host_category: plan.host_category,
            section: plan.section.clone(),
            family: plan.family.family.clone(),
            type_name: plan.family.type_name.clone(),
            point: [point.x, point.y, point.z],
            host_frame_point: plan.to_host_frame.map(|m| {
                let p = m.transform_point(&point);
                [p.x, p.y, p.z]
            }),
            depth: plan.placement.depth,
            level: plan.placement.level.name.clone(),
            level_elevation: plan.placement.level.elevation,
            level_offset: instance.level_offset,
            size: plan.size,
            rotation_degrees: rotation.map(f64::to_degrees),
            intersection_count: plan.intersection_count,
            intersection_volume: plan.intersection_volume,
            skipped_parameters,
        })
    }
}
