// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine configuration loaded from environment variables.

use crate::sizing::SizeTable;
use sleeve_lite_geometry::DEFAULT_VOLUME_EPSILON;
use std::str::FromStr;

/// Names of the numeric parameters written on created openings
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterNames {
    pub diameter: String,
    pub width: String,
    pub height: String,
    pub depth: String,
}

impl Default for ParameterNames {
    fn default() -> Self {
        Self {
            diameter: "Diameter".into(),
            width: "Width".into(),
            height: "Height".into(),
            depth: "Depth".into(),
        }
    }
}

/// A (family name, type name) pair in the opening catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyType {
    pub family: String,
    pub type_name: String,
}

impl FamilyType {
    pub fn new(family: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            type_name: type_name.into(),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Solids and intersections at or below this volume (mm³) are noise.
    pub volume_epsilon: f64,
    /// Minimum opening depth in mm.
    pub min_depth: f64,
    /// Depth used when neither intersection nor host bounds give one.
    pub default_depth: f64,
    /// Direction component above which an axis is dominant.
    pub dominant_axis_threshold: f64,
    /// Fixed rotation added after alignment, in degrees.
    pub angle_offset_degrees: f64,
    /// Evaluate intersection pairs on the rayon pool.
    pub parallel_intersections: bool,
    /// Opening family for circular conduits.
    pub round_family: FamilyType,
    /// Opening family for rectangular and oval conduits.
    pub rect_family: FamilyType,
    pub parameters: ParameterNames,
    /// Diameter to nominal round opening size.
    pub size_table: SizeTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            volume_epsilon: DEFAULT_VOLUME_EPSILON,
            min_depth: 50.0,
            default_depth: 200.0,
            dominant_axis_threshold: 0.7,
            angle_offset_degrees: 0.0,
            parallel_intersections: false,
            round_family: FamilyType::new("Opening Round", "Sleeve"),
            rect_family: FamilyType::new("Opening Rectangular", "Recess"),
            parameters: ParameterNames::default(),
            size_table: SizeTable::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables keep their default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            volume_epsilon: env_parse("SLEEVE_VOLUME_EPSILON", defaults.volume_epsilon),
            min_depth: env_parse("SLEEVE_MIN_DEPTH_MM", defaults.min_depth),
            default_depth: env_parse("SLEEVE_DEFAULT_DEPTH_MM", defaults.default_depth),
            dominant_axis_threshold: env_parse(
                "SLEEVE_AXIS_THRESHOLD",
                defaults.dominant_axis_threshold,
            ),
            angle_offset_degrees: env_parse(
                "SLEEVE_ANGLE_OFFSET_DEG",
                defaults.angle_offset_degrees,
            ),
            parallel_intersections: env_flag("SLEEVE_PARALLEL", defaults.parallel_intersections),
            round_family: FamilyType::new(
                env_string("SLEEVE_ROUND_FAMILY", &defaults.round_family.family),
                env_string("SLEEVE_ROUND_TYPE", &defaults.round_family.type_name),
            ),
            rect_family: FamilyType::new(
                env_string("SLEEVE_RECT_FAMILY", &defaults.rect_family.family),
                env_string("SLEEVE_RECT_TYPE", &defaults.rect_family.type_name),
            ),
            parameters: defaults.parameters,
            size_table: defaults.size_table,
        }
    }

    /// Angle offset in radians
    pub fn angle_offset(&self) -> f64 {
        self.angle_offset_degrees.to_radians()
    }
}

fn env_parse<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Parse an on/off switch: `1`/`true`/`yes`/`on` or `0`/`false`/`no`/`off`,
/// case-insensitive
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| parse_flag(&v))
        .unwrap_or(default)
}

fn env_string(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
