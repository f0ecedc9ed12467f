// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opening-size mapping.
//!
//! Round conduits snap to a catalog of nominal opening sizes. Each range is
//! `(min, max]`; ranges may not overlap, so the first containing range is
//! also the only one and the result does not depend on declaration order.
//! Diameters outside every range round up to the next whole step.

use crate::error::{Error, Result};
use serde::Serialize;
use sleeve_lite_model::CrossSection;

/// Granularity for sizes outside the catalog (mm)
pub const DEFAULT_ROUND_STEP: f64 = 10.0;

/// One catalog row: diameters in `(min, max]` get `nominal`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeRange {
    pub min: f64,
    pub max: f64,
    pub nominal: f64,
}

impl SizeRange {
    pub const fn new(min: f64, max: f64, nominal: f64) -> Self {
        Self { min, max, nominal }
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value > self.min && value <= self.max
    }
}

/// Standard round openings (mm)
const DEFAULT_RANGES: [SizeRange; 9] = [
    SizeRange::new(0.0, 40.0, 50.0),
    SizeRange::new(40.0, 63.0, 75.0),
    SizeRange::new(63.0, 90.0, 110.0),
    SizeRange::new(90.0, 110.0, 125.0),
    SizeRange::new(110.0, 125.0, 160.0),
    SizeRange::new(125.0, 160.0, 200.0),
    SizeRange::new(160.0, 200.0, 250.0),
    SizeRange::new(200.0, 250.0, 315.0),
    SizeRange::new(250.0, 315.0, 400.0),
];

/// Ordered diameter-to-nominal lookup
#[derive(Debug, Clone, PartialEq)]
pub struct SizeTable {
    ranges: Vec<SizeRange>,
    step: f64,
}

impl SizeTable {
    /// Build a table, rejecting empty, non-finite or overlapping ranges
    pub fn new(ranges: Vec<SizeRange>, step: f64) -> Result<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(Error::InvalidSizeTable(format!("round-up step {step}")));
        }
        for r in &ranges {
            if !(r.min.is_finite() && r.max.is_finite() && r.nominal.is_finite()) {
                return Err(Error::InvalidSizeTable(format!("non-finite range {r:?}")));
            }
            if r.max <= r.min || r.nominal <= 0.0 {
                return Err(Error::InvalidSizeTable(format!("empty range {r:?}")));
            }
        }

        let mut sorted = ranges.clone();
        sorted.sort_by(|a, b| a.min.total_cmp(&b.min));
        if let Some(w) = sorted.windows(2).find(|w| w[1].min < w[0].max) {
            return Err(Error::InvalidSizeTable(format!(
                "ranges ({}, {}] and ({}, {}] overlap",
                w[0].min, w[0].max, w[1].min, w[1].max
            )));
        }

        Ok(Self { ranges, step })
    }

    /// Nominal opening size for an actual diameter
    pub fn map(&self, actual: f64) -> Result<f64> {
        if !(actual.is_finite() && actual > 0.0) {
            return Err(Error::InvalidDimension {
                what: "conduit diameter",
                value: actual,
            });
        }
        Ok(self
            .ranges
            .iter()
            .find(|r| r.contains(actual))
            .map(|r| r.nominal)
            .unwrap_or_else(|| round_up(actual, self.step)))
    }
}

impl Default for SizeTable {
    fn default() -> Self {
        Self {
            ranges: DEFAULT_RANGES.to_vec(),
            step: DEFAULT_ROUND_STEP,
        }
    }
}

fn round_up(value: f64, step: f64) -> f64 {
    (value / step).ceil() * step
}

/// Nominal opening dimensions for a conduit cross-section (mm)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum OpeningSize {
    Round { diameter: f64 },
    Rectangular { width: f64, height: f64 },
}

/// Map a cross-section to its opening size
///
/// Round sections go through the table; rectangular and oval sections keep
/// their width and height unchanged.
pub fn opening_size(section: &CrossSection, table: &SizeTable) -> Result<OpeningSize> {
    match section {
        CrossSection::Circular { diameter } => Ok(OpeningSize::Round {
            diameter: table.map(*diameter)?,
        }),
        CrossSection::Rectangular { width, height } | CrossSection::Oval { width, height } => {
            for (what, value) in [("conduit width", *width), ("conduit height", *height)] {
                if !(value.is_finite() && value > 0.0) {
                    return Err(Error::InvalidDimension { what, value });
                }
            }
            Ok(OpeningSize::Rectangular {
                width: *width,
                height: *height,
            })
        }
        CrossSection::Other(name) => Err(Error::UnsupportedCrossSection(name.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let table = SizeTable::default();
        assert_eq!(table.map(90.0).unwrap(), 110.0);
        assert_eq!(table.map(90.1).unwrap(), 125.0);
        assert_eq!(table.map(40.0).unwrap(), 50.0);
        assert_eq!(table.map(0.5).unwrap(), 50.0);
        assert_eq!(table.map(315.0).unwrap(), 400.0);
    }

    #[test]
    fn test_outside_catalog_rounds_up() {
        let table = SizeTable::default();
        assert_eq!(table.map(316.0).unwrap(), 320.0);
        assert_eq!(table.map(320.0).unwrap(), 320.0);
        assert_eq!(table.map(401.2).unwrap(), 410.0);
    }

    #[test]
    fn test_invalid_diameter() {
        let table = SizeTable::default();
        assert!(table.map(0.0).is_err());
        assert!(table.map(-5.0).is_err());
        assert!(table.map(f64::NAN).is_err());
    }

    #[test]
    fn test_declaration_order_is_irrelevant() {
        let mut reversed = DEFAULT_RANGES.to_vec();
        reversed.reverse();
        let forward = SizeTable::default();
        let backward = SizeTable::new(reversed, DEFAULT_ROUND_STEP).unwrap();

        let mut d = 1.0;
        while d < 500.0 {
            let a = forward.map(d).unwrap();
            assert_eq!(a, backward.map(d).unwrap(), "diameter {d}");
            assert_eq!(a, forward.map(d).unwrap());
            d += 0.5;
        }
    }

    #[test]
    fn test_overlap_rejected() {
        let ranges = vec![
            SizeRange::new(0.0, 50.0, 60.0),
            SizeRange::new(45.0, 80.0, 100.0),
        ];
        assert!(matches!(
            SizeTable::new(ranges, 10.0),
            Err(Error::InvalidSizeTable(_))
        ));

        // Touching at a boundary is fine: (0, 50] and (50, 80]
        let touching = vec![
            SizeRange::new(50.0, 80.0, 100.0),
            SizeRange::new(0.0, 50.0, 60.0),
        ];
        let table = SizeTable::new(touching, 10.0).unwrap();
        assert_eq!(table.map(50.0).unwrap(), 60.0);
    }

    #[test]
    fn test_section_dispatch() {
        let table = SizeTable::default();
        assert_eq!(
            opening_size(&CrossSection::Circular { diameter: 90.0 }, &table).unwrap(),
            OpeningSize::Round { diameter: 110.0 }
        );
        assert_eq!(
            opening_size(
                &CrossSection::Rectangular {
                    width: 195.0,
                    height: 80.0
                },
                &table
            )
            .unwrap(),
            OpeningSize::Rectangular {
                width: 195.0,
                height: 80.0
            }
        );
        assert!(matches!(
            opening_size(&CrossSection::Other("triangular".into()), &table),
            Err(Error::UnsupportedCrossSection(_))
        ));
        assert!(opening_size(
            &CrossSection::Oval {
                width: 0.0,
                height: 80.0
            },
            &table
        )
        .is_err());
    }
}
