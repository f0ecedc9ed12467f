// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conduit runs: pipes and ducts with a centerline, a cross-section and
//! connection ports.

use crate::error::{Error, Result};
use nalgebra::{Matrix4, Point3, Vector3};
use smallvec::SmallVec;

/// Service category of a conduit run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConduitKind {
    Pipe,
    Duct,
}

/// Cross-section profile of a conduit (mm)
#[derive(Debug, Clone, PartialEq)]
pub enum CrossSection {
    Circular { diameter: f64 },
    Rectangular { width: f64, height: f64 },
    /// Flat-oval duct; treated as its bounding rectangle for openings
    Oval { width: f64, height: f64 },
    /// Any profile the opening catalog has no family for
    Other(String),
}

impl CrossSection {
    /// Short shape name for messages and reports
    pub fn shape_name(&self) -> &str {
        match self {
            CrossSection::Circular { .. } => "circular",
            CrossSection::Rectangular { .. } => "rectangular",
            CrossSection::Oval { .. } => "oval",
            CrossSection::Other(name) => name,
        }
    }
}

/// Connection point at the end of a conduit run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConduitPort {
    pub position: Point3<f64>,
    pub connected: bool,
}

impl ConduitPort {
    pub fn new(position: Point3<f64>, connected: bool) -> Self {
        Self {
            position,
            connected,
        }
    }
}

/// Polyline centerline of a conduit run, at least two distinct points
#[derive(Debug, Clone, PartialEq)]
pub struct Centerline {
    points: Vec<Point3<f64>>,
}

impl Centerline {
    pub fn new(points: Vec<Point3<f64>>) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::InvalidCenterline(format!(
                "need at least 2 points, got {}",
                points.len()
            )));
        }
        if points.iter().any(|p| !p.coords.iter().all(|c| c.is_finite())) {
            return Err(Error::InvalidCenterline("non-finite coordinate".into()));
        }
        Ok(Self { points })
    }

    /// Straight centerline between two points
    pub fn line(start: Point3<f64>, end: Point3<f64>) -> Result<Self> {
        Self::new(vec![start, end])
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    pub fn start(&self) -> Point3<f64> {
        self.points[0]
    }

    pub fn end(&self) -> Point3<f64> {
        self.points[self.points.len() - 1]
    }

    /// Total polyline length
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }

    /// Unit chord direction from start to end, `None` for a closed run
    pub fn chord_direction(&self) -> Option<Vector3<f64>> {
        (self.end() - self.start()).try_normalize(1e-9)
    }

    /// Unit tangent at the middle of the run (by arc length)
    pub fn mid_tangent(&self) -> Option<Vector3<f64>> {
        let half = self.length() / 2.0;
        let mut walked = 0.0;
        for w in self.points.windows(2) {
            let seg = w[1] - w[0];
            let len = seg.norm();
            if len > 1e-9 && walked + len >= half {
                return Some(seg / len);
            }
            walked += len;
        }
        None
    }

    /// Centerline mapped through an affine transform
    pub fn transformed(&self, transform: &Matrix4<f64>) -> Centerline {
        Centerline {
            points: self
                .points
                .iter()
                .map(|p| transform.transform_point(p))
                .collect(),
        }
    }
}

/// A pipe or duct run
#[derive(Debug, Clone, PartialEq)]
pub struct Conduit {
    pub kind: ConduitKind,
    pub centerline: Centerline,
    pub section: CrossSection,
    pub ports: SmallVec<[ConduitPort; 2]>,
}

impl Conduit {
    pub fn new(kind: ConduitKind, centerline: Centerline, section: CrossSection) -> Self {
        Self {
            kind,
            centerline,
            section,
            ports: SmallVec::new(),
        }
    }

    /// Add end ports at the centerline's endpoints
    pub fn with_end_ports(mut self) -> Self {
        let (start, end) = (self.centerline.start(), self.centerline.end());
        self.ports.push(ConduitPort::new(start, false));
        self.ports.push(ConduitPort::new(end, false));
        self
    }

    pub fn with_ports(mut self, ports: impl IntoIterator<Item = ConduitPort>) -> Self {
        self.ports.extend(ports);
        self
    }

    /// Conduit expressed in another frame (centerline and ports)
    pub fn transformed(&self, transform: &Matrix4<f64>) -> Conduit {
        Conduit {
            kind: self.kind,
            centerline: self.centerline.transformed(transform),
            section: self.section.clone(),
            ports: self
                .ports
                .iter()
                .map(|p| ConduitPort::new(transform.transform_point(&p.position), p.connected))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_centerline_needs_two_points() {
        assert!(Centerline::new(vec![Point3::origin()]).is_err());
        assert!(Centerline::new(vec![Point3::origin(), Point3::new(f64::NAN, 0.0, 0.0)]).is_err());
    }

    #[test]
    fn test_chord_and_mid_tangent() {
        // L-shaped run: 100 along X then 300 along Y
        let line = Centerline::new(vec![
            Point3::origin(),
            Point3::new(100.0, 0.0, 0.0),
            Point3::new(100.0, 300.0, 0.0),
        ])
        .unwrap();
        assert_relative_eq!(line.length(), 400.0);
        assert_relative_eq!(line.mid_tangent().unwrap(), Vector3::y());
        assert_relative_eq!(
            line.chord_direction().unwrap(),
            Vector3::new(1.0, 3.0, 0.0).normalize()
        );
    }

    #[test]
    fn test_closed_run_has_no_chord() {
        let ring = Centerline::new(vec![
            Point3::origin(),
            Point3::new(10.0, 0.0, 0.0),
            Point3::origin(),
        ])
        .unwrap();
        assert!(ring.chord_direction().is_none());
        assert!(ring.mid_tangent().is_some());
    }

    #[test]
    fn test_transformed_moves_ports() {
        let conduit = Conduit::new(
            ConduitKind::Pipe,
            Centerline::line(Point3::origin(), Point3::new(1000.0, 0.0, 0.0)).unwrap(),
            CrossSection::Circular { diameter: 90.0 },
        )
        .with_end_ports();
        let shifted =
            conduit.transformed(&Matrix4::new_translation(&Vector3::new(0.0, 0.0, 3000.0)));

        assert_eq!(shifted.ports.len(), 2);
        assert_relative_eq!(shifted.ports[1].position, Point3::new(1000.0, 0.0, 3000.0));
        assert_eq!(shifted.section.shape_name(), "circular");
    }
}
