// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pairwise volumetric intersection between conduit and host solids.

use crate::bounds::Aabb;
use crate::csg::SolidBoolean;
use crate::extract::DEFAULT_VOLUME_EPSILON;
use crate::solid::Solid;
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};

/// Separation tolerance for the bounding-box prefilter
const BOUNDS_TOLERANCE: f64 = 1e-9;

/// Computes intersection volumes for every (conduit, host) solid pair.
///
/// Pairs are independent: each reads shared input and produces its own
/// result slot, so the loop may run on the rayon pool. Result order is the
/// row-major pair order either way.
#[derive(Debug, Clone, Copy)]
pub struct IntersectionEngine {
    /// Results with volume at or below this are discarded
    pub volume_epsilon: f64,
    /// Evaluate pairs on the rayon pool
    pub parallel: bool,
}

impl IntersectionEngine {
    pub fn new(volume_epsilon: f64) -> Self {
        Self {
            volume_epsilon,
            parallel: false,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Intersect every conduit solid with every host solid
    ///
    /// Failed, panicking or degenerate pairs are skipped. An empty result means no
    /// physical intersection; callers must treat that as a failure.
    pub fn intersect(
        &self,
        conduit: &[Solid],
        host: &[Solid],
        kernel: &dyn SolidBoolean,
    ) -> Vec<Solid> {
        let pairs: Vec<(&Solid, &Solid)> = conduit
            .iter()
            .flat_map(|c| host.iter().map(move |h| (c, h)))
            .filter(|(c, h)| c.bounds().overlaps(h.bounds(), BOUNDS_TOLERANCE))
            .collect();

        let results: Vec<Option<Solid>> = if self.parallel {
            pairs
                .par_iter()
                .map(|(c, h)| self.intersect_pair(c, h, kernel))
                .collect()
        } else {
            pairs
                .iter()
                .map(|(c, h)| self.intersect_pair(c, h, kernel))
                .collect()
        };

        let attempted = results.len();
        let kept: Vec<Solid> = results.into_iter().flatten().collect();
        tracing::debug!(
            conduit_solids = conduit.len(),
            host_solids = host.len(),
            attempted,
            kept = kept.len(),
            "Intersection pass complete"
        );
        kept
    }

    fn intersect_pair(&self, a: &Solid, b: &Solid, kernel: &dyn SolidBoolean) -> Option<Solid> {
        let Ok(outcome) = panic::catch_unwind(AssertUnwindSafe(|| kernel.intersect(a, b))) else {
            tracing::warn!("Boolean kernel panicked on pair, skipping");
            return None;
        };
        match outcome {
            Some(result) if result.is_substantial(self.volume_epsilon) => Some(result),
            Some(result) => {
                tracing::debug!(volume = result.volume(), "Discarding degenerate intersection");
                None
            }
            None => {
                tracing::debug!("Boolean intersection failed for pair, skipping");
                None
            }
        }
    }
}

impl Default for IntersectionEngine {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME_EPSILON)
    }
}

/// Union bounds of a set of solids
pub fn union_bounds(solids: &[Solid]) -> Option<Aabb> {
    Aabb::union_all(solids.iter().map(Solid::bounds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csg::CsgBoolean;
    use crate::primitives::box_mesh;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cube(min: [f64; 3], max: [f64; 3]) -> Solid {
        Solid::new(box_mesh(Point3::from(min), Point3::from(max))).unwrap()
    }

    /// Kernel that fails every other call and counts invocations
    struct Flaky {
        calls: AtomicUsize,
    }

    impl SolidBoolean for Flaky {
        fn intersect(&self, a: &Solid, b: &Solid) -> Option<Solid> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n % 2 == 0 {
                None
            } else {
                CsgBoolean.intersect(a, b)
            }
        }
    }

    #[test]
    fn test_no_overlap_skips_kernel() {
        let kernel = Flaky { calls: AtomicUsize::new(0) };
        let conduit = vec![cube([0.0, 0.0, 0.0], [1.0, 1.0, 1.0])];
        let host = vec![cube([10.0, 10.0, 10.0], [11.0, 11.0, 11.0])];

        let result = IntersectionEngine::default().intersect(&conduit, &host, &kernel);
        assert!(result.is_empty());
        assert_eq!(kernel.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failed_pairs_are_skipped_not_fatal() {
        let kernel = Flaky { calls: AtomicUsize::new(0) };
        let conduit = vec![cube([0.0, 0.0, 0.0], [10.0, 10.0, 10.0])];
        let host = vec![
            cube([5.0, 0.0, 0.0], [6.0, 10.0, 10.0]),
            cube([8.0, 0.0, 0.0], [9.0, 10.0, 10.0]),
        ];

        let result = IntersectionEngine::default().intersect(&conduit, &host, &kernel);
        assert_eq!(result.len(), 1);
        assert_relative_eq!(result[0].bounds().min.x, 8.0, epsilon = 1e-6);
    }

    /// Kernel that panics whenever the host solid starts below x = 7
    struct Panicky;

    impl SolidBoolean for Panicky {
        fn intersect(&self, a: &Solid, b: &Solid) -> Option<Solid> {
            if b.bounds().min.x < 7.0 {
                panic!("degenerate BSP split");
            }
            CsgBoolean.intersect(a, b)
        }
    }

    #[test]
    fn test_panicking_pairs_are_skipped() {
        let conduit = vec![cube([0.0, 0.0, 0.0], [10.0, 10.0, 10.0])];
        let host = vec![
            cube([5.0, 0.0, 0.0], [6.0, 10.0, 10.0]),
            cube([8.0, 0.0, 0.0], [9.0, 10.0, 10.0]),
        ];

        for engine in [
            IntersectionEngine::default(),
            IntersectionEngine::default().with_parallel(true),
        ] {
            let result = engine.intersect(&conduit, &host, &Panicky);
            assert_eq!(result.len(), 1);
            assert_relative_eq!(result[0].bounds().min.x, 8.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_parallel_matches_sequential_order() {
        let conduit = vec![cube([0.0, 0.0, 0.0], [100.0, 10.0, 10.0])];
        let host: Vec<Solid> = (0..6)
            .map(|i| {
                let x = i as f64 * 15.0;
                cube([x, -5.0, -5.0], [x + 5.0, 15.0, 15.0])
            })
            .collect();

        let engine = IntersectionEngine::default();
        let seq = engine.intersect(&conduit, &host, &CsgBoolean);
        let par = engine.with_parallel(true).intersect(&conduit, &host, &CsgBoolean);

        assert_eq!(seq.len(), 6);
        assert_eq!(par.len(), 6);
        for (s, p) in seq.iter().zip(&par) {
            assert_relative_eq!(s.bounds().min.x, p.bounds().min.x, epsilon = 1e-9);
            assert_relative_eq!(s.volume(), 500.0, max_relative = 1e-6);
        }
        let bounds = union_bounds(&seq).unwrap();
        assert_relative_eq!(bounds.max.x, 80.0, epsilon = 1e-6);
    }
}
