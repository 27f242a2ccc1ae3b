// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Cubic Bezier curves and multi-curve paths, with both uniform and
//! flatness-driven sampling.

use super::{midpoint, Vec2};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Flatness below which recursive sampling stops subdividing.
const RECURSE_THRESHOLD: f64 = 1.0;

/// Subdivision limit for recursive sampling; guards against non-finite control points.
const MAX_RECURSION_DEPTH: u32 = 16;

/// Default number of samples used when drawing a curve.
pub const DEFAULT_SAMPLES: u32 = 30;

/// A sample count of zero (or one) selects the recursive sampling method.
pub const RECURSE_SAMPLING: u32 = 0;

/// A cubic Bezier curve defined by two end points and two control points.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bezier {
    /// Start point.
    pub p0: Vec2,
    /// Control point for `p0`.
    pub c0: Vec2,
    /// Control point for `p1`.
    pub c1: Vec2,
    /// End point.
    pub p1: Vec2,
}

impl Bezier {
    /// Creates a new curve from its four defining points.
    pub const fn new(p0: Vec2, c0: Vec2, c1: Vec2, p1: Vec2) -> Self {
        Self { p0, c0, c1, p1 }
    }

    /// Evaluates the curve at `t` in `[0, 1]`; `t == 0` yields `p0` and `t == 1` yields `p1`.
    pub fn point_at(&self, t: f64) -> Vec2 {
        let tt = t * t;
        let ttt = tt * t;
        let u = 1.0 - t;
        let uu = u * u;
        let uuu = uu * u;

        self.p0 * uuu + self.c0 * (3.0 * uu * t) + self.c1 * (3.0 * u * tt) + self.p1 * ttt
    }

    /// Returns how far the curve deviates from the straight segment `p0 -> p1`.
    ///
    /// Zero for a degenerate straight curve; larger values mean more curvature.
    pub fn flatness(&self) -> f64 {
        let mut ux = (3.0 * self.c0.x - 2.0 * self.p0.x - self.p1.x).powi(2);
        let mut uy = (3.0 * self.c0.y - 2.0 * self.p0.y - self.p1.y).powi(2);
        let vx = (3.0 * self.c1.x - 2.0 * self.p1.x - self.p0.x).powi(2);
        let vy = (3.0 * self.c1.y - 2.0 * self.p1.y - self.p0.y).powi(2);
        if ux < vx {
            ux = vx;
        }
        if uy < vy {
            uy = vy;
        }
        ux + uy
    }

    /// Splits the curve at `t` (de Casteljau), returning the two halves.
    pub fn split(&self, t: f64) -> (Bezier, Bezier) {
        let p12 = midpoint(self.p0, self.c0, t);
        let p23 = midpoint(self.c0, self.c1, t);
        let p34 = midpoint(self.c1, self.p1, t);
        let p123 = midpoint(p12, p23, t);
        let p234 = midpoint(p23, p34, t);
        let p1234 = midpoint(p123, p234, t);

        (
            Bezier::new(self.p0, p12, p123, p1234),
            Bezier::new(p1234, p234, p34, self.p1),
        )
    }

    /// Appends sampled points of this curve to `points`.
    ///
    /// ## Arguments
    /// * `points` - Destination buffer; existing contents are kept.
    /// * `samples` - More than one selects `samples + 1` evenly spaced points;
    ///   zero or one selects recursive subdivision until each piece is flat.
    pub fn sample(&self, points: &mut Vec<Vec2>, samples: u32) {
        if samples > 1 {
            let step = 1.0 / samples as f64;
            for i in 0..=samples {
                let t = (i as f64 * step).min(1.0);
                points.push(self.point_at(t));
            }
        } else {
            self.sample_recursive(points, 0);
        }
    }

    fn sample_recursive(&self, points: &mut Vec<Vec2>, depth: u32) {
        if self.flatness() < RECURSE_THRESHOLD || depth >= MAX_RECURSION_DEPTH {
            if points.last() != Some(&self.p0) {
                points.push(self.p0);
            }
            points.push(self.p1);
        } else {
            let (left, right) = self.split(0.5);
            left.sample_recursive(points, depth + 1);
            right.sample_recursive(points, depth + 1);
        }
    }
}

/// A path made of several Bezier curves, each with its own sample count.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BezierPath {
    curves: Vec<Bezier>,
    samples: Vec<u32>,
}

impl BezierPath {
    /// Creates an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a path from parallel lists of curves and sample counts.
    ///
    /// ## Errors
    /// Returns [`Error::PathMismatch`] when the lists differ in length.
    pub fn from_parts(curves: Vec<Bezier>, samples: Vec<u32>) -> Result<Self> {
        if curves.len() != samples.len() {
            return Err(Error::PathMismatch {
                curves: curves.len(),
                samples: samples.len(),
            });
        }
        Ok(Self { curves, samples })
    }

    /// Appends a curve drawn with `samples` samples.
    pub fn add_curve(&mut self, curve: Bezier, samples: u32) {
        self.curves.push(curve);
        self.samples.push(samples);
    }

    /// The curves making up this path.
    pub fn curves(&self) -> &[Bezier] {
        &self.curves
    }

    /// The per-curve sample counts.
    pub fn sample_counts(&self) -> &[u32] {
        &self.samples
    }

    /// Appends the sampled points of every curve, in order, to `points`.
    pub fn sample(&self, points: &mut Vec<Vec2>) {
        for (curve, samples) in self.curves.iter().zip(&self.samples) {
            curve.sample(points, *samples);
        }
    }
}

impl FromIterator<(Bezier, u32)> for BezierPath {
    fn from_iter<I: IntoIterator<Item = (Bezier, u32)>>(iter: I) -> Self {
        let mut path = BezierPath::new();
        for (curve, samples) in iter {
            path.add_curve(curve, samples);
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn curve() -> Bezier {
        Bezier::new(
            Vec2::new(300.0, 300.0),
            Vec2::new(350.0, 250.0),
            Vec2::new(700.0, 450.0),
            Vec2::new(550.0, 440.0),
        )
    }

    #[test]
    fn test_point_at_end_points() {
        let c = curve();
        assert_eq!(c.point_at(0.0), c.p0);
        assert!(c.point_at(1.0).approx_eq(&c.p1));
    }

    #[test]
    fn test_straight_curve_is_flat() {
        let line = Bezier::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(3.0, 0.0),
        );
        assert_relative_eq!(line.flatness(), 0.0);
        assert!(curve().flatness() > RECURSE_THRESHOLD);
    }

    #[test]
    fn test_split_halves_meet_on_curve() {
        let c = curve();
        let (left, right) = c.split(0.5);
        assert_eq!(left.p0, c.p0);
        assert_eq!(right.p1, c.p1);
        assert_eq!(left.p1, right.p0);
        assert!(left.p1.approx_eq(&c.point_at(0.5)));
    }

    #[test]
    fn test_uniform_sampling_count() {
        let mut pts = Vec::new();
        curve().sample(&mut pts, 10);
        assert_eq!(pts.len(), 11);
        assert_eq!(pts[0], curve().p0);
    }

    #[test]
    fn test_recursive_sampling_is_continuous() {
        let mut pts = Vec::new();
        curve().sample(&mut pts, RECURSE_SAMPLING);
        assert!(pts.len() > 2);
        assert_eq!(pts.first(), Some(&curve().p0));
        assert!(pts.last().expect("non-empty").approx_eq(&curve().p1));
        // consecutive sub-curves share their joint, so no point repeats back to back
        assert!(pts.windows(2).all(|w| w[0] != w[1]));
    }

    #[test]
    fn test_path_rejects_mismatched_lists() {
        let err = BezierPath::from_parts(vec![curve(), curve()], vec![4]).unwrap_err();
        assert_eq!(
            err,
            Error::PathMismatch {
                curves: 2,
                samples: 1
            }
        );
    }

    #[test]
    fn test_path_samples_every_curve() {
        let path: BezierPath = [(curve(), 4), (curve(), 2)].into_iter().collect();
        let mut pts = Vec::new();
        path.sample(&mut pts);
        assert_eq!(pts.len(), 5 + 3);
        assert_eq!(path.sample_counts(), &[4, 2]);
    }
}
