// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Centerline curves for mid-span projection matching.
//!
//! Elongated elements (pipes, ducts, fabrication straights) expose their
//! medial curve so a valve sitting mid-span, away from any joint, can still
//! be matched by projecting its connector points onto the curve.

use nalgebra::Point3;

/// The medial curve of an elongated element.
#[derive(Debug, Clone)]
pub enum Centerline {
    /// A straight run between two endpoints.
    Line { a: Point3<f64>, b: Point3<f64> },
    /// A polyline approximation of a curved run (arcs, offsets).
    Polyline(Vec<Point3<f64>>),
}

impl Centerline {
    pub fn line(a: Point3<f64>, b: Point3<f64>) -> Self {
        Centerline::Line { a, b }
    }

    /// Closest point on the curve to `p`.
    ///
    /// Projection clamps to the finite curve: a query beyond an endpoint
    /// returns that endpoint. Note that radius-based hit-testing against
    /// this projection can admit points slightly beyond the curve's end cap;
    /// acceptable while tolerance and radius are small relative to element
    /// length.
    ///
    /// Returns `None` for a degenerate polyline with no points.
    pub fn closest_point(&self, p: &Point3<f64>) -> Option<Point3<f64>> {
        match self {
            Centerline::Line { a, b } => Some(closest_on_segment(a, b, p)),
            Centerline::Polyline(points) => match points.len() {
                0 => None,
                1 => Some(points[0]),
                _ => {
                    let mut best = points[0];
                    let mut best_sq = f64::INFINITY;
                    for pair in points.windows(2) {
                        let candidate = closest_on_segment(&pair[0], &pair[1], p);
                        let d_sq = (candidate - p).norm_squared();
                        if d_sq < best_sq {
                            best_sq = d_sq;
                            best = candidate;
                        }
                    }
                    Some(best)
                }
            },
        }
    }
}

/// Closest point to `p` on the segment `a..b`, clamped to the endpoints.
fn closest_on_segment(a: &Point3<f64>, b: &Point3<f64>, p: &Point3<f64>) -> Point3<f64> {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return *a; // degenerate segment
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}
