// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounded squared-distance metric.
//!
//! Every distance comparison in the resolvers goes through
//! [`squared_distance_bounded`], which rejects clearly-out-of-range pairs
//! with a per-axis box check before paying for the full sum of squares.

use nalgebra::Point3;

/// Squared Euclidean distance between `a` and `b`, or `+inf` as soon as any
/// single axis delta exceeds `tolerance`.
///
/// The box check is a fast path only: a finite return value is always the
/// exact squared distance, so `squared_distance_bounded(a, b, t) <= t * t`
/// holds exactly when the true Euclidean distance is within `t`.
#[inline]
pub fn squared_distance_bounded(a: &Point3<f64>, b: &Point3<f64>, tolerance: f64) -> f64 {
    let dx = (a.x - b.x).abs();
    if dx > tolerance {
        return f64::INFINITY;
    }
    let dy = (a.y - b.y).abs();
    if dy > tolerance {
        return f64::INFINITY;
    }
    let dz = (a.z - b.z).abs();
    if dz > tolerance {
        return f64::INFINITY;
    }
    dx * dx + dy * dy + dz * dz
}
