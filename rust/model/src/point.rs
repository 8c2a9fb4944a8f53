// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point helpers shared by the cache builders and the result diagnostics.
//!
//! All coordinates in this workspace are millimetres in a consistent model
//! coordinate system. Points are `nalgebra::Point3<f64>` throughout.

use nalgebra::Point3;

/// Returns `true` if all three coordinates are finite.
///
/// Cache builders call this before indexing a connector origin; NaN/Inf
/// origins are skipped silently rather than inserted.
#[inline]
pub fn is_finite_point(p: &Point3<f64>) -> bool {
    p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
}

/// Formats a point as `"(x.x, y.y, z.z)"` for result diagnostics.
pub fn format_point(p: &Point3<f64>) -> String {
    format!("({:.1}, {:.1}, {:.1})", p.x, p.y, p.z)
}
