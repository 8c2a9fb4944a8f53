// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Physical radius determination for centerline hit-testing.
//!
//! Priority-ordered strategies, first success wins; every strategy is
//! independently fallible and a miss falls through to the next. When all
//! fail the sentinel [`UNKNOWN_RADIUS`] is returned — callers must exclude
//! the element from radius hit-testing rather than treat it as radius zero.

use mep_link_model::{parse_diameter_mm, CrossSection, HasSizeDescriptor, MepElement};

use crate::cache::ConnectorRecord;

/// Sentinel for "radius could not be determined".
pub const UNKNOWN_RADIUS: f64 = -1.0;

/// Size attribute names probed by the typed-descriptor strategy, in priority
/// order.
const SIZE_ATTRIBUTES: &[&str] = &["Size", "Overall Size"];

/// Looser size-like attribute names probed as a last resort.
const GENERIC_SIZE_ATTRIBUTES: &[&str] = &["Diameter", "Nominal Diameter", "Outside Diameter"];

/// Determines the physical radius (mm) of `element`, using the connector
/// record nearest the query point for cross-section metadata.
///
/// Returns [`UNKNOWN_RADIUS`] when no strategy succeeds.
pub fn element_radius_mm(element: &MepElement, nearest: &ConnectorRecord) -> f64 {
    // 1. Cross-sectional connector shape: circular gives the radius
    //    directly; rectangular/oval cannot bound by a single radius.
    if let CrossSection::Circular { radius_mm } = nearest.cross_section {
        if radius_mm > 0.0 {
            return radius_mm;
        }
    }

    // 2. Typed size descriptor, then the fixed-priority size attributes,
    //    parsed as a diameter and halved.
    if let Some(text) = element.size_descriptor() {
        if let Some(diameter) = parse_diameter_mm(text) {
            return diameter / 2.0;
        }
    }
    for name in SIZE_ATTRIBUTES {
        if let Some(text) = element.attributes().display_value(name) {
            if let Some(diameter) = parse_diameter_mm(text) {
                return diameter / 2.0;
            }
        }
    }

    // 3. Direct numeric diameter property.
    if let Some(diameter) = element.diameter_mm() {
        if diameter > 0.0 {
            return diameter / 2.0;
        }
    }

    // 4. Generic size-like attribute lookup.
    for name in GENERIC_SIZE_ATTRIBUTES {
        if let Some(text) = element.attributes().display_value(name) {
            if let Some(diameter) = parse_diameter_mm(text) {
                return diameter / 2.0;
            }
        }
        if let Some(number) = element.attributes().numeric_value(name) {
            if number > 0.0 && number.is_finite() {
                return number / 2.0;
            }
        }
    }

    UNKNOWN_RADIUS
}
