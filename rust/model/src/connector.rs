// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connector records: the attachment points the matching engine reasons about.
//!
//! A connector has a 3D origin, a topological kind, a cross-section and
//! (when physically joined) cross-references to counterpart connectors on
//! other elements. Connector order within an element is significant: it is
//! the host document's insertion order, and the resolvers walk it as-is.

use nalgebra::Point3;
use smallvec::SmallVec;

/// Topological kind of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorKind {
    /// An "End"/"Physical" connector: a real attachment point on the element.
    EndPhysical,
    /// Any non-terminal kind (logical, curve, reference).
    Other,
}

impl ConnectorKind {
    /// Terminal connectors are the ones worth indexing for proximity matching.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConnectorKind::EndPhysical)
    }
}

/// Cross-sectional shape metadata carried by a connector.
///
/// Only circular sections yield a radius directly; rectangular and oval
/// sections decline radius-based hit-testing and callers fall through to
/// size-descriptor parsing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrossSection {
    Circular { radius_mm: f64 },
    Rectangular { width_mm: f64, height_mm: f64 },
    Oval { width_mm: f64, height_mm: f64 },
    Unknown,
}

/// A topological cross-reference from one connector to a counterpart
/// connector's owning element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectorLink {
    /// Element id that owns the counterpart connector.
    pub owner_id: i64,
}

impl ConnectorLink {
    pub fn new(owner_id: i64) -> Self {
        Self { owner_id }
    }
}

/// A single attachment point on an element.
#[derive(Debug, Clone)]
pub struct Connector {
    /// Origin of the connector in model coordinates (millimetres).
    pub origin: Point3<f64>,
    pub kind: ConnectorKind,
    pub cross_section: CrossSection,
    /// `true` if the host document reports this connector as physically joined.
    pub is_connected: bool,
    /// Counterpart links, in the host document's order. Empty unless connected.
    pub links: SmallVec<[ConnectorLink; 2]>,
}

impl Connector {
    /// Creates an unconnected terminal connector at `origin`.
    pub fn terminal(origin: Point3<f64>) -> Self {
        Self {
            origin,
            kind: ConnectorKind::EndPhysical,
            cross_section: CrossSection::Unknown,
            is_connected: false,
            links: SmallVec::new(),
        }
    }

    /// Creates a connected terminal connector with counterpart links.
    pub fn linked(origin: Point3<f64>, links: impl IntoIterator<Item = ConnectorLink>) -> Self {
        Self {
            origin,
            kind: ConnectorKind::EndPhysical,
            cross_section: CrossSection::Unknown,
            is_connected: true,
            links: links.into_iter().collect(),
        }
    }

    /// Sets the cross-section, builder style.
    pub fn with_cross_section(mut self, cross_section: CrossSection) -> Self {
        self.cross_section = cross_section;
        self
    }
}
