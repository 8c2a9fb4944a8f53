// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cache construction: the two bulk phases that capture everything the hot
//! loop needs from the host document.
//!
//! Host-object property access dominates the cost of an extraction run, so
//! the MEP index build is two-phase: first extract ALL connector points into
//! an intermediate list, then insert sequentially into the k-d tree. Tree
//! insertion is never interleaved with host reads.

use nalgebra::Point3;
use tracing::debug;

use mep_link_model::{
    is_finite_point, Connector, CrossSection, ElementArena, HasConnectors, Valve,
};

use crate::kdtree::{KdSpatialIndex, NearestHit};

/// Payload stored with each indexed MEP connector point.
///
/// `owner_index` is the stable array index into the [`ElementArena`]; it is
/// the join key back to the owning element and is never reassigned within a
/// run.
#[derive(Debug, Clone)]
pub struct ConnectorRecord {
    pub origin: Point3<f64>,
    pub owner_index: usize,
    /// `true` for "End"/"Physical" connectors.
    pub is_terminal: bool,
    /// Cross-section captured for later radius queries.
    pub cross_section: CrossSection,
}

/// Queryable spatial index over all MEP connector points.
#[derive(Debug)]
pub struct MepConnectorIndex {
    index: KdSpatialIndex<ConnectorRecord>,
}

impl MepConnectorIndex {
    /// Builds the index over every finite connector origin in the arena.
    pub fn build(arena: &ElementArena) -> Self {
        // Phase 1: pull all connector data out of the element handles
        let mut records = Vec::new();
        for (owner_index, element) in arena.iter().enumerate() {
            for connector in element.connectors() {
                if !is_finite_point(&connector.origin) {
                    continue;
                }
                records.push(ConnectorRecord {
                    origin: connector.origin,
                    owner_index,
                    is_terminal: connector.kind.is_terminal(),
                    cross_section: connector.cross_section,
                });
            }
        }

        // Phase 2: sequential tree insertion, no host access
        let mut index = KdSpatialIndex::with_capacity(records.len());
        for record in records {
            index.insert(record.origin, record);
        }

        debug!(
            points = index.len(),
            elements = arena.len(),
            "built MEP connector index"
        );
        Self { index }
    }

    /// Number of indexed connector points.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Up to `k` nearest MEP connectors, ascending by distance.
    pub fn nearest(&self, point: &Point3<f64>, k: usize) -> Vec<NearestHit<'_, ConnectorRecord>> {
        self.index.nearest(point, k)
    }

    /// Nearest single MEP connector, if any are indexed.
    pub fn nearest_one(&self, point: &Point3<f64>) -> Option<NearestHit<'_, ConnectorRecord>> {
        self.index.nearest_one(point)
    }
}

/// Per-valve connector cache: the usable (finite-origin) connectors of one
/// valve, in host order.
#[derive(Debug, Clone)]
pub struct ValveConnectorCache {
    pub valve_id: i64,
    pub valve_name: String,
    pub connectors: Vec<Connector>,
}

impl ValveConnectorCache {
    /// Captures a valve's connectors, dropping any with NaN/Inf origins.
    pub fn build(valve: &Valve) -> Self {
        let connectors = valve
            .connectors
            .iter()
            .filter(|c| is_finite_point(&c.origin))
            .cloned()
            .collect();
        Self {
            valve_id: valve.id,
            valve_name: valve.name.clone(),
            connectors,
        }
    }
}

/// Builds connector caches for all valves, preserving input order.
pub fn build_valve_caches(valves: &[Valve]) -> Vec<ValveConnectorCache> {
    let caches: Vec<ValveConnectorCache> =
        valves.iter().map(ValveConnectorCache::build).collect();
    debug!(valves = caches.len(), "built valve connector caches");
    caches
}
