// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extraction pipeline: the per-valve tiered state machine and its results.
//!
//! Per valve, strictly ordered and terminal on first success:
//! `NoConnectors → Connected? → NearestConnector? → NearestCenterline? →
//! NotFound`. Exactly one result per valve, in valve input order; no tier is
//! ever retried.

use nalgebra::Point3;
use tracing::{debug, trace};

use mep_link_model::{format_point, ElementArena, ExtractionConfig, Valve};

use crate::cache::{build_valve_caches, MepConnectorIndex, ValveConnectorCache};
use crate::centerline::resolve_nearest_centerline;
use crate::connectivity::resolve_connected;
use crate::error::Result;
use crate::proximity::resolve_nearest_connector;
use crate::service::ServiceNameResolver;

/// Sentinel element id for results without a matched source element.
pub const NO_SOURCE_ELEMENT: i64 = -1;

/// How a valve's service was resolved (or why it wasn't).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionMethod {
    /// Direct topological connection; distance is exactly zero.
    Connected,
    /// Closest MEP connector within tolerance.
    NearestConnector,
    /// Projection onto a candidate centerline within radius or tolerance.
    NearestCenterline,
    /// The valve exposed no usable connector points; nothing was attempted.
    NoConnectors,
    /// Connectors existed but no tier matched within tolerance.
    NotFound,
}

impl ResolutionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionMethod::Connected => "Connected",
            ResolutionMethod::NearestConnector => "NearestConnector",
            ResolutionMethod::NearestCenterline => "NearestCenterline",
            ResolutionMethod::NoConnectors => "NoConnectors",
            ResolutionMethod::NotFound => "NotFound",
        }
    }
}

/// One valve's resolution outcome. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct ResolutionResult {
    pub valve_id: i64,
    pub valve_name: String,
    pub service: Option<String>,
    pub method: ResolutionMethod,
    /// Match distance in millimetres; 0 for `Connected`, unset (0) for the
    /// non-matching methods.
    pub distance_mm: f64,
    /// Matched MEP element id, or [`NO_SOURCE_ELEMENT`].
    pub source_element_id: i64,
    /// Formatted valve-side connector location, for diagnostics.
    pub valve_connector_location: String,
    /// Formatted MEP-side location (connector or centerline projection).
    pub mep_connector_location: String,
}

impl ResolutionResult {
    pub(crate) fn connected(
        cache: &ValveConnectorCache,
        source_element_id: i64,
        service: String,
        location: Point3<f64>,
    ) -> Self {
        Self {
            valve_id: cache.valve_id,
            valve_name: cache.valve_name.clone(),
            service: Some(service),
            method: ResolutionMethod::Connected,
            distance_mm: 0.0,
            source_element_id,
            valve_connector_location: format_point(&location),
            mep_connector_location: format_point(&location),
        }
    }

    pub(crate) fn proximity(
        method: ResolutionMethod,
        cache: &ValveConnectorCache,
        source_element_id: i64,
        service: String,
        distance_mm: f64,
        valve_location: Point3<f64>,
        mep_location: Point3<f64>,
    ) -> Self {
        Self {
            valve_id: cache.valve_id,
            valve_name: cache.valve_name.clone(),
            service: Some(service),
            method,
            distance_mm,
            source_element_id,
            valve_connector_location: format_point(&valve_location),
            mep_connector_location: format_point(&mep_location),
        }
    }

    pub(crate) fn unresolved(cache: &ValveConnectorCache, method: ResolutionMethod) -> Self {
        Self {
            valve_id: cache.valve_id,
            valve_name: cache.valve_name.clone(),
            service: None,
            method,
            distance_mm: 0.0,
            source_element_id: NO_SOURCE_ELEMENT,
            valve_connector_location: String::new(),
            mep_connector_location: String::new(),
        }
    }
}

/// Runs the full extraction: one [`ResolutionResult`] per valve, in valve
/// input order.
///
/// An empty valve set or an empty candidate arena short-circuits to an
/// empty result sequence; empty input is valid, uninteresting input.
pub fn extract(
    valves: &[Valve],
    candidates: &ElementArena,
    config: &ExtractionConfig,
) -> Result<Vec<ResolutionResult>> {
    config.validate()?;

    if valves.is_empty() || candidates.is_empty() {
        debug!(
            valves = valves.len(),
            candidates = candidates.len(),
            "nothing to extract"
        );
        return Ok(Vec::new());
    }

    // Bulk phase: all host reads happen here, before the hot loop.
    let caches = build_valve_caches(valves);
    let index = MepConnectorIndex::build(candidates);
    let services = ServiceNameResolver::new(config);

    let mut results = Vec::with_capacity(caches.len());
    for cache in &caches {
        let result = resolve_valve(cache, candidates, &index, config, &services);
        trace!(
            valve_id = result.valve_id,
            method = result.method.as_str(),
            distance_mm = result.distance_mm,
            "resolved valve"
        );
        results.push(result);
    }

    debug!(results = results.len(), "extraction complete");
    Ok(results)
}

/// The per-valve state machine. Tiers never retry; first success is terminal.
fn resolve_valve(
    cache: &ValveConnectorCache,
    candidates: &ElementArena,
    index: &MepConnectorIndex,
    config: &ExtractionConfig,
    services: &ServiceNameResolver<'_>,
) -> ResolutionResult {
    if cache.connectors.is_empty() {
        return ResolutionResult::unresolved(cache, ResolutionMethod::NoConnectors);
    }

    if let Some(result) = resolve_connected(cache, candidates, services) {
        return result;
    }
    if let Some(result) = resolve_nearest_connector(cache, candidates, index, config, services) {
        return result;
    }
    if let Some(result) = resolve_nearest_centerline(cache, candidates, index, config, services) {
        return result;
    }

    ResolutionResult::unresolved(cache, ResolutionMethod::NotFound)
}

/// Per-method counts plus the ids of unresolved valves — the aggregate a
/// host UI reports to the operator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionSummary {
    pub total: usize,
    pub connected: usize,
    pub nearest_connector: usize,
    pub nearest_centerline: usize,
    pub no_connectors: usize,
    pub not_found: usize,
    /// Valve ids that ended `NotFound`, in result order.
    pub not_found_ids: Vec<i64>,
}

impl ExtractionSummary {
    pub fn from_results(results: &[ResolutionResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };
        for result in results {
            match result.method {
                ResolutionMethod::Connected => summary.connected += 1,
                ResolutionMethod::NearestConnector => summary.nearest_connector += 1,
                ResolutionMethod::NearestCenterline => summary.nearest_centerline += 1,
                ResolutionMethod::NoConnectors => summary.no_connectors += 1,
                ResolutionMethod::NotFound => {
                    summary.not_found += 1;
                    summary.not_found_ids.push(result.valve_id);
                }
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(id: i64) -> ValveConnectorCache {
        ValveConnectorCache {
            valve_id: id,
            valve_name: format!("V-{id}"),
            connectors: vec![],
        }
    }

    #[test]
    fn summary_counts_methods() {
        let results = vec![
            ResolutionResult::unresolved(&cache(1), ResolutionMethod::NoConnectors),
            ResolutionResult::unresolved(&cache(2), ResolutionMethod::NotFound),
            ResolutionResult::unresolved(&cache(3), ResolutionMethod::NotFound),
            ResolutionResult::connected(&cache(4), 99, "CHW".to_string(), Point3::origin()),
        ];

        let summary = ExtractionSummary::from_results(&results);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.connected, 1);
        assert_eq!(summary.no_connectors, 1);
        assert_eq!(summary.not_found, 2);
        assert_eq!(summary.not_found_ids, vec![2, 3]);
    }

    #[test]
    fn method_names() {
        assert_eq!(ResolutionMethod::Connected.as_str(), "Connected");
        assert_eq!(ResolutionMethod::NotFound.as_str(), "NotFound");
    }

    #[test]
    fn connected_result_has_zero_distance() {
        let result =
            ResolutionResult::connected(&cache(1), 42, "CHW".to_string(), Point3::origin());
        assert_eq!(result.distance_mm, 0.0);
        assert_eq!(result.source_element_id, 42);
        assert_eq!(result.method, ResolutionMethod::Connected);
    }
}
