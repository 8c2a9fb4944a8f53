// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tier 2: nearest single MEP connector within tolerance.
//!
//! Two thresholds with different semantics: the touching distance models
//! true physical contact and short-circuits the scan per connector, as each
//! nearest neighbor is fetched; the larger general tolerance models "close
//! enough to belong to the same run" and requires the full scan to find the
//! true minimum before deciding.

use nalgebra::Point3;

use mep_link_model::{ElementArena, ExtractionConfig};

use crate::cache::{MepConnectorIndex, ValveConnectorCache};
use crate::metric::squared_distance_bounded;
use crate::pipeline::{ResolutionMethod, ResolutionResult};
use crate::service::ServiceNameResolver;

struct BestCandidate {
    dist_sq: f64,
    owner_index: usize,
    valve_location: Point3<f64>,
    mep_location: Point3<f64>,
}

/// Resolves a valve against the nearest MEP connector, or `None` if nothing
/// qualifies within tolerance.
pub fn resolve_nearest_connector(
    cache: &ValveConnectorCache,
    candidates: &ElementArena,
    index: &MepConnectorIndex,
    config: &ExtractionConfig,
    services: &ServiceNameResolver<'_>,
) -> Option<ResolutionResult> {
    let tol_sq = config.tolerance_mm * config.tolerance_mm;
    let touch_sq = config.touching_dist_mm * config.touching_dist_mm;

    let mut best: Option<BestCandidate> = None;

    for connector in &cache.connectors {
        let Some(hit) = index.nearest_one(&connector.origin) else {
            continue;
        };
        let dist_sq = squared_distance_bounded(&connector.origin, &hit.point, config.tolerance_mm);

        // Touching shortcut: first qualifying physical contact wins
        // outright, remaining valve connectors are not inspected.
        if dist_sq <= touch_sq {
            if let Some(element) = candidates.get(hit.payload.owner_index) {
                if let Some(service) = services.service_for(element) {
                    return Some(ResolutionResult::proximity(
                        ResolutionMethod::NearestConnector,
                        cache,
                        element.id(),
                        service,
                        dist_sq.sqrt(),
                        connector.origin,
                        hit.point,
                    ));
                }
            }
        }

        if dist_sq.is_finite() && best.as_ref().map_or(true, |b| dist_sq < b.dist_sq) {
            best = Some(BestCandidate {
                dist_sq,
                owner_index: hit.payload.owner_index,
                valve_location: connector.origin,
                mep_location: hit.point,
            });
        }
    }

    let best = best?;
    if best.dist_sq > tol_sq {
        return None;
    }
    let element = candidates.get(best.owner_index)?;
    let service = services.service_for(element)?;
    Some(ResolutionResult::proximity(
        ResolutionMethod::NearestConnector,
        cache,
        element.id(),
        service,
        best.dist_sq.sqrt(),
        best.valve_location,
        best.mep_location,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MepConnectorIndex;
    use approx::assert_relative_eq;
    use mep_link_model::{AttributeStore, Connector, MepElement, Pipe};

    fn pipe(id: i64, connector_at: (f64, f64, f64), service: Option<&str>) -> MepElement {
        let mut attributes = AttributeStore::new();
        if let Some(s) = service {
            attributes.insert_text("Service Name", s);
        }
        MepElement::Pipe(Pipe {
            id,
            connectors: vec![Connector::terminal(Point3::new(
                connector_at.0,
                connector_at.1,
                connector_at.2,
            ))],
            centerline: None,
            diameter_mm: None,
            attributes,
        })
    }

    fn valve_cache(points: &[(f64, f64, f64)]) -> ValveConnectorCache {
        ValveConnectorCache {
            valve_id: 1,
            valve_name: "V-1".to_string(),
            connectors: points
                .iter()
                .map(|&(x, y, z)| Connector::terminal(Point3::new(x, y, z)))
                .collect(),
        }
    }

    fn config() -> ExtractionConfig {
        ExtractionConfig::new(50.0, 5.0, "Service Name").unwrap()
    }

    #[test]
    fn best_within_tolerance_after_full_scan() {
        let candidates = ElementArena::from_elements(vec![
            pipe(10, (30.0, 0.0, 0.0), Some("Heating")),
            pipe(20, (0.0, 20.0, 0.0), Some("Chilled Water")),
        ])
        .unwrap();
        let index = MepConnectorIndex::build(&candidates);
        let cache = valve_cache(&[(0.0, 0.0, 0.0)]);

        let config = config();
        let services = ServiceNameResolver::new(&config);
        let result =
            resolve_nearest_connector(&cache, &candidates, &index, &config, &services).unwrap();

        assert_eq!(result.method, ResolutionMethod::NearestConnector);
        assert_eq!(result.source_element_id, 20);
        assert_eq!(result.service.as_deref(), Some("Chilled Water"));
        assert_relative_eq!(result.distance_mm, 20.0);
    }

    #[test]
    fn touching_shortcut_wins_over_closer_overall_minimum() {
        // First valve connector touches element 10; the second connector is
        // even closer to element 20, but the touch on the first connector
        // short-circuits the scan before the second is inspected.
        let candidates = ElementArena::from_elements(vec![
            pipe(10, (0.0, 0.0, 3.0), Some("Heating")),
            pipe(20, (100.0, 0.0, 1.0), Some("Chilled Water")),
        ])
        .unwrap();
        let index = MepConnectorIndex::build(&candidates);
        let cache = valve_cache(&[(0.0, 0.0, 0.0), (100.0, 0.0, 0.0)]);

        let config = config();
        let services = ServiceNameResolver::new(&config);
        let result =
            resolve_nearest_connector(&cache, &candidates, &index, &config, &services).unwrap();

        assert_eq!(result.source_element_id, 10);
        assert_eq!(result.service.as_deref(), Some("Heating"));
        assert_relative_eq!(result.distance_mm, 3.0);
    }

    #[test]
    fn touch_without_service_does_not_short_circuit() {
        // The first connector's touching candidate yields no service, so the
        // scan moves on; the second connector's touching candidate qualifies.
        let candidates = ElementArena::from_elements(vec![
            pipe(10, (0.0, 0.0, 1.0), None),
            pipe(20, (0.0, 30.0, 0.0), Some("Chilled Water")),
        ])
        .unwrap();
        let index = MepConnectorIndex::build(&candidates);
        let cache = valve_cache(&[(0.0, 0.0, 0.0), (0.0, 28.0, 0.0)]);

        let config = config();
        let services = ServiceNameResolver::new(&config);
        let result =
            resolve_nearest_connector(&cache, &candidates, &index, &config, &services).unwrap();

        assert_eq!(result.source_element_id, 20);
        assert_relative_eq!(result.distance_mm, 2.0);
    }

    #[test]
    fn serviceless_minimum_is_not_replaced_by_farther_candidate() {
        // The single best (minimum-distance) candidate is the one evaluated;
        // a farther connector with a service does not stand in for it.
        let candidates = ElementArena::from_elements(vec![
            pipe(10, (0.0, 0.0, 10.0), None),
            pipe(20, (0.0, 30.0, 0.0), Some("Chilled Water")),
        ])
        .unwrap();
        let index = MepConnectorIndex::build(&candidates);
        let cache = valve_cache(&[(0.0, 0.0, 0.0)]);

        let config = config();
        let services = ServiceNameResolver::new(&config);
        assert!(resolve_nearest_connector(&cache, &candidates, &index, &config, &services)
            .is_none());
    }

    #[test]
    fn nothing_within_tolerance_returns_none() {
        let candidates =
            ElementArena::from_elements(vec![pipe(10, (200.0, 0.0, 0.0), Some("CHW"))]).unwrap();
        let index = MepConnectorIndex::build(&candidates);
        let cache = valve_cache(&[(0.0, 0.0, 0.0)]);

        let config = config();
        let services = ServiceNameResolver::new(&config);
        assert!(resolve_nearest_connector(&cache, &candidates, &index, &config, &services)
            .is_none());
    }

    #[test]
    fn boundary_distance_is_inclusive() {
        let candidates =
            ElementArena::from_elements(vec![pipe(10, (50.0, 0.0, 0.0), Some("CHW"))]).unwrap();
        let index = MepConnectorIndex::build(&candidates);
        let cache = valve_cache(&[(0.0, 0.0, 0.0)]);

        let config = config();
        let services = ServiceNameResolver::new(&config);
        let result =
            resolve_nearest_connector(&cache, &candidates, &index, &config, &services).unwrap();
        assert_relative_eq!(result.distance_mm, 50.0);
    }

    #[test]
    fn empty_index_returns_none() {
        let candidates = ElementArena::from_elements(vec![]).unwrap();
        let index = MepConnectorIndex::build(&candidates);
        let cache = valve_cache(&[(0.0, 0.0, 0.0)]);

        let config = config();
        let services = ServiceNameResolver::new(&config);
        assert!(resolve_nearest_connector(&cache, &candidates, &index, &config, &services)
            .is_none());
    }
}
