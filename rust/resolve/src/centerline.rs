// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tier 3: nearest-centerline projection.
//!
//! Fallback for valves sitting mid-span on a pipe or duct rather than at a
//! joint: no connector-level match exists, but projecting the valve's
//! connector points onto nearby centerlines lands inside the element's
//! physical radius.
//!
//! Candidate gathering looks at roughly 1% of all indexed points per valve
//! connector, bounded to [20, 100], and deduplicates by owning element —
//! an element contributes many connectors but only its first-encountered
//! (closest) one needs inspection.

use nalgebra::Point3;
use rustc_hash::FxHashSet;

use mep_link_model::{ElementArena, ExtractionConfig, HasCenterline};

use crate::cache::{MepConnectorIndex, ValveConnectorCache};
use crate::metric::squared_distance_bounded;
use crate::pipeline::{ResolutionMethod, ResolutionResult};
use crate::radius::element_radius_mm;
use crate::service::ServiceNameResolver;

/// Number of nearest connector points to gather per valve connector.
fn candidate_count(total_indexed: usize) -> usize {
    (total_indexed / 100).clamp(20, 100)
}

struct FallbackCandidate {
    dist_sq: f64,
    owner_index: usize,
    valve_location: Point3<f64>,
    projected: Point3<f64>,
}

/// Resolves a valve by centerline projection, or `None` if no candidate
/// projects within radius or tolerance.
pub fn resolve_nearest_centerline(
    cache: &ValveConnectorCache,
    candidates: &ElementArena,
    index: &MepConnectorIndex,
    config: &ExtractionConfig,
    services: &ServiceNameResolver<'_>,
) -> Option<ResolutionResult> {
    let k = candidate_count(index.len());
    let tol_sq = config.tolerance_mm * config.tolerance_mm;

    let mut fallback: Option<FallbackCandidate> = None;

    for connector in &cache.connectors {
        let hits = index.nearest(&connector.origin, k);
        let mut seen_owners = FxHashSet::default();

        for hit in &hits {
            let owner_index = hit.payload.owner_index;
            // Hits are distance-ordered, so the first connector seen per
            // element is its closest one.
            if !seen_owners.insert(owner_index) {
                continue;
            }
            let Some(element) = candidates.get(owner_index) else {
                continue;
            };
            let Some(curve) = element.centerline() else {
                continue;
            };
            let Some(projected) = curve.closest_point(&connector.origin) else {
                continue;
            };

            let dist_sq =
                squared_distance_bounded(&connector.origin, &projected, config.tolerance_mm);
            // Covers the metric's infinity rejection too. Gating the radius
            // hit-test on tolerance keeps every reported distance within it.
            if dist_sq > tol_sq {
                continue;
            }

            // Inside the element's physical radius: a direct hit. The
            // projection ignores end-cap geometry, which can admit points
            // slightly beyond a finite curve's end; acceptable while radius
            // and tolerance are small relative to element length.
            let radius = element_radius_mm(element, hit.payload);
            if radius > 0.0 && dist_sq < radius * radius {
                if let Some(service) = services.service_for(element) {
                    return Some(ResolutionResult::proximity(
                        ResolutionMethod::NearestCenterline,
                        cache,
                        element.id(),
                        service,
                        dist_sq.sqrt(),
                        connector.origin,
                        projected,
                    ));
                }
            }

            if fallback.as_ref().map_or(true, |f| dist_sq < f.dist_sq) {
                fallback = Some(FallbackCandidate {
                    dist_sq,
                    owner_index,
                    valve_location: connector.origin,
                    projected,
                });
            }
        }
    }

    let fallback = fallback?;
    let element = candidates.get(fallback.owner_index)?;
    let service = services.service_for(element)?;
    Some(ResolutionResult::proximity(
        ResolutionMethod::NearestCenterline,
        cache,
        element.id(),
        service,
        fallback.dist_sq.sqrt(),
        fallback.valve_location,
        fallback.projected,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mep_link_model::{AttributeStore, Centerline, Connector, MepElement, Pipe};

    fn pipe_run(
        id: i64,
        from: (f64, f64, f64),
        to: (f64, f64, f64),
        diameter_mm: Option<f64>,
        service: Option<&str>,
    ) -> MepElement {
        let a = Point3::new(from.0, from.1, from.2);
        let b = Point3::new(to.0, to.1, to.2);
        let mut attributes = AttributeStore::new();
        if let Some(s) = service {
            attributes.insert_text("Service Name", s);
        }
        MepElement::Pipe(Pipe {
            id,
            connectors: vec![Connector::terminal(a), Connector::terminal(b)],
            centerline: Some(Centerline::line(a, b)),
            diameter_mm,
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
    fn candidate_count_scales_with_index_size() {
        assert_eq!(candidate_count(0), 20);
        assert_eq!(candidate_count(1_000), 20);
        assert_eq!(candidate_count(5_000), 50);
        assert_eq!(candidate_count(50_000), 100);
    }

    #[test]
    fn mid_span_valve_hits_within_radius() {
        // 110mm pipe along X; valve connector 40mm off-axis at mid-span is
        // inside the 55mm radius -> direct hit.
        let candidates = ElementArena::from_elements(vec![pipe_run(
            10,
            (0.0, 0.0, 0.0),
            (2000.0, 0.0, 0.0),
            Some(110.0),
            Some("Chilled Water"),
        )])
        .unwrap();
        let index = MepConnectorIndex::build(&candidates);
        let cache = valve_cache(&[(1000.0, 40.0, 0.0)]);

        let config = config();
        let services = ServiceNameResolver::new(&config);
        let result =
            resolve_nearest_centerline(&cache, &candidates, &index, &config, &services).unwrap();

        assert_eq!(result.method, ResolutionMethod::NearestCenterline);
        assert_eq!(result.source_element_id, 10);
        assert_eq!(result.service.as_deref(), Some("Chilled Water"));
        assert_relative_eq!(result.distance_mm, 40.0);
        assert_eq!(result.mep_connector_location, "(1000.0, 0.0, 0.0)");
    }

    #[test]
    fn outside_radius_but_within_tolerance_uses_fallback() {
        // 40mm off-axis against a 50mm pipe (25mm radius): no radius hit,
        // but within the 50mm tolerance -> fallback candidate.
        let candidates = ElementArena::from_elements(vec![pipe_run(
            10,
            (0.0, 0.0, 0.0),
            (2000.0, 0.0, 0.0),
            Some(50.0),
            Some("Heating"),
        )])
        .unwrap();
        let index = MepConnectorIndex::build(&candidates);
        let cache = valve_cache(&[(1000.0, 40.0, 0.0)]);

        let config = config();
        let services = ServiceNameResolver::new(&config);
        let result =
            resolve_nearest_centerline(&cache, &candidates, &index, &config, &services).unwrap();

        assert_eq!(result.method, ResolutionMethod::NearestCenterline);
        assert_relative_eq!(result.distance_mm, 40.0);
    }

    #[test]
    fn unknown_radius_excluded_from_hit_test_but_fallback_applies() {
        // No diameter anywhere: radius is the unknown sentinel, so the
        // radius hit-test is skipped entirely; tolerance fallback still works.
        let candidates = ElementArena::from_elements(vec![pipe_run(
            10,
            (0.0, 0.0, 0.0),
            (2000.0, 0.0, 0.0),
            None,
            Some("Heating"),
        )])
        .unwrap();
        let index = MepConnectorIndex::build(&candidates);
        let cache = valve_cache(&[(1000.0, 10.0, 0.0)]);

        let config = config();
        let services = ServiceNameResolver::new(&config);
        let result =
            resolve_nearest_centerline(&cache, &candidates, &index, &config, &services).unwrap();
        assert_relative_eq!(result.distance_mm, 10.0);
    }

    #[test]
    fn beyond_tolerance_returns_none() {
        let candidates = ElementArena::from_elements(vec![pipe_run(
            10,
            (0.0, 0.0, 0.0),
            (2000.0, 0.0, 0.0),
            Some(110.0),
            Some("CHW"),
        )])
        .unwrap();
        let index = MepConnectorIndex::build(&candidates);
        let cache = valve_cache(&[(1000.0, 200.0, 0.0)]);

        let config = config();
        let services = ServiceNameResolver::new(&config);
        assert!(
            resolve_nearest_centerline(&cache, &candidates, &index, &config, &services).is_none()
        );
    }

    #[test]
    fn element_without_centerline_is_skipped() {
        let element = MepElement::Pipe(Pipe {
            id: 10,
            connectors: vec![Connector::terminal(Point3::new(0.0, 10.0, 0.0))],
            centerline: None,
            diameter_mm: Some(110.0),
            attributes: AttributeStore::new(),
        });
        let candidates = ElementArena::from_elements(vec![element]).unwrap();
        let index = MepConnectorIndex::build(&candidates);
        let cache = valve_cache(&[(0.0, 0.0, 0.0)]);

        let config = config();
        let services = ServiceNameResolver::new(&config);
        assert!(
            resolve_nearest_centerline(&cache, &candidates, &index, &config, &services).is_none()
        );
    }

    #[test]
    fn closest_of_two_runs_wins_fallback() {
        let candidates = ElementArena::from_elements(vec![
            pipe_run(10, (0.0, 30.0, 0.0), (2000.0, 30.0, 0.0), None, Some("Far")),
            pipe_run(20, (0.0, -20.0, 0.0), (2000.0, -20.0, 0.0), None, Some("Near")),
        ])
        .unwrap();
        let index = MepConnectorIndex::build(&candidates);
        let cache = valve_cache(&[(1000.0, 0.0, 0.0)]);

        let config = config();
        let services = ServiceNameResolver::new(&config);
        let result =
            resolve_nearest_centerline(&cache, &candidates, &index, &config, &services).unwrap();
        assert_eq!(result.service.as_deref(), Some("Near"));
        assert_relative_eq!(result.distance_mm, 20.0);
    }
}
