// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tier 1: direct topological connection.
//!
//! Walks the valve's connectors in stored order, follows cross-referenced
//! counterpart links in their stored order, and takes the first counterpart
//! whose owner yields a service string. Order is significant: first found
//! wins, deterministically, regardless of distance to any other candidate.

use mep_link_model::ElementArena;

use crate::cache::ValveConnectorCache;
use crate::pipeline::ResolutionResult;
use crate::service::ServiceNameResolver;

/// Resolves a valve through its physical joins, or `None` if no connected
/// counterpart yields a service.
pub fn resolve_connected(
    cache: &ValveConnectorCache,
    candidates: &ElementArena,
    services: &ServiceNameResolver<'_>,
) -> Option<ResolutionResult> {
    for connector in &cache.connectors {
        if !connector.is_connected {
            continue;
        }
        for link in &connector.links {
            // A connector can cross-reference back to its own element
            if link.owner_id == cache.valve_id {
                continue;
            }
            // Counterparts outside the candidate set are skipped, not errors
            let Some(element) = candidates.by_id(link.owner_id) else {
                continue;
            };
            if let Some(service) = services.service_for(element) {
                return Some(ResolutionResult::connected(
                    cache,
                    element.id(),
                    service,
                    connector.origin,
                ));
            }
        }
    }
    None
}
