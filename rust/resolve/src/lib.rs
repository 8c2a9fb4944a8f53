// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # MEP-Link Resolve
//!
//! The spatial matching engine: for each valve in a building-services model,
//! find the distribution service it belongs to by analyzing topological
//! connections and spatial proximity against a set of MEP candidates.
//!
//! Resolution is tiered, first success terminal:
//!
//! 1. **Connected** — a direct topological reference to a counterpart
//!    connector whose owner yields a service string.
//! 2. **NearestConnector** — the closest MEP connector within tolerance,
//!    with a "touching" early exit for physical contact.
//! 3. **NearestCenterline** — projection of valve connectors onto candidate
//!    centerlines, hit-tested against the element's physical radius.
//!
//! All host-document reads happen in two bulk cache-building phases; the
//! per-valve hot loop touches only the read-only caches and the k-d index.

pub mod cache;
pub mod centerline;
pub mod connectivity;
pub mod error;
pub mod kdtree;
pub mod metric;
pub mod pipeline;
pub mod proximity;
pub mod radius;
pub mod service;

pub use cache::{ConnectorRecord, MepConnectorIndex, ValveConnectorCache};
pub use error::{Error, Result};
pub use kdtree::{KdSpatialIndex, NearestHit};
pub use metric::squared_distance_bounded;
pub use pipeline::{
    extract, ExtractionSummary, ResolutionMethod, ResolutionResult, NO_SOURCE_ELEMENT,
};
pub use radius::{element_radius_mm, UNKNOWN_RADIUS};
pub use service::ServiceNameResolver;
