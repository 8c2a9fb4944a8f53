// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # MEP-Link Model
//!
//! Passive data model for MEP service-name extraction: elements, connectors,
//! centerline curves, attribute stores and extraction configuration.
//!
//! Everything in this crate is built once per extraction run by a host
//! adapter and treated as immutable afterwards. The matching engine
//! (`mep-link-resolve`) only reads these structures.

pub mod attributes;
pub mod centerline;
pub mod config;
pub mod connector;
pub mod element;
pub mod error;
pub mod point;
pub mod size_parse;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use attributes::{AttributeStore, AttributeValue};
pub use centerline::Centerline;
pub use config::{ExtractionConfig, ServiceFieldTable, TypedServiceField};
pub use connector::{Connector, ConnectorKind, ConnectorLink, CrossSection};
pub use element::{
    Duct, ElementArena, FabricationPart, Fitting, HasCenterline, HasConnectors,
    HasSizeDescriptor, MepElement, Pipe, Valve,
};
pub use error::{Error, Result};
pub use point::{format_point, is_finite_point};
pub use size_parse::parse_diameter_mm;
