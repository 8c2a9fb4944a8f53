// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element model: valves, MEP candidate kinds and the candidate arena.
//!
//! Every supported MEP element kind is a named variant with a compile-time
//! checked capability implementation — there is no runtime probing of
//! unknown host types. A kind that lacks a capability simply yields nothing
//! (no connectors, no centerline), which downstream resolvers treat as
//! "skip", never as an error.
//!
//! The [`ElementArena`] is the candidate store for one extraction run: a
//! fixed array of elements plus an id→index map. The array position is the
//! stable join key between spatial-index payloads and elements; it is
//! assigned once at construction and never reassigned mid-run.

use rustc_hash::FxHashMap;

use crate::attributes::AttributeStore;
use crate::centerline::Centerline;
use crate::connector::Connector;
use crate::error::{Error, Result};

/// Access to an element's ordered connector list.
pub trait HasConnectors {
    /// Connectors in host-document insertion order.
    fn connectors(&self) -> &[Connector];
}

/// Access to an element's medial curve, when it has one.
pub trait HasCenterline {
    fn centerline(&self) -> Option<&Centerline>;
}

/// Access to an element's size metadata, when it carries any.
pub trait HasSizeDescriptor {
    /// Typed textual size descriptor (e.g. `"160ø"`), when the kind has one.
    fn size_descriptor(&self) -> Option<&str> {
        None
    }

    /// Direct numeric overall diameter in millimetres, when the kind
    /// exposes one.
    fn diameter_mm(&self) -> Option<f64> {
        None
    }
}

/// A round or arbitrary-section pipe segment.
#[derive(Debug, Clone)]
pub struct Pipe {
    pub id: i64,
    pub connectors: Vec<Connector>,
    pub centerline: Option<Centerline>,
    /// Overall diameter from the pipe type, when available.
    pub diameter_mm: Option<f64>,
    pub attributes: AttributeStore,
}

/// A duct segment (round, rectangular or oval).
#[derive(Debug, Clone)]
pub struct Duct {
    pub id: i64,
    pub connectors: Vec<Connector>,
    pub centerline: Option<Centerline>,
    pub attributes: AttributeStore,
}

/// A fabrication-style part with typed service fields.
#[derive(Debug, Clone)]
pub struct FabricationPart {
    pub id: i64,
    pub connectors: Vec<Connector>,
    pub centerline: Option<Centerline>,
    /// Typed size text, e.g. `"160ø"` or `"300x200"`.
    pub size: Option<String>,
    pub service_name: Option<String>,
    pub service_abbreviation: Option<String>,
    pub attributes: AttributeStore,
}

/// A fitting (elbow, tee, transition). Has connectors but no centerline.
#[derive(Debug, Clone)]
pub struct Fitting {
    pub id: i64,
    pub connectors: Vec<Connector>,
    pub attributes: AttributeStore,
}

/// An MEP candidate element, one variant per supported kind.
#[derive(Debug, Clone)]
pub enum MepElement {
    Pipe(Pipe),
    Duct(Duct),
    FabricationPart(FabricationPart),
    Fitting(Fitting),
}

impl MepElement {
    pub fn id(&self) -> i64 {
        match self {
            MepElement::Pipe(p) => p.id,
            MepElement::Duct(d) => d.id,
            MepElement::FabricationPart(f) => f.id,
            MepElement::Fitting(f) => f.id,
        }
    }

    pub fn attributes(&self) -> &AttributeStore {
        match self {
            MepElement::Pipe(p) => &p.attributes,
            MepElement::Duct(d) => &d.attributes,
            MepElement::FabricationPart(f) => &f.attributes,
            MepElement::Fitting(f) => &f.attributes,
        }
    }

    /// The fabrication part behind this element, if it is one. Used by the
    /// typed service-field fast path.
    pub fn as_fabrication(&self) -> Option<&FabricationPart> {
        match self {
            MepElement::FabricationPart(f) => Some(f),
            _ => None,
        }
    }
}

impl HasConnectors for MepElement {
    fn connectors(&self) -> &[Connector] {
        match self {
            MepElement::Pipe(p) => &p.connectors,
            MepElement::Duct(d) => &d.connectors,
            MepElement::FabricationPart(f) => &f.connectors,
            MepElement::Fitting(f) => &f.connectors,
        }
    }
}

impl HasCenterline for MepElement {
    fn centerline(&self) -> Option<&Centerline> {
        match self {
            MepElement::Pipe(p) => p.centerline.as_ref(),
            MepElement::Duct(d) => d.centerline.as_ref(),
            MepElement::FabricationPart(f) => f.centerline.as_ref(),
            MepElement::Fitting(_) => None,
        }
    }
}

impl HasSizeDescriptor for MepElement {
    fn size_descriptor(&self) -> Option<&str> {
        match self {
            MepElement::FabricationPart(f) => f.size.as_deref(),
            _ => None,
        }
    }

    fn diameter_mm(&self) -> Option<f64> {
        match self {
            MepElement::Pipe(p) => p.diameter_mm,
            _ => None,
        }
    }
}

/// A device instance requiring service-name classification.
#[derive(Debug, Clone)]
pub struct Valve {
    pub id: i64,
    pub name: String,
    /// Connectors in host-document insertion order.
    pub connectors: Vec<Connector>,
}

impl Valve {
    pub fn new(id: i64, name: impl Into<String>, connectors: Vec<Connector>) -> Self {
        Self {
            id,
            name: name.into(),
            connectors,
        }
    }
}

/// Fixed array of MEP candidates plus an id→index map.
///
/// Built once per extraction run and immutable afterwards. Array position
/// is the stable index that joins spatial-index payloads back to elements.
#[derive(Debug, Clone)]
pub struct ElementArena {
    elements: Vec<MepElement>,
    by_id: FxHashMap<i64, usize>,
}

impl ElementArena {
    /// Builds the arena. Fails on duplicate element ids, which would break
    /// the id→index join.
    pub fn from_elements(elements: Vec<MepElement>) -> Result<Self> {
        let mut by_id = FxHashMap::default();
        by_id.reserve(elements.len());
        for (index, element) in elements.iter().enumerate() {
            if by_id.insert(element.id(), index).is_some() {
                return Err(Error::DuplicateElementId(element.id()));
            }
        }
        Ok(Self { elements, by_id })
    }

    /// Element at a stable array index.
    pub fn get(&self, index: usize) -> Option<&MepElement> {
        self.elements.get(index)
    }

    /// Element with the given host id.
    pub fn by_id(&self, id: i64) -> Option<&MepElement> {
        self.by_id.get(&id).map(|&index| &self.elements[index])
    }

    /// Stable array index of the element with the given host id.
    pub fn index_of(&self, id: i64) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MepElement> {
        self.elements.iter()
    }
}
