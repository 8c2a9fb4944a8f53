// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Named attribute store captured from the host element.
//!
//! Host documents expose both a raw stored value and a human-readable
//! formatted value per attribute ("15.5" vs "15,5 mm"). Service-name lookup
//! prefers the formatted value; size parsing tries both.

use rustc_hash::FxHashMap;

/// A single captured attribute value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeValue {
    /// Raw stored value, as text.
    pub raw: Option<String>,
    /// Human-readable formatted value (units applied, locale formatting).
    pub formatted: Option<String>,
    /// Numeric value, when the attribute stores a number.
    pub number: Option<f64>,
}

/// Attribute values keyed by attribute name.
///
/// Built once during cache construction and read-only afterwards. Lookup is
/// exact-match on the name the host document reports.
#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    values: FxHashMap<String, AttributeValue>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a formatted text attribute.
    pub fn insert_text(&mut self, name: impl Into<String>, formatted: impl Into<String>) {
        self.values.insert(
            name.into(),
            AttributeValue {
                formatted: Some(formatted.into()),
                ..AttributeValue::default()
            },
        );
    }

    /// Inserts a numeric attribute.
    pub fn insert_number(&mut self, name: impl Into<String>, number: f64) {
        self.values.insert(
            name.into(),
            AttributeValue {
                number: Some(number),
                ..AttributeValue::default()
            },
        );
    }

    /// Inserts a fully specified attribute value.
    pub fn insert(&mut self, name: impl Into<String>, value: AttributeValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.values.get(name)
    }

    /// Text for display: formatted value preferred, raw as fallback.
    /// Blank strings count as absent.
    pub fn display_value(&self, name: &str) -> Option<&str> {
        let value = self.values.get(name)?;
        non_blank(value.formatted.as_deref()).or_else(|| non_blank(value.raw.as_deref()))
    }

    /// Numeric value, if the attribute stores one.
    pub fn numeric_value(&self, name: &str) -> Option<f64> {
        self.values.get(name)?.number
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}
