// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extraction configuration: tolerances, the input attribute name and the
//! typed service-field table.
//!
//! All config types are serde round-trippable so host adapters can persist
//! tolerance profiles as structured JSON.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Typed accessors on fabrication-style parts that can stand in for a
/// generic attribute lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypedServiceField {
    ServiceName,
    ServiceAbbreviation,
}

/// Maps input attribute names to typed fabrication accessors.
///
/// When the configured input field matches an entry (case-insensitive), the
/// service-name resolver reads the typed field directly instead of going
/// through the generic attribute store. The recognized-name set is
/// deliberately configuration, not a hardcoded list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceFieldTable {
    entries: Vec<(String, TypedServiceField)>,
}

impl ServiceFieldTable {
    /// An empty table: every lookup goes through the generic attribute store.
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn with_entry(mut self, name: impl Into<String>, field: TypedServiceField) -> Self {
        self.entries.push((name.into(), field));
        self
    }

    /// The typed accessor mapped to `input_field`, if any. First match wins.
    pub fn typed_field_for(&self, input_field: &str) -> Option<TypedServiceField> {
        self.entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(input_field))
            .map(|&(_, field)| field)
    }
}

impl Default for ServiceFieldTable {
    /// The common spellings seen across host documents.
    fn default() -> Self {
        Self::empty()
            .with_entry("Service Name", TypedServiceField::ServiceName)
            .with_entry("Fabrication Service Name", TypedServiceField::ServiceName)
            .with_entry("Service Abbreviation", TypedServiceField::ServiceAbbreviation)
    }
}

/// Configuration for one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Maximum linear distance (mm) at which a proximity match is accepted.
    pub tolerance_mm: f64,
    /// Smaller threshold (mm) signaling physical contact; must be <=
    /// `tolerance_mm`. Enables the per-connector early-exit shortcut.
    pub touching_dist_mm: f64,
    /// Attribute name to read the service string from on MEP elements.
    pub input_field: String,
    /// Typed accessor table for `input_field`.
    #[serde(default)]
    pub service_fields: ServiceFieldTable,
}

impl ExtractionConfig {
    /// Creates a validated configuration with the default service-field table.
    pub fn new(
        tolerance_mm: f64,
        touching_dist_mm: f64,
        input_field: impl Into<String>,
    ) -> Result<Self> {
        let config = Self {
            tolerance_mm,
            touching_dist_mm,
            input_field: input_field.into(),
            service_fields: ServiceFieldTable::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates tolerances and the input field name. Deserialized configs
    /// must be validated before use.
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance_mm.is_finite() && self.tolerance_mm > 0.0) {
            return Err(Error::InvalidTolerance(self.tolerance_mm));
        }
        if !(self.touching_dist_mm.is_finite() && self.touching_dist_mm > 0.0) {
            return Err(Error::InvalidTolerance(self.touching_dist_mm));
        }
        if self.touching_dist_mm > self.tolerance_mm {
            return Err(Error::TouchingExceedsTolerance {
                touching_mm: self.touching_dist_mm,
                tolerance_mm: self.tolerance_mm,
            });
        }
        if self.input_field.trim().is_empty() {
            return Err(Error::BlankInputField);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config() {
        let config = ExtractionConfig::new(50.0, 5.0, "Service Name").unwrap();
        assert_eq!(config.tolerance_mm, 50.0);
        assert_eq!(config.touching_dist_mm, 5.0);
    }

    #[test]
    fn touching_must_not_exceed_tolerance() {
        let err = ExtractionConfig::new(10.0, 25.0, "Service").unwrap_err();
        assert!(matches!(err, Error::TouchingExceedsTolerance { .. }));
    }

    #[test]
    fn tolerances_must_be_positive() {
        assert!(ExtractionConfig::new(0.0, 0.0, "Service").is_err());
        assert!(ExtractionConfig::new(50.0, -1.0, "Service").is_err());
        assert!(ExtractionConfig::new(f64::NAN, 1.0, "Service").is_err());
    }

    #[test]
    fn input_field_must_not_be_blank() {
        let err = ExtractionConfig::new(50.0, 5.0, "  ").unwrap_err();
        assert!(matches!(err, Error::BlankInputField));
    }

    #[test]
    fn default_table_maps_common_spellings() {
        let table = ServiceFieldTable::default();
        assert_eq!(
            table.typed_field_for("Service Name"),
            Some(TypedServiceField::ServiceName)
        );
        assert_eq!(
            table.typed_field_for("service name"),
            Some(TypedServiceField::ServiceName)
        );
        assert_eq!(
            table.typed_field_for("Service Abbreviation"),
            Some(TypedServiceField::ServiceAbbreviation)
        );
        assert_eq!(table.typed_field_for("Comments"), None);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = ExtractionConfig::new(50.0, 5.0, "Service Name").unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let back: ExtractionConfig = serde_json::from_str(&json).unwrap();
        back.validate().unwrap();
        assert_eq!(back.tolerance_mm, config.tolerance_mm);
        assert_eq!(back.input_field, config.input_field);
    }
}
