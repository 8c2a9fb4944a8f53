// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Service-name lookup for MEP elements.
//!
//! Priority chain per element: a typed fabrication accessor when the
//! configured input field maps to one, then generic attribute lookup with
//! the formatted value preferred. `None` is not an error; it tells the
//! caller to try the next tier or report `NotFound`.

use mep_link_model::{ExtractionConfig, MepElement, TypedServiceField};

/// Resolves the service string for MEP elements under one configuration.
#[derive(Debug, Clone, Copy)]
pub struct ServiceNameResolver<'a> {
    config: &'a ExtractionConfig,
}

impl<'a> ServiceNameResolver<'a> {
    pub fn new(config: &'a ExtractionConfig) -> Self {
        Self { config }
    }

    /// The service string for `element`, or `None` if no field yields a
    /// non-whitespace value.
    pub fn service_for(&self, element: &MepElement) -> Option<String> {
        // Fast path: typed fabrication fields when the input field maps to one
        if let Some(part) = element.as_fabrication() {
            if let Some(field) = self
                .config
                .service_fields
                .typed_field_for(&self.config.input_field)
            {
                let typed = match field {
                    TypedServiceField::ServiceName => part.service_name.as_deref(),
                    TypedServiceField::ServiceAbbreviation => {
                        part.service_abbreviation.as_deref()
                    }
                };
                if let Some(value) = non_blank(typed) {
                    return Some(value.to_string());
                }
                // Typed field empty: fall through to the generic store
            }
        }

        non_blank(element.attributes().display_value(&self.config.input_field))
            .map(str::to_string)
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
