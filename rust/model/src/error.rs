// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the model layer.

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building the model.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Tolerances must be positive, finite distances.
    #[error("tolerance must be a positive distance, got {0}")]
    InvalidTolerance(f64),

    /// The touching distance must not exceed the general tolerance.
    #[error("touching distance {touching_mm} exceeds tolerance {tolerance_mm}")]
    TouchingExceedsTolerance { touching_mm: f64, tolerance_mm: f64 },

    /// The input attribute name must not be blank.
    #[error("input field name is blank")]
    BlankInputField,

    /// Two candidate elements reported the same host id.
    #[error("duplicate element id: {0}")]
    DuplicateElementId(i64),
}
