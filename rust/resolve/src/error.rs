// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the matching engine.
//!
//! Only systemic failures surface here. Per-element misses (no centerline,
//! no parseable size, no service string) are `Option`s in the data flow and
//! skip that element; "not found" is a normal result state, not an error.

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during an extraction run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The extraction configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] mep_link_model::Error),
}
