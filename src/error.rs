// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors raised while shrinking an image.

use failure::Fail;

/// Everything that can go wrong between loading an image and writing
/// the shrunken result.
#[derive(Debug, Fail)]
pub enum CarveError {
    /// The requested shrink cannot be carried out on this image.
    #[fail(display = "invalid configuration: {}", _0)]
    Configuration(String),

    /// The source image is missing, corrupt, or in a format we cannot
    /// read.
    #[fail(display = "could not decode {}: {}", path, reason)]
    Decode { path: String, reason: String },

    /// The destination could not be written.
    #[fail(display = "could not write {}: {}", path, reason)]
    Write { path: String, reason: String },

    /// A logic defect: the seam or the tables it came from are
    /// inconsistent with the buffer being carved.
    #[fail(display = "internal invariant violated: {}", _0)]
    InternalInvariant(String),
}

impl CarveError {
    pub(crate) fn config<S: Into<String>>(msg: S) -> Self {
        CarveError::Configuration(msg.into())
    }

    pub(crate) fn invariant<S: Into<String>>(msg: S) -> Self {
        CarveError::InternalInvariant(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CarveError>;
