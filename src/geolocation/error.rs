// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Errors associated with the geolocation collaborator.
*/

use thiserror::Error;

use crate::error::ErrorKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{path}: could not open geolocation raster")]
    MissingFile { path: String },

    #[error("{path}: expected {expected} bytes ({lines}x{samples} f64 values), got {actual}")]
    SizeMismatch {
        path: String,
        lines: usize,
        samples: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{path}: geolocation raster is not aligned for binary decoding")]
    Misaligned { path: String },

    #[error("line {line}, sample {sample} is out of bounds for a {lines}x{samples} raster")]
    OutOfBounds {
        line: usize,
        sample: usize,
        lines: usize,
        samples: usize,
    },
}

impl Error {
    /// Classify this error per spec.md §7's taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingFile { .. } => ErrorKind::ConfigMissing,
            Error::SizeMismatch { .. } => ErrorKind::IoRead,
            Error::Misaligned { .. } => ErrorKind::IoRead,
            Error::OutOfBounds { .. } => ErrorKind::Domain,
        }
    }
}
