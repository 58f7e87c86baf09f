// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Errors associated with the intermediate-raster writer (spec.md §4.G).
*/

use thiserror::Error;

use crate::error::ErrorKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{path}: expected {expected} values ({lines}x{samples}), got {actual}")]
    SizeMismatch {
        path: String,
        lines: usize,
        samples: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{path}: could not write raster data")]
    WriteFailed { path: String },
}

impl Error {
    /// Classify this error per spec.md §7's taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SizeMismatch { .. } => ErrorKind::Domain,
            Error::WriteFailed { .. } => ErrorKind::IoWrite,
        }
    }
}
