// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Errors associated with the delimited text outputs (spec.md §6):
`atmospheric_parameters.txt` and `used_points.txt`.
*/

use thiserror::Error;

use crate::error::ErrorKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{path}: could not create output file")]
    CreateFailed { path: String },

    #[error("{path}: could not write row: {reason}")]
    WriteFailed { path: String, reason: String },
}

impl Error {
    /// Classify this error per spec.md §7's taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::CreateFailed { .. } => ErrorKind::IoWrite,
            Error::WriteFailed { .. } => ErrorKind::IoWrite,
        }
    }
}
