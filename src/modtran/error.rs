// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Errors associated with the MODTRAN-point store and elevation profile.
*/

use thiserror::Error;

use crate::error::ErrorKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{path}: could not open")]
    MissingFile { path: String },

    #[error("{path} line {line_num}: expected an elevation count on the first line")]
    MissingElevationCount { path: String, line_num: usize },

    #[error("{path} line {line_num}: malformed elevation_km value: {line}")]
    MalformedElevation {
        path: String,
        line_num: usize,
        line: String,
    },

    #[error("{path}: header declared {declared} elevations, found {found}")]
    ElevationCountMismatch {
        path: String,
        declared: usize,
        found: usize,
    },

    #[error("{path} line {line_num}: malformed grid-elevation row: {line}")]
    MalformedGridElevationRow {
        path: String,
        line_num: usize,
        line: String,
    },
}

impl Error {
    /// Classify this error per spec.md §7's taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingFile { .. } => ErrorKind::ConfigMissing,
            Error::MissingElevationCount { .. } => ErrorKind::IoRead,
            Error::MalformedElevation { .. } => ErrorKind::IoRead,
            Error::ElevationCountMismatch { .. } => ErrorKind::IoRead,
            Error::MalformedGridElevationRow { .. } => ErrorKind::IoRead,
        }
    }
}
