// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Errors associated with the point-level reducer (spec.md §4.E).
*/

use thiserror::Error;

use crate::error::ErrorKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{path}: could not open grid-elevation association file")]
    MissingGridElevations { path: String },

    #[error("{path} line {line_num}: malformed grid-elevation row: {line}")]
    MalformedGridElevationRow {
        path: String,
        line_num: usize,
        line: String,
    },

    #[error("point index {index}: no grid-elevation association present in grid_elevations.txt")]
    MissingAssociation { index: usize },

    #[error("{path}: could not open MODTRAN header")]
    MissingHeader { path: String },

    #[error("{path}: expected 2 header lines (count, zero_temp), got {lines}")]
    MalformedHeader { path: String, lines: usize },

    #[error("{path} line {line_num}: not a valid number: {line}")]
    HeaderNotNumeric {
        path: String,
        line_num: usize,
        line: String,
    },

    #[error("{path}: could not open MODTRAN data file")]
    MissingData { path: String },

    #[error("{path} line {line_num}: expected 2 whitespace-separated columns: {line}")]
    MalformedDataRow {
        path: String,
        line_num: usize,
        line: String,
    },

    #[error("{path}: header declared {declared} rows, found {found}")]
    RowCountMismatch {
        path: String,
        declared: usize,
        found: usize,
    },

    #[error("point {index}, elevation {elevation_km}: {source}")]
    Numeric {
        index: usize,
        elevation_km: f64,
        #[source]
        source: crate::numeric::Error,
    },

    #[error("point {index}, elevation {elevation_km}: transmission denominator Lt(310)-Lt(273) is ~0, system is singular")]
    SingularSystem { index: usize, elevation_km: f64 },

    #[error(
        "point {index}, elevation {elevation_km}: water-radiance albedo 1-epsilon_w is ~0, cannot solve for Ld"
    )]
    ZeroAlbedo { index: usize, elevation_km: f64 },

    #[error("could not allocate buffer for {requested} records")]
    ResourceExhausted { requested: usize },
}

impl Error {
    /// Classify this error per spec.md §7's taxonomy. `Numeric` defers to
    /// the wrapped [`crate::numeric::Error`]'s own classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingGridElevations { .. } => ErrorKind::ConfigMissing,
            Error::MalformedGridElevationRow { .. } => ErrorKind::IoRead,
            Error::MissingAssociation { .. } => ErrorKind::Domain,
            Error::MissingHeader { .. } => ErrorKind::ConfigMissing,
            Error::MalformedHeader { .. } => ErrorKind::IoRead,
            Error::HeaderNotNumeric { .. } => ErrorKind::IoRead,
            Error::MissingData { .. } => ErrorKind::ConfigMissing,
            Error::MalformedDataRow { .. } => ErrorKind::IoRead,
            Error::RowCountMismatch { .. } => ErrorKind::IoRead,
            Error::Numeric { source, .. } => source.kind(),
            Error::SingularSystem { .. } => ErrorKind::Domain,
            Error::ZeroAlbedo { .. } => ErrorKind::Domain,
            Error::ResourceExhausted { .. } => ErrorKind::ResourceExhausted,
        }
    }
}
