// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Errors associated with loading the NARR grid-point store.
*/

use thiserror::Error;

use crate::error::ErrorKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{path}: could not open grid header")]
    MissingHeader { path: String },

    #[error("{path}: expected 3 header lines (count, rows, cols), got {lines}")]
    MalformedHeader { path: String, lines: usize },

    #[error("{path}: header line {line_num} is not a valid integer: {line}")]
    HeaderNotInteger {
        path: String,
        line_num: usize,
        line: String,
    },

    #[error("{path}: header says rows*cols={expected} but count={count}")]
    HeaderInconsistent {
        path: String,
        expected: usize,
        count: usize,
    },

    #[error("{path}: could not open grid point binary records")]
    MissingRecords { path: String },

    #[error(
        "{path}: expected {expected} records of {record_size} bytes ({expected_bytes} bytes total), got {actual_bytes} bytes"
    )]
    RecordSizeMismatch {
        path: String,
        expected: usize,
        record_size: usize,
        expected_bytes: usize,
        actual_bytes: usize,
    },

    #[error("{path}: grid point records are not aligned for binary decoding")]
    MisalignedRecords { path: String },
}

impl Error {
    /// Classify this error per spec.md §7's taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingHeader { .. } => ErrorKind::ConfigMissing,
            Error::MalformedHeader { .. } => ErrorKind::IoRead,
            Error::HeaderNotInteger { .. } => ErrorKind::IoRead,
            Error::HeaderInconsistent { .. } => ErrorKind::IoRead,
            Error::MissingRecords { .. } => ErrorKind::ConfigMissing,
            Error::RecordSizeMismatch { .. } => ErrorKind::IoRead,
            Error::MisalignedRecords { .. } => ErrorKind::IoRead,
        }
    }
}
