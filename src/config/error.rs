// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Errors associated with startup configuration validation (spec.md §6, §7
`config-missing`).
*/

use thiserror::Error;

use crate::error::ErrorKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("environment variable {var} is not set")]
    MissingEnvVar { var: &'static str },

    #[error("ST_DATA_DIR={data_dir}: missing sensor response file {path}")]
    MissingDataFile { data_dir: String, path: String },

    #[error("working directory {working_dir}: missing required file {path}")]
    MissingWorkingFile { working_dir: String, path: String },
}

impl Error {
    /// Classify this error per spec.md §7's taxonomy. Every variant here
    /// is a missing environment variable or input file, so all of them
    /// are `config-missing`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingEnvVar { .. } => ErrorKind::ConfigMissing,
            Error::MissingDataFile { .. } => ErrorKind::ConfigMissing,
            Error::MissingWorkingFile { .. } => ErrorKind::ConfigMissing,
        }
    }
}
