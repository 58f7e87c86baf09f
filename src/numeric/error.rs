// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Errors associated with the numeric kernel (Planck, spline, integration).
*/

use thiserror::Error;

use crate::error::ErrorKind;

#[derive(Error, Debug)]
pub enum Error {
    /// A spline or integrator was given fewer than the minimum number of
    /// samples it needs to operate.
    #[error("{function}: need at least {minimum} samples, got {actual}")]
    TooFewSamples {
        function: &'static str,
        minimum: usize,
        actual: usize,
    },

    /// The resampled buffer for Newton-Cotes integration could not be
    /// allocated at the requested length.
    #[error("{function}: failed to allocate a resample buffer of length {requested}")]
    ResourceExhausted {
        function: &'static str,
        requested: usize,
    },

    /// `x` and `y` arrays passed to the spline builder have mismatched
    /// lengths, or `x` is not strictly increasing.
    #[error("{function}: {reason}")]
    InvalidInput {
        function: &'static str,
        reason: String,
    },
}

impl Error {
    /// Classify this error per spec.md §7's taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TooFewSamples { .. } => ErrorKind::Domain,
            Error::ResourceExhausted { .. } => ErrorKind::ResourceExhausted,
            Error::InvalidInput { .. } => ErrorKind::Domain,
        }
    }
}
