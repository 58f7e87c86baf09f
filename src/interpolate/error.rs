// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Errors associated with the pixel-level interpolator (spec.md §4.F).
*/

use thiserror::Error;

use crate::error::ErrorKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("geolocating line {line} sample {sample}: {source}")]
    Geolocation {
        line: usize,
        sample: usize,
        #[source]
        source: crate::geolocation::Error,
    },

    #[error("grid store has {grid_points} points but MODTRAN store has {modtran_points}")]
    StoreShapeMismatch {
        grid_points: usize,
        modtran_points: usize,
    },

    #[error("the grid is empty; cannot search for a center point")]
    EmptyGrid,
}

impl Error {
    /// Classify this error per spec.md §7's taxonomy. `Geolocation` defers
    /// to the wrapped [`crate::geolocation::Error`]'s own classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Geolocation { source, .. } => source.kind(),
            Error::StoreShapeMismatch { .. } => ErrorKind::Domain,
            Error::EmptyGrid => ErrorKind::Domain,
        }
    }
}
