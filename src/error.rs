// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Structs and helper methods for Error handling

use thiserror::Error;

/// Top-level error type. Every module-level error type converts into this
/// via `#[from]`, so a single `Result<_, Error>` suffices all the way up to
/// `main`.
#[derive(Error, Debug)]
pub enum Error {
    /// An error derived from `numeric::Error`.
    #[error("{0}")]
    Numeric(#[from] crate::numeric::Error),

    /// An error derived from `spectral_response::Error`.
    #[error("{0}")]
    SpectralResponse(#[from] crate::spectral_response::Error),

    /// An error derived from `grid::Error`.
    #[error("{0}")]
    Grid(#[from] crate::grid::Error),

    /// An error derived from `modtran::Error`.
    #[error("{0}")]
    Modtran(#[from] crate::modtran::Error),

    /// An error derived from `reducer::Error`.
    #[error("{0}")]
    Reducer(#[from] crate::reducer::Error),

    /// An error derived from `interpolate::Error`.
    #[error("{0}")]
    Interpolate(#[from] crate::interpolate::Error),

    /// An error derived from `raster::Error`.
    #[error("{0}")]
    Raster(#[from] crate::raster::Error),

    /// An error derived from `csv_output::Error`.
    #[error("{0}")]
    CsvOutput(#[from] crate::csv_output::Error),

    /// An error derived from `config::Error`.
    #[error("{0}")]
    Config(#[from] crate::config::Error),
}

impl Error {
    /// Classify this error per spec.md §7's taxonomy, delegating to
    /// whichever leaf error type it wraps.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Numeric(e) => e.kind(),
            Error::SpectralResponse(e) => e.kind(),
            Error::Grid(e) => e.kind(),
            Error::Modtran(e) => e.kind(),
            Error::Reducer(e) => e.kind(),
            Error::Interpolate(e) => e.kind(),
            Error::Raster(e) => e.kind(),
            Error::CsvOutput(e) => e.kind(),
            Error::Config(e) => e.kind(),
        }
    }
}

/// The taxonomy from spec.md §7. Every leaf error classifies itself as one
/// of these so the CLI can log a consistent category alongside the detailed
/// message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing environment variable or required input file.
    ConfigMissing,
    /// Unexpected EOF, malformed line, or other input parsing failure.
    IoRead,
    /// Could not create or write an output file.
    IoWrite,
    /// An allocation or resampling operation could not be completed.
    ResourceExhausted,
    /// An unknown sensor, empty spectral response, or other domain-rule
    /// violation.
    Domain,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            ErrorKind::ConfigMissing => "config-missing",
            ErrorKind::IoRead => "io-read",
            ErrorKind::IoWrite => "io-write",
            ErrorKind::ResourceExhausted => "resource-exhausted",
            ErrorKind::Domain => "domain",
        };
        write!(f, "{s}")
    }
}
