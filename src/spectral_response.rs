// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Loader for a sensor's spectral response function R(λ).
*/

use std::fmt;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::error::ErrorKind;

/// Upper bound on the number of (wavelength, response) rows any recognised
/// sensor's file may contain, used only to sanity-check files before
/// allocating.
pub const MAX_SPECTRAL_RESPONSE_ROWS: usize = 10_000;

#[derive(Error, Debug)]
pub enum Error {
    #[error("ST_DATA_DIR not set or missing {sensor} response file {path}")]
    MissingFile { sensor: String, path: String },

    #[error("{path}:{line_num}: malformed spectral response row: {line}")]
    MalformedRow {
        path: String,
        line_num: usize,
        line: String,
    },

    #[error("unrecognised (instrument, satellite) pair: {instrument}/{satellite}")]
    UnknownSensor { instrument: String, satellite: String },

    #[error("{path}: spectral response is empty")]
    Empty { path: String },

    #[error("{path}: wavelength column is not strictly increasing at row {row}")]
    NotMonotonic { path: String, row: usize },

    #[error("{path}: {rows} rows exceeds the sanity bound of {max}")]
    TooManyRows {
        path: String,
        rows: usize,
        max: usize,
    },
}

impl Error {
    /// Classify this error per spec.md §7's taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingFile { .. } => ErrorKind::ConfigMissing,
            Error::MalformedRow { .. } => ErrorKind::IoRead,
            Error::UnknownSensor { .. } => ErrorKind::Domain,
            Error::Empty { .. } => ErrorKind::Domain,
            Error::NotMonotonic { .. } => ErrorKind::Domain,
            Error::TooManyRows { .. } => ErrorKind::Domain,
        }
    }
}

/// Recognised Landsat thermal sensors, per spec.md §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensor {
    L4Tm,
    L5Tm,
    L7Etm,
    L8OliTirs,
}

impl Sensor {
    /// Resolve a sensor from the `(instrument, satellite)` pair as they'd
    /// appear in Landsat metadata (e.g. `("TM", "LANDSAT_5")`,
    /// `("OLI_TIRS", "LANDSAT_8")`).
    pub fn from_instrument_satellite(instrument: &str, satellite: &str) -> Result<Self, Error> {
        let instrument = instrument.to_ascii_uppercase();
        let satellite = satellite.to_ascii_uppercase();

        let sensor = if satellite.contains('4') && instrument.contains("TM") {
            Sensor::L4Tm
        } else if satellite.contains('5') && instrument.contains("TM") {
            Sensor::L5Tm
        } else if satellite.contains('7') && instrument.contains("ETM") {
            Sensor::L7Etm
        } else if satellite.contains('8') && (instrument.contains("OLI") || instrument.contains("TIRS"))
        {
            Sensor::L8OliTirs
        } else {
            return Err(Error::UnknownSensor { instrument, satellite });
        };

        Ok(sensor)
    }

    /// The filename `ST_DATA_DIR` is expected to contain for this sensor.
    pub fn response_filename(self) -> &'static str {
        match self {
            Sensor::L4Tm => "L4_Spectral_Response.txt",
            Sensor::L5Tm => "L5_Spectral_Response.txt",
            Sensor::L7Etm => "L7_Spectral_Response.txt",
            Sensor::L8OliTirs => "L8_Spectral_Response.txt",
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Sensor::L4Tm => "L4-TM",
            Sensor::L5Tm => "L5-TM",
            Sensor::L7Etm => "L7-ETM",
            Sensor::L8OliTirs => "L8-OLI/TIRS",
        };
        write!(f, "{s}")
    }
}

/// A sensor's per-wavelength sensitivity, loaded from a two-column
/// whitespace-separated text file: strictly increasing wavelength (µm) in
/// column 0, response in column 1.
#[derive(Debug, Clone)]
pub struct SpectralResponse {
    pub sensor: Sensor,
    pub wavelength_um: Vec<f64>,
    pub response: Vec<f64>,
}

impl SpectralResponse {
    /// Load `{ST_DATA_DIR}/{sensor.response_filename()}`.
    pub fn load(data_dir: &Path, sensor: Sensor) -> Result<Self, Error> {
        let path = data_dir.join(sensor.response_filename());
        let path_str = path.display().to_string();

        let contents = fs::read_to_string(&path).map_err(|_| Error::MissingFile {
            sensor: sensor.to_string(),
            path: path_str.clone(),
        })?;

        let mut wavelength_um = Vec::new();
        let mut response = Vec::new();

        for (idx, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let (Some(w), Some(r)) = (fields.next(), fields.next()) else {
                return Err(Error::MalformedRow {
                    path: path_str,
                    line_num: idx + 1,
                    line: line.to_string(),
                });
            };
            let (Ok(w), Ok(r)) = (w.parse::<f64>(), r.parse::<f64>()) else {
                return Err(Error::MalformedRow {
                    path: path_str,
                    line_num: idx + 1,
                    line: line.to_string(),
                });
            };
            wavelength_um.push(w);
            response.push(r);
        }

        if wavelength_um.is_empty() {
            return Err(Error::Empty { path: path_str });
        }
        if wavelength_um.len() > MAX_SPECTRAL_RESPONSE_ROWS {
            return Err(Error::TooManyRows {
                path: path_str,
                rows: wavelength_um.len(),
                max: MAX_SPECTRAL_RESPONSE_ROWS,
            });
        }
        for i in 1..wavelength_um.len() {
            if wavelength_um[i] <= wavelength_um[i - 1] {
                return Err(Error::NotMonotonic { path: path_str, row: i + 1 });
            }
        }

        Ok(Self {
            sensor,
            wavelength_um,
            response,
        })
    }

    pub fn len(&self) -> usize {
        self.wavelength_um.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelength_um.is_empty()
    }
}
