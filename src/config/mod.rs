// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Startup configuration: resolves `ST_DATA_DIR` and validates that the
working directory carries the file layout spec.md §6 requires, *before*
any of it is touched by the grid/MODTRAN loaders or the reducer. spec.md
§7 asks for `config-missing` errors to be fatal and reported up front
rather than discovered halfway through a scene; `Config::resolve` is
where that fail-fast check lives.
*/

pub mod error;
pub use error::Error;

use std::env;
use std::path::{Path, PathBuf};

use crate::spectral_response::Sensor;


/// Files spec.md §6 requires in the working directory before a scene can
/// be processed (the per-point MODTRAN output tree is validated lazily by
/// the reducer itself, since it is too large to enumerate up front).
const REQUIRED_WORKING_FILES: &[&str] = &[
    "grid_points.hdr",
    "grid_points.bin",
    "grid_elevations.txt",
    "modtran_elevations.txt",
];

/// Resolved, validated configuration for one scene run.
#[derive(Debug, Clone)]
pub struct Config {
    pub xml_path: PathBuf,
    pub debug: bool,
    pub data_dir: PathBuf,
    pub working_dir: PathBuf,
}

impl Config {
    /// Resolve `ST_DATA_DIR` from the environment and validate that both
    /// it and `working_dir` carry the expected files, per spec.md §6.
    pub fn resolve(xml_path: PathBuf, debug: bool, working_dir: PathBuf) -> Result<Self, Error> {
        let data_dir = env::var("ST_DATA_DIR").map_err(|_| Error::MissingEnvVar { var: "ST_DATA_DIR" })?;
        let data_dir = PathBuf::from(data_dir);

        Self::check_data_dir(&data_dir)?;
        Self::check_working_dir(&working_dir)?;

        Ok(Self {
            xml_path,
            debug,
            data_dir,
            working_dir,
        })
    }

    fn check_data_dir(data_dir: &Path) -> Result<(), Error> {
        for sensor in [Sensor::L4Tm, Sensor::L5Tm, Sensor::L7Etm, Sensor::L8OliTirs] {
            let path = data_dir.join(sensor.response_filename());
            if !path.is_file() {
                return Err(Error::MissingDataFile {
                    data_dir: data_dir.display().to_string(),
                    path: path.display().to_string(),
                });
            }
        }
        Ok(())
    }

    fn check_working_dir(working_dir: &Path) -> Result<(), Error> {
        for name in REQUIRED_WORKING_FILES {
            let path = working_dir.join(name);
            if !path.is_file() {
                return Err(Error::MissingWorkingFile {
                    working_dir: working_dir.display().to_string(),
                    path: path.display().to_string(),
                });
            }
        }
        Ok(())
    }
}
