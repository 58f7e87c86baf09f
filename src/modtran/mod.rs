// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
The MODTRAN-point store: a mirror of the NARR grid with per-elevation
radiative-transfer slots, populated by [`crate::reducer`].
*/

pub mod error;
pub use error::Error;

use std::fs;
use std::path::Path;

use crate::grid::{GridPoint, GridPointStore};


/// One (point, elevation) radiative-transfer result.
///
/// Invariant once [`crate::reducer`] has run for a point that ran MODTRAN:
/// all three fields are finite and `transmission` is in `(0, 1.5]` (a small
/// overshoot above 1.0 is tolerated for numerical error, per spec.md §8).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationSlot {
    /// Elevation above the geoid, km.
    pub elevation_km: f64,
    /// Numeric tag identifying the MODTRAN output subdirectory for this
    /// (point, elevation) combination.
    pub elevation_directory: i32,
    /// Atmospheric transmittance τ, unitless.
    pub transmission: f64,
    /// Upwelled radiance Lu, W·cm⁻²·sr⁻¹·µm⁻¹ integrated band radiance
    /// units until [`crate::interpolate`] rescales to W·m⁻²·sr⁻¹.
    pub upwelled_radiance: f64,
    /// Downwelled radiance Ld, same units as `upwelled_radiance`.
    pub downwelled_radiance: f64,
}

impl ElevationSlot {
    /// An empty slot at `elevation_km`/`elevation_directory`, to be filled
    /// in by the reducer. Radiative-transfer fields start at `NAN` so an
    /// unfilled slot is never silently mistaken for a physically valid
    /// zero.
    pub fn unfilled(elevation_km: f64, elevation_directory: i32) -> Self {
        Self {
            elevation_km,
            elevation_directory,
            transmission: f64::NAN,
            upwelled_radiance: f64::NAN,
            downwelled_radiance: f64::NAN,
        }
    }
}

/// A mirror of a [`GridPoint`], plus an owned sequence of elevation slots.
#[derive(Debug, Clone)]
pub struct ModtranPoint {
    pub point: GridPoint,
    pub ran_modtran: bool,
    pub elevations: Vec<ElevationSlot>,
}

impl ModtranPoint {
    /// Number of elevation slots; identical across every point in a store
    /// (set by the scene's configured elevation profile).
    pub fn count(&self) -> usize {
        self.elevations.len()
    }
}

/// The full MODTRAN-point mesh, mirroring [`GridPointStore`]'s shape.
#[derive(Debug, Clone)]
pub struct ModtranPointStore {
    pub rows: usize,
    pub cols: usize,
    pub points: Vec<ModtranPoint>,
}

impl ModtranPointStore {
    /// Allocate one [`ModtranPoint`] per grid point, each carrying an
    /// unfilled elevation slot for every entry in `profile`. The reducer
    /// (4.E) fills in the radiative-transfer fields afterwards.
    pub fn allocate_from_grid(grid: &GridPointStore, profile: &ElevationProfile) -> Self {
        let points = grid
            .points
            .iter()
            .map(|p| {
                let elevations = profile
                    .elevations_km
                    .iter()
                    .map(|&km| ElevationSlot::unfilled(km, 0))
                    .collect();
                ModtranPoint {
                    point: p.clone(),
                    ran_modtran: p.run_modtran,
                    elevations,
                }
            })
            .collect();

        Self {
            rows: grid.rows,
            cols: grid.cols,
            points,
        }
    }
}

/// The scene's configured vertical elevation profile, shared across every
/// grid point (spec.md §3: "set externally... max 8-16").
#[derive(Debug, Clone)]
pub struct ElevationProfile {
    pub elevations_km: Vec<f64>,
}

impl ElevationProfile {
    /// Load `modtran_elevations.txt`: first line is a count, followed by
    /// one elevation (km) per line.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let path_str = path.display().to_string();
        let contents = fs::read_to_string(path).map_err(|_| Error::MissingFile {
            path: path_str.clone(),
        })?;

        let mut lines = contents.lines().filter(|l| !l.trim().is_empty());
        let count_line = lines.next().ok_or_else(|| Error::MissingElevationCount {
            path: path_str.clone(),
            line_num: 1,
        })?;
        let declared: usize =
            count_line
                .trim()
                .parse()
                .map_err(|_| Error::MalformedElevation {
                    path: path_str.clone(),
                    line_num: 1,
                    line: count_line.to_string(),
                })?;

        let mut elevations_km = Vec::with_capacity(declared);
        for (idx, line) in lines.enumerate() {
            let line = line.trim();
            let value: f64 = line.parse().map_err(|_| Error::MalformedElevation {
                path: path_str.clone(),
                line_num: idx + 2,
                line: line.to_string(),
            })?;
            elevations_km.push(value);
        }

        if elevations_km.len() != declared {
            return Err(Error::ElevationCountMismatch {
                path: path_str,
                declared,
                found: elevations_km.len(),
            });
        }

        Ok(Self { elevations_km })
    }

    pub fn len(&self) -> usize {
        self.elevations_km.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elevations_km.is_empty()
    }
}
